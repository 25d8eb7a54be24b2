//! Project configuration collected from the user

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default production top-level domain
pub const DEFAULT_PRODUCTION_TLD: &str = "com";

/// Default staging domain
pub const DEFAULT_STAGING_DOMAIN: &str = "line58.com";

const ACCEPT_ANSWERS: &[&str] = &["y", "yes", "true"];
const DECLINE_ANSWERS: &[&str] = &["n", "no", "false"];

/// Answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Accepted,
    Declined,
}

impl Acceptance {
    /// Parse a yes/no answer, case-insensitively.
    ///
    /// Accepts `y`, `yes`, `true` and declines on `n`, `no`, `false`.
    /// Anything else is an error rather than an implicit "no".
    pub fn parse(field: &str, input: &str) -> Result<Self> {
        let answer = input.trim().to_ascii_lowercase();

        if ACCEPT_ANSWERS.contains(&answer.as_str()) {
            Ok(Self::Accepted)
        } else if DECLINE_ANSWERS.contains(&answer.as_str()) {
            Ok(Self::Declined)
        } else {
            Err(Error::invalid_answer(
                field,
                input,
                format!("{} or {}", ACCEPT_ANSWERS.join("/"), DECLINE_ANSWERS.join("/")),
            ))
        }
    }

    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// License answer as written in an answers file (`true` or `"yes"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LicenseAnswer {
    Flag(bool),
    Text(String),
}

impl LicenseAnswer {
    fn to_acceptance(&self) -> Result<Acceptance> {
        match self {
            Self::Flag(true) => Ok(Acceptance::Accepted),
            Self::Flag(false) => Ok(Acceptance::Declined),
            Self::Text(text) => Acceptance::parse("accept_license", text),
        }
    }
}

/// Raw answers, either typed at the prompts or read from an answers file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAnswers {
    pub site_name: String,
    pub domain_name: String,
    #[serde(default)]
    pub production_tld: Option<String>,
    #[serde(default)]
    pub staging_domain: Option<String>,
    pub accept_license: LicenseAnswer,
}

/// Immutable project configuration shared by every pipeline step
///
/// Only [`ProjectConfig::from_answers`] builds one, and it refuses a
/// declined license, so holding a `ProjectConfig` means the license was
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    site_name: String,
    domain_name: String,
    production_tld: String,
    staging_domain: String,
}

impl ProjectConfig {
    /// Build a validated configuration from raw answers.
    ///
    /// The license answer is checked first: a decline is
    /// [`Error::PromptRejected`] whatever the other answers contain.
    pub fn from_answers(answers: ProjectAnswers) -> Result<Self> {
        if !answers.accept_license.to_acceptance()?.is_accepted() {
            return Err(Error::PromptRejected);
        }

        let site_name = required("site_name", &answers.site_name)?;
        let domain_name = hostname_part("domain_name", &answers.domain_name)?;

        let production_tld = match answers.production_tld.as_deref() {
            Some(tld) if !tld.trim().is_empty() => {
                hostname_part("production_tld", tld.trim().trim_start_matches('.'))?
            }
            _ => DEFAULT_PRODUCTION_TLD.to_string(),
        };

        let staging_domain = match answers.staging_domain.as_deref() {
            Some(domain) if !domain.trim().is_empty() => hostname_part("staging_domain", domain)?,
            _ => DEFAULT_STAGING_DOMAIN.to_string(),
        };

        Ok(Self {
            site_name,
            domain_name,
            production_tld,
            staging_domain,
        })
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn production_tld(&self) -> &str {
        &self.production_tld
    }

    pub fn staging_domain(&self) -> &str {
        &self.staging_domain
    }

    /// Production host name, e.g. `example.com`
    pub fn production_host(&self) -> String {
        format!("{}.{}", self.domain_name, self.production_tld)
    }

    /// Variables available to `${name}` placeholders in templates
    pub fn template_vars(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("siteName".to_string(), self.site_name.clone()),
            ("domainName".to_string(), self.domain_name.clone()),
            ("productionTLD".to_string(), self.production_tld.clone()),
            ("stagingDomain".to_string(), self.staging_domain.clone()),
        ])
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.site_name, self.production_host())
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(value.to_string())
}

fn hostname_part(field: &str, value: &str) -> Result<String> {
    let value = required(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(Error::invalid_answer(field, &value, "a host name without spaces"));
    }
    Ok(value)
}
