//! Interactive project questions

use anyhow::{Context, Result};
use console::style;
use craftgen_core::types::{
    Acceptance, LicenseAnswer, ProjectAnswers, DEFAULT_PRODUCTION_TLD, DEFAULT_STAGING_DOMAIN,
};
use dialoguer::Input;

const LICENSE_URL: &str = "http://buildwithcraft.com/license";

/// Ask the five project questions
///
/// The license answer is re-asked until it parses as yes or no; a "no" is
/// returned as-is and rejected by the caller.
pub fn ask() -> Result<ProjectAnswers> {
    let site_name: String = Input::new()
        .with_prompt(format!(
            "What is the {} of this website? (normal name with spaces and capitalization)",
            style("name").underlined()
        ))
        .interact_text()
        .context("Failed to read site name")?;

    let domain_name: String = Input::new()
        .with_prompt(format!(
            "What is the {} for this website? (no TLD extension)",
            style("root domain name").underlined()
        ))
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().contains(char::is_whitespace) {
                Err("a domain name cannot contain spaces")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to read domain name")?;

    let production_tld: String = Input::new()
        .with_prompt(format!(
            "What is the {} for the production website?",
            style("TLD").underlined()
        ))
        .default(DEFAULT_PRODUCTION_TLD.to_string())
        .interact_text()
        .context("Failed to read production TLD")?;

    let staging_domain: String = Input::new()
        .with_prompt(format!(
            "What is the {} for this website?",
            style("staging domain").underlined()
        ))
        .default(DEFAULT_STAGING_DOMAIN.to_string())
        .interact_text()
        .context("Failed to read staging domain")?;

    let accept_license: String = Input::new()
        .with_prompt(format!("Do you accept Craft's license? [{}]", LICENSE_URL))
        .validate_with(|input: &String| -> Result<(), String> {
            Acceptance::parse("license", input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .context("Failed to read license answer")?;

    Ok(ProjectAnswers {
        site_name,
        domain_name,
        production_tld: Some(production_tld),
        staging_domain: Some(staging_domain),
        accept_license: LicenseAnswer::Text(accept_license),
    })
}
