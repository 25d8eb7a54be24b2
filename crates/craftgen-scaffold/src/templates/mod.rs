//! Template sources and rendering.
//!
//! - `source`: where template files come from (embedded or a directory)
//! - `renderer`: `${name}` substitution and tree mirroring
//!
//! # Example
//!
//! ```no_run
//! use craftgen_scaffold::templates::{EmbeddedTemplates, TemplateRenderer, TemplateSpec};
//! use std::collections::BTreeMap;
//!
//! let vars = BTreeMap::from([
//!     ("siteName".to_string(), "Acme".to_string()),
//!     ("domainName".to_string(), "acme".to_string()),
//! ]);
//! let source = EmbeddedTemplates::new();
//! let renderer = TemplateRenderer::new(&source);
//! renderer.render(&[
//!     TemplateSpec::template("_package.json", "/srv/acme/package.json", vars),
//!     TemplateSpec::directory("ui", "/srv/acme/public/ui"),
//! ])?;
//! # Ok::<(), craftgen_scaffold::Error>(())
//! ```

mod renderer;
mod source;

pub use renderer::{render_string, TemplateRenderer, TemplateSpec, TemplateVars};
pub use source::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
