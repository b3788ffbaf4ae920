//! Placeholder templates for the page shell and the navigation bar.
//!
//! Templates are plain HTML with `{{ name }}` placeholders:
//!
//! ```html
//! <title>{{ title }}</title>
//! <link rel="stylesheet" href="{{stylesheet}}">
//! ```
//!
//! Substitution is a single left-to-right pass, so values are never re-scanned
//! for placeholders (a page body that happens to contain `{{ title }}` is
//! emitted as-is). Unknown placeholders are left verbatim. A template missing a
//! placeholder it is required to have is rejected when it is loaded.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Placeholders every page shell must contain.
pub const PAGE_PLACEHOLDERS: &[&str] = &["title", "description", "nav", "stylesheet", "content"];
/// Placeholders every navigation shell must contain.
pub const NAV_PLACEHOLDERS: &[&str] = &["home", "links"];

const DEFAULT_PAGE: &str = include_str!("../static/page.html");
const DEFAULT_NAV: &str = include_str!("../static/nav.html");

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("cannot read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template {name} is missing the {{{{{placeholder}}}}} placeholder")]
    MissingPlaceholder { name: String, placeholder: String },
}

/// A validated template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    /// Wrap `source`, checking that every `required` placeholder occurs.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        required: &[&str],
    ) -> Result<Self, TemplateError> {
        let template = Self {
            name: name.into(),
            source: source.into(),
        };
        let present = template.placeholders();
        if let Some(missing) = required.iter().find(|r| !present.contains(*r)) {
            return Err(TemplateError::MissingPlaceholder {
                name: template.name,
                placeholder: (*missing).to_string(),
            });
        }
        Ok(template)
    }

    /// Load and validate a template file.
    pub fn load(path: &Path, required: &[&str]) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(path.display().to_string(), source, required)
    }

    /// The built-in page shell.
    pub fn default_page() -> Self {
        Self {
            name: "page.html".to_string(),
            source: DEFAULT_PAGE.to_string(),
        }
    }

    /// The built-in navigation shell.
    pub fn default_nav() -> Self {
        Self {
            name: "nav.html".to_string(),
            source: DEFAULT_NAV.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all placeholders, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.source.as_str();
        while let Some((name, after)) = next_placeholder(rest) {
            names.push(name);
            rest = after;
        }
        names
    }

    /// Substitute `values` into the template.
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut out = String::with_capacity(self.source.len() + values.values().map(|v| v.len()).sum::<usize>());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find(OPEN) {
            let Some(len) = rest[start + OPEN.len()..].find(CLOSE) else {
                break;
            };
            let end = start + OPEN.len() + len + CLOSE.len();
            let name = rest[start + OPEN.len()..start + OPEN.len() + len].trim();

            out.push_str(&rest[..start]);
            match values.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..end]),
            }
            rest = &rest[end..];
        }
        out.push_str(rest);
        out
    }
}

/// Find the next placeholder, returning its trimmed name and the text after it.
fn next_placeholder(text: &str) -> Option<(&str, &str)> {
    let start = text.find(OPEN)? + OPEN.len();
    let len = text[start..].find(CLOSE)?;
    Some((text[start..start + len].trim(), &text[start + len + CLOSE.len()..]))
}
