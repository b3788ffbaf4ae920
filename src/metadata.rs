//! Per-page metadata blocks.
//!
//! A content file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Release Notes
//! description: Everything that changed, newest first.
//! ---
//! # Changes
//! ```
//!
//! Only `title` and `description` are read; other keys are ignored. A block
//! that is not valid YAML never fails the build: the page renders with empty
//! metadata and the problem is reported as a warning. A file whose opening
//! fence is never closed has no metadata block at all.

use serde::Deserialize;

const FENCE: &str = "---";

/// Overrides a page can declare for itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Metadata {
    /// Drop blank values so they behave as if they were never set.
    fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            title: keep(self.title),
            description: keep(self.description),
        }
    }
}

/// A content file split into its metadata and markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<'a> {
    pub metadata: Metadata,
    pub body: &'a str,
    /// Set when a metadata block existed but could not be parsed.
    pub warning: Option<String>,
}

/// Split `raw` into the YAML between the fences and the remaining body.
///
/// Returns `(None, raw)` when the file does not open with a closed block.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some((first, rest)) = text.split_once('\n') else {
        return (None, raw);
    };
    if first.trim_end() != FENCE {
        return (None, raw);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Separate metadata from body, recovering from malformed YAML.
pub fn parse(raw: &str) -> Parsed<'_> {
    let (block, body) = split_front_matter(raw);
    let Some(yaml) = block else {
        return Parsed {
            metadata: Metadata::default(),
            body,
            warning: None,
        };
    };

    match parse_block(yaml) {
        Ok(metadata) => Parsed {
            metadata: metadata.normalized(),
            body,
            warning: None,
        },
        Err(e) => Parsed {
            metadata: Metadata::default(),
            body,
            warning: Some(format!("ignoring malformed metadata block: {e}")),
        },
    }
}

fn parse_block(yaml: &str) -> Result<Metadata, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::default());
    }
    serde_yaml::from_str(yaml)
}
