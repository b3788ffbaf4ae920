//! Per-page rendering.
//!
//! Turns one content file into one finished HTML document:
//!
//! ```text
//! raw file
//!   → metadata block split off
//!   → markdown converted, then sanitized
//!   → heading ids assigned
//!   → embedded references re-targeted for the output location
//!   → title / description resolved
//!   → navigation rendered for this page
//!   → everything substituted into the page template
//! ```
//!
//! ## Title and description
//!
//! | Field | First available wins |
//! |-------|----------------------|
//! | title | metadata `title` → first non-empty `h1` → site title |
//! | description | metadata `description` → resolved title |
//!
//! Pages share nothing mutable, so any number can render at once.

use crate::anchors::{Heading, anchor_headings};
use crate::markdown;
use crate::metadata;
use crate::nav::{self, ResolvedNavEntry};
use crate::paths::relative_path;
use crate::rewrite::{RewriteError, rewrite};
use crate::template::Template;
use crate::types::{BuildContext, ContentFile, RenderedPage};
use maud::html;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{path}: {source}")]
    Rewrite {
        path: String,
        #[source]
        source: RewriteError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only state every page render shares.
#[derive(Debug, Clone)]
pub struct Site {
    pub site_title: String,
    pub navigation: Vec<ResolvedNavEntry>,
    pub page_template: Template,
    pub nav_template: Template,
    /// Output-root-relative stylesheet file name.
    pub stylesheet: String,
}

/// HTML-escape plain text for use in element content or attribute values.
fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Text of the first level-1 heading that has any.
fn heading_title(headings: &[Heading]) -> Option<String> {
    headings
        .iter()
        .find(|h| h.level == 1 && !h.text.is_empty())
        .map(|h| h.text.clone())
}

/// Render one content file.
pub fn render_page(
    ctx: &BuildContext,
    site: &Site,
    file: &ContentFile,
) -> Result<RenderedPage, RenderError> {
    let output = ctx.resolver.resolve(&file.path);
    let parsed = metadata::parse(&file.raw);
    let warnings: Vec<String> = parsed.warning.into_iter().collect();

    let fragment = markdown::render(parsed.body);
    let with_error_path = |source| RenderError::Rewrite {
        path: file.path.to_string(),
        source,
    };
    let (anchored, headings) = anchor_headings(&fragment).map_err(with_error_path)?;
    let content =
        rewrite(&anchored, &file.path, &output, &ctx.resolver).map_err(with_error_path)?;

    let title = parsed
        .metadata
        .title
        .or_else(|| heading_title(&headings))
        .unwrap_or_else(|| site.site_title.clone());
    let description = parsed
        .metadata
        .description
        .unwrap_or_else(|| title.clone());

    let nav = nav::render(&site.navigation, &output, &site.site_title, &site.nav_template);
    let stylesheet = relative_path(output.directory(), &site.stylesheet);
    let escaped_title = escape(&title);
    let escaped_description = escape(&description);

    let html = site.page_template.render(&HashMap::from([
        ("title", escaped_title.as_str()),
        ("description", escaped_description.as_str()),
        ("nav", nav.as_str()),
        ("stylesheet", stylesheet.as_str()),
        ("content", content.as_str()),
    ]));

    Ok(RenderedPage {
        source: file.path.clone(),
        output,
        title,
        html,
        warnings,
    })
}

/// Write a rendered page under `output_root`, creating parent directories.
pub fn write_page(page: &RenderedPage, output_root: &Path) -> Result<PathBuf, RenderError> {
    let dest = page.output.file_path(output_root);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, &page.html)?;
    Ok(dest)
}
