//! CLI output formatting for `build` and `check`.
//!
//! # Information-First Display
//!
//! Every page is shown by its identity (positional index + resolved title)
//! with the artifact it produced, and the source file as indented context.
//! Recovered problems appear as `Warning:` lines under the page they belong
//! to, so nothing that was silently patched up goes unnoticed.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Welcome → index.html
//!     Source: README.md
//! 002 About Us → about/index.html
//!     Source: about.md
//!     Warning: ignoring malformed metadata block: ...
//!
//! Stylesheet → style.3f9a1c0e.css
//! Generated 2 pages, copied 1 file
//! ```
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 README.md → index.html (home)
//! 002 about.md → about/index.html (page)
//!
//! Navigation
//! 001 About → about/index.html
//! 002 Source → https://github.com/me/project (external)
//!
//! Files to copy
//!     img/logo.png
//!
//! Stylesheet → style.3f9a1c0e.css
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{BuildSummary, Prepared};
use crate::nav::ResolvedNavEntry;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 file`, `3 files`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];

    for (i, page) in summary.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.title,
            page.output.file_name()
        ));
        lines.push(format!("{}Source: {}", indent(1), page.source));
        for warning in &page.warnings {
            lines.push(format!("{}Warning: {}", indent(1), warning));
        }
    }

    lines.push(String::new());
    lines.push(format!("Stylesheet \u{2192} {}", summary.stylesheet));
    lines.push(format!(
        "Generated {}, copied {}",
        plural(summary.pages.len(), "page"),
        plural(summary.copied.len(), "file")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

fn nav_line(index: usize, entry: &ResolvedNavEntry) -> String {
    match entry {
        ResolvedNavEntry::External { title, href } => {
            format!("{} {} \u{2192} {} (external)", format_index(index), title, href)
        }
        ResolvedNavEntry::Internal { title, output } => {
            format!("{} {} \u{2192} {}", format_index(index), title, output.file_name())
        }
    }
}

pub fn format_check_output(prepared: &Prepared) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in prepared.plan.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {} ({})",
            format_index(i + 1),
            page.source,
            page.output.file_name(),
            page.rule
        ));
    }

    if !prepared.site.navigation.is_empty() {
        lines.push(String::new());
        lines.push("Navigation".to_string());
        for (i, entry) in prepared.site.navigation.iter().enumerate() {
            lines.push(nav_line(i + 1, entry));
        }
    }

    if !prepared.inventory.assets.is_empty() {
        lines.push(String::new());
        lines.push("Files to copy".to_string());
        for asset in &prepared.inventory.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    lines.push(String::new());
    lines.push(format!("Stylesheet \u{2192} {}", prepared.stylesheet.file_name));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(prepared: &Prepared) {
    for line in format_check_output(prepared) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
