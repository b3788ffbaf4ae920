//! Shared test utilities for the mdsite test suite.
//!
//! Builds throwaway content trees in temp directories and provides lookup
//! helpers that panic with a clear message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! let ctx = context(tmp.path());
//! let config = config_with_nav(r#"{ "About" = "about.md" }"#);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::paths::Resolver;
use crate::types::{BuildContext, RenderedPage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Minimal valid config: site "Test Site", home `README.md`.
pub const BASE_CONFIG: &str = "site_title = \"Test Site\"\nhome = \"README.md\"\n";

/// Write `(relative path, contents)` pairs under `root`, creating directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let dest = root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&dest, contents).unwrap();
    }
}

/// A small site in a fresh temp directory:
///
/// ```text
/// README.md            home
/// about.md
/// blog/post.md         embeds ../img/logo.png
/// img/logo.png
/// site.toml            nav: About, Source
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_files(
        tmp.path(),
        &[
            ("README.md", "# Welcome\n\nHello."),
            ("about.md", "---\ndescription: Who we are\n---\n# About Us\n"),
            (
                "blog/post.md",
                "# First Post\n\n![logo](../img/logo.png?v=2#frag)\n\n## Overview\n\n## Overview\n",
            ),
            ("img/logo.png", "not really a png"),
            (
                "site.toml",
                format!(
                    "{BASE_CONFIG}navigation = [{{ \"About\" = \"about.md\" }}, {{ \"Source\" = \"https://example.com/src\" }}]\n"
                )
                .as_str(),
            ),
        ],
    );
    tmp
}

/// Parse `BASE_CONFIG` plus the given inline navigation entries.
pub fn config_with_nav(nav: &str) -> SiteConfig {
    SiteConfig::from_toml(&format!("{BASE_CONFIG}navigation = [{nav}]\n"))
        .unwrap_or_else(|e| panic!("fixture config is invalid: {e}"))
}

/// Build context for `root` with output under `root/dist` and home `README.md`.
pub fn context(root: &Path) -> BuildContext {
    BuildContext::new(root, root.join("dist"), Resolver::new("README.md"))
}

// =========================================================================
// Lookups — panics with a clear message on miss
// =========================================================================

/// Find a rendered page by source path. Panics if not found.
pub fn find_page<'a>(pages: &'a [RenderedPage], source: &str) -> &'a RenderedPage {
    pages
        .iter()
        .find(|p| p.source.as_str() == source)
        .unwrap_or_else(|| {
            let sources: Vec<&str> = pages.iter().map(|p| p.source.as_str()).collect();
            panic!("page '{source}' not found. Available: {sources:?}")
        })
}

/// Read a file under `root`. Panics with the path if missing.
pub fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path))
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", root.join(path).display()))
}
