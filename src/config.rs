//! Site configuration.
//!
//! Loaded once per build from `site.toml` (in the content root unless
//! `--config` points elsewhere), validated, and shared read-only by every
//! page render. Any problem here aborts the build before a single page is
//! written.
//!
//! ## Configuration Options
//!
//! ```toml
//! site_title = "My Project"          # required
//! home = "README.md"                 # required; a content file at the tree root
//!
//! # Ordered navigation, one `title = target` pair per entry. Targets are
//! # http(s) URLs, mailto:/tel: URIs, or relative paths to content files.
//! navigation = [
//!     { "Guide" = "guide/index.md" },
//!     { "About" = "about.md" },
//!     { "Source" = "https://github.com/me/project" },
//! ]
//!
//! stylesheet = "theme/site.css"      # optional; built-in stylesheet otherwise
//! exclude = ["drafts", "theme"]      # optional; never rendered or copied
//!
//! [templates]                        # optional; built-in templates otherwise
//! page = "theme/page.html"
//! nav = "theme/nav.html"
//!
//! [processing]
//! max_processes = 4                  # omit for one worker per CPU core
//! ```
//!
//! Paths are relative to the content root. Unknown keys are rejected to catch
//! typos early.

use crate::paths::ContentPath;
use crate::rewrite::{ReferenceKind, classify};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in the content root.
pub const CONFIG_FILENAME: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("navigation entry {position} ({title:?}): {error}")]
    Navigation {
        /// 1-based position in the `navigation` list.
        position: usize,
        title: String,
        #[source]
        error: NavEntryError,
    },
}

/// Why a single navigation entry was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavEntryError {
    #[error("expected exactly one `title = target` pair, found {0}")]
    Shape(usize),
    #[error("title is empty")]
    EmptyTitle,
    #[error("target must be a string")]
    NonStringTarget,
    #[error("target is empty")]
    EmptyTarget,
    #[error(
        "unsupported target {0:?}: expected an http(s) URL, a mailto:/tel: URI, or a relative path to a .md file"
    )]
    UnsupportedTarget(String),
}

/// One declared navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    /// Absolute URL or `mailto:`/`tel:` URI, rendered as-is.
    External { title: String, href: String },
    /// A content file, linked at its resolved output location.
    Internal { title: String, content_path: ContentPath },
}

impl NavEntry {
    pub fn title(&self) -> &str {
        match self {
            NavEntry::External { title, .. } | NavEntry::Internal { title, .. } => title,
        }
    }

    /// Parse one `{ title = target }` table.
    pub fn parse(table: &toml::Table) -> Result<Self, NavEntryError> {
        let mut pairs = table.iter();
        let (Some((title, value)), None) = (pairs.next(), pairs.next()) else {
            return Err(NavEntryError::Shape(table.len()));
        };

        let title = title.trim();
        if title.is_empty() {
            return Err(NavEntryError::EmptyTitle);
        }
        let target = value
            .as_str()
            .ok_or(NavEntryError::NonStringTarget)?
            .trim();
        if target.is_empty() {
            return Err(NavEntryError::EmptyTarget);
        }

        match classify(target) {
            ReferenceKind::External | ReferenceKind::Protocol => Ok(NavEntry::External {
                title: title.to_string(),
                href: target.to_string(),
            }),
            ReferenceKind::Relative => ContentPath::new(target)
                .filter(ContentPath::is_content)
                .map(|content_path| NavEntry::Internal {
                    title: title.to_string(),
                    content_path,
                })
                .ok_or_else(|| NavEntryError::UnsupportedTarget(target.to_string())),
            _ => Err(NavEntryError::UnsupportedTarget(target.to_string())),
        }
    }
}

/// Template overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Page shell with `title`, `description`, `nav`, `stylesheet`, `content`.
    pub page: Option<PathBuf>,
    /// Navigation shell with `home` and `links`.
    pub nav: Option<PathBuf>,
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// The file as written, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    site_title: String,
    home: String,
    #[serde(default)]
    navigation: Vec<toml::Table>,
    #[serde(default)]
    stylesheet: Option<PathBuf>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    templates: TemplatesConfig,
    #[serde(default)]
    processing: ProcessingConfig,
}

/// Validated site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site name: navigation home link and title fallback.
    pub site_title: String,
    /// The home content file (always at the tree root).
    pub home: ContentPath,
    /// Navigation entries in display order.
    pub navigation: Vec<NavEntry>,
    /// Custom stylesheet, relative to the content root.
    pub stylesheet: Option<PathBuf>,
    /// Content-root-relative paths skipped by discovery and copying.
    pub exclude: Vec<String>,
    pub templates: TemplatesConfig,
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Parse and validate everything that does not need the filesystem.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let site_title = raw.site_title.trim().to_string();
        if site_title.is_empty() {
            return Err(ConfigError::Validation("site_title must not be empty".into()));
        }

        let home = parse_home(&raw.home)?;

        let navigation = raw
            .navigation
            .iter()
            .enumerate()
            .map(|(i, table)| {
                NavEntry::parse(table).map_err(|error| ConfigError::Navigation {
                    position: i + 1,
                    title: table.keys().cloned().collect::<Vec<_>>().join(", "),
                    error,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude = raw
            .exclude
            .iter()
            .map(|e| {
                ContentPath::new(e).map(|p| p.as_str().to_string()).ok_or_else(|| {
                    ConfigError::Validation(format!("exclude entry {e:?} must be a relative path"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            site_title,
            home,
            navigation,
            stylesheet: raw.stylesheet,
            exclude,
            templates: raw.templates,
            processing: raw.processing,
        })
    }

    /// Check references into the content tree.
    pub fn validate(&self, root: &Path) -> Result<(), ConfigError> {
        if !self.home.to_path(root).is_file() {
            return Err(ConfigError::Validation(format!(
                "home {:?} does not exist in {}",
                self.home.as_str(),
                root.display()
            )));
        }
        Ok(())
    }

    /// File name the path resolver treats as the home page.
    pub fn home_basename(&self) -> &str {
        self.home.file_name()
    }
}

fn parse_home(home: &str) -> Result<ContentPath, ConfigError> {
    let home = home.trim();
    if home.is_empty() {
        return Err(ConfigError::Validation("home must not be empty".into()));
    }
    let path = ContentPath::new(home).filter(ContentPath::is_content).ok_or_else(|| {
        ConfigError::Validation(format!("home {home:?} must be a relative path to a .md file"))
    })?;
    if !path.is_root_level() {
        return Err(ConfigError::Validation(format!(
            "home {home:?} must be at the top of the content tree"
        )));
    }
    Ok(path)
}

/// Load and fully validate the config at `path` for the tree at `root`.
pub fn load_config(path: &Path, root: &Path) -> Result<SiteConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = SiteConfig::from_toml(&text)?;
    config.validate(root)?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mdsite configuration
# =====================
# Place this file at the top of your content tree as site.toml
# (or pass --config). Unknown keys cause an error.

# Site name, shown in the navigation bar and used as the page title
# when a page has neither a metadata title nor a top-level heading.
site_title = "My Project"

# The content file that becomes the site root (index.html).
# Must live at the top of the content tree.
home = "README.md"

# Navigation bar entries, in display order. Each entry is a single
# "title" = "target" pair. Targets may be:
#   - a relative path to a .md file   -> linked at its clean URL
#   - an http:// or https:// URL      -> opens in a new tab
#   - a mailto: or tel: URI           -> opens in a new tab
navigation = [
    { "About" = "about.md" },
    # { "Guide" = "guide/index.md" },
    # { "Source" = "https://github.com/me/project" },
]

# Custom stylesheet, relative to the content root. It is published as
# style.<hash>.css so browsers never serve a stale copy.
# stylesheet = "theme/site.css"

# Paths (relative to the content root) that are neither rendered nor copied.
# Hidden files and directories are always skipped.
# exclude = ["drafts", "theme"]

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
[templates]
# Page shell. Must contain {{title}}, {{description}}, {{nav}},
# {{stylesheet}} and {{content}}.
# page = "theme/page.html"

# Navigation shell. Must contain {{home}} and {{links}}.
# nav = "theme/nav.html"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
