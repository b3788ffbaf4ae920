//! Site generation.
//!
//! The build driver: everything that touches the content and output trees
//! as a whole. Per-page work lives in [`crate::page`].
//!
//! ## Pipeline
//!
//! ```text
//! prepare   load site.toml → templates → stylesheet → discover files
//!           → home and navigation targets → detect output collisions
//! clean     (optional) remove the output directory
//! render    every content file, in parallel
//! write     pages, copied files, hashed stylesheet
//! ```
//!
//! Every fatal problem is found during `prepare`, so a misconfigured site
//! aborts before anything is written. `check` runs `prepare` alone.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # home
//! ├── 404.html                   # root-level 404.md, if present
//! ├── style.3f9a1c0e.css         # content-hashed stylesheet
//! ├── about/index.html
//! ├── blog/
//! │   ├── index.html             # blog/index.md
//! │   └── first-post/index.html
//! └── img/logo.png               # copied verbatim
//! ```
//!
//! ## Discovery
//!
//! The content root is walked in file-name order. Skipped:
//! hidden files and directories, the output directory when it sits inside
//! the content root, the config file, configured template and stylesheet
//! files, and anything under an `exclude` entry. `.md` files are pages;
//! everything else is copied to the same relative path.

use crate::assets::Stylesheet;
use crate::config::{self, CONFIG_FILENAME, ConfigError, SiteConfig};
use crate::nav::{self, NavError};
use crate::page::{self, RenderError, Site};
use crate::paths::{ContentPath, OutputPath, Resolver};
use crate::template::{NAV_PLACEHOLDERS, PAGE_PLACEHOLDERS, Template, TemplateError};
use crate::types::{BuildContext, ContentFile, RenderedPage};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk content tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{0} is not a valid UTF-8 relative path")]
    InvalidPath(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("output collision: {} all produce {output}", sources.join(", "))]
    Collision { output: String, sources: Vec<String> },
    #[error("home {home} is excluded from the build (hidden or listed in `exclude`)")]
    HomeNotRendered { home: String },
    #[error("refusing to clean {output}: it contains the content directory {content}")]
    UnsafeClean { output: String, content: String },
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Config file; `<source>/site.toml` when absent.
    pub config: Option<PathBuf>,
    /// Remove the output directory before writing.
    pub clean: bool,
}

impl BuildOptions {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            config: None,
            clean: false,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.source.join(CONFIG_FILENAME))
    }
}

/// Files found in the content tree, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub pages: Vec<ContentPath>,
    pub assets: Vec<ContentPath>,
}

/// A content file and where it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub source: ContentPath,
    pub output: OutputPath,
    /// Name of the resolution rule that placed it.
    pub rule: &'static str,
}

/// Everything needed to render, fully validated.
#[derive(Debug)]
pub struct Prepared {
    pub config: SiteConfig,
    pub ctx: BuildContext,
    pub site: Site,
    pub stylesheet: Stylesheet,
    pub inventory: Inventory,
    pub plan: Vec<PlannedPage>,
}

/// What a finished build produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub pages: Vec<RenderedPage>,
    pub copied: Vec<ContentPath>,
    pub stylesheet: String,
}

// ============================================================================
// Prepare
// ============================================================================

/// Load, validate and plan without writing anything.
pub fn prepare(opts: &BuildOptions) -> Result<Prepared, GenerateError> {
    let config_path = opts.config_path();
    let config = config::load_config(&config_path, &opts.source)?;
    let ctx = BuildContext::new(
        &opts.source,
        &opts.output,
        Resolver::new(config.home_basename()),
    );

    let page_template = load_template(&ctx, config.templates.page.as_deref(), PAGE_PLACEHOLDERS)?
        .unwrap_or_else(Template::default_page);
    let nav_template = load_template(&ctx, config.templates.nav.as_deref(), NAV_PLACEHOLDERS)?
        .unwrap_or_else(Template::default_nav);
    let stylesheet = match &config.stylesheet {
        Some(path) => {
            let path = ctx.source_root.join(path);
            Stylesheet::load(&path).map_err(|source| GenerateError::Read {
                path: path.display().to_string(),
                source,
            })?
        }
        None => Stylesheet::builtin(),
    };

    let inventory = discover(&ctx, &config, &config_path)?;
    if !inventory.pages.contains(&config.home) {
        return Err(GenerateError::HomeNotRendered {
            home: config.home.to_string(),
        });
    }
    let navigation = nav::build(&config, &ctx, &inventory.pages)?;
    let plan = plan(&ctx, &inventory, &stylesheet.file_name)?;

    let site = Site {
        site_title: config.site_title.clone(),
        navigation,
        page_template,
        nav_template,
        stylesheet: stylesheet.file_name.clone(),
    };

    Ok(Prepared {
        config,
        ctx,
        site,
        stylesheet,
        inventory,
        plan,
    })
}

fn load_template(
    ctx: &BuildContext,
    path: Option<&Path>,
    required: &[&str],
) -> Result<Option<Template>, TemplateError> {
    path.map(|p| Template::load(&ctx.source_root.join(p), required))
        .transpose()
}

/// Content-root-relative form of a configured path, if it lies inside the root.
fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    ContentPath::from_relative(rel).map(|p| p.as_str().to_string())
}

fn is_excluded(rel: &str, exclude: &[String]) -> bool {
    exclude
        .iter()
        .any(|e| rel == e.as_str() || rel.strip_prefix(e.as_str()).is_some_and(|rest| rest.starts_with('/')))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Walk the content tree and sort files into pages and copied assets.
pub fn discover(
    ctx: &BuildContext,
    config: &SiteConfig,
    config_path: &Path,
) -> Result<Inventory, GenerateError> {
    let root = &ctx.source_root;

    let mut skipped: HashSet<String> = HashSet::new();
    if config_path.starts_with(root)
        && let Some(rel) = relative_to_root(root, config_path)
    {
        skipped.insert(rel);
    }
    for path in [
        config.templates.page.as_deref(),
        config.templates.nav.as_deref(),
        config.stylesheet.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(rel) = relative_to_root(root, path) {
            skipped.insert(rel);
        }
    }

    let output_dir = fs::canonicalize(&ctx.output_root).ok();
    let is_output_dir = |entry: &walkdir::DirEntry| {
        entry.file_type().is_dir()
            && (entry.path() == ctx.output_root
                || output_dir
                    .as_ref()
                    .is_some_and(|out| fs::canonicalize(entry.path()).ok().as_ref() == Some(out)))
    };
    let excluded = |entry: &walkdir::DirEntry| {
        entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.to_str())
            .is_some_and(|rel| !rel.is_empty() && is_excluded(&rel.replace('\\', "/"), &config.exclude))
    };

    let mut inventory = Inventory::default();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_output_dir(e) && !excluded(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let path = ContentPath::from_relative(rel)
            .ok_or_else(|| GenerateError::InvalidPath(entry.path().display().to_string()))?;
        if skipped.contains(path.as_str()) {
            continue;
        }
        if path.is_content() {
            inventory.pages.push(path);
        } else {
            inventory.assets.push(path);
        }
    }
    Ok(inventory)
}

/// Resolve every page and reject any two files that would write the same
/// output file.
pub fn plan(
    ctx: &BuildContext,
    inventory: &Inventory,
    stylesheet: &str,
) -> Result<Vec<PlannedPage>, GenerateError> {
    let planned: Vec<PlannedPage> = inventory
        .pages
        .iter()
        .map(|source| PlannedPage {
            source: source.clone(),
            output: ctx.resolver.resolve(source),
            rule: ctx.resolver.rule(source),
        })
        .collect();

    let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();
    claims
        .entry(stylesheet.to_string())
        .or_default()
        .push("(stylesheet)".to_string());
    for page in &planned {
        claims
            .entry(page.output.file_name())
            .or_default()
            .push(page.source.to_string());
    }
    for asset in &inventory.assets {
        claims
            .entry(ctx.resolver.output_location(asset))
            .or_default()
            .push(asset.to_string());
    }

    if let Some((output, mut sources)) = claims.into_iter().find(|(_, sources)| sources.len() > 1) {
        sources.sort();
        return Err(GenerateError::Collision { output, sources });
    }
    Ok(planned)
}

// ============================================================================
// Build
// ============================================================================

/// Validate without writing: `prepare` and nothing else.
pub fn check(opts: &BuildOptions) -> Result<Prepared, GenerateError> {
    prepare(opts)
}

/// Full build.
pub fn build(opts: &BuildOptions) -> Result<BuildSummary, GenerateError> {
    let prepared = prepare(opts)?;
    if opts.clean {
        clean_output(&prepared.ctx)?;
    }
    generate(&prepared)
}

/// Render and write everything `prepared` describes.
pub fn generate(prepared: &Prepared) -> Result<BuildSummary, GenerateError> {
    let ctx = &prepared.ctx;
    fs::create_dir_all(&ctx.output_root)?;

    let pages = prepared
        .inventory
        .pages
        .par_iter()
        .map(|path| -> Result<RenderedPage, GenerateError> {
            let file = read_content(ctx, path)?;
            let rendered = page::render_page(ctx, &prepared.site, &file)?;
            page::write_page(&rendered, &ctx.output_root)?;
            Ok(rendered)
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    prepared
        .inventory
        .assets
        .par_iter()
        .try_for_each(|asset| copy_asset(ctx, asset))?;

    prepared.stylesheet.write(&ctx.output_root)?;

    Ok(BuildSummary {
        pages,
        copied: prepared.inventory.assets.clone(),
        stylesheet: prepared.stylesheet.file_name.clone(),
    })
}

fn read_content(ctx: &BuildContext, path: &ContentPath) -> Result<ContentFile, GenerateError> {
    let full = path.to_path(&ctx.source_root);
    let raw = fs::read_to_string(&full).map_err(|source| GenerateError::Read {
        path: full.display().to_string(),
        source,
    })?;
    Ok(ContentFile {
        path: path.clone(),
        raw,
    })
}

fn copy_asset(ctx: &BuildContext, asset: &ContentPath) -> Result<(), GenerateError> {
    let src = asset.to_path(&ctx.source_root);
    let dst = asset.to_path(&ctx.output_root);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&src, &dst)?;
    Ok(())
}

/// Remove the output directory, refusing when the content lives inside it.
pub fn clean_output(ctx: &BuildContext) -> Result<(), GenerateError> {
    let Ok(output) = fs::canonicalize(&ctx.output_root) else {
        return Ok(());
    };
    let content = fs::canonicalize(&ctx.source_root)?;
    if content.starts_with(&output) {
        return Err(GenerateError::UnsafeClean {
            output: ctx.output_root.display().to_string(),
            content: ctx.source_root.display().to_string(),
        });
    }
    fs::remove_dir_all(&output)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
