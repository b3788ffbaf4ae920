//! # mdsite
//!
//! A static site generator for a tree of markdown files. Each file becomes
//! one page at a clean URL, every page shares one navigation bar and one
//! stylesheet, and every embedded asset reference keeps working after the
//! tree is restructured for clean URLs.
//!
//! # Architecture
//!
//! ```text
//! site.toml ──► config ──► nav ─────────────┐
//!                  │                        ▼
//! content/ ──► generate ──► page ──► (metadata, markdown, anchors,
//!                  │                  rewrite, template) ──► dist/
//!                  └──► assets (hashed stylesheet), static copy
//! ```
//!
//! All path decisions go through one [`paths::Resolver`], carried by the
//! immutable [`types::BuildContext`]. The navigation bar and the reference
//! rewriter therefore always agree on where a page ends up.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Content path → output artifact resolution, relative path arithmetic |
//! | [`rewrite`] | Reference classification and rewriting of embedded assets |
//! | [`anchors`] | Deterministic heading ids |
//! | [`config`] | `site.toml` loading and validation, navigation entry parsing |
//! | [`nav`] | Navigation resolution and per-page rendering |
//! | [`page`] | Per-page render orchestration |
//! | [`generate`] | Discovery, collision detection, parallel rendering, writing |
//! | [`metadata`] | YAML metadata blocks |
//! | [`markdown`] | Markdown conversion and sanitization |
//! | [`template`] | `{{ placeholder }}` templates |
//! | [`assets`] | Content-hashed stylesheet |
//! | [`types`] | Shared types passed between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Clean URLs Through `index` Artifacts
//!
//! `about.md` is written to `about/index.html` and linked as `about`. Any
//! static file server maps the directory to its index, so URLs never show an
//! extension. The one exception is `404.md`, which stays at `404.html` where
//! hosts look for it.
//!
//! ## Rewrite Embeds, Keep Hyperlinks
//!
//! Moving `blog/post.md` to `blog/post/index.html` adds a directory level,
//! so an image authored as `../img/logo.png` has to become
//! `../../img/logo.png`. Embedded references (images, media, scripts,
//! stylesheets) are rewritten accordingly. Hyperlinks in prose are left as
//! authored: site structure is the navigation bar's job.
//!
//! ## Sanitize Before Anything Else
//!
//! Converted markdown goes through ammonia before heading anchors and
//! reference rewriting, so every later stage works on safe, well-formed
//! markup and never has to second-guess raw HTML from a content file.
//!
//! ## Fail Before Writing
//!
//! Configuration, templates, the stylesheet, navigation targets and output
//! collisions are all checked before the first file is written. A broken
//! site never half-overwrites a good one.

pub mod anchors;
pub mod assets;
pub mod config;
pub mod generate;
pub mod markdown;
pub mod metadata;
pub mod nav;
pub mod output;
pub mod page;
pub mod paths;
pub mod rewrite;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
