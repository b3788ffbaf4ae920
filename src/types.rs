//! Shared types passed between the build stages.

use crate::paths::{ContentPath, OutputPath, Resolver};
use std::path::PathBuf;

/// Immutable per-build context threaded through every resolver and rewriter
/// call. Nothing reads paths relative to the process working directory.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Root of the content tree.
    pub source_root: PathBuf,
    /// Root of the generated site.
    pub output_root: PathBuf,
    /// The single resolver for this build (bound to the home basename).
    pub resolver: Resolver,
}

impl BuildContext {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>, resolver: Resolver) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            resolver,
        }
    }
}

/// A markdown source read from the content tree.
#[derive(Debug, Clone)]
pub struct ContentFile {
    /// Location relative to the content root.
    pub path: ContentPath,
    /// Raw file contents, metadata block included.
    pub raw: String,
}

/// A finished page, ready to be written once.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Source the page was rendered from.
    pub source: ContentPath,
    /// Artifact location.
    pub output: OutputPath,
    /// Resolved page title (after metadata/heading/site fallback).
    pub title: String,
    /// Full HTML document.
    pub html: String,
    /// Problems recovered from while rendering (e.g. malformed metadata).
    pub warnings: Vec<String>,
}
