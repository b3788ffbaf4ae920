//! Link and asset reference rewriting.
//!
//! Content is authored against the source tree (`blog/post.md` embeds
//! `../img/logo.png`), but served from the restructured output tree
//! (`blog/post/index.html`). This module walks every reference attribute in a
//! rendered fragment and re-targets embedded resources so they keep pointing
//! at the same file after the move.
//!
//! ## Classification
//!
//! | Value | Kind | Treatment |
//! |-------|------|-----------|
//! | `https://…`, `http://…`, `//host/…` | external | untouched |
//! | `mailto:…`, `tel:…` | protocol | untouched |
//! | `#section` | fragment | untouched |
//! | `data:…` or any other scheme | other scheme | untouched |
//! | `/img/x.png` | site-absolute | untouched |
//! | `img/x.png?v=2#top` | relative | rewritten (embeds only) |
//!
//! Only the path component of a relative reference is touched. The query and
//! fragment are carried through byte-for-byte.
//!
//! Hyperlinks (`a`, `area`) keep their authored path: structural navigation is
//! the navigation bar's job, and prose links are expected to point at clean
//! URLs already. The one exception is an empty `href`, which becomes `./`.

use crate::paths::{ContentPath, OutputPath, Resolver, relative_path};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("HTML rewriting failed: {0}")]
    Html(#[from] lol_html::errors::RewritingError),
}

/// Attributes that reference embedded resources, as `(selector, attribute)`.
pub const EMBED_ATTRIBUTES: &[(&str, &str)] = &[
    ("img[src]", "src"),
    ("video[src]", "src"),
    ("video[poster]", "poster"),
    ("audio[src]", "src"),
    ("source[src]", "src"),
    ("track[src]", "src"),
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("embed[src]", "src"),
    ("object[data]", "data"),
];

/// Hyperlink attributes, as `(selector, attribute)`.
pub const HYPERLINK_ATTRIBUTES: &[(&str, &str)] = &[("a[href]", "href"), ("area[href]", "href")];

/// Replacement for an empty hyperlink target.
pub const CURRENT_DIRECTORY: &str = "./";

/// How a reference value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `http://`, `https://` or protocol-relative `//`.
    External,
    /// `mailto:` or `tel:`.
    Protocol,
    /// In-page `#fragment`.
    Fragment,
    /// Any other URI scheme (`data:`, `ftp:`, …).
    OtherScheme,
    /// Rooted at the site root (`/path`).
    SiteAbsolute,
    /// Relative to the current document.
    Relative,
}

/// Classify a raw attribute value.
pub fn classify(value: &str) -> ReferenceKind {
    let lower = value.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
        ReferenceKind::External
    } else if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        ReferenceKind::Protocol
    } else if lower.starts_with('#') {
        ReferenceKind::Fragment
    } else if has_scheme(&lower) {
        ReferenceKind::OtherScheme
    } else if lower.starts_with('/') {
        ReferenceKind::SiteAbsolute
    } else {
        ReferenceKind::Relative
    }
}

/// RFC 3986 scheme: a letter, then letters/digits/`+-.`, then `:` before any
/// path, query or fragment delimiter.
fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// A reference split into its three components.
///
/// `query` keeps its leading `?` and `fragment` its leading `#`, so the
/// original value is exactly `path + query + fragment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitReference<'a> {
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

pub fn split_reference(value: &str) -> SplitReference<'_> {
    let (rest, fragment) = match value.find('#') {
        Some(i) => value.split_at(i),
        None => (value, ""),
    };
    let (path, query) = match rest.find('?') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    SplitReference {
        path,
        query,
        fragment,
    }
}

/// Rewrites references for one page.
#[derive(Debug, Clone, Copy)]
pub struct LinkRewriter<'a> {
    resolver: &'a Resolver,
    source: &'a ContentPath,
    output: &'a OutputPath,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(resolver: &'a Resolver, source: &'a ContentPath, output: &'a OutputPath) -> Self {
        Self {
            resolver,
            source,
            output,
        }
    }

    /// New value for an embedded-resource reference, or `None` to leave it.
    ///
    /// The path is resolved against the source file's directory, mapped to its
    /// output location, then expressed relative to this page's output directory.
    pub fn rewrite_embed(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if classify(value) != ReferenceKind::Relative {
            return None;
        }
        let parts = split_reference(value);
        if parts.path.is_empty() {
            return None;
        }

        let joined = match self.source.parent() {
            "" => parts.path.to_string(),
            dir => format!("{dir}/{}", parts.path),
        };
        // Escapes the content root: out of scope, leave as authored.
        let target = ContentPath::new(&joined)?;
        let location = self.resolver.output_location(&target);
        let path = relative_path(self.output.directory(), &location);

        Some(format!("{path}{}{}", parts.query, parts.fragment))
    }

    /// New value for a hyperlink, or `None` to leave it.
    pub fn rewrite_hyperlink(&self, value: &str) -> Option<String> {
        value.trim().is_empty().then(|| CURRENT_DIRECTORY.to_string())
    }
}

/// Rewrite every reference attribute in `html` for a page rendered from
/// `source` to `output`.
pub fn rewrite(
    html: &str,
    source: &ContentPath,
    output: &OutputPath,
    resolver: &Resolver,
) -> Result<String, RewriteError> {
    let rewriter = LinkRewriter::new(resolver, source, output);

    let mut handlers = Vec::with_capacity(EMBED_ATTRIBUTES.len() + HYPERLINK_ATTRIBUTES.len());
    for &(selector, attr) in EMBED_ATTRIBUTES {
        handlers.push(element!(selector, move |el| {
            if let Some(value) = el.get_attribute(attr)
                && let Some(new_value) = rewriter.rewrite_embed(&value)
            {
                el.set_attribute(attr, &new_value)?;
            }
            Ok(())
        }));
    }
    for &(selector, attr) in HYPERLINK_ATTRIBUTES {
        handlers.push(element!(selector, move |el| {
            if let Some(value) = el.get_attribute(attr)
                && let Some(new_value) = rewriter.rewrite_hyperlink(&value)
            {
                el.set_attribute(attr, &new_value)?;
            }
            Ok(())
        }));
    }

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )?;
    Ok(rewritten)
}
