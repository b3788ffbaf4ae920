//! Heading anchors.
//!
//! Every `h1`–`h6` in a rendered fragment gets a deterministic `id` so that
//! `#fragment` links, both in-page and from other pages, have something to
//! land on. Ids come from the heading text:
//!
//! ```text
//! "Getting Started!"   →  getting-started
//! "Overview"           →  overview
//! "Overview" (again)   →  overview-1
//! ```
//!
//! Headings that already carry an `id` keep it, and that id is reserved so no
//! generated id collides with it.

use crate::rewrite::RewriteError;
use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::LazyLock;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Id used when a heading's text has no word characters at all.
pub const FALLBACK_ID: &str = "section";

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turn heading inner HTML into an id.
///
/// Lowercases, strips tags, decodes entities, drops everything that is
/// neither a word character nor whitespace, then joins the remaining words
/// with single hyphens.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let untagged = TAGS.replace_all(&lower, "");
    let decoded = html_escape::decode_html_entities(&untagged);
    let words = NON_WORD.replace_all(&decoded, "");
    WHITESPACE.replace_all(words.trim(), "-").into_owned()
}

/// Hands out ids that are unique within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    used: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an id as taken without generating it.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    /// Slug for `text`, suffixed `-1`, `-2`, … until unused.
    pub fn unique(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            slug if slug.is_empty() => FALLBACK_ID.to_string(),
            slug => slug,
        };
        let mut candidate = base.clone();
        let mut n = 0;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// A heading found in a fragment, with the id it ends up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    /// Plain text content: tags removed, entities decoded.
    pub text: String,
    pub id: String,
}

#[derive(Debug, Default)]
struct RawHeading {
    level: u8,
    text: String,
    existing_id: Option<String>,
}

/// Add ids to every heading in `html`.
///
/// Returns the rewritten fragment and the headings in document order.
pub fn anchor_headings(html: &str) -> Result<(String, Vec<Heading>), RewriteError> {
    let raw = collect_headings(html)?;

    let mut slugger = Slugger::new();
    for id in raw.iter().filter_map(|h| h.existing_id.as_deref()) {
        slugger.reserve(id);
    }
    let headings: Vec<Heading> = raw
        .into_iter()
        .map(|h| {
            let id = match h.existing_id {
                Some(id) => id,
                None => slugger.unique(&h.text),
            };
            Heading {
                level: h.level,
                text: plain_text(&h.text),
                id,
            }
        })
        .collect();

    let counter = Cell::new(0usize);
    let next = &counter;
    let headings_ref = &headings;
    let handlers = HEADING_TAGS
        .iter()
        .map(|&tag| {
            element!(tag, move |el| {
                let idx = next.get();
                next.set(idx + 1);
                if el.get_attribute("id").is_none()
                    && let Some(heading) = headings_ref.get(idx)
                {
                    el.set_attribute("id", &heading.id)?;
                }
                Ok(())
            })
        })
        .collect();

    let anchored = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )?;
    Ok((anchored, headings))
}

/// Decoded text with runs of whitespace collapsed to single spaces.
fn plain_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First pass: heading levels, text and pre-existing ids, in document order.
fn collect_headings(html: &str) -> Result<Vec<RawHeading>, RewriteError> {
    let found: RefCell<Vec<RawHeading>> = RefCell::new(Vec::new());

    let mut handlers = Vec::with_capacity(HEADING_TAGS.len() * 2);
    for (level, &tag) in (1u8..).zip(HEADING_TAGS.iter()) {
        let found = &found;
        handlers.push(element!(tag, move |el| {
            found.borrow_mut().push(RawHeading {
                level,
                text: String::new(),
                existing_id: el.get_attribute("id"),
            });
            Ok(())
        }));
        handlers.push(text!(tag, move |chunk| {
            if let Some(current) = found.borrow_mut().last_mut() {
                current.text.push_str(chunk.as_str());
            }
            Ok(())
        }));
    }

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )?;
    Ok(found.into_inner())
}
