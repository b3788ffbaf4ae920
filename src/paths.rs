//! Content path → output artifact resolution.
//!
//! Every markdown file in the content tree becomes exactly one HTML artifact.
//! Artifacts are named `.../index` so the site is served with clean,
//! extensionless directory URLs:
//!
//! ```text
//! content/                       dist/
//! ├── README.md   (home)    →    ├── index.html
//! ├── 404.md                →    ├── 404.html
//! ├── about.md              →    ├── about/index.html
//! └── blog/                      └── blog/
//!     ├── index.md          →        ├── index.html
//!     └── first-post.md     →        └── first-post/index.html
//! ```
//!
//! ## Rules
//!
//! Resolution is an ordered list of rules evaluated top to bottom; the first
//! rule that claims a path wins:
//!
//! | Rule | Matches | Output |
//! |------|---------|--------|
//! | `home` | root-level file named like the configured home (or `index.md`) | `index` |
//! | `not-found` | root-level `404.md` | `404` |
//! | `directory-index` | any `index.md` | `<dir>/index` |
//! | `page` | everything else | `<dir>/<stem>/index` |
//!
//! The home basename must be the same for every call in a build. The
//! [`Resolver`] carried by the build context holds it, so navigation and
//! asset rewriting always agree on where a file ends up.
//!
//! All paths here are `/`-separated strings relative to the content or output
//! root, independent of the host platform's separator.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Extension that marks a file as a content page.
pub const CONTENT_EXTENSION: &str = "md";
/// Root-level filename that is always treated as the home page.
pub const HOME_FILENAME: &str = "index.md";
/// Root-level filename rendered to the reserved not-found artifact.
pub const NOT_FOUND_FILENAME: &str = "404.md";
/// Filename that stands for its containing directory.
pub const DIRECTORY_INDEX_FILENAME: &str = "index.md";
/// Extension appended to every output artifact.
pub const ARTIFACT_EXTENSION: &str = "html";

const INDEX: &str = "index";
const NOT_FOUND: &str = "404";

/// A file location relative to the content root.
///
/// Always normalized: no empty, `.` or `..` segments, no leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentPath(String);

impl ContentPath {
    /// Parse a `/`-separated relative path.
    ///
    /// Returns `None` for absolute paths, empty paths, and paths that climb
    /// above the content root.
    pub fn new(path: &str) -> Option<Self> {
        if path.starts_with('/') {
            return None;
        }
        normalize(path).filter(|p| !p.is_empty()).map(Self)
    }

    /// Build from a filesystem path that is already relative to the content root.
    pub fn from_relative(path: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment, e.g. `post.md` for `blog/post.md`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }

    /// Containing directory, `""` for root-level files.
    pub fn parent(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// File name without its last extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    pub fn is_root_level(&self) -> bool {
        !self.0.contains('/')
    }

    /// Whether the file is a content page (case-insensitive extension match).
    pub fn is_content(&self) -> bool {
        let name = self.file_name();
        name.rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(CONTENT_EXTENSION))
    }

    /// Location of this file under `root` on the host filesystem.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An artifact location relative to the output root, without extension.
///
/// `index`, `404`, `about/index`, `blog/first-post/index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPath(String);

impl OutputPath {
    /// The site root artifact.
    pub fn root() -> Self {
        Self(INDEX.to_string())
    }

    fn index_of(dir: &str) -> Self {
        if dir.is_empty() {
            Self::root()
        } else {
            Self(format!("{dir}/{INDEX}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a directory-style `.../index` artifact.
    pub fn is_index(&self) -> bool {
        self.0 == INDEX || self.0.ends_with("/index")
    }

    /// The directory the artifact lives in; relative references inside the
    /// page are resolved by browsers against this directory.
    pub fn directory(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Artifact file name relative to the output root, e.g. `about/index.html`.
    pub fn file_name(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.0)
    }

    /// Artifact location under `root` on the host filesystem.
    pub fn file_path(&self, root: &Path) -> PathBuf {
        let file = self.file_name();
        file.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// The address a link should point at: the bare directory for index
    /// artifacts (the `index` suffix stripped), the file itself otherwise.
    pub fn link_target(&self) -> String {
        if self.is_index() {
            self.directory().to_string()
        } else {
            self.file_name()
        }
    }

    /// Link to this artifact from a page at `from`.
    pub fn href_from(&self, from: &OutputPath) -> String {
        relative_path(from.directory(), &self.link_target())
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Resolution rules
// ============================================================================

/// A resolution rule: claims a path by returning its output, or passes.
pub type Rule = fn(&ContentPath, &str) -> Option<OutputPath>;

/// Special cases, in priority order. Anything unclaimed falls to [`page_rule`].
pub const RULES: &[(&str, Rule)] = &[
    ("home", home_rule),
    ("not-found", not_found_rule),
    ("directory-index", directory_index_rule),
];

/// Root-level home file → site root.
pub fn home_rule(path: &ContentPath, home: &str) -> Option<OutputPath> {
    let name = path.file_name();
    (path.is_root_level() && (name == home || name == HOME_FILENAME)).then(OutputPath::root)
}

/// Root-level `404.md` → top-level `404` artifact.
pub fn not_found_rule(path: &ContentPath, _home: &str) -> Option<OutputPath> {
    (path.is_root_level() && path.file_name() == NOT_FOUND_FILENAME)
        .then(|| OutputPath(NOT_FOUND.to_string()))
}

/// `dir/index.md` → `dir/index`.
pub fn directory_index_rule(path: &ContentPath, _home: &str) -> Option<OutputPath> {
    (path.file_name() == DIRECTORY_INDEX_FILENAME).then(|| OutputPath::index_of(path.parent()))
}

/// `dir/name.md` → `dir/name/index`.
pub fn page_rule(path: &ContentPath) -> OutputPath {
    match path.parent() {
        "" => OutputPath::index_of(path.stem()),
        dir => OutputPath::index_of(&format!("{dir}/{}", path.stem())),
    }
}

/// Map a content file to its output artifact.
pub fn resolve(path: &ContentPath, home: &str) -> OutputPath {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(path, home))
        .unwrap_or_else(|| page_rule(path))
}

/// Name of the rule that claims `path`, for diagnostics.
pub fn matching_rule(path: &ContentPath, home: &str) -> &'static str {
    RULES
        .iter()
        .find(|(_, rule)| rule(path, home).is_some())
        .map_or("page", |(name, _)| name)
}

/// Resolution bound to one build's home basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    home: String,
}

impl Resolver {
    pub fn new(home_basename: impl Into<String>) -> Self {
        Self {
            home: home_basename.into(),
        }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn resolve(&self, path: &ContentPath) -> OutputPath {
        resolve(path, &self.home)
    }

    /// Name of the rule that places `path`.
    pub fn rule(&self, path: &ContentPath) -> &'static str {
        matching_rule(path, &self.home)
    }

    /// Where any file from the content tree lands in the output tree.
    ///
    /// Content pages go through [`resolve`]; every other file is copied to
    /// its mirrored location.
    pub fn output_location(&self, path: &ContentPath) -> String {
        if path.is_content() {
            self.resolve(path).file_name()
        } else {
            path.as_str().to_string()
        }
    }
}

// ============================================================================
// Path arithmetic
// ============================================================================

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Lexically normalize a relative path, folding `.` and `..` segments.
///
/// Returns `None` if the path climbs above its starting point.
pub fn normalize(path: &str) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();
    for seg in segments(path) {
        if seg == ".." {
            stack.pop()?;
        } else {
            stack.push(seg);
        }
    }
    Some(stack.join("/"))
}

/// Express `to` relative to the directory `from_dir`. Both are root-relative.
///
/// Returns `.` when the two coincide.
pub fn relative_path(from_dir: &str, to: &str) -> String {
    let from: Vec<&str> = segments(from_dir).collect();
    let to: Vec<&str> = segments(to).collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", from.len() - common).collect();
    parts.extend_from_slice(&to[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
