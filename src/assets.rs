//! Site stylesheet publishing.
//!
//! The stylesheet is written once per build under a content-hashed name:
//!
//! ```text
//! style.3f9a1c0e.css
//! ```
//!
//! The hash is the first [`HASH_LENGTH`] hex digits of the SHA-256 of the file
//! bytes, so any edit produces a new URL and browsers never serve a stale copy
//! while unchanged builds keep the same name.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Hex digits of the content hash kept in the published name.
pub const HASH_LENGTH: usize = 8;

const STYLESHEET_STEM: &str = "style";
const DEFAULT_STYLESHEET: &str = include_str!("../static/style.css");

/// A stylesheet ready to publish at the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// Output-root-relative file name, e.g. `style.3f9a1c0e.css`.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Stylesheet {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let file_name = hashed_name(&bytes);
        Self { file_name, bytes }
    }

    /// The built-in stylesheet.
    pub fn builtin() -> Self {
        Self::from_bytes(DEFAULT_STYLESHEET.as_bytes().to_vec())
    }

    /// Read a custom stylesheet from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// Write under `output_root`, returning the destination.
    pub fn write(&self, output_root: &Path) -> io::Result<std::path::PathBuf> {
        fs::create_dir_all(output_root)?;
        let dest = output_root.join(&self.file_name);
        fs::write(&dest, &self.bytes)?;
        Ok(dest)
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// `style.<hash>.css` for the given stylesheet contents.
pub fn hashed_name(bytes: &[u8]) -> String {
    let hash = content_hash(bytes);
    format!("{STYLESHEET_STEM}.{}.css", &hash[..HASH_LENGTH])
}
