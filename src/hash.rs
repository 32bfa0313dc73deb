//! Content-addressed naming for cached artifacts
//!
//! Artifacts are named after a SHA256 digest of the inputs that produced
//! them, so untrusted input (message text, URLs) never ends up in a file
//! name. Same inputs = same name.

use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Length of a hex-encoded SHA256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Build the cache file name for an ordered tuple of inputs
///
/// Each input's `Display` form is concatenated in order before hashing, so
/// callers must pass inputs in a fixed order. No separator is inserted.
/// An empty slice hashes the empty byte sequence.
///
/// ```
/// let name = hoard::hash::name_for(&[&"hello there", &"en-US", &1.25], "mp3");
/// assert!(name.ends_with(".mp3"));
/// ```
pub fn name_for(inputs: &[&dyn Display], extension: &str) -> String {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input.to_string().as_bytes());
    }
    let digest = hasher.finalize();

    format!("{}.{}", hex::encode(digest), extension)
}

/// Check that a name has the `<hex digest>.<extension>` shape
///
/// Anything else is not ours: it may be a stray file in the cache directory,
/// or a caller-built name that could escape the cache root.
pub fn is_content_name(name: &str) -> bool {
    let Some((digest, extension)) = name.split_once('.') else {
        return false;
    };

    digest.len() == DIGEST_HEX_LEN
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        && !extension.is_empty()
        && extension
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.')
        && !extension.contains("..")
}
