use crate::engine::index::errors::IndexError;
use crate::shared::hash::{ContentHash, content_hash, hash_hex};
use crate::shared::path::{file_name, is_root_relative, strip_leading_slash};

/// One index entry: the logical path of an asset, the content-addressed path
/// it is served under, and the hash the latter was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    original_path: String,
    fingerprinted_path: String,
    content_hash: ContentHash,
}

impl Label {
    /// Builds a label with a content-addressed path:
    /// `hex[0..3]/hex[3..]/<folder>/<file name>`.
    ///
    /// `folder` is a caller-supplied grouping (typically a module name); the
    /// hash prefix alone already guarantees uniqueness, the folder only keeps
    /// the tree legible.
    pub fn fingerprinted(
        original_path: &str,
        folder: &str,
        bytes: &[u8],
    ) -> Result<Self, IndexError> {
        let hash = content_hash(bytes);
        let hex = hash_hex(&hash);
        let fingerprinted_path = format!(
            "{}/{}/{}/{}",
            &hex[..3],
            &hex[3..],
            folder,
            file_name(original_path)
        );
        Self::new(original_path, &fingerprinted_path, hash)
    }

    /// Builds a label whose served path is stable across content changes:
    /// `<path_prefix><original_path>`. Used for assets that must keep a
    /// permanent URL.
    pub fn stable(original_path: &str, path_prefix: &str, bytes: &[u8]) -> Result<Self, IndexError> {
        let hash = content_hash(bytes);
        let fingerprinted_path = format!("{}{}", strip_leading_slash(path_prefix), original_path);
        Self::new(original_path, &fingerprinted_path, hash)
    }

    pub fn new(
        original_path: &str,
        fingerprinted_path: &str,
        content_hash: ContentHash,
    ) -> Result<Self, IndexError> {
        if !is_root_relative(original_path) {
            return Err(IndexError::InvalidPath(original_path.to_string()));
        }
        if !is_root_relative(fingerprinted_path) {
            return Err(IndexError::InvalidPath(fingerprinted_path.to_string()));
        }
        if fingerprinted_path.contains(':') {
            return Err(IndexError::ReservedDelimiter(fingerprinted_path.to_string()));
        }
        Ok(Self {
            original_path: original_path.to_string(),
            fingerprinted_path: fingerprinted_path.to_string(),
            content_hash,
        })
    }

    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn fingerprinted_path(&self) -> &str {
        &self.fingerprinted_path
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }
}
