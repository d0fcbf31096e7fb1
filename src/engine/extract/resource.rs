use std::borrow::Cow;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("path '{0}' cannot be expressed root-relative")]
    InvalidPath(String),
}

/// One asset as handed to the publish pipeline: a root-relative path, file
/// metadata, a grouping folder, and the content (inline or lazily read).
/// Never persisted.
#[derive(Debug)]
pub struct Resource {
    pub path: String,
    pub len: u64,
    pub last_modified: Option<SystemTime>,
    pub folder: String,
    pub data: ResourceData,
}

#[derive(Debug)]
pub enum ResourceData {
    Inline(Vec<u8>),
    File(PathBuf),
}

impl Resource {
    pub fn inline(path: &str, folder: &str, bytes: Vec<u8>) -> Self {
        Self {
            path: path.to_string(),
            len: bytes.len() as u64,
            last_modified: None,
            folder: folder.to_string(),
            data: ResourceData::Inline(bytes),
        }
    }

    /// Content bytes, reading from disk on demand for file-backed resources.
    pub fn bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.data {
            ResourceData::Inline(bytes) => Ok(Cow::Borrowed(bytes)),
            ResourceData::File(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}

/// A source of resources for one publish run: a lazy, finite sequence that
/// can be restarted by calling `iterate` again. Archive, VCS and remote-API
/// adapters implement this outside the core; `DirExtractor` ships in-tree.
pub trait Extractor {
    fn iterate(&self)
    -> Result<Box<dyn Iterator<Item = Result<Resource, ExtractError>> + '_>, ExtractError>;
}
