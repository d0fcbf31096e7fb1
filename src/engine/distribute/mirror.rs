use crate::engine::distribute::errors::DistributeError;
use crate::engine::index::{AllIndex, ResourceIndex};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One CDN mirror host: a name for diagnostics and the docroot its content
/// is written under. Transport is a mounted filesystem path; network
/// plumbing beyond that is not this layer's concern.
#[derive(Debug, Clone)]
pub struct Mirror {
    host: String,
    docroot: PathBuf,
}

impl Mirror {
    pub fn new(host: &str, docroot: impl Into<PathBuf>) -> Self {
        Self {
            host: host.to_string(),
            docroot: docroot.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn docroot(&self) -> &Path {
        &self.docroot
    }

    fn index_path(&self, index_name: &str) -> PathBuf {
        self.docroot.join(format!("{index_name}.idx"))
    }

    fn all_index_path(&self, index_name: &str) -> PathBuf {
        self.docroot.join(format!("{index_name}-all.idx"))
    }

    fn io_err(&self, source: io::Error) -> DistributeError {
        DistributeError::MirrorIo {
            host: self.host.clone(),
            source,
        }
    }

    /// Writes a blob under the docroot, creating parent directories.
    /// Idempotent per fingerprinted path: rewriting identical content is
    /// harmless, which is what makes retrying a failed run safe.
    pub async fn store_blob(&self, fingerprinted_path: &str, bytes: &[u8]) -> Result<(), DistributeError> {
        let target = self.docroot.join(fingerprinted_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| self.io_err(e))?;
        debug!(
            target: "distribute::mirror",
            host = self.host,
            path = fingerprinted_path,
            len = bytes.len(),
            "Stored blob"
        );
        Ok(())
    }

    pub async fn blob_exists(&self, fingerprinted_path: &str) -> bool {
        tokio::fs::try_exists(self.docroot.join(fingerprinted_path))
            .await
            .unwrap_or(false)
    }

    /// Loads this mirror's index; a missing file is an empty index (a mirror
    /// that has never been published to).
    pub async fn load_index(&self, index_name: &str) -> Result<ResourceIndex, DistributeError> {
        match tokio::fs::read_to_string(self.index_path(index_name)).await {
            Ok(text) => Ok(ResourceIndex::from_text(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ResourceIndex::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    pub async fn load_all_index(&self, index_name: &str) -> Result<AllIndex, DistributeError> {
        match tokio::fs::read_to_string(self.all_index_path(index_name)).await {
            Ok(text) => Ok(AllIndex::from_text(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(AllIndex::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    pub async fn save_index(
        &self,
        index_name: &str,
        index: &ResourceIndex,
    ) -> Result<(), DistributeError> {
        let path = self.index_path(index_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        tokio::fs::write(&path, index.to_text())
            .await
            .map_err(|e| self.io_err(e))?;
        info!(
            target: "distribute::mirror",
            host = self.host,
            index = index_name,
            entries = index.len(),
            "Persisted index"
        );
        Ok(())
    }

    pub async fn save_all_index(
        &self,
        index_name: &str,
        all: &AllIndex,
    ) -> Result<(), DistributeError> {
        let path = self.all_index_path(index_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        tokio::fs::write(&path, all.to_text())
            .await
            .map_err(|e| self.io_err(e))?;
        info!(
            target: "distribute::mirror",
            host = self.host,
            index = index_name,
            entries = all.len(),
            "Persisted all-index"
        );
        Ok(())
    }
}
