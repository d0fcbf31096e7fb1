use crate::engine::extract::resource::{ExtractError, Extractor, Resource, ResourceData};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extractor over a local directory tree. Yields every regular file under
/// the root with a slash-separated root-relative path; contents are read
/// lazily when the distributor asks for them.
#[derive(Debug)]
pub struct DirExtractor {
    root: PathBuf,
    folder: String,
}

impl DirExtractor {
    pub fn new(root: impl Into<PathBuf>, folder: &str) -> Self {
        Self {
            root: root.into(),
            folder: folder.to_string(),
        }
    }

    fn collect(&self, dir: &Path, out: &mut Vec<Result<Resource, ExtractError>>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(target: "extract::dir", dir = ?dir, error = ?e, "Failed to read directory");
                out.push(Err(ExtractError::Io(e)));
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.collect(&path, out);
            } else {
                out.push(self.resource_for(&path));
            }
        }
    }

    fn resource_for(&self, path: &Path) -> Result<Resource, ExtractError> {
        let relative = path
            .strip_prefix(&self.root)
            .ok()
            .and_then(|p| p.to_str())
            .map(|p| p.replace('\\', "/"))
            .ok_or_else(|| ExtractError::InvalidPath(path.display().to_string()))?;
        let meta = fs::metadata(path)?;

        debug!(target: "extract::dir", path = relative, len = meta.len(), "Found resource");
        Ok(Resource {
            path: relative,
            len: meta.len(),
            last_modified: meta.modified().ok(),
            folder: self.folder.clone(),
            data: ResourceData::File(path.to_path_buf()),
        })
    }
}

impl Extractor for DirExtractor {
    fn iterate(
        &self,
    ) -> Result<Box<dyn Iterator<Item = Result<Resource, ExtractError>> + '_>, ExtractError> {
        let mut resources = Vec::new();
        let root = self.root.clone();
        self.collect(&root, &mut resources);
        Ok(Box::new(resources.into_iter()))
    }
}
