use crate::engine::index::Label;

pub struct LabelFactory {
    path: String,
    folder: String,
    bytes: Vec<u8>,
}

impl LabelFactory {
    pub fn new() -> Self {
        Self {
            path: "img/test.png".into(),
            folder: "folder".into(),
            bytes: b"abcd".to_vec(),
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_folder(mut self, folder: &str) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes = bytes.to_vec();
        self
    }

    pub fn create(self) -> Label {
        Label::fingerprinted(&self.path, &self.folder, &self.bytes).unwrap()
    }
}
