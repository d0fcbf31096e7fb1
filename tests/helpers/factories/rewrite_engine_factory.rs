use crate::engine::index::{Label, ResourceIndex};
use crate::serve::node_table::NodeTable;
use crate::serve::rewrite::RewriteEngine;
use crate::serve::url_calculator::UrlCalculator;
use std::sync::Arc;

/// Builds a rewrite engine over an in-memory index and a default two-node
/// table. Add managed resources with `with_resource`.
pub struct RewriteEngineFactory {
    index: ResourceIndex,
    table_text: String,
}

impl RewriteEngineFactory {
    pub fn new() -> Self {
        Self {
            index: ResourceIndex::new(),
            table_text: super::NodeTableFactory::new().text(),
        }
    }

    /// Registers `path` with content `bytes` under folder "folder".
    pub fn with_resource(mut self, path: &str, bytes: &[u8]) -> Self {
        let label = Label::fingerprinted(path, "folder", bytes).unwrap();
        self.index.add(&label).unwrap();
        self
    }

    pub fn with_table_text(mut self, text: &str) -> Self {
        self.table_text = text.to_string();
        self
    }

    pub fn create(self) -> Arc<RewriteEngine> {
        let table = NodeTable::parse(&self.table_text).unwrap();
        Arc::new(RewriteEngine::new(self.index, UrlCalculator::new(table)))
    }
}
