use crate::engine::index::Label;
use crate::engine::ring::ConsistentHashRing;
use crate::serve::errors::RewriteError;
use crate::serve::node_table::{NodeTable, Scheme};
use url::Url;

/// Turns a label into the final CDN URL: the ring picks the node from the
/// content hash, the node table supplies that node's base URL for the page's
/// scheme, and the fingerprinted path is appended.
#[derive(Debug)]
pub struct UrlCalculator {
    table: NodeTable,
    ring: ConsistentHashRing,
}

impl UrlCalculator {
    pub fn new(table: NodeTable) -> Self {
        let ring = ConsistentHashRing::with_nodes(table.node_names());
        Self { table, ring }
    }

    pub fn calculate_url(&self, label: &Label, base: &Url) -> Result<String, RewriteError> {
        let node = self.ring.assign(label.content_hash())?;
        let scheme = Scheme::of(base);
        let prefix =
            self.table
                .base_for(scheme, node)
                .ok_or_else(|| RewriteError::UnconfiguredNode {
                    node: node.to_string(),
                    scheme: scheme.as_str(),
                })?;
        Ok(format!("{prefix}{}", label.fingerprinted_path()))
    }
}
