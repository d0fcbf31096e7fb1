use crate::shared::hash::{ContentHash, content_hash};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Ring points per node. With a typical node count this keeps the load split
/// across nodes within roughly ±15% for uniformly distributed hashes.
pub const REPLICAS: u32 = 200;

#[derive(Debug, Error)]
pub enum RingError {
    #[error("no nodes registered on the ring")]
    EmptyRing,
}

/// Maps a content hash onto one of several CDN node names.
///
/// Each node owns `REPLICAS` points on a 32-bit ring; a hash is served by the
/// node owning the next point at or after the hash's own leading four bytes.
/// Membership changes only move the keys served by the touched points, so
/// adding or removing a host never invalidates caches cluster-wide. Content
/// hashes are already uniformly distributed, which is why their own bytes are
/// usable as ring keys without re-hashing.
#[derive(Debug, Clone, Default)]
pub struct ConsistentHashRing {
    points: BTreeMap<u32, String>,
}

impl ConsistentHashRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ring over the given node names.
    pub fn with_nodes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = Self::new();
        for name in names {
            ring.add_node(name.as_ref());
        }
        ring
    }

    /// Inserts the node's ring points. Re-adding an existing node is
    /// idempotent apart from reclaiming any points a collision had taken.
    pub fn add_node(&mut self, name: &str) {
        for i in 0..REPLICAS {
            self.points.insert(point_key(name, i), name.to_string());
        }
        debug!(target: "ring::add_node", node = name, points = self.points.len(), "Node added");
    }

    /// Removes the node's ring points. A point that a later insert took over
    /// belongs to the other node now and is left alone.
    pub fn remove_node(&mut self, name: &str) {
        for i in 0..REPLICAS {
            let key = point_key(name, i);
            if self.points.get(&key).is_some_and(|owner| owner == name) {
                self.points.remove(&key);
            }
        }
        debug!(target: "ring::remove_node", node = name, points = self.points.len(), "Node removed");
    }

    /// Assigns a content hash to a node: ceiling search over the sorted ring
    /// on the hash's leading four bytes, wrapping to the smallest point.
    pub fn assign(&self, hash: &ContentHash) -> Result<&str, RingError> {
        let key = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]);
        self.points
            .range(key..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, name)| name.as_str())
            .ok_or(RingError::EmptyRing)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

fn point_key(name: &str, replica: u32) -> u32 {
    let hash = content_hash(format!("{name}-{replica}").as_bytes());
    u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
}
