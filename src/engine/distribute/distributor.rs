use crate::engine::distribute::errors::DistributeError;
use crate::engine::distribute::mirror::Mirror;
use crate::engine::index::{AllIndex, Label, ResourceIndex};
use futures::future::try_join_all;
use std::collections::HashSet;
use tracing::{debug, info};

/// Publish-time orchestrator for one logical docroot across N mirrors.
///
/// Guarantees per run: each blob is written at most once per unique
/// fingerprinted path, every mirror ends the run with a byte-identical
/// index, and fingerprints no longer referenced by any run are dropped from
/// the all-index (their blobs are left for the explicit sweep).
///
/// `open`/`close` form the transaction boundary: any failure in between
/// aborts the whole run, which is safe to retry because `write` is
/// idempotent and `open` re-derives state from what the mirrors hold.
/// A single run must be driven by one serialized extraction loop;
/// parallelism happens across mirrors, never across resources.
#[derive(Debug)]
pub struct Distributor {
    mirrors: Vec<Mirror>,
    index_name: String,
    prev: ResourceIndex,
    all: AllIndex,
    next: ResourceIndex,
    /// Fingerprinted paths already shipped during this run.
    written: HashSet<String>,
}

impl Distributor {
    /// Loads every mirror's persisted state and verifies the mirrors agree.
    /// Divergent mirrors are a fatal condition: one host can be repaired by
    /// copying from a consistent one, but never silently reconciled here.
    pub async fn open(mirrors: Vec<Mirror>, index_name: &str) -> Result<Self, DistributeError> {
        assert!(!mirrors.is_empty(), "at least one mirror is required");
        info!(
            target: "distribute::open",
            mirrors = mirrors.len(),
            index = index_name,
            "Opening distributor"
        );

        let indexes = try_join_all(mirrors.iter().map(|m| m.load_index(index_name))).await?;
        let alls = try_join_all(mirrors.iter().map(|m| m.load_all_index(index_name))).await?;

        for i in 1..mirrors.len() {
            if indexes[i] != indexes[0] || alls[i] != alls[0] {
                return Err(DistributeError::IndexMismatch {
                    left: mirrors[0].host().to_string(),
                    right: mirrors[i].host().to_string(),
                    index_name: index_name.to_string(),
                });
            }
        }

        let mut indexes = indexes;
        let mut alls = alls;
        Ok(Self {
            mirrors,
            index_name: index_name.to_string(),
            prev: indexes.swap_remove(0),
            all: alls.swap_remove(0),
            next: ResourceIndex::new(),
            written: HashSet::new(),
        })
    }

    /// Publishes one labeled blob. Content already tracked by the all-index
    /// under the same hash is assumed deployed on every mirror and skipped
    /// (`false`); otherwise the blob goes out to all mirrors concurrently
    /// (`true`). The label is recorded in the run's index either way; the
    /// served index must list every path touched this run, including reuse.
    pub async fn write(&mut self, label: &Label, bytes: &[u8]) -> Result<bool, DistributeError> {
        let fingerprinted = label.fingerprinted_path();
        self.next.add(label)?;

        if self.all.contains(fingerprinted, label.content_hash())
            || self.written.contains(fingerprinted)
        {
            debug!(
                target: "distribute::write",
                path = label.original_path(),
                fingerprinted,
                "Content already deployed, skipping I/O"
            );
            return Ok(false);
        }

        try_join_all(
            self.mirrors
                .iter()
                .map(|m| m.store_blob(fingerprinted, bytes)),
        )
        .await?;
        self.written.insert(fingerprinted.to_string());
        debug!(
            target: "distribute::write",
            path = label.original_path(),
            fingerprinted,
            mirrors = self.mirrors.len(),
            "Blob distributed"
        );
        Ok(true)
    }

    /// Merges this run into the all-index (superseded fingerprints from the
    /// previous run release a reference, current ones take one; zero-count
    /// entries drop out) and persists the run index plus the all-index to
    /// every mirror. Orphaned blobs stay on disk for the separate sweep;
    /// deleting on the hot path would turn a failed publish into data loss.
    pub async fn close(mut self) -> Result<ResourceIndex, DistributeError> {
        for label in self.prev.labels() {
            self.all.remove_reference_opt(label.fingerprinted_path());
        }
        for label in self.next.labels() {
            self.all
                .add_reference(label.fingerprinted_path(), label.content_hash())?;
        }

        try_join_all(
            self.mirrors
                .iter()
                .map(|m| m.save_index(&self.index_name, &self.next)),
        )
        .await?;
        try_join_all(
            self.mirrors
                .iter()
                .map(|m| m.save_all_index(&self.index_name, &self.all)),
        )
        .await?;

        info!(
            target: "distribute::close",
            entries = self.next.len(),
            tracked = self.all.len(),
            "Publish run committed"
        );
        Ok(self.next)
    }
}
