use crate::engine::index::codec::{format_line, parse_line};
use crate::engine::index::errors::IndexError;
use crate::shared::hash::{ContentHash, hash_hex, parse_hash_hex};
use std::collections::BTreeMap;
use tracing::debug;

/// Reference-counted bookkeeping over every fingerprint still referenced by
/// any published index. Keyed by fingerprinted path, never used for
/// serve-time lookup; its only consumer is garbage collection.
///
/// Same text format as the index, with `ref_count:hex(hash)` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllIndex {
    entries: BTreeMap<String, AllEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AllEntry {
    refs: u64,
    hash: ContentHash,
}

impl AllIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the fingerprinted path is already tracked with this exact
    /// hash, the signal that its blob is deployed on every mirror.
    pub fn contains(&self, fingerprinted_path: &str, hash: &ContentHash) -> bool {
        self.entries
            .get(fingerprinted_path)
            .is_some_and(|e| &e.hash == hash)
    }

    /// Increments the reference count, inserting at 1 for a new path. A path
    /// re-registered with a different hash means the fingerprint scheme was
    /// violated somewhere and the index can no longer be trusted.
    pub fn add_reference(
        &mut self,
        fingerprinted_path: &str,
        hash: &ContentHash,
    ) -> Result<u64, IndexError> {
        match self.entries.get_mut(fingerprinted_path) {
            None => {
                self.entries.insert(
                    fingerprinted_path.to_string(),
                    AllEntry {
                        refs: 1,
                        hash: *hash,
                    },
                );
                Ok(1)
            }
            Some(entry) if &entry.hash == hash => {
                entry.refs += 1;
                Ok(entry.refs)
            }
            Some(entry) => Err(IndexError::Conflict {
                path: fingerprinted_path.to_string(),
                existing: hash_hex(&entry.hash),
                incoming: hash_hex(hash),
            }),
        }
    }

    /// Decrements the reference count if the path is tracked; at zero the
    /// entry is dropped entirely (its blob becomes sweepable). Unknown paths
    /// are ignored, so replaying a supersede is harmless.
    pub fn remove_reference_opt(&mut self, fingerprinted_path: &str) {
        let Some(entry) = self.entries.get_mut(fingerprinted_path) else {
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            debug!(
                target: "index::remove_reference",
                path = fingerprinted_path,
                "Reference count reached zero, dropping entry"
            );
            self.entries.remove(fingerprinted_path);
        }
    }

    pub fn ref_count(&self, fingerprinted_path: &str) -> u64 {
        self.entries.get(fingerprinted_path).map_or(0, |e| e.refs)
    }

    /// True if the fingerprinted path is tracked, regardless of hash.
    pub fn tracks(&self, fingerprinted_path: &str) -> bool {
        self.entries.contains_key(fingerprinted_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (path, entry) in &self.entries {
            let value = format!("{}:{}", entry.refs, hash_hex(&entry.hash));
            out.push_str(&format_line(path, &value));
            out.push('\n');
        }
        out
    }

    pub fn from_text(text: &str) -> Result<Self, IndexError> {
        let mut index = Self::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let Some((key, value)) = parse_line(line, line_no)? else {
                continue;
            };
            let (count, hex) = value.split_once(':').ok_or_else(|| IndexError::Corrupt {
                line: line_no,
                reason: format!("missing ':' delimiter in value for '{key}'"),
            })?;
            let refs: u64 = count.parse().map_err(|_| IndexError::Corrupt {
                line: line_no,
                reason: format!("bad reference count '{count}' for '{key}'"),
            })?;
            if refs == 0 {
                return Err(IndexError::Corrupt {
                    line: line_no,
                    reason: format!("zero reference count persisted for '{key}'"),
                });
            }
            let hash = parse_hash_hex(hex).ok_or_else(|| IndexError::Corrupt {
                line: line_no,
                reason: format!("bad content hash '{hex}' for '{key}'"),
            })?;
            index.entries.insert(key, AllEntry { refs, hash });
        }
        Ok(index)
    }
}
