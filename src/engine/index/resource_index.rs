use crate::engine::index::codec::{format_line, parse_line};
use crate::engine::index::errors::IndexError;
use crate::engine::index::label::Label;
use crate::shared::hash::{hash_hex, parse_hash_hex};
use std::collections::BTreeMap;
use tracing::debug;

/// The content index: an ordered mapping from original asset path to
/// fingerprinted path + content hash. One instance is built fresh per publish
/// run; persisted copies on the mirrors are the durable form.
///
/// Serialized as one `key=value` line per entry with
/// `value = fingerprinted_path + ":" + hex(hash)`. The ordered map keeps
/// saves deterministic, so every mirror holds a byte-identical file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    entries: BTreeMap<String, Label>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a label. Returns `true` if the entry is new, `false` on an
    /// idempotent duplicate (same path, same fingerprint and hash: how
    /// re-publishing unchanged content across several containing artifacts
    /// is tolerated). A duplicate path with a *different* value is a
    /// conflict and fails the run.
    pub fn add(&mut self, label: &Label) -> Result<bool, IndexError> {
        match self.entries.get(label.original_path()) {
            None => {
                self.entries
                    .insert(label.original_path().to_string(), label.clone());
                Ok(true)
            }
            Some(existing) if existing == label => {
                debug!(
                    target: "index::add",
                    path = label.original_path(),
                    "Duplicate add of identical label"
                );
                Ok(false)
            }
            Some(existing) => Err(IndexError::Conflict {
                path: label.original_path().to_string(),
                existing: format!(
                    "{}:{}",
                    existing.fingerprinted_path(),
                    hash_hex(existing.content_hash())
                ),
                incoming: format!(
                    "{}:{}",
                    label.fingerprinted_path(),
                    hash_hex(label.content_hash())
                ),
            }),
        }
    }

    pub fn lookup(&self, original_path: &str) -> Option<&Label> {
        self.entries.get(original_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.entries.values()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (path, label) in &self.entries {
            let value = format!(
                "{}:{}",
                label.fingerprinted_path(),
                hash_hex(label.content_hash())
            );
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
            // The fingerprinted path is free of ':' by construction, so the
            // last ':' always splits path from hash.
            let (fingerprinted_path, hex) =
                value.rsplit_once(':').ok_or_else(|| IndexError::Corrupt {
                    line: line_no,
                    reason: format!("missing ':' delimiter in value for '{key}'"),
                })?;
            let hash = parse_hash_hex(hex).ok_or_else(|| IndexError::Corrupt {
                line: line_no,
                reason: format!("bad content hash '{hex}' for '{key}'"),
            })?;
            let label = Label::new(&key, fingerprinted_path, hash).map_err(|e| {
                IndexError::Corrupt {
                    line: line_no,
                    reason: e.to_string(),
                }
            })?;
            index.add(&label)?;
        }
        Ok(index)
    }
}
