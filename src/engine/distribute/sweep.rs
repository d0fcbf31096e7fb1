use crate::engine::distribute::errors::DistributeError;
use crate::engine::distribute::mirror::Mirror;
use crate::engine::index::AllIndex;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one orphan sweep over a mirror.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub kept: usize,
}

/// Deletes blobs under a mirror's docroot whose fingerprinted path is no
/// longer tracked by the all-index, pruning directories emptied on the way.
///
/// Only first-level directories named by exactly three lowercase hex
/// characters are touched: that prefix is what the fingerprint scheme
/// produces, and everything else in a docroot (stable-path publishes, the
/// index files, hand-placed content) is not ours to delete.
///
/// Runs as an explicit maintenance pass, never as part of a publish: a
/// failed or partial publish must not be able to destroy still-served
/// content.
pub fn sweep_orphans(mirror: &Mirror, all: &AllIndex) -> Result<SweepReport, DistributeError> {
    let mut report = SweepReport::default();

    let entries = fs::read_dir(mirror.docroot()).map_err(|e| DistributeError::MirrorIo {
        host: mirror.host().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() || !is_fingerprint_prefix(&entry.file_name()) {
            continue;
        }
        sweep_tree(mirror, &path, all, &mut report)?;
        remove_if_empty(&path);
    }

    info!(
        target: "distribute::sweep",
        host = mirror.host(),
        scanned = report.scanned,
        deleted = report.deleted,
        kept = report.kept,
        "Sweep finished"
    );
    Ok(report)
}

fn sweep_tree(
    mirror: &Mirror,
    dir: &Path,
    all: &AllIndex,
    report: &mut SweepReport,
) -> Result<(), DistributeError> {
    let entries = fs::read_dir(dir).map_err(|e| DistributeError::MirrorIo {
        host: mirror.host().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            sweep_tree(mirror, &path, all, report)?;
            remove_if_empty(&path);
            continue;
        }

        report.scanned += 1;
        let relative = path
            .strip_prefix(mirror.docroot())
            .ok()
            .and_then(|p| p.to_str())
            .map(|p| p.replace('\\', "/"));

        match relative {
            Some(rel) if all.tracks(&rel) => report.kept += 1,
            Some(rel) => {
                fs::remove_file(&path).map_err(|e| DistributeError::MirrorIo {
                    host: mirror.host().to_string(),
                    source: e,
                })?;
                info!(target: "distribute::sweep", host = mirror.host(), path = rel, "Deleted orphaned blob");
                report.deleted += 1;
            }
            None => {
                warn!(target: "distribute::sweep", host = mirror.host(), path = ?path, "Skipping undecodable path");
                report.kept += 1;
            }
        }
    }
    Ok(())
}

fn is_fingerprint_prefix(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| {
        n.len() == 3 && n.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    })
}

fn remove_if_empty(dir: &Path) {
    // Best-effort: a non-empty directory simply stays.
    let _ = fs::remove_dir(dir);
}
