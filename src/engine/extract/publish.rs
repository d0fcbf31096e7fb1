use crate::engine::distribute::{DistributeError, Distributor};
use crate::engine::extract::resource::{ExtractError, Extractor};
use crate::engine::index::{IndexError, Label};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("distribution failed: {0}")]
    Distribute(#[from] DistributeError),

    #[error("labeling failed: {0}")]
    Label(#[from] IndexError),
}

/// How served paths are derived for a run.
#[derive(Debug, Clone)]
pub enum PublishMode {
    /// Content-addressed paths; the served URL changes iff the content does.
    Fingerprint,
    /// Stable paths under a fixed prefix, for assets whose URL must never
    /// change (externally linked downloads and the like).
    Stable { path_prefix: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub written: usize,
    pub reused: usize,
}

/// Drives one serialized extraction loop into the distributor: hash each
/// resource, derive its label, write. The caller owns the open/close
/// transaction boundary around this.
pub async fn publish<E: Extractor>(
    extractor: &E,
    distributor: &mut Distributor,
    mode: &PublishMode,
) -> Result<PublishReport, PublishError> {
    let mut report = PublishReport::default();

    for resource in extractor.iterate()? {
        let resource = resource?;
        let bytes = resource.bytes().map_err(ExtractError::Io)?;
        let label = match mode {
            PublishMode::Fingerprint => {
                Label::fingerprinted(&resource.path, &resource.folder, &bytes)?
            }
            PublishMode::Stable { path_prefix } => {
                Label::stable(&resource.path, path_prefix, &bytes)?
            }
        };

        if distributor.write(&label, &bytes).await? {
            report.written += 1;
        } else {
            report.reused += 1;
        }
        debug!(
            target: "extract::publish",
            path = resource.path,
            fingerprinted = label.fingerprinted_path(),
            "Resource published"
        );
    }

    info!(
        target: "extract::publish",
        written = report.written,
        reused = report.reused,
        "Extraction loop finished"
    );
    Ok(report)
}
