use crate::engine::index::IndexError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributeError {
    /// Two mirrors disagree on their persisted index state at open. Fatal:
    /// the operator must repair the divergent host from a consistent one;
    /// the tool never reconciles silently.
    #[error("mirrors '{left}' and '{right}' disagree on index '{index_name}'")]
    IndexMismatch {
        left: String,
        right: String,
        index_name: String,
    },

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("I/O failure on mirror '{host}': {source}")]
    MirrorIo {
        host: String,
        #[source]
        source: io::Error,
    },
}
