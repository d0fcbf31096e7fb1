use crate::engine::ring::RingError;
use thiserror::Error;

/// Serve-time failures. None of these ever break a response: the rewrite
/// engine logs them and serves the original reference instead.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Ring(#[from] RingError),

    #[error("node '{node}' has no {scheme} entry in the node table")]
    UnconfiguredNode { node: String, scheme: &'static str },
}

#[derive(Debug, Error)]
pub enum NodeTableError {
    #[error("line {line}: unparseable node entry '{entry}'")]
    Malformed { line: usize, entry: String },

    #[error("line {line}: unsupported scheme '{scheme}' (only http and https)")]
    UnsupportedScheme { line: usize, scheme: String },

    #[error("node '{node}' listed more than once under {scheme}")]
    Duplicate { node: String, scheme: &'static str },

    #[error("node '{node}' missing its {scheme} entry")]
    MissingScheme { node: String, scheme: &'static str },

    #[error("node table is empty")]
    Empty,

    #[error("failed to read node table: {0}")]
    Io(#[from] std::io::Error),
}
