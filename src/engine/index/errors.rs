use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Two different labels claimed the same original path within one run.
    /// Fatal: distinct content must never silently overwrite a mapping.
    #[error("conflicting entry for '{path}': existing '{existing}', incoming '{incoming}'")]
    Conflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("invalid path '{0}': must be non-empty with no leading or trailing slash")]
    InvalidPath(String),

    #[error("fingerprinted path '{0}' contains the reserved delimiter ':'")]
    ReservedDelimiter(String),

    /// Malformed persisted index text. Fatal at load.
    #[error("corrupt index at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}
