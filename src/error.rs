//! Error types for pipeline runs.

use std::path::PathBuf;

/// Error type for pipeline operations.
///
/// Every variant aborts the run. Recoverable conditions (an unreadable static
/// special-layers document) are logged and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The classified diff could not be read.
    #[error("Failed to read classified diff {path}: {source}")]
    DiffLoad {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The classified diff is not a valid document.
    #[error("Malformed classified diff: {0}")]
    DiffParse(#[source] serde_json::Error),
    /// An artifact could not be encoded.
    #[error("Failed to encode artifact: {0}")]
    Encode(#[from] serde_json::Error),
    /// Store error.
    #[error("Store error: {0}")]
    Store(String),
}

impl PipelineError {
    /// Create a store error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::Store(e.to_string())
    }
}

/// Error type for strict configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `RUN_DATE` was set but is not `YYYY-MM-DD`.
    #[error("Invalid RUN_DATE {0:?}, expected YYYY-MM-DD")]
    InvalidRunDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = PipelineError::from_store(io);
        assert_eq!(err.to_string(), "Store error: read-only");
    }
}
