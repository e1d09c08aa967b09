//! Error types for control file operations.
//!
//! Every failure carries the path of the node it happened on, so callers can
//! report per-path outcomes and rate-limit logging per path.

use std::path::{Path, PathBuf};

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while accessing device control files.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The node could not be opened (missing, or permission denied).
    #[error("Path unavailable: {}: {source}", path.display())]
    PathUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node was opened but the read or write call failed.
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node content is not a usable integer (zero counts as unusable).
    #[error("Unparseable content in {}: {content:?}", path.display())]
    ParseFailure { path: PathBuf, content: String },

    /// Operation is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },
}

impl HardwareError {
    /// Create a new path unavailable error.
    pub fn path_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a new I/O failure error.
    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse failure error.
    pub fn parse_failure(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::ParseFailure {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Path the error happened on, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathUnavailable { path, .. }
            | Self::IoFailure { path, .. }
            | Self::ParseFailure { path, .. } => Some(path),
            Self::Unsupported { .. } => None,
        }
    }

    /// Whether the value is simply not available.
    ///
    /// Parse failures are folded into unavailability: a node holding garbage
    /// is as useless as a missing one.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::PathUnavailable { .. } | Self::ParseFailure { .. }
        )
    }

    /// Raw OS error code, when the failure came from a syscall.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::PathUnavailable { source, .. } | Self::IoFailure { source, .. } => {
                source.raw_os_error()
            }
            _ => None,
        }
    }
}
