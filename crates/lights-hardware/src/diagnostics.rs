//! Reporting of control file failures.
//!
//! A missing or broken node fails on every single light update. Logging each
//! occurrence would flood the log, so failures go through a
//! [`FailureReporter`] that decides what reaches the log. The default
//! [`WarnOncePerPath`] logs the first failure of each path and only counts the
//! rest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error};

use crate::error::HardwareError;

/// Kind of operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOp {
    Read,
    Write,
}

impl std::fmt::Display for FileOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Sink for control file failures.
pub trait FailureReporter: Send + Sync {
    /// Record a failed operation on `path`.
    fn report(&self, op: FileOp, path: &Path, error: &HardwareError);
}

/// Logs the first failure per path at error level, later ones at debug.
///
/// # Examples
///
/// ```
/// use std::io;
/// use std::path::Path;
/// use lights_hardware::HardwareError;
/// use lights_hardware::diagnostics::{FailureReporter, FileOp, WarnOncePerPath};
///
/// let reporter = WarnOncePerPath::new();
/// let path = Path::new("/sys/class/leds/white/blink");
/// let error = HardwareError::path_unavailable(path, io::Error::from(io::ErrorKind::NotFound));
///
/// reporter.report(FileOp::Write, path, &error);
/// reporter.report(FileOp::Write, path, &error);
///
/// assert_eq!(reporter.failures(path), 2);
/// assert_eq!(reporter.suppressed(path), 1);
/// ```
#[derive(Debug, Default)]
pub struct WarnOncePerPath {
    counts: Mutex<HashMap<PathBuf, u64>>,
}

impl WarnOncePerPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total failures seen for `path`.
    pub fn failures(&self, path: &Path) -> u64 {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Failures for `path` that were not logged at error level.
    pub fn suppressed(&self, path: &Path) -> u64 {
        self.failures(path).saturating_sub(1)
    }
}

impl FailureReporter for WarnOncePerPath {
    fn report(&self, op: FileOp, path: &Path, err: &HardwareError) {
        let count = {
            let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
            let count = counts.entry(path.to_path_buf()).or_insert(0);
            *count += 1;
            *count
        };

        if count == 1 {
            error!("failed to {} {}: {}", op, path.display(), err);
        } else {
            debug!(
                "failed to {} {} ({} failures so far): {}",
                op,
                path.display(),
                count,
                err
            );
        }
    }
}
