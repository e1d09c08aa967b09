//! Per-path outcomes of a light update.
//!
//! Hardware LEDs have no atomic multi-field update, so a light update is a
//! sequence of independent writes. Every write is attempted even after an
//! earlier one failed; the [`WriteReport`] keeps the outcome of each, in
//! order.

use std::path::{Path, PathBuf};

use lights_hardware::{ControlFiles, FailureReporter, FileOp, HardwareError};
use tracing::trace;

use crate::error::{LightsError, Result};

/// Outcome of a single control write.
#[derive(Debug)]
pub struct WriteOutcome {
    /// Node written.
    pub path: PathBuf,

    /// What happened.
    pub result: std::result::Result<(), HardwareError>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered outcomes of every write performed by one light update.
///
/// # Examples
///
/// ```
/// use lights_engine::{LightsConfig, LightsDevice};
/// use lights_core::{LightState, LightTarget};
/// use lights_hardware::mock::MockControlFiles;
///
/// let (files, handle) = MockControlFiles::new();
/// let config = LightsConfig::default();
/// handle.make_unavailable(&config.paths.buttons[0]);
///
/// let device = LightsDevice::open(files, config)?;
/// let report = device.apply(LightTarget::Buttons, &LightState::new(0xFFFF_FFFF));
///
/// // The second button is still written after the first one failed.
/// assert_eq!(report.attempted(), 2);
/// assert_eq!(report.failed(), 1);
/// assert!(report.into_result().is_err());
/// # Ok::<(), lights_engine::LightsError>(())
/// ```
#[derive(Debug, Default)]
pub struct WriteReport {
    outcomes: Vec<WriteOutcome>,
}

impl WriteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        path: &Path,
        result: std::result::Result<(), HardwareError>,
    ) {
        self.outcomes.push(WriteOutcome {
            path: path.to_path_buf(),
            result,
        });
    }

    /// Every outcome, in write order.
    pub fn outcomes(&self) -> &[WriteOutcome] {
        &self.outcomes
    }

    /// Paths written, in order.
    pub fn paths(&self) -> Vec<&Path> {
        self.outcomes.iter().map(|o| o.path.as_path()).collect()
    }

    /// Number of writes attempted.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of writes that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Outcomes of the failed writes, in order.
    pub fn failures(&self) -> impl Iterator<Item = &WriteOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// Whether every write succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(WriteOutcome::is_ok)
    }

    /// The earliest failure, if any.
    pub fn first_failure(&self) -> Option<&HardwareError> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err())
    }

    /// Collapse into a single result carrying the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`] if any write failed.
    pub fn into_result(self) -> Result<()> {
        let attempted = self.attempted();
        let failed = self.failed();

        match self.outcomes.into_iter().find_map(|o| o.result.err()) {
            None => Ok(()),
            Some(first) => Err(LightsError::WriteFailed {
                attempted,
                failed,
                first,
            }),
        }
    }
}

/// Writes of one light update, reported as they happen.
pub(crate) struct WriteSession<'a, F> {
    files: &'a F,
    reporter: &'a dyn FailureReporter,
    report: WriteReport,
}

impl<'a, F: ControlFiles> WriteSession<'a, F> {
    pub(crate) fn new(files: &'a F, reporter: &'a dyn FailureReporter) -> Self {
        Self {
            files,
            reporter,
            report: WriteReport::new(),
        }
    }

    pub(crate) fn write_int(&mut self, path: &Path, value: i64) {
        trace!("{} <- {}", path.display(), value);
        let result = self.files.write_int(path, value);
        self.finish_write(path, result);
    }

    pub(crate) fn write_str(&mut self, path: &Path, value: &str) {
        trace!("{} <- {:?}", path.display(), value);
        let result = self.files.write_str(path, value);
        self.finish_write(path, result);
    }

    fn finish_write(&mut self, path: &Path, result: std::result::Result<(), HardwareError>) {
        if let Err(e) = &result {
            self.reporter.report(FileOp::Write, path, e);
        }
        self.report.record(path, result);
    }

    pub(crate) fn finish(self) -> WriteReport {
        self.report
    }
}
