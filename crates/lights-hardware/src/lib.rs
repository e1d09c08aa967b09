//! Control file abstraction layer for the lights shim.
//!
//! The lights engine drives hardware exclusively through kernel control
//! nodes (sysfs and procfs attributes). This crate provides the trait those
//! accesses go through, a real filesystem implementation, an in-memory mock
//! for tests, the configurable node locations and the failure reporting
//! collaborator.
//!
//! # Design Philosophy
//!
//! - **Synchronous**: control nodes answer immediately; there is no runtime.
//! - **Thread-safe**: implementations are `Send + Sync` and take `&self`, so
//!   one instance can be shared by every light.
//! - **Error-aware**: every operation returns [`Result<T>`][error::Result]
//!   and every error carries the path it happened on.
//!
//! # Control Files
//!
//! ```no_run
//! use lights_hardware::sysfs::SysfsFiles;
//! use lights_hardware::traits::ControlFiles;
//! use lights_hardware::types::DevicePaths;
//!
//! let paths = DevicePaths::default();
//! let files = SysfsFiles::new();
//!
//! let max = files.read_int(&paths.lcd_max_brightness).unwrap_or(255);
//! files.write_int(&paths.lcd_brightness, max / 2)?;
//! # Ok::<(), lights_hardware::HardwareError>(())
//! ```
//!
//! # Testing
//!
//! [`mock::MockControlFiles`] records every write attempt and can be told to
//! fail specific nodes:
//!
//! ```
//! use lights_hardware::mock::MockControlFiles;
//! use lights_hardware::traits::ControlFiles;
//! use lights_hardware::types::DevicePaths;
//!
//! let paths = DevicePaths::default();
//! let (files, handle) = MockControlFiles::new();
//! handle.make_unavailable(&paths.persistence_mode);
//!
//! assert!(files.write_int(&paths.persistence_mode, 1).is_err());
//! assert!(files.write_int(&paths.lcd_brightness, 128).is_ok());
//! assert_eq!(handle.values_written(&paths.lcd_brightness), vec!["128"]);
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type. Open failures are
//! [`HardwareError::PathUnavailable`], failed reads and writes are
//! [`HardwareError::IoFailure`], unusable integer content is
//! [`HardwareError::ParseFailure`].

pub mod diagnostics;
pub mod error;
pub mod key_disabler;
pub mod mock;
pub mod sysfs;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use diagnostics::{FailureReporter, FileOp, WarnOncePerPath};
pub use error::{HardwareError, Result};
pub use key_disabler::KeyDisabler;
pub use sysfs::SysfsFiles;
pub use traits::ControlFiles;
pub use types::{DevicePaths, IndicatorLedPaths, KeyDisablerPaths};
