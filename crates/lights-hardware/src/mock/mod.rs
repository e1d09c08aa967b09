//! Mock control file implementations for testing and development.
//!
//! This module provides an in-memory stand-in for the sysfs tree that can be
//! inspected and sabotaged programmatically without real hardware.

pub mod files;

// Re-export commonly used types
pub use files::{MockControlFiles, MockControlFilesHandle, WriteRecord};
