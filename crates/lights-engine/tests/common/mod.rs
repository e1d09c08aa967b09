//! Shared helpers for the lights engine integration tests.
//!
//! Devices are opened over [`MockControlFiles`] with the stock node paths
//! unless a test needs something else. The write log of the returned handle
//! is the main assertion surface.

#![allow(dead_code)]

use std::sync::Arc;

use lights_engine::{LightsConfig, LightsDevice};
use lights_hardware::mock::{MockControlFiles, MockControlFilesHandle};
use lights_hardware::{DevicePaths, WarnOncePerPath};

/// Stock device paths.
pub fn paths() -> DevicePaths {
    DevicePaths::default()
}

/// Device over an empty mock tree with the default configuration.
pub fn open_mock_device() -> (LightsDevice<MockControlFiles>, MockControlFilesHandle) {
    open_mock_device_with(LightsConfig::default())
}

/// Device over an empty mock tree.
pub fn open_mock_device_with(
    config: LightsConfig,
) -> (LightsDevice<MockControlFiles>, MockControlFilesHandle) {
    let (files, handle) = MockControlFiles::new();
    let device = LightsDevice::open(files, config).expect("default config is valid");
    (device, handle)
}

/// Device whose failure reporter is returned for inspection.
pub fn open_mock_device_reporting() -> (
    LightsDevice<MockControlFiles>,
    MockControlFilesHandle,
    Arc<WarnOncePerPath>,
) {
    let (files, handle) = MockControlFiles::new();
    let reporter = Arc::new(WarnOncePerPath::new());
    let device = LightsDevice::with_reporter(files, LightsConfig::default(), reporter.clone())
        .expect("default config is valid");
    (device, handle, reporter)
}

