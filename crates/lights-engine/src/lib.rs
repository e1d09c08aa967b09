//! Light state arbitration and translation engine.
//!
//! Turns [`LightState`](lights_core::LightState) requests for the named
//! lights into writes to kernel control nodes:
//!
//! - **Backlight**: luma brightness scaled to the panel range, with the low
//!   persistence mode switched only on entry and exit.
//! - **Buttons**: the same brightness written to every present button.
//! - **Battery, notifications, attention**: three sources sharing one
//!   indicator LED. The highest priority lit source (attention, then
//!   notification, then battery) is shown, steady or as a hardware ramp
//!   program.
//!
//! All updates are serialized by a single lock owned by [`LightsDevice`].
//!
//! # Example
//!
//! ```
//! use lights_core::{LightState, LightTarget};
//! use lights_engine::{LightsConfig, LightsDevice};
//! use lights_hardware::mock::MockControlFiles;
//!
//! let (files, handle) = MockControlFiles::new();
//! let config = LightsConfig::default();
//! let blink = config.paths.indicator.blink.clone();
//!
//! let device = LightsDevice::open(files, config)?;
//! let notifications = device.open_target("notifications")?;
//! notifications.set_state(&LightState::new(0xFF00_FF00).with_flash(1000, 3000))?;
//!
//! assert_eq!(handle.values_written(&blink), vec!["0", "1"]);
//! # Ok::<(), lights_engine::LightsError>(())
//! ```

pub mod arbitrator;
pub mod backlight;
pub mod brightness;
pub mod buttons;
pub mod capabilities;
pub mod config;
pub mod device;
pub mod error;
pub mod indicator;
pub mod report;

pub use arbitrator::{IndicatorArbitrator, IndicatorSource};
pub use buttons::ButtonMask;
pub use capabilities::HardwareCapabilities;
pub use config::{ButtonDetection, LightsConfig};
pub use device::{LightHandle, LightsDevice};
pub use error::{LightsError, Result};
pub use indicator::{BlinkProgram, IndicatorPlan};
pub use report::{WriteOutcome, WriteReport};
