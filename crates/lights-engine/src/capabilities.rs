//! Static hardware detection performed once at open.

use lights_hardware::{ControlFiles, FailureReporter, FileOp};
use serde::Serialize;
use tracing::{error, info};

use crate::buttons::ButtonMask;
use crate::config::{ButtonDetection, LightsConfig};

/// What the device offers. Never re-evaluated after open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwareCapabilities {
    /// Button backlights present.
    pub buttons: ButtonMask,

    /// Panel maximum brightness used for backlight scaling.
    pub max_brightness: u32,

    /// Whether `max_brightness` was read from the panel or fell back to the
    /// configured default.
    pub max_brightness_detected: bool,
}

impl HardwareCapabilities {
    /// Probe buttons and read the panel maximum.
    ///
    /// A missing, unreadable, zero or negative maximum falls back to
    /// `config.default_max_brightness`.
    pub fn detect<F: ControlFiles>(
        files: &F,
        config: &LightsConfig,
        reporter: &dyn FailureReporter,
    ) -> Self {
        let buttons = match config.buttons {
            ButtonDetection::AssumeAll => ButtonMask::ALL,
            ButtonDetection::Probe => config
                .paths
                .buttons
                .iter()
                .enumerate()
                .filter(|(_, node)| files.exists(node))
                .fold(ButtonMask::NONE, |mask, (index, _)| {
                    mask | ButtonMask::for_index(index)
                }),
        };

        let max_path = &config.paths.lcd_max_brightness;
        let detected = match files.read_int(max_path) {
            Ok(value) if value > 0 => u32::try_from(value).ok(),
            Ok(value) => {
                error!("ignoring panel max brightness {} from {}", value, max_path.display());
                None
            }
            Err(e) => {
                reporter.report(FileOp::Read, max_path, &e);
                None
            }
        };

        let max_brightness = detected.unwrap_or(config.default_max_brightness);
        info!(
            "lights capabilities: buttons={:#04b} max_brightness={} (detected: {})",
            buttons.bits(),
            max_brightness,
            detected.is_some()
        );

        Self {
            buttons,
            max_brightness,
            max_brightness_detected: detected.is_some(),
        }
    }
}
