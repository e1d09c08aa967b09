//! Indicator LED driver.
//!
//! The indicator LED either shows a steady brightness or runs a hardware
//! ramp program. A ramp program walks the duty-cycle table up and back down
//! during the "on" phase, holds at the top for `pause_hi`, then stays dark
//! for `pause_lo`. Software only programs the ramp engine; the blink clock
//! runs in the LED driver.
//!
//! Programming order matters: the ramp engine is always stopped first, and
//! only re-enabled once every parameter has landed.

use lights_core::LightState;
use lights_core::constants::{BRIGHTNESS_RAMP, RAMP_SIZE, RAMP_START_INDEX};
use lights_hardware::{ControlFiles, IndicatorLedPaths};
use serde::Serialize;
use tracing::debug;

use crate::brightness::rgb_to_brightness;
use crate::report::WriteSession;

/// Parameters of one hardware ramp program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlinkProgram {
    /// Duty-cycle lookup table, in percent.
    pub duty_pcts: [u32; RAMP_SIZE],

    /// First table index.
    pub start_index: u32,

    /// Dark time between ramps.
    pub pause_lo_ms: u32,

    /// Hold time at full duty after the ramp.
    pub pause_hi_ms: u32,

    /// Time spent on each table entry.
    pub step_ms: u32,
}

impl BlinkProgram {
    /// Build the ramp program for an LED brightness and flash timing.
    ///
    /// The ramp consumes the table twice per on phase. When `on_ms` is too
    /// short for that at `default_step_ms`, the step shrinks to fit the whole
    /// on phase and there is no hold at the top.
    ///
    /// # Examples
    ///
    /// ```
    /// use lights_engine::indicator::BlinkProgram;
    ///
    /// let program = BlinkProgram::new(255, 1000, 3000, 50);
    /// assert_eq!(program.step_ms, 50);
    /// assert_eq!(program.pause_hi_ms, 200);
    /// assert_eq!(program.pause_lo_ms, 3000);
    ///
    /// let short = BlinkProgram::new(255, 100, 50, 50);
    /// assert_eq!(short.step_ms, 6);
    /// assert_eq!(short.pause_hi_ms, 0);
    /// ```
    pub fn new(brightness: u32, on_ms: u32, off_ms: u32, default_step_ms: u32) -> Self {
        let ramp_passes = (RAMP_SIZE * 2) as u32;
        let full_ramp_ms = default_step_ms.saturating_mul(ramp_passes);

        let (step_ms, pause_hi_ms) = if full_ramp_ms > on_ms {
            (on_ms / ramp_passes, 0)
        } else {
            (default_step_ms, on_ms - full_ramp_ms)
        };

        Self {
            duty_pcts: scaled_duty_pcts(brightness),
            start_index: RAMP_START_INDEX,
            pause_lo_ms: off_ms,
            pause_hi_ms,
            step_ms,
        }
    }

    /// Lookup table in the format the driver expects: `0,12,25,...`.
    pub fn duty_pcts_string(&self) -> String {
        self.duty_pcts
            .iter()
            .map(|pct| pct.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Base ramp curve scaled by `brightness / 255`.
pub fn scaled_duty_pcts(brightness: u32) -> [u32; RAMP_SIZE] {
    BRIGHTNESS_RAMP.map(|pct| pct * brightness / 255)
}

/// What the indicator LED should do for a given state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPlan {
    /// Steady brightness (0 switches the LED off).
    Steady { brightness: u32 },

    /// Hardware ramp program.
    Blink(BlinkProgram),
}

impl IndicatorPlan {
    /// Decide how to show `state`.
    ///
    /// Blinking needs a timed flash with both durations nonzero. The LED is a
    /// separate part from the panel, so no panel scaling applies.
    pub fn for_state(state: &LightState, default_step_ms: u32) -> Self {
        let brightness = rgb_to_brightness(state.color);
        let (on_ms, off_ms) = state.flash_timing();

        if on_ms > 0 && off_ms > 0 {
            Self::Blink(BlinkProgram::new(brightness, on_ms, off_ms, default_step_ms))
        } else {
            Self::Steady { brightness }
        }
    }
}

/// Program the indicator LED for `state`.
///
/// Every write is attempted regardless of earlier failures.
pub(crate) fn drive_indicator<F: ControlFiles>(
    session: &mut WriteSession<'_, F>,
    paths: &IndicatorLedPaths,
    state: &LightState,
    default_step_ms: u32,
) -> IndicatorPlan {
    let plan = IndicatorPlan::for_state(state, default_step_ms);
    debug!(
        "indicator color={} flash={:?} on={} off={} -> {:?}",
        state.color, state.flash_mode, state.flash_on_ms, state.flash_off_ms, plan
    );

    // Stop any running ramp before touching its parameters.
    session.write_int(&paths.blink, 0);

    match &plan {
        IndicatorPlan::Blink(program) => {
            session.write_int(&paths.start_idx, i64::from(program.start_index));
            session.write_str(&paths.duty_pcts, &program.duty_pcts_string());
            session.write_int(&paths.pause_lo, i64::from(program.pause_lo_ms));
            session.write_int(&paths.pause_hi, i64::from(program.pause_hi_ms));
            session.write_int(&paths.ramp_step_ms, i64::from(program.step_ms));
            session.write_int(&paths.blink, 1);
        }
        IndicatorPlan::Steady { brightness } => {
            session.write_int(&paths.brightness, i64::from(*brightness));
        }
    }

    plan
}
