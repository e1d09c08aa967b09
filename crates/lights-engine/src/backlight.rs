//! Display backlight controller.
//!
//! Besides the brightness itself the backlight owns the panel persistence
//! mode. The persistence node is only written when the requested mode enters
//! or leaves low persistence; repeating the same mode leaves it alone.

use std::path::Path;

use lights_core::{BrightnessMode, LightState};
use tracing::debug;

use crate::brightness::{rgb_to_brightness, scale_to_panel_max};
use crate::report::WriteSession;
use lights_hardware::ControlFiles;

/// Change of the low persistence mode between two backlight updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceTransition {
    Enter,
    Exit,
}

impl PersistenceTransition {
    /// Value written to the persistence node.
    pub fn node_value(self) -> i64 {
        match self {
            Self::Enter => 1,
            Self::Exit => 0,
        }
    }
}

/// Backlight state carried across updates for the device lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BacklightSession {
    last_mode: BrightnessMode,
}

impl BacklightSession {
    /// Session in user mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode of the previous update.
    pub fn last_mode(&self) -> BrightnessMode {
        self.last_mode
    }

    /// Record `mode` and report whether the persistence node must change.
    ///
    /// The recorded mode advances whether or not the following writes
    /// succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lights_core::BrightnessMode;
    /// use lights_engine::backlight::{BacklightSession, PersistenceTransition};
    ///
    /// let mut session = BacklightSession::new();
    /// assert_eq!(session.advance(BrightnessMode::LowPersistence), Some(PersistenceTransition::Enter));
    /// assert_eq!(session.advance(BrightnessMode::LowPersistence), None);
    /// assert_eq!(session.advance(BrightnessMode::Sensor), Some(PersistenceTransition::Exit));
    /// assert_eq!(session.advance(BrightnessMode::User), None);
    /// ```
    pub fn advance(&mut self, mode: BrightnessMode) -> Option<PersistenceTransition> {
        let was_low = self.last_mode == BrightnessMode::LowPersistence;
        let is_low = mode == BrightnessMode::LowPersistence;
        self.last_mode = mode;

        match (was_low, is_low) {
            (false, true) => Some(PersistenceTransition::Enter),
            (true, false) => Some(PersistenceTransition::Exit),
            _ => None,
        }
    }
}

/// Node locations and panel parameters used by [`drive_backlight`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct BacklightTarget<'a> {
    pub brightness: &'a Path,
    pub persistence_mode: &'a Path,
    pub max_brightness: u32,
    pub low_persistence_brightness: u32,
}

/// Update the backlight for `state`. Returns the brightness written.
///
/// The brightness write is attempted even when the persistence write failed.
pub(crate) fn drive_backlight<F: ControlFiles>(
    writes: &mut WriteSession<'_, F>,
    session: &mut BacklightSession,
    target: BacklightTarget<'_>,
    state: &LightState,
) -> u32 {
    let requested = rgb_to_brightness(state.color);
    let mut brightness = scale_to_panel_max(requested, target.max_brightness);
    if brightness != requested {
        debug!("scaling backlight brightness {} => {}", requested, brightness);
    }

    if let Some(transition) = session.advance(state.brightness_mode) {
        debug!("low persistence {:?}", transition);
        writes.write_int(target.persistence_mode, transition.node_value());

        if transition == PersistenceTransition::Enter {
            brightness = target.low_persistence_brightness;
        }
    }

    writes.write_int(target.brightness, i64::from(brightness));
    brightness
}
