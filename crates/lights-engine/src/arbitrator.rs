//! Indicator LED arbitration.
//!
//! Battery, notification and attention requests share one physical LED. The
//! arbitrator keeps the last state of each source and picks the one the LED
//! shows: attention over notification over battery, lit sources only. When
//! nothing is lit the battery state wins so the LED is explicitly switched
//! off.

use std::fmt;

use lights_core::{LightState, LightTarget};
use serde::Serialize;
use tracing::debug;

use crate::brightness::scale_notification_color;

/// A source competing for the indicator LED.
///
/// Ordered by priority, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    Battery,
    Notification,
    Attention,
}

impl IndicatorSource {
    /// Sources from highest to lowest priority.
    pub const BY_PRIORITY: [IndicatorSource; 3] = [
        IndicatorSource::Attention,
        IndicatorSource::Notification,
        IndicatorSource::Battery,
    ];

    /// Indicator source behind a light target, if any.
    pub fn from_target(target: LightTarget) -> Option<Self> {
        match target {
            LightTarget::Battery => Some(Self::Battery),
            LightTarget::Notifications => Some(Self::Notification),
            LightTarget::Attention => Some(Self::Attention),
            LightTarget::Backlight | LightTarget::Buttons => None,
        }
    }
}

impl fmt::Display for IndicatorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Battery => write!(f, "battery"),
            Self::Notification => write!(f, "notification"),
            Self::Attention => write!(f, "attention"),
        }
    }
}

/// Last requested state of each indicator source.
///
/// # Examples
///
/// ```
/// use lights_core::LightState;
/// use lights_engine::arbitrator::{IndicatorArbitrator, IndicatorSource};
///
/// let mut arbitrator = IndicatorArbitrator::new();
/// arbitrator.update(IndicatorSource::Battery, LightState::new(0x00FF_0000));
/// assert_eq!(arbitrator.active().0, IndicatorSource::Battery);
///
/// arbitrator.update(IndicatorSource::Attention, LightState::new(0x0000_00FF));
/// assert_eq!(arbitrator.active().0, IndicatorSource::Attention);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndicatorArbitrator {
    battery: LightState,
    notification: LightState,
    attention: LightState,
}

impl IndicatorArbitrator {
    /// All sources off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state of `source`.
    ///
    /// Notification colors go through the alpha brightness override before
    /// being stored. Returns the state the LED must now show.
    pub fn update(
        &mut self,
        source: IndicatorSource,
        mut state: LightState,
    ) -> (IndicatorSource, &LightState) {
        if source == IndicatorSource::Notification {
            let scaled = scale_notification_color(state.color);
            if scaled != state.color {
                debug!("notification color {} scaled to {}", state.color, scaled);
            }
            state.color = scaled;
        }

        *self.slot_mut(source) = state;
        self.active()
    }

    /// Stored state of `source`.
    pub fn slot(&self, source: IndicatorSource) -> &LightState {
        match source {
            IndicatorSource::Battery => &self.battery,
            IndicatorSource::Notification => &self.notification,
            IndicatorSource::Attention => &self.attention,
        }
    }

    fn slot_mut(&mut self, source: IndicatorSource) -> &mut LightState {
        match source {
            IndicatorSource::Battery => &mut self.battery,
            IndicatorSource::Notification => &mut self.notification,
            IndicatorSource::Attention => &mut self.attention,
        }
    }

    /// The source owning the LED and its state.
    pub fn active(&self) -> (IndicatorSource, &LightState) {
        IndicatorSource::BY_PRIORITY
            .into_iter()
            .map(|source| (source, self.slot(source)))
            .find(|(_, state)| state.is_lit())
            .unwrap_or((IndicatorSource::Battery, &self.battery))
    }
}
