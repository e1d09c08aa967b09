//! The lights device: dispatch of named targets to their controllers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lights_core::{BrightnessMode, LightState, LightTarget};
use lights_hardware::{ControlFiles, FailureReporter, WarnOncePerPath};
use tracing::{debug, info};

use crate::arbitrator::{IndicatorArbitrator, IndicatorSource};
use crate::backlight::{BacklightSession, BacklightTarget, drive_backlight};
use crate::buttons::drive_buttons;
use crate::capabilities::HardwareCapabilities;
use crate::config::LightsConfig;
use crate::error::Result;
use crate::indicator::drive_indicator;
use crate::report::{WriteReport, WriteSession};

/// Mutable state shared by every light, guarded by one lock.
#[derive(Debug, Default)]
struct LightsState {
    indicator: IndicatorArbitrator,
    backlight: BacklightSession,
}

struct Shared<F> {
    files: F,
    reporter: Arc<dyn FailureReporter>,
    config: LightsConfig,
    capabilities: HardwareCapabilities,
    state: Mutex<LightsState>,
}

/// An opened lights device.
///
/// Every update, whatever its target, runs under a single lock: slot
/// updates, arbitration and the hardware writes never interleave. Cloning is
/// cheap and clones share the same state.
///
/// # Examples
///
/// ```
/// use lights_core::{LightState, LightTarget};
/// use lights_engine::{LightsConfig, LightsDevice};
/// use lights_hardware::mock::MockControlFiles;
///
/// let config = LightsConfig::default();
/// let indicator = config.paths.indicator.clone();
/// let (files, handle) = MockControlFiles::new();
///
/// let device = LightsDevice::open(files, config)?;
/// device.set_battery(&LightState::new(0x00FF_0000))?;
/// device.set_attention(&LightState::new(0x0000_00FF))?;
///
/// // Attention owns the LED; blue is 28 after luma conversion.
/// assert_eq!(handle.values_written(&indicator.brightness), vec!["76", "28"]);
/// # Ok::<(), lights_engine::LightsError>(())
/// ```
pub struct LightsDevice<F> {
    shared: Arc<Shared<F>>,
}

impl<F> Clone for LightsDevice<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F> fmt::Debug for LightsDevice<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightsDevice")
            .field("config", &self.shared.config)
            .field("capabilities", &self.shared.capabilities)
            .finish_non_exhaustive()
    }
}

impl<F: ControlFiles> LightsDevice<F> {
    /// Open the device, logging failures once per path.
    ///
    /// Hardware capabilities are detected here and never again.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::Config`](crate::LightsError::Config) if the
    /// configuration is invalid.
    pub fn open(files: F, config: LightsConfig) -> Result<Self> {
        Self::with_reporter(files, config, Arc::new(WarnOncePerPath::new()))
    }

    /// Open the device with a custom failure reporter.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::Config`](crate::LightsError::Config) if the
    /// configuration is invalid.
    pub fn with_reporter(
        files: F,
        config: LightsConfig,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self> {
        config.validate()?;
        let capabilities = HardwareCapabilities::detect(&files, &config, reporter.as_ref());
        info!("lights device opened");

        Ok(Self {
            shared: Arc::new(Shared {
                files,
                reporter,
                config,
                capabilities,
                state: Mutex::new(LightsState::default()),
            }),
        })
    }

    /// Capabilities detected at open.
    pub fn capabilities(&self) -> &HardwareCapabilities {
        &self.shared.capabilities
    }

    pub fn config(&self) -> &LightsConfig {
        &self.shared.config
    }

    /// Handle bound to `target`.
    pub fn handle(&self, target: LightTarget) -> LightHandle<F> {
        LightHandle {
            device: self.clone(),
            target,
        }
    }

    /// Handle bound to the target called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::UnknownTarget`](crate::LightsError::UnknownTarget)
    /// if no light has that name.
    pub fn open_target(&self, name: &str) -> Result<LightHandle<F>> {
        let target: LightTarget = name.parse()?;
        Ok(self.handle(target))
    }

    /// Apply `state` to `target` and report every write performed.
    ///
    /// Failed writes never stop the update.
    pub fn apply(&self, target: LightTarget, state: &LightState) -> WriteReport {
        let shared = &*self.shared;
        let mut guard = self.lock();
        let mut writes = WriteSession::new(&shared.files, shared.reporter.as_ref());

        match target {
            LightTarget::Backlight => {
                let paths = &shared.config.paths;
                let backlight = BacklightTarget {
                    brightness: &paths.lcd_brightness,
                    persistence_mode: &paths.persistence_mode,
                    max_brightness: shared.capabilities.max_brightness,
                    low_persistence_brightness: shared.config.low_persistence_brightness,
                };
                drive_backlight(&mut writes, &mut guard.backlight, backlight, state);
            }
            LightTarget::Buttons => {
                drive_buttons(
                    &mut writes,
                    &shared.config.paths.buttons,
                    shared.capabilities.buttons,
                    state,
                );
            }
            LightTarget::Battery => {
                self.update_indicator(&mut guard, &mut writes, IndicatorSource::Battery, state)
            }
            LightTarget::Notifications => self.update_indicator(
                &mut guard,
                &mut writes,
                IndicatorSource::Notification,
                state,
            ),
            LightTarget::Attention => {
                self.update_indicator(&mut guard, &mut writes, IndicatorSource::Attention, state)
            }
        }

        let report = writes.finish();
        if !report.is_ok() {
            debug!(
                "{}: {} of {} writes failed",
                target,
                report.failed(),
                report.attempted()
            );
        }
        report
    }

    fn update_indicator(
        &self,
        guard: &mut LightsState,
        writes: &mut WriteSession<'_, F>,
        source: IndicatorSource,
        state: &LightState,
    ) {
        let (active_source, active) = guard.indicator.update(source, *state);
        debug!("{} updated, indicator owned by {}", source, active_source);
        drive_indicator(
            writes,
            &self.shared.config.paths.indicator,
            active,
            self.shared.config.ramp_step_ms,
        );
    }

    /// Set the display backlight.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_backlight(&self, state: &LightState) -> Result<()> {
        self.apply(LightTarget::Backlight, state).into_result()
    }

    /// Set every present button backlight.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_buttons(&self, state: &LightState) -> Result<()> {
        self.apply(LightTarget::Buttons, state).into_result()
    }

    /// Store the battery state and refresh the indicator.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_battery(&self, state: &LightState) -> Result<()> {
        self.apply(LightTarget::Battery, state).into_result()
    }

    /// Store the notification state and refresh the indicator.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_notification(&self, state: &LightState) -> Result<()> {
        self.apply(LightTarget::Notifications, state).into_result()
    }

    /// Store the attention state and refresh the indicator.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_attention(&self, state: &LightState) -> Result<()> {
        self.apply(LightTarget::Attention, state).into_result()
    }

    /// Source currently owning the indicator and its stored state.
    pub fn active_indicator(&self) -> (IndicatorSource, LightState) {
        let guard = self.lock();
        let (source, state) = guard.indicator.active();
        (source, *state)
    }

    /// Stored state of one indicator source.
    pub fn indicator_slot(&self, source: IndicatorSource) -> LightState {
        *self.lock().indicator.slot(source)
    }

    /// Brightness mode of the last backlight update.
    pub fn backlight_mode(&self) -> BrightnessMode {
        self.lock().backlight.last_mode()
    }

    fn lock(&self) -> MutexGuard<'_, LightsState> {
        // A panic while holding the lock leaves the slots consistent.
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A light target bound to its device.
pub struct LightHandle<F> {
    device: LightsDevice<F>,
    target: LightTarget,
}

impl<F> Clone for LightHandle<F> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
            target: self.target,
        }
    }
}

impl<F> fmt::Debug for LightHandle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightHandle")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<F: ControlFiles> LightHandle<F> {
    pub fn target(&self) -> LightTarget {
        self.target
    }

    /// Apply `state` and report every write.
    pub fn apply(&self, state: &LightState) -> WriteReport {
        self.device.apply(self.target, state)
    }

    /// Apply `state`.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::WriteFailed`](crate::LightsError::WriteFailed)
    /// with the first failed write.
    pub fn set_state(&self, state: &LightState) -> Result<()> {
        self.apply(state).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LightsError;
    use lights_hardware::mock::MockControlFiles;
    use std::thread;

    fn open() -> (LightsDevice<MockControlFiles>, lights_hardware::mock::MockControlFilesHandle) {
        let (files, handle) = MockControlFiles::new();
        let device = LightsDevice::open(files, LightsConfig::default()).unwrap();
        (device, handle)
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let (files, _handle) = MockControlFiles::new();
        let result = LightsDevice::open(files, LightsConfig::default().ramp_step_ms(0));
        assert!(matches!(result, Err(LightsError::Config(_))));
    }

    #[test]
    fn test_open_target_by_name() {
        let (device, _handle) = open();
        assert_eq!(
            device.open_target("notifications").unwrap().target(),
            LightTarget::Notifications
        );
        assert!(matches!(
            device.open_target("keyboard"),
            Err(LightsError::UnknownTarget(ref name)) if name == "keyboard"
        ));
    }

    #[test]
    fn test_handles_share_state() {
        let (device, _handle) = open();
        let battery = device.handle(LightTarget::Battery);
        let attention = battery.device.handle(LightTarget::Attention);

        battery.set_state(&LightState::new(0x00FF_0000)).unwrap();
        attention.set_state(&LightState::new(0x0000_00FF)).unwrap();

        assert_eq!(device.active_indicator().0, IndicatorSource::Attention);
    }

    #[test]
    fn test_backlight_mode_tracked() {
        let (device, _handle) = open();
        assert_eq!(device.backlight_mode(), BrightnessMode::User);

        let state = LightState::new(0x00FF_FFFF).with_brightness_mode(BrightnessMode::Sensor);
        device.set_backlight(&state).unwrap();
        assert_eq!(device.backlight_mode(), BrightnessMode::Sensor);
    }

    #[test]
    fn test_concurrent_updates_do_not_interleave() {
        let (device, handle) = open();
        let indicator = device.config().paths.indicator.clone();

        let workers: Vec<_> = [LightTarget::Battery, LightTarget::Attention, LightTarget::Notifications]
            .into_iter()
            .map(|target| {
                let light = device.handle(target);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let state = LightState::new(0x00FF_FFFF).with_flash(1000, 1000);
                        light.set_state(&state).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        // Each blink update is seven writes opening with blink=0 and closing
        // with blink=1.
        let writes = handle.writes();
        assert_eq!(writes.len(), 150 * 7);
        for chunk in writes.chunks(7) {
            assert_eq!(chunk[0].path, indicator.blink);
            assert_eq!(chunk[0].line, "0\n");
            assert_eq!(chunk[6].path, indicator.blink);
            assert_eq!(chunk[6].line, "1\n");
        }
    }

    #[test]
    fn test_device_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LightsDevice<MockControlFiles>>();
        assert_send_sync::<LightHandle<MockControlFiles>>();
    }
}
