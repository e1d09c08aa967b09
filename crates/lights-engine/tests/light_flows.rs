//! End-to-end light update flows against the mock control tree.
//!
//! Covers indicator arbitration across sources, the backlight persistence
//! hysteresis, button presence and failure handling.

mod common;

use lights_core::{BrightnessMode, LightState, LightTarget};
use lights_engine::{ButtonDetection, IndicatorSource, LightsConfig, LightsError};

const RED: u32 = 0x00FF_0000;
const BLUE: u32 = 0x0000_00FF;
const WHITE: u32 = 0x00FF_FFFF;

// ============================================================================
// Indicator arbitration
// ============================================================================

#[test]
fn test_battery_then_attention() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device.set_battery(&LightState::new(RED)).unwrap();
    assert_eq!(device.active_indicator().0, IndicatorSource::Battery);
    assert_eq!(handle.values_written(&led.brightness), vec!["76"]);

    device.set_attention(&LightState::new(BLUE)).unwrap();
    let (source, state) = device.active_indicator();
    assert_eq!(source, IndicatorSource::Attention);
    assert_eq!(state.color.argb(), BLUE);
    assert_eq!(handle.values_written(&led.brightness), vec!["76", "28"]);

    // The battery request is kept while hidden.
    assert_eq!(
        device.indicator_slot(IndicatorSource::Battery),
        LightState::new(RED)
    );
}

#[test]
fn test_clearing_attention_restores_battery() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device.set_battery(&LightState::new(RED)).unwrap();
    device.set_attention(&LightState::new(BLUE)).unwrap();
    device.set_attention(&LightState::off()).unwrap();

    assert_eq!(device.active_indicator().0, IndicatorSource::Battery);
    assert_eq!(handle.last_write(&led.brightness).as_deref(), Some("76\n"));
}

#[test]
fn test_nothing_lit_drives_led_off() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device.set_notification(&LightState::new(WHITE)).unwrap();
    device.set_notification(&LightState::off()).unwrap();

    assert_eq!(device.active_indicator().0, IndicatorSource::Battery);
    assert_eq!(handle.values_written(&led.brightness), vec!["255", "0"]);
    assert_eq!(handle.values_written(&led.blink), vec!["0", "0"]);
}

#[test]
fn test_lower_priority_update_while_attention_lit() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device
        .set_attention(&LightState::new(BLUE).with_flash(1000, 1000))
        .unwrap();
    handle.clear_writes();

    // A battery update still refreshes the LED, with the attention program.
    device.set_battery(&LightState::new(RED)).unwrap();
    assert_eq!(handle.values_written(&led.blink), vec!["0", "1"]);
    assert!(handle.values_written(&led.brightness).is_empty());
}

#[test]
fn test_notification_alpha_dims_color() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device.set_notification(&LightState::new(0x80FF_0000)).unwrap();

    assert_eq!(
        device.indicator_slot(IndicatorSource::Notification).color.argb(),
        0x0080_0000
    );
    // 77 * 128 >> 8
    assert_eq!(handle.values_written(&led.brightness), vec!["38"]);
}

#[test]
fn test_notification_blink_program() {
    let (device, handle) = common::open_mock_device();
    let led = common::paths().indicator;

    device
        .set_notification(&LightState::new(0xFF00_FF00).with_flash(100, 50))
        .unwrap();

    assert_eq!(handle.values_written(&led.start_idx), vec!["0"]);
    // Green only: luma 149, table scaled by 149/255.
    assert_eq!(
        handle.values_written(&led.duty_pcts),
        vec!["0,7,14,21,29,42,49,58"]
    );
    assert_eq!(handle.values_written(&led.pause_lo), vec!["50"]);
    assert_eq!(handle.values_written(&led.pause_hi), vec!["0"]);
    assert_eq!(handle.values_written(&led.ramp_step_ms), vec!["6"]);
    assert_eq!(handle.values_written(&led.blink), vec!["0", "1"]);
}

#[test]
fn test_configured_ramp_step() {
    let (device, handle) = common::open_mock_device_with(LightsConfig::default().ramp_step_ms(20));
    let led = common::paths().indicator;

    device
        .set_battery(&LightState::new(WHITE).with_flash(1000, 500))
        .unwrap();

    assert_eq!(handle.values_written(&led.ramp_step_ms), vec!["20"]);
    assert_eq!(handle.values_written(&led.pause_hi), vec!["680"]);
}

#[test]
fn test_repeated_battery_update_rewrites_hardware() {
    let (device, handle) = common::open_mock_device();
    let state = LightState::new(RED).with_flash(500, 500);

    device.set_battery(&state).unwrap();
    let first = handle.writes();
    handle.clear_writes();
    device.set_battery(&state).unwrap();

    assert_eq!(handle.writes(), first);
}

// ============================================================================
// Backlight
// ============================================================================

#[test]
fn test_persistence_written_on_entry_and_exit_only() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();

    for mode in [
        BrightnessMode::User,
        BrightnessMode::LowPersistence,
        BrightnessMode::LowPersistence,
        BrightnessMode::User,
    ] {
        device
            .set_backlight(&LightState::new(WHITE).with_brightness_mode(mode))
            .unwrap();
    }

    assert_eq!(handle.values_written(&paths.persistence_mode), vec!["1", "0"]);
    assert_eq!(
        handle.values_written(&paths.lcd_brightness),
        vec!["255", "128", "255", "255"]
    );
}

#[test]
fn test_sensor_and_user_do_not_touch_persistence() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();

    for mode in [BrightnessMode::Sensor, BrightnessMode::User, BrightnessMode::Sensor] {
        device
            .set_backlight(&LightState::new(WHITE).with_brightness_mode(mode))
            .unwrap();
    }

    assert!(handle.values_written(&paths.persistence_mode).is_empty());
    assert_eq!(device.backlight_mode(), BrightnessMode::Sensor);
}

#[test]
fn test_backlight_scaled_to_detected_panel_max() {
    let paths = common::paths();
    let (files, handle) = lights_hardware::mock::MockControlFiles::new();
    handle.set_contents(&paths.lcd_max_brightness, "4095\n");
    let device = lights_engine::LightsDevice::open(files, LightsConfig::default()).unwrap();

    assert_eq!(device.capabilities().max_brightness, 4095);
    device.set_backlight(&LightState::new(0x0080_8080)).unwrap();

    assert_eq!(handle.values_written(&paths.lcd_brightness), vec!["2055"]);
}

#[test]
fn test_backlight_failure_reports_first_and_keeps_writing() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();
    handle.make_unavailable(&paths.persistence_mode);
    handle.fail_writes(&paths.lcd_brightness);

    let state = LightState::new(WHITE).with_brightness_mode(BrightnessMode::LowPersistence);
    let report = device.apply(LightTarget::Backlight, &state);

    assert_eq!(
        report.paths(),
        vec![paths.persistence_mode.as_path(), paths.lcd_brightness.as_path()]
    );
    match report.into_result() {
        Err(LightsError::WriteFailed {
            attempted,
            failed,
            first,
        }) => {
            assert_eq!(attempted, 2);
            assert_eq!(failed, 2);
            assert!(first.is_unavailable());
            assert_eq!(first.path(), Some(paths.persistence_mode.as_path()));
        }
        other => panic!("expected WriteFailed, got {:?}", other),
    }

    // The mode still advanced: staying in low persistence writes nothing new.
    handle.restore(&paths.persistence_mode);
    handle.restore(&paths.lcd_brightness);
    device.set_backlight(&state).unwrap();
    assert!(handle.values_written(&paths.persistence_mode).is_empty());
}

// ============================================================================
// Buttons
// ============================================================================

#[test]
fn test_buttons_written_in_order() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();

    let report = device.apply(LightTarget::Buttons, &LightState::new(WHITE));
    assert!(report.is_ok());

    let written: Vec<_> = handle.writes().into_iter().map(|r| r.path).collect();
    assert_eq!(written, paths.buttons.to_vec());
}

#[test]
fn test_probed_buttons() {
    let paths = common::paths();
    let (files, handle) = lights_hardware::mock::MockControlFiles::new();
    handle.set_contents(&paths.buttons[0], "0\n");
    let config = LightsConfig::default().buttons(ButtonDetection::Probe);
    let device = lights_engine::LightsDevice::open(files, config).unwrap();

    device.set_buttons(&LightState::new(WHITE)).unwrap();

    assert_eq!(handle.values_written(&paths.buttons[0]), vec!["255"]);
    assert!(handle.values_written(&paths.buttons[1]).is_empty());
}

#[test]
fn test_buttons_attempt_every_node() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();
    handle.fail_writes(&paths.buttons[0]);

    let report = device.apply(LightTarget::Buttons, &LightState::new(WHITE));
    assert_eq!(report.attempted(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.failures().map(|o| o.path.as_path()).collect::<Vec<_>>(),
        vec![paths.buttons[0].as_path()]
    );
    assert_eq!(handle.values_written(&paths.buttons[1]), vec!["255"]);
}

// ============================================================================
// Failure reporting
// ============================================================================

#[test]
fn test_repeated_failures_reported_per_path() {
    let (device, handle, reporter) = common::open_mock_device_reporting();
    let paths = common::paths();
    handle.make_unavailable(&paths.indicator.blink);

    for _ in 0..3 {
        let result = device.set_battery(&LightState::new(RED));
        assert!(result.is_err());
    }

    assert_eq!(reporter.failures(&paths.indicator.blink), 3);
    assert_eq!(reporter.suppressed(&paths.indicator.blink), 2);
    assert_eq!(reporter.failures(&paths.indicator.brightness), 0);
    // Unreadable max brightness at open is reported as well.
    assert_eq!(reporter.failures(&paths.lcd_max_brightness), 1);
}

#[test]
fn test_handles_by_name() {
    let (device, handle) = common::open_mock_device();
    let paths = common::paths();

    for name in ["backlight", "buttons", "battery", "notifications", "attention"] {
        let light = device.open_target(name).unwrap();
        assert_eq!(light.target().name(), name);
        light.set_state(&LightState::new(WHITE)).unwrap();
    }

    assert_eq!(handle.values_written(&paths.lcd_brightness), vec!["255"]);
    assert_eq!(handle.values_written(&paths.indicator.brightness).len(), 3);
    assert!(matches!(
        device.open_target("lcd"),
        Err(LightsError::UnknownTarget(_))
    ));
}
