//! Light updates against a real directory tree.
//!
//! The stock node layout is recreated under a temporary directory and the
//! device is opened with every path re-rooted there.

use std::fs;
use std::path::Path;

use lights_core::{BrightnessMode, LightState};
use lights_engine::{LightsConfig, LightsDevice, LightsError};
use lights_hardware::{DevicePaths, KeyDisabler, SysfsFiles};
use tempfile::TempDir;

fn create_node(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_node(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// Temporary tree with every node present.
fn staged_tree(max_brightness: &str) -> (TempDir, LightsConfig) {
    let dir = TempDir::new().unwrap();
    let config = LightsConfig::default().rerooted(dir.path());
    let paths = &config.paths;

    create_node(&paths.lcd_brightness, "0\n");
    create_node(&paths.lcd_max_brightness, max_brightness);
    create_node(&paths.persistence_mode, "0\n");
    for button in &paths.buttons {
        create_node(button, "0\n");
    }
    let led = &paths.indicator;
    for node in [
        &led.brightness,
        &led.blink,
        &led.duty_pcts,
        &led.start_idx,
        &led.pause_lo,
        &led.pause_hi,
        &led.ramp_step_ms,
    ] {
        create_node(node, "0\n");
    }
    for node in paths.key_disabler.all() {
        create_node(node, "1\n");
    }

    (dir, config)
}

#[test]
fn test_backlight_on_staged_panel() {
    let (_dir, config) = staged_tree("1023\n");
    let paths = config.paths.clone();
    let device = LightsDevice::open(SysfsFiles::new(), config).unwrap();

    assert_eq!(device.capabilities().max_brightness, 1023);
    assert!(device.capabilities().max_brightness_detected);

    device.set_backlight(&LightState::new(0x0064_6464)).unwrap();
    assert_eq!(read_node(&paths.lcd_brightness), "401\n");

    let low = LightState::new(0x0064_6464).with_brightness_mode(BrightnessMode::LowPersistence);
    device.set_backlight(&low).unwrap();
    assert_eq!(read_node(&paths.persistence_mode), "1\n");
    assert_eq!(read_node(&paths.lcd_brightness), "128\n");
}

#[test]
fn test_blink_program_lands_in_nodes() {
    let (_dir, config) = staged_tree("255\n");
    let led = config.paths.indicator.clone();
    let device = LightsDevice::open(SysfsFiles::new(), config).unwrap();

    device
        .set_notification(&LightState::new(0x00FF_FFFF).with_flash(1000, 3000))
        .unwrap();

    assert_eq!(read_node(&led.blink), "1\n");
    assert_eq!(read_node(&led.duty_pcts), "0,12,25,37,50,72,85,100\n");
    assert_eq!(read_node(&led.pause_lo), "3000\n");
    assert_eq!(read_node(&led.pause_hi), "200\n");
    assert_eq!(read_node(&led.ramp_step_ms), "50\n");
    // Steady brightness is not touched by a blink program.
    assert_eq!(read_node(&led.brightness), "0\n");
}

#[test]
fn test_missing_node_is_not_created() {
    let (_dir, config) = staged_tree("255\n");
    let paths = config.paths.clone();
    fs::remove_file(&paths.buttons[1]).unwrap();
    let device = LightsDevice::open(SysfsFiles::new(), config).unwrap();

    let result = device.set_buttons(&LightState::new(0x00FF_FFFF));

    match result {
        Err(LightsError::WriteFailed { failed, first, .. }) => {
            assert_eq!(failed, 1);
            assert!(first.is_unavailable());
        }
        other => panic!("expected WriteFailed, got {:?}", other),
    }
    assert_eq!(read_node(&paths.buttons[0]), "255\n");
    assert!(!paths.buttons[1].exists());
}

#[test]
fn test_config_file_with_reroot() {
    let (dir, _config) = staged_tree("255\n");
    let config_path = dir.path().join("lights.toml");
    fs::write(&config_path, "low_persistence_brightness = 96\n").unwrap();

    let config = LightsConfig::load(&config_path).unwrap().rerooted(dir.path());
    let lcd = config.paths.lcd_brightness.clone();
    let device = LightsDevice::open(SysfsFiles::new(), config).unwrap();

    let low = LightState::new(0x00FF_FFFF).with_brightness_mode(BrightnessMode::LowPersistence);
    device.set_backlight(&low).unwrap();
    assert_eq!(read_node(&lcd), "96\n");
}

#[test]
fn test_key_disabler_on_staged_tree() {
    let (dir, _config) = staged_tree("255\n");
    let paths = DevicePaths::default().rerooted(dir.path()).key_disabler;
    let keys = KeyDisabler::new(SysfsFiles::new(), paths.clone());

    assert!(keys.is_supported());
    assert!(!keys.is_enabled().unwrap());

    keys.set_enabled(true).unwrap();
    assert!(keys.is_enabled().unwrap());
    for node in paths.all() {
        assert_eq!(read_node(node), "0\n");
    }
}
