//! Subcommand execution, generic over the control file backend.

use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::{Context, Result, bail};
use lights_core::{LightState, LightTarget};
use lights_engine::{LightsConfig, LightsDevice, WriteReport};
use lights_hardware::{ControlFiles, KeyDisabler};
use serde_json::json;
use tracing::info;

use crate::replay::parse_script;
use crate::{Command, KeysAction};

pub(crate) fn execute<F: ControlFiles>(
    command: Command,
    config: LightsConfig,
    files: F,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Set {
            target,
            color,
            on_ms,
            off_ms,
            mode,
        } => {
            let mut state = LightState::new(color).with_brightness_mode(mode);
            if let (Some(on_ms), Some(off_ms)) = (on_ms, off_ms) {
                state = state.with_flash(on_ms, off_ms);
            }

            let device = LightsDevice::open(files, config)?;
            let report = device.apply(target, &state);
            print_report(out, target, &report)?;
            report
                .into_result()
                .with_context(|| format!("setting {}", target))
        }

        Command::Replay { file } => {
            let script = match &file {
                Some(path) => {
                    let reader = File::open(path)
                        .with_context(|| format!("opening {}", path.display()))?;
                    parse_script(BufReader::new(reader))?
                }
                None => parse_script(io::stdin().lock())?,
            };
            info!("replaying {} requests", script.len());

            let device = LightsDevice::open(files, config)?;
            let mut failed = 0;
            for line in &script {
                let target = line.request.target;
                let report = device.apply(target, &line.request.state);
                write!(out, "line {}: ", line.number)?;
                print_report(out, target, &report)?;
                if !report.is_ok() {
                    failed += 1;
                }
            }

            if failed > 0 {
                bail!("{} of {} requests had failed writes", failed, script.len());
            }
            Ok(())
        }

        Command::Info => {
            let device = LightsDevice::open(files, config)?;
            let (source, _) = device.active_indicator();
            let info = json!({
                "capabilities": device.capabilities(),
                "indicator_owner": source,
                "config": device.config(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            Ok(())
        }

        Command::Keys { action } => {
            let keys = KeyDisabler::new(files, config.paths.key_disabler.clone());
            if !keys.is_supported() && action != KeysAction::Status {
                bail!("key disabler nodes not present");
            }

            match action {
                KeysAction::Status => {
                    let state = match (keys.is_supported(), keys.is_enabled()?) {
                        (false, _) => "unsupported",
                        (true, true) => "enabled",
                        (true, false) => "disabled",
                    };
                    writeln!(out, "key disabler: {}", state)?;
                }
                KeysAction::Enable => keys.set_enabled(true)?,
                KeysAction::Disable => keys.set_enabled(false)?,
            }
            Ok(())
        }
    }
}

fn print_report(
    out: &mut impl Write,
    target: LightTarget,
    report: &WriteReport,
) -> io::Result<()> {
    if report.is_ok() {
        return writeln!(out, "{}: {} writes ok", target, report.attempted());
    }

    writeln!(
        out,
        "{}: {} of {} writes failed",
        target,
        report.failed(),
        report.attempted()
    )?;
    for failure in report.failures() {
        if let Err(e) = &failure.result {
            writeln!(out, "  {}: {}", failure.path.display(), e)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lights_core::{BrightnessMode, Color};
    use lights_hardware::mock::MockControlFiles;
    use tempfile::NamedTempFile;

    fn set(target: LightTarget, color: u32, flash: Option<(u32, u32)>) -> Command {
        Command::Set {
            target,
            color: Color::from_argb(color),
            on_ms: flash.map(|(on, _)| on),
            off_ms: flash.map(|(_, off)| off),
            mode: BrightnessMode::User,
        }
    }

    #[test]
    fn test_set_blinking_notification() {
        let config = LightsConfig::default();
        let led = config.paths.indicator.clone();
        let (files, handle) = MockControlFiles::new();
        let mut out = Vec::new();

        execute(
            set(LightTarget::Notifications, 0xFFFF_FFFF, Some((1000, 1000))),
            config,
            files,
            &mut out,
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "notifications: 7 writes ok\n");
        assert_eq!(handle.values_written(&led.blink), vec!["0", "1"]);
    }

    #[test]
    fn test_set_reports_failed_writes() {
        let config = LightsConfig::default();
        let (files, handle) = MockControlFiles::new();
        handle.make_unavailable(&config.paths.buttons[1]);
        let mut out = Vec::new();

        let result = execute(set(LightTarget::Buttons, 0xFFFF_FFFF, None), config, files, &mut out);

        assert!(result.is_err());
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("buttons: 1 of 2 writes failed\n"));
        assert!(output.contains("button-backlight1/brightness"));
    }

    #[test]
    fn test_replay_keeps_state_between_requests() {
        let config = LightsConfig::default();
        let led = config.paths.indicator.clone();
        let (files, handle) = MockControlFiles::new();
        let mut script = NamedTempFile::new().unwrap();
        writeln!(script, r#"{{"target": "battery", "state": {{"color": 16711680}}}}"#).unwrap();
        writeln!(script, r#"{{"target": "attention", "state": {{"color": 255}}}}"#).unwrap();
        writeln!(script, r#"{{"target": "attention"}}"#).unwrap();
        let mut out = Vec::new();

        execute(
            Command::Replay {
                file: Some(script.path().to_path_buf()),
            },
            config,
            files,
            &mut out,
        )
        .unwrap();

        assert_eq!(
            handle.values_written(&led.brightness),
            vec!["76", "28", "76"]
        );
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_info_json() {
        let config = LightsConfig::default();
        let (files, handle) = MockControlFiles::new();
        handle.set_contents(&config.paths.lcd_max_brightness, "4095\n");
        let mut out = Vec::new();

        execute(Command::Info, config, files, &mut out).unwrap();

        let info: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(info["capabilities"]["max_brightness"], 4095);
        assert_eq!(info["capabilities"]["buttons"], 3);
        assert_eq!(info["indicator_owner"], "battery");
        assert_eq!(info["config"]["ramp_step_ms"], 50);
    }

    #[test]
    fn test_keys_enable() {
        let config = LightsConfig::default();
        let keys = config.paths.key_disabler.clone();
        let (files, handle) = MockControlFiles::new();
        for node in keys.all() {
            handle.set_contents(node, "1\n");
        }
        let mut out = Vec::new();

        execute(
            Command::Keys {
                action: KeysAction::Enable,
            },
            config,
            files,
            &mut out,
        )
        .unwrap();

        for node in keys.all() {
            assert_eq!(handle.values_written(node), vec!["0"]);
        }
    }

    #[test]
    fn test_keys_enable_without_nodes() {
        let (files, handle) = MockControlFiles::new();
        let mut out = Vec::new();

        let result = execute(
            Command::Keys {
                action: KeysAction::Enable,
            },
            LightsConfig::default(),
            files,
            &mut out,
        );

        assert!(result.is_err());
        assert_eq!(handle.write_count(), 0);
    }

    #[test]
    fn test_keys_status_unsupported() {
        let (files, _handle) = MockControlFiles::new();
        let mut out = Vec::new();

        execute(
            Command::Keys {
                action: KeysAction::Status,
            },
            LightsConfig::default(),
            files,
            &mut out,
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "key disabler: unsupported\n");
    }
}
