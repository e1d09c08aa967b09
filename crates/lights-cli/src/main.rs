//! `lightsctl`: drive the device lights from the command line.

mod commands;
mod replay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lights_core::{BrightnessMode, Color, LightTarget};
use lights_engine::LightsConfig;
use lights_hardware::SysfsFiles;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "lightsctl",
    version,
    about = "Drive backlight, button and indicator lights through their control nodes"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Re-root every control node under this directory
    #[arg(long, global = true)]
    sysfs_root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply one light state
    Set {
        /// backlight, buttons, battery, notifications or attention
        target: LightTarget,

        /// Color as 0xAARRGGBB, #RRGGBB, #AARRGGBB or decimal
        #[arg(long, default_value = "0xFFFFFFFF")]
        color: Color,

        /// Flash on duration in milliseconds
        #[arg(long, requires = "off_ms")]
        on_ms: Option<u32>,

        /// Flash off duration in milliseconds
        #[arg(long, requires = "on_ms")]
        off_ms: Option<u32>,

        /// user, sensor or low-persistence
        #[arg(long, default_value = "user")]
        mode: BrightnessMode,
    },

    /// Apply newline-delimited JSON requests in order on one device
    Replay {
        /// Request file; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Print detected capabilities and the effective configuration as JSON
    Info,

    /// Capacitive key disabler
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum KeysAction {
    /// Print whether the key disabler is on
    Status,
    /// Turn the key disabler on (keys off)
    Enable,
    /// Turn the key disabler off (keys on)
    Disable,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<LightsConfig> {
    let config = match &cli.config {
        Some(path) => LightsConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => LightsConfig::default(),
    };

    Ok(match &cli.sysfs_root {
        Some(root) => config.rerooted(root),
        None => config,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, config, SysfsFiles::new(), &mut stdout)
}
