//! Request scripts for `lightsctl replay`.
//!
//! One JSON object per line:
//!
//! ```text
//! {"target": "battery", "state": {"color": 16711680}}
//! {"target": "attention", "state": {"color": 255, "flash_mode": "timed", "flash_on_ms": 500, "flash_off_ms": 500}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Missing state fields
//! take their defaults, so `{"target": "attention"}` switches attention off.

use std::io::BufRead;

use anyhow::{Context, Result};
use lights_core::{LightState, LightTarget};
use serde::Deserialize;

/// One scripted light update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayRequest {
    pub target: LightTarget,

    #[serde(default)]
    pub state: LightState,
}

/// A request with the script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub number: usize,
    pub request: ReplayRequest,
}

/// Parse every request of a script.
///
/// # Errors
///
/// Fails on the first unreadable or malformed line, naming it.
pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("reading line {}", number))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let request: ReplayRequest =
            serde_json::from_str(trimmed).with_context(|| format!("parsing line {}", number))?;
        lines.push(ScriptLine { number, request });
    }

    Ok(lines)
}
