// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SpinrunError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SpinrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_tasks(&raw)?;
        validate_tasks(&raw)?;
        validate_global_config(&raw)?;

        let idle_interval = resolve_interval("[config].idle_interval", &raw.config.idle_interval)?;
        let spinner_interval =
            resolve_interval("[display].spinner_interval", &raw.display.spinner_interval)?;

        Ok(ConfigFile::new_unchecked(raw, idle_interval, spinner_interval))
    }
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.stage.is_empty() {
        return Err(SpinrunError::ConfigError(
            "config must contain at least one [[stage]] section".to_string(),
        ));
    }
    for (index, stage) in cfg.stage.iter().enumerate() {
        if stage.task.is_empty() {
            let name = stage.header.as_deref().unwrap_or("<no header>");
            return Err(SpinrunError::ConfigError(format!(
                "stage {} ('{}') has no [[stage.task]] entries",
                index + 1,
                name
            )));
        }
    }
    Ok(())
}

fn validate_tasks(cfg: &RawConfigFile) -> Result<()> {
    for (index, task) in cfg.stage.iter().flat_map(|s| s.task.iter()).enumerate() {
        if task.label.trim().is_empty() {
            return Err(SpinrunError::ConfigError(format!(
                "task {} has an empty label",
                index + 1
            )));
        }
        if task.cmd.trim().is_empty() {
            return Err(SpinrunError::ConfigError(format!(
                "task '{}' has an empty cmd",
                task.label
            )));
        }
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    // stream_errors is strongly typed and validated during deserialization.
    if cfg.config.event_buffer == 0 {
        return Err(SpinrunError::ConfigError(
            "[config].event_buffer must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn resolve_interval(key: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| SpinrunError::ConfigError(format!("{key}: {e}")))?;
    if duration.is_zero() {
        return Err(SpinrunError::ConfigError(format!(
            "{key} must be greater than zero"
        )));
    }
    Ok(duration)
}

/// Parse a simple duration string like `"250ms"`, `"3s"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
