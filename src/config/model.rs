// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::engine::Stage;
use crate::exec::{ProcessorOptions, Task};
use crate::types::ReadErrorPolicy;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// idle_interval = "50ms"
/// keep_going = false
///
/// [display]
/// width = 0
///
/// [[stage]]
/// header = "Setting up concert"
///
/// [[stage.task]]
/// label = "Preparing show"
/// cmd = "./test-scripts/noisy-good.sh"
/// ```
///
/// All sections are optional and have reasonable defaults, but validation
/// requires at least one stage with at least one task.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Engine behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Terminal presentation from `[display]`.
    #[serde(default)]
    pub display: DisplaySection,

    /// Stages from `[[stage]]`, run in file order.
    #[serde(default)]
    pub stage: Vec<StageConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Minimum time between idle ticks (`"50ms"`, `"1s"`, ...).
    #[serde(default = "default_interval")]
    pub idle_interval: String,

    /// Capacity of the per-session event queue.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// `"lenient"` (default) or `"strict"`.
    #[serde(default)]
    pub stream_errors: ReadErrorPolicy,

    /// Continue with the remaining tasks after a failure.
    #[serde(default)]
    pub keep_going: bool,
}

fn default_interval() -> String {
    "50ms".to_string()
}

fn default_event_buffer() -> usize {
    64
}

fn default_color() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            idle_interval: default_interval(),
            event_buffer: default_event_buffer(),
            stream_errors: ReadErrorPolicy::default(),
            keep_going: false,
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySection {
    /// How often the spinner frame may advance.
    #[serde(default = "default_interval")]
    pub spinner_interval: String,

    /// Line width for task output; `0` means "ask the terminal".
    #[serde(default)]
    pub width: usize,

    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            spinner_interval: default_interval(),
            width: 0,
            color: default_color(),
        }
    }
}

/// One `[[stage]]` entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StageConfig {
    #[serde(default)]
    pub header: Option<String>,

    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// One `[[stage.task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Human-readable label shown while the task runs.
    pub label: String,

    /// Program to execute (looked up on `PATH` if not a path).
    pub cmd: String,

    /// Arguments passed verbatim; no shell expansion.
    #[serde(default)]
    pub args: Vec<String>,
}

impl TaskConfig {
    pub fn to_task(&self) -> Task {
        Task::new(&self.label, &self.cmd).args(self.args.iter().cloned())
    }
}

/// Validated configuration with its durations resolved.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub display: DisplaySection,
    pub stage: Vec<StageConfig>,
    idle_interval: Duration,
    spinner_interval: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        idle_interval: Duration,
        spinner_interval: Duration,
    ) -> Self {
        Self {
            config: raw.config,
            display: raw.display,
            stage: raw.stage,
            idle_interval,
            spinner_interval,
        }
    }

    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    pub fn spinner_interval(&self) -> Duration {
        self.spinner_interval
    }

    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            idle_interval: self.idle_interval,
            event_buffer: self.config.event_buffer,
            stream_errors: self.config.stream_errors,
        }
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.stage
            .iter()
            .map(|s| Stage::new(s.header.clone(), s.task.iter().map(TaskConfig::to_task).collect()))
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.stage.iter().map(|s| s.task.len()).sum()
    }
}
