#![allow(dead_code)]

use spinrun::config::{ConfigFile, RawConfigFile, StageConfig, TaskConfig};
use spinrun::exec::Task;

/// A task that runs `script` through `sh -c`.
pub fn sh(label: &str, script: &str) -> Task {
    Task::new(label, "sh").arg("-c").arg(script)
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Start a new stage; subsequent `with_task` calls add to it.
    pub fn stage(mut self, header: Option<&str>) -> Self {
        self.config.stage.push(StageConfig {
            header: header.map(str::to_string),
            task: Vec::new(),
        });
        self
    }

    pub fn with_task(mut self, label: &str, cmd: &str, args: &[&str]) -> Self {
        if self.config.stage.is_empty() {
            self.config.stage.push(StageConfig::default());
        }
        if let Some(stage) = self.config.stage.last_mut() {
            stage.task.push(TaskConfig {
                label: label.to_string(),
                cmd: cmd.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });
        }
        self
    }

    pub fn idle_interval(mut self, value: &str) -> Self {
        self.config.config.idle_interval = value.to_string();
        self
    }

    pub fn keep_going(mut self, val: bool) -> Self {
        self.config.config.keep_going = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
