// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::StreamKind;

#[derive(Error, Debug)]
pub enum SpinrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The child was started but one of its output pipes was not available.
    #[error("error creating pipe for {stream} of task '{task}'")]
    Pipe { task: String, stream: StreamKind },

    #[error("error starting command for task '{task}': {source}")]
    Spawn {
        task: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed for a reason other than its exit status.
    #[error("error waiting on command for task '{task}': {source}")]
    Wait {
        task: String,
        #[source]
        source: std::io::Error,
    },

    /// Only produced with `stream_errors = "strict"`.
    #[error("error reading {stream} of task '{task}': {source}")]
    StreamRead {
        task: String,
        stream: StreamKind,
        #[source]
        source: std::io::Error,
    },

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpinrunError {
    /// True for errors raised while setting up or supervising a child
    /// process, as opposed to configuration or command failures.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            SpinrunError::Pipe { .. }
                | SpinrunError::Spawn { .. }
                | SpinrunError::Wait { .. }
                | SpinrunError::StreamRead { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SpinrunError>;
