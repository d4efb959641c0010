// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::ReadErrorPolicy;

/// Command-line arguments for `spinrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spinrun",
    version,
    about = "Run a sequence of commands with a live progress summary.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Spinrun.toml` in the current working directory. When a
    /// trailing command is given, the file is only read if passed explicitly.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPINRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task plan, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep running the remaining tasks after one fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Print one line per event instead of redrawing a spinner.
    ///
    /// Implied when stdout is not a terminal.
    #[arg(long)]
    pub plain: bool,

    /// What to do when reading a command's output fails: `lenient` or `strict`.
    #[arg(long, value_name = "POLICY")]
    pub stream_errors: Option<ReadErrorPolicy>,

    /// Label for an ad-hoc command (defaults to the command line itself).
    #[arg(long, value_name = "TEXT", requires = "command")]
    pub label: Option<String>,

    /// Run this single command instead of the config file's stages.
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_command_is_collected_after_double_dash() {
        let args = CliArgs::try_parse_from([
            "spinrun", "--label", "Greet", "--", "echo", "-n", "hi",
        ])
        .unwrap();
        assert_eq!(args.label.as_deref(), Some("Greet"));
        assert_eq!(args.command, vec!["echo", "-n", "hi"]);
        assert!(args.config.is_none());
    }

    #[test]
    fn stream_errors_parses_policy() {
        let args = CliArgs::try_parse_from(["spinrun", "--stream-errors", "strict"]).unwrap();
        assert_eq!(args.stream_errors, Some(ReadErrorPolicy::Strict));
    }

    #[test]
    fn label_requires_a_command() {
        assert!(CliArgs::try_parse_from(["spinrun", "--label", "x"]).is_err());
    }
}
