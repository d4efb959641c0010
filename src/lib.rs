// src/lib.rs

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, RawConfigFile, StageConfig, TaskConfig};
use crate::display::{PlainObserver, Summarizer, SummarizerConfig};
use crate::engine::SequenceRunner;
use crate::errors::SpinrunError;
use crate::exec::{Observer, Processor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (or an ad-hoc single task from the trailing command)
/// - CLI overrides
/// - the observer (spinner summary or plain lines)
/// - the processor and the sequence runner
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = resolve_config(&args)?;

    if args.keep_going {
        cfg.config.keep_going = true;
    }
    if let Some(policy) = args.stream_errors {
        cfg.config.stream_errors = policy;
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let observer = build_observer(&cfg, args.plain);
    let processor = Processor::with_options(observer, cfg.processor_options());
    let mut runner = SequenceRunner::new(processor);

    info!(tasks = cfg.task_count(), "running task sequence");
    let report = runner.run(&cfg.stages()).await?;

    if !report.all_succeeded() {
        return Err(SpinrunError::TaskFailed(report.failed.join(", ")).into());
    }
    Ok(())
}

/// Load the config file, or build a one-task config from `args.command`.
///
/// In ad-hoc mode an explicitly passed `--config` still supplies the
/// `[config]` and `[display]` sections; its stages are replaced.
fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    if args.command.is_empty() {
        let path = args
            .config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(config::default_config_path);
        debug!(path = %path.display(), "loading config");
        return Ok(config::load_and_validate(&path)?);
    }

    let mut raw = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    raw.stage = vec![adhoc_stage(args)];
    Ok(ConfigFile::try_from(raw)?)
}

fn adhoc_stage(args: &CliArgs) -> StageConfig {
    let (cmd, rest) = match args.command.split_first() {
        Some((cmd, rest)) => (cmd.clone(), rest.to_vec()),
        None => (String::new(), Vec::new()),
    };
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| args.command.join(" "));

    StageConfig {
        header: None,
        task: vec![TaskConfig {
            label,
            cmd,
            args: rest,
        }],
    }
}

fn build_observer(cfg: &ConfigFile, plain: bool) -> Box<dyn Observer> {
    if plain || !std::io::stdout().is_terminal() {
        debug!("using plain observer");
        Box::new(PlainObserver::stdout(cfg.config.keep_going))
    } else {
        Box::new(Summarizer::stdout(SummarizerConfig::from_config(cfg)))
    }
}

/// Simple dry-run output: print stages, tasks and commands.
fn print_dry_run(cfg: &ConfigFile) {
    println!("spinrun dry-run");
    println!("  config.idle_interval = {:?}", cfg.idle_interval());
    println!("  config.event_buffer = {}", cfg.config.event_buffer);
    println!("  config.stream_errors = {:?}", cfg.config.stream_errors);
    println!("  config.keep_going = {}", cfg.config.keep_going);
    println!();

    for stage in cfg.stages() {
        match &stage.header {
            Some(header) => println!("stage: {header}"),
            None => println!("stage:"),
        }
        for task in &stage.tasks {
            println!("  - {}", task.label);
            println!("      cmd: {}", task.command_line());
        }
    }

    debug!("dry-run complete (no execution)");
}
