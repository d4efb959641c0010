// tests/config_loading.rs

mod common;
use crate::common::ConfigFileBuilder;

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use spinrun::config::load_and_validate;
use spinrun::errors::SpinrunError;
use spinrun::types::ReadErrorPolicy;

#[test]
fn full_config_round_trips_into_stages_and_options() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
idle_interval = "20ms"
event_buffer = 8
stream_errors = "strict"
keep_going = true

[display]
spinner_interval = "100ms"
width = 120
color = false

[[stage]]
header = "Setting up concert"

[[stage.task]]
label = "Preparing show"
cmd = "./test-scripts/noisy-good.sh"

[[stage]]
header = "Let the show begin"

[[stage.task]]
label = "Opening gates"
cmd = "echo"
args = ["gates", "open"]

[[stage.task]]
label = "Starting show"
cmd = "false"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    let options = cfg.processor_options();
    assert_eq!(options.idle_interval, Duration::from_millis(20));
    assert_eq!(options.event_buffer, 8);
    assert_eq!(options.stream_errors, ReadErrorPolicy::Strict);
    assert!(cfg.config.keep_going);
    assert_eq!(cfg.spinner_interval(), Duration::from_millis(100));
    assert_eq!(cfg.display.width, 120);
    assert!(!cfg.display.color);

    let stages = cfg.stages();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].header.as_deref(), Some("Setting up concert"));
    assert_eq!(stages[1].tasks.len(), 2);
    assert_eq!(stages[1].tasks[0].command_line(), "echo gates open");
    assert_eq!(cfg.task_count(), 3);
}

#[test]
fn defaults_apply_when_sections_are_missing() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[stage]]
[[stage.task]]
label = "Only"
cmd = "true"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    let options = cfg.processor_options();
    assert_eq!(options.idle_interval, Duration::from_millis(50));
    assert_eq!(options.event_buffer, 64);
    assert_eq!(options.stream_errors, ReadErrorPolicy::Lenient);
    assert!(!cfg.config.keep_going);
    assert!(cfg.display.color);
    assert_eq!(cfg.stages()[0].header, None);
}

#[test]
fn unknown_stream_policy_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
stream_errors = "sloppy"

[[stage]]
[[stage.task]]
label = "Only"
cmd = "true"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(SpinrunError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn bad_duration_is_a_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
idle_interval = "soon"

[[stage]]
[[stage.task]]
label = "Only"
cmd = "true"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(SpinrunError::ConfigError(msg)) => assert!(msg.contains("idle_interval")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match load_and_validate("/definitely/missing/Spinrun.toml") {
        Err(SpinrunError::IoError(_)) => {}
        other => panic!("expected IoError, got {other:?}"),
    }
}

#[test]
fn builder_produces_sequential_stages() {
    let cfg = ConfigFileBuilder::new()
        .stage(Some("Build"))
        .with_task("Compile", "make", &["all"])
        .stage(None)
        .with_task("Test", "make", &["test"])
        .keep_going(true)
        .build();

    let stages = cfg.stages();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].tasks[0].command_line(), "make all");
    assert_eq!(stages[1].header, None);
    assert!(cfg.config.keep_going);
}
