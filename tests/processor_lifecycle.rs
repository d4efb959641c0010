// tests/processor_lifecycle.rs

mod common;
use crate::common::{Observed, RecordingObserver, init_tracing, recording_processor, sh, with_timeout};

use std::error::Error;

use spinrun::errors::SpinrunError;
use spinrun::exec::Task;
use spinrun::types::Outcome;

type TestResult = Result<(), Box<dyn Error>>;

fn out(s: &str) -> Observed {
    Observed::Out(s.to_string())
}

fn err(s: &str) -> Observed {
    Observed::Err(s.to_string())
}

fn init(s: &str) -> Observed {
    Observed::Initialize(s.to_string())
}

#[tokio::test]
async fn stdout_lines_then_clean_exit() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let outcome = with_timeout(processor.run(&sh("Print", "echo a; echo b; exit 0"))).await?;

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(
        recorder.events_without_idle(),
        vec![init("Print"), out("a"), out("b"), Observed::Success]
    );
    Ok(())
}

#[tokio::test]
async fn stderr_line_then_failing_exit() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let outcome =
        with_timeout(processor.run(&sh("Complain", "echo 'it broke' >&2; exit 1"))).await?;

    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(
        recorder.events_without_idle(),
        vec![init("Complain"), err("it broke"), Observed::Failure]
    );
    Ok(())
}

#[tokio::test]
async fn silent_command_gets_idle_ticks_before_success() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let outcome = with_timeout(processor.run(&Task::new("Nap", "sleep").arg("0.2"))).await?;

    assert_eq!(outcome, Outcome::Success);
    let events = recorder.events();
    assert_eq!(events.first(), Some(&init("Nap")));
    assert_eq!(events.last(), Some(&Observed::Success));
    assert!(events.contains(&Observed::Idle));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, Observed::Out(_) | Observed::Err(_)))
    );
    Ok(())
}

#[tokio::test]
async fn instant_exit_still_idles_before_success() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    // `true` exits before the dispatcher gets to the ticker; repeat to catch
    // the launcher winning the race.
    for _ in 0..50 {
        recorder.clear();
        let outcome = with_timeout(processor.run(&Task::new("Instant", "true"))).await?;
        assert_eq!(outcome, Outcome::Success);

        let events = recorder.events();
        assert_eq!(events[0], init("Instant"));
        assert_eq!(events[1], Observed::Idle);
        assert_eq!(events.last(), Some(&Observed::Success));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, Observed::Out(_) | Observed::Err(_)))
        );
    }
    Ok(())
}

#[tokio::test]
async fn missing_program_is_a_setup_error_with_no_events() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let task = Task::new("Ghost", "/definitely/not/a/real/program");
    let result = with_timeout(processor.run(&task)).await;

    match result {
        Err(SpinrunError::Spawn { task, .. }) => assert_eq!(task, "Ghost"),
        other => panic!("expected Spawn error, got {other:?}"),
    }
    assert!(recorder.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn killed_by_signal_is_a_failure() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let outcome = with_timeout(processor.run(&sh("Doomed", "kill -9 $$"))).await?;

    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(recorder.events_without_idle().last(), Some(&Observed::Failure));
    Ok(())
}

#[tokio::test]
async fn per_stream_order_is_preserved_under_interleaving() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let script = "i=1; while [ $i -le 200 ]; do echo out$i; echo err$i >&2; i=$((i+1)); done";
    let outcome = with_timeout(processor.run(&sh("Chatty", script))).await?;
    assert_eq!(outcome, Outcome::Success);

    let events = recorder.events_without_idle();
    let stdout: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            Observed::Out(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    let stderr: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            Observed::Err(s) => Some(s.clone()),
            _ => None,
        })
        .collect();

    let expected_out: Vec<String> = (1..=200).map(|i| format!("out{i}")).collect();
    let expected_err: Vec<String> = (1..=200).map(|i| format!("err{i}")).collect();
    assert_eq!(stdout, expected_out);
    assert_eq!(stderr, expected_err);

    // Outcome is the very last event; nothing trails it.
    assert_eq!(events.last(), Some(&Observed::Success));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    Ok(())
}

#[tokio::test]
async fn trailing_output_is_delivered_before_outcome() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    // Last line has no newline and is written right before exiting.
    let outcome =
        with_timeout(processor.run(&sh("Tail", "sleep 0.05; printf 'last words'; exit 3"))).await?;

    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(
        recorder.events_without_idle(),
        vec![init("Tail"), out("last words"), Observed::Failure]
    );
    Ok(())
}

#[tokio::test]
async fn lines_are_delivered_verbatim() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let outcome = with_timeout(processor.run(
        &Task::new("Verbatim", "printf").arg("  spaced  \n\ncrlf\r\n"),
    ))
    .await?;

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(
        recorder.events_without_idle(),
        vec![
            init("Verbatim"),
            out("  spaced  "),
            out(""),
            out("crlf"),
            Observed::Success
        ]
    );
    Ok(())
}

#[tokio::test]
async fn sessions_never_overlap() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let mut processor = recording_processor(recorder.clone());

    let first = with_timeout(processor.run(&sh("First", "sleep 0.1; echo one"))).await?;
    let second = with_timeout(processor.run(&sh("Second", "echo two; exit 2"))).await?;

    assert_eq!(first, Outcome::Success);
    assert_eq!(second, Outcome::Failure);
    assert_eq!(
        recorder.events_without_idle(),
        vec![
            init("First"),
            out("one"),
            Observed::Success,
            init("Second"),
            out("two"),
            Observed::Failure,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn observer_survives_across_runs() -> TestResult {
    init_tracing();
    let recorder = RecordingObserver::new();
    let log = recorder.log();
    let mut processor = recording_processor(recorder);

    with_timeout(processor.run(&sh("One", "echo 1"))).await?;
    let after_first = log.lock().unwrap().len();
    with_timeout(processor.run(&sh("Two", "echo 2"))).await?;

    // Both sessions land in the same log, the second after the first.
    assert_eq!(log.lock().unwrap()[after_first], init("Two"));
    let initialized = processor
        .observer()
        .events()
        .into_iter()
        .filter(|e| matches!(e, Observed::Initialize(_)))
        .count();
    assert_eq!(initialized, 2);
    Ok(())
}
