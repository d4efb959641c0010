use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which of the child's output streams a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Terminal result of a run session.
///
/// Deliberately binary: the exit code is logged but not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// What a stream drainer does when a read fails mid-stream.
///
/// - `Lenient`: treat the error as end-of-stream and keep going (default).
/// - `Strict`: finish draining, then fail the run with
///   `SpinrunError::StreamRead` instead of reporting an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for ReadErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ReadErrorPolicy::Lenient),
            "strict" => Ok(ReadErrorPolicy::Strict),
            other => Err(format!(
                "invalid stream_errors: {other} (expected \"lenient\" or \"strict\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_policy_parses_case_insensitively() {
        assert_eq!("Strict".parse::<ReadErrorPolicy>(), Ok(ReadErrorPolicy::Strict));
        assert_eq!(" lenient ".parse::<ReadErrorPolicy>(), Ok(ReadErrorPolicy::Lenient));
        assert!("loose".parse::<ReadErrorPolicy>().is_err());
    }

    #[test]
    fn stream_kind_displays_like_the_pipe_name() {
        assert_eq!(StreamKind::Stdout.to_string(), "stdout");
        assert_eq!(StreamKind::Stderr.to_string(), "stderr");
    }
}
