#![allow(dead_code)]

pub use spinrun_test_utils::builders::{sh, ConfigFileBuilder};
pub use spinrun_test_utils::recorder::{Observed, RecordingObserver};
pub use spinrun_test_utils::{init_tracing, with_timeout};

use spinrun::exec::{Processor, ProcessorOptions};

/// A processor with a short idle interval so tests don't wait on ticks.
pub fn recording_processor(observer: RecordingObserver) -> Processor<RecordingObserver> {
    Processor::with_options(
        observer,
        ProcessorOptions {
            idle_interval: std::time::Duration::from_millis(5),
            ..ProcessorOptions::default()
        },
    )
}
