// src/display/summarizer.rs

//! Spinner-style terminal observer.
//!
//! While a task runs, the summarizer owns two terminal lines:
//!
//! ```text
//!     ⠹ Preparing show      <- spinner line, redrawn in place
//!       last output line    <- output slot, overwritten per line
//! ```
//!
//! On success the spinner line becomes `✓ label` and the slot is cleared for
//! the next task. On failure it becomes `✖ label`, followed by an error
//! header and every line the task printed.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print};
use crossterm::terminal::{self, Clear, ClearType};
use tracing::debug;

use crate::config::ConfigFile;
use crate::display::{Paint, truncate_to_width};
use crate::exec::Observer;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TASK_SUCCESS: &str = "✓";
const TASK_FAILURE: &str = "✖";

const HEADER_INDENT: &str = "  ";
const TASK_INDENT: &str = "    ";
const OUTPUT_INDENT: &str = "      ";

/// Columns reserved for indentation and the cursor.
const RESERVED_COLUMNS: usize = OUTPUT_INDENT.len() + 1;
const FALLBACK_TERMINAL_WIDTH: usize = 80;
const MIN_LINE_WIDTH: usize = 10;

const ERROR_LINE: Paint = Paint::new(Color::Red, &[]);
const SUCCESS: Paint = Paint::new(Color::Green, &[Attribute::Bold]);
const FAILURE: Paint = Paint::new(Color::Red, &[Attribute::Bold]);
const STACK: Paint = Paint::new(Color::Red, &[Attribute::Dim]);
const ERROR_HEADER: Paint = Paint::new(Color::Red, &[Attribute::Bold, Attribute::Reverse]);
const HEADER: Paint = Paint::new(Color::Magenta, &[Attribute::Bold]);
const SPINNER: Paint = Paint::new(Color::Yellow, &[Attribute::Bold]);
const SPINNER_PROMPT: Paint = Paint::new(Color::Yellow, &[Attribute::Bold, Attribute::Underlined]);

/// Formatting and sizing for a [`Summarizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizerConfig {
    /// Maximum display width of a label or output line.
    pub line_width: usize,
    /// Minimum time between two spinner frames.
    pub spinner_interval: Duration,
    pub color: bool,
    /// Continue a sequence after a failed task.
    pub keep_going: bool,
}

impl SummarizerConfig {
    /// Derive the display settings from a validated config.
    ///
    /// A `[display].width` of 0 asks the terminal for its size.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let terminal_width = match cfg.display.width {
            0 => detect_terminal_width(),
            width => width,
        };
        Self {
            line_width: line_width_for(terminal_width),
            spinner_interval: cfg.spinner_interval(),
            color: cfg.display.color,
            keep_going: cfg.config.keep_going,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            line_width: line_width_for(FALLBACK_TERMINAL_WIDTH),
            spinner_interval: Duration::from_millis(50),
            color: true,
            keep_going: false,
        }
    }
}

fn detect_terminal_width() -> usize {
    terminal::size()
        .map(|(cols, _rows)| usize::from(cols))
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

fn line_width_for(terminal_width: usize) -> usize {
    terminal_width
        .saturating_sub(RESERVED_COLUMNS)
        .max(MIN_LINE_WIDTH)
}

/// Terminal observer drawing a spinner per task.
pub struct Summarizer<W: Write> {
    out: W,
    config: SummarizerConfig,
    task_name: String,
    history: Vec<String>,
    spinner_position: usize,
    last_spin: Instant,
}

impl Summarizer<Stdout> {
    pub fn stdout(config: SummarizerConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> Summarizer<W> {
    pub fn new(out: W, config: SummarizerConfig) -> Self {
        Self {
            out,
            config,
            task_name: String::new(),
            history: Vec::new(),
            spinner_position: 0,
            last_spin: Instant::now(),
        }
    }

    /// Every line the current (or last) task printed, both streams.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_position % SPINNER_FRAMES.len()]
    }

    /// Draw the spinner line and step past the output slot.
    ///
    /// `clear_slot` wipes the slot too; redraws leave it alone so the last
    /// output line stays visible.
    fn print_spinner(&mut self, clear_slot: bool) -> io::Result<()> {
        let color = self.config.color;
        let frame = format!("{} ", self.spinner_frame());
        queue!(self.out, Clear(ClearType::CurrentLine), Print(TASK_INDENT))?;
        SPINNER.queue(&mut self.out, color, &frame)?;
        SPINNER_PROMPT.queue(&mut self.out, color, &self.task_name)?;
        queue!(self.out, Print("\n"))?;
        if clear_slot {
            queue!(self.out, Clear(ClearType::CurrentLine))?;
        }
        queue!(self.out, Print("\n"))?;

        if self.last_spin.elapsed() > self.config.spinner_interval {
            self.spinner_position += 1;
            self.last_spin = Instant::now();
        }
        Ok(())
    }

    fn reprint_spinner(&mut self) -> io::Result<()> {
        queue!(self.out, MoveUp(2))?;
        self.print_spinner(false)
    }

    fn print_output(&mut self, line: String, is_error: bool) -> io::Result<()> {
        self.reprint_spinner()?;
        let shown = format!(
            "{OUTPUT_INDENT}{}",
            truncate_to_width(&line, self.config.line_width)
        );
        self.history.push(line);

        queue!(self.out, MoveUp(1), Clear(ClearType::CurrentLine))?;
        if is_error {
            ERROR_LINE.queue(&mut self.out, self.config.color, &shown)?;
        } else {
            queue!(self.out, Print(&shown))?;
        }
        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }

    fn print_success(&mut self) -> io::Result<()> {
        let line = format!("{TASK_INDENT}{TASK_SUCCESS} {}", self.task_name);
        queue!(self.out, MoveUp(2), Clear(ClearType::CurrentLine))?;
        SUCCESS.queue(&mut self.out, self.config.color, &line)?;
        queue!(self.out, Print("\n"), Clear(ClearType::CurrentLine))?;
        self.out.flush()
    }

    fn print_failure(&mut self) -> io::Result<()> {
        let color = self.config.color;
        let line = format!("{TASK_INDENT}{TASK_FAILURE} {}", self.task_name);
        queue!(self.out, MoveUp(2), Clear(ClearType::CurrentLine))?;
        FAILURE.queue(&mut self.out, color, &line)?;
        queue!(
            self.out,
            Print("\n"),
            Clear(ClearType::CurrentLine),
            Print("\n"),
            Clear(ClearType::CurrentLine),
            Print(HEADER_INDENT)
        )?;
        let header = format!("Error executing task '{}':", self.task_name);
        ERROR_HEADER.queue(&mut self.out, color, &header)?;
        queue!(self.out, Print("\n"))?;

        for msg in &self.history {
            queue!(self.out, Clear(ClearType::CurrentLine))?;
            STACK.queue(&mut self.out, color, &format!("{TASK_INDENT}{msg}"))?;
            queue!(self.out, Print("\n"))?;
        }
        queue!(self.out, Clear(ClearType::CurrentLine), Print("\n"))?;
        self.out.flush()
    }

    fn print_header(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            Clear(ClearType::CurrentLine),
            Print("\n"),
            Clear(ClearType::CurrentLine),
            Print(HEADER_INDENT)
        )?;
        HEADER.queue(&mut self.out, self.config.color, text)?;
        queue!(
            self.out,
            Print("\n"),
            Clear(ClearType::CurrentLine),
            Print("\n")
        )?;
        self.out.flush()
    }

    fn drawn(result: io::Result<()>) {
        if let Err(err) = result {
            debug!(error = %err, "failed to draw task summary");
        }
    }
}

impl<W: Write> Observer for Summarizer<W> {
    fn initialize(&mut self, label: &str) {
        self.task_name = truncate_to_width(label, self.config.line_width).into_owned();
        self.history.clear();
        self.spinner_position = 0;
        self.last_spin = Instant::now();
        let result = self
            .print_spinner(true)
            .and_then(|()| self.out.flush());
        Self::drawn(result);
    }

    fn on_idle(&mut self) {
        let result = self.reprint_spinner().and_then(|()| self.out.flush());
        Self::drawn(result);
    }

    fn on_output_line(&mut self, line: String) {
        let result = self.print_output(line, false);
        Self::drawn(result);
    }

    fn on_error_line(&mut self, line: String) {
        let result = self.print_output(line, true);
        Self::drawn(result);
    }

    fn on_success(&mut self) {
        let result = self.print_success();
        Self::drawn(result);
    }

    fn on_failure(&mut self) {
        let result = self.print_failure();
        Self::drawn(result);
    }

    fn header(&mut self, text: &str) {
        let result = self.print_header(text);
        Self::drawn(result);
    }

    fn halt_on_failure(&self) -> bool {
        !self.config.keep_going
    }
}
