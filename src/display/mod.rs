// src/display/mod.rs

//! Observers that present run sessions to a user.
//!
//! - [`summarizer`] redraws a spinner line per task on an ANSI terminal and
//!   dumps the task's output history when it fails.
//! - [`plain`] writes one line per event, for pipes, CI logs and `--plain`.
//!
//! Neither is part of the supervision core; they only implement
//! [`Observer`](crate::exec::Observer).

pub mod plain;
pub mod summarizer;

pub use plain::PlainObserver;
pub use summarizer::{Summarizer, SummarizerConfig};

use std::borrow::Cow;
use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Shorten `text` so that it (plus a cursor cell) fits in `width` columns,
/// ending it with `...` when something was cut.
pub fn truncate_to_width(text: &str, width: usize) -> Cow<'_, str> {
    if text.width() < width {
        return Cow::Borrowed(text);
    }

    let budget = width.saturating_sub(ELLIPSIS.len() + 1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Foreground color plus attributes, applied only when color is enabled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paint {
    pub color: Color,
    pub attributes: &'static [Attribute],
}

impl Paint {
    pub const fn new(color: Color, attributes: &'static [Attribute]) -> Self {
        Self { color, attributes }
    }

    /// Queue `text` on `out`, wrapped in this style if `enabled`.
    pub fn queue<W: Write>(&self, out: &mut W, enabled: bool, text: &str) -> io::Result<()> {
        if !enabled {
            return queue!(out, Print(text));
        }

        queue!(out, SetForegroundColor(self.color))?;
        for attribute in self.attributes {
            queue!(out, SetAttribute(*attribute))?;
        }
        queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)
    }
}
