use std::collections::VecDeque;

use serde::Deserialize;
use thiserror::Error;

pub const MAX_INPUT_CHARS: usize = 256;
pub const CARET_GLYPH: &str = "\u{2588}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("undefined console text emphasis code {0} (expected 0, 1 or 2)")]
    UnknownEmphasis(u8),
    #[error("command name cannot be empty")]
    EmptyCommandName,
    #[error("duplicate command registration: {0}")]
    DuplicateCommand(String),
    #[error("console log capacity must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    id: LineId,
    text: String,
}

impl ConsoleLine {
    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Fixed-capacity scrollback; pushing past capacity evicts the oldest line.
///
/// Lines keep a stable [`LineId`] so a running sequence can keep rewriting
/// "its" line. Writes through an id whose line was evicted or cleared are
/// dropped.
#[derive(Debug, Clone)]
pub struct BoundedLog {
    capacity: usize,
    lines: VecDeque<ConsoleLine>,
    next_id: u64,
}

impl BoundedLog {
    pub fn new(capacity: usize) -> Result<Self, ConsoleError> {
        if capacity == 0 {
            return Err(ConsoleError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
            next_id: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push(&mut self, text: impl Into<String>) -> LineId {
        let id = LineId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(ConsoleLine {
            id,
            text: text.into(),
        });
        id
    }

    /// Returns false when the line is no longer in the log.
    pub fn set_text(&mut self, id: LineId, text: impl Into<String>) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn append_text(&mut self, id: LineId, suffix: &str) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.text.push_str(suffix);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: LineId) -> bool {
        let Some(index) = self.lines.iter().position(|line| line.id == id) else {
            return false;
        };
        self.lines.remove(index);
        true
    }

    pub fn text(&self, id: LineId) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.id == id)
            .map(ConsoleLine::text)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(ConsoleLine::text)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(ConsoleLine::text)
    }

    /// Oldest first, every line terminated by `\n`.
    pub fn render_into(&self, out: &mut String) {
        out.clear();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut ConsoleLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }
}

/// Text being typed at the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Control characters and input past [`MAX_INPUT_CHARS`] are ignored.
    pub fn push_char(&mut self, ch: char) {
        if ch.is_control() || self.buffer.chars().count() >= MAX_INPUT_CHARS {
            return;
        }
        self.buffer.push(ch);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Visible for the first half of every blink period.
pub fn caret_glyph(elapsed_seconds: f32, blink_period_seconds: f32) -> &'static str {
    if blink_period_seconds <= 0.0 {
        return CARET_GLYPH;
    }
    if elapsed_seconds.rem_euclid(blink_period_seconds) < blink_period_seconds / 2.0 {
        CARET_GLYPH
    } else {
        ""
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum Emphasis {
    #[default]
    System,
    Warning,
    Error,
}

impl TryFrom<u8> for Emphasis {
    type Error = ConsoleError;

    fn try_from(code: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match code {
            0 => Ok(Self::System),
            1 => Ok(Self::Warning),
            2 => Ok(Self::Error),
            other => Err(ConsoleError::UnknownEmphasis(other)),
        }
    }
}

/// Wraps text in the rich-text colour tags the console widget renders.
pub fn emphasize(text: &str, emphasis: Emphasis, system_colour: &str) -> String {
    let colour = match emphasis {
        Emphasis::System => system_colour,
        Emphasis::Warning => "yellow",
        Emphasis::Error => "red",
    };
    format!("<color=\"{colour}\">{text}</color>")
}
