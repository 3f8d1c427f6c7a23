mod console;
mod console_commands;
mod sequence;
mod timed_text;

pub use console::{
    caret_glyph, emphasize, BoundedLog, ConsoleError, ConsoleLine, Emphasis, LineEditor, LineId,
    CARET_GLYPH, MAX_INPUT_CHARS,
};
pub use console_commands::{CommandSpec, ConsoleCommandRegistry};
pub use sequence::{Resumed, Step, StepScheduler, TaskId, Ticket};
pub use timed_text::TimedText;
