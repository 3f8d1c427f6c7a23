const DOT_INTERVAL_SECONDS: f32 = 0.25;
const MAX_DOTS: usize = 3;

/// A label followed by an ellipsis that grows every quarter second for a
/// fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedText {
    label: String,
    duration_seconds: f32,
    elapsed_seconds: f32,
    complete: bool,
}

impl TimedText {
    pub fn new(label: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            label: label.into(),
            duration_seconds: duration_seconds.max(0.0),
            elapsed_seconds: 0.0,
            complete: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_text(&self) -> String {
        let dots = if self.complete {
            MAX_DOTS
        } else {
            ((self.elapsed_seconds / DOT_INTERVAL_SECONDS) as usize) % (MAX_DOTS + 1)
        };
        format!("{}{}", self.label, ".".repeat(dots))
    }

    /// Advances by `dt_seconds` and reports the new text. Returns true once,
    /// on the call that completes the animation.
    pub fn advance(&mut self, dt_seconds: f32, mut on_text: impl FnMut(&str)) -> bool {
        if self.complete {
            return false;
        }
        self.elapsed_seconds += dt_seconds.max(0.0);
        if self.elapsed_seconds >= self.duration_seconds {
            self.complete = true;
        }
        on_text(&self.current_text());
        self.complete
    }
}
