use station_engine::PlayerUi;
use tracing::{debug, info};

/// Headless stand-in for the on-screen prompt, error toast and task list.
#[derive(Debug, Default)]
pub(crate) struct Hud {
    hover_label: Option<String>,
    last_error: Option<String>,
    tasks: Vec<String>,
}

impl Hud {
    pub(crate) fn hover_label(&self) -> Option<&str> {
        self.hover_label.as_deref()
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn tasks(&self) -> &[String] {
        &self.tasks
    }
}

impl PlayerUi for Hud {
    fn show_error(&mut self, message: &str) {
        // Staged requirements fail silently with an empty message.
        if message.is_empty() {
            return;
        }
        info!(message, "hud_error");
        self.last_error = Some(message.to_string());
    }

    fn add_task(&mut self, description: &str) {
        if self.tasks.iter().any(|task| task == description) {
            debug!(task = description, "hud_task_already_listed");
            return;
        }
        info!(task = description, "hud_task_added");
        self.tasks.push(description.to_string());
    }

    fn show_hover(&mut self, label: &str) {
        debug!(label, "hud_hover_shown");
        self.hover_label = Some(label.to_string());
    }

    fn clear_hover(&mut self) {
        debug!("hud_hover_cleared");
        self.hover_label = None;
    }
}
