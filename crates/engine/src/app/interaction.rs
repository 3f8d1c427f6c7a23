use std::any::Any;

use super::{FrameTime, InputSnapshot, PlayerRig};

/// Outcome of one interact attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionResult {
    success: bool,
    message: String,
}

impl InteractionResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractableKind {
    Plain,
    Pickupable,
    Session,
}

/// HUD-side collaborator: error toasts, objective list and hover prompt.
pub trait PlayerUi {
    fn show_error(&mut self, message: &str);
    fn add_task(&mut self, description: &str);
    fn show_hover(&mut self, label: &str);
    fn clear_hover(&mut self);
}

/// Guards hover callbacks so each transition fires once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: bool,
}

impl HoverState {
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Returns false when already hovered.
    pub fn enter(&mut self) -> bool {
        if self.hovered {
            return false;
        }
        self.hovered = true;
        true
    }

    /// Returns false when not hovered.
    pub fn exit(&mut self) -> bool {
        if !self.hovered {
            return false;
        }
        self.hovered = false;
        true
    }
}

pub struct TickContext<'a> {
    pub frame: FrameTime,
    pub input: &'a InputSnapshot,
    pub player: &'a mut dyn PlayerRig,
    pub ui: &'a mut dyn PlayerUi,
}

pub trait Interactable {
    fn kind(&self) -> InteractableKind;
    fn hover_label(&self) -> &str;
    fn hover_state(&self) -> HoverState;
    fn hover_state_mut(&mut self) -> &mut HoverState;
    fn interact(&mut self, player: &mut dyn PlayerRig, ui: &mut dyn PlayerUi)
        -> InteractionResult;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Undetectable interactables are skipped by focus resolution.
    fn is_detectable(&self) -> bool {
        true
    }

    fn is_hovered(&self) -> bool {
        self.hover_state().is_hovered()
    }

    fn start_hover(&mut self, ui: &mut dyn PlayerUi) {
        if self.hover_state_mut().enter() {
            ui.show_hover(self.hover_label());
        }
    }

    fn end_hover(&mut self, ui: &mut dyn PlayerUi) {
        if self.hover_state_mut().exit() {
            ui.clear_hover();
        }
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {}

    fn fixed_update(&mut self, _ctx: &mut TickContext<'_>) {}
}
