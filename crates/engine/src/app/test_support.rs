use std::any::Any;
use std::cell::RefCell;

use super::{
    EntityId, FocusProbe, HoverState, Interactable, InteractableKind, InteractionResult,
    LayerMask, PlayerRig, PlayerUi, Vec3,
};

#[derive(Debug, Default)]
pub(crate) struct RecordingUi {
    pub(crate) errors: Vec<String>,
    pub(crate) tasks: Vec<String>,
    pub(crate) hover_shown: Vec<String>,
    pub(crate) hover_cleared: usize,
}

impl PlayerUi for RecordingUi {
    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn add_task(&mut self, description: &str) {
        self.tasks.push(description.to_string());
    }

    fn show_hover(&mut self, label: &str) {
        self.hover_shown.push(label.to_string());
    }

    fn clear_hover(&mut self) {
        self.hover_cleared += 1;
    }
}

pub(crate) struct TestInteractable {
    label: &'static str,
    hover: HoverState,
    pub(crate) detectable: bool,
    pub(crate) interact_count: u32,
    pub(crate) next_result: InteractionResult,
    pub(crate) hover_enters: u32,
    pub(crate) hover_exits: u32,
    pub(crate) disable_sensor_on_interact: bool,
}

impl TestInteractable {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            hover: HoverState::default(),
            detectable: true,
            interact_count: 0,
            next_result: InteractionResult::success(),
            hover_enters: 0,
            hover_exits: 0,
            disable_sensor_on_interact: false,
        }
    }
}

impl Interactable for TestInteractable {
    fn kind(&self) -> InteractableKind {
        InteractableKind::Plain
    }

    fn hover_label(&self) -> &str {
        self.label
    }

    fn hover_state(&self) -> HoverState {
        self.hover
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.hover
    }

    fn interact(&mut self, player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) -> InteractionResult {
        self.interact_count += 1;
        if self.disable_sensor_on_interact {
            player.set_sensor_enabled(false);
        }
        self.next_result.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn is_detectable(&self) -> bool {
        self.detectable
    }

    fn start_hover(&mut self, ui: &mut dyn PlayerUi) {
        if self.hover.enter() {
            self.hover_enters += 1;
            ui.show_hover(self.label);
        }
    }

    fn end_hover(&mut self, ui: &mut dyn PlayerUi) {
        if self.hover.exit() {
            self.hover_exits += 1;
            ui.clear_hover();
        }
    }
}

/// Probe that answers whatever the test last aimed at and records its calls.
#[derive(Default)]
pub(crate) struct ScriptedProbe {
    pub(crate) target: Option<EntityId>,
    pub(crate) calls: RefCell<Vec<(f32, LayerMask)>>,
}

impl ScriptedProbe {
    pub(crate) fn aimed_at(target: Option<EntityId>) -> Self {
        Self {
            target,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FocusProbe for ScriptedProbe {
    fn probe(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        max_range: f32,
        layer_mask: LayerMask,
    ) -> Option<EntityId> {
        self.calls.borrow_mut().push((max_range, layer_mask));
        self.target
    }
}
