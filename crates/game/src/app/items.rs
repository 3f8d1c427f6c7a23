use std::any::Any;

use station_engine::{
    EntityId, HeldItem, HoverState, Interactable, InteractableKind, InteractionResult, ItemTag,
    PlayerRig, PlayerUi,
};
use tracing::info;

pub(crate) const WELDER: ItemTag = ItemTag("welder");
pub(crate) const WELD_PLATE: ItemTag = ItemTag("weld_plate");

pub(crate) const HANDS_FULL_MESSAGE: &str = "Already holding item, right click to drop.";

/// Anything the player can carry in their one free hand.
#[derive(Debug)]
pub(crate) struct Pickupable {
    entity: EntityId,
    tag: ItemTag,
    label: String,
    hover: HoverState,
    detectable: bool,
}

impl Pickupable {
    pub(crate) fn new(entity: EntityId, tag: ItemTag, label: impl Into<String>) -> Self {
        Self {
            entity,
            tag,
            label: label.into(),
            hover: HoverState::default(),
            detectable: true,
        }
    }

    pub(crate) fn tag(&self) -> ItemTag {
        self.tag
    }

    /// Mounted items stop blocking or answering the focus probe.
    pub(crate) fn make_undetectable(&mut self) {
        self.detectable = false;
    }
}

impl Interactable for Pickupable {
    fn kind(&self) -> InteractableKind {
        InteractableKind::Pickupable
    }

    fn hover_label(&self) -> &str {
        &self.label
    }

    fn hover_state(&self) -> HoverState {
        self.hover
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.hover
    }

    fn interact(&mut self, player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) -> InteractionResult {
        let item = HeldItem {
            entity: self.entity,
            tag: self.tag,
        };
        if player.pick_up(item) {
            info!(player = player.id().0, item = self.tag.0, "item_picked_up");
            InteractionResult::success()
        } else {
            InteractionResult::fail(HANDS_FULL_MESSAGE)
        }
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
}
