use station_engine::{EntityId, InteractionResult, PlayerRig, PlayerUi, SessionHooks};
use tracing::{debug, info};

use crate::app::items::{WELDER, WELD_PLATE};

pub(crate) const NEEDS_PLATE_MESSAGE: &str = "Needs a plate to weld against.";
pub(crate) const WRONG_TOOL_MESSAGE: &str = "Can't weld with that.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WeldEvent {
    PlateMounted(EntityId),
    Started,
    Stopped,
}

/// Bench where a plate is mounted first and then welded with the welder.
#[derive(Debug, Default)]
pub(crate) struct WeldPlace {
    plate: Option<EntityId>,
    welding: bool,
    events: Vec<WeldEvent>,
}

impl WeldPlace {
    pub(crate) fn plate(&self) -> Option<EntityId> {
        self.plate
    }

    pub(crate) fn is_welding(&self) -> bool {
        self.welding
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<WeldEvent>) {
        out.append(&mut self.events);
    }
}

impl SessionHooks for WeldPlace {
    fn hover_label(&self) -> &str {
        "Weld"
    }

    fn check_requirements(
        &mut self,
        player: &mut dyn PlayerRig,
        _ui: &mut dyn PlayerUi,
    ) -> InteractionResult {
        let held = player.held_item();
        if self.plate.is_none() {
            return match held {
                Some(item) if item.tag == WELD_PLATE => {
                    player.drop_item();
                    self.plate = Some(item.entity);
                    self.events.push(WeldEvent::PlateMounted(item.entity));
                    info!(plate = item.entity.0, "weld_plate_mounted");
                    // Mounting is its own step; the player clicks again to weld.
                    InteractionResult::fail("")
                }
                _ => InteractionResult::fail(NEEDS_PLATE_MESSAGE),
            };
        }

        match held {
            Some(item) if item.tag == WELDER => InteractionResult::success(),
            _ => InteractionResult::fail(WRONG_TOOL_MESSAGE),
        }
    }

    fn on_join(&mut self, _player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) {
        self.welding = true;
        self.events.push(WeldEvent::Started);
        debug!("weld_started");
    }

    fn on_leave(&mut self, _player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) {
        self.welding = false;
        self.events.push(WeldEvent::Stopped);
        debug!("weld_stopped");
    }
}
