use std::collections::VecDeque;

use serde::Deserialize;
use tracing::debug;

use super::{EntityId, InputSnapshot, InteractableWorld, PlayerRig, PlayerUi, Vec3};

const MAX_PENDING_FOCUS_EVENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    pub fn includes_layer(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Line-of-sight query owned by the physics side.
pub trait FocusProbe {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        layer_mask: LayerMask,
    ) -> Option<EntityId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SenseConfig {
    pub max_range: f32,
    pub layer_mask: LayerMask,
}

impl Default for SenseConfig {
    fn default() -> Self {
        Self {
            max_range: 5.0,
            layer_mask: LayerMask::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChanged {
    pub previous: Option<EntityId>,
    pub current: Option<EntityId>,
}

/// Per-player sensor deciding which interactable is in focus.
#[derive(Debug)]
pub struct FocusDetector {
    config: SenseConfig,
    is_on: bool,
    current: Option<EntityId>,
    last_hit: Option<EntityId>,
    observed_sensor_flag: bool,
    focus_events: VecDeque<FocusChanged>,
}

impl Default for FocusDetector {
    fn default() -> Self {
        Self::new(SenseConfig::default())
    }
}

impl FocusDetector {
    pub fn new(config: SenseConfig) -> Self {
        Self {
            config,
            is_on: true,
            current: None,
            last_hit: None,
            observed_sensor_flag: true,
            focus_events: VecDeque::new(),
        }
    }

    pub fn config(&self) -> SenseConfig {
        self.config
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn focus(&self) -> Option<EntityId> {
        self.current
    }

    /// One sensing tick: track sensor toggles, resolve focus, route the activate edge.
    pub fn update(
        &mut self,
        probe: &dyn FocusProbe,
        world: &mut InteractableWorld,
        player: &mut dyn PlayerRig,
        input: &InputSnapshot,
        ui: &mut dyn PlayerUi,
    ) {
        self.follow_sensor_flag(&*player, world, ui);
        if !self.is_on {
            return;
        }

        let candidate = self.probe_candidate(probe, world, &*player);
        self.apply_focus(candidate, world, ui);

        if input.activate_pressed() {
            if let Some(target) = self.current {
                let result = world.interact(target, player, ui);
                if !result.is_success() {
                    debug!(
                        entity = target.0,
                        message = result.message(),
                        "interact_failed"
                    );
                    ui.show_error(result.message());
                }
            }
        }

        // Joining a session inside interact switches sensing off; honor it this tick.
        self.follow_sensor_flag(&*player, world, ui);
    }

    pub fn turn_on(&mut self) {
        self.is_on = true;
    }

    pub fn turn_off(&mut self, world: &mut InteractableWorld, ui: &mut dyn PlayerUi) {
        self.is_on = false;
        self.last_hit = None;
        if let Some(previous) = self.current.take() {
            world.end_hover(previous, ui);
            self.push_focus_event(FocusChanged {
                previous: Some(previous),
                current: None,
            });
        }
    }

    pub fn drain_focus_events_into(&mut self, out: &mut Vec<FocusChanged>) {
        out.extend(self.focus_events.drain(..));
    }

    fn follow_sensor_flag(
        &mut self,
        player: &dyn PlayerRig,
        world: &mut InteractableWorld,
        ui: &mut dyn PlayerUi,
    ) {
        let enabled = player.sensor_enabled();
        if enabled == self.observed_sensor_flag {
            return;
        }
        self.observed_sensor_flag = enabled;
        if enabled {
            self.turn_on();
        } else {
            self.turn_off(world, ui);
        }
    }

    fn probe_candidate(
        &mut self,
        probe: &dyn FocusProbe,
        world: &InteractableWorld,
        player: &dyn PlayerRig,
    ) -> Option<EntityId> {
        let sense = player.viewpoint();
        let hit = probe.probe(
            sense.position,
            sense.forward(),
            self.config.max_range,
            self.config.layer_mask,
        );

        match hit {
            Some(hit)
                if self.last_hit == Some(hit)
                    && self.current.map_or(true, |id| world.contains(id)) =>
            {
                self.current
            }
            Some(hit) => {
                self.last_hit = Some(hit);
                world.resolve_interactable(hit)
            }
            None => {
                self.last_hit = None;
                None
            }
        }
    }

    fn apply_focus(
        &mut self,
        candidate: Option<EntityId>,
        world: &mut InteractableWorld,
        ui: &mut dyn PlayerUi,
    ) {
        if candidate == self.current {
            return;
        }

        let previous = self.current;
        if let Some(old) = previous {
            world.end_hover(old, ui);
        }
        if let Some(new) = candidate {
            world.start_hover(new, ui);
        }
        self.current = candidate;

        debug!(
            previous = previous.map(|id| id.0),
            current = candidate.map(|id| id.0),
            "focus_changed"
        );
        self.push_focus_event(FocusChanged {
            previous,
            current: candidate,
        });
    }

    fn push_focus_event(&mut self, event: FocusChanged) {
        if self.focus_events.len() == MAX_PENDING_FOCUS_EVENTS {
            self.focus_events.pop_front();
        }
        self.focus_events.push_back(event);
    }
}
