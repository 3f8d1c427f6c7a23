use station_engine::{
    EntityId, FocusDetector, FrameTime, HeldItem, InputSnapshot, InteractableWorld, Player,
    PlayerId, PlayerRig, Session, TickContext, Transform, Vec3,
};
use tracing::{debug, info, warn};

use super::config::{ConfigError, LaunchpadConfig};
use super::hud::Hud;
use super::items::{Pickupable, WELDER, WELD_PLATE};
use super::probe::SphereProbe;
use super::stations::{
    ComputerEvent, ConsoleStation, RocketComputer, WeldEvent, WeldPlace, WeldStation,
};

const STATION_LAYER: u8 = 0;
const ITEM_LAYER: u8 = 1;
const ITEM_RADIUS: f32 = 0.3;
const DROP_DISTANCE: f32 = 1.0;

pub(crate) const PLAYER_START: Vec3 = Vec3::new(0.0, 1.6, 0.0);
// Aiming is yaw-only, so colliders sit close to eye height.
pub(crate) const CONSOLE_SCREEN: Vec3 = Vec3::new(0.0, 1.4, 3.0);
pub(crate) const WELD_BENCH: Vec3 = Vec3::new(3.0, 1.3, 3.0);
pub(crate) const WELDER_SPAWN: Vec3 = Vec3::new(-1.5, 1.5, 1.5);
pub(crate) const PLATE_SPAWN: Vec3 = Vec3::new(1.5, 1.5, 0.0);

/// The launch pad: one player, the rocket console, the weld bench and the
/// loose items, wired to a focus detector.
pub(crate) struct Stage {
    world: InteractableWorld,
    probe: SphereProbe,
    detector: FocusDetector,
    player: Player,
    hud: Hud,
    console: EntityId,
    weld_bench: EntityId,
    welder: EntityId,
    plate: EntityId,
    carried: Option<HeldItem>,
    console_events: Vec<ComputerEvent>,
    weld_events: Vec<WeldEvent>,
}

impl Stage {
    pub(crate) fn new(config: &LaunchpadConfig) -> Result<Self, ConfigError> {
        let mut world = InteractableWorld::default();
        let mut probe = SphereProbe::default();

        let computer = RocketComputer::new(config.console.clone())?;
        let console_anchor = Transform::facing(Vec3::new(0.0, 1.3, 2.2), CONSOLE_SCREEN);
        let console = world.spawn_interactable(
            "rocket_computer",
            None,
            Box::new(Session::new(console_anchor, computer)),
        );
        // The screen is the collider; focus resolves up to the computer.
        let screen = world.spawn("console_screen", Some(console));
        probe.add(screen, CONSOLE_SCREEN, 0.5, STATION_LAYER);

        let bench_anchor = Transform::facing(Vec3::new(2.2, 1.5, 2.2), WELD_BENCH);
        let weld_bench = world.spawn_interactable(
            "weld_bench",
            None,
            Box::new(Session::new(bench_anchor, WeldPlace::default())),
        );
        probe.add(weld_bench, WELD_BENCH, 0.6, STATION_LAYER);

        let welder = world.spawn("welder", None);
        world.attach(welder, Box::new(Pickupable::new(welder, WELDER, "Welder")));
        probe.add(welder, WELDER_SPAWN, ITEM_RADIUS, ITEM_LAYER);

        let plate = world.spawn("weld_plate", None);
        world.attach(plate, Box::new(Pickupable::new(plate, WELD_PLATE, "Weld plate")));
        probe.add(plate, PLATE_SPAWN, ITEM_RADIUS, ITEM_LAYER);

        info!(entities = world.entity_count(), "stage_ready");

        Ok(Self {
            world,
            probe,
            detector: FocusDetector::new(config.sense),
            player: Player::new(PlayerId(1), "pilot", Transform::at(PLAYER_START)),
            hud: Hud::default(),
            console,
            weld_bench,
            welder,
            plate,
            carried: None,
            console_events: Vec::new(),
            weld_events: Vec::new(),
        })
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn hud(&self) -> &Hud {
        &self.hud
    }

    pub(crate) fn focus(&self) -> Option<EntityId> {
        self.detector.focus()
    }

    pub(crate) fn console_station(&self) -> Option<&ConsoleStation> {
        self.world.get::<ConsoleStation>(self.console)
    }

    pub(crate) fn console(&self) -> Option<&RocketComputer> {
        self.console_station().map(Session::hooks)
    }

    pub(crate) fn weld_station(&self) -> Option<&WeldStation> {
        self.world.get::<WeldStation>(self.weld_bench)
    }

    /// Turns the player's head toward `target` without moving them.
    pub(crate) fn aim_at(&mut self, target: Vec3) {
        if !self.player.locomotion_enabled() {
            debug!("aim_ignored_during_session");
            return;
        }
        let position = self.player.viewpoint().position;
        self.player.set_viewpoint(Transform::facing(position, target));
    }

    pub(crate) fn fuel_engines(&mut self) {
        if let Some(station) = self.world.get_mut::<ConsoleStation>(self.console) {
            station.hooks_mut().engines_fuelled();
            info!("engines_fuelled");
        }
    }

    pub(crate) fn calculate_flight_path(&mut self) {
        if let Some(station) = self.world.get_mut::<ConsoleStation>(self.console) {
            station.hooks_mut().path_calculated();
            info!("flight_path_calculated");
        }
    }

    /// One frame: sense, drop, update stations, then route station outputs.
    pub(crate) fn tick(&mut self, frame: FrameTime, input: &InputSnapshot) {
        self.detector.update(
            &self.probe,
            &mut self.world,
            &mut self.player,
            input,
            &mut self.hud,
        );
        self.track_carried_item();
        if input.drop_pressed() {
            self.drop_held_item();
        }

        let mut ctx = TickContext {
            frame,
            input,
            player: &mut self.player,
            ui: &mut self.hud,
        };
        self.world.update_all(&mut ctx);

        self.route_console_events();
        self.route_weld_events();
    }

    pub(crate) fn fixed_tick(&mut self, frame: FrameTime, input: &InputSnapshot) {
        let mut ctx = TickContext {
            frame,
            input,
            player: &mut self.player,
            ui: &mut self.hud,
        };
        self.world.fixed_update_all(&mut ctx);
    }

    fn track_carried_item(&mut self) {
        let held = self.player.held_item();
        if held == self.carried {
            return;
        }
        if let Some(item) = held {
            // Carried items leave the scene until dropped.
            self.probe.remove(item.entity);
        }
        self.carried = held;
    }

    fn drop_held_item(&mut self) {
        if !self.player.locomotion_enabled() {
            return;
        }
        let Some(item) = self.player.drop_item() else {
            return;
        };
        let view = self.player.viewpoint();
        let spot = view.position + view.forward() * DROP_DISTANCE;
        self.probe.add(item.entity, spot, ITEM_RADIUS, ITEM_LAYER);
        self.carried = None;
        info!(item = item.tag.0, "item_dropped");
    }

    fn route_console_events(&mut self) {
        let Some(station) = self.world.get_mut::<ConsoleStation>(self.console) else {
            return;
        };
        station.hooks_mut().drain_events_into(&mut self.console_events);

        for event in self.console_events.drain(..) {
            match event {
                ComputerEvent::PowerChanged(on) => debug!(on, "console_power_changed"),
                ComputerEvent::Launched => info!("launch_observed"),
                ComputerEvent::AfterLaunch => {
                    station.hooks_mut().start_rolling_credits(&mut self.hud);
                }
            }
        }
    }

    fn route_weld_events(&mut self) {
        let Some(station) = self.world.get_mut::<WeldStation>(self.weld_bench) else {
            return;
        };
        station.hooks_mut().drain_events_into(&mut self.weld_events);

        for event in std::mem::take(&mut self.weld_events) {
            match event {
                WeldEvent::PlateMounted(entity) => {
                    self.carried = None;
                    self.probe.remove(entity);
                    match self.world.get_mut::<Pickupable>(entity) {
                        Some(plate) => plate.make_undetectable(),
                        None => warn!(entity = entity.0, "mounted_plate_missing"),
                    }
                }
                WeldEvent::Started => info!("welding_started"),
                WeldEvent::Stopped => info!("welding_stopped"),
            }
        }
    }
}

#[cfg(test)]
impl Stage {
    pub(crate) fn console_entity(&self) -> EntityId {
        self.console
    }

    pub(crate) fn weld_bench_entity(&self) -> EntityId {
        self.weld_bench
    }

    pub(crate) fn welder_entity(&self) -> EntityId {
        self.welder
    }

    pub(crate) fn plate_entity(&self) -> EntityId {
        self.plate
    }

    pub(crate) fn pickupable(&self, entity: EntityId) -> Option<&Pickupable> {
        self.world.get::<Pickupable>(entity)
    }
}
