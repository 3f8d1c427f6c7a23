use super::{EntityId, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemTag(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldItem {
    pub entity: EntityId,
    pub tag: ItemTag,
}

/// The player-side services a station or item may touch.
pub trait PlayerRig {
    fn id(&self) -> PlayerId;
    fn viewpoint(&self) -> Transform;
    fn set_viewpoint(&mut self, viewpoint: Transform);
    fn set_locomotion_enabled(&mut self, enabled: bool);
    fn set_sensor_enabled(&mut self, enabled: bool);
    fn sensor_enabled(&self) -> bool;
    fn set_cursor_locked(&mut self, locked: bool);
    fn held_item(&self) -> Option<HeldItem>;
    /// Returns false when the hands are already full.
    fn pick_up(&mut self, item: HeldItem) -> bool;
    fn drop_item(&mut self) -> Option<HeldItem>;
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    viewpoint: Transform,
    locomotion_enabled: bool,
    sensor_enabled: bool,
    cursor_locked: bool,
    held_item: Option<HeldItem>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, viewpoint: Transform) -> Self {
        Self {
            id,
            name: name.into(),
            viewpoint,
            locomotion_enabled: true,
            sensor_enabled: true,
            cursor_locked: true,
            held_item: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locomotion_enabled(&self) -> bool {
        self.locomotion_enabled
    }

    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }
}

impl PlayerRig for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn viewpoint(&self) -> Transform {
        self.viewpoint
    }

    fn set_viewpoint(&mut self, viewpoint: Transform) {
        self.viewpoint = viewpoint;
    }

    fn set_locomotion_enabled(&mut self, enabled: bool) {
        self.locomotion_enabled = enabled;
    }

    fn set_sensor_enabled(&mut self, enabled: bool) {
        self.sensor_enabled = enabled;
    }

    fn sensor_enabled(&self) -> bool {
        self.sensor_enabled
    }

    fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    fn held_item(&self) -> Option<HeldItem> {
        self.held_item
    }

    fn pick_up(&mut self, item: HeldItem) -> bool {
        if self.held_item.is_some() {
            return false;
        }
        self.held_item = Some(item);
        true
    }

    fn drop_item(&mut self) -> Option<HeldItem> {
        self.held_item.take()
    }
}
