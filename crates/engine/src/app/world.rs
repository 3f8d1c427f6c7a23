use std::collections::BTreeMap;

use tracing::debug;

use super::{Interactable, InteractionResult, PlayerRig, PlayerUi, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

struct EntityNode {
    debug_name: &'static str,
    parent: Option<EntityId>,
    interactable: Option<Box<dyn Interactable>>,
}

/// Entity hierarchy plus the interactables attached to it.
#[derive(Default)]
pub struct InteractableWorld {
    allocator: EntityIdAllocator,
    nodes: BTreeMap<EntityId, EntityNode>,
}

impl InteractableWorld {
    pub fn spawn(&mut self, debug_name: &'static str, parent: Option<EntityId>) -> EntityId {
        let id = self.allocator.allocate();
        self.nodes.insert(
            id,
            EntityNode {
                debug_name,
                parent,
                interactable: None,
            },
        );
        id
    }

    pub fn spawn_interactable(
        &mut self,
        debug_name: &'static str,
        parent: Option<EntityId>,
        interactable: Box<dyn Interactable>,
    ) -> EntityId {
        let id = self.spawn(debug_name, parent);
        self.attach(id, interactable);
        id
    }

    /// Returns false when the entity does not exist.
    pub fn attach(&mut self, id: EntityId, interactable: Box<dyn Interactable>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.interactable = Some(interactable);
        true
    }

    /// Children of a despawned entity become roots.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            if node.parent == Some(id) {
                node.parent = None;
            }
        }
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn debug_name(&self, id: EntityId) -> Option<&'static str> {
        self.nodes.get(&id).map(|node| node.debug_name)
    }

    /// Nearest ancestor (the entity itself included) carrying a detectable interactable.
    pub fn resolve_interactable(&self, hit: EntityId) -> Option<EntityId> {
        let mut cursor = Some(hit);
        // Bounded walk so a malformed parent chain cannot spin forever.
        for _ in 0..=self.nodes.len() {
            let id = cursor?;
            let node = self.nodes.get(&id)?;
            if let Some(interactable) = node.interactable.as_deref() {
                return interactable.is_detectable().then_some(id);
            }
            cursor = node.parent;
        }
        None
    }

    pub fn interactable(&self, id: EntityId) -> Option<&dyn Interactable> {
        self.nodes.get(&id)?.interactable.as_deref()
    }

    pub fn interactable_mut(&mut self, id: EntityId) -> Option<&mut (dyn Interactable + 'static)> {
        self.nodes.get_mut(&id)?.interactable.as_deref_mut()
    }

    pub fn get<T: 'static>(&self, id: EntityId) -> Option<&T> {
        self.interactable(id)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: 'static>(&mut self, id: EntityId) -> Option<&mut T> {
        self.interactable_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn start_hover(&mut self, id: EntityId, ui: &mut dyn PlayerUi) {
        if let Some(interactable) = self.interactable_mut(id) {
            interactable.start_hover(ui);
        }
    }

    pub fn end_hover(&mut self, id: EntityId, ui: &mut dyn PlayerUi) {
        if let Some(interactable) = self.interactable_mut(id) {
            interactable.end_hover(ui);
        }
    }

    pub fn interact(
        &mut self,
        id: EntityId,
        player: &mut dyn PlayerRig,
        ui: &mut dyn PlayerUi,
    ) -> InteractionResult {
        match self.interactable_mut(id) {
            Some(interactable) => interactable.interact(player, ui),
            None => {
                debug!(entity = id.0, "interact_target_missing");
                InteractionResult::fail("Nothing to interact with.")
            }
        }
    }

    pub fn update_all(&mut self, ctx: &mut TickContext<'_>) {
        for node in self.nodes.values_mut() {
            if let Some(interactable) = node.interactable.as_deref_mut() {
                interactable.update(ctx);
            }
        }
    }

    pub fn fixed_update_all(&mut self, ctx: &mut TickContext<'_>) {
        for node in self.nodes.values_mut() {
            if let Some(interactable) = node.interactable.as_deref_mut() {
                interactable.fixed_update(ctx);
            }
        }
    }
}
