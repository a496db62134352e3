//! System contract and per-system matched-entity bookkeeping

use crate::core::types::EntityId;
use crate::ecs::component::ComponentSet;
use crate::ecs::world::World;

/// A unit of per-tick logic
///
/// Systems never own entity storage. The registry asks for
/// [`required_components`](System::required_components) once, at
/// registration, and from then on passes in the matched entity list and the
/// world on every [`update`](System::update).
pub trait System {
    fn name(&self) -> &'static str;

    /// Capability set an entity must carry to be handed to this system
    fn required_components(&self) -> ComponentSet;

    fn update(&mut self, entities: &[EntityId], world: &mut World, dt: f32);
}

/// Required capabilities plus the entities currently matched against them
#[derive(Debug, Clone, Default)]
pub struct SystemState {
    required: ComponentSet,
    entities: Vec<EntityId>,
}

impl SystemState {
    pub fn new(required: ComponentSet) -> Self {
        Self {
            required,
            entities: Vec::new(),
        }
    }

    pub fn required(&self) -> ComponentSet {
        self.required
    }

    /// Membership test against a set of carried kinds
    pub fn matches(&self, carried: &ComponentSet) -> bool {
        self.required.is_subset(carried)
    }

    /// True iff the entity currently carries every required kind
    pub fn entity_matches(&self, world: &World, id: EntityId) -> bool {
        world.contains(id) && self.matches(&world.component_set(id))
    }

    /// Append unless already present
    pub fn register_entity(&mut self, id: EntityId) {
        if !self.entities.contains(&id) {
            self.entities.push(id);
        }
    }

    pub fn unregister_entity(&mut self, id: EntityId) {
        if let Some(index) = self.entities.iter().position(|e| *e == id) {
            self.entities.remove(index);
        }
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentKind;

    #[test]
    fn test_register_is_idempotent() {
        let mut state = SystemState::new(ComponentSet::EMPTY);
        state.register_entity(EntityId(1));
        state.register_entity(EntityId(1));
        state.register_entity(EntityId(2));
        assert_eq!(state.entities(), &[EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_unregister_shifts_later_entries() {
        let mut state = SystemState::new(ComponentSet::EMPTY);
        for raw in 1..=4 {
            state.register_entity(EntityId(raw));
        }
        state.unregister_entity(EntityId(2));
        state.unregister_entity(EntityId(99));
        assert_eq!(state.entities(), &[EntityId(1), EntityId(3), EntityId(4)]);

        // Re-registering lands at the back, not the old slot
        state.register_entity(EntityId(2));
        assert_eq!(state.entities().last(), Some(&EntityId(2)));
    }

    #[test]
    fn test_matches_requires_all_kinds() {
        let state = SystemState::new(ComponentSet::from([
            ComponentKind::Transform,
            ComponentKind::Movement,
        ]));
        assert!(!state.matches(&ComponentSet::from([ComponentKind::Transform])));
        assert!(state.matches(&ComponentSet::from([
            ComponentKind::Transform,
            ComponentKind::Movement,
            ComponentKind::Health,
        ])));
    }
}
