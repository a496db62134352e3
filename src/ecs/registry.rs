//! Entity registry - lifecycle, system schedule, and capability matching

use crate::core::types::EntityId;
use crate::ecs::component::{ComponentData, ComponentSet};
use crate::ecs::entity::Entity;
use crate::ecs::system::{System, SystemState};
use crate::ecs::world::World;

/// Handle to a registered system; also its position in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(usize);

impl SystemId {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct SystemSlot {
    state: SystemState,
    system: Box<dyn System>,
}

/// Owns the [`World`] and the ordered system schedule
///
/// Systems run in registration order. An entity is matched against a system
/// when it is created, when the system is registered, and whenever
/// [`notify_systems`](Self::notify_systems) is called for it. It leaves a
/// system's list only in [`cleanup`](Self::cleanup): removing a component
/// from a live entity does not unregister it.
pub struct EntityRegistry {
    next_entity_id: u32,
    world: World,
    systems: Vec<SystemSlot>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_entity_id: 1,
            world: World::new(),
            systems: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct storage access. Components attached this way are not seen by
    /// systems until the entity is re-announced with `notify_systems`.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // === ENTITIES ===

    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;

        self.world.insert_entity(Entity::new(id));
        self.notify_systems(id);

        tracing::debug!("Created entity {}", id);
        id
    }

    /// Mark for removal; takes effect at the next `cleanup`
    pub fn destroy_entity(&mut self, id: EntityId) {
        if let Some(entity) = self.world.entity_mut(id) {
            entity.destroy();
        }
    }

    /// Sweep destroyed entities out of the world and every system
    ///
    /// Returns the removed ids in ascending order.
    pub fn cleanup(&mut self) -> Vec<EntityId> {
        let doomed: Vec<EntityId> = self
            .world
            .entity_ids()
            .into_iter()
            .filter(|id| self.world.entity(*id).is_some_and(|e| e.is_destroyed()))
            .collect();

        for id in &doomed {
            for slot in &mut self.systems {
                slot.state.unregister_entity(*id);
            }
            self.world.remove_entity(*id);
        }

        if !doomed.is_empty() {
            tracing::debug!("Cleanup swept {} entities", doomed.len());
        }
        doomed
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.world.entity(id)
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.world.entity_mut(id)
    }

    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    /// Live entity ids in ascending order
    pub fn entities(&self) -> Vec<EntityId> {
        self.world.entity_ids()
    }

    /// Offer an entity to every system again, e.g. after attaching components
    pub fn notify_systems(&mut self, id: EntityId) {
        if !self.world.contains(id) {
            return;
        }
        let carried = self.world.component_set(id);
        for slot in &mut self.systems {
            if slot.state.matches(&carried) {
                slot.state.register_entity(id);
            }
        }
    }

    // === COMPONENTS ===

    pub fn add_component<T: ComponentData>(&mut self, id: EntityId, component: T) -> bool {
        self.world.insert(id, component)
    }

    pub fn remove_component<T: ComponentData>(&mut self, id: EntityId) -> Option<T> {
        self.world.remove::<T>(id)
    }

    pub fn get<T: ComponentData>(&self, id: EntityId) -> Option<&T> {
        self.world.get::<T>(id)
    }

    pub fn get_mut<T: ComponentData>(&mut self, id: EntityId) -> Option<&mut T> {
        self.world.get_mut::<T>(id)
    }

    pub fn has<T: ComponentData>(&self, id: EntityId) -> bool {
        self.world.has::<T>(id)
    }

    // === SYSTEMS ===

    /// Append a system to the schedule and match it against live entities
    pub fn register_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        let mut state = SystemState::new(system.required_components());

        for id in self.world.entity_ids() {
            if state.entity_matches(&self.world, id) {
                state.register_entity(id);
            }
        }

        tracing::info!(
            "Registered system '{}' ({} entities matched)",
            system.name(),
            state.entities().len()
        );

        let id = SystemId(self.systems.len());
        self.systems.push(SystemSlot {
            state,
            system: Box::new(system),
        });
        id
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn system_name(&self, id: SystemId) -> Option<&'static str> {
        self.systems.get(id.0).map(|slot| slot.system.name())
    }

    /// Matched entities of a system, in its iteration order
    pub fn system_entities(&self, id: SystemId) -> &[EntityId] {
        self.systems
            .get(id.0)
            .map(|slot| slot.state.entities())
            .unwrap_or(&[])
    }

    pub fn system_requirements(&self, id: SystemId) -> Option<ComponentSet> {
        self.systems.get(id.0).map(|slot| slot.state.required())
    }

    pub fn entity_matches(&self, system: SystemId, entity: EntityId) -> bool {
        self.systems
            .get(system.0)
            .is_some_and(|slot| slot.state.entity_matches(&self.world, entity))
    }

    /// Run every system once, in registration order
    pub fn update(&mut self, dt: f32) {
        for slot in &mut self.systems {
            slot.system.update(slot.state.entities(), &mut self.world, dt);
        }
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::ecs::components::{HealthComponent, MovementComponent, TransformComponent};

    /// Records the entity lists it was handed
    struct Probe {
        required: ComponentSet,
        seen: std::rc::Rc<std::cell::RefCell<Vec<Vec<EntityId>>>>,
    }

    impl System for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn required_components(&self) -> ComponentSet {
            self.required
        }

        fn update(&mut self, entities: &[EntityId], _world: &mut World, _dt: f32) {
            self.seen.borrow_mut().push(entities.to_vec());
        }
    }

    fn probe(required: ComponentSet) -> (Probe, std::rc::Rc<std::cell::RefCell<Vec<Vec<EntityId>>>>) {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        (Probe { required, seen: seen.clone() }, seen)
    }

    fn movable() -> ComponentSet {
        ComponentSet::new()
            .with::<TransformComponent>()
            .with::<MovementComponent>()
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));

        registry.destroy_entity(b);
        registry.cleanup();
        let c = registry.create_entity();
        assert_eq!(c, EntityId(3));
    }

    #[test]
    fn test_destroyed_entity_queryable_until_cleanup() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.add_component(id, HealthComponent::default());
        registry.destroy_entity(id);

        assert!(registry.get_entity(id).is_some_and(|e| e.is_destroyed()));
        assert!(registry.has::<HealthComponent>(id));

        assert_eq!(registry.cleanup(), vec![id]);
        assert!(registry.get_entity(id).is_none());
        assert!(!registry.has::<HealthComponent>(id));
    }

    #[test]
    fn test_register_system_matches_existing_entities() {
        let mut registry = EntityRegistry::new();
        let mover = registry.create_entity();
        registry.add_component(mover, TransformComponent::new(Vec2::ZERO));
        registry.add_component(mover, MovementComponent::default());
        let rock = registry.create_entity();
        registry.add_component(rock, TransformComponent::new(Vec2::ZERO));

        let (system, _) = probe(movable());
        let id = registry.register_system(system);

        assert_eq!(registry.system_entities(id), &[mover]);
        assert!(!registry.entity_matches(id, rock));
    }

    #[test]
    fn test_components_need_notify() {
        let mut registry = EntityRegistry::new();
        let (system, _) = probe(movable());
        let sys = registry.register_system(system);

        let id = registry.create_entity();
        registry.add_component(id, TransformComponent::default());
        registry.add_component(id, MovementComponent::default());
        assert!(registry.system_entities(sys).is_empty());

        registry.notify_systems(id);
        registry.notify_systems(id);
        assert_eq!(registry.system_entities(sys), &[id]);
    }

    #[test]
    fn test_matching_is_sticky_after_component_removal() {
        let mut registry = EntityRegistry::new();
        let (system, _) = probe(movable());
        let sys = registry.register_system(system);

        let id = registry.create_entity();
        registry.add_component(id, TransformComponent::default());
        registry.add_component(id, MovementComponent::default());
        registry.notify_systems(id);

        registry.remove_component::<MovementComponent>(id);
        assert!(!registry.entity_matches(sys, id));
        assert_eq!(registry.system_entities(sys), &[id]);
    }

    #[test]
    fn test_update_runs_in_registration_order() {
        let mut registry = EntityRegistry::new();
        let order = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

        struct Named(&'static str, std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>);
        impl System for Named {
            fn name(&self) -> &'static str {
                self.0
            }
            fn required_components(&self) -> ComponentSet {
                ComponentSet::EMPTY
            }
            fn update(&mut self, _: &[EntityId], _: &mut World, _: f32) {
                self.1.borrow_mut().push(self.0);
            }
        }

        registry.register_system(Named("first", order.clone()));
        registry.register_system(Named("second", order.clone()));
        registry.register_system(Named("third", order.clone()));
        registry.update(0.016);

        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_cleanup_unregisters_from_systems() {
        let mut registry = EntityRegistry::new();
        let (system, seen) = probe(ComponentSet::EMPTY);
        let sys = registry.register_system(system);

        let a = registry.create_entity();
        let b = registry.create_entity();
        let c = registry.create_entity();
        registry.destroy_entity(b);

        // Still handed to systems between destroy and sweep
        registry.update(0.016);
        registry.cleanup();
        registry.update(0.016);

        assert_eq!(seen.borrow()[0], vec![a, b, c]);
        assert_eq!(seen.borrow()[1], vec![a, c]);
        assert_eq!(registry.system_entities(sys), &[a, c]);
    }
}
