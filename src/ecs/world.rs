//! ECS World - owns all entities and their components
//!
//! The world is pure storage. Lifecycle policy (id allocation, system
//! matching, the destroy sweep) lives in [`EntityRegistry`], which hands the
//! world to every system as an explicit argument.
//!
//! [`EntityRegistry`]: crate::ecs::registry::EntityRegistry

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::ecs::component::{Component, ComponentData, ComponentKind, ComponentSet};
use crate::ecs::entity::Entity;

#[derive(Debug, Default)]
pub struct World {
    entities: AHashMap<EntityId, Entity>,
    components: AHashMap<EntityId, AHashMap<ComponentKind, Component>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_entity(&mut self, entity: Entity) {
        self.components.entry(entity.id()).or_default();
        self.entities.insert(entity.id(), entity);
    }

    /// Remove an entity and every component it carries
    pub(crate) fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.components.remove(&id);
        self.entities.remove(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|e| e.is_active())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All entity ids in ascending order
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Attach a component, replacing any existing one of the same kind.
    ///
    /// Returns false (and drops the value) if the entity does not exist.
    pub fn insert<T: ComponentData>(&mut self, id: EntityId, component: T) -> bool {
        self.insert_component(id, component.into_component())
    }

    pub fn insert_component(&mut self, id: EntityId, component: Component) -> bool {
        if !self.entities.contains_key(&id) {
            return false;
        }
        self.components
            .entry(id)
            .or_default()
            .insert(component.kind(), component);
        true
    }

    pub fn remove<T: ComponentData>(&mut self, id: EntityId) -> Option<T> {
        self.components
            .get_mut(&id)?
            .remove(&T::KIND)
            .and_then(T::take_component)
    }

    pub fn get<T: ComponentData>(&self, id: EntityId) -> Option<&T> {
        self.components
            .get(&id)?
            .get(&T::KIND)
            .and_then(T::from_component)
    }

    pub fn get_mut<T: ComponentData>(&mut self, id: EntityId) -> Option<&mut T> {
        self.components
            .get_mut(&id)?
            .get_mut(&T::KIND)
            .and_then(T::from_component_mut)
    }

    pub fn has<T: ComponentData>(&self, id: EntityId) -> bool {
        self.has_kind(id, T::KIND)
    }

    pub fn has_kind(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.components
            .get(&id)
            .is_some_and(|components| components.contains_key(&kind))
    }

    /// The kinds an entity currently carries; empty for unknown ids
    pub fn component_set(&self, id: EntityId) -> ComponentSet {
        self.components
            .get(&id)
            .map(|components| components.keys().copied().collect())
            .unwrap_or_default()
    }
}
