//! Entity handles and lifecycle flags

use crate::core::types::EntityId;

/// An entity is only an identity plus lifecycle flags; its components are
/// stored in the [`World`](crate::ecs::world::World) keyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    active: bool,
    destroyed: bool,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            active: true,
            destroyed: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Inactive entities stay registered but are skipped by per-tick work
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Mark for removal. The entity stays queryable until the next sweep.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
