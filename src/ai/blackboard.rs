//! Per-entity working memory shared by the behavior tree and state machine
//!
//! The fixed fields are refreshed by the AI system at the start of every
//! tick. Anything a tree needs to remember across ticks (a node that returned
//! Running has no cursor of its own) goes into the open store.

use ahash::AHashMap;

use crate::ai::state_machine::AiState;
use crate::core::types::{EntityId, Vec2};

/// Payload kinds allowed in the open store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlackboardValue {
    Number(f32),
    Flag(bool),
    Position(Vec2),
    Entity(EntityId),
}

/// Rust types that map onto one [`BlackboardValue`] kind
pub trait BlackboardKind: Default + Sized {
    fn into_value(self) -> BlackboardValue;
    fn from_value(value: &BlackboardValue) -> Option<Self>;
}

impl BlackboardKind for f32 {
    fn into_value(self) -> BlackboardValue {
        BlackboardValue::Number(self)
    }

    fn from_value(value: &BlackboardValue) -> Option<Self> {
        match value {
            BlackboardValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl BlackboardKind for bool {
    fn into_value(self) -> BlackboardValue {
        BlackboardValue::Flag(self)
    }

    fn from_value(value: &BlackboardValue) -> Option<Self> {
        match value {
            BlackboardValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl BlackboardKind for Vec2 {
    fn into_value(self) -> BlackboardValue {
        BlackboardValue::Position(self)
    }

    fn from_value(value: &BlackboardValue) -> Option<Self> {
        match value {
            BlackboardValue::Position(p) => Some(*p),
            _ => None,
        }
    }
}

impl BlackboardKind for EntityId {
    fn into_value(self) -> BlackboardValue {
        BlackboardValue::Entity(self)
    }

    fn from_value(value: &BlackboardValue) -> Option<Self> {
        match value {
            BlackboardValue::Entity(e) => Some(*e),
            _ => None,
        }
    }
}

/// Decisions produced by one tree walk, applied to components afterwards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    pub move_to: Option<Vec2>,
    /// Drop any movement goal; ignored when `move_to` is also set
    pub halt: bool,
    pub attack: Option<EntityId>,
    pub next_state: Option<AiState>,
}

impl Intent {
    pub fn is_empty(&self) -> bool {
        self.move_to.is_none() && !self.halt && self.attack.is_none() && self.next_state.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Blackboard {
    /// Own position, from Transform
    pub position: Vec2,
    pub target_position: Vec2,
    pub target_entity: EntityId,
    pub health: f32,
    pub max_health: f32,

    pub enemy_spotted: bool,
    pub enemy_position: Vec2,
    pub enemy_entity: EntityId,

    pub resource_spotted: bool,
    pub resource_position: Vec2,
    pub resource_entity: EntityId,

    pub intent: Intent,

    data: AHashMap<String, BlackboardValue>,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            target_position: Vec2::ZERO,
            target_entity: EntityId::NONE,
            health: 100.0,
            max_health: 100.0,
            enemy_spotted: false,
            enemy_position: Vec2::ZERO,
            enemy_entity: EntityId::NONE,
            resource_spotted: false,
            resource_position: Vec2::ZERO,
            resource_entity: EntityId::NONE,
            intent: Intent::default(),
            data: AHashMap::new(),
        }
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: BlackboardKind>(&mut self, key: &str, value: T) {
        self.data.insert(key.to_string(), value.into_value());
    }

    /// Typed read; a missing key or a different kind yields `T::default()`.
    /// Use [`has`](Self::has) to tell "absent" from "present but zero".
    pub fn get<T: BlackboardKind>(&self, key: &str) -> T {
        self.data
            .get(key)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<BlackboardValue> {
        self.data.remove(key)
    }

    /// Empty the open store; fixed fields are untouched
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn distance_to_enemy(&self) -> Option<f32> {
        self.enemy_spotted
            .then(|| self.position.distance(&self.enemy_position))
    }

    pub fn distance_to_resource(&self) -> Option<f32> {
        self.resource_spotted
            .then(|| self.position.distance(&self.resource_position))
    }
}
