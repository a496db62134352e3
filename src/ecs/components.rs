//! Plain-data components
//!
//! Components hold state only; the systems that read them live in
//! `simulation` and `ai`. The AI component is defined next to the AI system.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::types::{EntityId, Team, Vec2};

// ============================================================================
// Spatial
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl TransformComponent {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsComponent {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub friction: f32,
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            friction: 0.1,
        }
    }
}

/// Circular collider
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    pub radius: f32,
    pub is_trigger: bool,
}

impl ColliderComponent {
    pub fn new(radius: f32) -> Self {
        Self { radius, is_trigger: false }
    }
}

impl Default for ColliderComponent {
    fn default() -> Self {
        Self::new(16.0)
    }
}

// ============================================================================
// Vitals & allegiance
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HealthComponent {
    pub current: f32,
    pub max: f32,
}

impl HealthComponent {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Current health as a fraction of max, 0.0 when max is not positive
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FactionComponent {
    pub team: Team,
}

impl FactionComponent {
    pub fn new(team: Team) -> Self {
        Self { team }
    }

    pub fn is_hostile_to(&self, other: &FactionComponent) -> bool {
        self.team != other.team
    }
}

// ============================================================================
// Orders consumed by movement and combat
// ============================================================================

/// Movement goal plus the waypoints planned for it
///
/// The AI layer only ever writes a goal through [`request_path`]; the
/// simulation driver turns pending requests into `waypoints`.
///
/// [`request_path`]: MovementComponent::request_path
#[derive(Debug, Clone, PartialEq)]
pub struct MovementComponent {
    pub speed: f32,
    pub arrival_radius: f32,
    pub goal: Option<Vec2>,
    pub path_requested: bool,
    pub waypoints: VecDeque<Vec2>,
}

impl MovementComponent {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            arrival_radius: 4.0,
            goal: None,
            path_requested: false,
            waypoints: VecDeque::new(),
        }
    }

    /// Ask for a route to `goal`. Re-requesting the current goal while a
    /// route is queued or pending does nothing.
    ///
    /// The queued route stays in place until the replan lands, so a unit
    /// chasing a moving goal keeps walking a valid route in the meantime.
    pub fn request_path(&mut self, goal: Vec2) {
        if self.goal == Some(goal) && (self.path_requested || !self.waypoints.is_empty()) {
            return;
        }
        self.goal = Some(goal);
        self.path_requested = true;
    }

    pub fn set_waypoints(&mut self, waypoints: impl IntoIterator<Item = Vec2>) {
        self.waypoints = waypoints.into_iter().collect();
        self.path_requested = false;
    }

    pub fn has_target(&self) -> bool {
        self.goal.is_some()
    }

    /// Next point to steer toward: the queued waypoint, else the raw goal.
    /// Nothing while a request waits for its first route.
    pub fn next_waypoint(&self) -> Option<Vec2> {
        match self.waypoints.front() {
            Some(waypoint) => Some(*waypoint),
            None if self.path_requested => None,
            None => self.goal,
        }
    }

    pub fn clear_target(&mut self) {
        self.goal = None;
        self.path_requested = false;
        self.waypoints.clear();
    }
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatComponent {
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub cooldown_timer: f32,
    pub target: Option<EntityId>,
}

impl CombatComponent {
    pub fn new(attack_damage: f32, attack_range: f32, attack_cooldown: f32) -> Self {
        Self {
            attack_damage,
            attack_range,
            attack_cooldown,
            cooldown_timer: 0.0,
            target: None,
        }
    }
}

impl Default for CombatComponent {
    fn default() -> Self {
        Self::new(10.0, 50.0, 1.0)
    }
}

// ============================================================================
// Economy
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCollectorComponent {
    /// Resources per second
    pub collection_rate: f32,
    pub resource_type: String,
}

impl ResourceCollectorComponent {
    pub fn new(resource_type: impl Into<String>, collection_rate: f32) -> Self {
        Self {
            collection_rate,
            resource_type: resource_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceContainerComponent {
    pub resources: AHashMap<String, f32>,
    pub capacity: AHashMap<String, f32>,
}

impl ResourceContainerComponent {
    pub fn with_capacity(resource_type: &str, amount: f32, capacity: f32) -> Self {
        let mut container = Self::default();
        container.resources.insert(resource_type.to_string(), amount);
        container.capacity.insert(resource_type.to_string(), capacity);
        container
    }

    pub fn amount(&self, resource_type: &str) -> f32 {
        self.resources.get(resource_type).copied().unwrap_or(0.0)
    }

    /// A resource with no declared capacity is never full
    pub fn is_full(&self, resource_type: &str) -> bool {
        match self.capacity.get(resource_type) {
            Some(cap) => self.amount(resource_type) >= *cap,
            None => false,
        }
    }
}
