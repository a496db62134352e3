//! Unit and building archetypes

use crate::ai::state_machine::StateMachine;
use crate::ai::system::AiComponent;
use crate::ai::BehaviorTree;
use crate::core::config::AiConfig;
use crate::core::types::{EntityId, Team, Vec2};
use crate::ecs::components::{
    ColliderComponent, CombatComponent, FactionComponent, HealthComponent, MovementComponent,
    PhysicsComponent, ResourceCollectorComponent, ResourceContainerComponent, TransformComponent,
};
use crate::ecs::registry::EntityRegistry;
use crate::simulation::behaviors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Worker,
    Soldier,
    Tank,
    Base,
    ResourceMine,
    Turret,
}

/// Attack profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackStats {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    pub max_health: f32,
    /// None for stationary kinds
    pub speed: Option<f32>,
    pub attack: Option<AttackStats>,
    pub collider_radius: f32,
    /// Side length of the square a building occupies; None for mobile units
    pub footprint: Option<f32>,
}

impl UnitKind {
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Worker,
        UnitKind::Soldier,
        UnitKind::Tank,
        UnitKind::Base,
        UnitKind::ResourceMine,
        UnitKind::Turret,
    ];

    pub fn stats(&self) -> UnitStats {
        match self {
            UnitKind::Worker => UnitStats {
                max_health: 50.0,
                speed: Some(80.0),
                attack: Some(AttackStats { damage: 5.0, range: 30.0, cooldown: 1.0 }),
                collider_radius: 16.0,
                footprint: None,
            },
            UnitKind::Soldier => UnitStats {
                max_health: 100.0,
                speed: Some(120.0),
                attack: Some(AttackStats { damage: 15.0, range: 60.0, cooldown: 1.5 }),
                collider_radius: 16.0,
                footprint: None,
            },
            UnitKind::Tank => UnitStats {
                max_health: 250.0,
                speed: Some(60.0),
                attack: Some(AttackStats { damage: 25.0, range: 70.0, cooldown: 2.0 }),
                collider_radius: 24.0,
                footprint: None,
            },
            UnitKind::Base => UnitStats {
                max_health: 1000.0,
                speed: None,
                attack: None,
                collider_radius: 32.0,
                footprint: Some(96.0),
            },
            UnitKind::ResourceMine => UnitStats {
                max_health: 300.0,
                speed: None,
                attack: None,
                collider_radius: 32.0,
                footprint: Some(64.0),
            },
            UnitKind::Turret => UnitStats {
                max_health: 200.0,
                speed: None,
                attack: Some(AttackStats { damage: 20.0, range: 150.0, cooldown: 1.0 }),
                collider_radius: 32.0,
                footprint: Some(64.0),
            },
        }
    }

    pub fn is_building(&self) -> bool {
        self.stats().footprint.is_some()
    }

    /// Whether this kind carries an AI component
    pub fn is_autonomous(&self) -> bool {
        !matches!(self, UnitKind::Base | UnitKind::ResourceMine)
    }

    /// Default decision tree, or None for kinds without AI
    pub fn behavior_tree(&self, config: &AiConfig) -> Option<BehaviorTree> {
        let attack_range = self
            .stats()
            .attack
            .map_or(config.default_attack_range, |a| a.range);
        match self {
            UnitKind::Worker => Some(behaviors::worker_tree(config)),
            UnitKind::Soldier | UnitKind::Tank => Some(behaviors::fighter_tree(config, attack_range)),
            UnitKind::Turret => Some(behaviors::turret_tree(attack_range)),
            UnitKind::Base | UnitKind::ResourceMine => None,
        }
    }

    /// Create the entity with this kind's components and match it to systems.
    ///
    /// Obstacle marking for buildings is left to the caller, which owns the
    /// pathfinder.
    pub fn spawn(
        &self,
        registry: &mut EntityRegistry,
        position: Vec2,
        team: Team,
        config: &AiConfig,
    ) -> EntityId {
        let stats = self.stats();
        let id = registry.create_entity();

        registry.add_component(id, TransformComponent::new(position));
        registry.add_component(id, HealthComponent::new(stats.max_health));
        registry.add_component(id, ColliderComponent::new(stats.collider_radius));
        registry.add_component(id, FactionComponent::new(team));

        if let Some(speed) = stats.speed {
            registry.add_component(id, PhysicsComponent::default());
            registry.add_component(id, MovementComponent::new(speed));
        }
        if let Some(attack) = stats.attack {
            registry.add_component(
                id,
                CombatComponent::new(attack.damage, attack.range, attack.cooldown),
            );
        }

        match self {
            UnitKind::Worker => {
                registry.add_component(id, ResourceCollectorComponent::new("Gold", 5.0));
                registry.add_component(id, ResourceContainerComponent::with_capacity("Gold", 0.0, 50.0));
            }
            UnitKind::Base => {
                let mut container = ResourceContainerComponent::with_capacity("Gold", 100.0, 1000.0);
                container.resources.insert("Energy".to_string(), 50.0);
                container.capacity.insert("Energy".to_string(), 500.0);
                registry.add_component(id, container);
            }
            UnitKind::ResourceMine => {
                registry.add_component(id, ResourceCollectorComponent::new("Gold", 10.0));
            }
            UnitKind::Soldier | UnitKind::Tank | UnitKind::Turret => {}
        }

        // Every state is registered before the first transition can be asked for
        if let Some(tree) = self.behavior_tree(config) {
            registry.add_component(id, AiComponent::new(tree, StateMachine::with_all_states()));
        }

        registry.notify_systems(id);
        tracing::debug!("Spawned {:?} {} for team {} at {:?}", self, id, team, position);
        id
    }
}
