//! AI system: blackboard refresh, tree walk, state machine advance
//!
//! Each tick runs in two phases. Phase one refreshes every matched entity's
//! blackboard from a single snapshot of the world, so all trees see the same
//! cross-entity picture. Phase two walks each tree, advances its state
//! machine, and writes the resulting intent back into Movement and Combat.

use crate::ai::behavior_tree::BehaviorTree;
use crate::ai::blackboard::{Blackboard, Intent};
use crate::ai::state_machine::StateMachine;
use crate::core::config::AiConfig;
use crate::core::types::{EntityId, Vec2};
use crate::ecs::component::ComponentSet;
use crate::ecs::components::{
    CombatComponent, FactionComponent, HealthComponent, MovementComponent,
    ResourceCollectorComponent, TransformComponent,
};
use crate::ecs::system::System;
use crate::ecs::world::World;

#[derive(Debug, Default)]
pub struct AiComponent {
    pub behavior_tree: BehaviorTree,
    pub state_machine: StateMachine,
    pub blackboard: Blackboard,
}

impl AiComponent {
    pub fn new(behavior_tree: BehaviorTree, state_machine: StateMachine) -> Self {
        Self {
            behavior_tree,
            state_machine,
            blackboard: Blackboard::new(),
        }
    }
}

/// What sensing needs to know about one entity this tick
#[derive(Debug, Clone, Copy)]
struct Sighting {
    id: EntityId,
    position: Vec2,
    faction: Option<FactionComponent>,
    alive: bool,
    resource_site: bool,
}

#[derive(Debug, Clone, Copy)]
struct Spotted {
    id: EntityId,
    position: Vec2,
}

pub struct AiSystem {
    config: AiConfig,
}

impl AiSystem {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    fn snapshot(world: &World) -> Vec<Sighting> {
        world
            .entity_ids()
            .into_iter()
            .filter(|id| world.entity(*id).is_some_and(|e| !e.is_destroyed()))
            .filter_map(|id| {
                let transform = world.get::<TransformComponent>(id)?;
                Some(Sighting {
                    id,
                    position: transform.position,
                    faction: world.get::<FactionComponent>(id).copied(),
                    alive: world.get::<HealthComponent>(id).map_or(true, |h| !h.is_dead()),
                    resource_site: world.has::<ResourceCollectorComponent>(id)
                        && !world.has::<AiComponent>(id),
                })
            })
            .collect()
    }

    /// Nearest sighting within vision that passes `filter`; ties go to the
    /// lower id because the snapshot is id-ordered
    fn nearest(
        &self,
        observer: EntityId,
        from: Vec2,
        snapshot: &[Sighting],
        filter: impl Fn(&Sighting) -> bool,
    ) -> Option<Spotted> {
        let mut best: Option<(f32, Spotted)> = None;
        for sighting in snapshot.iter().filter(|s| s.id != observer) {
            if !filter(sighting) {
                continue;
            }
            let distance = from.distance(&sighting.position);
            if distance > self.config.vision_range {
                continue;
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((
                    distance,
                    Spotted {
                        id: sighting.id,
                        position: sighting.position,
                    },
                ));
            }
        }
        best.map(|(_, spotted)| spotted)
    }

    fn refresh_blackboard(&self, id: EntityId, world: &mut World, snapshot: &[Sighting]) {
        let Some(position) = world.get::<TransformComponent>(id).map(|t| t.position) else {
            return;
        };
        let health = world.get::<HealthComponent>(id).map(|h| (h.current, h.max));
        let faction = world.get::<FactionComponent>(id).copied();

        let enemy = faction.and_then(|own| {
            self.nearest(id, position, snapshot, |s| {
                s.alive && s.faction.is_some_and(|other| own.is_hostile_to(&other))
            })
        });
        let resource = self.nearest(id, position, snapshot, |s| s.resource_site);

        let Some(ai) = world.get_mut::<AiComponent>(id) else {
            return;
        };
        let bb = &mut ai.blackboard;

        bb.position = position;
        if let Some((current, max)) = health {
            bb.health = current;
            bb.max_health = max;
        }

        bb.enemy_spotted = enemy.is_some();
        if let Some(enemy) = enemy {
            bb.enemy_position = enemy.position;
            bb.enemy_entity = enemy.id;
        }

        bb.resource_spotted = resource.is_some();
        if let Some(resource) = resource {
            bb.resource_position = resource.position;
            bb.resource_entity = resource.id;
        }

        bb.intent = Intent::default();
    }

    /// Walk the tree, advance the machine, and return the tick's intent
    fn decide(id: EntityId, world: &mut World, dt: f32) -> Option<Intent> {
        let ai = world.get_mut::<AiComponent>(id)?;
        let AiComponent {
            behavior_tree,
            state_machine,
            blackboard,
        } = ai;

        // The dying do not think
        if state_machine.current_state().is_terminal() {
            return None;
        }

        let status = behavior_tree.update(blackboard);
        let intent = std::mem::take(&mut blackboard.intent);

        if let Some(next) = intent.next_state {
            let previous = state_machine.current_state();
            state_machine.change_state(next);
            if state_machine.take_state_changed() {
                tracing::debug!("Entity {} {:?} -> {:?} (tree {:?})", id, previous, next, status);
            }
        }
        state_machine.update(dt);

        Some(intent)
    }

    fn apply_intent(id: EntityId, world: &mut World, intent: &Intent) {
        if let Some(movement) = world.get_mut::<MovementComponent>(id) {
            if let Some(goal) = intent.move_to {
                movement.request_path(goal);
            } else if intent.halt {
                movement.clear_target();
            }
        }

        if let Some(combat) = world.get_mut::<CombatComponent>(id) {
            combat.target = intent.attack;
        }
    }
}

impl Default for AiSystem {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

impl System for AiSystem {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn required_components(&self) -> ComponentSet {
        ComponentSet::new()
            .with::<AiComponent>()
            .with::<TransformComponent>()
    }

    fn update(&mut self, entities: &[EntityId], world: &mut World, dt: f32) {
        let snapshot = Self::snapshot(world);

        for &id in entities {
            if world.is_active(id) {
                self.refresh_blackboard(id, world, &snapshot);
            }
        }

        for &id in entities {
            if !world.is_active(id) {
                continue;
            }
            if let Some(intent) = Self::decide(id, world, dt) {
                Self::apply_intent(id, world, &intent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behavior_tree::{BehaviorNode, BehaviorStatus};
    use crate::ai::state_machine::AiState;
    use crate::core::types::Team;
    use crate::ecs::registry::EntityRegistry;

    fn spawn(registry: &mut EntityRegistry, pos: Vec2, team: Team, tree: BehaviorTree) -> EntityId {
        let id = registry.create_entity();
        registry.add_component(id, TransformComponent::new(pos));
        registry.add_component(id, HealthComponent::new(100.0));
        registry.add_component(id, FactionComponent::new(team));
        registry.add_component(id, MovementComponent::default());
        registry.add_component(id, AiComponent::new(tree, StateMachine::with_all_states()));
        registry.notify_systems(id);
        id
    }

    fn blackboard(registry: &EntityRegistry, id: EntityId) -> Blackboard {
        registry
            .get::<AiComponent>(id)
            .map(|ai| ai.blackboard.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_refresh_spots_nearest_enemy_in_range() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());

        let scout = spawn(&mut registry, Vec2::new(0.0, 0.0), 0, BehaviorTree::new());
        let _friend = spawn(&mut registry, Vec2::new(10.0, 0.0), 0, BehaviorTree::new());
        let near = spawn(&mut registry, Vec2::new(100.0, 0.0), 1, BehaviorTree::new());
        let _far = spawn(&mut registry, Vec2::new(500.0, 0.0), 1, BehaviorTree::new());

        registry.update(0.1);

        let bb = blackboard(&registry, scout);
        assert!(bb.enemy_spotted);
        assert_eq!(bb.enemy_entity, near);
        assert_eq!(bb.enemy_position, Vec2::new(100.0, 0.0));
        assert!(!bb.resource_spotted);
    }

    #[test]
    fn test_dead_enemies_are_ignored() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());
        let scout = spawn(&mut registry, Vec2::ZERO, 0, BehaviorTree::new());
        let corpse = spawn(&mut registry, Vec2::new(20.0, 0.0), 1, BehaviorTree::new());
        if let Some(h) = registry.get_mut::<HealthComponent>(corpse) {
            h.current = 0.0;
        }

        registry.update(0.1);
        assert!(!blackboard(&registry, scout).enemy_spotted);
    }

    #[test]
    fn test_resource_site_sensing() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());
        let worker = spawn(&mut registry, Vec2::ZERO, 0, BehaviorTree::new());

        let mine = registry.create_entity();
        registry.add_component(mine, TransformComponent::new(Vec2::new(0.0, 150.0)));
        registry.add_component(mine, ResourceCollectorComponent::new("Gold", 10.0));

        registry.update(0.1);
        let bb = blackboard(&registry, worker);
        assert!(bb.resource_spotted);
        assert_eq!(bb.resource_entity, mine);
    }

    #[test]
    fn test_mutual_sighting_same_tick() {
        // Both trees run against blackboards refreshed from one snapshot
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());

        let seen_enemy = || {
            BehaviorTree::with_root(BehaviorNode::action(|bb| {
                let spotted = bb.enemy_spotted;
                bb.set("saw_enemy", spotted);
                BehaviorStatus::Success
            }))
        };
        let a = spawn(&mut registry, Vec2::ZERO, 0, seen_enemy());
        let b = spawn(&mut registry, Vec2::new(50.0, 0.0), 1, seen_enemy());

        registry.update(0.1);
        assert!(blackboard(&registry, a).get::<bool>("saw_enemy"));
        assert!(blackboard(&registry, b).get::<bool>("saw_enemy"));
    }

    #[test]
    fn test_intent_drives_components_and_state() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());

        let tree = BehaviorTree::with_root(BehaviorNode::action(|bb| {
            bb.intent.move_to = Some(bb.enemy_position);
            bb.intent.attack = Some(bb.enemy_entity);
            bb.intent.next_state = Some(AiState::Attack);
            BehaviorStatus::Running
        }));
        let hunter = spawn(&mut registry, Vec2::ZERO, 0, tree);
        registry.add_component(hunter, CombatComponent::default());
        let prey = spawn(&mut registry, Vec2::new(60.0, 0.0), 1, BehaviorTree::new());

        registry.update(0.1);

        let movement = registry.get::<MovementComponent>(hunter).cloned().unwrap_or_default();
        assert_eq!(movement.goal, Some(Vec2::new(60.0, 0.0)));
        assert!(movement.path_requested);
        assert_eq!(registry.get::<CombatComponent>(hunter).and_then(|c| c.target), Some(prey));
        assert_eq!(
            registry.get::<AiComponent>(hunter).map(|ai| ai.state_machine.current_state()),
            Some(AiState::Attack)
        );
        // Intent is consumed, not left on the blackboard
        assert!(blackboard(&registry, hunter).intent.is_empty());
    }

    #[test]
    fn test_inactive_entities_are_skipped() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());
        let idle = spawn(&mut registry, Vec2::new(5.0, 5.0), 0, BehaviorTree::new());
        if let Some(e) = registry.get_entity_mut(idle) {
            e.set_active(false);
        }
        registry.update(0.1);
        assert_eq!(blackboard(&registry, idle).position, Vec2::ZERO);
    }

    #[test]
    fn test_dying_entity_stops_deciding() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());

        let tree = BehaviorTree::with_root(BehaviorNode::action(|bb| {
            bb.intent.move_to = Some(Vec2::new(50.0, 0.0));
            bb.intent.next_state = Some(AiState::Move);
            BehaviorStatus::Running
        }));
        let doomed = spawn(&mut registry, Vec2::ZERO, 0, tree);
        if let Some(ai) = registry.get_mut::<AiComponent>(doomed) {
            ai.state_machine.change_state(AiState::Die);
        }

        registry.update(0.1);
        assert_eq!(
            registry.get::<AiComponent>(doomed).map(|ai| ai.state_machine.current_state()),
            Some(AiState::Die)
        );
        assert_eq!(registry.get::<MovementComponent>(doomed).and_then(|m| m.goal), None);
    }

    #[test]
    fn test_same_faction_is_not_an_enemy() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());
        let a = spawn(&mut registry, Vec2::ZERO, 3, BehaviorTree::new());
        let b = spawn(&mut registry, Vec2::new(20.0, 0.0), 3, BehaviorTree::new());
        // No faction at all: never hostile, never hunted
        let neutral = registry.create_entity();
        registry.add_component(neutral, TransformComponent::new(Vec2::new(5.0, 0.0)));

        registry.update(0.1);
        assert!(!blackboard(&registry, a).enemy_spotted);
        assert!(!blackboard(&registry, b).enemy_spotted);
    }

    #[test]
    fn test_missing_health_keeps_previous_value() {
        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::default());
        let drone = spawn(&mut registry, Vec2::ZERO, 0, BehaviorTree::new());
        registry.remove_component::<HealthComponent>(drone);

        registry.update(0.1);
        assert_eq!(blackboard(&registry, drone).health, 100.0);
    }
}
