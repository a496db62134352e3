//! Default behavior trees for the unit archetypes
//!
//! Every leaf is stateless: it reads the freshly sensed blackboard and writes
//! an [`Intent`](crate::ai::Intent). Actions that keep a unit busy return
//! Running so the enclosing selector stops there.

use crate::ai::behavior_tree::{BehaviorNode, BehaviorStatus, BehaviorTree};
use crate::ai::blackboard::Blackboard;
use crate::ai::state_machine::AiState;
use crate::core::config::AiConfig;
use crate::core::types::Vec2;

/// How far a fleeing unit plans to run in one decision
pub const FLEE_DISTANCE: f32 = 150.0;

// ============================================================================
// Conditions
// ============================================================================

fn low_health(flee_fraction: f32) -> BehaviorNode {
    BehaviorNode::condition(move |bb| bb.health_fraction() < flee_fraction)
}

fn enemy_spotted() -> BehaviorNode {
    BehaviorNode::condition(|bb| bb.enemy_spotted)
}

fn enemy_in_range(range: f32) -> BehaviorNode {
    BehaviorNode::condition(move |bb| bb.distance_to_enemy().is_some_and(|d| d <= range))
}

fn resource_spotted() -> BehaviorNode {
    BehaviorNode::condition(|bb| bb.resource_spotted)
}

// ============================================================================
// Actions
// ============================================================================

fn flee() -> BehaviorNode {
    BehaviorNode::action(|bb| {
        bb.intent.next_state = Some(AiState::Flee);
        if bb.enemy_spotted {
            let away = (bb.position - bb.enemy_position).normalize();
            // Standing on the enemy gives no direction; pick one
            let away = if away == Vec2::ZERO { Vec2::new(1.0, 0.0) } else { away };
            bb.target_position = bb.position + away * FLEE_DISTANCE;
            bb.intent.move_to = Some(bb.target_position);
        } else {
            bb.intent.halt = true;
        }
        BehaviorStatus::Running
    })
}

fn gather(gather_range: f32) -> BehaviorNode {
    BehaviorNode::action(move |bb| {
        bb.target_entity = bb.resource_entity;
        bb.target_position = bb.resource_position;
        match bb.distance_to_resource() {
            Some(d) if d <= gather_range => {
                bb.intent.halt = true;
                bb.intent.next_state = Some(AiState::Gather);
            }
            _ => {
                bb.intent.move_to = Some(bb.resource_position);
                bb.intent.next_state = Some(AiState::Move);
            }
        }
        BehaviorStatus::Running
    })
}

fn attack() -> BehaviorNode {
    BehaviorNode::action(|bb| {
        bb.target_entity = bb.enemy_entity;
        bb.target_position = bb.enemy_position;
        bb.intent.attack = Some(bb.enemy_entity);
        bb.intent.halt = true;
        bb.intent.next_state = Some(AiState::Attack);
        BehaviorStatus::Running
    })
}

fn chase() -> BehaviorNode {
    BehaviorNode::action(|bb| {
        bb.target_entity = bb.enemy_entity;
        bb.target_position = bb.enemy_position;
        bb.intent.move_to = Some(bb.enemy_position);
        bb.intent.next_state = Some(AiState::Move);
        BehaviorStatus::Running
    })
}

fn idle() -> BehaviorNode {
    // Leaves any standing movement order alone
    BehaviorNode::action(|bb: &mut Blackboard| {
        bb.intent.next_state = Some(AiState::Idle);
        BehaviorStatus::Success
    })
}

// ============================================================================
// Trees
// ============================================================================

/// Flee when hurt and threatened, otherwise gather, otherwise idle
pub fn worker_tree(config: &AiConfig) -> BehaviorTree {
    let flee_fraction = config.flee_health_fraction;
    BehaviorTree::with_root(BehaviorNode::selector(vec![
        BehaviorNode::sequence(vec![low_health(flee_fraction), enemy_spotted(), flee()]),
        BehaviorNode::sequence(vec![resource_spotted(), gather(config.gather_range)]),
        idle(),
    ]))
}

/// Flee when hurt, attack in range, chase anything spotted, otherwise idle
pub fn fighter_tree(config: &AiConfig, attack_range: f32) -> BehaviorTree {
    BehaviorTree::with_root(BehaviorNode::selector(vec![
        BehaviorNode::sequence(vec![low_health(config.flee_health_fraction), flee()]),
        BehaviorNode::sequence(vec![enemy_in_range(attack_range), attack()]),
        BehaviorNode::sequence(vec![enemy_spotted(), chase()]),
        idle(),
    ]))
}

/// Stationary: attack in range, otherwise idle
pub fn turret_tree(attack_range: f32) -> BehaviorTree {
    BehaviorTree::with_root(BehaviorNode::selector(vec![
        BehaviorNode::sequence(vec![enemy_in_range(attack_range), attack()]),
        idle(),
    ]))
}
