//! Movement system: steers entities along their planned waypoints

use crate::core::types::{EntityId, Vec2};
use crate::ecs::component::ComponentSet;
use crate::ecs::components::{MovementComponent, PhysicsComponent, TransformComponent};
use crate::ecs::system::System;
use crate::ecs::world::World;

#[derive(Debug, Default)]
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }

    /// Advance one entity; returns its new position and velocity
    fn step(position: Vec2, movement: &mut MovementComponent, dt: f32) -> (Vec2, Vec2) {
        let Some(target) = movement.next_waypoint() else {
            return (position, Vec2::ZERO);
        };

        let to_target = target - position;
        let distance = to_target.length();

        if distance <= movement.arrival_radius {
            movement.waypoints.pop_front();
            // Last waypoint (or the direct goal) reached; a pending replan keeps the goal
            if movement.waypoints.is_empty() && !movement.path_requested {
                movement.clear_target();
            }
            return (position, Vec2::ZERO);
        }

        let direction = to_target.normalize();
        // Never overshoot the waypoint
        let travel = (movement.speed * dt).min(distance);
        (position + direction * travel, direction * movement.speed)
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn required_components(&self) -> ComponentSet {
        ComponentSet::new()
            .with::<TransformComponent>()
            .with::<MovementComponent>()
    }

    fn update(&mut self, entities: &[EntityId], world: &mut World, dt: f32) {
        for &id in entities {
            if !world.is_active(id) {
                continue;
            }
            let Some(position) = world.get::<TransformComponent>(id).map(|t| t.position) else {
                continue;
            };
            let Some(movement) = world.get_mut::<MovementComponent>(id) else {
                continue;
            };

            let (next_position, velocity) = Self::step(position, movement, dt);

            if let Some(transform) = world.get_mut::<TransformComponent>(id) {
                transform.position = next_position;
            }
            if let Some(physics) = world.get_mut::<PhysicsComponent>(id) {
                physics.velocity = velocity;
            }
        }
    }
}
