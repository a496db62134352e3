//! Skirmish - decision and composition core for a small RTS simulation
//!
//! Entities are plain ids with components in an owned [`ecs::World`];
//! systems declare the components they need and run in registration order.
//! Units decide with behavior trees over a per-entity blackboard, track
//! their lifecycle in a state machine, and route around obstacles with A*.

pub mod ai;
pub mod core;
pub mod ecs;
pub mod simulation;
pub mod spatial;
