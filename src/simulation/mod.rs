//! Simulation layer: archetypes, movement, and the tick driver

pub mod behaviors;
pub mod movement;
pub mod scenario;
pub mod tick;
pub mod units;

pub use movement::MovementSystem;
pub use scenario::{skirmish, SkirmishLayout, RALLY_POINT};
pub use tick::{Simulation, TickReport};
pub use units::{UnitKind, UnitStats};
