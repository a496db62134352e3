//! Entity-component registry with per-tick system dispatch

pub mod component;
pub mod components;
pub mod entity;
pub mod registry;
pub mod system;
pub mod world;

pub use component::{Component, ComponentData, ComponentKind, ComponentSet};
pub use components::*;
pub use entity::Entity;
pub use registry::{EntityRegistry, SystemId};
pub use system::{System, SystemState};
pub use world::World;
