//! Spatial data: uniform grids and grid pathfinding

pub mod grid;
pub mod pathfinding;

pub use grid::Grid;
pub use pathfinding::Pathfinder;
