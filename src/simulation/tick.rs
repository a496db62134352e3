//! Simulation driver - owns the registry and pathfinder, advances ticks
//!
//! Each tick:
//! AI (sense -> decide -> state) -> movement -> death sweep -> path planning
//!
//! Path requests written by the AI during a tick are planned at the end of
//! that same tick, so movement picks up the new waypoints on the next one.
//! Until then a unit keeps walking its previous route.

use ahash::AHashMap;

use crate::ai::state_machine::AiState;
use crate::ai::system::{AiComponent, AiSystem};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, GridPos, Team, Tick, Vec2};
use crate::ecs::components::{HealthComponent, MovementComponent, TransformComponent};
use crate::ecs::registry::EntityRegistry;
use crate::simulation::movement::MovementSystem;
use crate::simulation::units::UnitKind;
use crate::spatial::pathfinding::Pathfinder;

/// What happened during one call to [`Simulation::tick`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    /// Delta time actually applied, after clamping
    pub dt: f32,
    /// Entities swept this tick, ascending
    pub removed: Vec<EntityId>,
    pub paths_planned: usize,
}

pub struct Simulation {
    config: SimulationConfig,
    registry: EntityRegistry,
    pathfinder: Pathfinder,
    /// Cell rectangles blocked by live buildings
    footprints: AHashMap<EntityId, (GridPos, GridPos)>,
    current_tick: Tick,
    elapsed: f32,
}

impl Simulation {
    /// Build an empty simulation with the AI and movement systems scheduled
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = EntityRegistry::new();
        registry.register_system(AiSystem::new(config.ai.clone()));
        registry.register_system(MovementSystem::new());

        let pathfinder = Pathfinder::new(config.grid.width, config.grid.height, config.grid.cell_size);

        Ok(Self {
            config,
            registry,
            pathfinder,
            footprints: AHashMap::new(),
            current_tick: 0,
            elapsed: 0.0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    pub fn tick_count(&self) -> Tick {
        self.current_tick
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance the simulation by `dt` seconds (clamped to the configured max)
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.tick.max_tick_seconds)
        } else {
            0.0
        };

        self.registry.update(dt);

        let removed = self.sweep_dead();
        let paths_planned = self.plan_pending_paths();

        self.current_tick += 1;
        self.elapsed += dt;

        TickReport {
            tick: self.current_tick,
            dt,
            removed,
            paths_planned,
        }
    }

    /// Send an entity to `goal`, planning its route immediately
    pub fn order_move(&mut self, id: EntityId, goal: Vec2) -> Result<()> {
        let movement = self
            .registry
            .get_mut::<MovementComponent>(id)
            .ok_or(SimError::EntityNotFound(id))?;
        movement.request_path(goal);
        self.plan_path(id);
        Ok(())
    }

    /// Mark every cell touched by the world-space rectangle as blocked.
    ///
    /// Returns the covered cell range, clipped to the grid.
    pub fn block_world_rect(&mut self, min: Vec2, max: Vec2) -> (GridPos, GridPos) {
        let (lo, hi) = self.clipped_cells(min, max);
        self.set_cells(lo, hi, true);
        tracing::debug!("Blocked cells {:?}..={:?}", lo, hi);
        (lo, hi)
    }

    /// Spawn an archetype; buildings block their footprint in the pathfinder
    pub fn spawn_unit(&mut self, kind: UnitKind, position: Vec2, team: Team) -> EntityId {
        let id = kind.spawn(&mut self.registry, position, team, &self.config.ai);

        if let Some(size) = kind.stats().footprint {
            let half = Vec2::new(size / 2.0, size / 2.0);
            // Shrink by a hair so a footprint ending on a cell edge stays out of the next cell
            let edge = Vec2::new(0.001, 0.001);
            let cells = self.block_world_rect(position - half, position + half - edge);
            self.footprints.insert(id, cells);
        }
        id
    }

    /// Number of live AI entities in each lifecycle state, in [`AiState::ALL`] order
    pub fn state_census(&self) -> Vec<(AiState, usize)> {
        let world = self.registry.world();
        let mut counts: AHashMap<AiState, usize> = AHashMap::new();
        for id in world.entity_ids() {
            if let Some(ai) = world.get::<AiComponent>(id) {
                *counts.entry(ai.state_machine.current_state()).or_insert(0) += 1;
            }
        }
        AiState::ALL
            .iter()
            .map(|state| (*state, counts.get(state).copied().unwrap_or(0)))
            .collect()
    }

    /// Destroy everything at zero health, then sweep
    fn sweep_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .registry
            .entities()
            .into_iter()
            .filter(|id| {
                self.registry
                    .get::<HealthComponent>(*id)
                    .is_some_and(HealthComponent::is_dead)
            })
            .collect();

        for id in &dead {
            if let Some(ai) = self.registry.get_mut::<AiComponent>(*id) {
                ai.state_machine.change_state(AiState::Die);
            }
            self.registry.destroy_entity(*id);
        }

        let removed = self.registry.cleanup();
        for id in &removed {
            if let Some((lo, hi)) = self.footprints.remove(id) {
                self.set_cells(lo, hi, false);
            }
        }
        if !removed.is_empty() {
            tracing::info!("Tick {}: {} entities died", self.current_tick + 1, removed.len());
        }
        removed
    }

    fn plan_pending_paths(&mut self) -> usize {
        let pending: Vec<EntityId> = self
            .registry
            .entities()
            .into_iter()
            .filter(|id| {
                self.registry
                    .get::<MovementComponent>(*id)
                    .is_some_and(|m| m.path_requested)
            })
            .collect();

        let mut planned = 0;
        for id in pending {
            if self.plan_path(id) {
                planned += 1;
            }
        }
        planned
    }

    /// Resolve one entity's pending request; false if there was nothing to plan
    fn plan_path(&mut self, id: EntityId) -> bool {
        let Some(start) = self.registry.get::<TransformComponent>(id).map(|t| t.position) else {
            return false;
        };
        let Some(goal) = self.registry.get::<MovementComponent>(id).and_then(|m| m.goal) else {
            return false;
        };

        let waypoints = self.pathfinder.find_path(start, goal);
        match self.registry.get_mut::<MovementComponent>(id) {
            Some(movement) => {
                movement.set_waypoints(waypoints);
                true
            }
            None => false,
        }
    }

    fn clipped_cells(&self, min: Vec2, max: Vec2) -> (GridPos, GridPos) {
        let a = self.pathfinder.world_to_grid(min);
        let b = self.pathfinder.world_to_grid(max);
        let max_x = self.pathfinder.grid_width() as i32 - 1;
        let max_y = self.pathfinder.grid_height() as i32 - 1;
        (
            GridPos::new(a.x.min(b.x).clamp(0, max_x), a.y.min(b.y).clamp(0, max_y)),
            GridPos::new(a.x.max(b.x).clamp(0, max_x), a.y.max(b.y).clamp(0, max_y)),
        )
    }

    fn set_cells(&mut self, lo: GridPos, hi: GridPos, blocked: bool) {
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                self.pathfinder.set_obstacle(x, y, blocked);
            }
        }
    }
}
