//! Opening layouts

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Vec2};
use crate::simulation::tick::Simulation;
use crate::simulation::units::UnitKind;

/// Handles to everything the skirmish opening spawns
#[derive(Debug, Clone, PartialEq)]
pub struct SkirmishLayout {
    pub bases: [EntityId; 2],
    pub mines: [EntityId; 2],
    pub workers: Vec<EntityId>,
    /// Team 0 soldier first, then team 1's soldier and tank
    pub army: Vec<EntityId>,
}

/// Jitter applied to the raiding party's spawn points (world units)
const RAIDER_SPREAD: f32 = 48.0;

/// Where the raiding party is sent, just outside team 0's base
pub const RALLY_POINT: Vec2 = Vec2 { x: 300.0, y: 250.0 };

/// Two bases in opposite corners, two mines in the middle, a small team 0
/// economy and a team 1 raiding party whose exact spawn points depend on
/// `seed`. The raiders start out marching on [`RALLY_POINT`].
pub fn skirmish(config: SimulationConfig, seed: u64) -> Result<(Simulation, SkirmishLayout)> {
    let mut sim = Simulation::new(config)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let bases = [
        sim.spawn_unit(UnitKind::Base, Vec2::new(100.0, 100.0), 0),
        sim.spawn_unit(UnitKind::Base, Vec2::new(1100.0, 700.0), 1),
    ];
    let mines = [
        sim.spawn_unit(UnitKind::ResourceMine, Vec2::new(400.0, 400.0), 0),
        sim.spawn_unit(UnitKind::ResourceMine, Vec2::new(800.0, 300.0), 1),
    ];

    let workers = vec![
        sim.spawn_unit(UnitKind::Worker, Vec2::new(150.0, 150.0), 0),
        sim.spawn_unit(UnitKind::Worker, Vec2::new(200.0, 150.0), 0),
    ];
    let mut army = vec![sim.spawn_unit(UnitKind::Soldier, Vec2::new(250.0, 150.0), 0)];

    for (kind, anchor) in [
        (UnitKind::Soldier, Vec2::new(900.0, 600.0)),
        (UnitKind::Tank, Vec2::new(950.0, 650.0)),
    ] {
        let jitter = Vec2::new(
            rng.gen_range(-RAIDER_SPREAD..=RAIDER_SPREAD),
            rng.gen_range(-RAIDER_SPREAD..=RAIDER_SPREAD),
        );
        let raider = sim.spawn_unit(kind, anchor + jitter, 1);
        sim.order_move(raider, RALLY_POINT)?;
        army.push(raider);
    }

    tracing::info!(
        "Skirmish ready: {} entities (seed {})",
        sim.registry().entity_count(),
        seed
    );

    Ok((
        sim,
        SkirmishLayout {
            bases,
            mines,
            workers,
            army,
        },
    ))
}
