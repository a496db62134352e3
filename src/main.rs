//! Skirmish - headless demo
//!
//! Builds the default two-team opening, runs it for a fixed number of ticks
//! and logs a per-second summary of what the AI is doing.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skirmish::core::config::SimulationConfig;
use skirmish::core::error::Result;
use skirmish::ecs::components::TransformComponent;
use skirmish::simulation::{skirmish as build_skirmish, Simulation};

/// Headless skirmish runner
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run the AI skirmish scenario without a window")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds per tick (clamped to the configured max)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Random seed for the raiding party's spawn points
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let (mut sim, layout) = build_skirmish(config, args.seed)?;
    tracing::info!(
        "Running {} ticks at dt={:.4} ({} units in the field)",
        args.ticks,
        args.dt,
        layout.workers.len() + layout.army.len()
    );

    let mut next_report = 1.0;
    let mut deaths = 0;
    for _ in 0..args.ticks {
        let report = sim.tick(args.dt);
        deaths += report.removed.len();

        if sim.elapsed() >= next_report {
            log_summary(&sim);
            next_report += 1.0;
        }
    }

    tracing::info!(
        "Finished after {} ticks ({:.1}s simulated), {} entities lost",
        sim.tick_count(),
        sim.elapsed(),
        deaths
    );
    log_summary(&sim);
    Ok(())
}

fn log_summary(sim: &Simulation) {
    let census: Vec<String> = sim
        .state_census()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(state, n)| format!("{:?}={}", state, n))
        .collect();
    tracing::info!("t={:.1}s states: {}", sim.elapsed(), census.join(" "));

    let world = sim.registry().world();
    for id in world.entity_ids() {
        if let Some(transform) = world.get::<TransformComponent>(id) {
            tracing::debug!(
                "  {} at ({:.0}, {:.0})",
                id,
                transform.position.x,
                transform.position.y
            );
        }
    }
}
