//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file (see `data/simulation.toml`); missing keys keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Navigation grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along the x axis
    ///
    /// The default covers a 1200 world-unit wide map at 32 units per cell.
    pub width: usize,

    /// Number of cells along the y axis (800 world units at 32 per cell)
    pub height: usize,

    /// Side length of one square cell in world units
    ///
    /// Buildings and units are sized in multiples of this; a 32-unit
    /// unit sprite occupies exactly one cell.
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 1200 / 32,
            height: 800 / 32,
            cell_size: 32.0,
        }
    }
}

/// AI sensing and decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// How far an AI entity can see other entities (world units)
    ///
    /// Enemies and resource sites beyond this radius are invisible to the
    /// blackboard refresh, so behavior trees never react to them.
    pub vision_range: f32,

    /// Health fraction below which units consider fleeing
    ///
    /// At 0.3 a 100 hp soldier breaks off once it drops under 30 hp.
    pub flee_health_fraction: f32,

    /// Attack range used by archetypes that carry no Combat component
    pub default_attack_range: f32,

    /// Distance at which a worker counts as "at" a resource site
    pub gather_range: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            vision_range: 200.0,
            flee_health_fraction: 0.3,
            default_attack_range: 50.0,
            gather_range: 40.0,
        }
    }
}

/// Tick pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Upper bound on a single tick's delta time (seconds)
    ///
    /// Callers are expected to clamp already; the driver clamps again so a
    /// stalled frame cannot teleport units through obstacles.
    pub max_tick_seconds: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { max_tick_seconds: 0.1 }
    }
}

/// Configuration for the simulation core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub ai: AiConfig,
    pub tick: TickConfig,
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded simulation config from {:?}", path);
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid must be at least 1x1 (got {}x{})",
                self.grid.width, self.grid.height
            )));
        }

        require_positive("cell_size", self.grid.cell_size)?;
        require_positive("vision_range", self.ai.vision_range)?;
        require_positive("default_attack_range", self.ai.default_attack_range)?;
        require_positive("gather_range", self.ai.gather_range)?;

        if !(0.0..=1.0).contains(&self.ai.flee_health_fraction) {
            return Err(SimError::InvalidConfig(format!(
                "flee_health_fraction ({}) must be within [0, 1]",
                self.ai.flee_health_fraction
            )));
        }

        require_positive("max_tick_seconds", self.tick.max_tick_seconds)?;

        Ok(())
    }
}

/// Finite and strictly positive; NaN fails every comparison so it is caught here
fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{} ({}) must be a positive finite number",
            name, value
        )))
    }
}
