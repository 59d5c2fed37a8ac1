//! Session configuration loaded from TOML documents.

use serde::Deserialize;
use thiserror::Error;
use tower_defence_core::CellCoord;
use tower_defence_system_wave_scheduler::Config as SchedulerConfig;
use tower_defence_world::{WorldConfig, WorldError};

/// Reasons a configuration document cannot be used to build a session.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the expected shape.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// The grid or economy section describes an unplayable world.
    #[error("invalid world layout")]
    World(#[from] WorldError),
    /// Enemies must be released at least one tick apart.
    #[error("spawn interval must be at least one tick")]
    ZeroSpawnInterval,
}

/// Complete configuration for a simulation session.
///
/// Every field has a default, so an empty document yields the stock game.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed feeding the wave composition rng.
    pub seed: u64,
    /// Placement grid and enemy path.
    pub grid: GridConfig,
    /// Money, lives and prices.
    pub economy: EconomyConfig,
    /// Wave cadence and sizing.
    pub waves: WaveConfig,
}

/// Placement grid and enemy path.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Side length of a cell in world units.
    pub cell_size: f64,
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// `[column, row]` pairs whose centres form the path, in travel order.
    pub path: Vec<[u32; 2]>,
}

impl Default for GridConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            cell_size: world.cell_size,
            columns: world.columns,
            rows: world.rows,
            path: world
                .path
                .iter()
                .map(|cell| [cell.column(), cell.row()])
                .collect(),
        }
    }
}

/// Money, lives and prices.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Money available when a session starts.
    pub starting_money: u32,
    /// Lives available when a session starts.
    pub starting_lives: i32,
    /// Price of a tower.
    pub tower_cost: u32,
    /// Money credited per enemy killed.
    pub kill_reward: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            starting_money: world.starting_money,
            starting_lives: world.starting_lives,
            tower_cost: world.tower_cost,
            kill_reward: world.kill_reward,
        }
    }
}

/// Wave cadence and sizing.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Ticks between the end of a wave and the start of the next one.
    pub break_ticks: u32,
    /// Ticks between two spawns within a wave.
    pub spawn_interval: u32,
    /// Enemies released by every wave regardless of its number.
    pub base_enemies: u32,
    /// Additional enemies released per wave number.
    pub enemies_per_wave: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            break_ticks: 300,
            spawn_interval: 30,
            base_enemies: 5,
            enemies_per_wave: 3,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves.spawn_interval == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        self.world_config().validate()?;
        Ok(())
    }

    /// Returns a copy of the configuration using a different rng seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parameters forwarded to the world.
    #[must_use]
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            cell_size: self.grid.cell_size,
            columns: self.grid.columns,
            rows: self.grid.rows,
            path: self
                .grid
                .path
                .iter()
                .map(|&[column, row]| CellCoord::new(column, row))
                .collect(),
            starting_money: self.economy.starting_money,
            starting_lives: self.economy.starting_lives,
            tower_cost: self.economy.tower_cost,
            kill_reward: self.economy.kill_reward,
        }
    }

    /// Parameters forwarded to the wave scheduler.
    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.seed)
            .with_break_ticks(self.waves.break_ticks)
            .with_spawn_interval(self.waves.spawn_interval)
            .with_wave_size(self.waves.base_enemies, self.waves.enemies_per_wave)
    }
}
