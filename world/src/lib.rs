#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tower Defence.
//!
//! The world owns the path, every live entity and the player's economy. It is
//! mutated exclusively through [`apply`], which validates each command against
//! the current state before committing it, and observed through the read-only
//! helpers in [`query`].

mod economy;
mod entities;
mod path;
mod towers;

use thiserror::Error;
use tower_defence_core::{
    CellCoord, Command, Event, PlacementError, TowerId, UpgradeError, WaveNumber,
    DEFAULT_CELL_SIZE, KILL_REWARD, TOWER_COST, WELCOME_BANNER,
};
use tracing::{debug, info, warn};

use crate::{economy::Ledger, entities::EntityRegistry, path::Path};

const DEFAULT_GRID_COLUMNS: u32 = 40;
const DEFAULT_GRID_ROWS: u32 = 22;
const DEFAULT_STARTING_MONEY: u32 = 100;
const DEFAULT_STARTING_LIVES: i32 = 10;

const DEFAULT_PATH: [(u32, u32); 16] = [
    (0, 12),
    (3, 12),
    (3, 9),
    (6, 9),
    (6, 11),
    (9, 11),
    (9, 6),
    (12, 6),
    (12, 10),
    (15, 10),
    (15, 13),
    (12, 13),
    (12, 18),
    (17, 18),
    (17, 14),
    (20, 14),
];

/// Static parameters the world is constructed from.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Side length of a grid cell in world units.
    pub cell_size: f64,
    /// Number of cell columns towers may be placed in.
    pub columns: u32,
    /// Number of cell rows towers may be placed in.
    pub rows: u32,
    /// Cells whose centres form the waypoints of the enemy path, in travel order.
    pub path: Vec<CellCoord>,
    /// Money available when a session starts.
    pub starting_money: u32,
    /// Lives available when a session starts.
    pub starting_lives: i32,
    /// Price of a tower.
    pub tower_cost: u32,
    /// Money credited for every enemy killed by damage.
    pub kill_reward: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            path: DEFAULT_PATH
                .iter()
                .map(|&(column, row)| CellCoord::new(column, row))
                .collect(),
            starting_money: DEFAULT_STARTING_MONEY,
            starting_lives: DEFAULT_STARTING_LIVES,
            tower_cost: TOWER_COST,
            kill_reward: KILL_REWARD,
        }
    }
}

/// Reasons a [`WorldConfig`] cannot produce a playable world.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorldError {
    /// The path needs a start and an end.
    #[error("the path needs at least two cells, found {found}")]
    PathTooShort {
        /// Number of cells supplied.
        found: usize,
    },
    /// Cells must have a positive, finite size.
    #[error("cell size must be positive and finite, found {0}")]
    InvalidCellSize(f64),
    /// The grid must contain at least one cell.
    #[error("the grid must contain at least one cell")]
    EmptyGrid,
    /// Every path cell must lie within the grid.
    #[error("path cell ({}, {}) lies outside the grid", .0.column(), .0.row())]
    PathOutOfBounds(CellCoord),
}

impl WorldConfig {
    /// Checks that the configuration describes a playable world.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(WorldError::InvalidCellSize(self.cell_size));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(WorldError::EmptyGrid);
        }
        if self.path.len() < 2 {
            return Err(WorldError::PathTooShort {
                found: self.path.len(),
            });
        }
        if let Some(cell) = self
            .path
            .iter()
            .find(|cell| cell.column() >= self.columns || cell.row() >= self.rows)
        {
            return Err(WorldError::PathOutOfBounds(*cell));
        }
        Ok(())
    }
}

/// Represents the authoritative Tower Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    path: Path,
    registry: EntityRegistry,
    ledger: Ledger,
    wave: WaveNumber,
    selected_tower: Option<TowerId>,
    tick_index: u64,
}

impl World {
    /// Creates a world using the default layout and economy.
    #[must_use]
    pub fn new() -> Self {
        let config = WorldConfig::default();
        let path = Path::from_cells(&config.path, config.cell_size);
        Self::assemble(config, path)
    }

    /// Creates a world from a custom configuration.
    pub fn with_config(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let path = Path::from_cells(&config.path, config.cell_size);
        Ok(Self::assemble(config, path))
    }

    fn assemble(config: WorldConfig, path: Path) -> Self {
        let ledger = Ledger::new(config.starting_money, config.starting_lives);
        Self {
            banner: WELCOME_BANNER,
            config,
            path,
            registry: EntityRegistry::new(),
            ledger,
            wave: WaveNumber::default(),
            selected_tower: None,
            tick_index: 0,
        }
    }

    fn placement_error(&self, cell: CellCoord) -> Option<PlacementError> {
        if cell.column() >= self.config.columns || cell.row() >= self.config.rows {
            return Some(PlacementError::OutOfBounds);
        }
        if self.path.contains_cell(cell) {
            return Some(PlacementError::PathCell);
        }
        if self.registry.towers.tower_at(cell).is_some() {
            return Some(PlacementError::Occupied);
        }
        if self.ledger.money() < self.config.tower_cost {
            return Some(PlacementError::InsufficientFunds);
        }
        None
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            for tower in world.registry.towers.iter_mut() {
                tower.cool_down();
            }
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::ResetSession => {
            world.registry.clear();
            world.ledger = Ledger::new(world.config.starting_money, world.config.starting_lives);
            world.wave = WaveNumber::default();
            world.selected_tower = None;
            world.tick_index = 0;
            info!("session_reset");
            out_events.push(Event::SessionReset);
        }
        Command::BeginWave { wave } => {
            world.wave = wave;
            info!(wave = wave.get(), "wave_started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::CompleteWave { wave } => {
            info!(wave = wave.get(), "wave_cleared");
            out_events.push(Event::WaveCleared { wave });
        }
        Command::RequestWaveStart => out_events.push(Event::WaveStartRequested),
        Command::SpawnEnemy { kind, wave } => {
            let start = world.path.start();
            let enemy = world.registry.spawn_enemy(kind, wave, start);
            out_events.push(Event::EnemySpawned {
                enemy: enemy.id,
                kind: enemy.kind,
                health: enemy.health,
            });
        }
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        } => {
            let last_index = world.path.last_index();
            let Some(state) = world.registry.enemy_mut(enemy) else {
                debug!(enemy = enemy.get(), "move_for_missing_enemy");
                return;
            };
            if !state.alive {
                return;
            }
            if path_index < state.path_index || path_index > last_index {
                warn!(
                    enemy = enemy.get(),
                    from = state.path_index,
                    to = path_index,
                    "invalid_path_index_dropped"
                );
                return;
            }

            let advanced = path_index != state.path_index;
            state.position = position;
            state.path_index = path_index;
            if advanced {
                out_events.push(Event::EnemyReachedWaypoint { enemy, path_index });
            }
        }
        Command::LeakEnemy { enemy } => {
            let last_index = world.path.last_index();
            let leaked = world
                .registry
                .live_enemy(enemy)
                .is_some_and(|state| state.path_index == last_index);
            if !leaked {
                warn!(enemy = enemy.get(), "premature_leak_dropped");
                return;
            }

            let _ = world.registry.remove_enemy(enemy);
            let lives = world.ledger.debit_life();
            out_events.push(Event::EnemyLeaked { enemy, lives });
            if world.ledger.take_game_over() {
                info!(wave = world.wave.get(), "game_over");
                out_events.push(Event::GameOver { wave: world.wave });
            }
        }
        Command::ReapCasualties => {
            for enemy in world.registry.reap_dead() {
                let money = world.ledger.credit(world.config.kill_reward);
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    reward: world.config.kill_reward,
                    money,
                });
            }
        }
        Command::MoveBullet { bullet, position } => {
            if let Some(state) = world.registry.bullet_mut(bullet) {
                state.position = position;
            }
        }
        Command::DissipateBullet { bullet } => {
            if let Some(state) = world.registry.remove_bullet(bullet) {
                out_events.push(Event::BulletDissipated {
                    bullet,
                    target: state.target,
                });
            }
        }
        Command::ResolveBulletHit { bullet } => {
            let Some(state) = world.registry.remove_bullet(bullet) else {
                return;
            };

            let target = world
                .registry
                .enemy_mut(state.target)
                .filter(|enemy| enemy.alive);
            match target {
                Some(enemy) => {
                    let killed = enemy.take_damage(state.damage);
                    out_events.push(Event::EnemyHit {
                        enemy: enemy.id,
                        bullet,
                        damage: state.damage,
                        remaining_health: enemy.health,
                        killed,
                    });
                }
                None => out_events.push(Event::BulletDissipated {
                    bullet,
                    target: state.target,
                }),
            }
        }
        Command::AimTower { tower, target } => {
            if let Some(state) = world.registry.towers.get_mut(tower) {
                state.current_target = target;
            }
        }
        Command::FireBullet { tower, target } => {
            let Some(state) = world.registry.towers.get(tower) else {
                return;
            };
            if !state.ready_to_fire() {
                debug!(tower = tower.get(), "fire_while_reloading_dropped");
                return;
            }
            if world.registry.live_enemy(target).is_none() {
                debug!(tower = tower.get(), enemy = target.get(), "fire_at_missing_enemy_dropped");
                return;
            }

            let position = state.position;
            let damage = state.stats.damage;
            let bullet = world.registry.spawn_bullet(position, damage, target);
            if let Some(state) = world.registry.towers.get_mut(tower) {
                state.start_reload();
            }
            out_events.push(Event::ShotFired {
                tower,
                bullet,
                target,
            });
        }
        Command::PlaceTower { cell } => {
            if let Some(reason) = world.placement_error(cell) {
                debug!(column = cell.column(), row = cell.row(), ?reason, "placement_rejected");
                out_events.push(Event::TowerPlacementRejected { cell, reason });
                return;
            }

            if !world.ledger.try_spend(world.config.tower_cost) {
                out_events.push(Event::TowerPlacementRejected {
                    cell,
                    reason: PlacementError::InsufficientFunds,
                });
                return;
            }

            let position = cell.center(world.config.cell_size);
            let tower = world.registry.towers.insert(cell, position);
            world.selected_tower = None;
            out_events.push(Event::TowerPlaced {
                tower,
                cell,
                money: world.ledger.money(),
            });
        }
        Command::UpgradeTower { tower } => {
            let Some(state) = world.registry.towers.get_mut(tower) else {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MissingTower,
                });
                return;
            };
            let Some(cost) = state.next_upgrade_cost() else {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MaxLevel,
                });
                return;
            };
            if !world.ledger.try_spend(cost) {
                debug!(tower = tower.get(), cost, "upgrade_unaffordable");
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientFunds,
                });
                return;
            }

            if let Some(level) = state.upgrade() {
                out_events.push(Event::TowerUpgraded {
                    tower,
                    level,
                    cost,
                    money: world.ledger.money(),
                });
            }
        }
        Command::SelectTower { tower } => {
            let selected = tower.filter(|id| world.registry.towers.get(*id).is_some());
            world.selected_tower = selected;
            out_events.push(Event::TowerSelected { tower: selected });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tower_defence_core::{
        BulletView, CellCoord, EnemySnapshot, EnemyView, PathView, TowerId, TowerView,
        WaveNumber,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the waypoints enemies travel.
    #[must_use]
    pub fn path(world: &World) -> PathView<'_> {
        world.path.view()
    }

    /// Enumerates every grid cell crossed by the path.
    pub fn path_cells(world: &World) -> impl Iterator<Item = CellCoord> + '_ {
        world.path.cells()
    }

    /// Reports whether the path crosses the provided cell.
    #[must_use]
    pub fn is_path_cell(world: &World, cell: CellCoord) -> bool {
        world.path.contains_cell(cell)
    }

    /// Side length of a grid cell in world units.
    #[must_use]
    pub fn cell_size(world: &World) -> f64 {
        world.config.cell_size
    }

    /// Number of columns and rows of the placement grid.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, u32) {
        (world.config.columns, world.config.rows)
    }

    /// Captures a read-only view of the enemies on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .registry
                .enemies()
                .iter()
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Number of enemies on the path that are still alive.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world
            .registry
            .enemies()
            .iter()
            .filter(|enemy| enemy.alive)
            .count()
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .registry
                .towers
                .iter()
                .map(|tower| tower.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .registry
                .bullets()
                .iter()
                .map(|bullet| bullet.snapshot())
                .collect(),
        )
    }

    /// Identifies the tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.registry.towers.tower_at(cell)
    }

    /// Resolves the enemy a tower is aiming at, provided it is still alive.
    #[must_use]
    pub fn tower_target(world: &World, tower: TowerId) -> Option<EnemySnapshot> {
        let target = world.registry.towers.get(tower)?.current_target?;
        world
            .registry
            .live_enemy(target)
            .map(|enemy| enemy.snapshot())
    }

    /// Current player balance.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.ledger.money()
    }

    /// Lives left in the current session.
    #[must_use]
    pub fn lives(world: &World) -> i32 {
        world.ledger.lives()
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.ledger.is_depleted()
    }

    /// Most recently started wave.
    #[must_use]
    pub fn wave(world: &World) -> WaveNumber {
        world.wave
    }

    /// Tower highlighted for the information overlay.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected_tower
    }

    /// Number of ticks processed since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
