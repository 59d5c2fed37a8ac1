#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Defence simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session layer submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation collaborators to react to. Systems consume
//! immutable snapshot views and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Two dimensional vector used for every world-space position.
///
/// Geometry runs in double precision so that path progress comparisons stay
/// stable across long paths.
pub use glam::DVec2 as Vec2;

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to Tower Defence.";

/// Side length of a grid cell expressed in world units.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// Price of constructing a single tower.
pub const TOWER_COST: u32 = 50;

/// Currency credited for every enemy killed by damage.
pub const KILL_REWARD: u32 = 10;

/// Distance travelled by a bullet on every tick.
pub const BULLET_SPEED: f64 = 6.0;

/// Cost of the first purchasable tower upgrade.
pub const BASE_UPGRADE_COST: u32 = 50;

/// Increase applied to a tower's upgrade cost once its first upgrade is bought.
pub const UPGRADE_COST_STEP: u32 = 25;

/// Ceiling applied to the incremental upgrade cost.
pub const UPGRADE_COST_CAP: u32 = 200;

/// Fixed cost of the final upgrade from level four to level five.
pub const FINAL_UPGRADE_COST: u32 = 200;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single fixed step.
    Tick,
    /// Discards every entity and restores the starting economy.
    ResetSession,
    /// Records that the wave scheduler started spawning a new wave.
    BeginWave {
        /// Sequential number of the wave that started.
        wave: WaveNumber,
    },
    /// Records that every enemy of a wave has been spawned and removed.
    CompleteWave {
        /// Sequential number of the wave that finished.
        wave: WaveNumber,
    },
    /// Player request to skip the remaining break and start the next wave.
    RequestWaveStart,
    /// Requests that a new enemy enters the path at its first waypoint.
    SpawnEnemy {
        /// Variant of the enemy to create.
        kind: EnemyKind,
        /// Wave the enemy belongs to, used to scale its statistics.
        wave: WaveNumber,
    },
    /// Relocates an enemy after it travelled along the path.
    MoveEnemy {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// New world-space position of the enemy.
        position: Vec2,
        /// Index of the waypoint the enemy most recently reached.
        path_index: usize,
    },
    /// Removes an enemy that reached the final waypoint and charges a life.
    LeakEnemy {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
    },
    /// Removes every enemy killed by damage and credits the kill reward.
    ReapCasualties,
    /// Relocates a bullet pursuing its target.
    MoveBullet {
        /// Identifier of the bullet that moved.
        bullet: BulletId,
        /// New world-space position of the bullet.
        position: Vec2,
    },
    /// Removes a bullet whose target vanished without dealing damage.
    DissipateBullet {
        /// Identifier of the bullet to discard.
        bullet: BulletId,
    },
    /// Consumes a bullet that reached its target and applies its damage.
    ResolveBulletHit {
        /// Identifier of the bullet that connected.
        bullet: BulletId,
    },
    /// Caches the enemy a tower is currently aiming at.
    AimTower {
        /// Tower whose aim is updated.
        tower: TowerId,
        /// Enemy selected by targeting, or `None` when nothing is in range.
        target: Option<EnemyId>,
    },
    /// Requests that a tower fires a bullet at the provided enemy.
    FireBullet {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the bullet pursues.
        target: EnemyId,
    },
    /// Requests construction of a tower centred on the provided cell.
    PlaceTower {
        /// Grid cell the tower occupies.
        cell: CellCoord,
    },
    /// Requests that a tower advances to its next level.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Selects a tower for the information overlay, or clears the selection.
    SelectTower {
        /// Tower to highlight, or `None` to clear.
        tower: Option<TowerId>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation advanced by one fixed step.
    TimeAdvanced {
        /// Number of ticks processed since the session started.
        tick: u64,
    },
    /// Announces that a fresh session replaced all previous state.
    SessionReset,
    /// Announces that spawning for a new wave began.
    WaveStarted {
        /// Sequential number of the wave.
        wave: WaveNumber,
    },
    /// Announces that a wave was fully spawned and every enemy left the field.
    WaveCleared {
        /// Sequential number of the wave.
        wave: WaveNumber,
    },
    /// Relays the player's request to start the next wave immediately.
    WaveStartRequested,
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Starting health of the enemy.
        health: i32,
    },
    /// Confirms that an enemy arrived at a new waypoint.
    EnemyReachedWaypoint {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Index of the waypoint that was reached.
        path_index: usize,
    },
    /// Reports that an enemy escaped through the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives remaining after the leak was charged.
        lives: i32,
    },
    /// Reports that an enemy killed by damage was removed and paid out.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Currency credited for the kill.
        reward: u32,
        /// Balance after the reward was credited.
        money: u32,
    },
    /// Reports that a bullet connected with its target.
    EnemyHit {
        /// Identifier of the enemy that was struck.
        enemy: EnemyId,
        /// Identifier of the bullet that was consumed.
        bullet: BulletId,
        /// Damage applied by the bullet.
        damage: u32,
        /// Health left after the damage was applied.
        remaining_health: i32,
        /// Indicates whether the hit reduced the enemy's health to zero or below.
        killed: bool,
    },
    /// Reports that a bullet vanished without dealing damage.
    BulletDissipated {
        /// Identifier of the bullet.
        bullet: BulletId,
        /// Enemy the bullet had been pursuing.
        target: EnemyId,
    },
    /// Reports that a tower fired.
    ShotFired {
        /// Tower that fired.
        tower: TowerId,
        /// Bullet created by the shot.
        bullet: BulletId,
        /// Enemy pursued by the bullet.
        target: EnemyId,
    },
    /// Confirms that a tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Balance after the construction cost was deducted.
        money: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced to a new level.
    TowerUpgraded {
        /// Identifier of the tower.
        tower: TowerId,
        /// Level reached by the upgrade.
        level: TowerLevel,
        /// Price paid for the upgrade.
        cost: u32,
        /// Balance after the upgrade cost was deducted.
        money: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports the tower highlighted for the information overlay.
    TowerSelected {
        /// Selected tower, or `None` when the selection was cleared.
        tower: Option<TowerId>,
    },
    /// Signals that the player ran out of lives and the session ended.
    GameOver {
        /// Last wave that was started before the session ended.
        wave: WaveNumber,
    },
}

/// Notifications forwarded to the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// A tower fired a bullet.
    ShotFired,
    /// A bullet struck an enemy.
    EnemyHit,
    /// The simulation was paused.
    PauseEntered,
    /// The simulation resumed.
    PauseExited,
}

impl AudioCue {
    /// Maps a world event to the cue it should trigger, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::ShotFired { .. } => Some(Self::ShotFired),
            Event::EnemyHit { .. } => Some(Self::EnemyHit),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the bullet identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the cell for the provided cell size.
    #[must_use]
    pub fn center(self, cell_size: f64) -> Vec2 {
        Vec2::new(
            (f64::from(self.column) + 0.5) * cell_size,
            (f64::from(self.row) + 0.5) * cell_size,
        )
    }

    /// Cell containing the provided world-space point, if it lies in the positive quadrant.
    #[must_use]
    pub fn containing(point: Vec2, cell_size: f64) -> Option<Self> {
        if cell_size <= 0.0 || point.x < 0.0 || point.y < 0.0 {
            return None;
        }

        let column = (point.x / cell_size).floor();
        let row = (point.y / cell_size).floor();
        if column > f64::from(u32::MAX) || row > f64::from(u32::MAX) {
            return None;
        }

        Some(Self::new(column as u32, row as u32))
    }
}

/// Sequential number of a wave. Wave zero means no wave has started yet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a new wave number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the number of the wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Every fifth wave ends with a boss.
    #[must_use]
    pub const fn is_boss_wave(self) -> bool {
        self.0 > 0 && self.0 % 5 == 0
    }

    /// Every tenth wave reinforces its regular enemies.
    #[must_use]
    pub const fn is_elite_wave(self) -> bool {
        self.0 > 0 && self.0 % 10 == 0
    }
}

/// Variants of enemies that travel along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy.
    Normal,
    /// Quick but fragile enemy.
    Fast,
    /// Slow, heavily armoured enemy closing every fifth wave.
    Boss,
    /// Boss variant trading health for twice the speed.
    FastBoss,
}

/// Statistics assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Distance travelled along the path on every tick.
    pub speed: f64,
    /// Starting and maximum health.
    pub health: i32,
}

impl EnemyKind {
    /// Reports whether the kind fills a wave's boss slot.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss | Self::FastBoss)
    }

    /// Distance travelled on every tick.
    #[must_use]
    pub const fn speed(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Fast => 2.0,
            Self::Boss => 0.5,
            Self::FastBoss => 1.0,
        }
    }

    /// Resolves the statistics for an enemy of this kind spawned during `wave`.
    ///
    /// Bosses scale with the number of completed boss cycles while regular
    /// enemies receive a flat 1.7 health multiplier on every tenth wave. All
    /// multipliers are evaluated with integer arithmetic so the results are
    /// floored exactly.
    #[must_use]
    pub fn profile(self, wave: WaveNumber) -> EnemyProfile {
        let boss_base = 800_i64 + 200 * i64::from(wave.get() / 5);
        let health = match self {
            Self::Normal => 100,
            Self::Fast => 60,
            Self::Boss => boss_base * 6 / 5,
            Self::FastBoss => boss_base * 4 / 5,
        };

        let health = if !self.is_boss() && wave.is_elite_wave() {
            health * 17 / 10
        } else {
            health
        };

        EnemyProfile {
            speed: self.speed(),
            health: i32::try_from(health).unwrap_or(i32::MAX),
        }
    }
}

/// Level of a tower, ranging from one to five.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerLevel(u8);

impl TowerLevel {
    /// Level assigned to newly constructed towers.
    pub const FIRST: Self = Self(1);
    /// Terminal level; towers at this level cannot be upgraded further.
    pub const MAX: Self = Self(5);

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Level reached by the next upgrade, or `None` at the terminal level.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    /// Reports whether the level is terminal.
    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 >= Self::MAX.0
    }
}

impl Default for TowerLevel {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Combat statistics of a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage carried by every bullet the tower fires.
    pub damage: u32,
    /// Targeting radius measured in world units.
    pub range: f64,
    /// Number of ticks the tower waits between shots.
    pub reload_time: u32,
}

impl TowerStats {
    /// Statistics of a freshly constructed level one tower.
    pub const BASE: Self = Self {
        damage: 20,
        range: 3.0 * DEFAULT_CELL_SIZE,
        reload_time: 30,
    };

    /// Statistics after upgrading into `level`.
    ///
    /// Upgrades into levels two to four grant +20% damage, +10% range and a
    /// 10% faster reload (never below five ticks). The final upgrade into
    /// level five doubles damage, adds 50% range and cuts the reload by 30%
    /// (never below three ticks).
    #[must_use]
    pub fn upgraded_into(self, level: TowerLevel) -> Self {
        if level == TowerLevel::MAX {
            Self {
                damage: self.damage.saturating_mul(2),
                range: self.range * 1.5,
                reload_time: (self.reload_time.saturating_mul(7) / 10).max(3),
            }
        } else {
            Self {
                damage: self.damage.saturating_mul(6) / 5,
                range: self.range * 1.1,
                reload_time: (self.reload_time.saturating_mul(9) / 10).max(5),
            }
        }
    }
}

impl Default for TowerStats {
    fn default() -> Self {
        Self::BASE
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell is crossed by the enemy path.
    PathCell,
    /// Another tower already stands on the requested cell.
    Occupied,
    /// The player cannot afford the construction cost.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached the terminal level.
    MaxLevel,
    /// The player cannot afford the upgrade cost.
    InsufficientFunds,
}

/// Read-only view over the ordered waypoints enemies travel.
#[derive(Clone, Copy, Debug)]
pub struct PathView<'a> {
    waypoints: &'a [Vec2],
}

impl<'a> PathView<'a> {
    /// Captures a new path view backed by the provided waypoints.
    #[must_use]
    pub const fn new(waypoints: &'a [Vec2]) -> Self {
        Self { waypoints }
    }

    /// Ordered waypoints composing the path.
    #[must_use]
    pub const fn waypoints(&self) -> &'a [Vec2] {
        self.waypoints
    }

    /// Number of waypoints in the path.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path contains no waypoints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint.
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Waypoint stored at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Real-valued progress of an entity located at `position` that most
    /// recently reached waypoint `path_index`.
    ///
    /// Progress is the waypoint index plus the completed fraction of the
    /// current segment. Entities resting on the final waypoint, or walking a
    /// zero-length segment, contribute no fractional part.
    #[must_use]
    pub fn progress(&self, path_index: usize, position: Vec2) -> f64 {
        let base = path_index as f64;
        let (Some(current), Some(next)) = (
            self.waypoint(path_index),
            self.waypoint(path_index.saturating_add(1)),
        ) else {
            return base;
        };

        let segment_length = current.distance(next);
        if segment_length == 0.0 {
            return base;
        }

        base + 1.0 - position.distance(next) / segment_length
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// World-space position of the enemy.
    pub position: Vec2,
    /// Index of the waypoint the enemy most recently reached.
    pub path_index: usize,
    /// Distance travelled on every tick.
    pub speed: f64,
    /// Current health; may be zero or negative until the enemy is reaped.
    pub health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
    /// Indicates whether the enemy still counts as a combatant.
    pub alive: bool,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Current level of the tower.
    pub level: TowerLevel,
    /// Current combat statistics.
    pub stats: TowerStats,
    /// Ticks left before the tower may fire again.
    pub reload_counter: u32,
    /// Price of the next upgrade, or `None` at the terminal level.
    pub next_upgrade_cost: Option<u32>,
    /// Indicates whether any upgrade was purchased for the tower.
    pub first_upgrade_done: bool,
    /// Enemy the tower aimed at during the latest tick.
    pub current_target: Option<EnemyId>,
}

/// Read-only snapshot describing all towers placed on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier allocated to the bullet by the world.
    pub id: BulletId,
    /// World-space position of the bullet.
    pub position: Vec2,
    /// Distance travelled on every tick.
    pub speed: f64,
    /// Damage applied when the bullet connects.
    pub damage: u32,
    /// Enemy the bullet pursues.
    pub target: EnemyId,
}

/// Read-only snapshot describing all bullets in flight, in firing order.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullets in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of bullets captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no bullets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that aims at the enemy.
    pub tower: TowerId,
    /// Enemy selected as the tower's target.
    pub enemy: EnemyId,
    /// Path progress of the enemy when it was selected.
    pub progress: f64,
    /// Distance between the tower and the enemy when it was selected.
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::{
        AudioCue, CellCoord, EnemyKind, Event, PathView, PlacementError, TowerId, TowerLevel,
        TowerStats, UpgradeError, Vec2, WaveNumber,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&CellCoord::new(5, 7));
        assert_round_trip(&PlacementError::PathCell);
        assert_round_trip(&UpgradeError::MaxLevel);
        assert_round_trip(&EnemyKind::FastBoss);
    }

    #[test]
    fn cell_center_and_containing_agree() {
        let cell = CellCoord::new(3, 12);
        let center = cell.center(50.0);
        assert_eq!(center, Vec2::new(175.0, 625.0));
        assert_eq!(CellCoord::containing(center, 50.0), Some(cell));
        assert_eq!(CellCoord::containing(Vec2::new(-1.0, 4.0), 50.0), None);
    }

    #[test]
    fn boss_and_elite_waves_follow_multiples() {
        assert!(!WaveNumber::new(0).is_boss_wave());
        assert!(WaveNumber::new(5).is_boss_wave());
        assert!(!WaveNumber::new(5).is_elite_wave());
        assert!(WaveNumber::new(10).is_boss_wave());
        assert!(WaveNumber::new(10).is_elite_wave());
        assert!(!WaveNumber::new(7).is_boss_wave());
    }

    #[test]
    fn boss_health_scales_with_boss_cycles() {
        assert_eq!(EnemyKind::Boss.profile(WaveNumber::new(5)).health, 1_200);
        assert_eq!(EnemyKind::FastBoss.profile(WaveNumber::new(10)).health, 960);
        assert_eq!(EnemyKind::Boss.profile(WaveNumber::new(10)).health, 1_440);
    }

    #[test]
    fn fast_boss_is_twice_as_fast_as_boss() {
        let boss = EnemyKind::Boss.profile(WaveNumber::new(10));
        let fast_boss = EnemyKind::FastBoss.profile(WaveNumber::new(10));
        assert!((fast_boss.speed - boss.speed * 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn elite_waves_reinforce_regular_enemies_only() {
        assert_eq!(EnemyKind::Normal.profile(WaveNumber::new(9)).health, 100);
        assert_eq!(EnemyKind::Normal.profile(WaveNumber::new(10)).health, 170);
        assert_eq!(EnemyKind::Fast.profile(WaveNumber::new(20)).health, 102);
        assert_eq!(
            EnemyKind::Boss.profile(WaveNumber::new(10)).health,
            (800 + 200 * 2) * 6 / 5
        );
    }

    #[test]
    fn tower_level_ratchets_up_to_five() {
        let mut level = TowerLevel::FIRST;
        let mut visited = vec![level.get()];
        while let Some(next) = level.next() {
            level = next;
            visited.push(level.get());
        }
        assert_eq!(visited, vec![1, 2, 3, 4, 5]);
        assert!(level.is_max());
        assert_eq!(level.next(), None);
    }

    #[test]
    fn incremental_upgrade_scales_stats() {
        let stats = TowerStats::BASE.upgraded_into(TowerLevel(2));
        assert_eq!(stats.damage, 24);
        assert!((stats.range - 165.0).abs() < 1e-9);
        assert_eq!(stats.reload_time, 27);
    }

    #[test]
    fn final_upgrade_uses_its_own_multipliers() {
        let stats = TowerStats {
            damage: 34,
            range: 200.0,
            reload_time: 4,
        }
        .upgraded_into(TowerLevel::MAX);
        assert_eq!(stats.damage, 68);
        assert!((stats.range - 300.0).abs() < 1e-9);
        assert_eq!(stats.reload_time, 3);
    }

    #[test]
    fn reload_time_respects_minimum() {
        let stats = TowerStats {
            damage: 10,
            range: 10.0,
            reload_time: 5,
        }
        .upgraded_into(TowerLevel(3));
        assert_eq!(stats.reload_time, 5);
    }

    #[test]
    fn progress_adds_fraction_of_current_segment() {
        let waypoints = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ];
        let path = PathView::new(&waypoints);

        let progress = path.progress(1, Vec2::new(100.0, 25.0));
        assert!((progress - 1.25).abs() < 1e-12);
        assert!((path.progress(2, Vec2::new(100.0, 100.0)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn progress_ignores_zero_length_segments() {
        let waypoints = [Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0)];
        let path = PathView::new(&waypoints);
        assert!((path.progress(0, Vec2::new(10.0, 10.0))).abs() < 1e-12);
    }

    #[test]
    fn audio_cues_follow_combat_events() {
        let shot = Event::ShotFired {
            tower: TowerId::new(1),
            bullet: super::BulletId::new(2),
            target: super::EnemyId::new(3),
        };
        assert_eq!(AudioCue::from_event(&shot), Some(AudioCue::ShotFired));
        assert_eq!(AudioCue::from_event(&Event::SessionReset), None);
    }
}
