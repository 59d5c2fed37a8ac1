//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use tower_defence_core::{
    CellCoord, EnemyId, TowerId, TowerLevel, TowerSnapshot, TowerStats, Vec2, BASE_UPGRADE_COST,
    FINAL_UPGRADE_COST, UPGRADE_COST_CAP, UPGRADE_COST_STEP,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// World-space centre of the tower's cell.
    pub(crate) position: Vec2,
    pub(crate) level: TowerLevel,
    pub(crate) stats: TowerStats,
    /// Ticks left before the tower may fire again; never exceeds the reload time.
    pub(crate) reload_counter: u32,
    /// Price charged for upgrades into levels two to four.
    pub(crate) upgrade_cost: u32,
    pub(crate) first_upgrade_done: bool,
    /// Non-owning reference refreshed by targeting every tick.
    pub(crate) current_target: Option<EnemyId>,
}

impl TowerState {
    fn new(id: TowerId, cell: CellCoord, position: Vec2) -> Self {
        Self {
            id,
            cell,
            position,
            level: TowerLevel::FIRST,
            stats: TowerStats::BASE,
            reload_counter: 0,
            upgrade_cost: BASE_UPGRADE_COST,
            first_upgrade_done: false,
            current_target: None,
        }
    }

    /// Price of the next upgrade, or `None` once the tower reached level five.
    pub(crate) fn next_upgrade_cost(&self) -> Option<u32> {
        let next = self.level.next()?;
        if next == TowerLevel::MAX {
            Some(FINAL_UPGRADE_COST)
        } else {
            Some(self.upgrade_cost)
        }
    }

    /// Advances the tower one level, rescaling its statistics.
    ///
    /// Returns `None` without touching any field when the tower is already at
    /// the terminal level. Payment is the caller's responsibility.
    pub(crate) fn upgrade(&mut self) -> Option<TowerLevel> {
        let next = self.level.next()?;
        self.level = next;
        self.stats = self.stats.upgraded_into(next);
        self.reload_counter = self.reload_counter.min(self.stats.reload_time);

        if !self.first_upgrade_done {
            self.first_upgrade_done = true;
            self.upgrade_cost = self
                .upgrade_cost
                .saturating_add(UPGRADE_COST_STEP)
                .min(UPGRADE_COST_CAP);
        }

        Some(next)
    }

    /// Counts the reload down by a single tick.
    pub(crate) fn cool_down(&mut self) {
        self.reload_counter = self.reload_counter.saturating_sub(1);
    }

    pub(crate) fn ready_to_fire(&self) -> bool {
        self.reload_counter == 0
    }

    pub(crate) fn start_reload(&mut self) {
        self.reload_counter = self.stats.reload_time;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            position: self.position,
            level: self.level,
            stats: self.stats,
            reload_counter: self.reload_counter,
            next_upgrade_cost: self.next_upgrade_cost(),
            first_upgrade_done: self.first_upgrade_done,
            current_target: self.current_target,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a new tower and returns its identifier.
    pub(crate) fn insert(&mut self, cell: CellCoord, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, cell, position));
        id
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerState> {
        self.entries.get(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    /// Removes every tower while keeping identifiers unique across sessions.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
