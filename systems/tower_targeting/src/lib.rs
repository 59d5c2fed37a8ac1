#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Towers prefer the in-range enemy that travelled furthest along the path.
//! Progress values closer than [`PROGRESS_RELATIVE_EPSILON`] (relative) or
//! [`PROGRESS_ABSOLUTE_EPSILON`] (absolute) are treated as equal, in which
//! case the enemy nearer to the tower wins.

use tower_defence_core::{EnemyId, EnemyView, PathView, TowerId, TowerTarget, TowerView, Vec2};

/// Relative tolerance under which two progress values count as tied.
pub const PROGRESS_RELATIVE_EPSILON: f64 = 1e-9;

/// Absolute floor for the progress tolerance, used near the path start.
pub const PROGRESS_ABSOLUTE_EPSILON: f64 = 1e-12;

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers without an enemy in range receive no entry.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        path: PathView<'_>,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies, path);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let mut best: Option<TowerTarget> = None;

            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if distance > tower.stats.range {
                    continue;
                }

                let current = TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    progress: candidate.progress,
                    distance,
                };

                match &mut best {
                    Some(existing) => {
                        if precedes(&current, existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(target) = best {
                out.push(target);
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView, path: PathView<'_>) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter().filter(|enemy| enemy.alive) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                progress: path.progress(snapshot.path_index, snapshot.position),
            });
        }
    }
}

/// Looks up the target assigned to `tower`, if any.
#[must_use]
pub fn target_for(targets: &[TowerTarget], tower: TowerId) -> Option<EnemyId> {
    targets
        .iter()
        .find(|target| target.tower == tower)
        .map(|target| target.enemy)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    progress: f64,
}

fn progress_tied(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs());
    let tolerance = (scale * PROGRESS_RELATIVE_EPSILON).max(PROGRESS_ABSOLUTE_EPSILON);
    (left - right).abs() <= tolerance
}

fn precedes(candidate: &TowerTarget, incumbent: &TowerTarget) -> bool {
    if !progress_tied(candidate.progress, incumbent.progress) {
        return candidate.progress > incumbent.progress;
    }

    if candidate.distance != incumbent.distance {
        return candidate.distance < incumbent.distance;
    }

    candidate.enemy < incumbent.enemy
}
