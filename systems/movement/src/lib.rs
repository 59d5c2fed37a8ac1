#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the path.

use tower_defence_core::{Command, EnemySnapshot, EnemyView, Event, PathView};

/// Pure system that reacts to elapsed ticks and emits enemy motion commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Every live enemy either steps toward its next waypoint, snaps onto it
    /// when the remaining distance fits within one tick of travel, or leaks
    /// when it already rests on the final waypoint. At most one waypoint is
    /// consumed per tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        path: PathView<'_>,
        out: &mut Vec<Command>,
    ) {
        if path.is_empty() {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies.iter().filter(|enemy| enemy.alive) {
            out.push(step(enemy, path));
        }
    }
}

fn step(enemy: &EnemySnapshot, path: PathView<'_>) -> Command {
    let next_index = enemy.path_index.saturating_add(1);
    let (Some(current), Some(next)) = (path.waypoint(enemy.path_index), path.waypoint(next_index))
    else {
        return Command::LeakEnemy { enemy: enemy.id };
    };

    if current == next {
        return Command::MoveEnemy {
            enemy: enemy.id,
            position: enemy.position,
            path_index: next_index,
        };
    }

    let offset = next - enemy.position;
    let remaining = offset.length();
    if remaining <= enemy.speed {
        return Command::MoveEnemy {
            enemy: enemy.id,
            position: next,
            path_index: next_index,
        };
    }

    Command::MoveEnemy {
        enemy: enemy.id,
        position: enemy.position + offset / remaining * enemy.speed,
        path_index: enemy.path_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{EnemyId, EnemyKind, Vec2};

    fn enemy(position: Vec2, path_index: usize, speed: f64) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(3),
            kind: EnemyKind::Normal,
            position,
            path_index,
            speed,
            health: 100,
            max_health: 100,
            alive: true,
        }
    }

    const WAYPOINTS: [Vec2; 3] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 0.0),
    ];

    #[test]
    fn steps_toward_next_waypoint() {
        let path = PathView::new(&WAYPOINTS);
        let command = step(&enemy(Vec2::new(2.0, 0.0), 0, 1.5), path);

        assert_eq!(
            command,
            Command::MoveEnemy {
                enemy: EnemyId::new(3),
                position: Vec2::new(3.5, 0.0),
                path_index: 0,
            }
        );
    }

    #[test]
    fn snaps_when_waypoint_is_within_reach() {
        let path = PathView::new(&WAYPOINTS);
        let command = step(&enemy(Vec2::new(9.0, 0.0), 0, 2.0), path);

        assert_eq!(
            command,
            Command::MoveEnemy {
                enemy: EnemyId::new(3),
                position: Vec2::new(10.0, 0.0),
                path_index: 1,
            }
        );
    }

    #[test]
    fn zero_length_segment_advances_without_moving() {
        let path = PathView::new(&WAYPOINTS);
        let command = step(&enemy(Vec2::new(10.0, 0.0), 1, 1.0), path);

        assert_eq!(
            command,
            Command::MoveEnemy {
                enemy: EnemyId::new(3),
                position: Vec2::new(10.0, 0.0),
                path_index: 2,
            }
        );
    }

    #[test]
    fn final_waypoint_leaks() {
        let path = PathView::new(&WAYPOINTS);
        let command = step(&enemy(Vec2::new(10.0, 0.0), 2, 1.0), path);

        assert_eq!(
            command,
            Command::LeakEnemy {
                enemy: EnemyId::new(3)
            }
        );
    }

    #[test]
    fn dead_enemies_and_idle_frames_are_ignored() {
        let path = PathView::new(&WAYPOINTS);
        let mut corpse = enemy(Vec2::ZERO, 0, 1.0);
        corpse.alive = false;
        let view = EnemyView::from_snapshots(vec![corpse]);
        let mut out = Vec::new();

        Movement::new().handle(&[Event::TimeAdvanced { tick: 1 }], &view, path, &mut out);
        assert!(out.is_empty());

        let view = EnemyView::from_snapshots(vec![enemy(Vec2::ZERO, 0, 1.0)]);
        Movement::new().handle(&[Event::WaveStartRequested], &view, path, &mut out);
        assert!(out.is_empty());
    }
}
