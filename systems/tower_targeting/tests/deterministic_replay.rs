use tower_defence_core::{CellCoord, Command, EnemyId, EnemyKind, Vec2, WaveNumber};
use tower_defence_system_tower_targeting::{target_for, TowerTargeting};
use tower_defence_world::{self as world, query, World};

fn spawn(world: &mut World, count: usize) -> Vec<EnemyId> {
    let mut events = Vec::new();
    for _ in 0..count {
        world::apply(
            world,
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
                wave: WaveNumber::new(1),
            },
            &mut events,
        );
    }
    query::enemy_view(world).iter().map(|enemy| enemy.id).collect()
}

fn move_to(world: &mut World, enemy: EnemyId, position: Vec2, path_index: usize) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        },
        &mut events,
    );
}

fn aim(world: &mut World, system: &mut TowerTargeting) {
    let mut targets = Vec::new();
    system.handle(
        &query::tower_view(world),
        &query::enemy_view(world),
        query::path(world),
        &mut targets,
    );

    let towers: Vec<_> = query::tower_view(world).iter().map(|tower| tower.id).collect();
    let mut events = Vec::new();
    for tower in towers {
        world::apply(
            world,
            Command::AimTower {
                tower,
                target: target_for(&targets, tower),
            },
            &mut events,
        );
    }
}

#[test]
fn tower_tracks_leading_enemy_through_world() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            cell: CellCoord::new(2, 10),
        },
        &mut events,
    );
    let tower = query::tower_at(&world, CellCoord::new(2, 10)).expect("tower placed");

    let enemies = spawn(&mut world, 2);
    move_to(&mut world, enemies[0], Vec2::new(100.0, 625.0), 0);
    move_to(&mut world, enemies[1], Vec2::new(175.0, 600.0), 1);

    let mut system = TowerTargeting::new();
    aim(&mut world, &mut system);

    let target = query::tower_target(&world, tower).expect("target in range");
    assert_eq!(target.id, enemies[1]);
    assert_eq!(
        query::tower_view(&world).get(tower).and_then(|t| t.current_target),
        Some(enemies[1])
    );
}

#[test]
fn target_is_cleared_when_enemies_leave_range() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            cell: CellCoord::new(1, 10),
        },
        &mut events,
    );
    let tower = query::tower_at(&world, CellCoord::new(1, 10)).expect("tower placed");
    let enemies = spawn(&mut world, 1);

    let mut system = TowerTargeting::new();
    aim(&mut world, &mut system);
    assert_eq!(
        query::tower_target(&world, tower).map(|enemy| enemy.id),
        Some(enemies[0])
    );

    move_to(&mut world, enemies[0], Vec2::new(175.0, 625.0), 1);
    move_to(&mut world, enemies[0], Vec2::new(175.0, 475.0), 2);
    move_to(&mut world, enemies[0], Vec2::new(325.0, 475.0), 3);
    aim(&mut world, &mut system);

    assert_eq!(query::tower_target(&world, tower), None);
}

#[test]
fn repeated_runs_choose_identical_targets() {
    let run = || {
        let mut world = World::new();
        let mut events = Vec::new();
        for cell in [CellCoord::new(2, 10), CellCoord::new(4, 10)] {
            world::apply(&mut world, Command::PlaceTower { cell }, &mut events);
        }
        let enemies = spawn(&mut world, 3);
        move_to(&mut world, enemies[0], Vec2::new(175.0, 560.0), 1);
        move_to(&mut world, enemies[1], Vec2::new(175.0, 500.0), 1);
        move_to(&mut world, enemies[2], Vec2::new(150.0, 625.0), 0);

        let mut system = TowerTargeting::new();
        aim(&mut world, &mut system);
        query::tower_view(&world)
            .iter()
            .map(|tower| tower.current_target)
            .collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.iter().all(|target| *target == first[0]));
}
