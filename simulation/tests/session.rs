use tower_defence_core::{AudioCue, CellCoord, Event, TowerLevel, UpgradeError};
use tower_defence_simulation::{
    CommandRejection, PlayerCommand, SilentNotifier, Simulation, SimulationConfig, TickReport,
    WaveSnapshot,
};

const DEFENSIVE_CELLS: [(u32, u32); 2] = [(2, 10), (4, 10)];

fn simulation_with(config: SimulationConfig) -> Simulation {
    Simulation::new(config).expect("valid config")
}

fn place(simulation: &mut Simulation, column: u32, row: u32) {
    simulation
        .execute(
            PlayerCommand::PlaceTower {
                cell: CellCoord::new(column, row),
            },
            &mut SilentNotifier,
        )
        .expect("tower placed");
}

fn run(simulation: &mut Simulation, ticks: u32) -> Vec<TickReport> {
    (0..ticks)
        .map(|_| simulation.tick(&mut SilentNotifier))
        .collect()
}

#[derive(Debug, PartialEq)]
struct Frame {
    enemies: Vec<tower_defence_core::EnemySnapshot>,
    towers: Vec<tower_defence_core::TowerSnapshot>,
    bullets: Vec<tower_defence_core::BulletSnapshot>,
    wave: WaveSnapshot,
    money: u32,
    lives: i32,
    ticks: u64,
}

fn frame(simulation: &Simulation) -> Frame {
    Frame {
        enemies: simulation.enemy_view().into_vec(),
        towers: simulation.tower_view().into_vec(),
        bullets: simulation.bullet_view().into_vec(),
        wave: simulation.wave(),
        money: simulation.money(),
        lives: simulation.lives(),
        ticks: simulation.elapsed_ticks(),
    }
}

#[test]
fn pause_round_trip_leaves_state_bit_identical() {
    let mut simulation = simulation_with(SimulationConfig::default());
    for (column, row) in DEFENSIVE_CELLS {
        place(&mut simulation, column, row);
    }
    simulation
        .execute(PlayerCommand::StartWaveNow, &mut SilentNotifier)
        .expect("wave started");
    let _ = run(&mut simulation, 240);
    assert!(!simulation.enemy_view().is_empty());

    let before = frame(&simulation);
    simulation
        .execute(PlayerCommand::TogglePause, &mut SilentNotifier)
        .expect("paused");
    let paused_reports = run(&mut simulation, 50);
    simulation
        .execute(PlayerCommand::TogglePause, &mut SilentNotifier)
        .expect("resumed");

    assert!(paused_reports.iter().all(|report| !report.advanced));
    assert!(paused_reports.iter().all(|report| report.events.is_empty()));
    assert_eq!(frame(&simulation), before);
}

#[test]
fn identical_seeds_produce_identical_sessions() {
    let play = || {
        let mut simulation = simulation_with(SimulationConfig::default().with_seed(1234));
        for (column, row) in DEFENSIVE_CELLS {
            place(&mut simulation, column, row);
        }
        let reports = run(&mut simulation, 6_000);
        (reports, frame(&simulation))
    };

    assert_eq!(play(), play());
}

#[test]
fn towers_defend_and_earn_rewards() {
    let mut simulation = simulation_with(SimulationConfig::default());
    for (column, row) in DEFENSIVE_CELLS {
        place(&mut simulation, column, row);
    }
    let mut cues = Vec::new();
    let mut kills = 0;
    for _ in 0..1_500 {
        kills += simulation.tick(&mut cues).kills();
    }

    assert!(kills > 0, "towers near the entrance should score kills");
    assert!(cues.contains(&AudioCue::ShotFired));
    assert!(cues.contains(&AudioCue::EnemyHit));
    assert!(simulation.money() >= 10 * kills as u32);
}

#[test]
fn reload_counters_stay_within_bounds() {
    let mut simulation = simulation_with(SimulationConfig::default().with_seed(5));
    for (column, row) in DEFENSIVE_CELLS {
        place(&mut simulation, column, row);
    }

    for _ in 0..3_000 {
        let _ = simulation.tick(&mut SilentNotifier);
        for tower in simulation.tower_view().iter() {
            assert!(tower.reload_counter <= tower.stats.reload_time);
        }
    }
}

#[test]
fn first_upgrade_consumes_last_coins() {
    let mut simulation = simulation_with(SimulationConfig::default());
    place(&mut simulation, 1, 10);
    let tower = simulation
        .tower_at(CellCoord::new(1, 10))
        .expect("tower exists");
    assert_eq!(simulation.money(), 50);

    simulation
        .execute(PlayerCommand::UpgradeTower { tower }, &mut SilentNotifier)
        .expect("first upgrade");
    let snapshot = *simulation.tower_view().get(tower).expect("tower");
    assert_eq!(simulation.money(), 0);
    assert_eq!(snapshot.level.get(), 2);
    assert!(snapshot.first_upgrade_done);

    assert_eq!(
        simulation.execute(PlayerCommand::UpgradeTower { tower }, &mut SilentNotifier),
        Err(CommandRejection::Upgrade(UpgradeError::InsufficientFunds))
    );
    assert_eq!(
        simulation.tower_view().get(tower).map(|t| t.level.get()),
        Some(2)
    );
}

#[test]
fn max_level_tower_refuses_upgrades_without_changes() {
    let mut config = SimulationConfig::default();
    config.economy.starting_money = 1_000;
    let mut simulation = simulation_with(config);
    place(&mut simulation, 1, 10);
    let tower = simulation
        .tower_at(CellCoord::new(1, 10))
        .expect("tower exists");

    for _ in 0..4 {
        simulation
            .execute(PlayerCommand::UpgradeTower { tower }, &mut SilentNotifier)
            .expect("affordable upgrade");
    }
    assert_eq!(simulation.money(), 1_000 - 50 - 50 - 75 - 75 - 200);
    let maxed = *simulation.tower_view().get(tower).expect("tower");
    assert_eq!(maxed.level, TowerLevel::MAX);
    assert_eq!(maxed.next_upgrade_cost, None);

    assert_eq!(
        simulation.execute(PlayerCommand::UpgradeTower { tower }, &mut SilentNotifier),
        Err(CommandRejection::Upgrade(UpgradeError::MaxLevel))
    );
    assert_eq!(simulation.tower_view().get(tower), Some(&maxed));
    assert_eq!(simulation.money(), 550);
}

#[test]
fn running_out_of_lives_ends_the_session_until_new_game() {
    let mut config = SimulationConfig::default();
    config.economy.starting_lives = 1;
    let mut simulation = simulation_with(config);
    simulation
        .execute(PlayerCommand::StartWaveNow, &mut SilentNotifier)
        .expect("wave started");

    let mut game_over_events = 0;
    for _ in 0..10_000 {
        let report = simulation.tick(&mut SilentNotifier);
        game_over_events += report
            .events
            .iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count();
        if simulation.is_game_over() {
            break;
        }
    }

    assert!(simulation.is_game_over());
    assert_eq!(game_over_events, 1);
    assert!(simulation.lives() <= 0);
    assert!(!simulation.tick(&mut SilentNotifier).advanced);
    assert_eq!(
        simulation.execute(PlayerCommand::StartWaveNow, &mut SilentNotifier),
        Err(CommandRejection::GameOver)
    );

    simulation.new_game();
    assert!(!simulation.is_game_over());
    assert_eq!(simulation.lives(), 1);
    assert_eq!(simulation.money(), 100);
    assert_eq!(simulation.wave().wave.get(), 0);
    assert!(simulation.enemy_view().is_empty());
    assert!(simulation.tick(&mut SilentNotifier).advanced);
}
