#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session layer that owns the world and drives every system in tick order.
//!
//! A [`Simulation`] advances one fixed step per [`Simulation::tick`] call in
//! the order clock, waves, bullets, enemy motion and reaping, targeting,
//! firing. Player requests enter through [`Simulation::execute`], which
//! validates them against the pause gate and the session state before
//! forwarding them to the world.

mod audio;
mod clock;
mod command;
mod config;

use tower_defence_core::{
    AudioCue, BulletView, CellCoord, Command, EnemyView, Event, PathView, TowerId, TowerTarget,
    TowerView,
};
use tower_defence_system_combat_resolver::CombatResolver;
use tower_defence_system_movement::Movement;
use tower_defence_system_tower_combat::TowerCombat;
use tower_defence_system_tower_targeting::{target_for, TowerTargeting};
use tower_defence_system_wave_scheduler::WaveScheduler;
use tower_defence_world::{self as world, query, World};
use tracing::{debug, info};

pub use audio::{AudioNotifier, SilentNotifier};
pub use clock::{SimulationClock, TICKS_PER_SECOND};
pub use command::{CommandRejection, PlayerCommand};
pub use config::{ConfigError, EconomyConfig, GridConfig, SimulationConfig, WaveConfig};
pub use tower_defence_system_wave_scheduler::{WavePhase, WaveSnapshot};

/// Outcome of a single [`Simulation::tick`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Whether the simulation advanced; `false` while paused or after game over.
    pub advanced: bool,
    /// Events produced during the tick, in application order.
    pub events: Vec<Event>,
}

impl TickReport {
    /// Number of enemies killed by damage during the tick.
    #[must_use]
    pub fn kills(&self) -> usize {
        self.count(|event| matches!(event, Event::EnemyKilled { .. }))
    }

    /// Number of enemies that reached the end of the path during the tick.
    #[must_use]
    pub fn leaks(&self) -> usize {
        self.count(|event| matches!(event, Event::EnemyLeaked { .. }))
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

/// Authoritative session state plus the systems that advance it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    clock: SimulationClock,
    scheduler: WaveScheduler,
    combat_resolver: CombatResolver,
    movement: Movement,
    targeting: TowerTargeting,
    tower_combat: TowerCombat,
    targets: Vec<TowerTarget>,
    game_over: bool,
}

impl Simulation {
    /// Builds a session from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::with_config(config.world_config())?;
        let scheduler = WaveScheduler::new(config.scheduler_config());
        info!(
            seed = config.seed,
            banner = query::welcome_banner(&world),
            "session_created"
        );

        Ok(Self {
            config,
            world,
            clock: SimulationClock::new(),
            scheduler,
            combat_resolver: CombatResolver::new(),
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            tower_combat: TowerCombat::new(),
            targets: Vec::new(),
            game_over: false,
        })
    }

    /// Resets the session: fresh economy, no entities, initial break, unpaused.
    pub fn new_game(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::ResetSession, &mut events);
        let mut ignored = Vec::new();
        self.scheduler.handle(&events, 0, &mut ignored);
        self.clock.reset();
        self.targets.clear();
        self.game_over = false;
    }

    /// Advances the session by one fixed step.
    pub fn tick(&mut self, audio: &mut dyn AudioNotifier) -> TickReport {
        if self.game_over || !self.clock.advance() {
            return TickReport::default();
        }

        let mut report = TickReport {
            advanced: true,
            events: Vec::new(),
        };

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut tick_events);
        report.events.extend(tick_events.iter().cloned());

        let mut commands = Vec::new();
        self.scheduler.handle(
            &tick_events,
            query::live_enemy_count(&self.world),
            &mut commands,
        );
        self.apply_commands(&mut commands, &mut report.events);

        self.combat_resolver.handle(
            &tick_events,
            &query::bullet_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        self.apply_commands(&mut commands, &mut report.events);

        self.movement.handle(
            &tick_events,
            &query::enemy_view(&self.world),
            query::path(&self.world),
            &mut commands,
        );
        commands.push(Command::ReapCasualties);
        self.apply_commands(&mut commands, &mut report.events);

        let towers = query::tower_view(&self.world);
        self.targeting.handle(
            &towers,
            &query::enemy_view(&self.world),
            query::path(&self.world),
            &mut self.targets,
        );
        commands.extend(towers.iter().map(|tower| Command::AimTower {
            tower: tower.id,
            target: target_for(&self.targets, tower.id),
        }));
        self.apply_commands(&mut commands, &mut report.events);

        self.tower_combat.handle(
            &query::tower_view(&self.world),
            &self.targets,
            &mut commands,
        );
        self.apply_commands(&mut commands, &mut report.events);

        if report
            .events
            .iter()
            .any(|event| matches!(event, Event::GameOver { .. }))
        {
            self.game_over = true;
        }

        for cue in report.events.iter().filter_map(AudioCue::from_event) {
            audio.notify(cue);
        }

        report
    }

    /// Validates and executes a player command.
    pub fn execute(
        &mut self,
        command: PlayerCommand,
        audio: &mut dyn AudioNotifier,
    ) -> Result<(), CommandRejection> {
        if self.game_over {
            return Err(CommandRejection::GameOver);
        }

        if let PlayerCommand::TogglePause = command {
            audio.notify(self.clock.toggle_pause());
            debug!(paused = self.clock.is_paused(), "pause_toggled");
            return Ok(());
        }

        if self.clock.is_paused() {
            debug!(?command, "command_rejected_while_paused");
            return Err(CommandRejection::Paused);
        }

        let result = match command {
            PlayerCommand::PlaceTower { cell } => {
                let events = self.apply_player(Command::PlaceTower { cell });
                match events.iter().find_map(|event| match event {
                    Event::TowerPlacementRejected { reason, .. } => Some(*reason),
                    _ => None,
                }) {
                    Some(reason) => Err(CommandRejection::Placement(reason)),
                    None => Ok(()),
                }
            }
            PlayerCommand::UpgradeTower { tower } => {
                let events = self.apply_player(Command::UpgradeTower { tower });
                match events.iter().find_map(|event| match event {
                    Event::TowerUpgradeRejected { reason, .. } => Some(*reason),
                    _ => None,
                }) {
                    Some(reason) => Err(CommandRejection::Upgrade(reason)),
                    None => Ok(()),
                }
            }
            PlayerCommand::SelectTower { tower } => match tower {
                Some(id) if self.tower_view().get(id).is_none() => {
                    Err(CommandRejection::UnknownTower(id))
                }
                _ => {
                    let _ = self.apply_player(Command::SelectTower { tower });
                    Ok(())
                }
            },
            PlayerCommand::StartWaveNow => {
                if self.scheduler.snapshot().in_progress() {
                    Err(CommandRejection::WaveInProgress)
                } else {
                    let events = self.apply_player(Command::RequestWaveStart);
                    let mut commands = Vec::new();
                    self.scheduler.handle(
                        &events,
                        query::live_enemy_count(&self.world),
                        &mut commands,
                    );
                    let mut ignored = Vec::new();
                    self.apply_commands(&mut commands, &mut ignored);
                    Ok(())
                }
            }
            PlayerCommand::TogglePause => Ok(()),
        };

        if let Err(rejection) = &result {
            debug!(?command, %rejection, "command_rejected");
        }
        result
    }

    fn apply_player(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn apply_commands(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Configuration the session was built from.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to the underlying world for presentation queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Enemies currently on the path.
    #[must_use]
    pub fn enemy_view(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Towers placed by the player.
    #[must_use]
    pub fn tower_view(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Bullets in flight.
    #[must_use]
    pub fn bullet_view(&self) -> BulletView {
        query::bullet_view(&self.world)
    }

    /// Waypoints enemies travel.
    #[must_use]
    pub fn path(&self) -> PathView<'_> {
        query::path(&self.world)
    }

    /// Tower standing on `cell`, if any.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        query::tower_at(&self.world, cell)
    }

    /// Side length of a grid cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        query::cell_size(&self.world)
    }

    /// State of the wave scheduler.
    #[must_use]
    pub fn wave(&self) -> WaveSnapshot {
        self.scheduler.snapshot()
    }

    /// Current player balance.
    #[must_use]
    pub fn money(&self) -> u32 {
        query::money(&self.world)
    }

    /// Lives left in the session.
    #[must_use]
    pub fn lives(&self) -> i32 {
        query::lives(&self.world)
    }

    /// Reports whether the pause gate is closed.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Tower highlighted for the information overlay.
    #[must_use]
    pub fn selected_tower(&self) -> Option<TowerId> {
        query::selected_tower(&self.world)
    }

    /// Reports whether the session ended because the player ran out of lives.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Ticks advanced since the session started.
    #[must_use]
    pub fn elapsed_ticks(&self) -> u64 {
        self.clock.elapsed_ticks()
    }
}
