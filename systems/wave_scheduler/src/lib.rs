#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling system that decides when enemies spawn and of which kind.
//!
//! The scheduler alternates between a timed break, a spawning phase that
//! releases one enemy per interval, and a clearing phase that waits for the
//! path to empty before the next break begins.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_defence_core::{Command, EnemyKind, Event, WaveNumber};
use tracing::debug;

const DEFAULT_BREAK_TICKS: u32 = 300;
const DEFAULT_SPAWN_INTERVAL: u32 = 30;
const DEFAULT_BASE_ENEMIES: u32 = 5;
const DEFAULT_ENEMIES_PER_WAVE: u32 = 3;

const FAST_BOSS_FIRST_WAVE: u32 = 10;
const FAST_BOSS_PROBABILITY: f64 = 0.8;
const FAST_BASE_PROBABILITY: f64 = 0.1;
const FAST_PROBABILITY_PER_WAVE: f64 = 0.05;
const FAST_PROBABILITY_CAP: f64 = 0.5;

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    break_ticks: u32,
    spawn_interval: u32,
    base_enemies: u32,
    enemies_per_wave: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration using the default cadence and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            break_ticks: DEFAULT_BREAK_TICKS,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            base_enemies: DEFAULT_BASE_ENEMIES,
            enemies_per_wave: DEFAULT_ENEMIES_PER_WAVE,
            rng_seed,
        }
    }

    /// Overrides the number of ticks spent in the break between waves.
    #[must_use]
    pub const fn with_break_ticks(mut self, break_ticks: u32) -> Self {
        self.break_ticks = break_ticks;
        self
    }

    /// Overrides the number of ticks between two spawns. Zero is treated as one.
    #[must_use]
    pub const fn with_spawn_interval(mut self, spawn_interval: u32) -> Self {
        self.spawn_interval = spawn_interval;
        self
    }

    /// Overrides the wave sizing formula `base + per_wave * wave`.
    #[must_use]
    pub const fn with_wave_size(mut self, base_enemies: u32, enemies_per_wave: u32) -> Self {
        self.base_enemies = base_enemies;
        self.enemies_per_wave = enemies_per_wave;
        self
    }

    /// Number of enemies released during `wave`, boss slot included.
    #[must_use]
    pub fn enemies_for_wave(&self, wave: WaveNumber) -> u32 {
        let regular = self
            .enemies_per_wave
            .saturating_mul(wave.get())
            .saturating_add(self.base_enemies);
        if wave.is_boss_wave() {
            regular.saturating_add(1)
        } else {
            regular
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Phase of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// Waiting for the break timer or an explicit start request.
    Break,
    /// Releasing the enemies of the current wave.
    Spawning,
    /// Every enemy was released; waiting for the path to empty.
    Clearing,
}

/// Read-only copy of the scheduler state exposed to presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveSnapshot {
    /// Most recently started wave, zero before the first one.
    pub wave: WaveNumber,
    /// Current phase of the state machine.
    pub phase: WavePhase,
    /// Enemies the current wave releases in total.
    pub enemies_to_spawn: u32,
    /// Enemies already released during the current wave.
    pub spawned_enemies: u32,
    /// Ticks elapsed since the previous spawn.
    pub spawn_timer: u32,
    /// Ticks elapsed in the current break.
    pub break_timer: u32,
}

impl WaveSnapshot {
    /// Reports whether a wave is spawning or still being cleared.
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        !matches!(self.phase, WavePhase::Break)
    }
}

/// Pure system that emits wave and spawn commands from elapsed ticks.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
    wave: WaveNumber,
    phase: WavePhase,
    enemies_to_spawn: u32,
    spawned_enemies: u32,
    spawn_timer: u32,
    break_timer: u32,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates a scheduler resting in the initial break.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            wave: WaveNumber::default(),
            phase: WavePhase::Break,
            enemies_to_spawn: 0,
            spawned_enemies: 0,
            spawn_timer: 0,
            break_timer: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Captures the current wave state.
    #[must_use]
    pub fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            wave: self.wave,
            phase: self.phase,
            enemies_to_spawn: self.enemies_to_spawn,
            spawned_enemies: self.spawned_enemies,
            spawn_timer: self.spawn_timer,
            break_timer: self.break_timer,
        }
    }

    /// Consumes world events and emits the wave commands they imply.
    ///
    /// `live_enemies` is the number of enemies currently on the path; the
    /// clearing phase ends once it reaches zero.
    pub fn handle(&mut self, events: &[Event], live_enemies: usize, out: &mut Vec<Command>) {
        let mut elapsed_ticks = 0_u32;
        let mut start_requested = false;
        for event in events {
            match event {
                Event::SessionReset => {
                    self.reset();
                    elapsed_ticks = 0;
                    start_requested = false;
                }
                Event::WaveStartRequested => start_requested = true,
                Event::TimeAdvanced { .. } => elapsed_ticks = elapsed_ticks.saturating_add(1),
                _ => {}
            }
        }

        if start_requested {
            if self.phase == WavePhase::Break {
                self.begin_wave(out);
            } else {
                debug!(wave = self.wave.get(), "wave_start_request_ignored");
            }
        }

        for _ in 0..elapsed_ticks {
            self.advance(live_enemies, out);
        }
    }

    fn reset(&mut self) {
        self.wave = WaveNumber::default();
        self.phase = WavePhase::Break;
        self.enemies_to_spawn = 0;
        self.spawned_enemies = 0;
        self.spawn_timer = 0;
        self.break_timer = 0;
    }

    fn advance(&mut self, live_enemies: usize, out: &mut Vec<Command>) {
        match self.phase {
            WavePhase::Break => {
                self.break_timer = self.break_timer.saturating_add(1);
                if self.break_timer >= self.config.break_ticks {
                    self.begin_wave(out);
                }
            }
            WavePhase::Spawning => {
                self.spawn_timer = self.spawn_timer.saturating_add(1);
                if self.spawn_timer >= self.config.spawn_interval.max(1) {
                    self.spawn_timer = 0;
                    self.spawn_next(out);
                }
            }
            WavePhase::Clearing => {
                if live_enemies == 0 {
                    out.push(Command::CompleteWave { wave: self.wave });
                    self.phase = WavePhase::Break;
                    self.break_timer = 0;
                }
            }
        }
    }

    fn begin_wave(&mut self, out: &mut Vec<Command>) {
        self.wave = self.wave.next();
        self.enemies_to_spawn = self.config.enemies_for_wave(self.wave);
        self.spawned_enemies = 0;
        self.spawn_timer = 0;
        self.break_timer = 0;
        self.phase = if self.enemies_to_spawn == 0 {
            WavePhase::Clearing
        } else {
            WavePhase::Spawning
        };
        debug!(
            wave = self.wave.get(),
            enemies = self.enemies_to_spawn,
            boss = self.wave.is_boss_wave(),
            elite = self.wave.is_elite_wave(),
            "wave_planned"
        );
        out.push(Command::BeginWave { wave: self.wave });
    }

    fn spawn_next(&mut self, out: &mut Vec<Command>) {
        let final_slot = self.spawned_enemies.saturating_add(1) == self.enemies_to_spawn;
        let kind = if final_slot && self.wave.is_boss_wave() {
            self.choose_boss()
        } else {
            self.choose_regular()
        };

        self.spawned_enemies = self.spawned_enemies.saturating_add(1);
        if self.spawned_enemies >= self.enemies_to_spawn {
            self.phase = WavePhase::Clearing;
        }
        out.push(Command::SpawnEnemy {
            kind,
            wave: self.wave,
        });
    }

    fn choose_boss(&mut self) -> EnemyKind {
        if self.wave.get() >= FAST_BOSS_FIRST_WAVE && self.rng.gen_bool(FAST_BOSS_PROBABILITY) {
            EnemyKind::FastBoss
        } else {
            EnemyKind::Boss
        }
    }

    fn choose_regular(&mut self) -> EnemyKind {
        if self.rng.gen_bool(fast_probability(self.wave)) {
            EnemyKind::Fast
        } else {
            EnemyKind::Normal
        }
    }
}

/// Probability that a regular slot of `wave` releases a fast enemy.
#[must_use]
pub fn fast_probability(wave: WaveNumber) -> f64 {
    (FAST_BASE_PROBABILITY + FAST_PROBABILITY_PER_WAVE * f64::from(wave.get()))
        .min(FAST_PROBABILITY_CAP)
}
