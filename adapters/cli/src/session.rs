//! Headless session driver.

use std::fmt;

use anyhow::{Context, Result};
use tower_defence_core::CellCoord;
use tower_defence_input::{InputTranslator, PointerButton, PointerEvent};
use tower_defence_simulation::{AudioNotifier, PlayerCommand, Simulation};
use tracing::{debug, info};

/// Knobs controlling a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunOptions {
    pub(crate) ticks: u64,
    pub(crate) towers: Vec<CellCoord>,
    pub(crate) upgrade_all: bool,
}

/// Final state of a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) waves: u32,
    pub(crate) money: u32,
    pub(crate) lives: i32,
    pub(crate) kills: usize,
    pub(crate) leaks: usize,
    pub(crate) upgrades: usize,
    pub(crate) game_over: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:    {}", self.ticks)?;
        writeln!(f, "waves:    {}", self.waves)?;
        writeln!(f, "money:    {}", self.money)?;
        writeln!(f, "lives:    {}", self.lives)?;
        writeln!(f, "kills:    {}", self.kills)?;
        writeln!(f, "leaks:    {}", self.leaks)?;
        writeln!(f, "upgrades: {}", self.upgrades)?;
        write!(
            f,
            "outcome:  {}",
            if self.game_over { "defeated" } else { "holding" }
        )
    }
}

/// Places towers by clicking the centre of each requested cell.
pub(crate) fn place_towers(
    simulation: &mut Simulation,
    cells: &[CellCoord],
    audio: &mut dyn AudioNotifier,
) -> Result<()> {
    let mut translator = InputTranslator::new();
    let mut commands = Vec::new();
    for &cell in cells {
        let click = PointerEvent::new(
            PointerButton::Primary,
            cell.center(simulation.cell_size()),
            0,
        );
        translator.handle_pointer_for(click, simulation, &mut commands);
        for command in commands.drain(..) {
            simulation.execute(command, audio).with_context(|| {
                format!("cannot place tower at {},{}", cell.column(), cell.row())
            })?;
        }
        debug!(column = cell.column(), row = cell.row(), "tower_placed");
    }
    Ok(())
}

/// Runs the session until the tick budget is spent or the game ends.
pub(crate) fn run(
    simulation: &mut Simulation,
    options: &RunOptions,
    audio: &mut dyn AudioNotifier,
) -> Summary {
    let mut summary = Summary::default();
    while summary.ticks < options.ticks && !simulation.is_game_over() {
        let report = simulation.tick(audio);
        summary.ticks += 1;
        summary.kills += report.kills();
        summary.leaks += report.leaks();

        if options.upgrade_all {
            summary.upgrades += buy_upgrades(simulation, audio);
        }
    }

    summary.waves = simulation.wave().wave.get();
    summary.money = simulation.money();
    summary.lives = simulation.lives();
    summary.game_over = simulation.is_game_over();
    info!(
        ticks = summary.ticks,
        waves = summary.waves,
        kills = summary.kills,
        leaks = summary.leaks,
        "session_finished"
    );
    summary
}

fn buy_upgrades(simulation: &mut Simulation, audio: &mut dyn AudioNotifier) -> usize {
    let affordable: Vec<_> = simulation
        .tower_view()
        .iter()
        .filter(|tower| {
            tower
                .next_upgrade_cost
                .is_some_and(|cost| cost <= simulation.money())
        })
        .map(|tower| tower.id)
        .collect();

    let mut bought = 0;
    for tower in affordable {
        if simulation
            .execute(PlayerCommand::UpgradeTower { tower }, audio)
            .is_ok()
        {
            bought += 1;
        }
    }
    bought
}
