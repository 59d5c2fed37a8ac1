#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Tower Defence session.

mod audio;
mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tower_defence_core::CellCoord;
use tower_defence_simulation::{Simulation, SimulationConfig, TICKS_PER_SECOND};
use tower_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    audio::ChannelNotifier,
    session::{RunOptions, Summary},
};

/// Five minutes of simulated play.
const DEFAULT_TICKS: u64 = 5 * 60 * TICKS_PER_SECOND as u64;

/// Headless Tower Defence session runner.
#[derive(Debug, Parser)]
#[command(name = "tower-defence", version)]
struct Cli {
    /// TOML file with grid, economy and wave settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the rng seed from the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// Cells that receive a tower before the run, as `column,row`.
    #[arg(long, num_args = 1.., value_parser = parse_cell)]
    towers: Vec<CellCoord>,
    /// Buy every affordable upgrade after each tick.
    #[arg(long)]
    upgrade_all: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig> {
        let config = match &self.config {
            Some(path) => {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                SimulationConfig::from_toml_str(&source)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            ticks: self.ticks,
            towers: self.towers.clone(),
            upgrade_all: self.upgrade_all,
        }
    }
}

fn parse_cell(raw: &str) -> Result<CellCoord, String> {
    let (column, row) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{raw}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in `{raw}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row in `{raw}`"))?;
    Ok(CellCoord::new(column, row))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn play(cli: &Cli) -> Result<Summary> {
    let config = cli.load_config()?;
    let options = cli.run_options();
    let mut simulation = Simulation::new(config).context("failed to build the session")?;
    info!(
        banner = query::welcome_banner(simulation.world()),
        seed = simulation.config().seed,
        ticks = options.ticks,
        "session_started"
    );

    let mut audio = ChannelNotifier::spawn()?;
    session::place_towers(&mut simulation, &options.towers, &mut audio)?;
    let summary = session::run(&mut simulation, &options, &mut audio);
    let cues = audio.finish()?;
    info!(
        shots = cues.shots,
        hits = cues.hits,
        pauses = cues.pauses,
        "audio_cues"
    );
    Ok(summary)
}

/// Entry point for the Tower Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let summary = play(&cli)?;
    println!("{summary}");
    Ok(())
}
