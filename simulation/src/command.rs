//! Player-facing command surface of the session.

use thiserror::Error;
use tower_defence_core::{CellCoord, PlacementError, TowerId, UpgradeError};

/// Requests issued by the player through an input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerCommand {
    /// Builds a tower on the provided cell.
    PlaceTower {
        /// Cell that should host the tower.
        cell: CellCoord,
    },
    /// Buys the next level for a tower.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Highlights a tower for the information overlay, or clears the highlight.
    SelectTower {
        /// Tower to highlight.
        tower: Option<TowerId>,
    },
    /// Ends the current break and starts the next wave immediately.
    StartWaveNow,
    /// Pauses or resumes the simulation.
    TogglePause,
}

/// Reasons a player command was refused. Refused commands change nothing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CommandRejection {
    /// Only unpausing is accepted while the simulation is paused.
    #[error("the simulation is paused")]
    Paused,
    /// The session ended; start a new game first.
    #[error("the game is over")]
    GameOver,
    /// The tower could not be placed.
    #[error("tower placement rejected: {0:?}")]
    Placement(PlacementError),
    /// The tower could not be upgraded.
    #[error("tower upgrade rejected: {0:?}")]
    Upgrade(UpgradeError),
    /// The referenced tower does not exist.
    #[error("unknown tower {}", .0.get())]
    UnknownTower(TowerId),
    /// A wave is already spawning or being cleared.
    #[error("a wave is already in progress")]
    WaveInProgress,
}
