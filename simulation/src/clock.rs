//! Fixed-step clock gating the simulation.

use tower_defence_core::AudioCue;

/// Nominal number of ticks per real-time second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Drives the fixed-step tick and owns the pause gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationClock {
    paused: bool,
    elapsed_ticks: u64,
}

impl SimulationClock {
    /// Creates a running clock at tick zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paused: false,
            elapsed_ticks: 0,
        }
    }

    /// Reports whether the clock is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks advanced since the clock was created or reset.
    #[must_use]
    pub const fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Flips the pause gate exactly once and returns the matching cue.
    pub fn toggle_pause(&mut self) -> AudioCue {
        self.paused = !self.paused;
        if self.paused {
            AudioCue::PauseEntered
        } else {
            AudioCue::PauseExited
        }
    }

    /// Consumes one tick unless paused, reporting whether time advanced.
    pub fn advance(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        true
    }

    /// Returns the clock to its initial running state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = SimulationClock::new();
        assert!(clock.advance());
        assert_eq!(clock.toggle_pause(), AudioCue::PauseEntered);
        assert!(!clock.advance());
        assert_eq!(clock.elapsed_ticks(), 1);
        assert_eq!(clock.toggle_pause(), AudioCue::PauseExited);
        assert!(clock.advance());
        assert_eq!(clock.elapsed_ticks(), 2);
    }
}
