//! Audio notifier that hands cues to a background thread.

use std::{
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use tower_defence_core::AudioCue;
use tower_defence_simulation::AudioNotifier;
use tracing::trace;

/// Number of cues of each kind observed by the audio thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CueTally {
    pub(crate) shots: u64,
    pub(crate) hits: u64,
    pub(crate) pauses: u64,
}

impl CueTally {
    fn record(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::ShotFired => self.shots += 1,
            AudioCue::EnemyHit => self.hits += 1,
            AudioCue::PauseEntered | AudioCue::PauseExited => self.pauses += 1,
        }
    }
}

/// Forwards cues over a channel; sending never blocks the simulation.
pub(crate) struct ChannelNotifier {
    sender: Sender<AudioCue>,
    worker: JoinHandle<CueTally>,
}

impl ChannelNotifier {
    pub(crate) fn spawn() -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<AudioCue>();
        let worker = thread::Builder::new()
            .name("audio".to_owned())
            .spawn(move || {
                let mut tally = CueTally::default();
                for cue in receiver {
                    trace!(?cue, "audio_cue");
                    tally.record(cue);
                }
                tally
            })
            .context("failed to spawn audio thread")?;
        Ok(Self { sender, worker })
    }

    /// Closes the channel and waits for the audio thread to drain it.
    pub(crate) fn finish(self) -> Result<CueTally> {
        drop(self.sender);
        self.worker
            .join()
            .map_err(|_| anyhow!("audio thread panicked"))
    }
}

impl AudioNotifier for ChannelNotifier {
    fn notify(&mut self, cue: AudioCue) {
        // A closed channel only means nobody is listening anymore.
        let _ = self.sender.send(cue);
    }
}
