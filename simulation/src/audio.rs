//! Fire-and-forget notifications for the audio collaborator.

use tower_defence_core::AudioCue;

/// Receives audio cues emitted by the simulation.
///
/// Implementations must not block and cannot report failure; a missing sound
/// never affects the simulation.
pub trait AudioNotifier {
    /// Delivers a single cue.
    fn notify(&mut self, cue: AudioCue);
}

/// Notifier that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

impl AudioNotifier for SilentNotifier {
    fn notify(&mut self, _cue: AudioCue) {}
}

/// Records cues in delivery order.
impl AudioNotifier for Vec<AudioCue> {
    fn notify(&mut self, cue: AudioCue) {
        self.push(cue);
    }
}
