#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adapter that turns raw pointer and keyboard input into player commands.
//!
//! The translator owns double-activation detection: a second secondary-button
//! activation on the same tower inside [`DOUBLE_ACTIVATION_WINDOW_MS`] resolves
//! into an upgrade request. The simulation only ever sees resolved commands.

use tower_defence_core::{CellCoord, TowerId, Vec2};
use tower_defence_simulation::{PlayerCommand, Simulation};
use tracing::trace;

/// Longest gap, in milliseconds, between two activations that still counts as a double activation.
pub const DOUBLE_ACTIVATION_WINDOW_MS: u64 = 400;

/// Pointer buttons understood by the translator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Places towers.
    Primary,
    /// Inspects towers and upgrades them on double activation.
    Secondary,
}

/// Pointer press reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Button that was pressed.
    pub button: PointerButton,
    /// World-space position of the pointer.
    pub position: Vec2,
    /// Host timestamp of the press in milliseconds.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Creates a new pointer event descriptor.
    #[must_use]
    pub const fn new(button: PointerButton, position: Vec2, timestamp_ms: u64) -> Self {
        Self {
            button,
            position,
            timestamp_ms,
        }
    }
}

/// Keys the translator reacts to. Anything else maps to [`Key::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Toggles the pause state.
    Space,
    /// Starts the next wave early.
    Enter,
    /// Alternative binding for starting the next wave.
    N,
    /// Any key without a binding.
    Other,
}

/// Key press reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that was pressed.
    pub key: Key,
}

impl KeyEvent {
    /// Creates a new key event descriptor.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self { key }
    }
}

/// Stateful translator from host input to [`PlayerCommand`]s.
#[derive(Debug, Default)]
pub struct InputTranslator {
    last_activation_time: Option<u64>,
    last_activation_target: Option<TowerId>,
}

impl InputTranslator {
    /// Creates a translator with no activation history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the most recent secondary activation.
    #[must_use]
    pub fn last_activation_time(&self) -> Option<u64> {
        self.last_activation_time
    }

    /// Tower hit by the most recent secondary activation, if any.
    #[must_use]
    pub fn last_activation_target(&self) -> Option<TowerId> {
        self.last_activation_target
    }

    /// Forgets the activation history, e.g. when a new game starts.
    pub fn reset(&mut self) {
        self.last_activation_time = None;
        self.last_activation_target = None;
    }

    /// Translates a pointer press using the supplied grid lookup.
    ///
    /// `tower_at` reports the tower occupying a cell. Presses outside the
    /// positive quadrant of the grid are ignored.
    pub fn handle_pointer<F>(
        &mut self,
        event: PointerEvent,
        cell_size: f64,
        tower_at: F,
        out: &mut Vec<PlayerCommand>,
    ) where
        F: Fn(CellCoord) -> Option<TowerId>,
    {
        let cell = CellCoord::containing(event.position, cell_size);
        match event.button {
            PointerButton::Primary => {
                if let Some(cell) = cell {
                    out.push(PlayerCommand::PlaceTower { cell });
                }
            }
            PointerButton::Secondary => {
                let clicked = cell.and_then(tower_at);
                self.activate(clicked, event.timestamp_ms, out);
            }
        }
    }

    /// Translates a pointer press against the current state of a simulation.
    pub fn handle_pointer_for(
        &mut self,
        event: PointerEvent,
        simulation: &Simulation,
        out: &mut Vec<PlayerCommand>,
    ) {
        self.handle_pointer(
            event,
            simulation.cell_size(),
            |cell| simulation.tower_at(cell),
            out,
        );
    }

    /// Translates a key press.
    pub fn handle_key(&mut self, event: KeyEvent, out: &mut Vec<PlayerCommand>) {
        match event.key {
            Key::Space => out.push(PlayerCommand::TogglePause),
            Key::Enter | Key::N => out.push(PlayerCommand::StartWaveNow),
            Key::Other => {}
        }
    }

    fn activate(&mut self, clicked: Option<TowerId>, now: u64, out: &mut Vec<PlayerCommand>) {
        if let Some(tower) = clicked {
            if self.is_double_activation(tower, now) {
                trace!(tower = tower.get(), now, "double_activation");
                out.push(PlayerCommand::UpgradeTower { tower });
            }
        }
        out.push(PlayerCommand::SelectTower { tower: clicked });

        self.last_activation_time = Some(now);
        self.last_activation_target = clicked;
    }

    fn is_double_activation(&self, tower: TowerId, now: u64) -> bool {
        if self.last_activation_target != Some(tower) {
            return false;
        }
        self.last_activation_time
            .and_then(|last| now.checked_sub(last))
            .is_some_and(|elapsed| elapsed <= DOUBLE_ACTIVATION_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 50.0;

    fn tower_at_origin(cell: CellCoord) -> Option<TowerId> {
        (cell == CellCoord::new(0, 0)).then(|| TowerId::new(7))
    }

    fn secondary(translator: &mut InputTranslator, position: Vec2, at: u64) -> Vec<PlayerCommand> {
        let mut out = Vec::new();
        translator.handle_pointer(
            PointerEvent::new(PointerButton::Secondary, position, at),
            CELL,
            tower_at_origin,
            &mut out,
        );
        out
    }

    #[test]
    fn primary_press_places_tower_in_hovered_cell() {
        let mut translator = InputTranslator::new();
        let mut out = Vec::new();
        translator.handle_pointer(
            PointerEvent::new(PointerButton::Primary, Vec2::new(120.0, 75.0), 0),
            CELL,
            tower_at_origin,
            &mut out,
        );
        translator.handle_pointer(
            PointerEvent::new(PointerButton::Primary, Vec2::new(-1.0, 75.0), 0),
            CELL,
            tower_at_origin,
            &mut out,
        );

        assert_eq!(
            out,
            vec![PlayerCommand::PlaceTower {
                cell: CellCoord::new(2, 1)
            }]
        );
    }

    #[test]
    fn second_activation_inside_window_upgrades() {
        let mut translator = InputTranslator::new();
        let tower = TowerId::new(7);

        assert_eq!(
            secondary(&mut translator, Vec2::new(10.0, 10.0), 1_000),
            vec![PlayerCommand::SelectTower { tower: Some(tower) }]
        );
        assert_eq!(
            secondary(&mut translator, Vec2::new(40.0, 20.0), 1_400),
            vec![
                PlayerCommand::UpgradeTower { tower },
                PlayerCommand::SelectTower { tower: Some(tower) },
            ]
        );
        assert_eq!(translator.last_activation_time(), Some(1_400));
        assert_eq!(translator.last_activation_target(), Some(tower));
    }

    #[test]
    fn slow_second_activation_only_selects() {
        let mut translator = InputTranslator::new();
        let tower = TowerId::new(7);
        let _ = secondary(&mut translator, Vec2::new(10.0, 10.0), 1_000);

        assert_eq!(
            secondary(&mut translator, Vec2::new(10.0, 10.0), 1_401),
            vec![PlayerCommand::SelectTower { tower: Some(tower) }]
        );
    }

    #[test]
    fn activation_on_empty_ground_clears_selection_and_history() {
        let mut translator = InputTranslator::new();
        let _ = secondary(&mut translator, Vec2::new(10.0, 10.0), 1_000);

        assert_eq!(
            secondary(&mut translator, Vec2::new(300.0, 10.0), 1_100),
            vec![PlayerCommand::SelectTower { tower: None }]
        );
        assert_eq!(translator.last_activation_target(), None);
        assert_eq!(
            secondary(&mut translator, Vec2::new(10.0, 10.0), 1_200),
            vec![PlayerCommand::SelectTower {
                tower: Some(TowerId::new(7))
            }]
        );
    }

    #[test]
    fn clock_going_backwards_is_not_a_double_activation() {
        let mut translator = InputTranslator::new();
        let _ = secondary(&mut translator, Vec2::new(10.0, 10.0), 1_000);

        assert_eq!(secondary(&mut translator, Vec2::new(10.0, 10.0), 900).len(), 1);
    }

    #[test]
    fn reset_forgets_pending_activation() {
        let mut translator = InputTranslator::new();
        let _ = secondary(&mut translator, Vec2::new(10.0, 10.0), 1_000);
        translator.reset();

        assert_eq!(translator.last_activation_time(), None);
        assert_eq!(translator.last_activation_target(), None);
        assert_eq!(
            secondary(&mut translator, Vec2::new(10.0, 10.0), 1_100),
            vec![PlayerCommand::SelectTower {
                tower: Some(TowerId::new(7))
            }]
        );
    }

    #[test]
    fn keys_map_to_session_controls() {
        let mut translator = InputTranslator::new();
        let mut out = Vec::new();
        for key in [Key::Space, Key::Enter, Key::N, Key::Other] {
            translator.handle_key(KeyEvent::new(key), &mut out);
        }

        assert_eq!(
            out,
            vec![
                PlayerCommand::TogglePause,
                PlayerCommand::StartWaveNow,
                PlayerCommand::StartWaveNow,
            ]
        );
    }
}
