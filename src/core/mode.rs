//=========================================================================
// Modes
//=========================================================================
//
// Top-level presentation modes and the event table linking them.
//
// Edges are taken only on explicit in-mode events, never on time alone:
// ```text
//   Start    ──StartPressed──────▶ Cutscene
//   Cutscene ──CutsceneFinished──▶ Game
//   Game     ──PlayerDefeated────▶ Lose
//   Game     ──GameCompleted─────▶ Cutscene
//   Lose     ──ReturnToMenu──────▶ Start
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Mode ================================================================

/// One of the four top-level presentation states of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Title screen with the play control.
    Start,

    /// Active gameplay.
    Game,

    /// Non-interactive story sequence.
    Cutscene,

    /// Loss screen.
    Lose,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Mode; 4] = [Mode::Start, Mode::Game, Mode::Cutscene, Mode::Lose];

    /// Lowercase name used in logs and thread names.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Start => "start",
            Mode::Game => "game",
            Mode::Cutscene => "cutscene",
            Mode::Lose => "lose",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== ModeEvent ===========================================================

/// Explicit in-mode signal that may request a mode change.
///
/// Emitted by mode hooks (button presses, cutscene end, defeat) and resolved
/// against the current mode with [`ModeEvent::target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeEvent {
    /// The play control on the start menu was activated.
    StartPressed,

    /// The running cutscene reached its end or was skipped.
    CutsceneFinished,

    /// The player lost the game.
    PlayerDefeated,

    /// The player finished the game.
    GameCompleted,

    /// The loss screen asked to go back to the title.
    ReturnToMenu,
}

impl ModeEvent {
    /// Resolves the mode this event leads to from `current`.
    ///
    /// Returns `None` when the event has no edge out of `current`.
    pub fn target(self, current: Mode) -> Option<Mode> {
        match (current, self) {
            (Mode::Start, ModeEvent::StartPressed) => Some(Mode::Cutscene),
            (Mode::Cutscene, ModeEvent::CutsceneFinished) => Some(Mode::Game),
            (Mode::Game, ModeEvent::PlayerDefeated) => Some(Mode::Lose),
            (Mode::Game, ModeEvent::GameCompleted) => Some(Mode::Cutscene),
            (Mode::Lose, ModeEvent::ReturnToMenu) => Some(Mode::Start),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
