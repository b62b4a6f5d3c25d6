//=========================================================================
// Input Event Types
//
// Platform-independent representation of keyboard and pointer input.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (per-frame held/pressed state)
//         ↓
//    Mode hooks / inspector shortcut
// ```
//
// Pointer motion compares equal regardless of coordinates so the platform
// buffer can coalesce it (last position wins).
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== PointerButton =======================================================

/// Physical pointer button (mouse button or primary touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button; touch contacts map here as well.
    Primary,
    Secondary,
    Middle,
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key, independent of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Navigation -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    /// Keys the platform layer does not map. Filtered before the core.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier keys held while an event happened.
///
/// Left and right variants are not distinguished; Command maps to `ctrl`
/// and Option to `alt` on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Shift + Ctrl + Alt, the chord used by the inspector shortcut.
    pub const ALL: Self = Self {
        shift: true,
        ctrl: true,
        alt: true,
    };
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    PointerDown {
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerUp {
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Pointer moved; screen-space pixels, top-left origin.
    PointerMoved { x: f32, y: f32 },
}

impl InputEvent {
    /// True for pointer motion, which the platform buffer coalesces.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::PointerMoved { .. })
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                PointerDown { button: a, modifiers: ma },
                PointerDown { button: b, modifiers: mb },
            )
            | (PointerUp { button: a, modifiers: ma }, PointerUp { button: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (PointerMoved { .. }, PointerMoved { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::PointerDown { button, modifiers } | Self::PointerUp { button, modifiers } => {
                button.hash(state);
                modifiers.hash(state);
            }
            // Coordinates deliberately excluded, matching `eq`.
            Self::PointerMoved { .. } => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn key_events_compare_modifiers() {
        let plain = InputEvent::KeyDown { key: KeyCode::KeyI, modifiers: Modifiers::NONE };
        let chord = InputEvent::KeyDown { key: KeyCode::KeyI, modifiers: Modifiers::ALL };
        assert_ne!(plain, chord);
        assert_eq!(chord, chord.clone());
    }

    #[test]
    fn down_and_up_differ() {
        let down = InputEvent::PointerDown { button: PointerButton::Primary, modifiers: Modifiers::NONE };
        let up = InputEvent::PointerUp { button: PointerButton::Primary, modifiers: Modifiers::NONE };
        assert_ne!(down, up);
        assert_ne!(hash_of(&down), hash_of(&up));
    }

    #[test]
    fn pointer_motion_coalesces_in_sets() {
        let mut set = HashSet::new();
        set.insert(InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        set.replace(InputEvent::PointerMoved { x: 30.0, y: 40.0 });

        assert_eq!(set.len(), 1);
        match set.iter().next() {
            Some(InputEvent::PointerMoved { x, y }) => assert_eq!((*x, *y), (30.0, 40.0)),
            other => panic!("Expected PointerMoved, got {:?}", other),
        }
    }

    #[test]
    fn only_motion_is_continuous() {
        assert!(InputEvent::PointerMoved { x: 0.0, y: 0.0 }.is_continuous());
        assert!(!InputEvent::KeyUp { key: KeyCode::Enter, modifiers: Modifiers::NONE }.is_continuous());
    }
}
