//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Modifier state from ModifiersChanged is cached and stamped onto every
// subsequent key and pointer button event. Touch contacts are reported as
// the primary pointer so touch devices drive the same hooks as a mouse.
// Unmapped keys are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, TouchPhase},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, PointerButton};

//=== InputProcessor ======================================================

/// Stateful Winit-to-engine event converter.
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a key event, or `None` for keys the engine does not map.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if key_code == KeyCode::Unidentified {
            return None;
        }

        Some(self.key_input_event(key_code, key_event.state))
    }

    pub(crate) fn process_pointer_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        self.pointer_input_event(PointerButton::from(button), state)
    }

    /// Pointer motion in physical pixels; carries no modifiers.
    pub(crate) fn process_pointer_move(&self, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    /// Converts a touch into its motion event plus, at contact start or
    /// end, a primary button transition.
    pub(crate) fn process_touch(
        &self,
        phase: TouchPhase,
        x: f32,
        y: f32,
    ) -> (InputEvent, Option<InputEvent>) {
        let motion = self.process_pointer_move(x, y);
        let transition = match phase {
            TouchPhase::Started => {
                Some(self.pointer_input_event(PointerButton::Primary, ElementState::Pressed))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                Some(self.pointer_input_event(PointerButton::Primary, ElementState::Released))
            }
            TouchPhase::Moved => None,
        };
        (motion, transition)
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown {
                key,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::KeyUp {
                key,
                modifiers: self.current_modifiers,
            },
        }
    }

    fn pointer_input_event(&self, button: PointerButton, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::PointerDown {
                button,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::PointerUp {
                button,
                modifiers: self.current_modifiers,
            },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Unmapped keys (F13-F24,
/// numpad, media keys) return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left is the primary pointer; Back/Forward/Other collapse to `Other`.
impl From<WinitMouseButton> for PointerButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => PointerButton::Primary,
            WinitMouseButton::Right => PointerButton::Secondary,
            WinitMouseButton::Middle => PointerButton::Middle,
            _ => PointerButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
