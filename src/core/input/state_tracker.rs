//=========================================================================
// State Tracker
//=========================================================================
//
// Per-frame input state built from platform events.
//
// Architecture:
//   InputEvent → process_events() → held sets + frame deltas → queries
//
// Frame lifecycle: begin_frame() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, PointerButton};

//=== StateTracker ========================================================

/// Tracks held keys/buttons and what was pressed during the current frame.
#[derive(Debug, Default, Clone)]
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<PointerButton>,
    pointer: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Deltas (reset by begin_frame) -----------------------------
    keys_pressed: HashSet<KeyCode>,
    buttons_pressed: HashSet<PointerButton>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears the per-frame pressed sets.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }

    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                // Auto-repeat does not count as a fresh press.
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                self.keys_down.remove(&key);
            }

            InputEvent::PointerDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }

            InputEvent::PointerUp { button, modifiers } => {
                self.modifiers = modifiers;
                self.buttons_down.remove(&button);
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer = (x, y);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// True only on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// True while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// True only on the frame the pointer button went down.
    pub fn is_pointer_pressed(&self, button: PointerButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_pointer_down(&self, button: PointerButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }

    /// Modifier state reported by the most recent key or button event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// True if any key or pointer button went down this frame.
    pub fn any_pressed(&self) -> bool {
        !self.keys_pressed.is_empty() || !self.buttons_pressed.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
