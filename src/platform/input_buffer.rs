//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame store of input gathered between two redraws.
//
// - discrete: key and pointer button transitions, in arrival order
// - continuous: pointer motion, coalesced so only the latest survives
//
// Drained on every `RedrawRequested`, empty or not.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    /// Replaces any earlier motion event of this frame.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Appends a transition; an exact repeat of the last one is dropped.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Takes this frame's events as `(discrete, continuous)`.
    pub(crate) fn drain(&mut self) -> (Vec<InputEvent>, Vec<InputEvent>) {
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.drain().collect();
        (discrete, continuous)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn pointer_move(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    #[test]
    fn repeated_discrete_event_is_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyB));

        let (discrete, _) = buffer.drain();
        assert_eq!(discrete, [key_down(KeyCode::KeyA), key_down(KeyCode::KeyB)]);
    }

    #[test]
    fn pointer_motion_keeps_latest() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(pointer_move(10.0, 10.0));
        buffer.push_continuous(pointer_move(20.0, 30.0));

        let (_, continuous) = buffer.drain();
        assert_eq!(continuous.len(), 1);
        match continuous[0] {
            InputEvent::PointerMoved { x, y } => assert_eq!((x, y), (20.0, 30.0)),
            other => panic!("Expected PointerMoved, got {:?}", other),
        }
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::Enter));
        buffer.push_continuous(pointer_move(5.0, 5.0));

        let (discrete, continuous) = buffer.drain();
        assert_eq!(discrete.len() + continuous.len(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn draining_empty_buffer_yields_empty_batches() {
        let mut buffer = InputBuffer::new();
        let (discrete, continuous) = buffer.drain();
        assert!(discrete.is_empty() && continuous.is_empty());
    }
}
