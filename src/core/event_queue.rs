//=========================================================================
// Event Queue
//=========================================================================
//
// FIFO of mode events emitted by hooks during a tick.
//
// Hooks push events while the active scene updates; the state machine
// drains the queue right after, so every event is seen by exactly one
// tick.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::mode::ModeEvent;

//=== EventQueue ==========================================================

/// Queue of pending [`ModeEvent`]s, processed in emission order.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: Vec<ModeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an event for the end of the current tick.
    pub fn push(&mut self, event: ModeEvent) {
        self.queue.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every queued event.
    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all queued events, leaving the queue empty.
    pub fn take(&mut self) -> Vec<ModeEvent> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(ModeEvent::StartPressed);
        queue.push(ModeEvent::ReturnToMenu);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(), [ModeEvent::StartPressed, ModeEvent::ReturnToMenu]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_events() {
        let mut queue = EventQueue::new();
        queue.push(ModeEvent::PlayerDefeated);
        queue.clear();
        assert!(queue.take().is_empty());
    }
}
