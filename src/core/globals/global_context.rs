//=========================================================================
// Global Context
//=========================================================================
//
// Shared per-frame data read by the frame clock subscribers.
//
// Contains:
// - input_state: held/pressed keys and pointer buttons for this frame
// - frame_events: input batches delivered by the platform for this frame
// - inspector_visible: debug inspector toggle state
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, StateTracker};

//=== GlobalContext =======================================================

/// Data shared by the systems ticked on the core thread.
#[derive(Debug, Default)]
pub struct GlobalContext {
    /// Input state for the current frame.
    ///
    /// Mode hooks only see it while the state machine's input gate is
    /// open; window-global shortcuts read it directly.
    pub input_state: StateTracker,

    /// Whether the debug inspector is currently shown.
    pub inspector_visible: bool,

    /// Input batches for the current frame, filled by the core loop and
    /// drained by the `input` subscriber.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,
}

impl GlobalContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts a new input frame from the batches queued for it.
    pub(crate) fn begin_input_frame(&mut self) {
        self.input_state.begin_frame();
        for batch in self.frame_events.drain(..) {
            self.input_state.process_events(&batch);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
