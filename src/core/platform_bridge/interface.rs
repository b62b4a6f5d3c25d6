//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core events and platform errors.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform thread to the core thread.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// One rendered frame, with the input gathered since the previous one.
    ///
    /// Sent on every redraw even when both batches are empty: each frame
    /// is one frame clock tick.
    Frame {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}
