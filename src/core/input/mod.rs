//=========================================================================
// Input
//
// Platform-independent input events and the per-frame state tracker that
// mode hooks query.
//
// Notes:
// Whether a hook sees input at all is decided by the state machine's
// input gate, not here.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, PointerButton};
pub use state_tracker::StateTracker;
