//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the platform layer (winit event loop, main thread) and
// the core thread.
//
// Components:
// - `interface`: event and error types crossing the thread boundary
// - `event_collector`: core-side frame reception
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;

//=== Public API ==========================================================

pub use interface::PlatformError;
