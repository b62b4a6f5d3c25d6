//=========================================================================
// Global Runtime State
//=========================================================================
//
// Separates per-frame data from the systems that act on it.
//
// Architecture:
//   GlobalContext: StateTracker + frame input batches + inspector flag
//   GlobalSystems: GlobalContext + StateMachine (frame clock context)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use global_systems::GlobalSystems;
