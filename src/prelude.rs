//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports the types most applications need.
//
// Usage:
//   use festival_runtime::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::{PlatformError, WindowConfig};

// Frame clock and global state
pub use crate::core::clock::{FrameClock, FrameInfo};
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, PointerButton, StateTracker};

// Modes and transitions
pub use crate::core::fade::{FadeConfig, FadeState, FadeTransition};
pub use crate::core::mode::{Mode, ModeEvent};
pub use crate::core::state_machine::{PhaseKind, StateMachine, TransitionConflict, TriggerOutcome};

// Loading and scene resources
pub use crate::core::loader::{LoadDispatch, LoadError, LoadRequest, SceneFactory};
pub use crate::core::resources::{
    Camera, LightHandle, ModeContext, ModeHook, SceneResourceSet, SoundHandle, UiHandle, UiVariant,
};

// External services
pub use crate::core::services::{
    AudioService, FrameView, LoadingIndicator, RenderFault, Renderer, UiBuilder,
};
