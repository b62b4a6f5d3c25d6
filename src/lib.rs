//=========================================================================
// Festival Runtime - Library Root
//=========================================================================
//
// Top-level runtime controller for a frame-driven application that moves
// between four presentation modes (start menu, cutscene, game, loss
// screen), fading between them and loading each mode's scene off the
// frame thread.
//
// Typical usage:
// ```no_run
// use festival_runtime::prelude::*;
//
// # fn scenes(r: &LoadRequest) -> Result<SceneResourceSet, LoadError> {
// #     Ok(SceneResourceSet::new(r.mode, Camera::new("main")))
// # }
// # struct Menus;
// # impl UiBuilder for Menus {
// #     fn build_control_tree(&self, m: Mode, v: UiVariant) -> Result<UiHandle, LoadError> {
// #         Ok(UiHandle::new(m.name(), v))
// #     }
// # }
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new(scenes, Menus).build()?.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the mode controller and everything ticked on the core
// thread. It is public so applications can implement the service traits
// and write mode hooks.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps Winit and stays private; `engine` wires both halves
// together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder, EngineError};
pub use platform::WindowConfig;
