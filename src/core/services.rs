//=========================================================================
// External Services
//=========================================================================
//
// Narrow interfaces to the collaborators the controller drives but does
// not implement: the renderer, the audio device, the loading indicator
// and the UI builder.
//
// All services are owned by the tick thread except `UiBuilder`, which is
// shared with loader workers and therefore `Sync`.
//
// The `Log*` implementations only emit log records. They are the engine's
// defaults so a runtime can be brought up before real backends exist.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, trace};

//=== Internal Dependencies ===============================================

use crate::core::loader::LoadError;
use crate::core::mode::Mode;
use crate::core::resources::{SceneResourceSet, UiHandle, UiVariant};

//=== RenderFault =========================================================

/// Failure reported by the external renderer.
///
/// Never handled by the controller; it travels unchanged to the caller of
/// the frame tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("render failed: {message}")]
pub struct RenderFault {
    message: String,
}

impl RenderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

//=== FrameView ===========================================================

/// Everything the renderer needs to draw one frame.
#[derive(Debug)]
pub struct FrameView<'a> {
    /// Mode currently on screen.
    pub mode: Mode,

    /// The single active scene resource set.
    pub scene: &'a SceneResourceSet,

    /// Fade overlay multiplier, `None` when no transition is under way.
    pub fade_level: Option<f32>,

    /// Whether a mode load is pending or stalled.
    pub loading: bool,

    /// Frame counter from the frame clock.
    pub frame: u64,
}

//=== Service Traits ======================================================

/// Draws the active scene once per frame.
pub trait Renderer: Send {
    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<(), RenderFault>;

    /// Shows or hides the debug inspector. Ignored by default.
    fn set_inspector_visible(&mut self, _visible: bool) {}
}

/// Fire-and-forget sound playback.
pub trait AudioService: Send {
    fn play(&mut self, name: &str);
    fn stop(&mut self, name: &str);
}

/// Blocking "loading" overlay shown while a mode is being built.
pub trait LoadingIndicator: Send {
    fn show(&mut self);
    fn hide(&mut self);
}

/// Builds the control tree of a mode. Invoked by the mode loader, possibly
/// from a worker thread.
pub trait UiBuilder: Send + Sync {
    fn build_control_tree(&self, mode: Mode, variant: UiVariant) -> Result<UiHandle, LoadError>;
}

//=== Services ============================================================

/// Bundle of tick-thread services owned by the state machine.
pub struct Services {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioService>,
    pub indicator: Box<dyn LoadingIndicator>,
}

impl Services {
    pub fn new(
        renderer: impl Renderer + 'static,
        audio: impl AudioService + 'static,
        indicator: impl LoadingIndicator + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            audio: Box::new(audio),
            indicator: Box::new(indicator),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(LogRenderer, LogAudio, LogIndicator)
    }
}

//=== Log-backed Defaults =================================================

/// Renderer that only traces what it would draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<(), RenderFault> {
        trace!(
            "frame {}: {} (scene {:?}, fade {:?}, loading {})",
            view.frame,
            view.mode,
            view.scene.id(),
            view.fade_level,
            view.loading
        );
        Ok(())
    }

    fn set_inspector_visible(&mut self, visible: bool) {
        info!("Inspector {}", if visible { "shown" } else { "hidden" });
    }
}

/// Audio service that logs playback requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioService for LogAudio {
    fn play(&mut self, name: &str) {
        info!("Playing sound '{}'", name);
    }

    fn stop(&mut self, name: &str) {
        info!("Stopping sound '{}'", name);
    }
}

/// Loading indicator that logs visibility changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogIndicator;

impl LoadingIndicator for LogIndicator {
    fn show(&mut self) {
        info!("Loading indicator shown");
    }

    fn hide(&mut self) {
        info!("Loading indicator hidden");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
