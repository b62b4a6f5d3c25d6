//=========================================================================
// Test Doubles
//=========================================================================
//
// Recording fakes for the external services, shared by the unit tests of
// the core modules. Each fake keeps its log behind an `Arc<Mutex<_>>` so a
// clone can be handed to the state machine while the test keeps another to
// inspect afterwards.
//
//=========================================================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::core::loader::{LoadError, LoadRequest, SceneFactory};
use crate::core::mode::Mode;
use crate::core::resources::{Camera, SceneResourceSet, SoundHandle, UiHandle, UiVariant};
use crate::core::services::{
    AudioService, FrameView, LoadingIndicator, RenderFault, Renderer, Services, UiBuilder,
};

//=== Audio ===============================================================

#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioService for RecordingAudio {
    fn play(&mut self, name: &str) {
        self.calls.lock().unwrap().push(format!("play:{}", name));
    }

    fn stop(&mut self, name: &str) {
        self.calls.lock().unwrap().push(format!("stop:{}", name));
    }
}

//=== Renderer ============================================================

/// What the renderer saw on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub frame: u64,
    pub mode: Mode,
    pub fade_level: Option<f32>,
    pub loading: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<RenderedFrame>>>,
    inspector: Arc<Mutex<Vec<bool>>>,
    fail_on: Arc<Mutex<Option<u64>>>,
}

impl RecordingRenderer {
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RenderedFrame> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn inspector_calls(&self) -> Vec<bool> {
        self.inspector.lock().unwrap().clone()
    }

    /// Makes `render_frame` fail on the given frame index.
    pub fn fail_on_frame(&self, frame: u64) {
        *self.fail_on.lock().unwrap() = Some(frame);
    }
}

impl Renderer for RecordingRenderer {
    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<(), RenderFault> {
        if *self.fail_on.lock().unwrap() == Some(view.frame) {
            return Err(RenderFault::new(format!("frame {} lost", view.frame)));
        }
        self.frames.lock().unwrap().push(RenderedFrame {
            frame: view.frame,
            mode: view.mode,
            fade_level: view.fade_level,
            loading: view.loading,
        });
        Ok(())
    }

    fn set_inspector_visible(&mut self, visible: bool) {
        self.inspector.lock().unwrap().push(visible);
    }
}

//=== Loading Indicator ===================================================

#[derive(Debug, Default, Clone)]
pub struct RecordingIndicator {
    visible: Arc<Mutex<bool>>,
    shows: Arc<Mutex<u32>>,
}

impl RecordingIndicator {
    pub fn is_visible(&self) -> bool {
        *self.visible.lock().unwrap()
    }

    pub fn show_count(&self) -> u32 {
        *self.shows.lock().unwrap()
    }
}

impl LoadingIndicator for RecordingIndicator {
    fn show(&mut self) {
        *self.visible.lock().unwrap() = true;
        *self.shows.lock().unwrap() += 1;
    }

    fn hide(&mut self) {
        *self.visible.lock().unwrap() = false;
    }
}

//=== Service Bundle ======================================================

/// Recording services plus handles to inspect them.
#[derive(Debug, Default, Clone)]
pub struct Recorders {
    pub renderer: RecordingRenderer,
    pub audio: RecordingAudio,
    pub indicator: RecordingIndicator,
}

impl Recorders {
    pub fn services(&self) -> Services {
        Services::new(
            self.renderer.clone(),
            self.audio.clone(),
            self.indicator.clone(),
        )
    }
}

//=== Scene Factory =======================================================

/// Factory producing one sound per mode (`<mode>Song`, autoplay) and
/// failing for modes marked with [`ScriptedFactory::fail`].
#[derive(Debug, Default, Clone)]
pub struct ScriptedFactory {
    calls: Arc<Mutex<Vec<Mode>>>,
    failing: Arc<Mutex<HashSet<Mode>>>,
}

impl ScriptedFactory {
    pub fn calls(&self) -> Vec<Mode> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self, mode: Mode) {
        self.failing.lock().unwrap().insert(mode);
    }

    pub fn recover(&self, mode: Mode) {
        self.failing.lock().unwrap().remove(&mode);
    }
}

impl SceneFactory for ScriptedFactory {
    fn build(&self, request: &LoadRequest) -> Result<SceneResourceSet, LoadError> {
        self.calls.lock().unwrap().push(request.mode);

        if self.failing.lock().unwrap().contains(&request.mode) {
            return Err(LoadError::MissingAsset {
                mode: request.mode,
                asset: format!("models/{}.glb", request.mode),
            });
        }

        Ok(SceneResourceSet::new(request.mode, Camera::new(format!("{}-camera", request.mode)))
            .with_sound(SoundHandle::new(format!("{}Song", request.mode)).autoplay()))
    }
}

//=== UI Builder ==========================================================

/// Builds an empty `<mode>-ui` tree for every mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticUi;

impl UiBuilder for StaticUi {
    fn build_control_tree(&self, mode: Mode, variant: UiVariant) -> Result<UiHandle, LoadError> {
        Ok(UiHandle::new(format!("{}-ui", mode), variant))
    }
}
