//=========================================================================
// Scene Resources
//=========================================================================
//
// The bundle of camera, lights, sounds, UI and per-mode hooks needed to
// render one mode.
//
// Lifecycle:
// ```text
//   SceneFactory::build() ──▶ loader attaches UI ──▶ activate()
//        (any thread)                                 (tick thread)
//                                                        │
//                         run_hooks() each tick ◀────────┤
//                                                        ▼
//                                                   release()
// ```
//
// Sets are handed from loader workers to the tick thread whole, so every
// field is `Send`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::event_queue::EventQueue;
use crate::core::input::StateTracker;
use crate::core::mode::{Mode, ModeEvent};
use crate::core::services::AudioService;

//=== Handles =============================================================

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a scene resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Camera placement for a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Camera {
    /// Camera at the origin looking at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            target: [0.0; 3],
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: [f32; 3]) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightHandle {
    pub name: String,
    pub intensity: f32,
}

impl LightHandle {
    pub fn new(name: impl Into<String>, intensity: f32) -> Self {
        Self {
            name: name.into(),
            intensity,
        }
    }
}

/// Named sound owned by a scene.
///
/// `autoplay` sounds start when the scene becomes active. Every sound is
/// stopped when the scene is released.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundHandle {
    pub name: String,
    pub volume: f32,
    pub looping: bool,
    pub autoplay: bool,
}

impl SoundHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: 1.0,
            looping: false,
            autoplay: false,
        }
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn autoplay(mut self) -> Self {
        self.autoplay = true;
        self
    }
}

/// Layout family chosen once from the platform probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UiVariant {
    #[default]
    Desktop,
    Mobile,
}

/// Opaque control tree produced by the UI builder.
#[derive(Debug, Clone, PartialEq)]
pub struct UiHandle {
    pub name: String,
    pub variant: UiVariant,
    pub controls: Vec<String>,
}

impl UiHandle {
    pub fn new(name: impl Into<String>, variant: UiVariant) -> Self {
        Self {
            name: name.into(),
            variant,
            controls: Vec::new(),
        }
    }

    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.controls.push(control.into());
        self
    }
}

//=== Mode Hooks ==========================================================

/// Per-tick behavior registered by a mode while its scene is active.
///
/// Hooks turn input (or elapsed frames) into [`ModeEvent`]s, e.g. emitting
/// `StartPressed` when the play control is activated.
pub trait ModeHook: Send {
    fn on_tick(&mut self, ctx: &mut ModeContext<'_>);
}

struct FnHook<F>(F);

impl<F> ModeHook for FnHook<F>
where
    F: FnMut(&mut ModeContext<'_>) + Send,
{
    fn on_tick(&mut self, ctx: &mut ModeContext<'_>) {
        (self.0)(ctx)
    }
}

/// View of the runtime handed to mode hooks.
pub struct ModeContext<'a> {
    mode: Mode,
    frame: u64,
    input: Option<&'a StateTracker>,
    events: &'a mut EventQueue,
    audio: &'a mut dyn AudioService,
}

impl<'a> ModeContext<'a> {
    pub(crate) fn new(
        mode: Mode,
        frame: u64,
        input: Option<&'a StateTracker>,
        events: &'a mut EventQueue,
        audio: &'a mut dyn AudioService,
    ) -> Self {
        Self {
            mode,
            frame,
            input,
            events,
            audio,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Input for this frame, or `None` while the input gate is closed.
    pub fn input(&self) -> Option<&StateTracker> {
        self.input
    }

    /// Requests a mode change at the end of this tick.
    pub fn emit(&mut self, event: ModeEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name);
    }

    pub fn stop_sound(&mut self, name: &str) {
        self.audio.stop(name);
    }
}

//=== SceneResourceSet ====================================================

/// Everything needed to render and drive one mode.
pub struct SceneResourceSet {
    id: SceneId,
    mode: Mode,
    camera: Camera,
    lights: Vec<LightHandle>,
    sounds: Vec<SoundHandle>,
    ui: Option<UiHandle>,
    hooks: Vec<Box<dyn ModeHook>>,
    input_enabled: bool,
}

impl SceneResourceSet {
    //--- Construction -----------------------------------------------------

    /// Creates a set for `mode`. Input stays disabled until activation.
    pub fn new(mode: Mode, camera: Camera) -> Self {
        Self {
            id: SceneId::next(),
            mode,
            camera,
            lights: Vec::new(),
            sounds: Vec::new(),
            ui: None,
            hooks: Vec::new(),
            input_enabled: false,
        }
    }

    pub fn with_light(mut self, light: LightHandle) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_sound(mut self, sound: SoundHandle) -> Self {
        self.sounds.push(sound);
        self
    }

    pub fn with_hook(mut self, hook: impl ModeHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Registers a closure as a per-tick hook.
    pub fn on_tick<F>(self, hook: F) -> Self
    where
        F: FnMut(&mut ModeContext<'_>) + Send + 'static,
    {
        self.with_hook(FnHook(hook))
    }

    pub(crate) fn attach_ui(&mut self, ui: UiHandle) {
        self.ui = Some(ui);
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[LightHandle] {
        &self.lights
    }

    pub fn sounds(&self) -> &[SoundHandle] {
        &self.sounds
    }

    pub fn ui(&self) -> Option<&UiHandle> {
        self.ui.as_ref()
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    //--- Lifecycle --------------------------------------------------------

    pub(crate) fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    /// Makes the set live: starts autoplay sounds and accepts input.
    pub(crate) fn activate(&mut self, audio: &mut dyn AudioService) {
        for sound in self.sounds.iter().filter(|s| s.autoplay) {
            audio.play(&sound.name);
        }
        self.input_enabled = true;
        debug!("Scene {:?} ({}) activated", self.id, self.mode);
    }

    pub(crate) fn run_hooks(&mut self, ctx: &mut ModeContext<'_>) {
        for hook in &mut self.hooks {
            hook.on_tick(ctx);
        }
    }

    /// Discards the set, stopping every sound it owns.
    pub(crate) fn release(mut self, audio: &mut dyn AudioService) {
        self.input_enabled = false;
        for sound in &self.sounds {
            audio.stop(&sound.name);
        }
        debug!("Scene {:?} ({}) released", self.id, self.mode);
    }
}

impl fmt::Debug for SceneResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneResourceSet")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("camera", &self.camera)
            .field("lights", &self.lights)
            .field("sounds", &self.sounds)
            .field("ui", &self.ui)
            .field("hooks", &self.hooks.len())
            .field("input_enabled", &self.input_enabled)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
