//=========================================================================
// Engine
//=========================================================================
//
// Application entry point: configures, boots and runs the runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_fade()             ├─ init(): extra frame subscribers
//         ├─ with_load_dispatch()    └─ run(): spawns core thread,
//         ├─ with_renderer() ...               runs platform on main thread,
//         └─ with_channel_capacity()           joins core thread
// ```
//
// `build()` boots the state machine, so a failing Start load is reported
// before any window opens.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::clock::FrameClock;
use crate::core::fade::FadeConfig;
use crate::core::globals::GlobalSystems;
use crate::core::loader::{LoadDispatch, LoadError, ModeLoader, SceneFactory};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::services::{
    AudioService, LoadingIndicator, LogAudio, LogIndicator, LogRenderer, RenderFault, Renderer,
    Services, UiBuilder,
};
use crate::core::state_machine::{MachineConfig, StateMachine, DEFAULT_STALL_WARNING_TICKS};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::{Platform, WindowConfig};

//=== EngineError =========================================================

/// Reasons the runtime could not start or stopped abnormally.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("initial mode could not be loaded")]
    Boot(#[from] LoadError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("core thread stopped")]
    Render(#[from] RenderFault),

    #[error("core thread could not be spawned")]
    CoreThreadSpawn(#[source] std::io::Error),

    #[error("core thread panicked")]
    CoreThreadPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Channel capacity**: 128 frames
/// - **Fade**: start level 1.0, decrement 0.05 per tick
/// - **Load dispatch**: [`LoadDispatch::Worker`]
/// - **Stall warning**: 600 ticks
/// - **Window**: "Festival", 800x600
/// - **Services**: log-backed renderer, audio and loading indicator
///
/// # Examples
///
/// ```no_run
/// use festival_runtime::prelude::*;
///
/// struct Menus;
///
/// impl UiBuilder for Menus {
///     fn build_control_tree(&self, mode: Mode, variant: UiVariant) -> Result<UiHandle, LoadError> {
///         Ok(UiHandle::new(mode.name(), variant))
///     }
/// }
///
/// let scenes = |request: &LoadRequest| -> Result<SceneResourceSet, LoadError> {
///     Ok(SceneResourceSet::new(request.mode, Camera::new("main")))
/// };
///
/// EngineBuilder::new(scenes, Menus)
///     .with_fade(1.0, 0.1)
///     .build()?
///     .run()?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    factory: Arc<dyn SceneFactory>,
    ui: Arc<dyn UiBuilder>,
    channel_capacity: usize,
    fade: FadeConfig,
    dispatch: LoadDispatch,
    stall_warning_ticks: u32,
    window: WindowConfig,
    platform_probe: Option<Box<dyn Fn() -> bool + Send + Sync>>,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioService>,
    indicator: Box<dyn LoadingIndicator>,
}

impl EngineBuilder {
    /// Creates a builder with default settings around the two mandatory
    /// collaborators.
    pub fn new(factory: impl SceneFactory + 'static, ui: impl UiBuilder + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            ui: Arc::new(ui),
            channel_capacity: 128,
            fade: FadeConfig::default(),
            dispatch: LoadDispatch::default(),
            stall_warning_ticks: DEFAULT_STALL_WARNING_TICKS,
            window: WindowConfig::default(),
            platform_probe: None,
            renderer: Box::new(LogRenderer),
            audio: Box::new(LogAudio),
            indicator: Box::new(LogIndicator),
        }
    }

    /// Sets the channel capacity for platform → core frames.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the fade start level and per-tick decrement.
    ///
    /// # Panics
    ///
    /// Panics if `start_level` is outside `[0.0, 1.0]` or `decrement <= 0.0`.
    pub fn with_fade(mut self, start_level: f32, decrement: f32) -> Self {
        self.fade = FadeConfig::new(start_level, decrement);
        self
    }

    pub fn with_load_dispatch(mut self, dispatch: LoadDispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Ticks a load may stay pending before a warning is logged.
    ///
    /// # Panics
    ///
    /// Panics if `ticks == 0`.
    pub fn with_stall_warning_ticks(mut self, ticks: u32) -> Self {
        assert!(ticks > 0, "Stall warning threshold must be positive");
        self.stall_warning_ticks = ticks;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive");
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioService + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_loading_indicator(mut self, indicator: impl LoadingIndicator + 'static) -> Self {
        self.indicator = Box::new(indicator);
        self
    }

    /// Sets the "is this a mobile device" predicate used to pick the UI
    /// variant at the first Start load.
    pub fn with_platform_probe<P>(mut self, probe: P) -> Self
    where
        P: Fn() -> bool + Send + Sync + 'static,
    {
        self.platform_probe = Some(Box::new(probe));
        self
    }

    /// Boots the state machine into Start mode and builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Boot`] if the Start mode cannot be loaded.
    pub fn build(self) -> Result<Engine, EngineError> {
        info!(
            "Building engine (channel: {}, fade: {} - {}/tick, dispatch: {:?})",
            self.channel_capacity,
            self.fade.start_level(),
            self.fade.decrement(),
            self.dispatch
        );

        let mut loader = ModeLoader::from_shared(self.factory, self.ui).with_dispatch(self.dispatch);
        if let Some(probe) = self.platform_probe {
            loader = loader.with_platform_probe(probe);
        }

        let services = Services {
            renderer: self.renderer,
            audio: self.audio,
            indicator: self.indicator,
        };
        let config = MachineConfig {
            fade: self.fade,
            stall_warning_ticks: self.stall_warning_ticks,
        };
        let machine = StateMachine::boot(loader, services, config)?;

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(machine),
            channel_capacity: self.channel_capacity,
            window: self.window,
        })
    }
}

//=== Engine ==============================================================

/// Booted runtime, ready to run.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator ("core" thread, one tick per frame)
///   │     └─► FrameClock → StateMachine → Renderer
///   │
///   └─► Platform (Winit event loop)
///         └─► Window, input, frame pacing
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    channel_capacity: usize,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Registers application frame subscribers before running.
    ///
    /// They run after the built-in input, inspector and state machine
    /// subscribers, in registration order.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut FrameClock<GlobalSystems>),
    {
        info!("Initializing frame subscribers");
        self.orchestrator.init_clock(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Runs the platform on the calling (main) thread until the window
    /// closes, then joins the core thread.
    ///
    /// # Errors
    ///
    /// Returns the first of: core thread spawn failure, platform failure,
    /// a render fault that stopped the core thread, or a core thread panic.
    pub fn run(self) -> Result<(), EngineError> {
        info!(
            "Starting runtime in {} mode",
            self.orchestrator.systems().machine.mode()
        );

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core thread -------------------------------------
        let core_handle = self
            .orchestrator
            .spawn_core_thread(rx)
            .map_err(EngineError::CoreThreadSpawn)?;

        //--- 3. Run the platform (blocks) ---------------------------------
        let platform_result = Platform::new(tx, self.window).run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 4. Join the core thread --------------------------------------
        let core_result = match core_handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!("Core thread panicked");
                return Err(EngineError::CoreThreadPanicked);
            }
        };

        platform_result?;
        core_result?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mode::Mode;
    use crate::core::state_machine::PhaseKind;
    use crate::core::testing::{Recorders, ScriptedFactory, StaticUi};

    fn builder() -> EngineBuilder {
        EngineBuilder::new(ScriptedFactory::default(), StaticUi)
    }

    #[test]
    fn builder_defaults() {
        let builder = builder();
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.fade, FadeConfig::default());
        assert_eq!(builder.dispatch, LoadDispatch::Worker);
        assert_eq!(builder.stall_warning_ticks, 600);
        assert_eq!((builder.window.width, builder.window.height), (800, 600));
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = builder().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        builder().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Fade decrement must be positive")]
    fn builder_with_fade_panics_on_zero_decrement() {
        builder().with_fade(1.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "Stall warning threshold must be positive")]
    fn builder_with_stall_warning_panics_on_zero() {
        builder().with_stall_warning_ticks(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = builder()
            .with_fade(0.5, 0.25)
            .with_load_dispatch(LoadDispatch::Inline)
            .with_window_title("Test")
            .with_window_size(320, 240);

        assert_eq!(builder.fade.total_ticks(), 2);
        assert_eq!(builder.dispatch, LoadDispatch::Inline);
        assert_eq!(builder.window.title, "Test");
        assert_eq!((builder.window.width, builder.window.height), (320, 240));
    }

    #[test]
    fn build_boots_into_start_mode() {
        let recorders = Recorders::default();
        let factory = ScriptedFactory::default();

        let engine = EngineBuilder::new(factory.clone(), StaticUi)
            .with_renderer(recorders.renderer.clone())
            .with_audio(recorders.audio.clone())
            .with_loading_indicator(recorders.indicator.clone())
            .build()
            .unwrap();

        let machine = &engine.orchestrator.systems().machine;
        assert_eq!(machine.mode(), Mode::Start);
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert_eq!(factory.calls(), [Mode::Start]);
        assert_eq!(recorders.audio.calls(), ["play:startSong"]);
        assert!(!recorders.indicator.is_visible());
    }

    #[test]
    fn build_fails_when_start_cannot_load() {
        let factory = ScriptedFactory::default();
        factory.fail(Mode::Start);

        let result = EngineBuilder::new(factory, StaticUi).build();

        assert!(matches!(result, Err(EngineError::Boot(LoadError::MissingAsset { .. }))));
    }

    #[test]
    fn build_uses_platform_probe() {
        let engine = builder()
            .with_load_dispatch(LoadDispatch::Inline)
            .with_platform_probe(|| true)
            .build()
            .unwrap();

        let scene = engine.orchestrator.systems().machine.active_scene();
        assert_eq!(
            scene.ui().map(|ui| ui.variant),
            Some(crate::core::resources::UiVariant::Mobile)
        );
    }

    #[test]
    fn init_adds_subscribers() {
        let mut names = Vec::new();
        let _engine = builder().build().unwrap().init(|clock| {
            clock.subscribe("app", |_, _| Ok(()));
            names = clock.subscriber_names().collect::<Vec<_>>();
        });

        assert_eq!(names, ["input", "inspector", "state_machine", "app"]);
    }
}
