//=========================================================================
// Mode Loader
//=========================================================================
//
// Produces the scene resource set of a mode, off the tick thread when
// configured to.
//
// Architecture:
// ```text
//   StateMachine ──request(mode)──▶ ModeLoader
//                                     │ Worker: thread "mode-loader-<mode>"
//                                     │ Inline: calling thread
//                                     ▼
//                     SceneFactory::build() + UiBuilder::build_control_tree()
//                                     │
//                          bounded(1) channel
//                                     ▼
//   StateMachine ◀──poll()── PendingLoad
// ```
//
// A pending load is only ever observed from the tick thread. The worker
// hands back a finished set or an error, never a partial set.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::mode::Mode;
use crate::core::resources::{SceneResourceSet, UiVariant};
use crate::core::services::UiBuilder;

//=== LoadError ===========================================================

/// Reasons a mode load can fail. None of them are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("asset '{asset}' for {mode} mode is unavailable")]
    MissingAsset { mode: Mode, asset: String },

    #[error("asset '{asset}' for {mode} mode is corrupt: {reason}")]
    CorruptAsset {
        mode: Mode,
        asset: String,
        reason: String,
    },

    #[error("control tree for {mode} mode could not be built: {reason}")]
    Ui { mode: Mode, reason: String },

    #[error("scene factory returned a {produced} scene for a {requested} request")]
    ModeMismatch { requested: Mode, produced: Mode },

    #[error("loader worker for {mode} mode could not be spawned")]
    WorkerSpawn {
        mode: Mode,
        #[source]
        source: std::io::Error,
    },

    #[error("loader worker for {mode} mode exited without a result")]
    WorkerLost { mode: Mode },
}

//=== SceneFactory ========================================================

/// What a factory needs to know to build one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub mode: Mode,
    pub ui_variant: UiVariant,
}

/// Builds camera, lights, sounds and hooks for a mode.
///
/// May run on a loader worker, hence `Send + Sync`.
pub trait SceneFactory: Send + Sync {
    fn build(&self, request: &LoadRequest) -> Result<SceneResourceSet, LoadError>;
}

impl<F> SceneFactory for F
where
    F: Fn(&LoadRequest) -> Result<SceneResourceSet, LoadError> + Send + Sync,
{
    fn build(&self, request: &LoadRequest) -> Result<SceneResourceSet, LoadError> {
        self(request)
    }
}

//=== LoadDispatch ========================================================

/// Where a load runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadDispatch {
    /// On the calling thread; the returned load is already resolved.
    Inline,

    /// On a dedicated background thread per request.
    #[default]
    Worker,
}

//=== PendingLoad =========================================================

/// Result of polling a [`PendingLoad`].
#[derive(Debug)]
pub enum LoadPoll {
    Pending,
    Ready(Result<SceneResourceSet, LoadError>),
}

/// Handle to an in-flight mode load.
#[derive(Debug)]
pub struct PendingLoad {
    mode: Mode,
    receiver: Receiver<Result<SceneResourceSet, LoadError>>,
}

impl PendingLoad {
    fn resolved(mode: Mode, result: Result<SceneResourceSet, LoadError>) -> Self {
        let (sender, receiver) = bounded(1);
        // Capacity 1 and the receiver is alive, so this cannot fail.
        let _ = sender.send(result);
        Self { mode, receiver }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Checks for a result without blocking.
    pub fn poll(&self) -> LoadPoll {
        match self.receiver.try_recv() {
            Ok(result) => LoadPoll::Ready(result),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                LoadPoll::Ready(Err(LoadError::WorkerLost { mode: self.mode }))
            }
        }
    }

    /// Blocks until the load resolves.
    pub fn wait(self) -> Result<SceneResourceSet, LoadError> {
        self.receiver
            .recv()
            .unwrap_or(Err(LoadError::WorkerLost { mode: self.mode }))
    }
}

//=== ModeLoader ==========================================================

type PlatformProbe = Arc<dyn Fn() -> bool + Send + Sync>;

/// Dispatches mode loads and composes factory output with the UI tree.
pub struct ModeLoader {
    factory: Arc<dyn SceneFactory>,
    ui: Arc<dyn UiBuilder>,
    dispatch: LoadDispatch,
    probe: PlatformProbe,
    ui_variant: Option<UiVariant>,
    requests: u64,
}

impl ModeLoader {
    //--- Construction -----------------------------------------------------

    pub fn new(factory: impl SceneFactory + 'static, ui: impl UiBuilder + 'static) -> Self {
        Self::from_shared(Arc::new(factory), Arc::new(ui))
    }

    /// Creates a loader around already shared collaborators.
    pub fn from_shared(factory: Arc<dyn SceneFactory>, ui: Arc<dyn UiBuilder>) -> Self {
        Self {
            factory,
            ui,
            dispatch: LoadDispatch::default(),
            probe: Arc::new(|| false),
            ui_variant: None,
            requests: 0,
        }
    }

    pub fn with_dispatch(mut self, dispatch: LoadDispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Sets the "is this a mobile device" predicate.
    ///
    /// Evaluated once, at the first Start-mode load.
    pub fn with_platform_probe<P>(mut self, probe: P) -> Self
    where
        P: Fn() -> bool + Send + Sync + 'static,
    {
        self.probe = Arc::new(probe);
        self
    }

    //--- Requests ---------------------------------------------------------

    /// Starts loading `mode` and returns a handle to poll.
    pub fn request(&mut self, mode: Mode) -> PendingLoad {
        self.requests += 1;

        let request = LoadRequest {
            mode,
            ui_variant: self.ui_variant_for(mode),
        };
        info!("Loading {} mode ({:?}, {:?} UI)", mode, self.dispatch, request.ui_variant);

        match self.dispatch {
            LoadDispatch::Inline => {
                PendingLoad::resolved(mode, build_scene(&*self.factory, &*self.ui, &request))
            }
            LoadDispatch::Worker => self.spawn_worker(request),
        }
    }

    /// Total loads requested so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn dispatch(&self) -> LoadDispatch {
        self.dispatch
    }

    /// UI variant chosen by the probe, once a Start load has happened.
    pub fn ui_variant(&self) -> Option<UiVariant> {
        self.ui_variant
    }

    //--- Internal Helpers -------------------------------------------------

    fn ui_variant_for(&mut self, mode: Mode) -> UiVariant {
        if let Some(variant) = self.ui_variant {
            return variant;
        }
        if mode != Mode::Start {
            return UiVariant::Desktop;
        }

        let variant = if (self.probe)() {
            UiVariant::Mobile
        } else {
            UiVariant::Desktop
        };
        debug!("Platform probe selected {:?} UI", variant);
        self.ui_variant = Some(variant);
        variant
    }

    fn spawn_worker(&self, request: LoadRequest) -> PendingLoad {
        let mode = request.mode;
        let (sender, receiver) = bounded(1);
        let factory = Arc::clone(&self.factory);
        let ui = Arc::clone(&self.ui);

        let spawned = thread::Builder::new()
            .name(format!("mode-loader-{}", mode))
            .spawn(move || {
                let result = build_scene(&*factory, &*ui, &request);
                if sender.send(result).is_err() {
                    warn!("Load of {} mode finished after its handle was dropped", mode);
                }
            });

        match spawned {
            Ok(_) => PendingLoad { mode, receiver },
            Err(source) => PendingLoad::resolved(mode, Err(LoadError::WorkerSpawn { mode, source })),
        }
    }
}

fn build_scene(
    factory: &dyn SceneFactory,
    ui: &dyn UiBuilder,
    request: &LoadRequest,
) -> Result<SceneResourceSet, LoadError> {
    let mut scene = factory.build(request)?;

    if scene.mode() != request.mode {
        return Err(LoadError::ModeMismatch {
            requested: request.mode,
            produced: scene.mode(),
        });
    }

    let tree = ui.build_control_tree(request.mode, request.ui_variant)?;
    scene.attach_ui(tree);
    Ok(scene)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::core::resources::Camera;
    use crate::core::testing::{ScriptedFactory, StaticUi};

    #[test]
    fn inline_load_is_ready_immediately() {
        let factory = ScriptedFactory::default();
        let mut loader = ModeLoader::new(factory.clone(), StaticUi).with_dispatch(LoadDispatch::Inline);

        let pending = loader.request(Mode::Game);

        match pending.poll() {
            LoadPoll::Ready(Ok(scene)) => {
                assert_eq!(scene.mode(), Mode::Game);
                assert_eq!(scene.ui().map(|ui| ui.name.as_str()), Some("game-ui"));
            }
            other => panic!("Expected ready scene, got {:?}", other),
        }
        assert_eq!(factory.calls(), [Mode::Game]);
        assert_eq!(loader.requests(), 1);
    }

    #[test]
    fn worker_load_delivers_scene() {
        let factory = ScriptedFactory::default();
        let mut loader = ModeLoader::new(factory.clone(), StaticUi);

        let scene = loader.request(Mode::Cutscene).wait().unwrap();

        assert_eq!(scene.mode(), Mode::Cutscene);
        assert_eq!(factory.calls(), [Mode::Cutscene]);
    }

    #[test]
    fn worker_load_is_pending_until_factory_returns() {
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
        let factory = move |request: &LoadRequest| -> Result<SceneResourceSet, LoadError> {
            let _ = release_rx.recv();
            Ok(SceneResourceSet::new(request.mode, Camera::new("camera")))
        };
        let mut loader = ModeLoader::new(factory, StaticUi);

        let pending = loader.request(Mode::Lose);
        assert!(matches!(pending.poll(), LoadPoll::Pending));

        release_tx.send(()).unwrap();
        let scene = loop {
            match pending.poll() {
                LoadPoll::Pending => std::thread::sleep(Duration::from_millis(1)),
                LoadPoll::Ready(result) => break result.unwrap(),
            }
        };
        assert_eq!(scene.mode(), Mode::Lose);
    }

    #[test]
    fn factory_failure_is_reported() {
        let factory = ScriptedFactory::default();
        factory.fail(Mode::Game);
        let mut loader = ModeLoader::new(factory, StaticUi).with_dispatch(LoadDispatch::Inline);

        let error = loader.request(Mode::Game).wait().unwrap_err();

        assert!(matches!(error, LoadError::MissingAsset { mode: Mode::Game, .. }));
    }

    #[test]
    fn panicking_worker_reports_lost_worker() {
        let factory = |_: &LoadRequest| -> Result<SceneResourceSet, LoadError> {
            panic!("factory exploded");
        };
        let mut loader = ModeLoader::new(factory, StaticUi);

        let error = loader.request(Mode::Start).wait().unwrap_err();

        assert!(matches!(error, LoadError::WorkerLost { mode: Mode::Start }));
    }

    #[test]
    fn wrong_mode_from_factory_is_rejected() {
        let factory = |_: &LoadRequest| -> Result<SceneResourceSet, LoadError> {
            Ok(SceneResourceSet::new(Mode::Lose, Camera::new("camera")))
        };
        let mut loader = ModeLoader::new(factory, StaticUi).with_dispatch(LoadDispatch::Inline);

        let error = loader.request(Mode::Game).wait().unwrap_err();

        assert!(matches!(
            error,
            LoadError::ModeMismatch { requested: Mode::Game, produced: Mode::Lose }
        ));
    }

    #[test]
    fn platform_probe_runs_once_at_first_start_load() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&probes);
        let mut loader = ModeLoader::new(ScriptedFactory::default(), StaticUi)
            .with_dispatch(LoadDispatch::Inline)
            .with_platform_probe(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });

        let game = loader.request(Mode::Game).wait().unwrap();
        assert_eq!(probes.load(Ordering::SeqCst), 0);
        assert_eq!(game.ui().unwrap().variant, UiVariant::Desktop);

        let start = loader.request(Mode::Start).wait().unwrap();
        let again = loader.request(Mode::Start).wait().unwrap();
        let lose = loader.request(Mode::Lose).wait().unwrap();

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert_eq!(start.ui().unwrap().variant, UiVariant::Mobile);
        assert_eq!(again.ui().unwrap().variant, UiVariant::Mobile);
        assert_eq!(lose.ui().unwrap().variant, UiVariant::Mobile);
        assert_eq!(loader.ui_variant(), Some(UiVariant::Mobile));
    }

    #[test]
    fn load_error_messages_name_the_mode() {
        let error = LoadError::MissingAsset {
            mode: Mode::Cutscene,
            asset: "sprites/cutscene/dialog.png".into(),
        };
        assert_eq!(
            error.to_string(),
            "asset 'sprites/cutscene/dialog.png' for cutscene mode is unavailable"
        );
    }
}
