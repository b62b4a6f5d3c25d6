//=========================================================================
// Summer's Festival
//=========================================================================
//
// Demo application: a start menu, an intro cutscene, a game stage and a
// loss screen wired through the runtime with log-backed services.
//
// Controls:
//   Start     Enter / click "PLAY"
//   Cutscene  Space or Enter to skip, ends by itself otherwise
//   Game      Escape gives up, G finishes the stage
//   Lose      Enter / click to return to the menu
//   Anywhere  Shift+Ctrl+Alt+I toggles the inspector
//
// Run with `RUST_LOG=info` to follow the transitions.
//
//=========================================================================

use festival_runtime::prelude::*;
use log::info;

/// Frames the intro cutscene plays before finishing on its own.
const CUTSCENE_FRAMES: u64 = 300;

//=== Scenes ==============================================================

struct FestivalScenes;

impl SceneFactory for FestivalScenes {
    fn build(&self, request: &LoadRequest) -> Result<SceneResourceSet, LoadError> {
        let camera = Camera::new("camera1");

        let scene = match request.mode {
            Mode::Start => SceneResourceSet::new(Mode::Start, camera)
                .with_sound(SoundHandle::new("startSong").volume(0.25).looping().autoplay())
                .with_sound(SoundHandle::new("selection"))
                .on_tick(|ctx| {
                    if confirm_pressed(ctx) {
                        ctx.play_sound("selection");
                        ctx.emit(ModeEvent::StartPressed);
                    }
                }),

            Mode::Cutscene => {
                let mut started_at = None;
                let mut finished = false;
                SceneResourceSet::new(Mode::Cutscene, camera.at([0.0, 2.0, -8.0]))
                    .with_light(LightHandle::new("lantern", 0.6))
                    .on_tick(move |ctx| {
                        if finished {
                            return;
                        }
                        let start = *started_at.get_or_insert(ctx.frame());
                        let skipped = ctx
                            .input()
                            .map_or(false, |input| input.is_key_pressed(KeyCode::Space))
                            || confirm_pressed(ctx);
                        if skipped || ctx.frame() - start >= CUTSCENE_FRAMES {
                            ctx.emit(ModeEvent::CutsceneFinished);
                            finished = true;
                        }
                    })
            }

            Mode::Game => SceneResourceSet::new(Mode::Game, camera.at([0.0, 12.0, -20.0]))
                .with_light(LightHandle::new("sparklight", 1.0))
                .with_sound(SoundHandle::new("gameSong").volume(0.1).looping().autoplay())
                .on_tick(|ctx| {
                    let Some(input) = ctx.input() else { return };
                    if input.is_key_pressed(KeyCode::Escape) {
                        ctx.emit(ModeEvent::PlayerDefeated);
                    } else if input.is_key_pressed(KeyCode::KeyG) {
                        ctx.emit(ModeEvent::GameCompleted);
                    }
                }),

            Mode::Lose => SceneResourceSet::new(Mode::Lose, camera)
                .with_sound(SoundHandle::new("loseSong").volume(0.25).autoplay())
                .on_tick(|ctx| {
                    if confirm_pressed(ctx) {
                        ctx.emit(ModeEvent::ReturnToMenu);
                    }
                }),
        };

        Ok(scene)
    }
}

fn confirm_pressed(ctx: &ModeContext<'_>) -> bool {
    ctx.input().map_or(false, |input| {
        input.is_key_pressed(KeyCode::Enter) || input.is_pointer_pressed(PointerButton::Primary)
    })
}

//=== UI ==================================================================

struct FestivalUi;

impl UiBuilder for FestivalUi {
    fn build_control_tree(&self, mode: Mode, variant: UiVariant) -> Result<UiHandle, LoadError> {
        let tree = match mode {
            Mode::Start => {
                let menu = UiHandle::new("UI", variant)
                    .with_control("titleContainer")
                    .with_control("title")
                    .with_control("start");
                match variant {
                    UiVariant::Mobile => menu.with_control("rotatePrompt"),
                    UiVariant::Desktop => menu,
                }
            }
            Mode::Cutscene => UiHandle::new("cutscene", variant).with_control("dialogue"),
            Mode::Game => UiHandle::new("hud", variant).with_control("sparklerLife"),
            Mode::Lose => UiHandle::new("lose", variant).with_control("mainMenu"),
        };
        Ok(tree)
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), EngineError> {
    env_logger::init();
    info!("Starting Summer's Festival");

    EngineBuilder::new(FestivalScenes, FestivalUi)
        .with_window_title("Summer's Festival")
        .with_platform_probe(|| cfg!(any(target_os = "android", target_os = "ios")))
        .build()?
        .init(|clock| {
            let mut shown = None;
            clock.subscribe("mode_banner", move |systems, frame| {
                let mode = systems.machine.mode();
                if shown != Some(mode) {
                    info!("Frame {}: now showing the {} screen", frame.index, mode);
                    shown = Some(mode);
                }
                Ok(())
            });
        })
        .run()
}

//=========================================================================
// Unit Tests
//=========================================================================
