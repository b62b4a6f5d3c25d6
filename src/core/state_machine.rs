//=========================================================================
// State Machine
//=========================================================================
//
// Owns the current mode, the active scene resource set and the input gate,
// and sequences mode transitions.
//
// Transition phases:
// ```text
//             trigger()                fade completed           load ok
//   Idle ───────────────▶ Fading ───────────────────▶ Loading ──────────▶ Idle
//     ▲                      │                          │    (swap, gate open)
//     │                      └── trigger() ignored ─────┤
//     │                                                 │ load failed
//     └──────────────── trigger() (retry) ◀──────── Stalled
// ```
//
// Per-tick order:
//   1. run hooks of the active set (input only while the gate is open)
//   2. apply events the hooks emitted (dropped while stalled)
//   3. advance the fade; on completion dispatch the load
//   4. poll the pending load; swap on success, stall on failure
//   5. render the active set
//
// Notes:
// The gate closes in `trigger()` and reopens only when the new set has
// been activated, so no input reaches either set in between. A failed load
// leaves the old mode, old set and closed gate in place with the loading
// indicator still up. Hook events are dropped while stalled; only a call to
// `trigger()` or `handle_event()` from outside starts a new transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::mem;

use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::clock::FrameInfo;
use crate::core::event_queue::EventQueue;
use crate::core::fade::{FadeConfig, FadeStep, FadeTransition};
use crate::core::input::StateTracker;
use crate::core::loader::{LoadError, LoadPoll, ModeLoader, PendingLoad};
use crate::core::mode::{Mode, ModeEvent};
use crate::core::resources::{ModeContext, SceneResourceSet};
use crate::core::services::{FrameView, RenderFault, Services};

//=== Constants ===========================================================

/// Ticks a load may stay pending before a warning is logged.
pub const DEFAULT_STALL_WARNING_TICKS: u32 = 600;

//=== Configuration =======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineConfig {
    pub fade: FadeConfig,
    pub stall_warning_ticks: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            fade: FadeConfig::default(),
            stall_warning_ticks: DEFAULT_STALL_WARNING_TICKS,
        }
    }
}

//=== Trigger Outcomes ====================================================

/// A trigger that arrived while another transition was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConflict {
    pub requested: Mode,
    pub in_flight: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Gate closed and fade started.
    Started { from: Mode, to: Mode },

    /// Dropped; the in-flight transition continues unchanged.
    Ignored(TransitionConflict),

    /// The event has no edge out of the current mode.
    NoEdge { mode: Mode, event: ModeEvent },
}

//=== Phase ===============================================================

#[derive(Debug)]
enum Phase {
    Idle,
    Fading {
        target: Mode,
    },
    Loading {
        target: Mode,
        pending: PendingLoad,
        waited: u32,
    },
    Stalled {
        target: Mode,
        error: LoadError,
    },
}

/// Public view of where the machine is in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Fading,
    Loading,
    Stalled,
}

//=== MachineStats ========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineStats {
    pub transitions_started: u64,
    pub transitions_completed: u64,
    pub ignored_triggers: u64,
    pub load_failures: u64,
    pub last_conflict: Option<TransitionConflict>,
}

//=== StateMachine ========================================================

pub struct StateMachine {
    mode: Mode,
    active: SceneResourceSet,
    input_gate: bool,
    fade: FadeTransition,
    phase: Phase,
    loader: ModeLoader,
    services: Services,
    events: EventQueue,
    stats: MachineStats,
    stall_warning_ticks: u32,
}

impl StateMachine {
    //--- Construction -----------------------------------------------------

    /// Loads and activates the Start mode, blocking until it is ready.
    pub fn boot(
        mut loader: ModeLoader,
        mut services: Services,
        config: MachineConfig,
    ) -> Result<Self, LoadError> {
        info!("Booting into {} mode", Mode::Start);

        services.indicator.show();
        let mut active = loader.request(Mode::Start).wait().map_err(|error| {
            error!("Boot load failed: {}", error);
            error
        })?;
        active.activate(&mut *services.audio);
        services.indicator.hide();

        Ok(Self {
            mode: Mode::Start,
            active,
            input_gate: true,
            fade: FadeTransition::new(config.fade),
            phase: Phase::Idle,
            loader,
            services,
            events: EventQueue::new(),
            stats: MachineStats::default(),
            stall_warning_ticks: config.stall_warning_ticks,
        })
    }

    //--- Triggers ---------------------------------------------------------

    /// Starts a transition to `target`.
    ///
    /// Ignored while a fade is running or a load is pending. A stalled
    /// transition does not block a new trigger.
    pub fn trigger(&mut self, target: Mode) -> TriggerOutcome {
        if let Some(in_flight) = self.pending_target_in_flight() {
            let conflict = TransitionConflict {
                requested: target,
                in_flight,
            };
            self.stats.ignored_triggers += 1;
            self.stats.last_conflict = Some(conflict);
            debug!(
                "Ignoring trigger to {} mode: transition to {} in flight",
                target, in_flight
            );
            return TriggerOutcome::Ignored(conflict);
        }

        if let Phase::Stalled { target: stalled, .. } = &self.phase {
            info!("Abandoning stalled transition to {} mode", stalled);
        }

        let from = self.mode;
        self.input_gate = false;
        self.active.set_input_enabled(false);
        self.fade.start();
        self.phase = Phase::Fading { target };
        self.stats.transitions_started += 1;

        info!("Transition {} -> {} started", from, target);
        TriggerOutcome::Started { from, to: target }
    }

    /// Resolves `event` against the current mode and triggers its edge.
    pub fn handle_event(&mut self, event: ModeEvent) -> TriggerOutcome {
        match event.target(self.mode) {
            Some(target) => self.trigger(target),
            None => {
                debug!("{:?} has no edge out of {} mode", event, self.mode);
                TriggerOutcome::NoEdge {
                    mode: self.mode,
                    event,
                }
            }
        }
    }

    //--- Frame Tick -------------------------------------------------------

    /// Advances the machine by one frame and renders it.
    pub fn tick(&mut self, input: &StateTracker, frame: &FrameInfo) -> Result<(), RenderFault> {
        self.run_hooks(input, frame);

        let events = self.events.take();
        if let Phase::Stalled { target, .. } = self.phase {
            if !events.is_empty() {
                debug!(
                    "Dropping {} hook event(s) while transition to {} is stalled",
                    events.len(),
                    target
                );
            }
        } else {
            for event in events {
                self.handle_event(event);
            }
        }

        if self.fade.step() == FadeStep::Completed {
            if let Phase::Fading { target } = self.phase {
                self.begin_load(target);
            }
        }

        self.poll_load();
        self.render(frame)
    }

    //--- Queries ----------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_scene(&self) -> &SceneResourceSet {
        &self.active
    }

    /// Whether input currently reaches the active set.
    pub fn input_enabled(&self) -> bool {
        self.input_gate
    }

    pub fn fade(&self) -> &FadeTransition {
        &self.fade
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Fading { .. } => PhaseKind::Fading,
            Phase::Loading { .. } => PhaseKind::Loading,
            Phase::Stalled { .. } => PhaseKind::Stalled,
        }
    }

    /// Target of the current or stalled transition.
    pub fn pending_target(&self) -> Option<Mode> {
        match self.phase {
            Phase::Idle => None,
            Phase::Fading { target }
            | Phase::Loading { target, .. }
            | Phase::Stalled { target, .. } => Some(target),
        }
    }

    pub fn last_load_error(&self) -> Option<&LoadError> {
        match &self.phase {
            Phase::Stalled { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending_target_in_flight().is_some()
    }

    pub fn stats(&self) -> &MachineStats {
        &self.stats
    }

    pub fn loader(&self) -> &ModeLoader {
        &self.loader
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    //--- Internal Helpers -------------------------------------------------

    fn pending_target_in_flight(&self) -> Option<Mode> {
        match self.phase {
            Phase::Fading { target } | Phase::Loading { target, .. } => Some(target),
            Phase::Idle | Phase::Stalled { .. } => None,
        }
    }

    fn run_hooks(&mut self, input: &StateTracker, frame: &FrameInfo) {
        let input = if self.input_gate { Some(input) } else { None };
        let mut ctx = ModeContext::new(
            self.mode,
            frame.index,
            input,
            &mut self.events,
            &mut *self.services.audio,
        );
        self.active.run_hooks(&mut ctx);
    }

    fn begin_load(&mut self, target: Mode) {
        self.services.indicator.show();
        self.active.set_input_enabled(false);
        let pending = self.loader.request(target);
        self.phase = Phase::Loading {
            target,
            pending,
            waited: 0,
        };
    }

    fn poll_load(&mut self) {
        let Phase::Loading {
            target,
            pending,
            waited,
        } = &mut self.phase
        else {
            return;
        };

        match pending.poll() {
            LoadPoll::Pending => {
                *waited += 1;
                if *waited == self.stall_warning_ticks {
                    warn!(
                        "Load of {} mode still pending after {} ticks",
                        target, waited
                    );
                }
            }
            LoadPoll::Ready(Ok(scene)) => {
                let target = *target;
                self.complete_transition(target, scene);
            }
            LoadPoll::Ready(Err(error)) => {
                let target = *target;
                self.stall(target, error);
            }
        }
    }

    fn complete_transition(&mut self, target: Mode, scene: SceneResourceSet) {
        let from = self.mode;
        let previous = mem::replace(&mut self.active, scene);
        previous.release(&mut *self.services.audio);

        self.active.activate(&mut *self.services.audio);
        self.mode = target;
        self.input_gate = true;
        self.services.indicator.hide();
        self.fade.reset();
        self.phase = Phase::Idle;
        self.events.clear();
        self.stats.transitions_completed += 1;

        info!("Transition {} -> {} complete", from, target);
    }

    fn stall(&mut self, target: Mode, error: LoadError) {
        error!(
            "Transition {} -> {} stalled: {}",
            self.mode, target, error
        );
        self.stats.load_failures += 1;
        self.phase = Phase::Stalled { target, error };
    }

    fn render(&mut self, frame: &FrameInfo) -> Result<(), RenderFault> {
        let view = FrameView {
            mode: self.mode,
            scene: &self.active,
            fade_level: self.fade.overlay(),
            loading: matches!(self.phase, Phase::Loading { .. } | Phase::Stalled { .. }),
            frame: frame.index,
        };
        trace!("Rendering frame {} in {} mode", view.frame, view.mode);
        self.services.renderer.render_frame(&view)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
