//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Everything that runs on the core (non-platform) thread: the frame clock,
// the mode state machine and the input state it consults.
//
// Architecture:
// ```text
//   Platform (main thread)
//       │ PlatformEvent::Frame        (bounded crossbeam channel)
//       ▼
//   EventCollector ──batches──▶ GlobalContext.frame_events
//       │
//       ▼ one tick per frame
//   FrameClock<GlobalSystems>
//       ├─ input          StateTracker
//       ├─ inspector      Shift+Ctrl+Alt+I
//       ├─ state_machine  hooks → fade → load → render
//       └─ (app subscribers added through Engine::init)
// ```
//
// Notes:
// The core thread blocks on the channel between frames, so its cadence is
// the platform's redraw rate. It ends on WindowClosed, on disconnect, or
// with the first RenderFault.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod event_queue;
pub mod fade;
pub mod globals;
pub mod input;
pub mod loader;
pub mod mode;
pub(crate) mod platform_bridge;
pub mod resources;
pub mod services;
pub mod state_machine;

#[cfg(test)]
pub(crate) mod testing;

//=== External Dependencies ===============================================

use std::io;
use std::thread;

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use clock::FrameClock;
use globals::GlobalSystems;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use services::RenderFault;
use state_machine::StateMachine;

//=== CoreSystemsOrchestrator =============================================

/// Owns the core-thread systems until the thread is spawned.
pub(crate) struct CoreSystemsOrchestrator {
    clock: FrameClock<GlobalSystems>,
    systems: GlobalSystems,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    /// Wraps a booted state machine and registers the built-in subscribers.
    pub(crate) fn new(machine: StateMachine) -> Self {
        let mut clock = FrameClock::new();
        GlobalSystems::register_subscribers(&mut clock);

        Self {
            clock,
            systems: GlobalSystems::new(machine),
        }
    }

    /// Lets the application add per-frame subscribers.
    ///
    /// They run after the built-in ones, in registration order.
    pub(crate) fn init_clock<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut FrameClock<GlobalSystems>),
    {
        init_fn(&mut self.clock);
    }

    pub(crate) fn systems(&self) -> &GlobalSystems {
        &self.systems
    }

    //--- Core Thread ------------------------------------------------------

    /// Spawns the core thread, which ticks once per received frame.
    ///
    /// The thread returns `Ok(())` on shutdown and `Err` with the first
    /// render fault otherwise.
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
    ) -> io::Result<thread::JoinHandle<Result<(), RenderFault>>> {
        thread::Builder::new()
            .name(String::from("core"))
            .spawn(move || self.run_loop(receiver))
    }

    fn run_loop(mut self, receiver: Receiver<PlatformEvent>) -> Result<(), RenderFault> {
        let mut collector = EventCollector::new(receiver);
        info!("Core thread started in {} mode", self.systems.machine.mode());

        loop {
            match collector.next_frame() {
                TickControl::Exit => {
                    info!(
                        "Core thread exiting after {} frames",
                        self.clock.frame_index()
                    );
                    return Ok(());
                }
                TickControl::Tick => {
                    self.systems
                        .context
                        .frame_events
                        .extend(collector.take_batches());

                    if let Err(fault) = self.clock.tick(&mut self.systems) {
                        error!(
                            "Core thread stopping on frame {}: {}",
                            self.clock.frame_index(),
                            fault
                        );
                        return Err(fault);
                    }
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
