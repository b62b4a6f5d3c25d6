//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side receiver of platform frames with shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → next_frame() → input batches → TickControl
//
// The core thread blocks here between frames, so it idles exactly as long
// as the platform does not redraw.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

/// Queued frames beyond which the core is considered to be falling behind.
const BACKLOG_WARNING: usize = 32;

//=== TickControl =========================================================

/// Core loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    /// A frame arrived; tick once.
    Tick,
    Exit,
}

//=== EventCollector ======================================================

/// Receives one platform frame at a time and splits out its input batches.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
    behind: bool,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(2),
            behind: false,
        }
    }

    /// Blocks until the next frame or shutdown.
    pub(crate) fn next_frame(&mut self) -> TickControl {
        self.input_batches.clear();

        let event = match self.receiver.recv() {
            Ok(event) => event,
            Err(_) => return TickControl::Exit,
        };

        self.check_backlog();
        self.handle_event(event)
    }

    /// Takes the collected batches, leaving an empty vec.
    pub(crate) fn take_batches(&mut self) -> Vec<Vec<InputEvent>> {
        std::mem::take(&mut self.input_batches)
    }

    fn check_backlog(&mut self) {
        let queued = self.receiver.len();
        if queued >= BACKLOG_WARNING && !self.behind {
            warn!("Core thread falling behind: {} frames queued", queued);
        }
        self.behind = queued >= BACKLOG_WARNING;
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Frame { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
                TickControl::Tick
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
