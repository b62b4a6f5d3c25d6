//=========================================================================
// Global Systems
//=========================================================================
//
// Context type of the engine's frame clock.
//
// Default subscribers, in invocation order:
// ```text
//   "input"         → StateTracker fed with this frame's batches
//   "inspector"     → Shift+Ctrl+Alt+I toggles the debug inspector
//   "state_machine" → hooks, fade, load polling, render
// ```
//
// The inspector shortcut is window-global: it bypasses the input gate and
// works in every mode and during transitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::clock::{FrameClock, FrameInfo};
use crate::core::input::{KeyCode, Modifiers};
use crate::core::services::RenderFault;
use crate::core::state_machine::StateMachine;

//=== GlobalSystems =======================================================

/// Everything the core thread ticks each frame.
pub struct GlobalSystems {
    /// Per-frame shared data.
    pub context: GlobalContext,

    /// The mode/transition controller.
    pub machine: StateMachine,
}

impl GlobalSystems {
    pub(crate) fn new(machine: StateMachine) -> Self {
        Self {
            context: GlobalContext::new(),
            machine,
        }
    }

    /// Registers the built-in per-frame subscribers on `clock`.
    pub(crate) fn register_subscribers(clock: &mut FrameClock<GlobalSystems>) {
        clock.subscribe("input", |systems, _| {
            systems.context.begin_input_frame();
            Ok(())
        });
        clock.subscribe("inspector", |systems, _| {
            systems.toggle_inspector_on_shortcut();
            Ok(())
        });
        clock.subscribe("state_machine", |systems, frame| systems.tick_machine(frame));
    }

    //--- Subscribers ------------------------------------------------------

    fn toggle_inspector_on_shortcut(&mut self) {
        let input = &self.context.input_state;
        if !(input.is_key_pressed(KeyCode::KeyI) && input.modifiers() == Modifiers::ALL) {
            return;
        }

        self.context.inspector_visible = !self.context.inspector_visible;
        debug!("Inspector shortcut: visible = {}", self.context.inspector_visible);
        self.machine
            .services_mut()
            .renderer
            .set_inspector_visible(self.context.inspector_visible);
    }

    fn tick_machine(&mut self, frame: &FrameInfo) -> Result<(), RenderFault> {
        self.machine.tick(&self.context.input_state, frame)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
