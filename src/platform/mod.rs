//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Bridges Winit (OS-level events) with the core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌───────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector       │
//  │   ↓                      │    │   ↓                   │
//  │  InputProcessor          │    │  FrameClock::tick     │
//  │   ├─ Converts Winit      │    │   ├─ input            │
//  │   └─ Tracks modifiers    │    │   ├─ inspector        │
//  │   ↓                      │    │   └─ state_machine    │
//  │  InputBuffer             │    │                       │
//  │   ├─ discrete: Vec<>     │    └───────────────────────┘
//  │   └─ continuous: Set<>   │               ↑
//  │   ↓                      │               │
//  │  RedrawRequested ────────┼───────────────┘
//  └──────────────────────────┘   PlatformEvent::Frame
// ```
//
// Frame boundary: every `RedrawRequested` sends exactly one Frame, even
// with empty batches, because each frame is one frame clock tick.
//
// If the core thread goes away (channel disconnected) the event loop exits
// so `Engine::run` can report why.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Festival"),
            width: 800,
            height: 600,
        }
    }
}

//=== Platform ============================================================

/// Window owner and input aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and talks to
/// the core thread only through the frame channel.
pub(crate) struct Platform {
    /// Created lazily in `resumed()` (mobile compatibility).
    window: Option<Window>,

    config: WindowConfig,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(event_sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes or the core
    /// thread disconnects.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends this frame's input to the core thread.
    ///
    /// Returns `false` if the core thread is gone.
    fn send_frame(&mut self) -> bool {
        if !self.buffer.is_empty() {
            trace!(target: "platform::input", "Flushing buffered input");
        }
        let (discrete, continuous) = self.buffer.drain();

        if self
            .event_sender
            .send(PlatformEvent::Frame { discrete, continuous })
            .is_err()
        {
            warn!(target: "platform", "Core thread disconnected, stopping event loop");
            return false;
        }
        true
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on startup; a repeat call (mobile resume) is a
    /// no-op.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                self.input_processor.update_modifiers(state.state());
                trace!(
                    target: "platform::input",
                    "Modifiers changed: {:?}",
                    self.input_processor.current_modifiers()
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_pointer_move(position.x as f32, position.y as f32);
                self.buffer.push_continuous(event);
            }

            WindowEvent::Touch(touch) => {
                let (motion, transition) = self.input_processor.process_touch(
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.buffer.push_continuous(motion);
                if let Some(event) = transition {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_pointer_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                if !self.send_frame() {
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
