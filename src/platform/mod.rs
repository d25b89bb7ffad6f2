//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the runtime's consumer thread.
//
// Architecture:
// ```text
//  Main Thread:                       Animation Thread:
//  ┌───────────────────────────┐     ┌─────────────────────┐
//  │  Winit Event Loop         │     │  Run Loop           │
//  │   ↓                       │     │   ├─ drain events   │
//  │  KeyDownFilter            │     │   ├─ simulate()     │
//  │  MouseClickFilter         │     │   └─ draw()         │
//  │   ↓                       │     └─────────────────────┘
//  │  EventSequencer.push ─────┼────────────↑       │
//  │                           │                    │
//  │  RedrawRequested          │     FrameHandoff.present
//  │   → FrameHandoff.paint ◄──┼────────────────────┘
//  │                           │
//  │  PlatformCommand channel ◄┼── request_redraw / close
//  └───────────────────────────┘     (crossbeam + EventLoopProxy wakeup)
// ```
//
// Key design decisions:
// - The listener callback is the only producer-side code: it constructs
//   an event value, consults the two derivation filters, and pushes —
//   O(1) work, no lock held across anything but the queue insert.
// - Consumer → platform requests ride a crossbeam channel; every send is
//   paired with an `EventLoopProxy` wakeup so the loop drains promptly.
// - Window close pushes a final `WindowClose` event and closes the frame
//   handoff, so both a blocked consumer and a blocked producer wake up.
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== Standard Library Imports ============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::event::filters::{KeyDownFilter, MouseClickFilter};
use crate::core::event::sequencer::EventSequencer;
use crate::core::event::{
    Event, EventData, KeyEvent, MouseEvent, MouseMoveEvent, MouseWheelEvent, WindowMoveEvent,
};
use crate::core::registry::WindowRegistry;
use crate::core::render::FrameHandoff;

//=== PlatformCommand =====================================================

/// Requests sent from the consumer thread to the platform loop.
#[derive(Debug, Clone)]
pub(crate) enum PlatformCommand {
    /// Schedule a repaint of the current handoff frame.
    RequestRedraw,

    /// Close the window as if the user had clicked the close button.
    Close,
}

/// User event that wakes the Winit loop so queued commands get drained.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WakeUp;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors. Typically fatal: without
/// an event loop the runtime cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (rare, indicates an OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(winit::error::EventLoopError),
}

//=== PlatformHandle ======================================================

/// Cheap, cloneable handle for talking to the platform loop from the
/// consumer thread.
#[derive(Clone)]
pub(crate) struct PlatformHandle {
    commands: Sender<PlatformCommand>,
    proxy: EventLoopProxy<WakeUp>,
}

impl PlatformHandle {
    pub fn request_redraw(&self) {
        self.send(PlatformCommand::RequestRedraw);
    }

    pub fn close(&self) {
        self.send(PlatformCommand::Close);
    }

    fn send(&self, command: PlatformCommand) {
        if self.commands.send(command).is_ok() {
            // Failure means the loop already exited; the command is moot.
            let _ = self.proxy.send_event(WakeUp);
        }
    }
}

//=== PlatformConfig ======================================================

pub(crate) struct PlatformConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

//=== Platform ============================================================

/// Owns the Winit event loop and the window host.
///
/// Runs on the thread that calls [`Platform::run`] (Winit mandates the
/// main thread on macOS/iOS). All communication with other threads goes
/// through the shared sequencer, the frame handoff and the command
/// channel.
pub(crate) struct Platform {
    event_loop: EventLoop<WakeUp>,
    host: WindowHost,
}

impl Platform {
    /// Creates the event loop and the host, returning the platform plus
    /// the handle the consumer thread uses to reach it.
    pub fn new(
        config: PlatformConfig,
        sequencer: Arc<EventSequencer>,
        handoff: Arc<FrameHandoff>,
        closed: Arc<AtomicBool>,
    ) -> Result<(Self, PlatformHandle), PlatformError> {
        let event_loop = EventLoop::<WakeUp>::with_user_event()
            .build()
            .map_err(PlatformError::EventLoopCreation)?;

        let proxy = event_loop.create_proxy();
        let (command_sender, command_receiver) = unbounded();

        let handle = PlatformHandle {
            commands: command_sender,
            proxy,
        };

        let host = WindowHost {
            window: None,
            config,
            sequencer,
            handoff,
            closed,
            commands: command_receiver,
            key_down_filter: KeyDownFilter::new(),
            click_filter: MouseClickFilter::new(),
            cursor_position: (0, 0),
        };

        info!(target: "easel::platform", "Platform subsystem initialized");
        Ok((Self { event_loop, host }, handle))
    }

    /// Runs the event loop until the window closes.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(self) -> Result<(), PlatformError> {
        debug!(target: "easel::platform", "Starting Winit event loop");

        let mut host = self.host;
        self.event_loop
            .run_app(&mut host)
            .map_err(PlatformError::EventLoopExecution)
    }
}

//=== WindowHost ==========================================================

/// The producer side of the event pipeline.
///
/// Every Winit callback does O(1) work: construct an event value, consult
/// a derivation filter, push into the sequencer. All derivation state
/// lives here on the GUI thread; the consumer side only ever sees
/// immutable [`Event`] values.
struct WindowHost {
    /// OS window handle (None until `resumed` is called).
    window: Option<Window>,

    config: PlatformConfig,

    /// Shared with the consumer thread; push side only.
    sequencer: Arc<EventSequencer>,

    /// Paint side of the double-buffer handoff.
    handoff: Arc<FrameHandoff>,

    /// Flips once, on window close; read by the run loop.
    closed: Arc<AtomicBool>,

    commands: Receiver<PlatformCommand>,

    key_down_filter: KeyDownFilter,
    click_filter: MouseClickFilter,

    /// Last cursor position, for enter/leave and button events.
    cursor_position: (i32, i32),
}

impl WindowHost {
    fn push(&self, data: EventData) {
        self.sequencer.push(Event::new(data));
    }

    fn drain_commands(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                PlatformCommand::RequestRedraw => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                PlatformCommand::Close => self.handle_close(event_loop),
            }
        }
    }

    /// Runs the teardown path exactly once: final `WindowClose` event,
    /// registry unregister, handoff close, loop exit.
    fn handle_close(&mut self, event_loop: &ActiveEventLoop) {
        // Only the GUI thread calls this, so load-then-store is race-free.
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        info!(target: "easel::platform", "Window closing");

        // Push before flipping `closed`: a consumer that observes the flag
        // must also find the final event in the queue.
        self.push(EventData::WindowClose);
        self.handoff.close();
        if self.window.take().is_some() {
            WindowRegistry::global().unregister();
        }
        self.closed.store(true, Ordering::SeqCst);
        event_loop.exit();
    }

    //--- Input Translation ------------------------------------------------

    fn on_cursor_moved(&mut self, x: i32, y: i32) {
        self.cursor_position = (x, y);
        self.click_filter.mouse_moved(x, y);
        self.push(EventData::MouseMove(MouseMoveEvent { x, y }));
    }

    fn on_mouse_input(&mut self, state: ElementState, button: winit::event::MouseButton) {
        let (x, y) = self.cursor_position;
        let button = button.into();

        match state {
            ElementState::Pressed => {
                self.click_filter.mouse_pressed(x, y);
                self.push(EventData::MouseDown(MouseEvent { x, y, button }));
            }
            ElementState::Released => {
                self.push(EventData::MouseUp(MouseEvent { x, y, button }));
                if self.click_filter.mouse_released(x, y) {
                    self.push(EventData::MouseClick(MouseEvent { x, y, button }));
                }
            }
        }
    }

    fn on_keyboard_input(&mut self, event: winit::event::KeyEvent) {
        let key = event_mapper::map_physical_key(event.physical_key);
        let character = event_mapper::key_character(&event);
        let key_event = KeyEvent { key, character };

        match event.state {
            ElementState::Pressed => {
                if self.key_down_filter.key_pressed(key) {
                    self.push(EventData::KeyDown(key_event));
                }
                // Key press fires on every OS repeat, unfiltered.
                self.push(EventData::KeyPress(key_event));
            }
            ElementState::Released => {
                self.key_down_filter.key_released(key);
                self.push(EventData::KeyUp(key_event));
            }
        }
    }

    fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let delta = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / 20.0,
        };
        self.push(EventData::MouseWheel(MouseWheelEvent { delta }));
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler<WakeUp> for WindowHost {
    /// Called when the app becomes active (startup or mobile resume).
    /// Creates the window on first activation only.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "easel::platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "easel::platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                WindowRegistry::global().register();
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "easel::platform", "Window creation failed: {}", e);
                self.handle_close(event_loop);
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: WakeUp) {
        self.drain_commands(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as i32, position.y as i32);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_input(state, button);
            }

            WindowEvent::CursorEntered { .. } => {
                let (x, y) = self.cursor_position;
                self.push(EventData::MouseEnter(MouseMoveEvent { x, y }));
            }

            WindowEvent::CursorLeft { .. } => {
                let (x, y) = self.cursor_position;
                self.push(EventData::MouseLeave(MouseMoveEvent { x, y }));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.on_mouse_wheel(delta);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.on_keyboard_input(event);
            }

            WindowEvent::Moved(position) => {
                self.push(EventData::WindowMove(WindowMoveEvent {
                    x: position.x,
                    y: position.y,
                }));
            }

            WindowEvent::RedrawRequested => {
                self.handoff.paint(|frame| {
                    trace!(
                        target: "easel::platform",
                        "painted frame {}x{}",
                        frame.width(),
                        frame.height()
                    );
                });
            }

            WindowEvent::CloseRequested => {
                self.handle_close(event_loop);
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        if !self.closed.load(Ordering::SeqCst) {
            warn!(target: "easel::platform", "Event loop exiting without close request");
            self.handle_close(event_loop);
        }
    }
}
