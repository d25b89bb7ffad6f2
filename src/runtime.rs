//=========================================================================
// Runtime
//
// Main entry point and coordinator for the canvas runtime.
//
// Architecture:
// ```text
//     RuntimeBuilder ──build()──> Runtime ──run(animation)──> [blocks]
//         │                         │
//         ├─ with_size()            ├─ spawns the animation thread
//         ├─ with_frames_per_second └─ runs the Winit loop here,
//         └─ with_simulations_...      joins the worker on exit
// ```
//
// The animation thread drives two independent schedulers off the shared
// wall clock: a catch-up scheduler for simulation ticks (each tick first
// dispatches all queued events FIFO, then `simulate`) and a drop-mode
// scheduler for frames (`draw` + handoff present + redraw request).
// Between iterations it sleeps the minimum of both schedulers' next-tick
// delays instead of busy-polling.
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::animation::{dispatch_event, Animation};
use crate::core::event::sequencer::EventSequencer;
use crate::core::registry::WindowRegistry;
use crate::core::render::{Frame, FrameHandoff};
use crate::core::schedule::{TickPolicy, TickScheduler};
use crate::platform::{Platform, PlatformConfig, PlatformError};

//=== RuntimeBuilder ======================================================

/// Builder for configuring and constructing a [`Runtime`].
///
/// # Default Values
///
/// - **Size**: 600×600 canvas pixels
/// - **Title**: `"easel"`
/// - **Frame rate**: 60 frames per second (drop policy)
/// - **Simulation rate**: 60 steps per second (catch-up policy)
/// - **Terminate on last close**: off
pub struct RuntimeBuilder {
    width: u32,
    height: u32,
    title: String,
    frames_per_second: f64,
    simulations_per_second: f64,
    terminate_on_last_close: bool,
}

impl RuntimeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            width: 600,
            height: 600,
            title: String::from("easel"),
            frames_per_second: 60.0,
            simulations_per_second: 60.0,
            terminate_on_last_close: false,
        }
    }

    /// Sets the canvas size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0, "Width must be positive");
        assert!(height > 0, "Height must be positive");
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the target frame rate for the draw loop.
    ///
    /// Frames that fall behind wall-clock are dropped, not queued: under
    /// load the animation draws less often, never in a burst.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_frames_per_second(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "Frames per second must be positive, got {}", fps);
        self.frames_per_second = fps;
        self
    }

    /// Sets the target rate for the simulation loop.
    ///
    /// Missed simulation steps are caught up in a burst, never skipped.
    ///
    /// # Panics
    ///
    /// Panics if `sps <= 0.0`.
    pub fn with_simulations_per_second(mut self, sps: f64) -> Self {
        assert!(
            sps > 0.0,
            "Simulations per second must be positive, got {}",
            sps
        );
        self.simulations_per_second = sps;
        self
    }

    /// When enabled, closing the last open window terminates the process,
    /// via the global [`WindowRegistry`] shutdown hook.
    pub fn with_terminate_on_last_close(mut self, terminate: bool) -> Self {
        self.terminate_on_last_close = terminate;
        self
    }

    /// Builds the runtime instance.
    pub fn build(self) -> Runtime {
        info!(
            target: "easel::runtime",
            "Building runtime ({}x{}, {} fps, {} sps)",
            self.width, self.height, self.frames_per_second, self.simulations_per_second
        );

        Runtime { config: self }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runtime =============================================================

/// The canvas runtime: one window, one animation, two fixed-rate loops.
///
/// # Threads
///
/// ```text
/// Runtime::run (calling thread)          Animation Thread
///   └─► Winit event loop                   └─► run loop @ fps/sps
///         produces events ───sequencer───►     consumes events
///         paints frames   ◄───handoff─────     presents frames
/// ```
pub struct Runtime {
    config: RuntimeBuilder,
}

impl Runtime {
    /// Starts the runtime and blocks until the window closes.
    ///
    /// Spawns the animation thread, then runs the platform event loop on
    /// the calling thread (which must be the main thread on macOS/iOS).
    /// When the window closes the final `WindowClose` event is still
    /// dispatched to the animation before the thread is joined.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the windowing event loop cannot be
    /// created or fails while running.
    ///
    /// # Panics
    ///
    /// A panic inside `draw`, `simulate` or an event handler is not
    /// caught; it tears down the animation thread and is reported after
    /// the window closes.
    pub fn run(self, animation: impl Animation + Send + 'static) -> Result<(), PlatformError> {
        let config = self.config;

        info!(target: "easel::runtime", "Starting runtime");

        //--- 1. Shared state between the two threads ----------------------
        let sequencer = Arc::new(EventSequencer::new());
        let handoff = Arc::new(FrameHandoff::new(config.width, config.height));
        let closed = Arc::new(AtomicBool::new(false));

        if config.terminate_on_last_close {
            WindowRegistry::global().set_shutdown_hook(|| std::process::exit(0));
        }

        //--- 2. Platform on this thread, handle for the worker ------------
        let platform_config = PlatformConfig {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
        };
        let (platform, handle) = Platform::new(
            platform_config,
            Arc::clone(&sequencer),
            Arc::clone(&handoff),
            Arc::clone(&closed),
        )?;

        //--- 3. Spawn the animation thread --------------------------------
        let worker = {
            let sequencer = Arc::clone(&sequencer);
            let handoff = Arc::clone(&handoff);
            let closed = Arc::clone(&closed);
            let close_handle = handle.clone();
            let redraw = move || handle.request_redraw();
            let request_close = move || close_handle.close();
            let frame_interval = Duration::from_secs_f64(1.0 / config.frames_per_second);
            let simulation_interval = Duration::from_secs_f64(1.0 / config.simulations_per_second);
            let (width, height) = (config.width, config.height);

            thread::Builder::new()
                .name(String::from("easel-animation"))
                .spawn(move || {
                    let mut canvas = Frame::new(width, height);
                    run_animation_loop(
                        animation,
                        &mut canvas,
                        &sequencer,
                        &handoff,
                        &closed,
                        redraw,
                        request_close,
                        frame_interval,
                        simulation_interval,
                    );
                })
                .expect("failed to spawn the animation thread")
        };
        info!(target: "easel::runtime", "Animation thread spawned");

        //--- 4. Run the event loop (blocks until the window closes) -------
        let result = platform.run();
        info!(target: "easel::runtime", "Platform event loop exited");

        //--- 5. Cleanup: make sure the worker can exit, then join ---------
        closed.store(true, Ordering::SeqCst);
        handoff.close();

        match worker.join() {
            Ok(()) => info!(target: "easel::runtime", "Animation thread terminated cleanly"),
            Err(e) => error!(target: "easel::runtime", "Animation thread panicked: {:?}", e),
        }

        info!(target: "easel::runtime", "Runtime shutdown complete");
        result
    }
}

//=== Run Loop ============================================================

/// The dual-rate loop driving one animation until the window closes.
///
/// Per iteration:
/// 1. Grant every due simulation tick (catch-up): dispatch all currently
///    queued events FIFO, then `simulate`.
/// 2. If the animation reports itself finished, request a window close
///    (once); the loop then exits the same way a user-initiated close
///    does, via the `closed` flag.
/// 3. If a frame tick is due (drop policy): `draw`, present through the
///    handoff, request a repaint.
/// 4. Sleep until the earlier of the two next tick boundaries.
///
/// After the loop exits, events that were already queued (including the
/// final `WindowClose`) are still dispatched once.
#[allow(clippy::too_many_arguments)]
fn run_animation_loop(
    mut animation: impl Animation,
    canvas: &mut Frame,
    sequencer: &EventSequencer,
    handoff: &FrameHandoff,
    closed: &AtomicBool,
    request_redraw: impl Fn(),
    request_close: impl Fn(),
    frame_interval: Duration,
    simulation_interval: Duration,
) {
    let mut frames = TickScheduler::new(frame_interval, TickPolicy::Drop);
    let mut simulations = TickScheduler::new(simulation_interval, TickPolicy::CatchUp);
    let mut close_requested = false;

    while !closed.load(Ordering::SeqCst) {
        while simulations.should_run_tick() {
            for event in sequencer.drain_available() {
                dispatch_event(&mut animation, &event);
            }
            animation.simulate();
        }

        if !close_requested && animation.is_finished() {
            info!(target: "easel::runtime", "Animation finished, requesting close");
            request_close();
            close_requested = true;
        }

        if frames.should_run_tick() {
            animation.draw(canvas);
            handoff.present(canvas, false);
            request_redraw();
        }

        let sleep = frames
            .time_until_next_tick()
            .min(simulations.time_until_next_tick());
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
    }

    // The window is closed: no new events will arrive, but whatever is
    // still queued is drained so the animation observes the close.
    for event in sequencer.drain_available() {
        dispatch_event(&mut animation, &event);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Event, EventData, EventKind, KeyCode, KeyEvent};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    //=====================================================================
    // RuntimeBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = RuntimeBuilder::new();
        assert_eq!(builder.width, 600);
        assert_eq!(builder.height, 600);
        assert_eq!(builder.frames_per_second, 60.0);
        assert_eq!(builder.simulations_per_second, 60.0);
        assert!(!builder.terminate_on_last_close);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let runtime = RuntimeBuilder::new()
            .with_size(800, 450)
            .with_title("demo")
            .with_frames_per_second(30.0)
            .with_simulations_per_second(120.0)
            .build();

        assert_eq!(runtime.config.width, 800);
        assert_eq!(runtime.config.height, 450);
        assert_eq!(runtime.config.title, "demo");
        assert_eq!(runtime.config.frames_per_second, 30.0);
        assert_eq!(runtime.config.simulations_per_second, 120.0);
    }

    #[test]
    #[should_panic(expected = "Frames per second must be positive")]
    fn builder_rejects_zero_fps() {
        let _ = RuntimeBuilder::new().with_frames_per_second(0.0);
    }

    #[test]
    #[should_panic(expected = "Simulations per second must be positive")]
    fn builder_rejects_negative_sps() {
        let _ = RuntimeBuilder::new().with_simulations_per_second(-60.0);
    }

    #[test]
    #[should_panic(expected = "Width must be positive")]
    fn builder_rejects_zero_width() {
        let _ = RuntimeBuilder::new().with_size(0, 100);
    }

    //=====================================================================
    // Run Loop Tests
    //=====================================================================

    #[derive(Default)]
    struct CountingAnimation {
        draws: Arc<AtomicUsize>,
        simulates: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<EventKind>>>,
    }

    impl Animation for CountingAnimation {
        fn draw(&mut self, canvas: &mut Frame) {
            canvas.fill(0xFF00_FF00);
            self.draws.fetch_add(1, Ordering::SeqCst);
        }

        fn simulate(&mut self) {
            self.simulates.fetch_add(1, Ordering::SeqCst);
        }

        fn on_key_down(&mut self, _event: &KeyEvent) {
            self.seen.lock().unwrap().push(EventKind::KeyDown);
        }

        fn on_window_close(&mut self) {
            self.seen.lock().unwrap().push(EventKind::WindowClose);
        }
    }

    #[test]
    fn closed_loop_still_dispatches_queued_events() {
        let animation = CountingAnimation::default();
        let seen = Arc::clone(&animation.seen);

        let sequencer = EventSequencer::new();
        sequencer.push(Event::new(EventData::KeyDown(KeyEvent {
            key: KeyCode::KeyA,
            character: Some('a'),
        })));
        sequencer.push(Event::new(EventData::WindowClose));

        let handoff = FrameHandoff::new(2, 2);
        let closed = AtomicBool::new(true);
        let mut canvas = Frame::new(2, 2);

        run_animation_loop(
            animation,
            &mut canvas,
            &sequencer,
            &handoff,
            &closed,
            || {},
            || {},
            Duration::from_millis(10),
            Duration::from_millis(10),
        );

        assert_eq!(
            *seen.lock().unwrap(),
            vec![EventKind::KeyDown, EventKind::WindowClose]
        );
    }

    #[test]
    fn loop_runs_both_callbacks_until_closed() {
        let animation = CountingAnimation::default();
        let draws = Arc::clone(&animation.draws);
        let simulates = Arc::clone(&animation.simulates);

        let sequencer = Arc::new(EventSequencer::new());
        let handoff = Arc::new(FrameHandoff::new(2, 2));
        let closed = Arc::new(AtomicBool::new(false));

        let worker = {
            let sequencer = Arc::clone(&sequencer);
            let handoff = Arc::clone(&handoff);
            let closed = Arc::clone(&closed);
            thread::spawn(move || {
                let mut canvas = Frame::new(2, 2);
                run_animation_loop(
                    animation,
                    &mut canvas,
                    &sequencer,
                    &handoff,
                    &closed,
                    || {},
                    || {},
                    Duration::from_millis(5),
                    Duration::from_millis(5),
                );
            })
        };

        // Stand in for the GUI thread: keep painting presented frames.
        let deadline = std::time::Instant::now() + Duration::from_millis(200);
        while std::time::Instant::now() < deadline {
            handoff.paint(|_| {});
            thread::sleep(Duration::from_millis(2));
        }

        closed.store(true, Ordering::SeqCst);
        handoff.close();
        worker.join().unwrap();

        assert!(draws.load(Ordering::SeqCst) > 0);
        assert!(simulates.load(Ordering::SeqCst) > 0);
    }

    struct FinishingAnimation {
        remaining: usize,
    }

    impl Animation for FinishingAnimation {
        fn draw(&mut self, _canvas: &mut Frame) {}

        fn simulate(&mut self) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn is_finished(&self) -> bool {
            self.remaining == 0
        }
    }

    #[test]
    fn finished_animation_requests_close_once() {
        let sequencer = EventSequencer::new();
        let handoff = FrameHandoff::new(2, 2);
        let closed = AtomicBool::new(false);
        let close_requests = AtomicUsize::new(0);
        let mut canvas = Frame::new(2, 2);

        run_animation_loop(
            FinishingAnimation { remaining: 3 },
            &mut canvas,
            &sequencer,
            &handoff,
            &closed,
            || {},
            // Stand in for the platform: honor the close request.
            || {
                close_requests.fetch_add(1, Ordering::SeqCst);
                closed.store(true, Ordering::SeqCst);
            },
            // No painter in this test, so keep the frame loop dormant.
            Duration::from_secs(3600),
            Duration::from_millis(1),
        );

        assert_eq!(close_requests.load(Ordering::SeqCst), 1);
        assert!(closed.load(Ordering::SeqCst));
    }
}
