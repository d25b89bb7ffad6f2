//=========================================================================
// Core
//
// The concurrency machinery of the canvas runtime, independent of any
// windowing system:
//
// - `sync` — ring queue, gate, blocking concurrent queue
// - `event` — tagged event union, typed sequencer, derivation filters
// - `schedule` — fixed-interval tick accounting (drop / catch-up)
// - `render` — frame buffer and double-buffer handoff
// - `registry` — process-wide open-window lifecycle
// - `animation` — the draw/simulate/on-event callback contract
//
// Everything here is exercised from two sides only: the GUI thread's
// listener callbacks (producers) and one consumer thread (the user's
// thread or the run loop's animation thread).
//=========================================================================

pub mod animation;
pub mod event;
pub mod registry;
pub mod render;
pub mod schedule;
pub mod sync;
