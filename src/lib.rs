//=========================================================================
// easel — Library Root
//
// This crate defines the public API surface of the easel canvas runtime.
//
// Responsibilities:
// - Expose the concurrency core (queues, sequencer, schedulers, handoff)
// - Keep OS integration (`platform`) hidden from end users
// - Provide the high-level `Runtime` facade for the animation mode
//
// Typical usage:
// ```no_run
// use easel::prelude::*;
//
// struct Blank;
//
// impl Animation for Blank {
//     fn draw(&mut self, canvas: &mut Frame) {
//         canvas.fill(0xFF20_2040);
//     }
// }
//
// fn main() {
//     RuntimeBuilder::new()
//         .with_size(800, 600)
//         .with_title("blank")
//         .build()
//         .run(Blank)
//         .unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the concurrency machinery (event pipeline, schedulers,
// frame handoff). It is exposed publicly so the pieces can be used
// standalone, but application code will mostly use the `Runtime` facade.
//
pub mod core;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains OS-specific logic (window, Winit integration) and
// is kept private apart from its error type; it is not part of the
// public API surface.
//
// `runtime` defines the main entry point and the dual-rate run loop.
//
mod platform;
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use platform::PlatformError;
pub use runtime::{Runtime, RuntimeBuilder};

pub mod prelude;
