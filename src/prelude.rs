//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use easel::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime facade
pub use crate::runtime::{Runtime, RuntimeBuilder};

// Animation contract
pub use crate::core::animation::Animation;

// Event model
pub use crate::core::event::{
    Event, EventData, EventKind, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseMoveEvent,
    MouseWheelEvent, WindowMoveEvent,
};

// Typed event polling
pub use crate::core::event::sequencer::{EventMismatch, EventSequencer};

// Frame buffer
pub use crate::core::render::Frame;

// Scheduling
pub use crate::core::schedule::{TickPolicy, TickScheduler};
