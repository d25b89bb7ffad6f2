//=========================================================================
// Event Model
//
// Closed, tagged set of window/input events.
//
// Responsibilities:
// - Represent every event the GUI thread can produce as one union type
// - Carry an immutable creation timestamp on every event
// - Provide `EventKind` for runtime kind checks in the sequencer
//
// Events are immutable value objects: ownership moves from the producing
// listener callback into the queue and on to the single consumer that
// pops it. Nothing is shared or mutated after construction.
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Instant;

//=== Submodules ==========================================================

pub mod filters;
pub mod sequencer;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations into a stable,
/// portable enum. `Other` covers side buttons, thumb buttons and macro
/// keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced:
/// `KeyA` is the same physical key on QWERTY and AZERTY layouts.
/// Additional codes can be added without breaking existing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown, ArrowLeft, ArrowRight, ArrowUp,

    //--- Common Special Keys ----------------------------------------------
    Space, Enter, Escape, Backspace, Tab,

    //--- Fallback ---------------------------------------------------------
    /// Keys not mapped explicitly by the platform layer.
    Unidentified,
}

//=== Event Payloads ======================================================

/// Payload of a mouse button event (click, down, up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Horizontal pixel position relative to the canvas.
    pub x: i32,
    /// Vertical pixel position relative to the canvas.
    pub y: i32,
    /// The button that produced the event.
    pub button: MouseButton,
}

/// Payload of a positional mouse event (move, enter, leave).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoveEvent {
    pub x: i32,
    pub y: i32,
}

/// Payload of a mouse wheel event.
///
/// `delta` is positive when the wheel turns away from the user and
/// negative when it turns towards the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseWheelEvent {
    pub delta: f64,
}

/// Payload of a keyboard event (down, up, press).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: KeyCode,
    /// The character this key produces, if any.
    pub character: Option<char>,
}

/// Payload of a window move event; the new top-left window position in
/// screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMoveEvent {
    pub x: i32,
    pub y: i32,
}

//=== EventData ===========================================================

/// The closed union of everything the window can report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventData {
    /// A mouse button was pressed and quickly released nearby (synthesized
    /// by [`filters::MouseClickFilter`]).
    MouseClick(MouseEvent),
    /// The mouse moved over the canvas.
    MouseMove(MouseMoveEvent),
    /// A mouse button was pressed down.
    MouseDown(MouseEvent),
    /// A mouse button was released.
    MouseUp(MouseEvent),
    /// The mouse entered the canvas.
    MouseEnter(MouseMoveEvent),
    /// The mouse left the canvas.
    MouseLeave(MouseMoveEvent),
    /// The mouse wheel turned.
    MouseWheel(MouseWheelEvent),
    /// A key went down (auto-repeat suppressed by
    /// [`filters::KeyDownFilter`]).
    KeyDown(KeyEvent),
    /// A key was released.
    KeyUp(KeyEvent),
    /// A key is being held down (fires on every OS repeat).
    KeyPress(KeyEvent),
    /// The window was moved.
    WindowMove(WindowMoveEvent),
    /// The window was closed by the user or by an explicit close request.
    WindowClose,
}

//=== EventKind ===========================================================

/// Discriminant-only view of [`EventData`], used for the sequencer's
/// typed has/next checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseClick,
    MouseMove,
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
    MouseWheel,
    KeyDown,
    KeyUp,
    KeyPress,
    WindowMove,
    WindowClose,
}

impl EventData {
    /// Returns the kind tag of this event data.
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::MouseClick(_) => EventKind::MouseClick,
            EventData::MouseMove(_) => EventKind::MouseMove,
            EventData::MouseDown(_) => EventKind::MouseDown,
            EventData::MouseUp(_) => EventKind::MouseUp,
            EventData::MouseEnter(_) => EventKind::MouseEnter,
            EventData::MouseLeave(_) => EventKind::MouseLeave,
            EventData::MouseWheel(_) => EventKind::MouseWheel,
            EventData::KeyDown(_) => EventKind::KeyDown,
            EventData::KeyUp(_) => EventKind::KeyUp,
            EventData::KeyPress(_) => EventKind::KeyPress,
            EventData::WindowMove(_) => EventKind::WindowMove,
            EventData::WindowClose => EventKind::WindowClose,
        }
    }
}

//=== Event ===============================================================

/// One window/input event with its creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    time_created: Instant,
    data: EventData,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(data: EventData) -> Self {
        Self {
            time_created: Instant::now(),
            data,
        }
    }

    /// Creates an event with an explicit timestamp.
    pub fn at(time_created: Instant, data: EventData) -> Self {
        Self { time_created, data }
    }

    /// The point in time this event was created.
    pub fn time_created(&self) -> Instant {
        self.time_created
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
