//=========================================================================
// Animation Contract
//
// The callback pair (draw/simulate) plus one handler per event kind that
// the run loop drives. Every event handler defaults to a no-op so an
// implementation only overrides what it cares about.
//
// Call order per simulation tick: event handlers (all queued events, in
// FIFO order), then `simulate`. `draw` runs on its own schedule. All
// callbacks run on the animation thread, outside every internal lock;
// a panic inside any of them propagates out of the run loop.
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::{
    Event, EventData, KeyEvent, MouseEvent, MouseMoveEvent, MouseWheelEvent, WindowMoveEvent,
};
use super::render::Frame;

//=== Animation ===========================================================

/// An animation or interactive application driven by the run loop.
pub trait Animation {
    /// Draws the next frame onto the canvas.
    ///
    /// Called at the configured frame rate. Under heavy load frames are
    /// dropped rather than queued, so this may be called less often than
    /// configured — never in a burst.
    fn draw(&mut self, canvas: &mut Frame);

    /// Advances the simulation by one step.
    ///
    /// Called at the configured simulation rate, independently of `draw`.
    /// Missed steps are caught up in a burst, never skipped.
    fn simulate(&mut self) {}

    /// Reports whether the animation wants to end.
    ///
    /// Checked after every simulation batch; returning `true` requests a
    /// window close, equivalent to the user clicking the close button.
    fn is_finished(&self) -> bool {
        false
    }

    //--- Event Handlers ---------------------------------------------------

    /// A mouse button was pressed down and quickly released again nearby.
    fn on_mouse_click(&mut self, _event: &MouseEvent) {}

    /// The mouse moved over the canvas.
    fn on_mouse_move(&mut self, _event: &MouseMoveEvent) {}

    /// A mouse button was pressed down.
    fn on_mouse_down(&mut self, _event: &MouseEvent) {}

    /// A mouse button was released.
    fn on_mouse_up(&mut self, _event: &MouseEvent) {}

    /// The mouse entered the canvas.
    fn on_mouse_enter(&mut self, _event: &MouseMoveEvent) {}

    /// The mouse left the canvas.
    fn on_mouse_leave(&mut self, _event: &MouseMoveEvent) {}

    /// The mouse wheel turned.
    fn on_mouse_wheel(&mut self, _event: &MouseWheelEvent) {}

    /// A key went down (exactly once per hold, auto-repeat filtered).
    fn on_key_down(&mut self, _event: &KeyEvent) {}

    /// A key was released.
    fn on_key_up(&mut self, _event: &KeyEvent) {}

    /// A key is being held down (fires on every OS repeat).
    fn on_key_press(&mut self, _event: &KeyEvent) {}

    /// The window was moved.
    fn on_window_move(&mut self, _event: &WindowMoveEvent) {}

    /// The window was closed.
    fn on_window_close(&mut self) {}
}

//=== Dispatch ============================================================

/// Routes one popped event to the matching handler.
pub fn dispatch_event(animation: &mut dyn Animation, event: &Event) {
    match event.data() {
        EventData::MouseClick(e) => animation.on_mouse_click(e),
        EventData::MouseMove(e) => animation.on_mouse_move(e),
        EventData::MouseDown(e) => animation.on_mouse_down(e),
        EventData::MouseUp(e) => animation.on_mouse_up(e),
        EventData::MouseEnter(e) => animation.on_mouse_enter(e),
        EventData::MouseLeave(e) => animation.on_mouse_leave(e),
        EventData::MouseWheel(e) => animation.on_mouse_wheel(e),
        EventData::KeyDown(e) => animation.on_key_down(e),
        EventData::KeyUp(e) => animation.on_key_up(e),
        EventData::KeyPress(e) => animation.on_key_press(e),
        EventData::WindowMove(e) => animation.on_window_move(e),
        EventData::WindowClose => animation.on_window_close(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventKind, KeyCode, MouseButton};

    #[derive(Default)]
    struct RecordingAnimation {
        handled: Vec<EventKind>,
        draws: usize,
        simulates: usize,
    }

    impl Animation for RecordingAnimation {
        fn draw(&mut self, _canvas: &mut Frame) {
            self.draws += 1;
        }

        fn simulate(&mut self) {
            self.simulates += 1;
        }

        fn on_mouse_click(&mut self, _event: &MouseEvent) {
            self.handled.push(EventKind::MouseClick);
        }

        fn on_key_down(&mut self, _event: &KeyEvent) {
            self.handled.push(EventKind::KeyDown);
        }

        fn on_window_close(&mut self) {
            self.handled.push(EventKind::WindowClose);
        }
    }

    #[test]
    fn dispatch_routes_to_matching_handler() {
        let mut animation = RecordingAnimation::default();

        dispatch_event(
            &mut animation,
            &Event::new(EventData::MouseClick(MouseEvent {
                x: 1,
                y: 2,
                button: MouseButton::Left,
            })),
        );
        dispatch_event(
            &mut animation,
            &Event::new(EventData::KeyDown(KeyEvent {
                key: KeyCode::KeyA,
                character: Some('a'),
            })),
        );
        dispatch_event(&mut animation, &Event::new(EventData::WindowClose));

        assert_eq!(
            animation.handled,
            vec![EventKind::MouseClick, EventKind::KeyDown, EventKind::WindowClose]
        );
    }

    #[test]
    fn unoverridden_handlers_are_noops() {
        let mut animation = RecordingAnimation::default();

        dispatch_event(
            &mut animation,
            &Event::new(EventData::MouseMove(MouseMoveEvent { x: 3, y: 4 })),
        );
        dispatch_event(
            &mut animation,
            &Event::new(EventData::MouseWheel(MouseWheelEvent { delta: 1.5 })),
        );

        assert!(animation.handled.is_empty());
    }
}
