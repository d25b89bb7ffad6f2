//=========================================================================
// Event Sequencer
//
// Typed, blocking view over the event queue.
//
// The GUI thread pushes events in the order its listener callbacks fire;
// the consumer polls them with `has`/`next` pairs or drains everything
// available at once. Delivery is strictly FIFO — no reordering and no
// coalescing (the derivation filters run before events enter the queue).
//
// Consumption contract: `next_kind` on a head of the wrong kind is a
// caller bug and fails with a mismatch error instead of discarding the
// event. Check `has_kind` first, or take the generic union via
// `next_event`.
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::{Duration, Instant};

//=== External Dependencies ===============================================

use log::trace;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{Event, EventKind};
use crate::core::sync::ConcurrentQueue;

//=== EventMismatch =======================================================

/// Error returned when the head of the queue is not the requested kind.
///
/// Nothing is consumed when this error is returned; the mismatching event
/// stays at the head of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "expected a {expected:?} event but the next event is {actual:?}; \
     check has_kind({expected:?}) before calling next_kind({expected:?})"
)]
pub struct EventMismatch {
    /// The kind the caller asked for.
    pub expected: EventKind,
    /// The kind actually at the head of the queue.
    pub actual: EventKind,
}

//=== EventSequencer ======================================================

/// FIFO event queue with typed, blocking has/next operations.
///
/// Intended for exactly one consumer thread; the producer side is the GUI
/// thread's listener callbacks, which do nothing but construct an event
/// and push it.
pub struct EventSequencer {
    queue: ConcurrentQueue<Event>,
}

impl EventSequencer {
    const INITIAL_CAPACITY: usize = 128;

    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            queue: ConcurrentQueue::new(Self::INITIAL_CAPACITY),
        }
    }

    //--- Producer Side ----------------------------------------------------

    /// Appends an event. Never blocks; called from the GUI thread.
    pub fn push(&self, event: Event) {
        trace!(target: "easel::events", "queued {:?}", event.kind());
        self.queue.push(event);
    }

    //--- Blocking Queries -------------------------------------------------

    /// Waits until at least one event is available, then returns `true`.
    pub fn has_event(&self) -> bool {
        self.queue.peek_map(|_| true)
    }

    /// Waits until at least one event is available, then returns whether
    /// the head of the queue is of the given kind.
    pub fn has_kind(&self, kind: EventKind) -> bool {
        self.queue.peek_map(|event| event.kind() == kind)
    }

    /// Waits for and removes the next event, whatever its kind.
    pub fn next_event(&self) -> Event {
        self.queue.pop()
    }

    /// Waits for the next event and removes it if it is of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`EventMismatch`] if the head is a different kind; the
    /// event is left in place.
    pub fn next_kind(&self, kind: EventKind) -> Result<Event, EventMismatch> {
        let actual = self.queue.peek_map(|event| event.kind());
        if actual != kind {
            return Err(EventMismatch {
                expected: kind,
                actual,
            });
        }

        // Single-consumer discipline: the head cannot change between the
        // peek above and this pop.
        Ok(self.queue.pop())
    }

    //--- Non-Blocking Queries ---------------------------------------------

    /// Returns immediately with whether any event is currently available.
    pub fn has_event_now(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Returns immediately with whether the head of the queue exists and
    /// is of the given kind.
    pub fn has_kind_now(&self, kind: EventKind) -> bool {
        self.has_event_now() && self.has_kind(kind)
    }

    /// Removes and returns every event that is available right now,
    /// without waiting for more. Supports "process all events since the
    /// last frame" consumption.
    pub fn drain_available(&self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.queue.try_pop() {
            events.push(event);
        }
        events
    }

    /// Pops events from the head while they are older than
    /// `now - max_age`. Bounds backlog growth when the consumer stalls.
    pub fn remove_older_than(&self, max_age: Duration) {
        let Some(cutoff) = Instant::now().checked_sub(max_age) else {
            return;
        };

        let mut removed = 0usize;
        while self.has_event_now() && self.queue.peek_map(|event| event.time_created() < cutoff) {
            self.queue.pop();
            removed += 1;
        }

        if removed > 0 {
            trace!(target: "easel::events", "removed {} stale events", removed);
        }
    }
}

impl Default for EventSequencer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventData, KeyEvent, KeyCode, MouseButton, MouseEvent};
    use std::sync::Arc;
    use std::thread;

    fn mouse_down(x: i32, y: i32) -> Event {
        Event::new(EventData::MouseDown(MouseEvent {
            x,
            y,
            button: MouseButton::Left,
        }))
    }

    fn key_down(key: KeyCode) -> Event {
        Event::new(EventData::KeyDown(KeyEvent {
            key,
            character: None,
        }))
    }

    #[test]
    fn events_come_out_in_push_order() {
        let sequencer = EventSequencer::new();
        sequencer.push(mouse_down(1, 1));
        sequencer.push(key_down(KeyCode::KeyA));
        sequencer.push(Event::new(EventData::WindowClose));

        assert_eq!(sequencer.next_event().kind(), EventKind::MouseDown);
        assert_eq!(sequencer.next_event().kind(), EventKind::KeyDown);
        assert_eq!(sequencer.next_event().kind(), EventKind::WindowClose);
    }

    #[test]
    fn has_kind_inspects_without_consuming() {
        let sequencer = EventSequencer::new();
        sequencer.push(key_down(KeyCode::KeyQ));

        assert!(sequencer.has_kind(EventKind::KeyDown));
        assert!(!sequencer.has_kind(EventKind::MouseClick));
        assert!(sequencer.has_event_now());
    }

    #[test]
    fn next_kind_pops_matching_head() {
        let sequencer = EventSequencer::new();
        sequencer.push(mouse_down(5, 6));

        let event = sequencer.next_kind(EventKind::MouseDown).unwrap();
        assert_eq!(event.kind(), EventKind::MouseDown);
        assert!(!sequencer.has_event_now());
    }

    #[test]
    fn next_kind_mismatch_names_both_kinds_and_consumes_nothing() {
        let sequencer = EventSequencer::new();
        sequencer.push(Event::new(EventData::WindowClose));

        let error = sequencer.next_kind(EventKind::MouseClick).unwrap_err();
        assert_eq!(error.expected, EventKind::MouseClick);
        assert_eq!(error.actual, EventKind::WindowClose);

        let message = error.to_string();
        assert!(message.contains("MouseClick"));
        assert!(message.contains("WindowClose"));

        // The mismatching event is still at the head.
        assert!(sequencer.has_kind_now(EventKind::WindowClose));
    }

    #[test]
    fn has_event_now_does_not_block_on_empty() {
        let sequencer = EventSequencer::new();
        assert!(!sequencer.has_event_now());
        assert!(!sequencer.has_kind_now(EventKind::KeyDown));
    }

    #[test]
    fn drain_available_empties_without_blocking() {
        let sequencer = EventSequencer::new();
        sequencer.push(mouse_down(0, 0));
        sequencer.push(mouse_down(1, 1));

        let events = sequencer.drain_available();
        assert_eq!(events.len(), 2);
        assert!(sequencer.drain_available().is_empty());
    }

    #[test]
    fn remove_older_than_keeps_fresh_events() {
        let sequencer = EventSequencer::new();
        let old = Instant::now() - Duration::from_secs(60);
        sequencer.push(Event::at(old, EventData::WindowClose));
        sequencer.push(mouse_down(2, 2));

        sequencer.remove_older_than(Duration::from_secs(1));

        assert!(sequencer.has_kind_now(EventKind::MouseDown));
        assert_eq!(sequencer.drain_available().len(), 1);
    }

    #[test]
    fn remove_older_than_on_empty_queue_is_noop() {
        let sequencer = EventSequencer::new();
        sequencer.remove_older_than(Duration::from_millis(1));
        assert!(!sequencer.has_event_now());
    }

    #[test]
    fn blocked_consumer_wakes_on_push_from_other_thread() {
        let sequencer = Arc::new(EventSequencer::new());
        let producer_sequencer = Arc::clone(&sequencer);

        let consumer = {
            let sequencer = Arc::clone(&sequencer);
            thread::spawn(move || sequencer.next_event())
        };

        thread::sleep(Duration::from_millis(50));
        producer_sequencer.push(key_down(KeyCode::Space));

        assert_eq!(consumer.join().unwrap().kind(), EventKind::KeyDown);
    }
}
