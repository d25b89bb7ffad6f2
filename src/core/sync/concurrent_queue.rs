//=========================================================================
// Concurrent Queue
//
// Blocking producer/consumer channel over the growable ring queue.
//
// Composition:
// - `parking_lot::Mutex<RingQueue<T>>` — serializes push/pop mutation;
//   lock hold time is O(1) buffer work (amortized), never user code
// - counting `Gate` — one permit released per push, consumed per pop,
//   so a consumer blocks exactly until an item exists
//
// Ordering: strictly FIFO from push order to pop order. Intended use is
// many producers (in practice: the GUI thread) and a single consumer.
//=========================================================================

//=== External Dependencies ===============================================

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::gate::Gate;
use super::ring_queue::RingQueue;

//=== ConcurrentQueue =====================================================

/// Thread-safe FIFO queue with non-blocking push and blocking pop.
pub struct ConcurrentQueue<T> {
    queue: Mutex<RingQueue<T>>,
    items: Gate,
}

impl<T> ConcurrentQueue<T> {
    //--- Construction -----------------------------------------------------

    /// Creates a queue with the given initial capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(RingQueue::new(capacity)),
            items: Gate::new(0),
        }
    }

    //--- Producer Side ----------------------------------------------------

    /// Appends an element. Never blocks on capacity: the underlying ring
    /// grows instead. Wakes at most one blocked consumer.
    pub fn push(&self, element: T) {
        self.queue.lock().push(element);
        self.items.release();
    }

    //--- Consumer Side ----------------------------------------------------

    /// Removes and returns the oldest element, blocking until one exists.
    pub fn pop(&self) -> T {
        self.items.acquire();
        self.queue.lock().pop()
    }

    /// Removes and returns the oldest element if one exists right now.
    pub fn try_pop(&self) -> Option<T> {
        if !self.items.try_acquire() {
            return None;
        }
        Some(self.queue.lock().pop())
    }

    /// Inspects the oldest element without consuming it, blocking until
    /// one exists. The item permit is handed back afterwards, so a
    /// subsequent `pop` will not block.
    pub fn peek_map<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.items.acquire();

        let result = {
            let queue = self.queue.lock();
            f(queue
                .peek()
                .expect("item permit acquired but queue is empty"))
        };

        self.items.release();
        result
    }

    /// Returns whether the queue is currently empty, without blocking.
    pub fn is_empty(&self) -> bool {
        !self.items.can_acquire()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order_single_thread() {
        let queue = ConcurrentQueue::new(4);
        for value in 0..10 {
            queue.push(value);
        }
        for expected in 0..10 {
            assert_eq!(queue.pop(), expected);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn try_pop_on_empty_returns_none() {
        let queue: ConcurrentQueue<i32> = ConcurrentQueue::new(4);
        assert_eq!(queue.try_pop(), None);

        queue.push(7);
        assert_eq!(queue.try_pop(), Some(7));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn peek_map_leaves_element_in_place() {
        let queue = ConcurrentQueue::new(4);
        queue.push(42);

        assert_eq!(queue.peek_map(|value| *value), 42);
        assert!(!queue.is_empty());
        assert_eq!(queue.pop(), 42);
    }

    #[test]
    fn blocked_pop_is_released_by_push() {
        let queue: Arc<ConcurrentQueue<i32>> = Arc::new(ConcurrentQueue::new(4));
        let consumer_queue = Arc::clone(&queue);

        let consumer = thread::spawn(move || consumer_queue.pop());

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.push(99);
        assert_eq!(consumer.join().unwrap(), 99);
    }

    #[test]
    fn two_blocked_consumers_two_pushes_no_lost_wakeups() {
        let queue: Arc<ConcurrentQueue<i32>> = Arc::new(ConcurrentQueue::new(4));

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.push(1);
        queue.push(2);

        let received: HashSet<i32> = consumers
            .into_iter()
            .map(|consumer| consumer.join().unwrap())
            .collect();

        assert_eq!(received, HashSet::from([1, 2]));
        assert!(queue.is_empty());
    }

    #[test]
    fn producer_thread_to_consumer_thread_preserves_order() {
        let queue: Arc<ConcurrentQueue<usize>> = Arc::new(ConcurrentQueue::new(2));
        let producer_queue = Arc::clone(&queue);

        let producer = thread::spawn(move || {
            for value in 0..1000 {
                producer_queue.push(value);
            }
        });

        for expected in 0..1000 {
            assert_eq!(queue.pop(), expected);
        }
        producer.join().unwrap();
    }
}
