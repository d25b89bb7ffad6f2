//=========================================================================
// Ring Queue
//
// Growable circular buffer backing the event pipeline.
//
// Responsibilities:
// - FIFO storage addressed as `(offset + index) % capacity`
// - Grow by doubling instead of blocking or failing on push
// - Fail fast on empty pop (callers establish non-emptiness first)
//
// Notes:
// This structure is not synchronized. `ConcurrentQueue` wraps it with a
// lock and a counting gate to form the blocking producer/consumer channel.
//=========================================================================

//=== RingQueue ===========================================================

/// Growable ring buffer with FIFO semantics.
///
/// `push` never blocks and never fails: when the buffer is full the
/// capacity is doubled, copying the two wrapped segments back into natural
/// order. `pop` on an empty queue is a caller bug and panics — the blocking
/// layer above guarantees non-emptiness before popping.
pub struct RingQueue<T> {
    slots: Box<[Option<T>]>,
    offset: usize,
    len: usize,
}

impl<T> RingQueue<T> {
    //--- Construction -----------------------------------------------------

    /// Creates a queue with the given initial capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Initial capacity must be larger than zero");

        Self {
            slots: Self::allocate(capacity),
            offset: 0,
            len: 0,
        }
    }

    //--- Queue Operations -------------------------------------------------

    /// Appends an element at the tail, doubling the capacity if full.
    pub fn push(&mut self, element: T) {
        if self.is_full() {
            self.double_capacity();
        }

        let slot = (self.offset + self.len) % self.capacity();
        self.slots[slot] = Some(element);
        self.len += 1;
    }

    /// Removes and returns the oldest element.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Use the blocking layer above if the
    /// producer may not have pushed yet.
    pub fn pop(&mut self) -> T {
        let element = self.slots[self.offset]
            .take()
            .expect("Cannot pop an element from an empty queue");

        self.offset += 1;
        self.len -= 1;

        // Reset the offset when the queue drains or the offset wraps to a
        // capacity boundary. Not required for correctness (wrap-around
        // indexing handles any offset), but keeps the state readable.
        if self.is_empty() {
            self.offset = 0;
        } else {
            self.offset %= self.capacity();
        }

        element
    }

    /// Returns a reference to the oldest element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.slots[self.offset].as_ref()
    }

    //--- Accessors --------------------------------------------------------

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    // Doubles the backing storage, copying the wrapped tail segment
    // `[offset..capacity)` first and the head segment `[0..offset)` after
    // it so the new buffer starts in natural order at offset zero.
    fn double_capacity(&mut self) {
        let old_capacity = self.capacity();
        let mut new_slots = Self::allocate(old_capacity * 2);

        for index in 0..self.len {
            let slot = (self.offset + index) % old_capacity;
            new_slots[index] = self.slots[slot].take();
        }

        self.slots = new_slots;
        self.offset = 0;
    }

    fn allocate(capacity: usize) -> Box<[Option<T>]> {
        (0..capacity).map(|_| None).collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_fifo_order() {
        let mut queue = RingQueue::new(8);
        for value in 0..5 {
            queue.push(value);
        }

        for expected in 0..5 {
            assert_eq!(queue.pop(), expected);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut queue = RingQueue::new(4);
        queue.push("first");
        queue.push("second");

        assert_eq!(queue.peek(), Some(&"first"));
        assert_eq!(queue.peek(), Some(&"first"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), "first");
    }

    #[test]
    fn peek_on_empty_returns_none() {
        let queue: RingQueue<i32> = RingQueue::new(4);
        assert_eq!(queue.peek(), None);
    }

    #[test]
    fn growth_preserves_order() {
        let mut queue = RingQueue::new(4);
        for value in 0..20 {
            queue.push(value);
        }

        assert!(queue.capacity() >= 20);
        for expected in 0..20 {
            assert_eq!(queue.pop(), expected);
        }
    }

    #[test]
    fn growth_with_wrapped_offset_preserves_order() {
        // Force a non-zero offset before growing: push 4, pop 2, then push
        // past the capacity so the live elements wrap around the boundary.
        let mut queue = RingQueue::new(4);
        for value in 0..4 {
            queue.push(value);
        }
        assert_eq!(queue.pop(), 0);
        assert_eq!(queue.pop(), 1);

        for value in 4..22 {
            queue.push(value);
        }

        for expected in 2..22 {
            assert_eq!(queue.pop(), expected);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn growth_from_capacity_one() {
        let mut queue = RingQueue::new(1);
        for value in 0..9 {
            queue.push(value);
        }
        for expected in 0..9 {
            assert_eq!(queue.pop(), expected);
        }
    }

    #[test]
    fn offset_resets_after_drain() {
        let mut queue = RingQueue::new(4);
        queue.push(1);
        queue.push(2);
        queue.pop();
        queue.pop();

        assert_eq!(queue.offset, 0);
    }

    #[test]
    fn interleaved_push_pop_wraps_correctly() {
        let mut queue = RingQueue::new(3);
        let mut next_in = 0;
        let mut next_out = 0;

        for _ in 0..50 {
            queue.push(next_in);
            next_in += 1;
            queue.push(next_in);
            next_in += 1;
            assert_eq!(queue.pop(), next_out);
            next_out += 1;
        }

        while !queue.is_empty() {
            assert_eq!(queue.pop(), next_out);
            next_out += 1;
        }
        assert_eq!(next_out, next_in);
    }

    #[test]
    #[should_panic(expected = "empty queue")]
    fn pop_on_empty_panics() {
        let mut queue: RingQueue<i32> = RingQueue::new(4);
        queue.pop();
    }

    #[test]
    #[should_panic(expected = "larger than zero")]
    fn zero_capacity_is_rejected() {
        let _ = RingQueue::<i32>::new(0);
    }
}
