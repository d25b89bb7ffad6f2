//=========================================================================
// Gate
//
// Counting wait-and-signal primitive used throughout the event pipeline.
//
// Two roles:
// - Counting gate (initial permits = 0): one permit per pushed item, one
//   consumed per pop. Turns the non-blocking ring queue into a blocking
//   producer/consumer channel.
// - Capacity-1 gate: a hand-over-hand mutex. Where the gate would guard
//   data directly this crate uses a data-owning `Mutex` instead; the role
//   is still supported and tested here.
//
// `CloseableGate` adds out-of-band shutdown: the base primitive has no
// timeout, so teardown paths close the gate to unblock waiters.
//=========================================================================

//=== External Dependencies ===============================================

use parking_lot::{Condvar, Mutex};

//=== Gate ================================================================

/// Integer permit count with blocking acquire and wake-one release.
pub struct Gate {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Gate {
    //--- Construction -----------------------------------------------------

    /// Creates a gate holding `initial_permits` permits.
    pub fn new(initial_permits: usize) -> Self {
        Self {
            permits: Mutex::new(initial_permits),
            available: Condvar::new(),
        }
    }

    //--- Permit Operations ------------------------------------------------

    /// Blocks until a permit is available, then consumes one.
    ///
    /// There is no timeout. A blocked acquirer is released only by
    /// `release` on another thread; shutdown paths that must unblock a
    /// waiter use [`CloseableGate`] instead.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Adds one permit and wakes at most one waiter.
    pub fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        drop(permits);

        self.available.notify_one();
    }

    /// Consumes a permit if one is available, without blocking.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Returns whether a permit is currently available, without consuming.
    pub fn can_acquire(&self) -> bool {
        *self.permits.lock() > 0
    }

    /// Removes all currently available permits.
    pub fn drain(&self) {
        *self.permits.lock() = 0;
    }
}

//=== CloseableGate =======================================================

/// A [`Gate`] whose blocked acquirers can be released out-of-band.
///
/// Once closed, every current and future `acquire` returns immediately
/// without consuming a permit. Used by the frame handoff so a producer
/// blocked on "wait for display" does not hang when the window is torn
/// down before the paint callback ever runs.
pub struct CloseableGate {
    permits: Mutex<GateState>,
    available: Condvar,
}

struct GateState {
    permits: usize,
    closed: bool,
}

impl CloseableGate {
    pub fn new(initial_permits: usize) -> Self {
        Self {
            permits: Mutex::new(GateState {
                permits: initial_permits,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available or the gate is closed.
    pub fn acquire(&self) {
        let mut state = self.permits.lock();
        while state.permits == 0 && !state.closed {
            self.available.wait(&mut state);
        }
        if !state.closed {
            state.permits -= 1;
        }
    }

    /// Adds one permit and wakes at most one waiter.
    pub fn release(&self) {
        let mut state = self.permits.lock();
        state.permits += 1;
        drop(state);

        self.available.notify_one();
    }

    /// Removes all currently available permits.
    pub fn drain(&self) {
        self.permits.lock().permits = 0;
    }

    /// Closes the gate, releasing all current and future acquirers.
    pub fn close(&self) {
        let mut state = self.permits.lock();
        state.closed = true;
        drop(state);

        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.lock().closed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
