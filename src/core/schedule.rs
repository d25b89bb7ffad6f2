//=========================================================================
// Tick Scheduler
//
// Fixed-interval tick accounting off a shared wall clock.
//
// Two policies, selected at construction:
// - Drop: ticks that fall behind are counted and discarded — the render
//   loop skips stale frames instead of queuing a burst
// - CatchUp: every missed tick is granted; callers loop until `false`
//   and execute the backlog — simulation steps must never be skipped
//
// The target tick count is always re-derived from elapsed wall-clock
// time, never from accumulated sleep time, so accounting stays exact
// under arbitrary caller delay and jitter.
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::{Duration, Instant};

//=== External Dependencies ===============================================

use log::debug;

//=== TickPolicy ==========================================================

/// What to do with ticks whose wall-clock slot has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPolicy {
    /// Discard missed ticks, only count them.
    Drop,
    /// Grant every missed tick so the caller can catch up in a burst.
    CatchUp,
}

//=== TickScheduler =======================================================

/// Grants ticks at a fixed interval measured from construction time.
///
/// Accounting invariant: under the drop policy, once caught up,
/// `completed + dropped == floor(elapsed / interval)`; under catch-up,
/// `completed` eventually reaches that target (lagging is allowed, losing
/// a tick is not).
pub struct TickScheduler {
    interval: Duration,
    policy: TickPolicy,
    start: Instant,
    completed: u64,
    dropped: u64,
}

impl TickScheduler {
    //--- Construction -----------------------------------------------------

    /// Creates a scheduler whose first tick is due `interval` after now.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: Duration, policy: TickPolicy) -> Self {
        assert!(!interval.is_zero(), "Tick interval must be positive");

        Self {
            interval,
            policy,
            start: Instant::now(),
            completed: 0,
            dropped: 0,
        }
    }

    //--- Tick Accounting --------------------------------------------------

    /// Returns whether the caller should run one tick right now.
    ///
    /// Under [`TickPolicy::CatchUp`] call this in a loop until it returns
    /// `false` to execute every missed tick.
    pub fn should_run_tick(&mut self) -> bool {
        self.should_run_tick_at(Instant::now())
    }

    /// The wall-clock delay until the next integral tick boundary.
    /// Clamps at zero when a tick is already overdue.
    pub fn time_until_next_tick(&self) -> Duration {
        self.time_until_next_tick_at(Instant::now())
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    //--- Clock-Explicit Variants ------------------------------------------
    //
    // The public methods delegate here with `Instant::now()`; tests drive
    // these directly with a simulated clock.
    //
    pub(crate) fn should_run_tick_at(&mut self, now: Instant) -> bool {
        let target_total = self.target_total_at(now);
        let accounted = self.completed + self.dropped;

        if target_total <= accounted {
            // Every tick due so far has already been granted or dropped.
            return false;
        }

        let overdue = target_total - accounted - 1;
        if overdue > 0 && self.policy == TickPolicy::Drop {
            // Grant only the most recent due tick; the older ones are
            // stale frames nobody should draw.
            self.dropped += overdue;
            debug!(target: "easel::schedule", "dropped {} overdue ticks", overdue);
        }

        self.completed += 1;
        true
    }

    pub(crate) fn time_until_next_tick_at(&self, now: Instant) -> Duration {
        let accounted = self.completed + self.dropped;
        let next_boundary = self.start + interval_times(self.interval, accounted + 1);
        next_boundary.saturating_duration_since(now)
    }

    fn target_total_at(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_nanos() / self.interval.as_nanos()) as u64
    }

    #[cfg(test)]
    fn start(&self) -> Instant {
        self.start
    }
}

// `Duration * u32` would overflow the multiplier long before the nanosecond
// range runs out; multiply in u64 nanoseconds instead (~584 years of range).
fn interval_times(interval: Duration, count: u64) -> Duration {
    Duration::from_nanos((interval.as_nanos() as u64).saturating_mul(count))
}

//=========================================================================
// Unit Tests
//=========================================================================
