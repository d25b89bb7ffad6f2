//=========================================================================
// Event Derivation Filters
//
// Stateful transforms between the raw listener callbacks and the
// sequencer:
// - `KeyDownFilter` — debounces OS auto-repeat into single key-down events
// - `MouseClickFilter` — synthesizes click events from a down/up pair
//   within a spatial tolerance
//
// The filters decide *whether* to emit; the platform callback constructs
// and pushes the actual events, keeping the producer side O(1) with no
// lock held across the decision.
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::KeyCode;

//=== KeyDownFilter =======================================================

/// Suppresses repeated "pressed" callbacks for a key that is already held.
///
/// The OS delivers auto-repeat presses while a key stays down; only the
/// first press of each hold should become a key-down event. Entries are
/// created on first press and live as long as the filter.
#[derive(Debug, Default)]
pub struct KeyDownFilter {
    held: HashMap<KeyCode, bool>,
}

impl KeyDownFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw press. Returns `true` exactly when a key-down event
    /// should be emitted, i.e. the key was not already held.
    pub fn key_pressed(&mut self, key: KeyCode) -> bool {
        if self.is_held(key) {
            return false;
        }
        self.held.insert(key, true);
        true
    }

    /// Records a raw release. Never emits anything itself; the raw key-up
    /// passes through unfiltered at the caller level.
    pub fn key_released(&mut self, key: KeyCode) {
        self.held.insert(key, false);
    }

    fn is_held(&self, key: KeyCode) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }
}

//=== MouseClickFilter ====================================================

/// Maximum distance in pixels between press and release for the pair to
/// count as a click. Compared via squared Euclidean distance, strictly:
/// exactly at the boundary is not a click.
pub const CLICK_TOLERANCE: i32 = 38;

const CLICK_TOLERANCE_SQUARED: i64 = (CLICK_TOLERANCE as i64) * (CLICK_TOLERANCE as i64);

/// Synthesizes click events from press/release pairs.
///
/// A press is remembered as the pending down. Movement beyond the
/// tolerance cancels it (the gesture is a drag, not a click). A release
/// within tolerance of a still-pending down emits exactly one click.
#[derive(Debug, Default)]
pub struct MouseClickFilter {
    pending_down: Option<(i32, i32)>,
}

impl MouseClickFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw press at the given canvas position.
    pub fn mouse_pressed(&mut self, x: i32, y: i32) {
        self.pending_down = Some((x, y));
    }

    /// Records a raw move. Cancels the pending down once the cursor has
    /// strayed beyond the tolerance.
    pub fn mouse_moved(&mut self, x: i32, y: i32) {
        if let Some((down_x, down_y)) = self.pending_down {
            if squared_distance(down_x, down_y, x, y) > CLICK_TOLERANCE_SQUARED {
                self.pending_down = None;
            }
        }
    }

    /// Records a raw release. Returns `true` exactly when a click event
    /// should be emitted: a pending down exists and the release is within
    /// tolerance of it.
    pub fn mouse_released(&mut self, x: i32, y: i32) -> bool {
        match self.pending_down.take() {
            Some((down_x, down_y)) => {
                squared_distance(down_x, down_y, x, y) < CLICK_TOLERANCE_SQUARED
            }
            None => false,
        }
    }
}

fn squared_distance(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    let dx = (ax - bx) as i64;
    let dy = (ay - by) as i64;
    dx * dx + dy * dy
}

//=========================================================================
// Unit Tests
//=========================================================================
