//=========================================================================
// Synchronization Primitives
//
// The foundation of the event pipeline:
// - `RingQueue` — growable circular buffer (grow instead of block)
// - `Gate` / `CloseableGate` — counting wait-and-signal primitive
// - `ConcurrentQueue` — the two combined into a blocking FIFO channel
//=========================================================================

mod concurrent_queue;
mod gate;
mod ring_queue;

pub use concurrent_queue::ConcurrentQueue;
pub use gate::{CloseableGate, Gate};
pub use ring_queue::RingQueue;
