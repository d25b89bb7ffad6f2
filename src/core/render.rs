//=========================================================================
// Frame Handoff
//
// Double-buffered handoff between the render-producer (the animation
// thread writing whole frames) and the paint-consumer (the GUI thread's
// redraw callback).
//
// Exclusion table, same as a writer lock against two reader paths:
// - producer blit  ⟂ paint read, ⟂ clipboard-copy read
// - paint read and clipboard-copy read run concurrently
//
// Backpressure: a "displayed" gate seeded with one permit. `present`
// consumes it, the paint callback returns it — so the producer can never
// write frame N+1 before frame N was painted, and can optionally wait
// until frame N+1 itself has been displayed.
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use parking_lot::RwLock;

//=== Internal Dependencies ===============================================

use crate::core::sync::CloseableGate;

//=== Frame ===============================================================

/// One completed frame: an opaque ARGB pixel buffer.
///
/// The concurrency core treats this as a value to blit and hand over;
/// shape drawing, text layout and friends live with the embedder.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Frame {
    /// Creates a frame filled with opaque black.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "Frame width must be positive");
        assert!(height > 0, "Frame height must be positive");

        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw ARGB pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Fills the whole frame with one color.
    pub fn fill(&mut self, argb: u32) {
        self.pixels.fill(argb);
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, argb: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = argb;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Blits another frame of the same dimensions into this one.
    ///
    /// # Panics
    ///
    /// Panics on dimension mismatch; the handoff owns both buffers and
    /// never resizes them.
    pub fn copy_from(&mut self, other: &Frame) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "Frame dimensions must match"
        );
        self.pixels.copy_from_slice(&other.pixels);
    }
}

//=== FrameHandoff ========================================================

/// Hands completed frames from the render-producer to the paint-consumer.
pub struct FrameHandoff {
    buffer: RwLock<Frame>,
    displayed: CloseableGate,
}

impl FrameHandoff {
    //--- Construction -----------------------------------------------------

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RwLock::new(Frame::new(width, height)),
            // One permit: the very first present must not wait for a paint
            // that has not happened yet.
            displayed: CloseableGate::new(1),
        }
    }

    //--- Producer Side ----------------------------------------------------

    /// Publishes a completed frame.
    ///
    /// Blocks until the previously presented frame has been painted (or
    /// the handoff was closed), blits `frame` into the shared buffer under
    /// the write lock, and — when `wait_for_display` is set — blocks again
    /// until the paint callback has read this frame, so the caller cannot
    /// start mutating the next frame before the current one is on screen.
    ///
    /// The caller is responsible for requesting a repaint afterwards; the
    /// handoff itself knows nothing about the windowing system.
    pub fn present(&self, frame: &Frame, wait_for_display: bool) {
        self.displayed.acquire();
        self.displayed.drain();

        {
            let mut buffer = self.buffer.write();
            buffer.copy_from(frame);
        }

        trace!(target: "easel::render", "frame presented ({}x{})", frame.width(), frame.height());

        if wait_for_display {
            self.displayed.acquire();
            self.displayed.release();
        }
    }

    //--- Consumer Side ----------------------------------------------------

    /// Runs the paint sink against the current frame under the read lock,
    /// then signals the producer that the frame has been displayed.
    ///
    /// Called by the GUI thread's redraw callback. The sink must not call
    /// back into the handoff.
    pub fn paint(&self, sink: impl FnOnce(&Frame)) {
        {
            let buffer = self.buffer.read();
            sink(&buffer);
        }

        self.displayed.release();
    }

    /// Snapshots the current frame, e.g. for clipboard export. Runs
    /// concurrently with `paint`, excluded only against a producer blit.
    pub fn copy_frame(&self) -> Frame {
        self.buffer.read().clone()
    }

    //--- Shutdown ---------------------------------------------------------

    /// Unblocks any producer waiting in `present`, now and forever.
    /// Called by the window teardown path.
    pub fn close(&self) {
        self.displayed.close();
    }

    pub fn is_closed(&self) -> bool {
        self.displayed.is_closed()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
