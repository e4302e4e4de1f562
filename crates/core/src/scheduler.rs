//! Seam over the host's animation-frame callback.
//!
//! A controller submits one frame request at a time and resubmits from
//! inside its own tick while it is running. Cancelling only drops the
//! pending request; a tick that is already executing always finishes.

use std::fmt::Debug;

/// Host scheduler for per-frame callbacks.
pub trait FrameScheduler {
    type Handle: Copy + Eq + Debug;

    /// Requests one callback for the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Cancels a request that has not fired yet.
    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Monotonic clock in milliseconds, on the same timeline as the
    /// timestamps passed to ticks.
    fn now_ms(&self) -> f64;
}
