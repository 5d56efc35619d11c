//! Per-frame scheduling: a monotonic clock and a start/stop render loop
//! driven by the platform's "before next repaint" request.

pub mod clock;
pub mod scheduler;

pub use clock::FrameClock;
pub use scheduler::{FrameOutcome, FrameRequester, FrameScheduler, FrameTick};
