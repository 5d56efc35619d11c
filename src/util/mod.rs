//! Shared utilities: debounced callbacks and frame-rate bookkeeping.

pub mod debounce;
pub mod frame_timing;
