//! Perspective camera, viewport aspect synchronization, and orbit controls.

/// Damped orbit controller applying pointer input once per frame.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;
/// Aspect-ratio synchronization with the viewport.
pub mod sync;

pub use self::controller::OrbitController;
pub use self::core::{Camera, CameraUniform};
pub use self::sync::{sync_aspect, AspectUpdate};
