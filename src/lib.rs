// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Real-time 3D viewport built on wgpu, with debounced resize sync and a
//! display-locked frame loop.
//!
//! Orbitview keeps a drawing surface, its backing resolution, and the camera
//! projection consistent with the space the host gives it, while a frame
//! scheduler animates a small scene graph once per display refresh.
//!
//! # Key entry points
//!
//! - [`engine::SceneEngine`] - owns the GPU context, renderer, and scene
//! - [`viewport::ViewportSizer`] - measures a host and sizes the surface
//! - [`util::debounce::Debounced`] - trailing-edge debounce for resize bursts
//! - [`frame::FrameScheduler`] - start/stop frame loop with one-shot frames
//! - [`options::Options`] - runtime configuration (display, camera,
//!   animation, scene, keybindings)
//!
//! # Frame order
//!
//! Each frame schedules its successor first, then updates orbit controls,
//! applies scene mutation (spins), refreshes the projection if the aspect
//! changed, and draws. Resize bursts collapse through the debouncer into a
//! single [`viewport::sync::ViewportSync::apply`] that resizes the surface
//! and updates the camera together.

pub mod camera;
pub mod engine;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::command::Command;
pub use engine::{FrameStatus, SceneEngine};
pub use error::OrbitError;
pub use input::{InputEvent, InputProcessor, KeyAction, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
pub use viewport::{ViewportSizer, ViewportState};
