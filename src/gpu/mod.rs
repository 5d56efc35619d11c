//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable per-frame buffers,
//! depth targets, and shared pipeline boilerplate.

/// Per-frame vertex and instance buffers that grow on demand.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate helpers for the scene pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment sized to the surface.
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
