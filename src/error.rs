//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the orbitview crate.
#[derive(Debug)]
pub enum OrbitError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// The expected drawing surface element does not exist in the host.
    MissingSurface(String),
    /// Failed to acquire or present a frame from the surface.
    Surface(wgpu::SurfaceError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl OrbitError {
    /// Whether the surface must be reconfigured before the next frame can
    /// be acquired.
    #[must_use]
    pub fn is_surface_lost(&self) -> bool {
        matches!(
            self,
            Self::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

impl fmt::Display for OrbitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::MissingSurface(id) => {
                write!(f, "drawing surface `{id}` not found")
            }
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for OrbitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for OrbitError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<wgpu::SurfaceError> for OrbitError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<std::io::Error> for OrbitError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_need_reconfigure() {
        assert!(OrbitError::Surface(wgpu::SurfaceError::Lost).is_surface_lost());
        assert!(
            OrbitError::Surface(wgpu::SurfaceError::Outdated).is_surface_lost()
        );
        assert!(
            !OrbitError::Surface(wgpu::SurfaceError::Timeout).is_surface_lost()
        );
        assert!(!OrbitError::Viewer("boom".into()).is_surface_lost());
    }

    #[test]
    fn missing_surface_names_the_element() {
        let err = OrbitError::MissingSurface("canvas".into());
        assert_eq!(err.to_string(), "drawing surface `canvas` not found");
    }
}
