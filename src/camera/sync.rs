//! Keeps the camera aspect ratio in step with the viewport.

use super::core::Camera;

/// What [`sync_aspect`] did to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AspectUpdate {
    /// The aspect ratio changed and the projection was marked dirty.
    Applied {
        /// The new aspect ratio.
        aspect: f32,
    },
    /// The viewport already matched the camera; nothing changed.
    Unchanged,
    /// Zero-sized viewport; the last valid aspect ratio was kept.
    Degenerate,
}

/// Set `camera`'s aspect ratio to `width / height`.
///
/// A zero dimension (hidden or collapsed container) would produce an
/// infinite or NaN aspect and poison every later projection, so the camera
/// keeps its previous aspect and a diagnostic is logged instead.
pub fn sync_aspect(camera: &mut Camera, width: u32, height: u32) -> AspectUpdate {
    if width == 0 || height == 0 {
        log::warn!(
            "skipping aspect update for degenerate viewport {width}x{height}; \
             keeping {:.4}",
            camera.aspect()
        );
        return AspectUpdate::Degenerate;
    }
    let aspect = width as f32 / height as f32;
    if camera.set_aspect(aspect) {
        AspectUpdate::Applied { aspect }
    } else {
        AspectUpdate::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(75.0, 1.0, 0.1, 1000.0)
    }

    #[test]
    fn aspect_is_exact_division() {
        let sizes = [
            (1, 1),
            (800, 600),
            (1920, 1080),
            (1080, 1920),
            (3, 7),
            (4096, 1),
            (1, 4096),
            (1366, 768),
            (2560, 1440),
        ];
        for (w, h) in sizes {
            let mut cam = Camera::new(75.0, 0.5, 0.1, 1000.0);
            let _ = sync_aspect(&mut cam, w, h);
            assert_eq!(cam.aspect(), w as f32 / h as f32, "{w}x{h}");
        }
    }

    #[test]
    fn applied_marks_projection_dirty() {
        let mut cam = camera();
        let update = sync_aspect(&mut cam, 1920, 1080);
        assert_eq!(
            update,
            AspectUpdate::Applied {
                aspect: 1920.0 / 1080.0
            }
        );
        assert!(cam.is_projection_dirty());
    }

    #[test]
    fn unchanged_aspect_leaves_projection_clean() {
        let mut cam = camera();
        assert_eq!(sync_aspect(&mut cam, 500, 500), AspectUpdate::Unchanged);
        assert!(!cam.is_projection_dirty());
    }

    #[test]
    fn zero_height_keeps_previous_aspect() {
        let mut cam = camera();
        let _ = sync_aspect(&mut cam, 1600, 900);
        let valid = cam.aspect();
        let _ = cam.refresh_projection();

        assert_eq!(sync_aspect(&mut cam, 1600, 0), AspectUpdate::Degenerate);
        assert_eq!(cam.aspect(), valid);
        assert!(cam.aspect().is_finite());
        assert!(!cam.is_projection_dirty());
    }

    #[test]
    fn zero_width_keeps_previous_aspect() {
        let mut cam = camera();
        let _ = sync_aspect(&mut cam, 640, 480);
        assert_eq!(sync_aspect(&mut cam, 0, 100), AspectUpdate::Degenerate);
        assert_eq!(cam.aspect(), 640.0 / 480.0);
    }
}
