use super::{DrawingSurface, ViewportSizer, ViewportState};
use crate::camera::{sync_aspect, AspectUpdate, Camera};

/// Result of one [`ViewportSync::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncReport {
    /// Whether the surface was resized.
    pub resized: bool,
    /// What happened to the camera aspect ratio.
    pub aspect: AspectUpdate,
}

/// Surface sizing followed by camera aspect sync: the work a debounced
/// resize performs.
#[derive(Debug, Clone)]
pub struct ViewportSync {
    sizer: ViewportSizer,
}

impl ViewportSync {
    /// Sync clamping pixel ratios to `max_pixel_ratio`.
    #[must_use]
    pub fn new(max_pixel_ratio: f64) -> Self {
        Self {
            sizer: ViewportSizer::new(max_pixel_ratio),
        }
    }

    /// The underlying sizer.
    #[must_use]
    pub fn sizer(&self) -> &ViewportSizer {
        &self.sizer
    }

    /// Mutable access to the underlying sizer.
    pub fn sizer_mut(&mut self) -> &mut ViewportSizer {
        &mut self.sizer
    }

    /// The last applied viewport.
    #[must_use]
    pub fn current(&self) -> Option<ViewportState> {
        self.sizer.current()
    }

    /// Resize `surface` to `state` and update `camera`'s aspect ratio.
    ///
    /// The camera is only touched when the surface actually changed; an
    /// unchanged viewport is a no-op for both.
    pub fn apply<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        camera: &mut Camera,
        state: ViewportState,
    ) -> SyncReport {
        let resized = self.sizer.apply(surface, state);
        let aspect = if resized {
            sync_aspect(camera, state.width, state.height)
        } else {
            AspectUpdate::Unchanged
        };
        SyncReport { resized, aspect }
    }
}

#[cfg(test)]
mod tests {
    use web_time::{Duration, Instant};

    use super::*;
    use crate::util::debounce::Debounced;
    use crate::viewport::testing::FakeSurface;

    struct Harness {
        sync: ViewportSync,
        surface: FakeSurface,
        camera: Camera,
        aspect_updates: Vec<(Instant, f32)>,
        now: Instant,
    }

    impl Harness {
        fn new(now: Instant) -> Self {
            Self {
                sync: ViewportSync::new(2.0),
                surface: FakeSurface::default(),
                camera: Camera::new(75.0, 1.0, 0.1, 1000.0),
                aspect_updates: Vec::new(),
                now,
            }
        }
    }

    fn on_resize(h: &mut Harness, state: ViewportState) -> SyncReport {
        let report = h.sync.apply(&mut h.surface, &mut h.camera, state);
        if let AspectUpdate::Applied { aspect } = report.aspect {
            h.aspect_updates.push((h.now, aspect));
        }
        report
    }

    #[test]
    fn startup_sync_sets_aspect_before_first_frame() {
        let mut h = Harness::new(Instant::now());
        let report = on_resize(&mut h, ViewportState::new(800, 600, 1.0));
        assert!(report.resized);
        assert_eq!(h.camera.aspect(), 800.0 / 600.0);
        assert!(h.camera.refresh_projection());
    }

    #[test]
    fn unchanged_viewport_touches_nothing() {
        let mut h = Harness::new(Instant::now());
        let state = ViewportState::new(800, 600, 1.0);
        let _ = on_resize(&mut h, state);
        let _ = h.camera.refresh_projection();

        let report = on_resize(&mut h, state);
        assert!(!report.resized);
        assert_eq!(report.aspect, AspectUpdate::Unchanged);
        assert_eq!(h.surface.resize_calls.len(), 1);
        assert!(!h.camera.is_projection_dirty());
    }

    #[test]
    fn burst_of_resizes_applies_once_after_window() {
        let t0 = Instant::now();
        let delay = Duration::from_millis(250);
        let mut h = Harness::new(t0);
        let _ = on_resize(&mut h, ViewportState::new(800, 600, 1.0));
        h.surface.resize_calls.clear();
        h.aspect_updates.clear();

        let mut resize = Debounced::new(delay, on_resize);
        let events = [
            (t0, ViewportState::new(1024, 768, 1.0)),
            (t0 + Duration::from_millis(10), ViewportState::new(1600, 900, 1.0)),
            (t0 + Duration::from_millis(20), ViewportState::new(1920, 1080, 1.0)),
        ];
        for (at, state) in events {
            let _ = resize.trigger_at(at, state);
        }
        let last = t0 + Duration::from_millis(20);

        // Frames during the window still see the old viewport.
        let mut now = t0;
        while now < last + delay {
            h.now = now;
            assert!(resize.poll_at(now, &mut h).is_none());
            assert_eq!(h.camera.aspect(), 800.0 / 600.0);
            now += Duration::from_millis(5);
        }

        h.now = last + delay;
        let report = resize.poll_at(last + delay, &mut h);
        assert!(report.is_some_and(|r| r.resized));

        assert_eq!(h.surface.resize_calls, vec![(1920, 1080)]);
        assert_eq!(h.aspect_updates, vec![(last + delay, 1920.0 / 1080.0)]);
        assert_eq!(h.camera.aspect(), 1920.0 / 1080.0);

        assert!(resize
            .poll_at(last + Duration::from_secs(5), &mut h)
            .is_none());
        assert_eq!(h.surface.resize_calls.len(), 1);
    }

    #[test]
    fn collapsed_container_keeps_last_valid_aspect() {
        let mut h = Harness::new(Instant::now());
        let _ = on_resize(&mut h, ViewportState::new(1280, 720, 1.0));
        let valid = h.camera.aspect();
        let _ = h.camera.refresh_projection();

        let collapsed = ViewportState::new(0, 100, 1.0);
        let report = on_resize(&mut h, collapsed);

        assert!(report.resized);
        assert_eq!(report.aspect, AspectUpdate::Degenerate);
        assert_eq!(h.camera.aspect(), valid);
        assert!(!h.camera.is_projection_dirty());
        assert!(h.camera.projection().is_finite());
        assert!(h.sync.current().is_some_and(|v| v.is_degenerate()));
    }
}
