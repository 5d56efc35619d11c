//! Viewport measurement and drawing-surface sizing.
//!
//! The viewport is described in logical (CSS-style) pixels plus a device
//! pixel ratio. [`ViewportSizer`] reads a [`ViewportHost`], clamps the
//! pixel ratio, and pushes the result into a [`DrawingSurface`], whose
//! backing buffer is `logical * pixel_ratio` physical pixels while its
//! displayed size stays logical.

/// Debounced-resize target bundling surface sizing and camera aspect sync.
pub mod sync;

pub use sync::{SyncReport, ViewportSync};

/// Lower bound applied to any pixel ratio, so the backing buffer never
/// collapses to zero for a non-degenerate viewport.
pub const MIN_PIXEL_RATIO: f64 = 0.25;

/// Measured viewport: logical content-box size plus clamped pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Device pixel ratio after clamping.
    pub pixel_ratio: f64,
}

impl ViewportState {
    /// Viewport of the given logical size and pixel ratio.
    #[must_use]
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Whether either dimension is zero (hidden or collapsed container).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Backing-buffer size in physical pixels.
    #[must_use]
    pub fn backing_size(&self) -> (u32, u32) {
        (
            to_backing(self.width, self.pixel_ratio),
            to_backing(self.height, self.pixel_ratio),
        )
    }
}

/// Scale a logical length to physical pixels.
pub(crate) fn to_backing(logical: u32, pixel_ratio: f64) -> u32 {
    (f64::from(logical) * pixel_ratio).round() as u32
}

/// Clamp a reported device pixel ratio to `[MIN_PIXEL_RATIO, max]`.
///
/// Non-finite or non-positive ratios (some hosts report 0 while a window is
/// minimized) are treated as 1.0.
#[must_use]
pub fn clamp_pixel_ratio(ratio: f64, max: f64) -> f64 {
    let ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    };
    ratio.clamp(MIN_PIXEL_RATIO, max.max(MIN_PIXEL_RATIO))
}

/// Something whose content box the viewport fills.
pub trait ViewportHost {
    /// Current content-box size in logical pixels.
    fn content_size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel, as reported by the platform.
    fn device_pixel_ratio(&self) -> f64;
}

/// A drawing surface with a backing resolution and a displayed size.
pub trait DrawingSurface {
    /// Set the backing-buffer pixel density relative to the logical size.
    fn set_pixel_density(&mut self, ratio: f64);

    /// Resize to `width` x `height` logical pixels. The backing buffer
    /// follows as `logical * density`.
    fn resize(&mut self, width: u32, height: u32);
}

#[cfg(feature = "viewer")]
impl ViewportHost for winit::window::Window {
    fn content_size(&self) -> (u32, u32) {
        let logical =
            self.inner_size().to_logical::<f64>(self.scale_factor());
        (logical.width.round() as u32, logical.height.round() as u32)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.scale_factor()
    }
}

/// Measures a [`ViewportHost`] and applies the result to a
/// [`DrawingSurface`].
#[derive(Debug, Clone)]
pub struct ViewportSizer {
    max_pixel_ratio: f64,
    applied: Option<ViewportState>,
}

impl ViewportSizer {
    /// Sizer that clamps pixel ratios to `max_pixel_ratio`.
    #[must_use]
    pub fn new(max_pixel_ratio: f64) -> Self {
        Self {
            max_pixel_ratio,
            applied: None,
        }
    }

    /// Upper bound for the pixel ratio.
    #[must_use]
    pub fn max_pixel_ratio(&self) -> f64 {
        self.max_pixel_ratio
    }

    /// Change the pixel-ratio bound. Takes effect on the next `measure`.
    pub fn set_max_pixel_ratio(&mut self, max_pixel_ratio: f64) {
        self.max_pixel_ratio = max_pixel_ratio;
    }

    /// The last state pushed to the surface.
    #[must_use]
    pub fn current(&self) -> Option<ViewportState> {
        self.applied
    }

    /// Read the host's content box and clamped pixel ratio.
    #[must_use]
    pub fn measure<H: ViewportHost + ?Sized>(&self, host: &H) -> ViewportState {
        let (width, height) = host.content_size();
        let pixel_ratio =
            clamp_pixel_ratio(host.device_pixel_ratio(), self.max_pixel_ratio);
        ViewportState {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Push `state` to `surface`. Returns `false` (and touches nothing) when
    /// `state` equals the last applied state.
    pub fn apply<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        state: ViewportState,
    ) -> bool {
        if self.applied == Some(state) {
            return false;
        }
        let previous = self.applied.replace(state);
        if previous.is_none_or(|p| p.pixel_ratio != state.pixel_ratio) {
            surface.set_pixel_density(state.pixel_ratio);
        }
        surface.resize(state.width, state.height);

        let (bw, bh) = state.backing_size();
        log::debug!(
            "viewport {}x{} @{:.2} (backing {bw}x{bh})",
            state.width,
            state.height,
            state.pixel_ratio,
        );
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{DrawingSurface, ViewportHost};

    /// Host with a settable content box.
    pub(crate) struct FakeHost {
        pub(crate) size: (u32, u32),
        pub(crate) ratio: f64,
    }

    impl ViewportHost for FakeHost {
        fn content_size(&self) -> (u32, u32) {
            self.size
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.ratio
        }
    }

    /// Surface that records every call it receives.
    #[derive(Default)]
    pub(crate) struct FakeSurface {
        pub(crate) size: (u32, u32),
        pub(crate) density: f64,
        pub(crate) resize_calls: Vec<(u32, u32)>,
        pub(crate) density_calls: Vec<f64>,
    }

    impl DrawingSurface for FakeSurface {
        fn set_pixel_density(&mut self, ratio: f64) {
            self.density = ratio;
            self.density_calls.push(ratio);
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resize_calls.push((width, height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeHost, FakeSurface};
    use super::*;

    #[test]
    fn pixel_ratio_is_clamped_to_max() {
        assert_eq!(clamp_pixel_ratio(3.0, 2.0), 2.0);
        assert_eq!(clamp_pixel_ratio(1.5, 2.0), 1.5);
        assert_eq!(clamp_pixel_ratio(0.0, 2.0), 1.0);
        assert_eq!(clamp_pixel_ratio(f64::NAN, 2.0), 1.0);
        assert_eq!(clamp_pixel_ratio(0.01, 2.0), MIN_PIXEL_RATIO);
        // A bogus max never inverts the clamp range.
        assert_eq!(clamp_pixel_ratio(1.0, 0.0), MIN_PIXEL_RATIO);
    }

    #[test]
    fn measure_reads_host_content_box() {
        let sizer = ViewportSizer::new(2.0);
        let host = FakeHost {
            size: (1280, 720),
            ratio: 3.0,
        };
        let state = sizer.measure(&host);
        assert_eq!(state, ViewportState::new(1280, 720, 2.0));
        assert_eq!(state.backing_size(), (2560, 1440));
    }

    #[test]
    fn apply_sets_density_then_size() {
        let mut sizer = ViewportSizer::new(2.0);
        let mut surface = FakeSurface::default();

        assert!(sizer.apply(&mut surface, ViewportState::new(800, 600, 1.5)));
        assert_eq!(surface.size, (800, 600));
        assert_eq!(surface.density, 1.5);
        assert_eq!(sizer.current(), Some(ViewportState::new(800, 600, 1.5)));
    }

    #[test]
    fn apply_is_idempotent() {
        let mut sizer = ViewportSizer::new(2.0);
        let mut surface = FakeSurface::default();
        let state = ViewportState::new(1024, 768, 1.0);

        assert!(sizer.apply(&mut surface, state));
        assert!(!sizer.apply(&mut surface, state));
        assert_eq!(surface.size, (1024, 768));
        assert_eq!(surface.resize_calls.len(), 1);
        assert_eq!(surface.density_calls.len(), 1);
    }

    #[test]
    fn size_change_keeps_density_untouched() {
        let mut sizer = ViewportSizer::new(2.0);
        let mut surface = FakeSurface::default();

        let _ = sizer.apply(&mut surface, ViewportState::new(800, 600, 2.0));
        let _ = sizer.apply(&mut surface, ViewportState::new(900, 600, 2.0));
        assert_eq!(surface.density_calls, vec![2.0]);
        assert_eq!(surface.resize_calls, vec![(800, 600), (900, 600)]);
    }

    #[test]
    fn degenerate_state_is_recorded() {
        let mut sizer = ViewportSizer::new(2.0);
        let mut surface = FakeSurface::default();
        let collapsed = ViewportState::new(0, 100, 1.0);

        assert!(collapsed.is_degenerate());
        assert!(sizer.apply(&mut surface, collapsed));
        assert_eq!(sizer.current(), Some(collapsed));
        assert_eq!(collapsed.backing_size(), (0, 100));
    }
}
