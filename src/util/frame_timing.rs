//! Smoothed frame rate for the title bar and logs.

use web_time::{Duration, Instant};

/// Smoothed FPS counter with a throttled reporting cadence.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Minimum spacing between reports
    report_interval: Duration,
    last_report: Option<Instant>,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl FrameTiming {
    /// Counter that reports at most once per `report_interval`.
    #[must_use]
    pub fn new(report_interval: Duration) -> Self {
        Self {
            last_frame: None,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    // 5% new value, 95% old value
            report_interval,
            last_report: None,
        }
    }

    /// Record a frame presented at `now`.
    pub fn record_frame_at(&mut self, now: Instant) {
        let Some(last) = self.last_frame.replace(now) else {
            return;
        };
        let frame_time = now.saturating_duration_since(last).as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Whether a report is due at `now`. Arms the next interval when it is.
    pub fn report_due(&mut self, now: Instant) -> bool {
        let due = self.last_report.is_none_or(|last| {
            now.saturating_duration_since(last) >= self.report_interval
        });
        if due {
            self.last_report = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_frames_converge_on_rate() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::default();
        for i in 0..2000 {
            timing.record_frame_at(t0 + Duration::from_millis(i * 10));
        }
        assert!((timing.fps() - 100.0).abs() < 0.5, "{}", timing.fps());
    }

    #[test]
    fn first_frame_only_sets_baseline() {
        let mut timing = FrameTiming::default();
        timing.record_frame_at(Instant::now());
        assert_eq!(timing.fps(), 60.0);
    }

    #[test]
    fn reports_are_throttled() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::new(Duration::from_millis(250));
        assert!(timing.report_due(t0));
        assert!(!timing.report_due(t0 + Duration::from_millis(100)));
        assert!(timing.report_due(t0 + Duration::from_millis(250)));
        assert!(!timing.report_due(t0 + Duration::from_millis(400)));
    }
}
