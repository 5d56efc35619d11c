//! Monotonic clock read once per frame.

use web_time::{Duration, Instant};

/// Monotonic elapsed-time counter.
///
/// Started once when the scene is built and never reset; every frame reads
/// the time elapsed since then.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    started: Instant,
}

impl FrameClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self::start_at(Instant::now())
    }

    /// Start a clock at `started`.
    #[must_use]
    pub fn start_at(started: Instant) -> Self {
        Self { started }
    }

    /// When the clock was started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started
    }

    /// Time since start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Time between start and `now`. Instants before the start read as zero.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_measured_from_start() {
        let t0 = Instant::now();
        let clock = FrameClock::start_at(t0);
        assert_eq!(clock.elapsed_at(t0), Duration::ZERO);
        assert_eq!(
            clock.elapsed_at(t0 + Duration::from_millis(1500)),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn earlier_instant_saturates_to_zero() {
        let t0 = Instant::now();
        let clock = FrameClock::start_at(t0 + Duration::from_secs(1));
        assert_eq!(clock.elapsed_at(t0), Duration::ZERO);
    }
}
