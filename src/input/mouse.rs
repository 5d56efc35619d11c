use web_time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Detects double clicks from a stream of non-drag button releases.
pub(crate) struct ClickTracker {
    last_click: Option<Instant>,
}

impl ClickTracker {
    pub(crate) fn new() -> Self {
        Self { last_click: None }
    }

    /// Record a click at `now`. Returns `true` when it completes a double
    /// click; the pair is then consumed so a third click starts over.
    pub(crate) fn click_at(&mut self, now: Instant) -> bool {
        match self.last_click.take() {
            Some(last)
                if now.saturating_duration_since(last)
                    < DOUBLE_CLICK_THRESHOLD =>
            {
                true
            }
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }

    /// Forget any half-finished double click (after a drag).
    pub(crate) fn reset(&mut self) {
        self.last_click = None;
    }
}
