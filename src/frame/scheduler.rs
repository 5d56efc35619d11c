//! Start/stop render loop driven by the platform's repaint request.

use std::fmt::Display;

use web_time::{Duration, Instant};

use super::clock::FrameClock;

/// The platform's "run once before the next repaint" primitive.
pub trait FrameRequester {
    /// Ask for one more frame callback.
    fn request_frame(&self);
}

#[cfg(feature = "viewer")]
impl FrameRequester for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Timing handed to each frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame counter.
    pub index: u64,
    /// Time since the frame clock started.
    pub elapsed: Duration,
    /// Time since the previous frame (zero on the first).
    pub delta: Duration,
}

impl FrameTick {
    /// Elapsed time in seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Frame delta in seconds.
    #[must_use]
    pub fn delta_secs(&self) -> f64 {
        self.delta.as_secs_f64()
    }
}

/// What [`FrameScheduler::run_frame`] did.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameOutcome<E> {
    /// A request issued before the loop was stopped arrived; nothing ran.
    Idle,
    /// The body ran to completion.
    Completed,
    /// The body failed. The next frame (if running) is already requested.
    Failed(E),
}

/// Continuous render loop with start/stop and one-shot frames.
///
/// Each frame re-requests the next one *before* running its body, so a body
/// that fails never stops the loop. At most one request is in flight.
#[derive(Debug)]
pub struct FrameScheduler {
    clock: FrameClock,
    running: bool,
    in_flight: bool,
    one_shot: bool,
    frame_index: u64,
    last_elapsed: Option<Duration>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Stopped scheduler whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(FrameClock::start())
    }

    /// Stopped scheduler reading `clock`.
    #[must_use]
    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            clock,
            running: false,
            in_flight: false,
            one_shot: false,
            frame_index: 0,
            last_elapsed: None,
        }
    }

    /// The frame clock.
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Whether the continuous loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Start the continuous loop. Returns `false` if it was already running.
    pub fn start<R: FrameRequester + ?Sized>(&mut self, requester: &R) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.request(requester);
        log::debug!("frame loop started");
        true
    }

    /// Stop the continuous loop. A request already in flight runs nothing
    /// when it arrives. Returns `false` if the loop was not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        log::debug!("frame loop stopped after {} frames", self.frame_index);
        true
    }

    /// Ask for exactly one frame while the loop is stopped. Returns `false`
    /// when running, since the next frame is coming anyway.
    pub fn request_once<R: FrameRequester + ?Sized>(
        &mut self,
        requester: &R,
    ) -> bool {
        if self.running {
            return false;
        }
        self.one_shot = true;
        self.request(requester);
        true
    }

    /// Handle one frame callback at `now`.
    ///
    /// Order: schedule the next frame (when running), read the clock, run
    /// `body`. Body errors are logged and returned.
    ///
    /// While stopped, a callback this scheduler did not ask for (the
    /// platform repainting a damaged window) runs as a one-shot frame.
    pub fn run_frame<R, E, F>(
        &mut self,
        requester: &R,
        now: Instant,
        body: F,
    ) -> FrameOutcome<E>
    where
        R: FrameRequester + ?Sized,
        E: Display,
        F: FnOnce(FrameTick) -> Result<(), E>,
    {
        let requested = std::mem::take(&mut self.in_flight);
        let one_shot = std::mem::take(&mut self.one_shot);
        if !self.running && !one_shot && requested {
            return FrameOutcome::Idle;
        }
        if self.running {
            self.request(requester);
        }

        let tick = self.tick_at(now);
        match body(tick) {
            Ok(()) => FrameOutcome::Completed,
            Err(e) => {
                log::error!("frame {} failed: {e}", tick.index);
                FrameOutcome::Failed(e)
            }
        }
    }

    fn request<R: FrameRequester + ?Sized>(&mut self, requester: &R) {
        if !self.in_flight {
            requester.request_frame();
            self.in_flight = true;
        }
    }

    fn tick_at(&mut self, now: Instant) -> FrameTick {
        let elapsed = self.clock.elapsed_at(now);
        let delta = self
            .last_elapsed
            .map_or(Duration::ZERO, |prev| elapsed.saturating_sub(prev));
        self.last_elapsed = Some(elapsed);
        let index = self.frame_index;
        self.frame_index += 1;
        FrameTick {
            index,
            elapsed,
            delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingRequester {
        requests: Cell<u32>,
    }

    impl FrameRequester for CountingRequester {
        fn request_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    fn scheduler(t0: Instant) -> FrameScheduler {
        FrameScheduler::with_clock(FrameClock::start_at(t0))
    }

    fn ok(_: FrameTick) -> Result<(), String> {
        Ok(())
    }

    #[test]
    fn start_requests_one_frame() {
        let req = CountingRequester::default();
        let mut s = scheduler(Instant::now());
        assert!(s.start(&req));
        assert!(!s.start(&req));
        assert_eq!(req.requests.get(), 1);
    }

    #[test]
    fn next_frame_is_requested_before_body() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let _ = s.start(&req);

        let outcome = s.run_frame(&req, t0, |_| {
            assert_eq!(req.requests.get(), 2);
            Ok::<(), String>(())
        });
        assert_eq!(outcome, FrameOutcome::Completed);
    }

    #[test]
    fn failing_body_keeps_loop_alive() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let _ = s.start(&req);

        let outcome =
            s.run_frame(&req, t0, |_| Err::<(), _>("render failed".to_owned()));
        assert_eq!(outcome, FrameOutcome::Failed("render failed".to_owned()));
        assert_eq!(req.requests.get(), 2);

        let mut ran = false;
        let outcome = s.run_frame(&req, t0 + Duration::from_millis(16), |_| {
            ran = true;
            Ok::<(), String>(())
        });
        assert_eq!(outcome, FrameOutcome::Completed);
        assert!(ran);
        assert_eq!(req.requests.get(), 3);
    }

    #[test]
    fn stop_cancels_in_flight_frame() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let _ = s.start(&req);
        assert!(s.stop());
        assert!(!s.stop());

        let mut ran = false;
        let outcome = s.run_frame(&req, t0, |_| {
            ran = true;
            Ok::<(), String>(())
        });
        assert_eq!(outcome, FrameOutcome::Idle);
        assert!(!ran);
        assert_eq!(req.requests.get(), 1);
    }

    #[test]
    fn one_shot_runs_exactly_one_frame() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);

        assert!(s.request_once(&req));
        assert!(s.request_once(&req));
        assert_eq!(req.requests.get(), 1);

        assert_eq!(s.run_frame(&req, t0, ok), FrameOutcome::Completed);
        assert_eq!(req.requests.get(), 1);
        assert_eq!(s.frame_count(), 1);
        assert!(!s.is_running());
    }

    #[test]
    fn one_shots_chain_while_the_body_asks_for_more() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let mut pending = 3;

        let _ = s.request_once(&req);
        let mut frames = 0;
        while s.run_frame(&req, t0, ok) == FrameOutcome::Completed {
            frames += 1;
            pending -= 1;
            if pending > 0 {
                assert!(s.request_once(&req));
            } else {
                break;
            }
        }
        assert_eq!(frames, 3);
        assert_eq!(req.requests.get(), 3);
        assert!(!s.is_running());
    }

    #[test]
    fn unrequested_redraw_repaints_while_stopped() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let _ = s.start(&req);
        let _ = s.stop();

        // The request from before the stop is dropped.
        assert_eq!(s.run_frame(&req, t0, ok), FrameOutcome::Idle);

        // A later expose-style redraw still paints, without restarting.
        let mut ran = false;
        let outcome = s.run_frame(&req, t0 + Duration::from_millis(5), |_| {
            ran = true;
            Ok::<(), String>(())
        });
        assert_eq!(outcome, FrameOutcome::Completed);
        assert!(ran);
        assert_eq!(req.requests.get(), 1);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn one_shot_is_redundant_while_running() {
        let req = CountingRequester::default();
        let mut s = scheduler(Instant::now());
        let _ = s.start(&req);
        assert!(!s.request_once(&req));
        assert_eq!(req.requests.get(), 1);
    }

    #[test]
    fn ticks_carry_index_elapsed_and_delta() {
        let t0 = Instant::now();
        let req = CountingRequester::default();
        let mut s = scheduler(t0);
        let _ = s.start(&req);

        let mut ticks = Vec::new();
        for ms in [0, 16, 40] {
            let _ = s.run_frame(&req, t0 + Duration::from_millis(ms), |tick| {
                ticks.push(tick);
                Ok::<(), String>(())
            });
        }
        assert_eq!(ticks[0].index, 0);
        assert_eq!(ticks[0].delta, Duration::ZERO);
        assert_eq!(ticks[1].elapsed, Duration::from_millis(16));
        assert_eq!(ticks[1].delta, Duration::from_millis(16));
        assert_eq!(ticks[2].index, 2);
        assert_eq!(ticks[2].delta, Duration::from_millis(24));
        assert_eq!(ticks[2].elapsed_secs(), 0.04);
    }
}
