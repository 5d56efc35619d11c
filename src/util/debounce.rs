//! Trailing-edge debouncing for bursty host events.
//!
//! A [`Debounced`] wrapper owns one callback and a single pending-invocation
//! slot. Every [`trigger`](Debounced::trigger) replaces whatever was pending
//! with a fresh deadline one full delay window away, so a burst of triggers
//! collapses into exactly one callback run, `delay` after the last trigger.
//!
//! The wrapper never runs the callback from inside `trigger`. The host event
//! loop calls [`poll`](Debounced::poll) on a later turn (typically from
//! `about_to_wait`, sleeping until [`next_deadline`](Debounced::next_deadline)
//! in between), which is when the deferred work actually executes.
//!
//! ```
//! use orbitview::util::debounce::Debounced;
//! use web_time::{Duration, Instant};
//!
//! let mut resize = Debounced::new(
//!     Duration::from_millis(250),
//!     |log: &mut Vec<(u32, u32)>, size: (u32, u32)| log.push(size),
//! );
//! let t0 = Instant::now();
//! let mut log = Vec::new();
//! let _ = resize.trigger_at(t0, (800, 600));
//! let _ = resize.trigger_at(t0 + Duration::from_millis(10), (1920, 1080));
//! assert!(resize.poll_at(t0 + Duration::from_millis(100), &mut log).is_none());
//! assert!(resize.poll_at(t0 + Duration::from_millis(260), &mut log).is_some());
//! assert_eq!(log, vec![(1920, 1080)]);
//! ```

use web_time::{Duration, Instant};

/// Identifier of one scheduled invocation of a debounced callback.
///
/// Handles are unique per wrapper and increase monotonically; a newer
/// trigger always yields a handle that compares greater than the one it
/// superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// The single outstanding invocation of a [`Debounced`] wrapper.
struct Pending<A> {
    handle: TimerHandle,
    deadline: Instant,
    args: A,
}

/// A callback wrapped with a trailing-edge debounce window.
///
/// `F` is invoked as `callback(ctx, args)` where `ctx` is supplied by the
/// caller of [`poll`](Self::poll). Passing the mutable context at poll time
/// keeps the wrapper free of borrowed state, so it can live next to the
/// thing it mutates (e.g. the render engine) inside one event-loop handler.
pub struct Debounced<A, F> {
    callback: F,
    delay: Duration,
    pending: Option<Pending<A>>,
    next_id: u64,
}

impl<A, F> Debounced<A, F> {
    /// Wrap `callback` with a debounce window of `delay`.
    #[must_use]
    pub fn new(delay: Duration, callback: F) -> Self {
        Self {
            callback,
            delay,
            pending: None,
            next_id: 0,
        }
    }

    /// The debounce window.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the debounce window. Applies from the next trigger on; an
    /// already pending invocation keeps its deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule the callback `delay` from now, cancelling anything pending.
    pub fn trigger(&mut self, args: A) -> TimerHandle {
        self.trigger_at(Instant::now(), args)
    }

    /// Schedule the callback `delay` after `now`, cancelling anything
    /// pending. The latest `args` win.
    pub fn trigger_at(&mut self, now: Instant, args: A) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let superseded = self.pending.replace(Pending {
            handle,
            deadline: now + self.delay,
            args,
        });
        if let Some(prev) = superseded {
            log::trace!("debounce: {:?} superseded by {:?}", prev.handle, handle);
        }
        handle
    }

    /// Drop the pending invocation, if any, without running it.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|p| p.handle)
    }

    /// Handle of the pending invocation, if one is scheduled.
    #[must_use]
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending.as_ref().map(|p| p.handle)
    }

    /// Whether an invocation is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending invocation becomes due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Run the pending invocation if its deadline has passed.
    pub fn poll<C, R>(&mut self, ctx: &mut C) -> Option<R>
    where
        F: FnMut(&mut C, A) -> R,
    {
        self.poll_at(Instant::now(), ctx)
    }

    /// Run the pending invocation if it is due at `now`.
    ///
    /// The slot is cleared before the callback runs, so a callback that
    /// reports failure is not retried and does not re-arm the timer.
    pub fn poll_at<C, R>(&mut self, now: Instant, ctx: &mut C) -> Option<R>
    where
        F: FnMut(&mut C, A) -> R,
    {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        Some((self.callback)(ctx, pending.args))
    }

    /// Run the pending invocation immediately, regardless of its deadline.
    pub fn flush<C, R>(&mut self, ctx: &mut C) -> Option<R>
    where
        F: FnMut(&mut C, A) -> R,
    {
        let pending = self.pending.take()?;
        Some((self.callback)(ctx, pending.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<(Instant, (u32, u32))>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recorder(
        delay: Duration,
    ) -> Debounced<(u32, u32), impl FnMut(&mut (Instant, Log), (u32, u32))>
    {
        Debounced::new(delay, |ctx: &mut (Instant, Log), size: (u32, u32)| {
            let now = ctx.0;
            ctx.1.push((now, size));
        })
    }

    /// Poll every millisecond from `from` to `to` inclusive, feeding the
    /// simulated clock through the context.
    fn drive<F>(
        debounced: &mut Debounced<(u32, u32), F>,
        ctx: &mut (Instant, Log),
        from: Instant,
        to: Instant,
    ) where
        F: FnMut(&mut (Instant, Log), (u32, u32)),
    {
        let mut now = from;
        while now <= to {
            ctx.0 = now;
            let _ = debounced.poll_at(now, ctx);
            now += ms(1);
        }
    }

    #[test]
    fn trigger_never_runs_callback_synchronously() {
        let t0 = Instant::now();
        let mut d = recorder(ms(250));
        let mut ctx = (t0, Log::new());

        let _ = d.trigger_at(t0, (1, 1));
        assert!(ctx.1.is_empty());
        assert!(d.poll_at(t0, &mut ctx).is_none());
        assert!(ctx.1.is_empty());
        assert!(d.is_pending());
    }

    #[test]
    fn burst_collapses_to_one_call_after_last_trigger() {
        let t0 = Instant::now();
        let mut d = recorder(ms(250));
        let mut ctx = (t0, Log::new());

        for (i, size) in [(800, 600), (1200, 800), (1600, 900), (1920, 1080)]
            .into_iter()
            .enumerate()
        {
            let _ = d.trigger_at(t0 + ms(10 * i as u64), size);
        }
        let last = t0 + ms(30);

        drive(&mut d, &mut ctx, t0, t0 + ms(1000));

        assert_eq!(ctx.1.len(), 1);
        let (fired_at, size) = ctx.1[0];
        assert_eq!(size, (1920, 1080));
        assert!(fired_at >= last + ms(250));
        assert_eq!(fired_at, last + ms(250));
        assert!(!d.is_pending());
    }

    #[test]
    fn spaced_triggers_each_fire_once() {
        let t0 = Instant::now();
        let mut d = recorder(ms(250));
        let mut ctx = (t0, Log::new());

        let _ = d.trigger_at(t0, (100, 100));
        drive(&mut d, &mut ctx, t0, t0 + ms(299));
        let _ = d.trigger_at(t0 + ms(300), (200, 200));
        drive(&mut d, &mut ctx, t0 + ms(300), t0 + ms(599));
        let _ = d.trigger_at(t0 + ms(600), (300, 300));
        drive(&mut d, &mut ctx, t0 + ms(600), t0 + ms(1000));

        let sizes: Vec<_> = ctx.1.iter().map(|(_, s)| *s).collect();
        assert_eq!(sizes, vec![(100, 100), (200, 200), (300, 300)]);
        assert_eq!(ctx.1[0].0, t0 + ms(250));
        assert_eq!(ctx.1[1].0, t0 + ms(550));
        assert_eq!(ctx.1[2].0, t0 + ms(850));
    }

    #[test]
    fn each_trigger_restarts_the_full_window() {
        let t0 = Instant::now();
        let mut d = recorder(ms(100));
        let mut ctx = (t0, Log::new());

        let _ = d.trigger_at(t0, (1, 1));
        let _ = d.trigger_at(t0 + ms(90), (2, 2));
        assert_eq!(d.next_deadline(), Some(t0 + ms(190)));
        assert!(d.poll_at(t0 + ms(100), &mut ctx).is_none());
        assert!(d.poll_at(t0 + ms(190), &mut ctx).is_some());
    }

    #[test]
    fn wrappers_have_independent_state() {
        let t0 = Instant::now();
        let mut a = recorder(ms(50));
        let mut b = recorder(ms(50));
        let mut ctx_a = (t0, Log::new());
        let mut ctx_b = (t0, Log::new());

        let _ = a.trigger_at(t0, (1, 1));
        assert!(!b.is_pending());
        assert!(b.poll_at(t0 + ms(100), &mut ctx_b).is_none());
        assert!(a.poll_at(t0 + ms(100), &mut ctx_a).is_some());
        assert_eq!(ctx_a.1.len(), 1);
        assert!(ctx_b.1.is_empty());
    }

    #[test]
    fn handles_track_the_latest_trigger() {
        let t0 = Instant::now();
        let mut d = recorder(ms(10));

        let first = d.trigger_at(t0, (1, 1));
        let second = d.trigger_at(t0, (2, 2));
        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(d.pending(), Some(second));
    }

    #[test]
    fn cancel_drops_pending_invocation() {
        let t0 = Instant::now();
        let mut d = recorder(ms(10));
        let mut ctx = (t0, Log::new());

        let handle = d.trigger_at(t0, (1, 1));
        assert_eq!(d.cancel(), Some(handle));
        assert!(d.poll_at(t0 + ms(100), &mut ctx).is_none());
        assert!(ctx.1.is_empty());
        assert_eq!(d.cancel(), None);
    }

    #[test]
    fn flush_runs_immediately_and_clears() {
        let t0 = Instant::now();
        let mut d = recorder(ms(250));
        let mut ctx = (t0, Log::new());

        let _ = d.trigger_at(t0, (5, 5));
        assert!(d.flush(&mut ctx).is_some());
        assert_eq!(ctx.1.len(), 1);
        assert!(d.flush(&mut ctx).is_none());
        assert!(d.poll_at(t0 + ms(500), &mut ctx).is_none());
    }

    #[test]
    fn failing_callback_is_not_rearmed() {
        let t0 = Instant::now();
        let mut d = Debounced::new(ms(10), |calls: &mut u32, (): ()| {
            *calls += 1;
            Err::<(), &str>("surface gone")
        });
        let mut calls = 0;

        let _ = d.trigger_at(t0, ());
        let result = d.poll_at(t0 + ms(10), &mut calls);
        assert_eq!(result, Some(Err("surface gone")));
        assert!(!d.is_pending());
        assert!(d.poll_at(t0 + ms(1000), &mut calls).is_none());
        assert_eq!(calls, 1);
    }
}
