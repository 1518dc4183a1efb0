//! # Progress and Cancellation Protocol
//!
//! A caller-supplied callback is threaded into the kernel and polled from
//! both the distance-matrix phase and the merge loop. Polling is driven by
//! elapsed time, not loop counts, because the cost of one iteration varies
//! by orders of magnitude between early and late merges.
//!
//! ## Signal encoding
//! The callback receives `(current, total)`:
//! - distance matrix: `current = -(row + 1)`, `total = N`
//! - merge loop: `current = k` (0-based iteration), `total = N - 1`
//!
//! Its boolean return is honored only on cancel-check invocations, which
//! happen at most once per [`ProgressIntervals::cancel`]. In between, pure
//! progress invocations happen at most once per
//! [`ProgressIntervals::progress`] and their return value is ignored.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Default spacing of pure progress notifications
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Default spacing of cancellation checks
pub const DEFAULT_CANCEL_INTERVAL: Duration = Duration::from_secs(1);

/// Which half of the computation a progress signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DistanceMatrix,
    Merging,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::DistanceMatrix => "Distance matrix",
            Phase::Merging => "Merging",
        }
    }
}

/// Decoded form of a `(current, total)` progress signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: Phase,
    /// Units finished within the phase (rows or merge iterations)
    pub done: u64,
    pub total: u64,
}

impl ProgressEvent {
    pub fn new(phase: Phase, done: u64, total: u64) -> Self {
        Self { phase, done, total }
    }

    /// Signed wire form passed to [`ProgressCallback::on_progress`]
    pub fn encode(self) -> (i64, i64) {
        let current = match self.phase {
            Phase::DistanceMatrix => -(self.done as i64) - 1,
            Phase::Merging => self.done as i64,
        };
        (current, self.total as i64)
    }

    /// Inverse of [`ProgressEvent::encode`]
    pub fn decode(current: i64, total: i64) -> Self {
        let total = total.max(0) as u64;
        if current < 0 {
            Self::new(Phase::DistanceMatrix, (-(current + 1)) as u64, total)
        } else {
            Self::new(Phase::Merging, current as u64, total)
        }
    }

    /// Completed fraction of the phase in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Host hook receiving progress signals.
///
/// Returning `false` from a cancel-check invocation stops the computation.
pub trait ProgressCallback {
    fn on_progress(&mut self, current: i64, total: i64) -> bool;
}

impl<F> ProgressCallback for F
where
    F: FnMut(i64, i64) -> bool,
{
    fn on_progress(&mut self, current: i64, total: i64) -> bool {
        self(current, total)
    }
}

/// Monotonic time source for the polling intervals
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time via [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Lets tests drive the interval logic without sleeping.
#[derive(Debug)]
pub struct SteppingClock {
    now: Cell<Duration>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn elapsed(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Minimum spacing between callback invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIntervals {
    pub progress: Duration,
    pub cancel: Duration,
}

impl Default for ProgressIntervals {
    fn default() -> Self {
        Self {
            progress: DEFAULT_PROGRESS_INTERVAL,
            cancel: DEFAULT_CANCEL_INTERVAL,
        }
    }
}

/// Rate-limits callback invocations for one clustering run.
pub struct ProgressController<'a, C: Clock = SystemClock> {
    callback: Option<&'a mut dyn ProgressCallback>,
    clock: C,
    intervals: ProgressIntervals,
    last_report: Duration,
    last_cancel_check: Duration,
}

impl<'a> ProgressController<'a, SystemClock> {
    /// Controller on the system clock with default intervals
    pub fn new(callback: Option<&'a mut dyn ProgressCallback>) -> Self {
        Self::with_clock(callback, SystemClock::new(), ProgressIntervals::default())
    }

    /// Controller that never calls out and never cancels
    pub fn disabled() -> Self {
        Self::new(None)
    }
}

impl<'a, C: Clock> ProgressController<'a, C> {
    pub fn with_clock(
        callback: Option<&'a mut dyn ProgressCallback>,
        clock: C,
        intervals: ProgressIntervals,
    ) -> Self {
        let start = if callback.is_some() {
            clock.elapsed()
        } else {
            Duration::ZERO
        };
        Self {
            callback,
            clock,
            intervals,
            last_report: start,
            last_cancel_check: start,
        }
    }

    /// Whether a callback is registered
    pub fn is_enabled(&self) -> bool {
        self.callback.is_some()
    }

    /// Poll point. Returns `Break` when a cancel check was answered with `false`.
    #[inline]
    pub fn tick(&mut self, phase: Phase, done: u64, total: u64) -> ControlFlow<()> {
        let Some(callback) = self.callback.as_deref_mut() else {
            return ControlFlow::Continue(());
        };

        let now = self.clock.elapsed();
        let (current, total) = ProgressEvent::new(phase, done, total).encode();

        if now.saturating_sub(self.last_cancel_check) >= self.intervals.cancel {
            self.last_cancel_check = now;
            self.last_report = now;
            if !callback.on_progress(current, total) {
                tracing::debug!(current, total, "cancellation requested");
                return ControlFlow::Break(());
            }
        } else if now.saturating_sub(self.last_report) >= self.intervals.progress {
            self.last_report = now;
            let _ = callback.on_progress(current, total);
        }

        ControlFlow::Continue(())
    }
}
