use core::time::Duration;
use std::thread;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{error::ClockRollback, time::TimeSource};

/// Largest backward clock step absorbed by waiting instead of failing.
pub const CLOCK_DRIFT_TOLERANCE_MS: u64 = 5;

/// Wraps a [`TimeSource`] and turns its readings into a non-decreasing
/// timestamp relative to the last one issued.
///
/// Small backward steps (up to the tolerance, typically NTP slew) are absorbed
/// by sleeping for twice the observed drift and reading again. Anything larger,
/// or a clock that is still behind after the wait, is reported as a
/// [`ClockRollback`] instead of being masked.
///
/// # Example
///
/// ```
/// use flakeid::{ClockGuard, ClockRollback, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_000
///     }
/// }
///
/// let guard = ClockGuard::new(FixedTime);
/// assert_eq!(guard.resolve(999), Ok(1_000));
/// assert_eq!(guard.resolve(1_500), Err(ClockRollback { millis: 500 }));
/// ```
#[derive(Clone, Debug)]
pub struct ClockGuard<T> {
    time: T,
    tolerance_ms: u64,
}

impl<T> ClockGuard<T>
where
    T: TimeSource,
{
    /// Guards `time` with the default [`CLOCK_DRIFT_TOLERANCE_MS`].
    pub const fn new(time: T) -> Self {
        Self::with_tolerance(time, CLOCK_DRIFT_TOLERANCE_MS)
    }

    /// Guards `time` with a custom drift tolerance in milliseconds.
    ///
    /// A tolerance of zero disables drift absorption entirely: any backward
    /// step fails immediately.
    pub const fn with_tolerance(time: T, tolerance_ms: u64) -> Self {
        Self { time, tolerance_ms }
    }

    /// The wrapped time source.
    pub const fn time(&self) -> &T {
        &self.time
    }

    /// Largest backward step, in milliseconds, absorbed by waiting.
    pub const fn tolerance_ms(&self) -> u64 {
        self.tolerance_ms
    }

    /// Reads the wrapped clock without any checks.
    #[inline]
    pub fn now(&self) -> u64 {
        self.time.current_millis()
    }

    /// Returns a timestamp no earlier than `last`.
    ///
    /// - If the clock is at or past `last`, its reading is returned as is.
    /// - If it is behind by at most the tolerance, the calling thread sleeps
    ///   for twice the drift and the clock is read again.
    /// - Otherwise, or if the clock is still behind after sleeping, the call
    ///   fails.
    ///
    /// # Errors
    ///
    /// Returns [`ClockRollback`] carrying the drift observed on the first read
    /// when the clock cannot be trusted to produce a timestamp `>= last`.
    #[inline]
    pub fn resolve(&self, last: u64) -> Result<u64, ClockRollback> {
        let now = self.now();
        if now >= last {
            return Ok(now);
        }
        self.cold_clock_behind(now, last)
    }

    /// Spins, yielding the thread between reads, until the clock reports a
    /// timestamp strictly greater than `last`.
    ///
    /// Used when every sequence number of the millisecond `last` has been
    /// handed out. The wait is normally well under a millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`ClockRollback`] if the clock jumps back beyond the tolerance
    /// while waiting.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn wait_next_millis(&self, last: u64) -> Result<u64, ClockRollback> {
        loop {
            let now = self.now();
            if now > last {
                return Ok(now);
            }
            let drift = last - now;
            if drift > self.tolerance_ms {
                return Err(Self::refuse(drift));
            }
            thread::yield_now();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64, last: u64) -> Result<u64, ClockRollback> {
        let drift = last - now;
        if drift <= self.tolerance_ms {
            #[cfg(feature = "tracing")]
            tracing::warn!(drift_ms = drift, "clock moved backwards, waiting to catch up");

            thread::sleep(Duration::from_millis(drift << 1));
            let now = self.now();
            if now >= last {
                return Ok(now);
            }
        }
        Err(Self::refuse(drift))
    }

    #[cold]
    fn refuse(drift: u64) -> ClockRollback {
        #[cfg(feature = "tracing")]
        tracing::error!(drift_ms = drift, "clock moved backwards, refusing to generate id");
        ClockRollback { millis: drift }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::time::mock::{FixedTime, StepTime};

    #[test]
    fn passes_through_forward_and_equal_readings() {
        let guard = ClockGuard::new(FixedTime(100));
        assert_eq!(guard.resolve(0), Ok(100));
        assert_eq!(guard.resolve(99), Ok(100));
        assert_eq!(guard.resolve(100), Ok(100));
    }

    #[test]
    fn absorbs_small_drift_by_sleeping() {
        let guard = ClockGuard::new(StepTime::new([97, 101]));
        let start = Instant::now();
        assert_eq!(guard.resolve(100), Ok(101));
        assert!(start.elapsed() >= Duration::from_millis(6));
        assert_eq!(guard.time().reads(), 2);
    }

    #[test]
    fn drift_at_tolerance_is_absorbed() {
        let guard = ClockGuard::new(StepTime::new([95, 100]));
        assert_eq!(guard.resolve(100), Ok(100));
    }

    #[test]
    fn drift_past_tolerance_fails_without_waiting() {
        let guard = ClockGuard::new(StepTime::new([94, 200]));
        assert_eq!(guard.resolve(100), Err(ClockRollback { millis: 6 }));
        assert_eq!(guard.time().reads(), 1);
    }

    #[test]
    fn fails_when_still_behind_after_waiting() {
        let guard = ClockGuard::new(StepTime::new([97, 98]));
        assert_eq!(guard.resolve(100), Err(ClockRollback { millis: 3 }));
    }

    #[test]
    fn large_rollback_fails_without_waiting() {
        let guard = ClockGuard::new(StepTime::new([500, 1_000]));
        assert_eq!(guard.resolve(1_000), Err(ClockRollback { millis: 500 }));
        // Only the first reading is taken; no retry after the failure.
        assert_eq!(guard.time().reads(), 1);
    }

    #[test]
    fn zero_tolerance_rejects_any_rollback() {
        let guard = ClockGuard::with_tolerance(FixedTime(99), 0);
        assert_eq!(guard.resolve(100), Err(ClockRollback { millis: 1 }));
        assert_eq!(guard.tolerance_ms(), 0);
    }

    #[test]
    fn waits_for_strictly_later_millisecond() {
        let guard = ClockGuard::new(StepTime::new([42, 42, 42, 43]));
        assert_eq!(guard.wait_next_millis(42), Ok(43));
        assert_eq!(guard.time().reads(), 4);
    }

    #[test]
    fn wait_gives_up_on_large_rollback() {
        let guard = ClockGuard::new(StepTime::new([42, 10]));
        assert_eq!(guard.wait_next_millis(42), Err(ClockRollback { millis: 32 }));
    }
}
