use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Monday, January 1, 2024 00:00:00 UTC.
///
/// Every generator in a fleet must share the same epoch for the lifetime of
/// the deployment; moving it reorders or duplicates ids across instances.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_704_067_200_000);

/// A source of millisecond timestamps relative to some epoch.
///
/// The generator reads time only through this trait, so a real wall clock
/// ([`SystemClock`]) can be swapped for a mock in tests. Implementations are
/// allowed to go backwards; detecting that is the job of [`ClockGuard`].
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
///
/// [`SystemClock`]: crate::SystemClock
/// [`ClockGuard`]: crate::ClockGuard
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
