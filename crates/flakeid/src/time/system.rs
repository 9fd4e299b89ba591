use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::time::{DEFAULT_EPOCH, TimeSource};

/// A wall-clock time source offset from a fixed epoch.
///
/// Every read calls `SystemTime::now()`, so NTP corrections and manual clock
/// changes are visible to the caller, including backward jumps. The generator
/// relies on that to refuse ids it cannot prove unique.
///
/// Readings earlier than the epoch saturate to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// A clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock whose zero point is `epoch`, given as a [`Duration`]
    /// since 1970-01-01 UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{DEFAULT_EPOCH, SystemClock, TimeSource};
    ///
    /// let clock = SystemClock::with_epoch(DEFAULT_EPOCH);
    /// assert!(clock.current_millis() > 0);
    /// ```
    #[must_use]
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The epoch this clock measures from.
    #[must_use]
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        since_unix.saturating_sub(self.epoch).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_default_epoch() {
        assert_eq!(SystemClock::default().epoch(), DEFAULT_EPOCH);
    }

    #[test]
    fn offset_tracks_unix_time() {
        let unix = SystemClock::with_epoch(Duration::ZERO);
        let custom = SystemClock::default();
        let diff = unix.current_millis() - custom.current_millis();
        let expected = DEFAULT_EPOCH.as_millis() as u64;
        // Two separate reads may straddle a millisecond.
        assert!(diff.abs_diff(expected) <= 5, "diff {diff}");
    }

    #[test]
    fn future_epoch_saturates_to_zero() {
        let clock = SystemClock::with_epoch(Duration::from_secs(u64::MAX / 2));
        assert_eq!(clock.current_millis(), 0);
    }
}
