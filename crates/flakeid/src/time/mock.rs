//! Deterministic clocks for tests.

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::time::TimeSource;

/// Always reports the same millisecond.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedTime(pub u64);

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.0
    }
}

/// Replays a scripted sequence of readings, one per call, then keeps
/// repeating the last value.
#[derive(Debug)]
pub(crate) struct StepTime {
    values: Vec<u64>,
    index: AtomicUsize,
}

impl StepTime {
    pub(crate) fn new(values: impl IntoIterator<Item = u64>) -> Self {
        let values: Vec<u64> = values.into_iter().collect();
        assert!(!values.is_empty(), "StepTime needs at least one reading");
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    /// Number of readings taken so far.
    pub(crate) fn reads(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}

impl TimeSource for StepTime {
    fn current_millis(&self) -> u64 {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.values[i.min(self.values.len() - 1)]
    }
}

/// A clock moved by hand.
#[derive(Debug, Default)]
pub(crate) struct ManualTime {
    millis: AtomicU64,
}

impl ManualTime {
    pub(crate) fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    pub(crate) fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Relaxed);
    }
}

impl TimeSource for ManualTime {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::Relaxed)
    }
}
