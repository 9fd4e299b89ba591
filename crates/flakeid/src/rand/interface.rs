/// A source of random values.
///
/// The generator draws from it to jitter the starting sequence of each new
/// millisecond, and [`ProcessWorkerId`] draws from it to perturb the process
/// id. Nothing here needs cryptographic quality.
///
/// [`ProcessWorkerId`]: crate::ProcessWorkerId
pub trait RandSource<T> {
    /// Returns a random value.
    fn rand(&self) -> T;
}

/// A [`RandSource`] that always returns zero.
///
/// Plugging it into a generator disables sequence jitter, so every new
/// millisecond starts at sequence `0`. Useful for tests and for callers that
/// want the densest possible packing.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoJitter;

impl RandSource<u64> for NoJitter {
    fn rand(&self) -> u64 {
        0
    }
}
