use rand::{Rng, rng};

use crate::rand::RandSource;

/// A `RandSource` backed by the thread-local RNG (`rand::rng()`).
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free. This type does **not** store the RNG itself; it accesses
/// the thread-local generator on each call, which keeps it `Send + Sync` even
/// though `ThreadRng` is neither.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}

impl RandSource<u16> for ThreadRandom {
    fn rand(&self) -> u16 {
        rng().random()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::NoJitter;

    #[test]
    fn thread_random_varies() {
        let values: HashSet<u64> = (0..64).map(|_| RandSource::<u64>::rand(&ThreadRandom)).collect();
        assert!(values.len() > 1);
    }

    #[test]
    fn no_jitter_is_zero() {
        assert_eq!(NoJitter.rand(), 0);
    }
}
