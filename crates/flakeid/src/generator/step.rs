use crate::{
    error::ClockRollback,
    id::MAX_SEQUENCE,
    rand::RandSource,
    time::{ClockGuard, TimeSource},
};

/// Mask applied to the random source when a new millisecond starts, giving a
/// starting sequence in `0..=3`.
pub const SEQUENCE_JITTER_MASK: u64 = 0b11;

/// Computes the `(timestamp, sequence)` that follows `(last_ts, last_seq)`.
///
/// Pure with respect to the generator state: the caller decides whether to
/// commit the result. A rollback error leaves nothing to undo.
#[inline]
pub(crate) fn next_state<T, R>(
    guard: &ClockGuard<T>,
    rng: &R,
    last_ts: u64,
    last_seq: u16,
) -> Result<(u64, u16), ClockRollback>
where
    T: TimeSource,
    R: RandSource<u64>,
{
    let now = guard.resolve(last_ts)?;
    if now == last_ts {
        let sequence = (last_seq + 1) & MAX_SEQUENCE;
        if sequence == 0 {
            return cold_sequence_exhausted(guard, last_ts);
        }
        Ok((now, sequence))
    } else {
        Ok((now, (rng.rand() & SEQUENCE_JITTER_MASK) as u16))
    }
}

#[cold]
#[inline(never)]
fn cold_sequence_exhausted<T>(guard: &ClockGuard<T>, last_ts: u64) -> Result<(u64, u16), ClockRollback>
where
    T: TimeSource,
{
    Ok((guard.wait_next_millis(last_ts)?, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        NoJitter, ThreadRandom,
        time::mock::{FixedTime, StepTime},
    };

    #[test]
    fn same_millisecond_increments() {
        let guard = ClockGuard::new(FixedTime(10));
        assert_eq!(next_state(&guard, &NoJitter, 10, 5), Ok((10, 6)));
    }

    #[test]
    fn new_millisecond_resets_sequence() {
        let guard = ClockGuard::new(FixedTime(11));
        assert_eq!(next_state(&guard, &NoJitter, 10, 4000), Ok((11, 0)));
    }

    #[test]
    fn jitter_stays_in_range() {
        let guard = ClockGuard::new(FixedTime(11));
        for _ in 0..256 {
            let (ts, seq) = next_state(&guard, &ThreadRandom, 10, 0).unwrap();
            assert_eq!(ts, 11);
            assert!(seq <= 3);
        }
    }

    #[test]
    fn exhausted_sequence_moves_to_next_millisecond() {
        let guard = ClockGuard::new(StepTime::new([10, 10, 11]));
        assert_eq!(next_state(&guard, &NoJitter, 10, MAX_SEQUENCE), Ok((11, 0)));
    }

    #[test]
    fn rollback_propagates() {
        let guard = ClockGuard::new(FixedTime(10));
        assert_eq!(
            next_state(&guard, &NoJitter, 510, 0),
            Err(ClockRollback { millis: 500 })
        );
    }
}
