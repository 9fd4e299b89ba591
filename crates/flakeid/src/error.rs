use crate::id::MAX_WORKER_ID;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A worker id outside `0..=1023` was supplied at construction.
///
/// This is a configuration mistake and is not retryable until the
/// configuration is corrected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("worker id must be between 0 and {MAX_WORKER_ID}, got {worker_id}")]
pub struct InvalidWorkerId {
    /// The rejected value.
    pub worker_id: u64,
}

/// The clock moved backwards further than the generator is willing to absorb.
///
/// Issuing an id in this state could duplicate one already handed out, so the
/// call is refused. The generator state is left untouched and a later call
/// succeeds once the clock has caught up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("clock moved backwards, refusing to generate id for {millis} milliseconds")]
pub struct ClockRollback {
    /// Magnitude of the observed rollback in milliseconds.
    pub millis: u64,
}

/// A decimal id string could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    /// The input is not a base-10 `u64`.
    #[error("invalid decimal id: {0}")]
    InvalidDigits(#[from] core::num::ParseIntError),

    /// The input parsed but has the reserved high bit set.
    #[error("id {id} has the reserved bit set")]
    ReservedBitSet { id: u64 },
}

/// All errors `flakeid` can surface.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    InvalidWorkerId(#[from] InvalidWorkerId),

    #[error(transparent)]
    ClockRollback(#[from] ClockRollback),

    /// A [`WorkerIdProvider`] could not produce a value.
    ///
    /// [`WorkerIdProvider`]: crate::WorkerIdProvider
    #[error("worker id unavailable: {reason}")]
    WorkerIdUnavailable { reason: String },

    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
