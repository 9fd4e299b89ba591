use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{ClockRollback, InvalidWorkerId, Result},
    generator::{IdGenerator, step::next_state},
    id::{SnowflakeId, decode_state, encode_state},
    rand::{RandSource, ThreadRandom},
    time::{ClockGuard, SystemClock, TimeSource},
    worker::{WorkerIdProvider, validate_worker_id},
};

/// A lock-based Snowflake id generator suitable for multi-threaded
/// environments.
///
/// Runs the same algorithm as [`AtomicSnowflakeGenerator`], but serializes
/// callers behind a [`parking_lot::Mutex`] instead of a CAS loop. A caller
/// that has to sleep for clock drift holds the lock while it does.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair-ish access under contention
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T = SystemClock, R = ThreadRandom>
where
    T: TimeSource,
    R: RandSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: crossbeam_utils::CachePadded<Mutex<u64>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Mutex<u64>,
    worker_id: u16,
    guard: ClockGuard<T>,
    rng: R,
}

impl LockSnowflakeGenerator<SystemClock, ThreadRandom> {
    /// Creates a generator using the wall clock at [`DEFAULT_EPOCH`] and a
    /// jittered sequence start.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWorkerId`] if `worker_id > 1023`.
    ///
    /// # Example
    /// ```
    /// use flakeid::LockSnowflakeGenerator;
    ///
    /// let generator = LockSnowflakeGenerator::new(1023).unwrap();
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(a < b);
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new(worker_id: u16) -> Result<Self, InvalidWorkerId> {
        Self::with_parts(worker_id, SystemClock::default(), ThreadRandom)
    }

    /// Creates a generator whose worker id comes from `provider`.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub fn from_provider(provider: &impl WorkerIdProvider) -> Result<Self> {
        Ok(Self::new(provider.worker_id()?)?)
    }
}

impl<T, R> LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u64>,
{
    /// Creates a generator with an explicit time source and random source.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWorkerId`] if `worker_id > 1023`.
    pub fn with_parts(worker_id: u16, time: T, rng: R) -> Result<Self, InvalidWorkerId> {
        Self::from_components(0, worker_id, 0, ClockGuard::new(time), rng)
    }

    /// Creates a generator preloaded with a `(timestamp, sequence)` state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWorkerId`] if `worker_id > 1023`.
    pub fn from_components(
        timestamp: u64,
        worker_id: u16,
        sequence: u16,
        guard: ClockGuard<T>,
        rng: R,
    ) -> Result<Self, InvalidWorkerId> {
        let worker_id = validate_worker_id(u64::from(worker_id))?;
        let initial = encode_state(timestamp, sequence);

        #[cfg(feature = "tracing")]
        tracing::info!(worker_id, "lock snowflake generator initialized");

        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(initial),
            worker_id,
            guard,
            rng,
        })
    }

    /// The immutable worker id.
    pub const fn worker_id(&self) -> u16 {
        self.worker_id
    }

    /// The guarded clock used by this generator.
    pub const fn clock(&self) -> &ClockGuard<T> {
        &self.guard
    }

    /// Generates the next id.
    ///
    /// # Errors
    ///
    /// Returns [`ClockRollback`] if the clock moved backwards beyond the
    /// tolerance; the state is left unchanged.
    pub fn next_id(&self) -> Result<u64, ClockRollback> {
        self.next_snowflake().map(|id| id.to_raw())
    }

    /// Generates the next id as a decimal string.
    ///
    /// # Errors
    ///
    /// See [`Self::next_id`].
    pub fn next_id_string(&self) -> Result<String, ClockRollback> {
        self.next_snowflake().map(|id| id.to_string())
    }

    /// Generates the next id as a [`SnowflakeId`].
    ///
    /// # Errors
    ///
    /// See [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_snowflake(&self) -> Result<SnowflakeId, ClockRollback> {
        let mut state = self.state.lock();
        let (last_ts, last_seq) = decode_state(*state);
        let (timestamp, sequence) = next_state(&self.guard, &self.rng, last_ts, last_seq)?;
        *state = encode_state(timestamp, sequence);
        Ok(SnowflakeId::from_components(
            timestamp,
            self.worker_id,
            sequence,
        ))
    }
}

impl<T, R> IdGenerator for LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u64>,
{
    fn worker_id(&self) -> u16 {
        self.worker_id()
    }

    fn next_snowflake(&self) -> Result<SnowflakeId, ClockRollback> {
        self.next_snowflake()
    }
}
