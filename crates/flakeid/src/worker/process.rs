use std::process;

use crate::{
    error::Result,
    id::WORKER_ID_MASK,
    rand::{RandSource, ThreadRandom},
    worker::WorkerIdProvider,
};

/// Best-effort worker id derived from the process id and a random
/// perturbation.
///
/// The upper six bits of the worker id come from the process id, the lower
/// four from the random source. Two processes therefore still collide with
/// probability 1/16 even when their pids differ in the relevant bits, and
/// containers frequently share pids outright.
///
/// ⚠️ Use only for a single instance or local development. Production fleets
/// should use [`ExplicitWorkerId`] or [`EnvWorkerId`].
///
/// [`ExplicitWorkerId`]: crate::ExplicitWorkerId
/// [`EnvWorkerId`]: crate::EnvWorkerId
#[derive(Clone, Debug, Default)]
pub struct ProcessWorkerId<R = ThreadRandom> {
    rng: R,
}

impl<R> ProcessWorkerId<R>
where
    R: RandSource<u64>,
{
    /// Uses `rng` for the random perturbation.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Mixes an arbitrary process identity with the perturbation.
    fn derive(&self, pid: u64) -> u16 {
        (((pid << 4) | (self.rng.rand() & 0xF)) & WORKER_ID_MASK) as u16
    }
}

impl<R> WorkerIdProvider for ProcessWorkerId<R>
where
    R: RandSource<u64>,
{
    fn worker_id(&self) -> Result<u16> {
        let worker_id = self.derive(u64::from(process::id()));

        #[cfg(feature = "tracing")]
        tracing::warn!(
            worker_id,
            "auto-generated worker id; configure one explicitly to avoid collisions between instances"
        );

        Ok(worker_id)
    }
}
