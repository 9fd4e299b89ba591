use crate::{
    error::{InvalidWorkerId, Result},
    id::MAX_WORKER_ID,
};

/// Supplies the worker id a generator is constructed with.
///
/// Providers only read local state (configuration, environment, process
/// identity, a random source). None of them registers or reserves the id
/// anywhere; uniqueness across a fleet must be arranged externally.
///
/// | Provider              | Collision-free in a fleet | Intended for           |
/// |-----------------------|---------------------------|------------------------|
/// | [`ExplicitWorkerId`]  | yes, if coordinated       | production             |
/// | [`EnvWorkerId`]       | yes, if coordinated       | production, containers |
/// | [`ProcessWorkerId`]   | no                        | single instance, dev   |
///
/// [`ExplicitWorkerId`]: crate::ExplicitWorkerId
/// [`EnvWorkerId`]: crate::EnvWorkerId
/// [`ProcessWorkerId`]: crate::ProcessWorkerId
pub trait WorkerIdProvider {
    /// Returns a worker id in `0..=1023`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is out of range or the source
    /// is unavailable.
    fn worker_id(&self) -> Result<u16>;
}

impl<P: WorkerIdProvider + ?Sized> WorkerIdProvider for &P {
    fn worker_id(&self) -> Result<u16> {
        (**self).worker_id()
    }
}

/// Checks that `worker_id` fits the 10-bit field.
///
/// # Errors
///
/// Returns [`InvalidWorkerId`] if `worker_id > 1023`.
pub fn validate_worker_id(worker_id: u64) -> Result<u16, InvalidWorkerId> {
    if worker_id > u64::from(MAX_WORKER_ID) {
        return Err(InvalidWorkerId { worker_id });
    }
    Ok(worker_id as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_boundary() {
        assert_eq!(validate_worker_id(0), Ok(0));
        assert_eq!(validate_worker_id(1023), Ok(1023));
        assert_eq!(
            validate_worker_id(1024),
            Err(InvalidWorkerId { worker_id: 1024 })
        );
        assert_eq!(
            validate_worker_id(u64::MAX),
            Err(InvalidWorkerId { worker_id: u64::MAX })
        );
    }
}
