use crate::{
    error::Result,
    worker::{WorkerIdProvider, validate_worker_id},
};

/// A worker id taken from configuration.
///
/// This is the recommended strategy: if the values are coordinated across
/// the fleet (static config, orchestration ordinal, coordination service) no
/// two generators can collide.
///
/// ```
/// use flakeid::{ExplicitWorkerId, WorkerIdProvider};
///
/// assert_eq!(ExplicitWorkerId(7).worker_id().unwrap(), 7);
/// assert!(ExplicitWorkerId(1024).worker_id().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplicitWorkerId(pub u64);

impl WorkerIdProvider for ExplicitWorkerId {
    fn worker_id(&self) -> Result<u16> {
        Ok(validate_worker_id(self.0)?)
    }
}
