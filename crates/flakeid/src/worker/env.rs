use std::{borrow::Cow, env};

use crate::{
    error::{Error, Result},
    worker::{WorkerIdProvider, validate_worker_id},
};

/// Environment variable read by [`EnvWorkerId::default`].
pub const WORKER_ID_ENV: &str = "FLAKEID_WORKER_ID";

/// A worker id read from an environment variable.
///
/// Handy in containers where an orchestrator injects an ordinal per replica.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvWorkerId {
    var: Cow<'static, str>,
}

impl Default for EnvWorkerId {
    fn default() -> Self {
        Self::new(WORKER_ID_ENV)
    }
}

impl EnvWorkerId {
    /// Reads the worker id from `var`.
    pub fn new(var: impl Into<Cow<'static, str>>) -> Self {
        Self { var: var.into() }
    }

    /// The variable this provider reads.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl WorkerIdProvider for EnvWorkerId {
    fn worker_id(&self) -> Result<u16> {
        let raw = env::var(self.var()).map_err(|e| Error::WorkerIdUnavailable {
            reason: format!("{}: {e}", self.var),
        })?;
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::WorkerIdUnavailable {
                reason: format!("{}={raw:?}: {e}", self.var),
            })?;
        Ok(validate_worker_id(value)?)
    }
}
