//! A process-wide default generator.
//!
//! Most services need exactly one generator per process. This module holds it
//! in a [`OnceLock`] so that call sites can issue ids without threading a
//! handle through every layer:
//!
//! ```
//! use flakeid::{Generator, global};
//!
//! // At startup, with the worker id from configuration.
//! let _ = global::install(Generator::new(12).unwrap());
//!
//! let id = global::next_id().unwrap();
//! let id_str = global::next_id_string().unwrap();
//! # let _ = (id, id_str);
//! ```
//!
//! If nothing was installed, the first call builds a generator from
//! [`WORKER_ID_ENV`] and, when that variable is unset, from [`ProcessWorkerId`]
//! with a warning. Once created the instance is never replaced: changing the
//! worker id of a live generator is not supported.
//!
//! [`WORKER_ID_ENV`]: crate::WORKER_ID_ENV
//! [`ProcessWorkerId`]: crate::ProcessWorkerId

use std::{env, sync::OnceLock};

use crate::{
    error::Result,
    generator::Generator,
    worker::{EnvWorkerId, ProcessWorkerId, WORKER_ID_ENV, WorkerIdProvider},
};

static GLOBAL: OnceLock<Generator> = OnceLock::new();

/// Installs `generator` as the process-wide instance.
///
/// # Errors
///
/// Returns the rejected generator if an instance already exists, either
/// installed earlier or created lazily by a previous call.
pub fn install(generator: Generator) -> core::result::Result<&'static Generator, Generator> {
    GLOBAL.set(generator)?;
    Ok(GLOBAL.get_or_init(|| unreachable!("global generator was just installed")))
}

/// Returns the process-wide instance, creating it on first use.
///
/// # Errors
///
/// Fails if nothing was installed and [`WORKER_ID_ENV`] is set to something
/// other than an integer in `0..=1023`. A misconfigured variable is reported
/// rather than silently replaced by an automatic worker id.
///
/// [`WORKER_ID_ENV`]: crate::WORKER_ID_ENV
pub fn try_get() -> Result<&'static Generator> {
    if let Some(generator) = GLOBAL.get() {
        return Ok(generator);
    }
    let generator = Generator::new(default_worker_id()?)?;
    // A concurrent caller may have won; its instance is kept and ours dropped
    // before it issued anything.
    Ok(GLOBAL.get_or_init(|| generator))
}

/// Generates an id from the process-wide instance.
///
/// # Errors
///
/// See [`try_get`] and [`Generator::next_id`].
pub fn next_id() -> Result<u64> {
    Ok(try_get()?.next_id()?)
}

/// Generates a decimal id string from the process-wide instance.
///
/// # Errors
///
/// See [`try_get`] and [`Generator::next_id`].
pub fn next_id_string() -> Result<String> {
    Ok(try_get()?.next_id_string()?)
}

/// The worker id of the process-wide instance.
///
/// # Errors
///
/// See [`try_get`].
pub fn worker_id() -> Result<u16> {
    Ok(try_get()?.worker_id())
}

fn default_worker_id() -> Result<u16> {
    if env::var_os(WORKER_ID_ENV).is_some() {
        EnvWorkerId::default().worker_id()
    } else {
        ProcessWorkerId::<crate::ThreadRandom>::default().worker_id()
    }
}
