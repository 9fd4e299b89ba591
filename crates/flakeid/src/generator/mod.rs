mod atomic;
mod interface;
#[cfg(feature = "lock")]
mod lock;
mod step;

pub use atomic::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "lock")))]
#[cfg(feature = "lock")]
pub use lock::*;
pub use step::SEQUENCE_JITTER_MASK;

/// The default generator: lock-free, wall clock, jittered sequence start.
pub type Generator = AtomicSnowflakeGenerator;
