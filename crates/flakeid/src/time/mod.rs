mod guard;
mod interface;
#[cfg(test)]
pub(crate) mod mock;
mod system;

pub use guard::*;
pub use interface::*;
pub use system::*;
