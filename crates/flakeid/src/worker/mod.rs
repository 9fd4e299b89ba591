mod env;
mod explicit;
mod interface;
mod process;

pub use env::*;
pub use explicit::*;
pub use interface::*;
pub use process::*;
