mod codec;
mod snowflake;

pub use codec::*;
pub use snowflake::*;
