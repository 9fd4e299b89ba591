#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
pub mod global;
mod id;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod worker;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
pub use crate::worker::*;
