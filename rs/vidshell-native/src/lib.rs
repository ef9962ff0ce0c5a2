//! Helper library for native vidshell applications.
//!
//! Includes optional logging, lookup of installed data files and the
//! codec property files applied to pipeline elements.

pub mod codec;
pub mod data;
pub mod log;

pub use codec::*;
pub use data::*;
pub use log::*;
