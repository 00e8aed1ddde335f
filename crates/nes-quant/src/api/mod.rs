//! Public API for the nes-quant crate.
//!
//! This module provides the high-level API: the [`Converter`] builder and
//! the [`ConvertError`] unified error type.

mod builder;
mod error;

pub use builder::{Conversion, Converter};
pub use error::ConvertError;
