//! Pixeler - NES palette pixel art converter
//!
//! Command-line front end for the `nes-quant` core: PNG I/O, YAML project
//! files and watch mode. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
