//! Error type for parsing hex colour strings.

use std::num::ParseIntError;
use thiserror::Error;

/// Error returned when a hex colour string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}
