//! Unified error type for the nes-quant public API.
//!
//! [`ConvertError`] covers every way a conversion can refuse its input and
//! wraps the crate's narrower errors for `?` propagation.

use thiserror::Error;

use crate::buffer::BufferError;
use crate::color::ParseColorError;
use crate::dither::ParseStyleError;
use crate::knob::KnobError;

/// Unified error type for the nes-quant public API.
///
/// # Example
///
/// ```
/// use nes_quant::{ConvertError, Rgb};
///
/// fn parse(s: &str) -> Result<Rgb, ConvertError> {
///     Ok(s.parse::<Rgb>()?)
/// }
///
/// assert!(parse("#12345").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Destination width or height is zero or not a multiple of 8
    #[error("destination size {width}x{height} must be non-zero multiples of 8")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Source image has no pixels
    #[error("source image is empty")]
    EmptySource,
    /// Custom mask style selected without a mask image
    #[error("custom dither style selected but no mask image was supplied")]
    MissingCustomMask,
    /// Raw pixel data does not match its declared size
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// Knob or bank edit out of range
    #[error("knob error: {0}")]
    Knob(#[from] KnobError),
    /// Invalid hex colour
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
    /// Unknown dither style name
    #[error(transparent)]
    ParseStyle(#[from] ParseStyleError),
}
