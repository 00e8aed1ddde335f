//! RGB pixel buffers and the deterministic box resampler.
//!
//! Pixel access goes through [`pixel_at`] / [`put_pixel`], free functions
//! over a raw byte slice plus a row stride, so hot loops can borrow several
//! buffers at once without going through `&self` methods.

mod error;
mod pixel_buffer;
mod resize;

pub use error::BufferError;
pub use pixel_buffer::{pixel_at, put_pixel, PixelBuffer};
pub use resize::box_resample;
