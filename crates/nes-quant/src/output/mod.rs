//! Quantizer output.
//!
//! [`IndexImage`] is the canonical result: one hardware index per pixel,
//! with [`UNSET`] for pixels no knob painted. RGB and RGBA renderings are
//! computed on demand through the hardware palette.

mod index_image;

pub use index_image::{index_at, is_color, put_index, IndexImage, UNSET};
