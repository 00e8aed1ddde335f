#![allow(clippy::module_inception)]

//! nes-quant: knob-driven conversion of RGB images onto the fixed 64-colour
//! NES hardware palette.
//!
//! A [`KnobBank`] of up to sixteen [`ColorKnob`]s decides which hardware
//! colours may appear and which source colours pull towards each of them.
//! Every destination pixel covers a block of source sub-pixels; each
//! sub-pixel votes for the knob whose target it matches best, and the knob
//! with the most votes paints the pixel.
//!
//! # Quick Start
//!
//! The [`Converter`] builder is the primary entry point:
//!
//! ```
//! use nes_quant::{CleanupConfig, ColorKnob, Converter, DitherConfig, DitherStyle, KnobBank, PixelBuffer, Rgb};
//!
//! let bank = KnobBank::from_knobs(&[
//!     ColorKnob::with_primary(0x0F, Rgb::BLACK),
//!     ColorKnob::with_primary(0x30, Rgb::WHITE),
//! ])
//! .unwrap();
//!
//! let converter = Converter::new(bank)
//!     .dither(DitherConfig::new().style(DitherStyle::FloydSteinberg))
//!     .cleanup(CleanupConfig::all());
//!
//! let source = PixelBuffer::filled(32, 32, Rgb::new(128, 128, 128));
//! let result = converter.convert(&source, 16, 16).unwrap();
//! assert_eq!(result.index.width(), 16);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source RGB
//!     |
//!     v
//! box resample to (rw*w) x (rh*h)
//!     |
//!     v
//! region quantizer  <---->  ditherer (mask bias or diffused error)
//!     |
//!     v
//! index image (hardware indices, UNSET where no knob painted)
//!     |
//!     v
//! cleanup: zags -> dots -> pipes -> lines
//!     |
//!     v
//! resolve through the hardware palette
//! ```
//!
//! [`auto_palette`] runs on its own and proposes a knob bank by median cut.
//!
//! # Knobs
//!
//! - **greed** (-20..=20) scales every match vector by `1.1^-greed`, so a
//!   greedy knob looks closer than it is
//! - **bleed** (-20..=20) scales every vote by `2^bleed`
//! - up to four target colours per knob, each individually enabled

pub mod api;
pub mod auto_palette;
pub mod buffer;
pub mod cleanup;
pub mod color;
pub mod dither;
pub mod knob;
pub mod output;
pub mod quantize;


pub use api::{Conversion, ConvertError, Converter};
pub use auto_palette::auto_palette;
pub use buffer::PixelBuffer;
pub use cleanup::{cleanup, CleanupConfig};
pub use color::{QuantError, Rgb};
pub use dither::{DitherConfig, DitherStyle};
pub use knob::{ColorKnob, KnobBank};
pub use output::{IndexImage, UNSET};
pub use quantize::{quantize, quantize_with_errors, Quantization};

/// Map an index image through the hardware palette; unset pixels become
/// black.
#[inline]
pub fn resolve(index: &IndexImage) -> PixelBuffer {
    index.resolve()
}
