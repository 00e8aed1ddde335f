//! Colour math: 8-bit RGB, signed quantization error, Euclidean distance,
//! hue, and the fixed 64-entry hardware palette.
//!
//! # Example
//!
//! ```
//! use nes_quant::color::{distance_rgb, hardware_color, Rgb};
//!
//! let red = Rgb::new(255, 0, 0);
//! let nearest = hardware_color(0x16).unwrap();
//! assert!(distance_rgb(red, nearest) < 100.0);
//! ```

mod error;
mod hardware;
mod rgb;

pub use error::ParseColorError;
pub use hardware::{
    hardware_color, hardware_label, nearest_hardware_index, HARDWARE_COLORS, HARDWARE_COLOR_COUNT,
    NO_COLOR,
};
pub use rgb::{distance, distance_rgb, hue, QuantError, Rgb};
