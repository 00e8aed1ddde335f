//! Colour knobs and the knob bank.
//!
//! A [`ColorKnob`] binds one hardware colour to up to four source colours it
//! should attract, with two bias controls:
//!
//! - **greed** scales the knob's colour distance by `1.1^(-greed)`, so a
//!   greedy knob wins sub-pixels it would otherwise lose;
//! - **bleed** scales the knob's vote weight by `2^bleed` once it has won a
//!   sub-pixel, so it spreads over more of the destination pixel.
//!
//! A [`KnobBank`] is the fixed, ordered set of knobs handed to the quantizer.

mod bank;
mod error;
mod knob;

pub use bank::{KnobBank, BANK_SIZE};
pub use error::KnobError;
pub use knob::{ColorKnob, BIAS_MAX, BIAS_MIN, TARGET_SLOTS};
