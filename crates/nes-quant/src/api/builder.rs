//! Converter builder -- the primary ergonomic entry point for the crate.
//!
//! [`Converter`] wraps quantization, dithering, cleanup and palette lookup
//! behind a fluent builder.

use std::time::Instant;

use crate::buffer::PixelBuffer;
use crate::cleanup::{cleanup_in_place, CleanupConfig};
use crate::color::QuantError;
use crate::dither::DitherConfig;
use crate::knob::KnobBank;
use crate::output::IndexImage;
use crate::quantize::quantize_with_errors;

use super::ConvertError;

/// Result of one [`Converter::convert`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Hardware indices after cleanup.
    pub index: IndexImage,
    /// `index` mapped through the hardware palette, unset pixels black.
    pub rgb: PixelBuffer,
    /// Realized quantization error per destination pixel, taken before
    /// cleanup. `None` where the pixel stayed unset.
    pub errors: Vec<Option<QuantError>>,
}

impl Conversion {
    /// Whether any pixel was left without a hardware colour.
    pub fn has_unset(&self) -> bool {
        self.index.unset_count() > 0
    }
}

/// Full knob-driven conversion pipeline.
///
/// - Constructor requires a [`KnobBank`]; dithering and cleanup default to
///   off
/// - Configuration methods consume and return `self`
/// - [`convert()`](Self::convert) takes `&self`, so one converter serves any
///   number of images
///
/// # Example
///
/// ```
/// use nes_quant::{ColorKnob, Converter, KnobBank, PixelBuffer, Rgb};
///
/// let bank = KnobBank::from_knobs(&[ColorKnob::with_primary(0x06, Rgb::new(255, 0, 0))]).unwrap();
/// let converter = Converter::new(bank);
///
/// let source = PixelBuffer::filled(8, 8, Rgb::new(255, 0, 0));
/// let result = converter.convert(&source, 8, 8).unwrap();
/// assert!(result.index.indices().iter().all(|&i| i == 0x06));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    bank: KnobBank,
    dither: DitherConfig,
    cleanup: CleanupConfig,
}

impl Converter {
    pub fn new(bank: KnobBank) -> Self {
        Self {
            bank,
            ..Self::default()
        }
    }

    /// Set the dithering configuration.
    #[inline]
    pub fn dither(mut self, config: DitherConfig) -> Self {
        self.dither = config;
        self
    }

    /// Set the cleanup configuration.
    #[inline]
    pub fn cleanup(mut self, config: CleanupConfig) -> Self {
        self.cleanup = config;
        self
    }

    #[inline]
    pub fn bank(&self) -> &KnobBank {
        &self.bank
    }

    #[inline]
    pub fn dither_config(&self) -> &DitherConfig {
        &self.dither
    }

    #[inline]
    pub fn cleanup_config(&self) -> &CleanupConfig {
        &self.cleanup
    }

    /// Convert `source` into a `width` x `height` hardware-index image.
    ///
    /// Applies the full pipeline:
    /// 1. Quantize with the configured knobs and ditherer
    /// 2. Run the enabled cleanup passes
    /// 3. Resolve indices through the hardware palette
    pub fn convert(&self, source: &PixelBuffer, width: usize, height: usize) -> Result<Conversion, ConvertError> {
        let started = Instant::now();
        let quantized = quantize_with_errors(source, width, height, &self.bank, &self.dither)?;
        tracing::debug!(
            knobs = self.bank.active_count(),
            style = %self.dither.style,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "quantized"
        );

        let mut index = quantized.image;
        if self.cleanup.any() {
            let started = Instant::now();
            cleanup_in_place(&mut index, &self.cleanup);
            tracing::debug!(
                passes = self.cleanup.passes,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cleaned up"
            );
        }

        let rgb = index.resolve();
        Ok(Conversion {
            index,
            rgb,
            errors: quantized.errors,
        })
    }
}
