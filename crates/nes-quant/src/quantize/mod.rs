//! Region quantizer: maps a source image onto hardware indices by letting
//! the knobs vote.
//!
//! # Algorithm
//!
//! The source is box-resampled so every destination pixel covers an exact
//! `rw x rh` block of sub-pixels, where `rw = max(1, source_w / w)` and
//! `rh = max(1, source_h / h)`. Then, for each destination pixel in
//! row-major order:
//!
//! 1. Each sub-pixel is matched against every enabled `(knob, slot)` target
//!    in bank order. The match vector is
//!    `round((target - source) * greed_factor) + bias`, where `bias` comes
//!    from the [`Ditherer`]. The shortest vector wins; the first one wins
//!    ties.
//! 2. The winning knob gains `bleed_factor / max(0.125, distance)` votes and
//!    accumulates the winning vector as error.
//! 3. The knob with the most votes takes the pixel (first in bank order on
//!    ties). A winner without a hardware colour leaves the pixel unset;
//!    there is no fallback to the runner-up. Otherwise the winner's mean
//!    error is handed back to the ditherer for diffusion.

use crate::api::ConvertError;
use crate::buffer::{box_resample, pixel_at, PixelBuffer};
use crate::color::{distance, QuantError, Rgb};
use crate::dither::{ditherer_for, DitherConfig, Ditherer};
use crate::knob::{KnobBank, BANK_SIZE};
use crate::output::IndexImage;

/// Smallest distance a vote is divided by.
const MIN_VOTE_DISTANCE: f32 = 0.125;

/// Index image plus the realized error of every painted pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantization {
    pub image: IndexImage,
    /// Row-major; `None` where the pixel was left unset.
    pub errors: Vec<Option<QuantError>>,
}

/// One enabled `(knob, slot)` pair, flattened in bank order.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    knob: usize,
    target: Rgb,
    greed: f32,
}

/// Reject destination sizes the hardware cannot tile.
pub fn check_dimensions(width: usize, height: usize) -> Result<(), ConvertError> {
    if width == 0 || height == 0 || width % 8 != 0 || height % 8 != 0 {
        return Err(ConvertError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Quantize `source` to a `width` x `height` index image.
///
/// # Errors
///
/// - [`ConvertError::InvalidDimensions`] unless both sides are non-zero
///   multiples of 8
/// - [`ConvertError::EmptySource`] for a source without pixels
/// - [`ConvertError::MissingCustomMask`] for the custom mask style without a
///   mask
///
/// A bank with no enabled target is not an error; every pixel comes back
/// unset.
///
/// # Example
///
/// ```
/// use nes_quant::{quantize, ColorKnob, DitherConfig, KnobBank, PixelBuffer, Rgb};
///
/// let source = PixelBuffer::filled(16, 16, Rgb::RED);
/// let bank = KnobBank::from_knobs(&[ColorKnob::with_primary(0x06, Rgb::RED)]).unwrap();
///
/// let image = quantize(&source, 8, 8, &bank, &DitherConfig::default()).unwrap();
/// assert!(image.indices().iter().all(|&i| i == 0x06));
/// ```
pub fn quantize(
    source: &PixelBuffer,
    width: usize,
    height: usize,
    bank: &KnobBank,
    dither: &DitherConfig,
) -> Result<IndexImage, ConvertError> {
    quantize_with_errors(source, width, height, bank, dither).map(|q| q.image)
}

/// [`quantize`] that also returns the per-pixel realized error.
pub fn quantize_with_errors(
    source: &PixelBuffer,
    width: usize,
    height: usize,
    bank: &KnobBank,
    dither: &DitherConfig,
) -> Result<Quantization, ConvertError> {
    check_dimensions(width, height)?;
    if source.is_empty() {
        return Err(ConvertError::EmptySource);
    }
    let mut ditherer = ditherer_for(dither, width, height)?;

    let mut image = IndexImage::new(width, height);
    let mut errors = vec![None; width * height];

    let candidates: Vec<Candidate> = bank
        .iter()
        .enumerate()
        .flat_map(|(knob, k)| {
            let greed = k.greed_factor();
            k.enabled_targets().map(move |(_, target)| Candidate {
                knob,
                target,
                greed,
            })
        })
        .collect();
    if candidates.is_empty() {
        return Ok(Quantization { image, errors });
    }
    let bleed: Vec<f32> = bank.iter().map(|k| k.bleed_factor()).collect();

    let rw = (source.width() / width).max(1);
    let rh = (source.height() / height).max(1);
    let scaled = box_resample(source, rw * width, rh * height);
    let (stride, data) = (scaled.width(), scaled.as_bytes());

    let mut votes = [0.0f32; BANK_SIZE];
    let mut sums = [[0i64; 3]; BANK_SIZE];
    let mut counts = [0u32; BANK_SIZE];

    for py in 0..height {
        for px in 0..width {
            votes.fill(0.0);
            sums.fill([0; 3]);
            counts.fill(0);

            let bias = ditherer.bias(px, py);

            for sy in 0..rh {
                for sx in 0..rw {
                    // (px*rw + sx, py*rh + sy) is inside the rw*w x rh*h buffer
                    let src = pixel_at(data, stride, px * rw + sx, py * rh + sy);
                    let (knob, e, dist) = best_match(&candidates, src, bias);
                    votes[knob] += bleed[knob] / dist.max(MIN_VOTE_DISTANCE);
                    let sum = &mut sums[knob];
                    sum[0] += e.r as i64;
                    sum[1] += e.g as i64;
                    sum[2] += e.b as i64;
                    counts[knob] += 1;
                }
            }

            let Some(winner) = pick_winner(&votes, &counts) else {
                continue;
            };
            let knob = &bank[winner];
            if !knob.has_color() {
                continue;
            }

            image.set(px, py, knob.hardware_index);
            let avg = QuantError::mean(sums[winner], counts[winner]);
            errors[py * width + px] = Some(avg);
            ditherer.diffuse(px, py, avg);
        }
        ditherer.end_row();
    }

    Ok(Quantization { image, errors })
}

/// Closest candidate for one sub-pixel: `(knob, vector, distance)`.
///
/// `candidates` must be non-empty.
fn best_match(candidates: &[Candidate], src: Rgb, bias: QuantError) -> (usize, QuantError, f32) {
    let first = candidates[0];
    let e = (first.target - src).scale(first.greed) + bias;
    let mut best = (first.knob, e, distance(e));

    for c in &candidates[1..] {
        let e = (c.target - src).scale(c.greed) + bias;
        let d = distance(e);
        if d < best.2 {
            best = (c.knob, e, d);
        }
    }
    best
}

/// Knob with the most votes among those that won at least one sub-pixel.
fn pick_winner(votes: &[f32; BANK_SIZE], counts: &[u32; BANK_SIZE]) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for k in 0..BANK_SIZE {
        if counts[k] == 0 {
            continue;
        }
        match winner {
            Some(w) if votes[k] <= votes[w] => {}
            _ => winner = Some(k),
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{HARDWARE_COLORS, NO_COLOR};
    use crate::dither::DitherStyle;
    use crate::knob::ColorKnob;
    use crate::output::UNSET;

    fn bank(knobs: &[ColorKnob]) -> KnobBank {
        KnobBank::from_knobs(knobs).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let src = PixelBuffer::filled(8, 8, Rgb::RED);
        let b = bank(&[ColorKnob::new(0x16)]);
        let none = DitherConfig::default();
        for (w, h) in [(0, 8), (8, 0), (12, 8), (8, 9)] {
            assert_eq!(
                quantize(&src, w, h, &b, &none),
                Err(ConvertError::InvalidDimensions { width: w, height: h })
            );
        }
    }

    #[test]
    fn test_rejects_empty_source() {
        let b = bank(&[ColorKnob::new(0x16)]);
        assert_eq!(
            quantize(&PixelBuffer::new(0, 0), 8, 8, &b, &DitherConfig::default()),
            Err(ConvertError::EmptySource)
        );
    }

    #[test]
    fn test_empty_bank_leaves_everything_unset() {
        let src = PixelBuffer::filled(8, 8, Rgb::RED);
        let image = quantize(&src, 8, 8, &KnobBank::default(), &DitherConfig::default()).unwrap();
        assert_eq!(image.unset_count(), 64);
    }

    #[test]
    fn test_single_knob_paints_everything() {
        let src = PixelBuffer::from_fn(16, 16, |x, y| Rgb::new((x * 16) as u8, (y * 16) as u8, 77));
        let b = bank(&[ColorKnob::with_primary(0x21, Rgb::new(3, 200, 9))]);
        for style in [DitherStyle::None, DitherStyle::FloydSteinberg, DitherStyle::MaskZ1] {
            let config = DitherConfig::new().style(style);
            let image = quantize(&src, 8, 8, &b, &config).unwrap();
            assert!(image.indices().iter().all(|&i| i == 0x21), "{style}");
        }
    }

    #[test]
    fn test_no_color_winner_stays_unset() {
        // The no-colour knob is an exact match for the left half
        let src = PixelBuffer::from_fn(16, 8, |x, _| if x < 8 { Rgb::BLACK } else { Rgb::WHITE });
        let b = bank(&[
            ColorKnob::with_primary(NO_COLOR, Rgb::BLACK),
            ColorKnob::with_primary(0x30, Rgb::WHITE),
        ]);
        let q = quantize_with_errors(&src, 16, 8, &b, &DitherConfig::default()).unwrap();
        assert_eq!(q.image.get(0, 0), UNSET);
        assert_eq!(q.image.get(15, 7), 0x30);
        assert_eq!(q.errors[0], None);
        assert_eq!(q.errors[15], Some(QuantError::ZERO));
    }

    #[test]
    fn test_ties_go_to_first_knob() {
        let src = PixelBuffer::filled(8, 8, Rgb::GREY);
        let b = bank(&[
            ColorKnob::with_primary(0x00, Rgb::GREY),
            ColorKnob::with_primary(0x10, Rgb::GREY),
        ]);
        let image = quantize(&src, 8, 8, &b, &DitherConfig::default()).unwrap();
        assert!(image.indices().iter().all(|&i| i == 0x00));
    }

    #[test]
    fn test_bleed_outvotes_closer_knob() {
        // 2x1 region: one sub-pixel is white, the other black. Both knobs
        // match exactly, so each gets 8 votes; bleed doubles the second.
        let src = PixelBuffer::from_fn(16, 8, |x, _| if x % 2 == 0 { Rgb::BLACK } else { Rgb::WHITE });
        let mut white = ColorKnob::with_primary(0x30, Rgb::WHITE);
        let black = ColorKnob::with_primary(0x0F, Rgb::BLACK);

        let image = quantize(&src, 8, 8, &bank(&[black, white]), &DitherConfig::default()).unwrap();
        assert!(image.indices().iter().all(|&i| i == 0x0F));

        white.set_bleed(1);
        let image = quantize(&src, 8, 8, &bank(&[black, white]), &DitherConfig::default()).unwrap();
        assert!(image.indices().iter().all(|&i| i == 0x30));
    }

    #[test]
    fn test_greed_shrinks_distance() {
        let src = PixelBuffer::filled(8, 8, Rgb::new(120, 120, 120));
        let dark = ColorKnob::with_primary(0x0F, Rgb::new(100, 100, 100));
        let mut light = ColorKnob::with_primary(0x30, Rgb::new(150, 150, 150));

        let image = quantize(&src, 8, 8, &bank(&[dark, light]), &DitherConfig::default()).unwrap();
        assert_eq!(image.get(0, 0), 0x0F);

        // 30 * 1.1^-5 ~= 18.6 < 20
        light.set_greed(5);
        let image = quantize(&src, 8, 8, &bank(&[dark, light]), &DitherConfig::default()).unwrap();
        assert_eq!(image.get(0, 0), 0x30);
    }

    #[test]
    fn test_oversampling_source_smaller_than_destination() {
        let src = PixelBuffer::filled(4, 4, HARDWARE_COLORS[0x16]);
        let b = bank(&[ColorKnob::new(0x16), ColorKnob::new(0x30)]);
        let image = quantize(&src, 16, 16, &b, &DitherConfig::default()).unwrap();
        assert_eq!(image.width(), 16);
        assert!(image.indices().iter().all(|&i| i == 0x16));
    }

    #[test]
    fn test_realized_error_without_dither() {
        let src = PixelBuffer::filled(8, 8, Rgb::new(250, 10, 10));
        let b = bank(&[ColorKnob::with_primary(0x16, Rgb::RED)]);
        let q = quantize_with_errors(&src, 8, 8, &b, &DitherConfig::default()).unwrap();
        assert!(q.errors.iter().all(|e| *e == Some(QuantError::new(5, -10, -10))));
    }

    #[test]
    fn test_diffusion_alternates_between_neighbours() {
        // Mid grey between black and white knobs: without dithering one knob
        // takes everything, with diffusion both appear.
        let src = PixelBuffer::filled(8, 8, Rgb::new(128, 128, 128));
        let b = bank(&[
            ColorKnob::with_primary(0x0F, Rgb::BLACK),
            ColorKnob::with_primary(0x30, Rgb::WHITE),
        ]);
        let plain = quantize(&src, 8, 8, &b, &DitherConfig::default()).unwrap();
        let hist = plain.histogram();
        assert!(hist[0x0F] == 64 || hist[0x30] == 64);

        let config = DitherConfig::new().style(DitherStyle::FloydSteinberg);
        let dithered = quantize(&src, 8, 8, &b, &config).unwrap();
        let hist = dithered.histogram();
        assert!(hist[0x0F] > 0 && hist[0x30] > 0, "{hist:?}");
    }

    #[test]
    fn test_missing_custom_mask() {
        let src = PixelBuffer::filled(8, 8, Rgb::RED);
        let config = DitherConfig::new().style(DitherStyle::MaskCustom);
        assert_eq!(
            quantize(&src, 8, 8, &bank(&[ColorKnob::new(0)]), &config),
            Err(ConvertError::MissingCustomMask)
        );
    }
}
