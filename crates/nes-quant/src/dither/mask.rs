//! Ordered-mask dithering.
//!
//! A mask is a small tileable RGB image. Each channel is read as a signed
//! offset around 128 and added to every colour match of a destination pixel
//! before the winning knob is chosen. Unlike diffusion, the bias depends only
//! on the pixel position, so neighbouring pixels never influence each other.
//!
//! The built-in masks are generated from Bayer threshold matrices:
//!
//! | Mask  | Size | Channels |
//! |-------|------|----------|
//! | Z1    | 4x4  | one grey ramp, 16 levels |
//! | CZ332 | 8x8  | red and green 8 levels, blue 4 levels, each phase-shifted |
//! | Brix  | 8x8  | grey brick courses with dark mortar |

use std::borrow::Cow;

use super::Ditherer;
use crate::buffer::{pixel_at, PixelBuffer};
use crate::color::{QuantError, Rgb};

/// 4x4 Bayer threshold matrix (0..16).
const BAYER_4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// 8x8 Bayer threshold value (0..64) at `(x, y)`, built recursively from the
/// 2x2 seed.
fn bayer_8(x: usize, y: usize) -> u8 {
    let mut v = 0u8;
    for bit in 0..3 {
        let xb = (x >> bit) & 1;
        let yb = (y >> bit) & 1;
        // 2x2 seed: [[0, 2], [3, 1]]
        let seed = match (xb, yb) {
            (0, 0) => 0,
            (1, 0) => 2,
            (0, _) => 3,
            _ => 1,
        };
        v |= seed << (2 * (2 - bit));
    }
    v
}

/// Spread `level` of `levels` evenly around 128.
#[inline]
fn centered(level: u8, levels: u8) -> u8 {
    let step = 256.0 / levels as f32;
    (128.0 + (level as f32 - (levels as f32 - 1.0) / 2.0) * step).round() as u8
}

/// 4x4 greyscale Bayer mask.
pub fn z1_mask() -> PixelBuffer {
    PixelBuffer::from_fn(4, 4, |x, y| {
        let v = centered(BAYER_4[y][x], 16);
        Rgb::new(v, v, v)
    })
}

/// 8x8 per-channel Bayer mask with 8/8/4 levels.
pub fn cz332_mask() -> PixelBuffer {
    PixelBuffer::from_fn(8, 8, |x, y| {
        let r = bayer_8(x, y) / 8;
        let g = bayer_8((x + 4) % 8, (y + 2) % 8) / 8;
        let b = bayer_8((x + 2) % 8, (y + 4) % 8) / 16;
        Rgb::new(centered(r, 8), centered(g, 8), centered(b, 4))
    })
}

/// 8x8 brick mask: 4-row courses offset by half a brick.
pub fn brix_mask() -> PixelBuffer {
    PixelBuffer::from_fn(8, 8, |x, y| {
        let offset = (y / 4 % 2) * 4;
        let bx = (x + offset) % 8;
        let by = y % 4;
        let v = if bx == 0 || by == 0 {
            48
        } else {
            136 + 24 * ((bx + by) % 3) as u8
        };
        Rgb::new(v, v, v)
    })
}

/// Pre-selection bias from a tiled, magnified mask.
pub struct MaskDither<'a> {
    mask: Cow<'a, PixelBuffer>,
    magnify: f32,
    strength: f32,
}

impl<'a> MaskDither<'a> {
    /// `magnify` stretches each mask texel over that many destination
    /// pixels; `scale` (0..=40) fades the bias to nothing at 40.
    pub fn new(mask: &'a PixelBuffer, magnify: usize, scale: u8) -> Self {
        Self::from_cow(Cow::Borrowed(mask), magnify, scale)
    }

    /// Same as [`new`](Self::new) for a mask the ditherer keeps.
    pub fn owned(mask: PixelBuffer, magnify: usize, scale: u8) -> Self {
        Self::from_cow(Cow::Owned(mask), magnify, scale)
    }

    fn from_cow(mask: Cow<'a, PixelBuffer>, magnify: usize, scale: u8) -> Self {
        Self {
            mask,
            magnify: magnify.max(1) as f32,
            strength: (40.0 - scale.min(40) as f32) / 40.0,
        }
    }

    /// Bilinear sample of the tiled mask at fractional texel coordinates.
    fn sample(&self, fx: f32, fy: f32) -> [f32; 3] {
        let (mw, mh) = (self.mask.width(), self.mask.height());
        let data = self.mask.as_bytes();

        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let x0 = x0 as usize % mw;
        let y0 = y0 as usize % mh;
        let x1 = (x0 + 1) % mw;
        let y1 = (y0 + 1) % mh;

        let p00 = pixel_at(data, mw, x0, y0).to_bytes();
        let p10 = pixel_at(data, mw, x1, y0).to_bytes();
        let p01 = pixel_at(data, mw, x0, y1).to_bytes();
        let p11 = pixel_at(data, mw, x1, y1).to_bytes();

        let mut out = [0.0; 3];
        for c in 0..3 {
            let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
            let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
            out[c] = top * (1.0 - ty) + bottom * ty;
        }
        out
    }
}

impl Ditherer for MaskDither<'_> {
    fn bias(&self, x: usize, y: usize) -> QuantError {
        if self.mask.is_empty() {
            return QuantError::ZERO;
        }
        let d = self.sample(x as f32 / self.magnify, y as f32 / self.magnify);
        let ch = |v: f32| ((v - 128.0) * self.strength).round() as i32;
        QuantError::new(ch(d[0]), ch(d[1]), ch(d[2]))
    }

    fn diffuse(&mut self, _x: usize, _y: usize, _error: QuantError) {}
}
