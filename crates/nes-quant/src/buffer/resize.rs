//! Box-filter resampling.
//!
//! Each target pixel averages the source rectangle it covers. When upscaling
//! the rectangle shrinks to a single source pixel (nearest neighbour), so the
//! result is always defined and bit-for-bit reproducible.

use super::pixel_buffer::{pixel_at, put_pixel, PixelBuffer};
use crate::color::Rgb;

/// Source span `[start, end)` covered by target column/row `i` of `target`.
#[inline]
fn span(i: usize, source: usize, target: usize) -> (usize, usize) {
    let start = i * source / target;
    let end = ((i + 1) * source / target).max(start + 1);
    (start, end)
}

/// Resample `src` to `width` x `height` with a box filter.
///
/// Averages are rounded to nearest. Returns a clone when the size already
/// matches, and an empty buffer when either side is empty.
pub fn box_resample(src: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    if src.is_empty() || width == 0 || height == 0 {
        return PixelBuffer::new(width, height);
    }

    let (sw, sh) = (src.width(), src.height());
    let data = src.as_bytes();
    let mut out = PixelBuffer::new(width, height);
    let out_data = out.as_bytes_mut();

    for ty in 0..height {
        let (y0, y1) = span(ty, sh, height);
        for tx in 0..width {
            let (x0, x1) = span(tx, sw, width);

            let mut sum = [0u32; 3];
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let p = pixel_at(data, sw, sx, sy);
                    sum[0] += p.r as u32;
                    sum[1] += p.g as u32;
                    sum[2] += p.b as u32;
                }
            }
            let n = ((y1 - y0) * (x1 - x0)) as u32;
            let avg = |s: u32| ((s + n / 2) / n) as u8;
            put_pixel(
                out_data,
                width,
                tx,
                ty,
                Rgb::new(avg(sum[0]), avg(sum[1]), avg(sum[2])),
            );
        }
    }

    out
}
