//! Row-major RGB pixel grid.

use super::error::BufferError;
use crate::color::Rgb;

/// Bytes per pixel.
const CHANNELS: usize = 3;

/// Read the pixel at `(x, y)` from packed RGB bytes with `stride` pixels per
/// row.
///
/// Callers guarantee `x < stride` and that row `y` lies inside `data`;
/// violating that panics on the slice index.
#[inline]
pub fn pixel_at(data: &[u8], stride: usize, x: usize, y: usize) -> Rgb {
    let i = (y * stride + x) * CHANNELS;
    Rgb::new(data[i], data[i + 1], data[i + 2])
}

/// Write the pixel at `(x, y)`. Same bounds contract as [`pixel_at`].
#[inline]
pub fn put_pixel(data: &mut [u8], stride: usize, x: usize, y: usize, rgb: Rgb) {
    let i = (y * stride + x) * CHANNELS;
    data[i] = rgb.r;
    data[i + 1] = rgb.g;
    data[i + 2] = rgb.b;
}

/// An RGB image, 3 bytes per pixel, rows packed without padding.
///
/// # Example
///
/// ```
/// use nes_quant::{PixelBuffer, Rgb};
///
/// let mut buf = PixelBuffer::filled(8, 8, Rgb::WHITE);
/// buf.set(3, 2, Rgb::RED);
///
/// assert_eq!(buf.get(3, 2), Rgb::RED);
/// assert_eq!(buf.as_bytes().len(), 8 * 8 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// All-black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    pub fn filled(width: usize, height: usize, rgb: Rgb) -> Self {
        let data = rgb
            .to_bytes()
            .iter()
            .copied()
            .cycle()
            .take(width * height * CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap packed RGB bytes.
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize) -> Result<Self, BufferError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_pixels(pixels: &[Rgb], width: usize, height: usize) -> Result<Self, BufferError> {
        let data = pixels.iter().flat_map(|p| p.to_bytes()).collect();
        Self::from_raw(data, width, height)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_bytes());
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        pixel_at(&self.data, self.width, x, y)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, rgb: Rgb) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        put_pixel(&mut self.data, self.width, x, y, rgb);
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
    }
}
