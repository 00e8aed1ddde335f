//! Hardware-index image produced by the quantizer.

use crate::buffer::{put_pixel, BufferError, PixelBuffer};
use crate::color::{hardware_color, Rgb, HARDWARE_COLOR_COUNT, NO_COLOR};

/// Marker for a pixel no knob painted.
pub const UNSET: u8 = NO_COLOR;

/// Index at `(x, y)` of a row-major index grid with `stride` columns.
#[inline]
pub fn index_at(indices: &[u8], stride: usize, x: usize, y: usize) -> u8 {
    indices[y * stride + x]
}

/// Write the index at `(x, y)`.
#[inline]
pub fn put_index(indices: &mut [u8], stride: usize, x: usize, y: usize, index: u8) {
    indices[y * stride + x] = index;
}

/// Whether `index` names a hardware colour (as opposed to [`UNSET`] or any
/// other out-of-range value).
#[inline]
pub fn is_color(index: u8) -> bool {
    (index as usize) < HARDWARE_COLOR_COUNT
}

/// Row-major grid of hardware colour indices.
///
/// Values `0..64` are hardware colours. Anything else, normally [`UNSET`],
/// means "no colour": the quantizer's winning knob had no hardware colour or
/// no knob was enabled. That is a valid outcome, rendered as transparent by
/// [`to_rgba`](Self::to_rgba).
///
/// # Example
///
/// ```
/// use nes_quant::{IndexImage, Rgb, UNSET};
///
/// let mut image = IndexImage::new(2, 1);
/// image.set(0, 0, 0x30);
///
/// assert_eq!(image.get(1, 0), UNSET);
/// let rgb = image.resolve();
/// assert_eq!(rgb.get(0, 0), Rgb::WHITE);
/// assert_eq!(rgb.get(1, 0), Rgb::BLACK);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexImage {
    width: usize,
    height: usize,
    indices: Vec<u8>,
}

impl IndexImage {
    /// All-unset image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, UNSET)
    }

    pub fn filled(width: usize, height: usize, index: u8) -> Self {
        Self {
            width,
            height,
            indices: vec![index; width * height],
        }
    }

    pub fn from_indices(indices: Vec<u8>, width: usize, height: usize) -> Result<Self, BufferError> {
        let expected = width * height;
        if indices.len() != expected {
            return Err(BufferError::IndexLengthMismatch {
                width,
                height,
                expected,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    /// Parse rows of hex digit pairs separated by whitespace, `..` for unset.
    /// Mostly useful for writing readable fixtures.
    ///
    /// ```
    /// use nes_quant::{IndexImage, UNSET};
    ///
    /// let image = IndexImage::from_rows(&["0F 30", ".. 16"]).unwrap();
    /// assert_eq!(image.get(1, 0), 0x30);
    /// assert_eq!(image.get(0, 1), UNSET);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let mut indices = Vec::new();
        let mut width = None;
        for row in rows {
            let before = indices.len();
            for cell in row.split_whitespace() {
                let index = if cell == ".." {
                    UNSET
                } else {
                    u8::from_str_radix(cell, 16).ok()?
                };
                indices.push(index);
            }
            let w = indices.len() - before;
            if *width.get_or_insert(w) != w {
                return None;
            }
        }
        Self::from_indices(indices, width.unwrap_or(0), height).ok()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Index at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        index_at(&self.indices, self.width, x, y)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, index: u8) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        put_index(&mut self.indices, self.width, x, y, index);
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub(crate) fn indices_mut(&mut self) -> &mut [u8] {
        &mut self.indices
    }

    #[inline]
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    /// Number of pixels without a hardware colour.
    pub fn unset_count(&self) -> usize {
        self.indices.iter().filter(|&&i| !is_color(i)).count()
    }

    /// How often each hardware colour occurs.
    pub fn histogram(&self) -> [usize; HARDWARE_COLOR_COUNT] {
        let mut counts = [0; HARDWARE_COLOR_COUNT];
        for &i in &self.indices {
            if is_color(i) {
                counts[i as usize] += 1;
            }
        }
        counts
    }

    /// Map every pixel through the hardware palette. Unset pixels become
    /// black.
    pub fn resolve(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.width, self.height);
        let data = out.as_bytes_mut();
        for y in 0..self.height {
            for x in 0..self.width {
                let rgb = hardware_color(index_at(&self.indices, self.width, x, y)).unwrap_or(Rgb::BLACK);
                put_pixel(data, self.width, x, y, rgb);
            }
        }
        out
    }

    /// RGBA bytes: hardware colours opaque, unset pixels fully transparent
    /// black.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.indices.len() * 4);
        for &i in &self.indices {
            match hardware_color(i) {
                Some(c) => rgba.extend_from_slice(&[c.r, c.g, c.b, 255]),
                None => rgba.extend_from_slice(&[0, 0, 0, 0]),
            }
        }
        rgba
    }
}
