//! Dithering: perturbations applied around each quantizer decision.
//!
//! The quantizer talks to a [`Ditherer`] at two points per destination
//! pixel:
//!
//! 1. **before** choosing a knob it asks for a [`bias`](Ditherer::bias) that
//!    is added to every colour-match vector of the pixel;
//! 2. **after** choosing it hands over the realized average error through
//!    [`diffuse`](Ditherer::diffuse).
//!
//! Three families implement this:
//!
//! - [`NoDither`]: zero bias, nothing stored.
//! - [`MaskDither`]: position-dependent bias from a tiled mask image.
//! - [`DiffusionDither`]: bias is the pending error pushed onto the pixel by
//!   already finished neighbours; realized errors are spread with a
//!   [`Kernel`].

mod kernel;
mod mask;
mod options;

pub use kernel::*;
pub use mask::{brix_mask, cz332_mask, z1_mask, MaskDither};
pub use options::{DitherConfig, DitherStyle, ParseStyleError, CUTOFF_MAX, SCALE_MAX};

use crate::api::ConvertError;
use crate::color::QuantError;

/// Largest per-channel bias a diffusion ditherer hands out.
///
/// Realized error includes the bias it was computed with, so a source the
/// knobs cannot reach would otherwise grow the pending error without bound.
/// The limit sits above the largest greed-scaled match vector
/// (`255 * 1.1^20`).
pub const MAX_BIAS: i32 = 2048;

/// Perturbation source consulted by the quantizer.
///
/// Calls arrive in row-major order: `bias`/`diffuse` for every pixel of a row,
/// then `end_row`.
pub trait Ditherer {
    /// Offset added to every `target - source` vector of pixel `(x, y)`.
    fn bias(&self, x: usize, y: usize) -> QuantError;

    /// Realized average error of the finished pixel `(x, y)`.
    fn diffuse(&mut self, x: usize, y: usize, error: QuantError);

    /// Current row is complete.
    fn end_row(&mut self) {}
}

/// Ditherer that never perturbs anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDither;

impl Ditherer for NoDither {
    #[inline]
    fn bias(&self, _x: usize, _y: usize) -> QuantError {
        QuantError::ZERO
    }

    #[inline]
    fn diffuse(&mut self, _x: usize, _y: usize, _error: QuantError) {}
}

/// Sliding window of pending error rows.
///
/// Only the rows a kernel can reach are stored: `rows[0]` is the row being
/// quantized, `rows[n]` the row `n` below it.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// `row_depth` is the kernel's `max_dy + 1`.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Pending error at column `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to column `x`, `row_offset` rows below the current one.
    ///
    /// Targets left of the image, right of it, above the current row or
    /// beyond the window are dropped.
    #[inline]
    pub fn add_error(&mut self, x: isize, row_offset: isize, error: [f32; 3]) {
        if x < 0 || row_offset < 0 {
            return;
        }
        let (x, row_offset) = (x as usize, row_offset as usize);
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Move the window down one row.
    pub fn advance_row(&mut self) {
        // Rotate left: [0,1,2] -> [1,2,0]
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }

    #[cfg(test)]
    fn total(&self) -> [f32; 3] {
        let mut t = [0.0; 3];
        for row in &self.rows {
            for e in row {
                for c in 0..3 {
                    t[c] += e[c];
                }
            }
        }
        t
    }
}

/// Error-diffusion ditherer for the Waves, FloydSteinberg, Horizontal and
/// VanGogh styles.
#[derive(Debug)]
pub struct DiffusionDither {
    style: DitherStyle,
    buffer: ErrorBuffer,
    height: usize,
    row: usize,
    attenuation: f32,
    dead_zone: i32,
}

impl DiffusionDither {
    /// Diffuser for a `width` x `height` destination.
    ///
    /// Pending error is attenuated by `1.11^(-scale)` when read back as bias;
    /// realized error channels below `dead_zone` in magnitude are dropped
    /// before spreading.
    pub fn new(style: DitherStyle, width: usize, height: usize, scale: u8, dead_zone: i32) -> Self {
        Self {
            style,
            buffer: ErrorBuffer::new(width, style.max_dy() + 1),
            height,
            row: 0,
            attenuation: 1.11f32.powi(-(scale as i32)),
            dead_zone,
        }
    }

    fn push(&mut self, tx: isize, ty: isize, share: [f32; 3]) {
        if ty >= self.height as isize {
            return;
        }
        // VanGogh blocks on odd rows reach back to the finished row above
        let offset = (ty - self.row as isize).max(0);
        self.buffer.add_error(tx, offset, share);
    }
}

impl Ditherer for DiffusionDither {
    fn bias(&self, x: usize, y: usize) -> QuantError {
        debug_assert_eq!(y, self.row, "bias requested off the current row");
        let pending = self.buffer.get_accumulated(x);
        let ch = |v: f32| (v * self.attenuation).round() as i32;
        QuantError::new(ch(pending[0]), ch(pending[1]), ch(pending[2])).clamp(MAX_BIAS)
    }

    fn diffuse(&mut self, x: usize, y: usize, error: QuantError) {
        let error = error.dead_zone(self.dead_zone);
        if error.is_zero() {
            return;
        }
        let Some(kernel) = self.style.kernel_for_row(y) else {
            return;
        };

        let e = [error.r as f32, error.g as f32, error.b as f32];
        let block = kernel.block as isize;
        let cells = (kernel.block * kernel.block) as f32;
        let (cx, cy) = ((x / kernel.block) as isize, (y / kernel.block) as isize);

        for &(dx, dy, weight) in kernel.entries {
            let f = weight as f32 / kernel.divisor as f32 / cells;
            let share = [e[0] * f, e[1] * f, e[2] * f];
            let (tx0, ty0) = ((cx + dx as isize) * block, (cy + dy as isize) * block);
            for by in 0..block {
                for bx in 0..block {
                    self.push(tx0 + bx, ty0 + by, share);
                }
            }
        }
    }

    fn end_row(&mut self) {
        self.buffer.advance_row();
        self.row += 1;
    }
}

/// Build the ditherer a config asks for, sized for a `width` x `height`
/// destination.
///
/// Fails only for [`DitherStyle::MaskCustom`] without a usable mask image.
pub fn ditherer_for<'a>(
    config: &'a DitherConfig,
    width: usize,
    height: usize,
) -> Result<Box<dyn Ditherer + 'a>, ConvertError> {
    let magnify = config.mask_scale();
    let ditherer: Box<dyn Ditherer + 'a> = match config.style {
        DitherStyle::None => Box::new(NoDither),
        DitherStyle::MaskZ1 => Box::new(MaskDither::owned(z1_mask(), magnify, config.scale)),
        DitherStyle::MaskCZ332 => Box::new(MaskDither::owned(cz332_mask(), magnify, config.scale)),
        DitherStyle::MaskBrix => Box::new(MaskDither::owned(brix_mask(), magnify, config.scale)),
        DitherStyle::MaskCustom => match &config.custom_mask {
            Some(mask) if !mask.is_empty() => Box::new(MaskDither::new(mask, magnify, config.scale)),
            _ => return Err(ConvertError::MissingCustomMask),
        },
        style => Box::new(DiffusionDither::new(
            style,
            width,
            height,
            config.scale,
            config.dead_zone(),
        )),
    };
    Ok(ditherer)
}
