//! Error diffusion kernel definitions.
//!
//! Each kernel spreads a finished pixel's realized error over neighbouring
//! destination pixels that have not been quantized yet.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbour receives
/// `error * weight / divisor`. With `block == 2` the offsets are in
/// half-resolution cells and each cell splits its share evenly over the 2x2
/// destination pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// (dx, dy, weight) entries.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Edge length of the cell an offset addresses (1 = pixel, 2 = 2x2 block).
    pub block: usize,

    /// Furthest destination row below the current one the kernel writes.
    ///
    /// The pending-error window needs `max_dy + 1` rows.
    pub max_dy: usize,
}

/// Waves: straight down and down-right.
///
/// ```text
///    X
///    3   1
/// ```
pub const WAVES: Kernel = Kernel {
    entries: &[
        (0, 1, 3), // bottom
        (1, 1, 1), // bottom-right
    ],
    divisor: 4,
    block: 1,
    max_dy: 1,
};

/// Floyd-Steinberg variant that sends its last sixteenth two rows down.
///
/// ```text
///        X   7
///    3   5
///        1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (0, 2, 1),  // two below
    ],
    divisor: 16,
    block: 1,
    max_dy: 2,
};

/// Forward-only kernel used on odd rows by the horizontal style.
///
/// ```text
///    X   1   3
/// ```
pub const HORIZONTAL_ODD: Kernel = Kernel {
    entries: &[
        (1, 0, 1), // right
        (2, 0, 3), // two right
    ],
    divisor: 4,
    block: 1,
    max_dy: 0,
};

/// Floyd-Steinberg weights on a half-resolution grid.
///
/// A cell two rows down covers destination rows up to `2 * (y/2 + 2) + 1`,
/// which is at most five rows below `y`.
pub const VAN_GOGH: Kernel = Kernel {
    entries: FLOYD_STEINBERG.entries,
    divisor: 16,
    block: 2,
    max_dy: 5,
};

impl Kernel {
    /// Sum of weights over the divisor.
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}
