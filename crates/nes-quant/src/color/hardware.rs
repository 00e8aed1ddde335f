//! The fixed 64-entry hardware palette.
//!
//! Values are the reference table the converter was tuned against; they are
//! not interchangeable with other published NES palettes. Outputs are only
//! bit-exact against this table.

use super::rgb::{distance_rgb, Rgb};

/// Number of hardware colours.
pub const HARDWARE_COLOR_COUNT: usize = 64;

/// Sentinel index meaning "no colour". Any index `>= 64` is treated the same.
pub const NO_COLOR: u8 = 0xFF;

/// Reference hardware palette, indexed by hardware colour number.
pub const HARDWARE_COLORS: [Rgb; HARDWARE_COLOR_COUNT] = [
    // $00-$0F
    Rgb::new(101, 101, 101),
    Rgb::new(0, 43, 155),
    Rgb::new(17, 14, 192),
    Rgb::new(63, 0, 188),
    Rgb::new(102, 0, 143),
    Rgb::new(123, 0, 69),
    Rgb::new(121, 1, 0),
    Rgb::new(96, 28, 0),
    Rgb::new(54, 56, 0),
    Rgb::new(8, 79, 0),
    Rgb::new(0, 90, 0),
    Rgb::new(0, 87, 2),
    Rgb::new(0, 69, 85),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
    // $10-$1F
    Rgb::new(174, 174, 174),
    Rgb::new(7, 97, 245),
    Rgb::new(62, 59, 255),
    Rgb::new(124, 29, 255),
    Rgb::new(175, 14, 229),
    Rgb::new(203, 19, 131),
    Rgb::new(200, 42, 21),
    Rgb::new(167, 77, 0),
    Rgb::new(111, 114, 0),
    Rgb::new(50, 145, 0),
    Rgb::new(0, 159, 0),
    Rgb::new(0, 155, 42),
    Rgb::new(0, 132, 152),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
    // $20-$2F
    Rgb::new(255, 255, 255),
    Rgb::new(86, 177, 255),
    Rgb::new(142, 139, 255),
    Rgb::new(204, 108, 255),
    Rgb::new(255, 93, 255),
    Rgb::new(255, 98, 212),
    Rgb::new(255, 121, 100),
    Rgb::new(248, 157, 6),
    Rgb::new(192, 195, 0),
    Rgb::new(129, 226, 0),
    Rgb::new(77, 241, 22),
    Rgb::new(48, 236, 122),
    Rgb::new(52, 213, 234),
    Rgb::new(78, 78, 78),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
    // $30-$3F
    Rgb::new(255, 255, 255),
    Rgb::new(186, 223, 255),
    Rgb::new(209, 208, 255),
    Rgb::new(235, 195, 255),
    Rgb::new(255, 189, 255),
    Rgb::new(255, 191, 238),
    Rgb::new(255, 200, 192),
    Rgb::new(252, 215, 153),
    Rgb::new(229, 231, 132),
    Rgb::new(204, 243, 135),
    Rgb::new(182, 249, 160),
    Rgb::new(170, 248, 201),
    Rgb::new(172, 238, 247),
    Rgb::new(183, 183, 183),
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 0),
];

/// Colour of a hardware index, or `None` for the "no colour" range.
#[inline]
pub fn hardware_color(index: u8) -> Option<Rgb> {
    HARDWARE_COLORS.get(index as usize).copied()
}

/// `$XX` label for a hardware index, `N/A` for "no colour".
pub fn hardware_label(index: u8) -> String {
    if (index as usize) < HARDWARE_COLOR_COUNT {
        format!("${index:02X}")
    } else {
        "N/A".to_string()
    }
}

/// First hardware index with minimum distance to `color`, scanning `0..64`
/// ascending and skipping indices for which `skip` returns true.
///
/// Returns `None` only when every index is skipped.
pub fn nearest_hardware_index(color: Rgb, skip: impl Fn(u8) -> bool) -> Option<u8> {
    let mut best: Option<(u8, f32)> = None;

    for (i, &hw) in HARDWARE_COLORS.iter().enumerate() {
        let i = i as u8;
        if skip(i) {
            continue;
        }
        let d = distance_rgb(color, hw);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }

    best.map(|(i, _)| i)
}
