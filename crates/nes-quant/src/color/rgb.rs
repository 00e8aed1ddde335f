//! 8-bit RGB colour and signed quantization error.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use super::error::ParseColorError;

/// An 8-bit RGB colour.
///
/// Equality and ordering compare the `(r, g, b)` tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREY: Rgb = Rgb::new(127, 127, 127);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channel by position (0 = red, 1 = green, anything else = blue).
    #[inline]
    pub fn channel(self, c: usize) -> u8 {
        match c {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    /// `#RRGGBB` representation, uppercase.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive,
    /// surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

/// Signed per-channel difference between two colours.
///
/// Used both as the colour-matching vector (`target - source`, possibly
/// scaled and biased) and as the accumulated dither error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantError {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl QuantError {
    pub const ZERO: QuantError = QuantError::new(0, 0, 0);

    #[inline]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// `a - b`, channel by channel.
    #[inline]
    pub fn between(a: Rgb, b: Rgb) -> Self {
        Self::new(
            a.r as i32 - b.r as i32,
            a.g as i32 - b.g as i32,
            a.b as i32 - b.b as i32,
        )
    }

    /// Multiply every channel by `factor`, rounding to nearest.
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            (self.r as f32 * factor).round() as i32,
            (self.g as f32 * factor).round() as i32,
            (self.b as f32 * factor).round() as i32,
        )
    }

    /// Integer mean of a wide channel sum (truncates toward zero).
    #[inline]
    pub fn mean(sum: [i64; 3], count: u32) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let n = count as i64;
        let ch = |c: i64| (c / n).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Self::new(ch(sum[0]), ch(sum[1]), ch(sum[2]))
    }

    /// Clamp every channel to `-limit..=limit`.
    #[inline]
    pub fn clamp(self, limit: i32) -> Self {
        Self::new(
            self.r.clamp(-limit, limit),
            self.g.clamp(-limit, limit),
            self.b.clamp(-limit, limit),
        )
    }

    /// Zero every channel whose magnitude is below `threshold`.
    #[inline]
    pub fn dead_zone(self, threshold: i32) -> Self {
        let cut = |c: i32| if c.abs() < threshold { 0 } else { c };
        Self::new(cut(self.r), cut(self.g), cut(self.b))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for QuantError {
    type Output = QuantError;

    #[inline]
    fn add(self, rhs: QuantError) -> QuantError {
        QuantError::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::AddAssign for QuantError {
    #[inline]
    fn add_assign(&mut self, rhs: QuantError) {
        *self = *self + rhs;
    }
}

impl Sub for Rgb {
    type Output = QuantError;

    #[inline]
    fn sub(self, rhs: Rgb) -> QuantError {
        QuantError::between(self, rhs)
    }
}

/// Euclidean norm of a quantization error.
#[inline]
pub fn distance(q: QuantError) -> f32 {
    let (r, g, b) = (q.r as f32, q.g as f32, q.b as f32);
    (r * r + g * g + b * b).sqrt()
}

/// Euclidean distance between two colours.
#[inline]
pub fn distance_rgb(a: Rgb, b: Rgb) -> f32 {
    distance(a - b)
}

/// Hue angle in whole degrees, `0..360`.
///
/// Uses the max/min channel formula and returns 0 for achromatic colours.
pub fn hue(c: Rgb) -> u16 {
    let (r, g, b) = (c.r as i32, c.g as i32, c.b as i32);
    let min = r.min(g).min(b);
    let max = r.max(g).max(b);

    if min == max {
        return 0;
    }

    let span = (max - min) as f32;
    let sector = if max == r {
        (g - b) as f32 / span
    } else if max == g {
        2.0 + (b - r) as f32 / span
    } else {
        4.0 + (r - g) as f32 / span
    };

    let mut degrees = sector * 60.0;
    if degrees < 0.0 {
        degrees += 360.0;
    }

    // 359.6 and up would round onto 360
    (degrees.round() as u16) % 360
}
