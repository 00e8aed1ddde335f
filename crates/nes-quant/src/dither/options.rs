//! Dither style selection and configuration.

use std::fmt;
use std::str::FromStr;

use super::kernel::{Kernel, FLOYD_STEINBERG, HORIZONTAL_ODD, VAN_GOGH, WAVES};
use crate::buffer::PixelBuffer;

/// Highest accepted dither scale.
pub const SCALE_MAX: u8 = 40;

/// Highest accepted dither cutoff.
pub const CUTOFF_MAX: u8 = 48;

/// How the quantizer is perturbed.
///
/// Mask styles bias every colour match with a tiled reference pattern before
/// the knob is chosen. Diffusion styles carry each finished pixel's realized
/// error forward to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherStyle {
    /// No perturbation.
    #[default]
    None,
    /// Diffusion straight down and down-right.
    Waves,
    /// Floyd-Steinberg style diffusion.
    FloydSteinberg,
    /// Alternates downward and forward-only diffusion by row.
    Horizontal,
    /// Floyd-Steinberg weights at half resolution.
    VanGogh,
    /// 4x4 greyscale ordered mask.
    MaskZ1,
    /// 8x8 per-channel ordered mask (8/8/4 levels).
    MaskCZ332,
    /// Brick-pattern ordered mask.
    MaskBrix,
    /// User-supplied mask image.
    MaskCustom,
}

impl DitherStyle {
    /// Every style, in menu order.
    pub const ALL: [DitherStyle; 9] = [
        DitherStyle::None,
        DitherStyle::Waves,
        DitherStyle::FloydSteinberg,
        DitherStyle::Horizontal,
        DitherStyle::VanGogh,
        DitherStyle::MaskZ1,
        DitherStyle::MaskCZ332,
        DitherStyle::MaskBrix,
        DitherStyle::MaskCustom,
    ];

    /// Kebab-case name used in project files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DitherStyle::None => "none",
            DitherStyle::Waves => "waves",
            DitherStyle::FloydSteinberg => "floyd-steinberg",
            DitherStyle::Horizontal => "horizontal",
            DitherStyle::VanGogh => "van-gogh",
            DitherStyle::MaskZ1 => "mask-z1",
            DitherStyle::MaskCZ332 => "mask-cz332",
            DitherStyle::MaskBrix => "mask-brix",
            DitherStyle::MaskCustom => "mask-custom",
        }
    }

    #[inline]
    pub fn is_mask(self) -> bool {
        matches!(
            self,
            DitherStyle::MaskZ1 | DitherStyle::MaskCZ332 | DitherStyle::MaskBrix | DitherStyle::MaskCustom
        )
    }

    #[inline]
    pub fn is_diffusion(self) -> bool {
        matches!(
            self,
            DitherStyle::Waves | DitherStyle::FloydSteinberg | DitherStyle::Horizontal | DitherStyle::VanGogh
        )
    }

    /// Kernel used when diffusing out of row `y`, or `None` for non-diffusion
    /// styles.
    pub fn kernel_for_row(self, y: usize) -> Option<&'static Kernel> {
        match self {
            DitherStyle::Waves => Some(&WAVES),
            DitherStyle::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherStyle::Horizontal if y % 2 == 0 => Some(&WAVES),
            DitherStyle::Horizontal => Some(&HORIZONTAL_ODD),
            DitherStyle::VanGogh => Some(&VAN_GOGH),
            _ => None,
        }
    }

    /// Deepest row offset any of the style's kernels writes to.
    pub(crate) fn max_dy(self) -> usize {
        [self.kernel_for_row(0), self.kernel_for_row(1)]
            .into_iter()
            .flatten()
            .map(|k| k.max_dy)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for DitherStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for an unknown dither style name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dither style '{0}'")]
pub struct ParseStyleError(pub String);

impl FromStr for DitherStyle {
    type Err = ParseStyleError;

    /// Accepts the kebab-case name, case-insensitively; `floyd`, `z1`,
    /// `cz332`, `brix` and `custom` are accepted as short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let style = match lower.as_str() {
            "floyd" => DitherStyle::FloydSteinberg,
            "z1" => DitherStyle::MaskZ1,
            "cz332" => DitherStyle::MaskCZ332,
            "brix" => DitherStyle::MaskBrix,
            "custom" => DitherStyle::MaskCustom,
            other => DitherStyle::ALL
                .into_iter()
                .find(|st| st.name() == other)
                .ok_or_else(|| ParseStyleError(s.to_string()))?,
        };
        Ok(style)
    }
}

/// Dithering configuration consulted by the quantizer.
///
/// `scale` (0..=40) weakens the perturbation as it grows: mask bias is
/// multiplied by `(40 - scale) / 40`, pending diffusion error by
/// `1.11^(-scale)`. `cutoff` (0..=48) is the diffusion dead zone in units of
/// 8 and, for masks, the tile magnification `(cutoff + 8) / 8`.
///
/// # Example
///
/// ```
/// use nes_quant::{DitherConfig, DitherStyle};
///
/// let config = DitherConfig::new()
///     .style(DitherStyle::FloydSteinberg)
///     .scale(10)
///     .cutoff(99);
///
/// assert_eq!(config.cutoff, 48);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DitherConfig {
    pub style: DitherStyle,
    /// Perturbation attenuation, `0..=40`.
    pub scale: u8,
    /// Dead zone / mask magnification, `0..=48`.
    pub cutoff: u8,
    /// Mask image for [`DitherStyle::MaskCustom`].
    pub custom_mask: Option<PixelBuffer>,
}

impl DitherConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn style(mut self, style: DitherStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the scale, clamped to `0..=40`.
    #[inline]
    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = scale.min(SCALE_MAX);
        self
    }

    /// Set the cutoff, clamped to `0..=48`.
    #[inline]
    pub fn cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff.min(CUTOFF_MAX);
        self
    }

    #[inline]
    pub fn custom_mask(mut self, mask: PixelBuffer) -> Self {
        self.custom_mask = Some(mask);
        self
    }

    /// Diffusion dead-zone threshold per channel.
    #[inline]
    pub fn dead_zone(&self) -> i32 {
        self.cutoff.min(CUTOFF_MAX) as i32 * 8
    }

    /// Integer mask magnification.
    #[inline]
    pub fn mask_scale(&self) -> usize {
        (self.cutoff.min(CUTOFF_MAX) as usize + 8) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DitherConfig::default();
        assert_eq!(config.style, DitherStyle::None);
        assert_eq!(config.scale, 0);
        assert_eq!(config.cutoff, 0);
        assert!(config.custom_mask.is_none());
        assert_eq!(config.mask_scale(), 1);
        assert_eq!(config.dead_zone(), 0);
    }

    #[test]
    fn test_builder_clamps() {
        let config = DitherConfig::new().scale(200).cutoff(200);
        assert_eq!(config.scale, SCALE_MAX);
        assert_eq!(config.cutoff, CUTOFF_MAX);
        assert_eq!(config.dead_zone(), 384);
        assert_eq!(config.mask_scale(), 7);
    }

    #[test]
    fn test_mask_scale_steps() {
        assert_eq!(DitherConfig::new().cutoff(7).mask_scale(), 1);
        assert_eq!(DitherConfig::new().cutoff(8).mask_scale(), 2);
        assert_eq!(DitherConfig::new().cutoff(23).mask_scale(), 3);
    }

    #[test]
    fn test_style_classes_are_disjoint() {
        for style in DitherStyle::ALL {
            assert!(!(style.is_mask() && style.is_diffusion()), "{style}");
            assert_eq!(style.kernel_for_row(0).is_some(), style.is_diffusion());
        }
        assert!(!DitherStyle::None.is_mask());
        assert!(!DitherStyle::None.is_diffusion());
    }

    #[test]
    fn test_horizontal_alternates() {
        assert_eq!(DitherStyle::Horizontal.kernel_for_row(0), Some(&WAVES));
        assert_eq!(DitherStyle::Horizontal.kernel_for_row(1), Some(&HORIZONTAL_ODD));
        assert_eq!(DitherStyle::Horizontal.kernel_for_row(2), Some(&WAVES));
        assert_eq!(DitherStyle::Horizontal.max_dy(), 1);
        assert_eq!(DitherStyle::VanGogh.max_dy(), 5);
        assert_eq!(DitherStyle::None.max_dy(), 0);
    }

    #[test]
    fn test_style_names_round_trip() {
        for style in DitherStyle::ALL {
            assert_eq!(style.name().parse::<DitherStyle>(), Ok(style));
        }
        assert_eq!("Floyd".parse::<DitherStyle>(), Ok(DitherStyle::FloydSteinberg));
        assert_eq!("CZ332".parse::<DitherStyle>(), Ok(DitherStyle::MaskCZ332));
        assert_eq!(
            "sparkle".parse::<DitherStyle>(),
            Err(ParseStyleError("sparkle".to_string()))
        );
    }
}
