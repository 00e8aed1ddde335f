use nes_quant::color::HARDWARE_COLOR_COUNT;
use nes_quant::knob::{BANK_SIZE, TARGET_SLOTS};
use nes_quant::{CleanupConfig, ColorKnob, DitherConfig, DitherStyle, KnobBank, Rgb};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Largest accepted output side.
pub const MAX_DIMENSION: u32 = 512;

/// One conversion described in a YAML project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    pub dither: DitherSection,

    pub cleanup: CleanupSection,

    /// Colour knobs in bank order
    pub knobs: Vec<KnobConfig>,

    /// Directory relative paths in this file resolve against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            dither: DitherSection::default(),
            cleanup: CleanupSection::default(),
            knobs: Vec::new(),
            base_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherSection {
    /// Kebab-case style name, e.g. "floyd-steinberg" or "mask-z1"
    pub style: String,

    pub scale: u8,

    pub cutoff: u8,

    /// Mask image for the "mask-custom" style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<PathBuf>,
}

impl Default for DitherSection {
    fn default() -> Self {
        Self {
            style: DitherStyle::None.name().to_string(),
            scale: 0,
            cutoff: 0,
            mask: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSection {
    pub cull_dots: bool,
    pub cull_pipes: bool,
    pub cull_zags: bool,
    pub clean_lines: bool,
    pub passes: u32,
}

impl Default for CleanupSection {
    fn default() -> Self {
        Self {
            cull_dots: false,
            cull_pipes: false,
            cull_zags: false,
            clean_lines: false,
            passes: 1,
        }
    }
}

/// One colour knob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobConfig {
    /// Hardware colour index (0-63); `null` paints nothing
    pub color: Option<u8>,

    /// Up to four `#RRGGBB` targets, `null` for a disabled slot. Empty means
    /// "attract the hardware colour itself".
    pub targets: Vec<Option<String>>,

    pub greed: i32,

    pub bleed: i32,
}

impl KnobConfig {
    /// Describe an existing knob.
    pub fn from_knob(knob: &ColorKnob) -> Self {
        Self {
            color: knob.has_color().then_some(knob.hardware_index),
            targets: knob
                .targets
                .iter()
                .zip(knob.enabled.iter())
                .map(|(rgb, &on)| on.then(|| rgb.to_hex()))
                .collect(),
            greed: knob.greed(),
            bleed: knob.bleed(),
        }
    }

    /// Build the knob. `index` is only used in error messages.
    pub fn to_knob(&self, index: usize) -> Result<ColorKnob, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidKnob {
            knob: index,
            message,
        };

        let mut knob = match self.color {
            Some(c) if c as usize >= HARDWARE_COLOR_COUNT => {
                return Err(invalid(format!("color {c} out of range (0-63)")));
            }
            Some(c) => ColorKnob::new(c),
            None => ColorKnob::unused(),
        };

        if self.targets.len() > TARGET_SLOTS {
            return Err(invalid(format!(
                "{} targets given, at most {TARGET_SLOTS} allowed",
                self.targets.len()
            )));
        }
        if !self.targets.is_empty() {
            knob.enabled = [false; TARGET_SLOTS];
            for (slot, target) in self.targets.iter().enumerate() {
                if let Some(hex) = target {
                    let rgb: Rgb = hex
                        .parse()
                        .map_err(|e| invalid(format!("target {slot} '{hex}': {e}")))?;
                    knob.set_target(slot, rgb)
                        .map_err(|e| invalid(e.to_string()))?;
                }
            }
        }

        knob.try_set_greed(self.greed)
            .map_err(|e| invalid(e.to_string()))?;
        knob.try_set_bleed(self.bleed)
            .map_err(|e| invalid(e.to_string()))?;
        Ok(knob)
    }
}

impl ProjectConfig {
    /// Load and validate a project file. Relative paths inside it resolve
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::info!(
            path = %path.display(),
            knobs = config.knobs.len(),
            width = config.width,
            height = config.height,
            "Loaded project"
        );
        Ok(config)
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Project for a freshly generated knob bank, keeping only active knobs.
    pub fn from_bank(bank: &KnobBank, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            knobs: bank
                .iter()
                .filter(|k| k.any_enabled())
                .map(KnobConfig::from_knob)
                .collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width, self.height)?;
        if self.knobs.len() > BANK_SIZE {
            return Err(ConfigError::TooManyKnobs {
                count: self.knobs.len(),
                max: BANK_SIZE,
            });
        }
        for (i, knob) in self.knobs.iter().enumerate() {
            knob.to_knob(i)?;
        }
        self.dither_style()?;
        Ok(())
    }

    pub fn knob_bank(&self) -> Result<KnobBank, ConfigError> {
        let knobs = self
            .knobs
            .iter()
            .enumerate()
            .map(|(i, k)| k.to_knob(i))
            .collect::<Result<Vec<_>, _>>()?;
        KnobBank::from_knobs(&knobs).map_err(|_| ConfigError::TooManyKnobs {
            count: knobs.len(),
            max: BANK_SIZE,
        })
    }

    pub fn dither_style(&self) -> Result<DitherStyle, ConfigError> {
        Ok(self.dither.style.parse()?)
    }

    /// Dither settings without the custom mask image; loading that is left
    /// to the caller.
    pub fn dither_config(&self) -> Result<DitherConfig, ConfigError> {
        Ok(DitherConfig::new()
            .style(self.dither_style()?)
            .scale(self.dither.scale)
            .cutoff(self.dither.cutoff))
    }

    pub fn cleanup_config(&self) -> CleanupConfig {
        CleanupConfig::new()
            .cull_dots(self.cleanup.cull_dots)
            .cull_pipes(self.cleanup.cull_pipes)
            .cull_zags(self.cleanup.cull_zags)
            .clean_lines(self.cleanup.clean_lines)
            .passes(self.cleanup.passes)
    }

    /// Mask path resolved against the project directory.
    pub fn mask_path(&self) -> Option<PathBuf> {
        let mask = self.dither.mask.as_ref()?;
        Some(match &self.base_dir {
            Some(dir) if mask.is_relative() => dir.join(mask),
            _ => mask.clone(),
        })
    }
}

/// Output sides must be multiples of 8 between 8 and [`MAX_DIMENSION`].
pub fn check_dimensions(width: u32, height: u32) -> Result<(), ConfigError> {
    let ok = |v: u32| (8..=MAX_DIMENSION).contains(&v) && v % 8 == 0;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedDimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();

        assert_eq!(config.width, 256);
        assert_eq!(config.height, 256);
        assert_eq!(config.dither.style, "none");
        assert_eq!(config.cleanup.passes, 1);
        assert!(config.knobs.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_project() {
        let yaml = r##"
width: 64
height: 32
dither:
  style: floyd-steinberg
  scale: 4
  cutoff: 2
cleanup:
  cull_dots: true
  clean_lines: true
  passes: 2
knobs:
  - color: 22
    targets: ["#FF0000", null, "#C00"]
    greed: 3
  - color: 48
  - targets: ["#00FF00"]
    bleed: -2
"##;
        let config = ProjectConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.dither_style().unwrap(), DitherStyle::FloydSteinberg);

        let cleanup = config.cleanup_config();
        assert!(cleanup.cull_dots && cleanup.clean_lines);
        assert!(!cleanup.cull_pipes && !cleanup.cull_zags);
        assert_eq!(cleanup.passes, 2);

        let bank = config.knob_bank().unwrap();
        assert_eq!(bank[0].hardware_index, 22);
        assert_eq!(bank[0].enabled, [true, false, true, false]);
        assert_eq!(bank[0].targets[2], Rgb::new(0xCC, 0, 0));
        assert_eq!(bank[0].greed(), 3);

        // No targets: the knob attracts its own hardware colour
        assert_eq!(bank[1].targets[0], Rgb::WHITE);
        assert_eq!(bank[1].enabled, [true, false, false, false]);

        // No colour: matches but paints nothing
        assert!(!bank[2].has_color());
        assert!(bank[2].any_enabled());
        assert_eq!(bank[2].bleed(), -2);

        assert_eq!(bank.active_count(), 3);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = ProjectConfig::from_yaml_str("knobs: []").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_invalid_knob_reports_index() {
        let yaml = "knobs:\n  - color: 1\n  - color: 64\n";
        let err = ProjectConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKnob { knob: 1, .. }), "{err}");

        let yaml = "knobs:\n  - color: 1\n    greed: 21\n";
        let err = ProjectConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKnob { knob: 0, .. }), "{err}");

        let yaml = "knobs:\n  - targets: [\"#12\"]\n";
        assert!(ProjectConfig::from_yaml_str(yaml).is_err());

        let yaml = "knobs:\n  - targets: [null, null, null, null, \"#FFF\"]\n";
        assert!(ProjectConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_too_many_knobs() {
        let knobs = "  - color: 1\n".repeat(17);
        let err = ProjectConfig::from_yaml_str(&format!("knobs:\n{knobs}")).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyKnobs { count: 17, max: 16 }));
    }

    #[test]
    fn test_dimension_checks() {
        assert!(check_dimensions(8, 512).is_ok());
        assert!(check_dimensions(0, 8).is_err());
        assert!(check_dimensions(12, 8).is_err());
        assert!(check_dimensions(8, 520).is_err());
        assert!(ProjectConfig::from_yaml_str("width: 100").is_err());
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = ProjectConfig::from_yaml_str("dither:\n  style: sparkle\n").unwrap_err();
        assert!(matches!(err, ConfigError::DitherStyle(_)));
    }

    #[test]
    fn test_bank_round_trips_through_yaml() {
        let mut red = ColorKnob::with_primary(0x16, Rgb::new(250, 10, 10));
        red.set_greed(-4);
        let bank = KnobBank::from_knobs(&[red, ColorKnob::new(0x30)]).unwrap();

        let project = ProjectConfig::from_bank(&bank, 128, 64);
        let yaml = project.to_yaml().unwrap();
        let parsed = ProjectConfig::from_yaml_str(&yaml).unwrap();

        assert_eq!(parsed.knobs.len(), 2);
        assert_eq!(parsed.knob_bank().unwrap(), bank);
    }

    #[test]
    fn test_mask_path_resolves_against_project_dir() {
        let mut config = ProjectConfig::default();
        config.dither.mask = Some(PathBuf::from("masks/dots.png"));
        config.base_dir = Some(PathBuf::from("/projects/castle"));
        assert_eq!(
            config.mask_path(),
            Some(PathBuf::from("/projects/castle/masks/dots.png"))
        );

        config.dither.mask = Some(PathBuf::from("/abs/mask.png"));
        assert_eq!(config.mask_path(), Some(PathBuf::from("/abs/mask.png")));
    }
}
