use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing image files.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Image width is not a multiple of 8.")]
    WidthNotAligned { width: u32 },

    #[error("Image height is not a multiple of 8.")]
    HeightNotAligned { height: u32 },

    #[error("Unsupported PNG color type: {0}")]
    UnsupportedColorType(String),

    #[error("Conversion error: {0}")]
    Convert(#[from] nes_quant::ConvertError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures loading or validating a project file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Too many knobs: {count} (max {max})")]
    TooManyKnobs { count: usize, max: usize },

    #[error("Knob {knob}: {message}")]
    InvalidKnob { knob: usize, message: String },

    #[error("Unsupported dimensions: {width}x{height} (multiples of 8 from 8 to 512)")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Invalid dither style: {0}")]
    DitherStyle(#[from] nes_quant::dither::ParseStyleError),

    #[error("Custom dither style needs a mask image")]
    MissingMask,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_error_alignment_messages() {
        let error = ImageError::WidthNotAligned { width: 12 };
        assert_eq!(error.to_string(), "Image width is not a multiple of 8.");

        let error = ImageError::HeightNotAligned { height: 7 };
        assert_eq!(error.to_string(), "Image height is not a multiple of 8.");
    }

    #[test]
    fn test_image_error_png_decode() {
        let error = ImageError::PngDecode("bad signature".to_string());
        assert_eq!(error.to_string(), "PNG decode error: bad signature");
    }

    #[test]
    fn test_image_error_from_convert_error() {
        let convert = nes_quant::ConvertError::EmptySource;
        let error: ImageError = convert.into();
        match error {
            ImageError::Convert(_) => {}
            _ => panic!("Expected Convert variant"),
        }
    }

    #[test]
    fn test_config_error_invalid_knob() {
        let error = ConfigError::InvalidKnob {
            knob: 3,
            message: "color 0x40 out of range".to_string(),
        };
        assert_eq!(error.to_string(), "Knob 3: color 0x40 out of range");
    }

    #[test]
    fn test_config_error_too_many_knobs() {
        let error = ConfigError::TooManyKnobs { count: 17, max: 16 };
        assert_eq!(error.to_string(), "Too many knobs: 17 (max 16)");
    }

    #[test]
    fn test_config_error_dimensions() {
        let error = ConfigError::UnsupportedDimensions {
            width: 9,
            height: 600,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported dimensions: 9x600 (multiples of 8 from 8 to 512)"
        );
    }
}
