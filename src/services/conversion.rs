//! Conversion service: turns a project file plus a source PNG into a
//! palette-converted PNG.

use nes_quant::{auto_palette, Conversion, Converter, DitherStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use crate::error::{ConfigError, ImageError};
use crate::models::ProjectConfig;
use crate::rendering::png_io;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Failed to load mask {path}: {source}")]
    Mask {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// What one conversion produced, for logging and status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub width: usize,
    pub height: usize,
    /// Distinct hardware colours in the output
    pub colors: usize,
    /// Pixels no knob painted
    pub unset: usize,
}

impl ConversionSummary {
    fn of(conversion: &Conversion) -> Self {
        Self {
            width: conversion.index.width(),
            height: conversion.index.height(),
            colors: conversion
                .index
                .histogram()
                .iter()
                .filter(|&&n| n > 0)
                .count(),
            unset: conversion.index.unset_count(),
        }
    }
}

/// A configured converter bound to an output size.
#[derive(Debug, Clone)]
pub struct ConversionService {
    converter: Converter,
    width: usize,
    height: usize,
}

impl ConversionService {
    /// Build from a validated project, loading the custom mask if the
    /// project selects one.
    pub fn from_project(project: &ProjectConfig) -> Result<Self, ConversionError> {
        let mut dither = project.dither_config()?;
        if dither.style == DitherStyle::MaskCustom {
            let path = project.mask_path().ok_or(ConfigError::MissingMask)?;
            let mask = png_io::load_mask(&path)
                .map_err(|source| ConversionError::Mask { path, source })?;
            dither = dither.custom_mask(mask);
        }

        let converter = Converter::new(project.knob_bank()?)
            .dither(dither)
            .cleanup(project.cleanup_config());

        tracing::debug!(
            knobs = converter.bank().active_count(),
            style = %converter.dither_config().style,
            "Conversion service ready"
        );

        Ok(Self {
            converter,
            width: project.width as usize,
            height: project.height as usize,
        })
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Convert PNG bytes.
    pub fn convert_png(&self, data: &[u8]) -> Result<Conversion, ConversionError> {
        let source = png_io::decode_source(data)?;
        let conversion = self
            .converter
            .convert(&source, self.width, self.height)
            .map_err(ImageError::from)?;
        Ok(conversion)
    }

    /// Convert `input` into `output`, optionally also writing the raw index
    /// bytes (one byte per pixel, row-major, 0xFF for unset) to `indices`.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        indices: Option<&Path>,
    ) -> Result<ConversionSummary, ConversionError> {
        let started = Instant::now();
        let data = std::fs::read(input).map_err(ImageError::from)?;
        let conversion = self.convert_png(&data)?;

        let png = png_io::encode_index(&conversion.index)?;
        std::fs::write(output, png).map_err(ImageError::from)?;
        if let Some(path) = indices {
            std::fs::write(path, conversion.index.indices()).map_err(ImageError::from)?;
        }

        let summary = ConversionSummary::of(&conversion);
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = summary.width,
            height = summary.height,
            colors = summary.colors,
            unset = summary.unset,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Converted"
        );
        Ok(summary)
    }
}

/// Propose a project for `input` with `count` knobs found by median cut.
pub fn auto_palette_project(
    input: &Path,
    count: usize,
    exact_mapping: bool,
    width: u32,
    height: u32,
) -> Result<ProjectConfig, ConversionError> {
    crate::models::check_dimensions(width, height)?;
    let source = png_io::load_source(input)?;
    let bank = auto_palette(&source, count, exact_mapping);
    tracing::info!(
        input = %input.display(),
        requested = count,
        knobs = bank.active_count(),
        "Generated palette"
    );
    Ok(ProjectConfig::from_bank(&bank, width, height))
}
