//! Test fixtures: scratch directories with source images and project files.

use nes_quant::{PixelBuffer, Rgb};
use pixeler::rendering::png_io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Colours used across the fixtures
pub mod colors {
    use nes_quant::Rgb;

    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const SKY: Rgb = Rgb::new(100, 180, 255);
}

/// Project with a red and a blue knob, no dithering, no cleanup.
pub const RED_BLUE_PROJECT: &str = r##"
width: 16
height: 8
knobs:
  - color: 22
    targets: ["#FF0000"]
  - color: 2
    targets: ["#0000FF"]
"##;

/// 16x8 image: left half red, right half blue.
pub fn split_image() -> PixelBuffer {
    PixelBuffer::from_fn(16, 8, |x, _| if x < 8 { colors::RED } else { colors::BLUE })
}

/// 32x32 horizontal ramp from black to white.
pub fn grey_ramp() -> PixelBuffer {
    PixelBuffer::from_fn(32, 32, |x, _| {
        let v = (x * 255 / 31) as u8;
        Rgb::new(v, v, v)
    })
}

/// Scratch directory that cleans up after itself.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `image` as a PNG and return its path.
    pub fn write_png(&self, name: &str, image: &PixelBuffer) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, png_io::encode_rgb(image).expect("encode PNG")).expect("write PNG");
        path
    }

    pub fn write_text(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write file");
        path
    }
}
