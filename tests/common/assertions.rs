//! Assertion helpers for tests.

use nes_quant::{IndexImage, PixelBuffer, UNSET};
use pretty_assertions::assert_eq;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert the file exists and starts with the PNG signature
pub fn assert_png_file(path: &Path) -> Vec<u8> {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    bytes
}

/// Decode a PNG file written by the converter
pub fn read_png(path: &Path) -> PixelBuffer {
    let bytes = assert_png_file(path);
    pixeler::rendering::decode_any(&bytes).expect("decode PNG")
}

/// Read a raw index dump back into an image
pub fn read_indices(path: &Path, width: usize, height: usize) -> IndexImage {
    let bytes = std::fs::read(path).expect("read indices");
    IndexImage::from_indices(bytes, width, height).expect("index dump has width * height bytes")
}

/// Assert every pixel of column range `xs` has hardware index `expected`
pub fn assert_columns(image: &IndexImage, xs: std::ops::Range<usize>, expected: u8) {
    for y in 0..image.height() {
        for x in xs.clone() {
            assert_eq!(
                image.get(x, y),
                expected,
                "pixel ({x}, {y}) expected {expected:#04x}"
            );
        }
    }
}

/// Assert no pixel was left unset
pub fn assert_fully_painted(image: &IndexImage) {
    assert_eq!(
        image.indices().iter().filter(|&&i| i == UNSET).count(),
        0,
        "image has unset pixels"
    );
}
