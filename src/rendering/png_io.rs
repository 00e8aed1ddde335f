//! PNG decoding into pixel buffers and encoding of conversion results.

use crate::error::ImageError;
use nes_quant::{IndexImage, PixelBuffer};
use std::io::Cursor;
use std::path::Path;

/// Decode a source image. Both sides must be multiples of 8; this is checked
/// from the header before any pixel data is decoded.
pub fn decode_source(data: &[u8]) -> Result<PixelBuffer, ImageError> {
    decode(data, true)
}

/// Decode an image of any size, e.g. a custom dither mask.
pub fn decode_any(data: &[u8]) -> Result<PixelBuffer, ImageError> {
    decode(data, false)
}

pub fn load_source(path: &Path) -> Result<PixelBuffer, ImageError> {
    decode_source(&std::fs::read(path)?)
}

pub fn load_mask(path: &Path) -> Result<PixelBuffer, ImageError> {
    decode_any(&std::fs::read(path)?)
}

fn decode(data: &[u8], require_aligned: bool) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if require_aligned {
        if width % 8 != 0 {
            return Err(ImageError::WidthNotAligned { width });
        }
        if height % 8 != 0 {
            return Err(ImageError::HeightNotAligned { height });
        }
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    // Alpha is dropped, not composited
    let rgb: Vec<u8> = match frame.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|c| [c[0], c[1], c[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0]])
            .collect(),
        other => return Err(ImageError::UnsupportedColorType(format!("{other:?}"))),
    };

    tracing::debug!(width, height, color_type = ?frame.color_type, "Decoded PNG");
    Ok(PixelBuffer::from_raw(
        rgb,
        frame.width as usize,
        frame.height as usize,
    )
    .map_err(nes_quant::ConvertError::from)?)
}

/// Encode an RGB buffer as an 8-bit RGB PNG.
pub fn encode_rgb(image: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    encode_png(
        image.width(),
        image.height(),
        png::ColorType::Rgb,
        image.as_bytes(),
    )
}

/// Encode a conversion result: RGB when every pixel has a hardware colour,
/// otherwise RGBA with unset pixels fully transparent.
pub fn encode_index(image: &IndexImage) -> Result<Vec<u8>, ImageError> {
    if image.unset_count() == 0 {
        encode_rgb(&image.resolve())
    } else {
        encode_png(
            image.width(),
            image.height(),
            png::ColorType::Rgba,
            &image.to_rgba(),
        )
    }
}

fn encode_png(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    data: &[u8],
) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width as u32, height as u32);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
