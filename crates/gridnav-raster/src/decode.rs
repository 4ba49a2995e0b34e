//! Image decoding into RGBA pixel buffers.

use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::error::ProcessingError;

/// Decode an in-memory PNG or JPEG into RGBA pixels. The format is guessed
/// from the content.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, ProcessingError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    check_not_empty(img)
}

/// Read and decode an image file.
pub fn open_image(path: impl AsRef<Path>) -> Result<RgbaImage, ProcessingError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image(&bytes)
}

/// Read the pixel dimensions from an encoded image header without decoding
/// the pixel data.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), ProcessingError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

fn check_not_empty(img: RgbaImage) -> Result<RgbaImage, ProcessingError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ProcessingError::EmptyImage);
    }
    Ok(img)
}
