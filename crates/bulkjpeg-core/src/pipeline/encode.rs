//! JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageResult, RgbImage};

use super::settings::Quality;

/// Encode an RGB bitmap as baseline JPEG at the given quality.
pub fn encode_jpeg(bitmap: &RgbImage, quality: Quality) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.get()).encode_image(bitmap)?;
    Ok(bytes)
}
