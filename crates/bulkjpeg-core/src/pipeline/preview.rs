//! Preview thumbnails for processed images.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{imageops, RgbImage};

use crate::config::PreviewConfig;

use super::encode::encode_jpeg;
use super::settings::Quality;

/// Generates small previews from processed bitmaps.
pub struct PreviewGenerator {
    config: PreviewConfig,
}

impl PreviewGenerator {
    /// Create a new preview generator with the given configuration.
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Generate a preview and return it as a base64-encoded JPEG string.
    ///
    /// Returns `None` if previews are disabled or encoding fails.
    pub fn generate(&self, bitmap: &RgbImage) -> Option<String> {
        self.generate_bytes(bitmap).map(|bytes| BASE64.encode(bytes))
    }

    /// Generate a preview and return the raw JPEG bytes.
    pub fn generate_bytes(&self, bitmap: &RgbImage) -> Option<Vec<u8>> {
        if !self.config.enabled {
            return None;
        }

        let (width, height) = preview_size(bitmap.width(), bitmap.height(), self.config.size);
        let preview = if (width, height) == bitmap.dimensions() {
            bitmap.clone()
        } else {
            imageops::thumbnail(bitmap, width, height)
        };

        match encode_jpeg(&preview, Quality::default()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Preview encoding failed: {e}");
                None
            }
        }
    }

    /// Check if preview generation is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Fit `width` x `height` inside a `max_edge` square, keeping aspect ratio.
/// Never upscales, and never returns a zero dimension.
fn preview_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return (width, height);
    }
    let scale = |v: u32| ((u64::from(v) * u64::from(max_edge)) / u64::from(longest)).max(1) as u32;
    (scale(width), scale(height))
}
