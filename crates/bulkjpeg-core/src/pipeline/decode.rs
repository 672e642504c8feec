//! Image decoding with content-based format detection and size limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::SourceImage;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl DecodedImage {
    /// Whether the decoded bitmap carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an upload into a bitmap.
    ///
    /// The container is detected from content first and from the declared
    /// extension second, so a PNG uploaded as `.jpg` still decodes.
    pub fn decode(&self, source: &SourceImage) -> Result<DecodedImage, PipelineError> {
        let mut reader = image::ImageReader::new(Cursor::new(source.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                name: source.name.clone(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(Path::new(&source.name)).map_err(|_| {
                PipelineError::UnsupportedFormat {
                    name: source.name.clone(),
                    format: Path::new(&source.name)
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                        .to_string(),
                }
            })?,
        };
        reader.set_format(format);

        let (width, height) = reader.into_dimensions().map_err(|e| PipelineError::Decode {
            name: source.name.clone(),
            message: e.to_string(),
        })?;
        self.check_dimensions(&source.name, width, height)?;

        let image = image::load_from_memory_with_format(&source.bytes, format).map_err(|e| {
            PipelineError::Decode {
                name: source.name.clone(),
                message: e.to_string(),
            }
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }

    fn check_dimensions(&self, name: &str, width: u32, height: u32) -> Result<(), PipelineError> {
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                name: name.to_string(),
                width,
                height,
                max_dim,
            });
        }
        Ok(())
    }
}

/// Short lowercase name of a decoded container, for logs.
///
/// Only JPEG and PNG get past validation as decodable input; anything else
/// the content sniffing reports is named after its `image` variant.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}
