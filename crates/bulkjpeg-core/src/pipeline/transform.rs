//! The per-image transform: decode, flatten, resize, encode.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::error::PipelineError;
use crate::types::{ProcessedImage, SourceImage};

use super::decode::{format_to_string, ImageDecoder};
use super::encode::encode_jpeg;
use super::sanitize::{default_output_base, output_filename};
use super::settings::BatchSettings;

/// Applies [`BatchSettings`] to one source image at a time.
///
/// Holds no per-run state; `transform` is pure with respect to everything
/// outside its arguments.
pub struct Transformer {
    decoder: ImageDecoder,
    filter: FilterType,
}

impl Transformer {
    pub fn new(decoder: ImageDecoder, filter: FilterType) -> Self {
        Self { decoder, filter }
    }

    /// Decode, flatten, resize and encode one image.
    pub fn transform(
        &self,
        source: &SourceImage,
        settings: &BatchSettings,
    ) -> Result<ProcessedImage, PipelineError> {
        let decode_start = std::time::Instant::now();
        let decoded = self.decoder.decode(source)?;
        tracing::trace!(
            "  Decode ({}): {:?}",
            format_to_string(decoded.format),
            decode_start.elapsed()
        );

        let flattened_alpha = decoded.has_alpha();
        let rgb = flatten_to_rgb(decoded.image);

        let resize_start = std::time::Instant::now();
        let (width, height) = settings.target_size(decoded.width, decoded.height);
        let bitmap = resize_rgb(rgb, width, height, self.filter);
        tracing::trace!("  Resize to {}x{}: {:?}", width, height, resize_start.elapsed());

        let encode_start = std::time::Instant::now();
        let encoded = encode_jpeg(&bitmap, settings.quality).map_err(|e| PipelineError::Encode {
            name: source.name.clone(),
            message: e.to_string(),
        })?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        Ok(ProcessedImage {
            source_name: source.name.clone(),
            output_name: output_filename(&default_output_base(&source.name)),
            bitmap,
            encoded,
            quality: settings.quality,
            source_dimensions: (decoded.width, decoded.height),
            flattened_alpha,
        })
    }
}

/// Convert any color mode to 8-bit RGB. Alpha is dropped, which is the
/// usual RGBA to RGB conversion.
pub fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Resize to exactly `width` x `height`. A same-size request returns the
/// bitmap untouched.
pub fn resize_rgb(bitmap: RgbImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    if bitmap.dimensions() == (width, height) {
        return bitmap;
    }
    imageops::resize(&bitmap, width, height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::pipeline::settings::Quality;
    use image::{ImageFormat, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn transformer() -> Transformer {
        Transformer::new(
            ImageDecoder::new(LimitsConfig::default()),
            FilterType::CatmullRom,
        )
    }

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn rgba_png(width: u32, height: u32) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                width,
                height,
                Rgba([255, 0, 0, 100]),
            )),
            ImageFormat::Png,
        )
    }

    #[test]
    fn test_default_settings_keep_dimensions() {
        let source = SourceImage::new("photo.PNG", rgba_png(80, 60));
        let result = transformer()
            .transform(&source, &BatchSettings::default())
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (80, 60));
        assert_eq!(result.source_dimensions, (80, 60));
        assert_eq!(result.output_name, "photo_fd.jpg");
    }

    #[test]
    fn test_rgba_is_flattened() {
        let source = SourceImage::new("alpha.png", rgba_png(10, 10));
        let result = transformer()
            .transform(&source, &BatchSettings::default())
            .unwrap();
        assert!(result.flattened_alpha);
        let reread = image::load_from_memory(&result.encoded).unwrap();
        assert!(!reread.color().has_alpha());
        assert_eq!(reread.color().channel_count(), 3);
    }

    #[test]
    fn test_forced_resize_each_axis() {
        let source = SourceImage::new(
            "a.jpg",
            encode(
                DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([1, 2, 3]))),
                ImageFormat::Jpeg,
            ),
        );
        let settings = BatchSettings {
            quality: Quality::new(50),
            width: Some(30),
            height: None,
        };
        let result = transformer().transform(&source, &settings).unwrap();
        assert_eq!(result.bitmap.dimensions(), (30, 50));
        assert_eq!(result.quality.get(), 50);
        assert!(!result.flattened_alpha);
    }

    #[test]
    fn test_corrupt_source_is_decode_error() {
        let source = SourceImage::new("broken.jpg", vec![0xFF, 0xD8, 0xFF, 0x00, 0x01]);
        let err = transformer()
            .transform(&source, &BatchSettings::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let bitmap = RgbImage::from_pixel(5, 5, Rgb([9, 9, 9]));
        let out = resize_rgb(bitmap.clone(), 5, 5, FilterType::Lanczos3);
        assert_eq!(out, bitmap);
    }
}
