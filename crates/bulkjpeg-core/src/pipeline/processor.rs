//! Pipeline orchestration: run every source through validation and the
//! transform, apply renames, and package the results.

use crate::archive::{Archive, ArchiveBuilder};
use crate::config::Config;
use crate::error::{ArchiveError, PipelineError};
use crate::types::{ArchiveReport, BatchSummary, ItemReport, ProcessedImage, SourceImage, ZIP_MIME};

use super::decode::ImageDecoder;
use super::discovery::{DiscoveredFile, FileDiscovery};
use super::preview::PreviewGenerator;
use super::settings::BatchSettings;
use super::transform::Transformer;
use super::validate::Validator;

/// One batch item: its source name and either the processed image or the
/// error that stopped it.
#[derive(Debug)]
pub struct BatchItem {
    pub source_name: String,
    pub result: Result<ProcessedImage, PipelineError>,
}

/// Everything a batch run produces.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// One entry per source, in input order
    pub items: Vec<BatchItem>,
}

impl BatchOutput {
    /// Successfully processed images, in input order.
    pub fn processed(&self) -> Vec<&ProcessedImage> {
        self.items.iter().filter_map(|i| i.result.as_ref().ok()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// The main batch processor.
pub struct BatchProcessor {
    validator: Validator,
    transformer: Transformer,
    preview_gen: PreviewGenerator,
    discovery: FileDiscovery,
    archive_builder: ArchiveBuilder,
}

impl BatchProcessor {
    /// Create a new processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            validator: Validator::new(config.limits.clone(), &config.processing),
            transformer: Transformer::new(
                ImageDecoder::new(config.limits.clone()),
                config.processing.resize_filter.filter_type(),
            ),
            preview_gen: PreviewGenerator::new(config.preview.clone()),
            discovery: FileDiscovery::new(config.processing.clone()),
            archive_builder: ArchiveBuilder::new(config.archive.clone()),
        }
    }

    /// Validate and transform a single source.
    pub fn process_one(
        &self,
        source: &SourceImage,
        settings: &BatchSettings,
    ) -> Result<ProcessedImage, PipelineError> {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", source.name);

        self.validator.validate(source)?;
        let processed = self.transformer.transform(source, settings)?;

        tracing::debug!(
            "Processed {:?} in {:?} ({}x{} -> {}x{}, {} bytes)",
            source.name,
            start.elapsed(),
            processed.source_dimensions.0,
            processed.source_dimensions.1,
            processed.width(),
            processed.height(),
            processed.encoded.len()
        );
        Ok(processed)
    }

    /// Run a whole batch.
    ///
    /// `name_overrides[i]`, when present, replaces the default output name of
    /// `sources[i]`. A failing item is recorded and the rest still run.
    pub fn run(
        &self,
        sources: &[SourceImage],
        settings: &BatchSettings,
        name_overrides: &[Option<String>],
    ) -> BatchOutput {
        self.run_with(sources, settings, name_overrides, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_item` after each item finishes.
    pub fn run_with<F>(
        &self,
        sources: &[SourceImage],
        settings: &BatchSettings,
        name_overrides: &[Option<String>],
        mut on_item: F,
    ) -> BatchOutput
    where
        F: FnMut(&BatchItem),
    {
        let mut output = BatchOutput::default();
        for (index, source) in sources.iter().enumerate() {
            let result = self.process_one(source, settings).map(|mut image| {
                if let Some(Some(name)) = name_overrides.get(index) {
                    image.rename(name);
                }
                image
            });
            if let Err(e) = &result {
                tracing::error!("Failed: {:?} - {}", source.name, e);
            }
            let item = BatchItem {
                source_name: source.name.clone(),
                result,
            };
            on_item(&item);
            output.items.push(item);
        }
        output
    }

    /// Build the combined download from a run's successful items.
    pub fn archive(
        &self,
        output: &BatchOutput,
        settings: &BatchSettings,
    ) -> Result<Option<Archive>, ArchiveError> {
        self.archive_builder
            .build(output.processed(), settings.quality)
    }

    /// Summarize a run and its archive outcome as a serializable report.
    pub fn summarize(
        &self,
        output: &BatchOutput,
        settings: &BatchSettings,
        archive: &Result<Option<Archive>, ArchiveError>,
    ) -> BatchSummary {
        let items = output
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| match &item.result {
                Ok(image) => ItemReport::success(i + 1, image, self.preview(image)),
                Err(e) => ItemReport::failure(i + 1, &item.source_name, e),
            })
            .collect();

        let (archive, archive_error) = match archive {
            Ok(Some(a)) => (
                Some(ArchiveReport {
                    file_name: a.file_name.clone(),
                    mime: ZIP_MIME.to_string(),
                    entries: a.entries.len(),
                    size: a.bytes.len(),
                }),
                None,
            ),
            Ok(None) => (None, None),
            Err(e) => (None, Some(e.to_string())),
        };

        BatchSummary {
            quality: settings.quality,
            width: settings.width,
            height: settings.height,
            succeeded: output.succeeded(),
            failed: output.failed(),
            items,
            archive,
            archive_error,
        }
    }

    /// Build a preview for a processed image, if previews are enabled.
    pub fn preview(&self, image: &ProcessedImage) -> Option<String> {
        self.preview_gen.generate(&image.bitmap)
    }

    /// Discover input files across the given paths.
    pub fn discover(&self, paths: &[std::path::PathBuf]) -> Vec<DiscoveredFile> {
        self.discovery.discover_all(paths)
    }

    /// Check if preview generation is enabled.
    pub fn previews_enabled(&self) -> bool {
        self.preview_gen.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::settings::Quality;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::{Cursor, Read};

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn jpeg_source(name: &str, width: u32, height: u32) -> SourceImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        SourceImage::new(name, encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg))
    }

    fn rgba_png_source(name: &str, width: u32, height: u32) -> SourceImage {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 64]));
        SourceImage::new(name, encode(DynamicImage::ImageRgba8(img), ImageFormat::Png))
    }

    fn archive_names(archive: &Archive) -> Vec<String> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes.clone())).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_single_image_default_settings() {
        let processor = BatchProcessor::new(&Config::default());
        let settings = BatchSettings::from_input(Some(80), None, None, &Config::default());
        let sources = vec![rgba_png_source("photo.PNG", 800, 600)];

        let output = processor.run(&sources, &settings, &[]);
        assert_eq!(output.succeeded(), 1);
        let image = output.items[0].result.as_ref().unwrap();
        assert_eq!(image.output_name, "photo_fd.jpg");
        assert_eq!(image.bitmap.dimensions(), (800, 600));
        assert!(image.flattened_alpha);

        let reread = image::load_from_memory_with_format(&image.encoded, ImageFormat::Jpeg).unwrap();
        assert_eq!(reread.color().channel_count(), 3);

        // A single image never gets an archive
        assert!(processor.archive(&output, &settings).unwrap().is_none());
    }

    #[test]
    fn test_two_images_forced_resize() {
        let config = Config::default();
        let processor = BatchProcessor::new(&config);
        let settings = BatchSettings::from_input(Some(50), Some("300"), Some("300"), &config);
        let sources = vec![jpeg_source("a.jpg", 1000, 1000), jpeg_source("b.jpg", 500, 500)];

        let output = processor.run(&sources, &settings, &[]);
        assert_eq!(output.succeeded(), 2);
        for image in output.processed() {
            assert_eq!(image.bitmap.dimensions(), (300, 300));
        }

        let archive = processor.archive(&output, &settings).unwrap().unwrap();
        assert_eq!(archive_names(&archive), ["a_fd.jpg", "b_fd.jpg"]);
    }

    #[test]
    fn test_malformed_width_falls_back_per_image() {
        let config = Config::default();
        let processor = BatchProcessor::new(&config);
        let settings = BatchSettings::from_input(None, Some("abc"), Some("400"), &config);
        let sources = vec![jpeg_source("wide.jpg", 640, 200), jpeg_source("tall.jpg", 120, 900)];

        let output = processor.run(&sources, &settings, &[]);
        let dims: Vec<_> = output.processed().iter().map(|i| i.bitmap.dimensions()).collect();
        assert_eq!(dims, [(640, 400), (120, 400)]);
    }

    #[test]
    fn test_overrides_rename_outputs() {
        let processor = BatchProcessor::new(&Config::default());
        let settings = BatchSettings::default();
        let sources = vec![
            jpeg_source("a.jpg", 20, 20),
            jpeg_source("b.jpg", 20, 20),
            jpeg_source("c.jpg", 20, 20),
        ];
        let overrides = vec![Some("Cover:Front".to_string()), None, Some(String::new())];

        let output = processor.run(&sources, &settings, &overrides);
        let names: Vec<_> = output
            .processed()
            .iter()
            .map(|i| i.output_name.clone())
            .collect();
        assert_eq!(names, ["Cover_Front.jpg", "b_fd.jpg", "image.jpg"]);

        let archive = processor.archive(&output, &settings).unwrap().unwrap();
        assert_eq!(archive_names(&archive), names);
    }

    #[test]
    fn test_bad_item_does_not_abort_batch() {
        let processor = BatchProcessor::new(&Config::default());
        let settings = BatchSettings::default();
        let sources = vec![
            jpeg_source("good1.jpg", 10, 10),
            SourceImage::new("bad.png", b"\x89PNG garbage".to_vec()),
            SourceImage::new("notes.txt", b"hello".to_vec()),
            jpeg_source("good2.jpg", 10, 10),
        ];

        let output = processor.run(&sources, &settings, &[]);
        assert_eq!(output.succeeded(), 2);
        assert_eq!(output.failed(), 2);
        assert!(matches!(
            output.items[1].result,
            Err(PipelineError::Decode { .. })
        ));
        assert!(matches!(
            output.items[2].result,
            Err(PipelineError::UnsupportedFormat { .. })
        ));

        let archive = processor.archive(&output, &settings).unwrap().unwrap();
        assert_eq!(archive.entries, ["good1_fd.jpg", "good2_fd.jpg"]);
    }

    #[test]
    fn test_heic_fails_as_unsupported_item() {
        let processor = BatchProcessor::new(&Config::default());
        let mut bytes = vec![0, 0, 0, 24];
        bytes.extend_from_slice(b"ftypheic");
        bytes.extend_from_slice(&[0; 16]);
        let sources = vec![SourceImage::new("IMG_0001.HEIC", bytes), jpeg_source("a.jpg", 8, 8)];

        let output = processor.run(&sources, &BatchSettings::default(), &[]);
        assert!(matches!(
            output.items[0].result,
            Err(PipelineError::UnsupportedFormat { .. })
        ));
        assert!(output.items[1].result.is_ok());
    }

    #[test]
    fn test_archive_entries_are_rgb_jpegs() {
        let processor = BatchProcessor::new(&Config::default());
        let settings = BatchSettings {
            quality: Quality::new(70),
            width: Some(32),
            height: Some(24),
        };
        let sources = vec![rgba_png_source("one.png", 64, 64), rgba_png_source("two.png", 50, 40)];

        let output = processor.run(&sources, &settings, &[]);
        let archive = processor.archive(&output, &settings).unwrap().unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        for i in 0..zip.len() {
            let mut data = Vec::new();
            zip.by_index(i).unwrap().read_to_end(&mut data).unwrap();
            let img = image::load_from_memory(&data).unwrap();
            assert_eq!(img.color().channel_count(), 3);
            assert_eq!((img.width(), img.height()), (32, 24));
        }
    }

    #[test]
    fn test_run_with_reports_each_item() {
        let processor = BatchProcessor::new(&Config::default());
        let sources = vec![jpeg_source("a.jpg", 8, 8), SourceImage::new("b.txt", vec![1, 2, 3, 4])];
        let mut seen = Vec::new();
        processor.run_with(&sources, &BatchSettings::default(), &[], |item| {
            seen.push((item.source_name.clone(), item.result.is_ok()));
        });
        assert_eq!(seen, [("a.jpg".to_string(), true), ("b.txt".to_string(), false)]);
    }

    #[test]
    fn test_summary_reports_items_and_archive() {
        let mut config = Config::default();
        config.preview.enabled = false;
        let processor = BatchProcessor::new(&config);
        let settings = BatchSettings::default();
        let sources = vec![
            jpeg_source("a.jpg", 10, 10),
            SourceImage::new("b.png", b"\x89PNGnope".to_vec()),
            jpeg_source("c.jpg", 10, 10),
        ];

        let output = processor.run(&sources, &settings, &[]);
        let archive = processor.archive(&output, &settings);
        let summary = processor.summarize(&output, &settings, &archive);

        assert_eq!((summary.succeeded, summary.failed), (2, 1));
        assert_eq!(summary.items[1].index, 2);
        assert_eq!(summary.items[1].error_kind.as_deref(), Some("decode"));
        assert!(summary.items[0].preview.is_none());
        let report = summary.archive.unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.mime, "application/zip");
        assert!(summary.archive_error.is_none());
    }

    #[test]
    fn test_summary_records_archive_failure() {
        let processor = BatchProcessor::new(&Config::default());
        let output = BatchOutput::default();
        let failed: Result<Option<Archive>, ArchiveError> = Err(ArchiveError::Encode {
            entry: "x.jpg".into(),
            message: "boom".into(),
        });
        let summary = processor.summarize(&output, &BatchSettings::default(), &failed);
        assert!(summary.archive.is_none());
        assert!(summary.archive_error.unwrap().contains("boom"));
    }

    #[test]
    fn test_preview_follows_config() {
        let mut config = Config::default();
        let processor = BatchProcessor::new(&config);
        let output = processor.run(&[jpeg_source("p.jpg", 400, 300)], &BatchSettings::default(), &[]);
        let image = output.items[0].result.as_ref().unwrap();
        assert!(processor.previews_enabled());
        assert!(processor.preview(image).is_some());

        config.preview.enabled = false;
        let processor = BatchProcessor::new(&config);
        assert!(processor.preview(image).is_none());
    }
}
