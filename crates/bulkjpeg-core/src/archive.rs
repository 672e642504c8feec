//! ZIP packaging of processed images for the "download all" action.
//!
//! Failures here only affect the archive. The per-image buffers are already
//! complete by the time the archive is built.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ArchiveConfig;
use crate::error::ArchiveError;
use crate::pipeline::encode::encode_jpeg;
use crate::pipeline::sanitize::unique_name;
use crate::pipeline::settings::Quality;
use crate::types::ProcessedImage;

/// Minimum number of images before an archive is worth producing.
pub const MIN_ARCHIVE_ENTRIES: usize = 2;

/// A finished archive and the entry names it contains, in order.
#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
}

/// Builds a single ZIP buffer from processed images.
pub struct ArchiveBuilder {
    config: ArchiveConfig,
}

impl ArchiveBuilder {
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    /// Build the archive, or `Ok(None)` for fewer than two images.
    ///
    /// Each image is stored under its output name. Bytes already encoded at
    /// `quality` are reused as-is; anything else is re-encoded from the
    /// bitmap. A repeated name gets a `_2`, `_3`, ... suffix so both entries
    /// survive.
    pub fn build<'a, I>(&self, images: I, quality: Quality) -> Result<Option<Archive>, ArchiveError>
    where
        I: IntoIterator<Item = &'a ProcessedImage>,
    {
        let images: Vec<&ProcessedImage> = images.into_iter().collect();
        if images.len() < MIN_ARCHIVE_ENTRIES {
            tracing::debug!("Skipping archive: only {} image(s)", images.len());
            return Ok(None);
        }

        let start = std::time::Instant::now();
        let method = if self.config.compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let options = SimpleFileOptions::default().compression_method(method);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut used: HashSet<String> = HashSet::with_capacity(images.len());
        let mut entries = Vec::with_capacity(images.len());

        for image in &images {
            let entry = unique_name(&image.output_name, &used);
            if entry != image.output_name {
                tracing::warn!(
                    "Duplicate output name {:?} in archive; storing as {:?}",
                    image.output_name,
                    entry
                );
            }

            let reencoded;
            let bytes: &[u8] = if image.quality == quality {
                &image.encoded
            } else {
                reencoded =
                    encode_jpeg(&image.bitmap, quality).map_err(|e| ArchiveError::Encode {
                        entry: entry.clone(),
                        message: e.to_string(),
                    })?;
                &reencoded
            };

            writer
                .start_file(entry.as_str(), options)
                .map_err(|source| ArchiveError::Zip {
                    entry: entry.clone(),
                    source,
                })?;
            writer
                .write_all(bytes)
                .map_err(|source| ArchiveError::Io {
                    entry: entry.clone(),
                    source,
                })?;

            used.insert(entry.clone());
            entries.push(entry);
        }

        let bytes = writer
            .finish()
            .map_err(|source| ArchiveError::Zip {
                entry: self.config.file_name.clone(),
                source,
            })?
            .into_inner();

        tracing::debug!(
            "Built {} with {} entries ({} bytes) in {:?}",
            self.config.file_name,
            entries.len(),
            bytes.len(),
            start.elapsed()
        );

        Ok(Some(Archive {
            file_name: self.config.file_name.clone(),
            bytes,
            entries,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Read;
    use zip::ZipArchive;

    fn processed(name: &str, quality: Quality) -> ProcessedImage {
        let bitmap = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 99]));
        let encoded = encode_jpeg(&bitmap, quality).unwrap();
        ProcessedImage {
            source_name: name.to_string(),
            output_name: name.to_string(),
            bitmap,
            encoded,
            quality,
            source_dimensions: (16, 16),
            flattened_alpha: false,
        }
    }

    fn read_entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_skips_single_image() {
        let builder = ArchiveBuilder::new(ArchiveConfig::default());
        let q = Quality::default();
        assert!(builder.build(&[] as &[ProcessedImage], q).unwrap().is_none());
        assert!(builder.build(&[processed("a.jpg", q)], q).unwrap().is_none());
    }

    #[test]
    fn test_contains_every_image_by_name() {
        let q = Quality::new(60);
        let images = vec![
            processed("a_fd.jpg", q),
            processed("b_fd.jpg", q),
            processed("c_fd.jpg", q),
        ];
        let archive = ArchiveBuilder::new(ArchiveConfig::default())
            .build(&images, q)
            .unwrap()
            .unwrap();
        assert_eq!(archive.file_name, "processed_images.zip");

        let entries = read_entries(archive.bytes);
        let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a_fd.jpg", "b_fd.jpg", "c_fd.jpg"]);
        // Same quality: cached bytes reused verbatim
        for ((_, data), image) in entries.iter().zip(&images) {
            assert_eq!(data, &image.encoded);
        }
    }

    #[test]
    fn test_reencodes_when_quality_differs() {
        let images = vec![
            processed("a.jpg", Quality::new(90)),
            processed("b.jpg", Quality::new(90)),
        ];
        let archive = ArchiveBuilder::new(ArchiveConfig::default())
            .build(&images, Quality::new(20))
            .unwrap()
            .unwrap();
        let entries = read_entries(archive.bytes);
        let expected = encode_jpeg(&images[0].bitmap, Quality::new(20)).unwrap();
        assert_eq!(entries[0].1, expected);
        let decoded = image::load_from_memory(&entries[1].1).unwrap();
        assert_eq!(decoded.color().channel_count(), 3);
    }

    #[test]
    fn test_duplicate_names_do_not_fail() {
        let q = Quality::default();
        let images = vec![
            processed("same.jpg", q),
            processed("same.jpg", q),
            processed("same_2.jpg", q),
        ];
        let archive = ArchiveBuilder::new(ArchiveConfig::default())
            .build(&images, q)
            .unwrap()
            .unwrap();
        assert_eq!(archive.entries, ["same.jpg", "same_2.jpg", "same_2_2.jpg"]);
        assert_eq!(read_entries(archive.bytes).len(), 3);
    }

    #[test]
    fn test_compressed_archive_is_readable() {
        let q = Quality::default();
        let config = ArchiveConfig {
            compress: true,
            ..ArchiveConfig::default()
        };
        let images = vec![processed("x.jpg", q), processed("y.jpg", q)];
        let archive = ArchiveBuilder::new(config).build(&images, q).unwrap().unwrap();
        let entries = read_entries(archive.bytes);
        assert_eq!(entries[1].1, images[1].encoded);
    }
}
