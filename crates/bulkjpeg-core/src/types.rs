//! Core data types for the bulkjpeg pipeline.
//!
//! [`SourceImage`] goes in, [`ProcessedImage`] comes out. The report types at
//! the bottom are the serializable view of a run.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pipeline::sanitize::output_filename;
use crate::pipeline::settings::Quality;

/// MIME type of every per-image download.
pub const JPEG_MIME: &str = "image/jpeg";

/// MIME type of the combined download.
pub const ZIP_MIME: &str = "application/zip";

/// An uploaded image: declared filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Filename as uploaded (may contain anything)
    pub name: String,
    /// Undecoded file contents
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a source from disk, named after the file's final component.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Size of the raw upload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the upload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The result of transforming one source image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Name of the upload this came from
    pub source_name: String,

    /// Sanitized output filename, always ending in `.jpg`
    pub output_name: String,

    /// Resized RGB bitmap, also used for previews
    pub bitmap: RgbImage,

    /// JPEG bytes for download
    pub encoded: Vec<u8>,

    /// Quality `encoded` was produced at
    pub quality: Quality,

    /// Dimensions of the decoded source before resizing
    pub source_dimensions: (u32, u32),

    /// Whether the source carried an alpha channel that was flattened
    pub flattened_alpha: bool,
}

impl ProcessedImage {
    /// Re-label the output. The encoded bytes are kept as they are.
    pub fn rename(&mut self, base: &str) {
        self.output_name = output_filename(base);
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// Outcome of one item in a batch report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Ok,
    Failed,
}

/// Serializable per-image report record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemReport {
    /// 1-based position in the batch
    pub index: usize,

    /// Uploaded filename
    pub source_name: String,

    pub status: ItemStatus,

    /// Output filename (absent on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Size of the encoded JPEG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_size: Option<usize>,

    /// Base64 JPEG preview thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    /// Error kind, e.g. "decode"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemReport {
    /// Report for a successfully processed image.
    pub fn success(index: usize, image: &ProcessedImage, preview: Option<String>) -> Self {
        Self {
            index,
            source_name: image.source_name.clone(),
            status: ItemStatus::Ok,
            output_name: Some(image.output_name.clone()),
            mime: Some(JPEG_MIME.to_string()),
            width: Some(image.width()),
            height: Some(image.height()),
            encoded_size: Some(image.encoded.len()),
            preview,
            error_kind: None,
            error: None,
        }
    }

    /// Report for an image that failed somewhere in the pipeline.
    pub fn failure(index: usize, source_name: &str, error: &crate::PipelineError) -> Self {
        Self {
            index,
            source_name: source_name.to_string(),
            status: ItemStatus::Failed,
            output_name: None,
            mime: None,
            width: None,
            height: None,
            encoded_size: None,
            preview: None,
            error_kind: Some(error.kind().to_string()),
            error: Some(error.to_string()),
        }
    }
}

/// The combined download, if one was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub file_name: String,
    pub mime: String,
    pub entries: usize,
    pub size: usize,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub quality: Quality,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    pub succeeded: usize,
    pub failed: usize,

    pub items: Vec<ItemReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReport>,

    /// Why the archive could not be built, if it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_error: Option<String>,
}
