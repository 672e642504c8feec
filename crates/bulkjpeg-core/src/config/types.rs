//! Sub-configuration structs with their defaults.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lowest accepted JPEG quality.
pub const MIN_QUALITY: u8 = 10;
/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u8 = 100;
/// Quality used when nothing else is configured.
pub const DEFAULT_QUALITY: u8 = 80;

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Default JPEG quality (10-100)
    pub quality: u8,

    /// Accepted input extensions (matched case-insensitively)
    pub supported_formats: Vec<String>,

    /// Resampling filter used when resizing
    pub resize_filter: ResizeFilter,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "heic".to_string(),
            ],
            resize_filter: ResizeFilter::default(),
        }
    }
}

/// Resampling filter choice. Any of them satisfies the resize contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    /// Map to the `image` crate filter.
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height), for sources and resize targets
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Preview thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether to generate preview thumbnails
    pub enabled: bool,

    /// Longest edge of the preview in pixels
    pub size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 250,
        }
    }
}

/// ZIP archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// File name of the combined download
    pub file_name: String,

    /// Deflate entries instead of storing them. JPEG data rarely shrinks.
    pub compress: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            file_name: "processed_images.zip".to_string(),
            compress: false,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where JPEGs and the archive are written
    pub dir: PathBuf,

    /// Report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
