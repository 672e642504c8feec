//! Error types for the bulkjpeg pipeline.
//!
//! Errors are organized by stage. Pipeline errors are per-item: a batch run
//! records them next to the item that failed and keeps going. Archive errors
//! only affect the combined download.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for bulkjpeg operations.
#[derive(Error, Debug)]
pub enum BulkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-image pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Archive assembly errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-image pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source bytes are not a decodable image
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// Declared extension or detected container is not supported
    #[error("Unsupported format for {name}: {format}")]
    UnsupportedFormat { name: String, format: String },

    /// JPEG encoding failed
    #[error("Encode error for {name}: {message}")]
    Encode { name: String, message: String },

    /// Upload exceeds size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Input file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Short machine-friendly kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Encode { .. } => "encode",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::ImageTooLarge { .. } => "image_too_large",
            Self::Read { .. } => "read",
        }
    }
}

/// Errors while assembling the ZIP download.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The ZIP writer rejected an entry or failed to finish
    #[error("Failed to write archive entry {entry}: {source}")]
    Zip {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Writing entry bytes failed
    #[error("Failed to write archive data for {entry}: {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    /// Re-encoding a bitmap for the archive failed
    #[error("Failed to encode {entry} for archive: {message}")]
    Encode { entry: String, message: String },
}

/// Convenience type alias for bulkjpeg results.
pub type Result<T> = std::result::Result<T, BulkError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
