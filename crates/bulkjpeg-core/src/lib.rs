//! bulkjpeg core: bulk resize and JPEG re-encoding with ZIP packaging.
//!
//! Every image in a batch goes through the same straight-line transform:
//!
//! ```text
//! Upload → Validate → Decode → Flatten to RGB → Resize → JPEG → (ZIP)
//! ```
//!
//! A run is a pure function of the sources, the [`BatchSettings`] and the
//! per-image name overrides. One bad upload fails on its own; the rest of the
//! batch still completes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bulkjpeg_core::{BatchProcessor, BatchSettings, Config, SourceImage};
//!
//! let config = Config::load()?;
//! let processor = BatchProcessor::new(&config);
//! let settings = BatchSettings::from_input(Some(80), Some("1200"), None, &config);
//!
//! let sources = vec![SourceImage::read("photo.png".as_ref())?];
//! let output = processor.run(&sources, &settings, &[]);
//! let archive = processor.archive(&output, &settings)?;
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use archive::{Archive, ArchiveBuilder};
pub use config::Config;
pub use error::{ArchiveError, BulkError, ConfigError, PipelineError, PipelineResult, Result};
pub use output::{OutputWriter, ReportFormat};
pub use pipeline::{
    BatchItem, BatchOutput, BatchProcessor, BatchSettings, DiscoveredFile, Quality,
};
pub use types::{
    ArchiveReport, BatchSummary, ItemReport, ItemStatus, ProcessedImage, SourceImage, JPEG_MIME,
    ZIP_MIME,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
