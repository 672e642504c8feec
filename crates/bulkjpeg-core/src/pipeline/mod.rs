//! Image processing pipeline components.
//!
//! - **sanitize**: Output filename cleanup and defaults
//! - **settings**: Quality and resize overrides parsed from user input
//! - **validate**: Pre-decode checks on uploads
//! - **decode**: Decode uploads into bitmaps
//! - **transform**: Flatten, resize and encode one image
//! - **encode**: JPEG encoding
//! - **preview**: Small preview thumbnails
//! - **discovery**: Find input files in directories
//! - **processor**: Runs a whole batch

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod preview;
pub mod processor;
pub mod sanitize;
pub mod settings;
pub mod transform;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::encode_jpeg;
pub use preview::PreviewGenerator;
pub use processor::{BatchItem, BatchOutput, BatchProcessor};
pub use sanitize::{default_output_base, output_filename, sanitize_filename, unique_name};
pub use settings::{parse_dimension, BatchSettings, DimensionError, Quality};
pub use transform::Transformer;
pub use validate::Validator;
