//! Input validation before decoding.

use std::path::Path;

use crate::config::{LimitsConfig, ProcessingConfig};
use crate::error::PipelineError;
use crate::types::SourceImage;

/// Validates uploads before they are decoded.
pub struct Validator {
    limits: LimitsConfig,
    supported_formats: Vec<String>,
}

impl Validator {
    /// Create a new validator with the given limits and accepted extensions.
    pub fn new(limits: LimitsConfig, processing: &ProcessingConfig) -> Self {
        Self {
            limits,
            supported_formats: processing
                .supported_formats
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
        }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Declared extension is one of the accepted formats
    /// - Upload size is within limits
    /// - Bytes start with a known image signature
    pub fn validate(&self, source: &SourceImage) -> Result<(), PipelineError> {
        if !self.is_supported(&source.name) {
            return Err(PipelineError::UnsupportedFormat {
                name: source.name.clone(),
                format: extension_of(&source.name).unwrap_or_else(|| "none".to_string()),
            });
        }

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        let size = source.len() as u64;
        if size > max_bytes {
            return Err(PipelineError::FileTooLarge {
                name: source.name.clone(),
                size_mb: size / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        if source.len() < 4 {
            return Err(PipelineError::Decode {
                name: source.name.clone(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if !Self::is_valid_image_header(&source.bytes) {
            return Err(PipelineError::Decode {
                name: source.name.clone(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Check if a declared filename has an accepted extension.
    pub fn is_supported(&self, name: &str) -> bool {
        extension_of(name)
            .map(|ext| self.supported_formats.iter().any(|fmt| *fmt == ext))
            .unwrap_or(false)
    }

    /// Check if the leading bytes match an accepted upload format.
    fn is_valid_image_header(header: &[u8]) -> bool {
        if header.len() < 4 {
            return false;
        }

        // JPEG: FF D8 FF
        if header[0] == 0xFF && header[1] == 0xD8 && header[2] == 0xFF {
            return true;
        }

        // PNG: 89 50 4E 47
        if header[0] == 0x89 && header[1] == b'P' && header[2] == b'N' && header[3] == b'G' {
            return true;
        }

        // HEIC/HEIF: ftyp box at offset 4
        if header.len() >= 12 && &header[4..8] == b"ftyp" {
            return true;
        }

        false
    }
}

/// Lowercased extension of a declared filename, without the dot.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
