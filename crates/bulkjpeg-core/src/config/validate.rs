//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, MAX_QUALITY, MIN_QUALITY};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.processing.quality) {
            return Err(ConfigError::ValidationError(format!(
                "processing.quality must be between {MIN_QUALITY} and {MAX_QUALITY}"
            )));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.preview.size == 0 {
            return Err(ConfigError::ValidationError(
                "preview.size must be > 0".into(),
            ));
        }
        if self.archive.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "archive.file_name must not be empty".into(),
            ));
        }
        if crate::output::ReportFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}
