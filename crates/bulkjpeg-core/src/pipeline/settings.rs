//! Per-run settings: JPEG quality and resize overrides.
//!
//! User input for dimensions is free text. It is parsed with
//! [`parse_dimension`], and anything that does not parse falls back to the
//! source image's own size for that axis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};

/// JPEG quality percentage, always within `[10, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    /// Clamp any integer into the accepted range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(MIN_QUALITY as i64, MAX_QUALITY as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a dimension override was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("dimension is empty")]
    Empty,

    #[error("dimension {0:?} is not a whole number")]
    NotNumeric(String),

    #[error("dimension must be greater than zero")]
    NotPositive,

    #[error("dimension {value} exceeds the limit of {max}")]
    TooLarge { value: u64, max: u32 },
}

/// Parse a user-supplied dimension.
///
/// Accepts surrounding whitespace and a plain run of ASCII digits. Signs,
/// decimals and zero are rejected.
pub fn parse_dimension(input: &str, max: u32) -> Result<u32, DimensionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DimensionError::Empty);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DimensionError::NotNumeric(trimmed.to_string()));
    }
    let value: u64 = match trimmed.parse() {
        Ok(v) => v,
        // Only overflow is possible after the digit check.
        Err(_) => return Err(DimensionError::TooLarge { value: u64::MAX, max }),
    };
    if value == 0 {
        return Err(DimensionError::NotPositive);
    }
    if value > u64::from(max) {
        return Err(DimensionError::TooLarge { value, max });
    }
    Ok(value as u32)
}

/// Resolve optional free-text input into an override, or `None` to keep the
/// source dimension.
pub fn dimension_override(input: Option<&str>, axis: &str, max: u32) -> Option<u32> {
    let input = input?;
    match parse_dimension(input, max) {
        Ok(value) => Some(value),
        Err(DimensionError::Empty) => None,
        Err(e) => {
            tracing::debug!("Ignoring {axis} override {input:?}: {e}; using native {axis}");
            None
        }
    }
}

/// Settings applied uniformly to every image in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// JPEG quality
    pub quality: Quality,
    /// Target width; `None` keeps each image's own width
    pub width: Option<u32>,
    /// Target height; `None` keeps each image's own height
    pub height: Option<u32>,
}

impl BatchSettings {
    /// Build settings from raw user input, falling back on anything invalid.
    pub fn from_input(
        quality: Option<i64>,
        width: Option<&str>,
        height: Option<&str>,
        config: &Config,
    ) -> Self {
        let max = config.limits.max_image_dimension;
        Self {
            quality: Quality::new(quality.unwrap_or(i64::from(config.processing.quality))),
            width: dimension_override(width, "width", max),
            height: dimension_override(height, "height", max),
        }
    }

    /// Target size for a source of the given size. Axes resolve independently.
    pub fn target_size(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        (
            self.width.unwrap_or(source_width),
            self.height.unwrap_or(source_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_clamps() {
        assert_eq!(Quality::new(5).get(), 10);
        assert_eq!(Quality::new(-40).get(), 10);
        assert_eq!(Quality::new(55).get(), 55);
        assert_eq!(Quality::new(250).get(), 100);
        assert_eq!(Quality::default().get(), 80);
    }

    #[test]
    fn test_parse_dimension_accepts_digits() {
        assert_eq!(parse_dimension("400", 10000), Ok(400));
        assert_eq!(parse_dimension("  300 ", 10000), Ok(300));
        assert_eq!(parse_dimension("007", 10000), Ok(7));
    }

    #[test]
    fn test_parse_dimension_rejects_malformed() {
        assert_eq!(parse_dimension("", 10000), Err(DimensionError::Empty));
        assert_eq!(parse_dimension("   ", 10000), Err(DimensionError::Empty));
        assert!(matches!(
            parse_dimension("abc", 10000),
            Err(DimensionError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_dimension("-5", 10000),
            Err(DimensionError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_dimension("12.5", 10000),
            Err(DimensionError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_dimension("+12", 10000),
            Err(DimensionError::NotNumeric(_))
        ));
        assert_eq!(parse_dimension("0", 10000), Err(DimensionError::NotPositive));
    }

    #[test]
    fn test_parse_dimension_rejects_too_large() {
        assert!(matches!(
            parse_dimension("10001", 10000),
            Err(DimensionError::TooLarge { value: 10001, .. })
        ));
        assert!(matches!(
            parse_dimension("99999999999999999999999", 10000),
            Err(DimensionError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_from_input_falls_back_per_axis() {
        let config = Config::default();
        let settings = BatchSettings::from_input(Some(50), Some("abc"), Some("400"), &config);
        assert_eq!(settings.quality.get(), 50);
        assert_eq!(settings.width, None);
        assert_eq!(settings.height, Some(400));
        assert_eq!(settings.target_size(1000, 800), (1000, 400));
    }

    #[test]
    fn test_from_input_defaults() {
        let config = Config::default();
        let settings = BatchSettings::from_input(None, None, None, &config);
        assert_eq!(settings, BatchSettings::default());
        assert_eq!(settings.target_size(640, 480), (640, 480));
    }
}
