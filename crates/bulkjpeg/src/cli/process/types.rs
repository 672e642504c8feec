//! CLI value types for the process command: report format and renames.

use bulkjpeg_core::ReportFormat;
use clap::ValueEnum;

/// Supported report formats.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per image (newline-delimited)
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Jsonl => ReportFormat::JsonLines,
        }
    }
}

/// A per-image output name override, `INDEX=NAME` with a 1-based index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rename {
    pub index: usize,
    pub name: String,
}

/// Parse `INDEX=NAME`. The name may be empty (it then falls back to `image`).
pub fn parse_rename(s: &str) -> Result<Rename, String> {
    let (index, name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=NAME, got {s:?}"))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("rename index {:?} is not a number", index.trim()))?;
    if index == 0 {
        return Err("rename index starts at 1".to_string());
    }
    Ok(Rename {
        index,
        name: name.to_string(),
    })
}

/// Line up renames with a batch of `count` images. Later renames of the same
/// index win.
pub fn overrides_for(renames: &[Rename], count: usize) -> Vec<Option<String>> {
    let mut overrides = vec![None; count];
    for rename in renames {
        match overrides.get_mut(rename.index - 1) {
            Some(slot) => *slot = Some(rename.name.clone()),
            None => tracing::warn!(
                "Ignoring --rename {}={}: only {} image(s) in batch",
                rename.index,
                rename.name,
                count
            ),
        }
    }
    overrides
}
