//! The `bulkjpeg process` command.

mod batch;
mod setup;
pub mod types;

pub use types::{OutputFormat, Rename};

use bulkjpeg_core::pipeline::FileDiscovery;
use bulkjpeg_core::{BatchProcessor, BatchSettings, Config, ReportFormat};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use batch::process_batch;
use setup::setup_processor;

/// Arguments for the `process` command.
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Image files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for the JPEGs and the archive (defaults to config `output.dir`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JPEG quality, clamped to 10-100 (defaults to config `processing.quality`)
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i64>,

    /// Resize width; anything but a positive whole number keeps each image's width
    #[arg(long, allow_hyphen_values = true)]
    pub width: Option<String>,

    /// Resize height; anything but a positive whole number keeps each image's height
    #[arg(long, allow_hyphen_values = true)]
    pub height: Option<String>,

    /// Rename an output, e.g. `--rename 2=cover` (1-based, repeatable)
    #[arg(long = "rename", value_name = "INDEX=NAME", value_parser = types::parse_rename)]
    pub renames: Vec<Rename>,

    /// Do not write the combined ZIP archive
    #[arg(long)]
    pub no_archive: bool,

    /// Archive file name (defaults to config `archive.file_name`)
    #[arg(long)]
    pub archive_name: Option<String>,

    /// Leave preview thumbnails out of the report
    #[arg(long)]
    pub no_preview: bool,

    /// Report format (defaults to config `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Processing context assembled by setup_processor().
pub(crate) struct ProcessContext {
    pub processor: Arc<BatchProcessor>,
    pub settings: BatchSettings,
    pub output_dir: PathBuf,
    pub report_format: ReportFormat,
    pub pretty: bool,
    pub archive_enabled: bool,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_processor(&args, config)?;

    let files = ctx.processor.discover(&args.inputs);
    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.inputs);
        return Ok(());
    }
    tracing::info!(
        "Found {} image(s) to process ({:.1} MB)",
        files.len(),
        FileDiscovery::total_size(&files) as f64 / 1_000_000.0
    );

    process_batch(ctx, &args, files).await
}
