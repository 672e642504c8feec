//! Batch processing: read inputs, run the pipeline with progress, write the
//! JPEGs, the archive and the report.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bulkjpeg_core::pipeline::unique_name;
use bulkjpeg_core::{
    Archive, ArchiveError, BatchOutput, BatchSummary, DiscoveredFile, OutputWriter, PipelineError,
    ReportFormat, SourceImage,
};

use super::types::overrides_for;
use super::{ProcessArgs, ProcessContext};

/// Process every discovered file as one batch.
pub(crate) async fn process_batch(
    ctx: ProcessContext,
    args: &ProcessArgs,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let start_time = std::time::Instant::now();

    // Renames refer to positions in the discovered list, so line them up
    // before unreadable files drop out.
    let all_overrides = overrides_for(&args.renames, files.len());
    let (sources, overrides, unreadable) = read_sources(&files, all_overrides).await;
    let total_bytes: u64 = sources.iter().map(|s| s.len() as u64).sum();

    let progress = create_progress_bar(sources.len() as u64);
    let processor = Arc::clone(&ctx.processor);
    let settings = ctx.settings;
    let archive_enabled = ctx.archive_enabled;
    let pb = progress.clone();

    let (output, mut archive) = tokio::task::spawn_blocking(move || {
        let output = processor.run_with(&sources, &settings, &overrides, |item| {
            pb.inc(1);
            pb.set_message(item.source_name.clone());
        });
        let archive = if archive_enabled {
            processor.archive(&output, &settings)
        } else {
            Ok(None)
        };
        (output, archive)
    })
    .await?;

    progress.finish_and_clear();

    tokio::fs::create_dir_all(&ctx.output_dir).await?;
    let written = write_images(&output, &ctx.output_dir).await;

    match &archive {
        Ok(Some(a)) => {
            if let Err(e) = write_archive(a, &ctx.output_dir).await {
                tracing::error!("{e}");
                archive = Err(e);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Archive not created: {e}"),
    }

    let summary = ctx.processor.summarize(&output, &ctx.settings, &archive);
    write_report(&summary, ctx.report_format, ctx.pretty, args.report.as_deref())?;

    print_summary(
        &summary,
        written,
        unreadable,
        total_bytes,
        start_time.elapsed(),
        &ctx.output_dir,
    );

    Ok(())
}

/// Read every file into memory, keeping each file's rename aligned with it.
/// Unreadable files are logged and counted.
async fn read_sources(
    files: &[DiscoveredFile],
    overrides: Vec<Option<String>>,
) -> (Vec<SourceImage>, Vec<Option<String>>, usize) {
    let mut sources = Vec::with_capacity(files.len());
    let mut kept = Vec::with_capacity(files.len());
    let mut unreadable = 0;

    for (file, name) in files.iter().zip(overrides) {
        match tokio::fs::read(&file.path).await {
            Ok(bytes) => {
                let file_name = file
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                sources.push(SourceImage::new(file_name, bytes));
                kept.push(name);
            }
            Err(source) => {
                unreadable += 1;
                let err = PipelineError::Read {
                    path: file.path.clone(),
                    source,
                };
                tracing::error!("Failed: {err}");
            }
        }
    }

    (sources, kept, unreadable)
}

/// Write each processed image into `dir`.
///
/// Repeated output names get the same `_2`, `_3` suffixes the archive uses,
/// so every processed image lands on disk under the name it has in the ZIP.
/// Returns how many files were written.
async fn write_images(output: &BatchOutput, dir: &Path) -> usize {
    let mut used: HashSet<String> = HashSet::new();
    let mut written = 0;

    for image in output.processed() {
        let name = unique_name(&image.output_name, &used);
        if name != image.output_name {
            tracing::warn!(
                "Duplicate output name {:?}; writing as {:?}",
                image.output_name,
                name
            );
        }
        let path = dir.join(&name);
        used.insert(name);
        match tokio::fs::write(&path, &image.encoded).await {
            Ok(()) => {
                written += 1;
                tracing::debug!("Wrote {:?} ({} bytes)", path, image.encoded.len());
            }
            Err(e) => tracing::error!("Failed to write {:?}: {e}", path),
        }
    }

    written
}

async fn write_archive(archive: &Archive, dir: &Path) -> Result<PathBuf, ArchiveError> {
    let path = dir.join(&archive.file_name);
    tokio::fs::write(&path, &archive.bytes)
        .await
        .map_err(|source| ArchiveError::Io {
            entry: archive.file_name.clone(),
            source,
        })?;
    tracing::info!("Archive written to {:?}", path);
    Ok(path)
}

/// Write the report to a file, or to stdout when no path is given.
fn write_report(
    summary: &BatchSummary,
    format: ReportFormat,
    pretty: bool,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let records = emit_report(BufWriter::new(file), summary, format, pretty)?;
            tracing::info!("Report written to {:?} ({records} record(s))", path);
        }
        None => {
            emit_report(std::io::stdout().lock(), summary, format, pretty)?;
        }
    }
    Ok(())
}

fn emit_report<W: Write>(
    writer: W,
    summary: &BatchSummary,
    format: ReportFormat,
    pretty: bool,
) -> std::io::Result<usize> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    match format {
        ReportFormat::Json => writer.write(summary)?,
        ReportFormat::JsonLines => writer.write_all(&summary.items)?,
    }
    writer.flush()?;
    Ok(writer.items_written())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(
    summary: &BatchSummary,
    written: usize,
    unreadable: usize,
    total_bytes: u64,
    elapsed: std::time::Duration,
    output_dir: &Path,
) {
    let failed = summary.failed + unreadable;
    let total = summary.succeeded + failed;
    let mb_processed = total_bytes as f64 / 1_000_000.0;
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        summary.succeeded as f64 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", summary.succeeded);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("    Written:      {:>8}", written);
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Quality:      {:>8}", summary.quality);
    eprintln!("    Input:        {:>7.1} MB", mb_processed);
    eprintln!("    Duration:     {:>7.1}s", secs);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    if let Some(archive) = &summary.archive {
        eprintln!("    Archive:      {} ({} entries)", archive.file_name, archive.entries);
    }
    if let Some(err) = &summary.archive_error {
        eprintln!("    Archive:      failed ({err})");
    }
    eprintln!("    Output dir:   {}", output_dir.display());
    eprintln!("  ====================================");
}
