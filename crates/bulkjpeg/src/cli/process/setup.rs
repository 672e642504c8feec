//! Processor setup: config overrides and per-run settings.

use std::path::PathBuf;
use std::sync::Arc;

use bulkjpeg_core::{BatchProcessor, BatchSettings, Config, ReportFormat};

use super::{ProcessArgs, ProcessContext};

/// Validate input, apply CLI overrides to the config, and assemble everything
/// needed for processing.
pub(crate) fn setup_processor(
    args: &ProcessArgs,
    mut config: Config,
) -> anyhow::Result<ProcessContext> {
    if let Some(missing) = args.inputs.iter().find(|p| !p.exists()) {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            missing
        );
    }

    if args.no_preview {
        config.preview.enabled = false;
    }
    if let Some(name) = &args.archive_name {
        config.archive.file_name = name.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    let report_format = match args.format {
        Some(format) => format.into(),
        None => ReportFormat::parse(&config.output.format).unwrap_or(ReportFormat::Json),
    };

    let settings = BatchSettings::from_input(
        args.quality,
        args.width.as_deref(),
        args.height.as_deref(),
        &config,
    );
    tracing::debug!(
        "Settings: quality={} width={:?} height={:?}",
        settings.quality,
        settings.width,
        settings.height
    );

    let output_dir: PathBuf = config.output_dir();
    let processor = Arc::new(BatchProcessor::new(&config));

    Ok(ProcessContext {
        processor,
        settings,
        output_dir,
        report_format,
        pretty: config.output.pretty,
        archive_enabled: !args.no_archive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_rejected() {
        let args = ProcessArgs {
            inputs: vec![PathBuf::from("/definitely/not/here.jpg")],
            ..ProcessArgs::default()
        };
        let err = setup_processor(&args, Config::default()).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_overrides_applied() {
        let dir = tempfile::tempdir().unwrap();
        let args = ProcessArgs {
            inputs: vec![dir.path().to_path_buf()],
            output_dir: Some(dir.path().join("out")),
            quality: Some(3),
            width: Some("abc".into()),
            height: Some("400".into()),
            no_preview: true,
            no_archive: true,
            ..ProcessArgs::default()
        };
        let ctx = setup_processor(&args, Config::default()).unwrap();
        assert_eq!(ctx.settings.quality.get(), 10);
        assert_eq!(ctx.settings.width, None);
        assert_eq!(ctx.settings.height, Some(400));
        assert_eq!(ctx.output_dir, dir.path().join("out"));
        assert!(!ctx.processor.previews_enabled());
        assert!(!ctx.archive_enabled);
        assert_eq!(ctx.report_format, ReportFormat::Json);
    }
}
