//! Logging initialization.
//!
//! Uses `tracing` with either human-readable or JSON output. Logs go to
//! stderr so that reports written to stdout stay machine-readable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides the level chosen here.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section plus CLI overrides.
pub fn init_from_config(
    config: &bulkjpeg_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = resolve_level(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

/// `--verbose` raises anything quieter than debug to debug.
fn resolve_level(configured: &str, verbose: bool) -> &str {
    match (verbose, configured) {
        (true, "trace") => "trace",
        (true, _) => "debug",
        (false, "error" | "warn" | "info" | "debug" | "trace") => configured,
        (false, _) => "info",
    }
}
