//! bulkjpeg CLI - bulk resize and JPEG re-encode images.
//!
//! Every input goes through the same resize and JPEG re-encode. Each result
//! is written as its own `.jpg`, and batches of two or more are also packed
//! into a single ZIP archive.
//!
//! # Usage
//!
//! ```bash
//! # Re-encode a folder at quality 70
//! bulkjpeg process ./photos -q 70 -o ./out
//!
//! # Force 300x300 and rename the second image
//! bulkjpeg process a.jpg b.png --width 300 --height 300 --rename 2=cover
//!
//! # View configuration
//! bulkjpeg config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// bulkjpeg - bulk resize and JPEG re-encode images, with ZIP download.
#[derive(Parser, Debug)]
#[command(name = "bulkjpeg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize and re-encode images, writing JPEGs and a ZIP archive
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match bulkjpeg_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `bulkjpeg config path`."
            );
            bulkjpeg_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("bulkjpeg v{}", bulkjpeg_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
