//! The `bulkjpeg config` command: inspect, create and check the config file.

use std::path::{Path, PathBuf};

use bulkjpeg_core::Config;
use clap::{Args, Subcommand};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show {
        /// Read this file instead of the default location
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the default config file location
    Path,

    /// Write a config file with every default filled in
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Check a config file for parse errors and out-of-range values
    Validate {
        /// File to check (defaults to the default location)
        file: Option<PathBuf>,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { file } => {
            let config = match file {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default(&path, force).await?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_path);
            if !path.exists() {
                anyhow::bail!("No config file at {}", path.display());
            }
            let config = Config::load_from(&path)?;
            println!(
                "{} is valid (quality {}, archive {:?})",
                path.display(),
                config.processing.quality,
                config.archive.file_name
            );
        }
    }

    Ok(())
}

/// Write the default configuration to `path`, creating parent directories.
async fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, Config::default().to_toml()?).await?;
    Ok(())
}
