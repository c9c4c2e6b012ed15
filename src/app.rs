//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the run configuration (env + flags)
//! - dispatches to the acquirer / reporter

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `rates` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = config_from_cli(&cli, Config::from_env()?);
    log::debug!("configuration: {config:?}");

    match cli.command {
        Command::Acquire(args) => {
            pipeline::run_acquire(&config, args.year, args.start_month, args.end_month)?;
        }
        Command::Report(args) => {
            pipeline::run_report(&config, &args.key)?;
        }
        Command::Run(args) => {
            pipeline::run_both(&config, args.year, args.start_month, args.end_month)?;
        }
    }

    Ok(())
}

/// Apply CLI overrides on top of the environment configuration.
pub fn config_from_cli(cli: &Cli, mut config: Config) -> Config {
    if let Some(root) = &cli.store_root {
        config.store_root = root.clone();
    }
    if let Some(bucket) = &cli.bucket {
        config.bucket = bucket.clone();
    }
    if let Some(font) = &cli.font {
        config.font_path = Some(font.clone());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from(["rates", "--bucket", "b", "--font", "/f.ttf", "report"]);
        let config = config_from_cli(&cli, Config::default());
        assert_eq!(config.bucket, "b");
        assert_eq!(config.font_path, Some(PathBuf::from("/f.ttf")));
        assert_eq!(config.store_root, Config::default().store_root);
    }
}
