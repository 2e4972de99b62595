use anyhow::{Context, Result};
use clap::Parser;
use profile_desk::cli::{handle_command, Cli};
use profile_desk::utils::ensure_parent_dir;
use profile_desk::environment::DEFAULT_CONFIG_FILE;
use profile_desk::EnvironmentConfig;
use std::fs::OpenOptions;
use std::path::Path;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = EnvironmentConfig::load(cli.config.as_deref())?;

    ensure_parent_dir(&config.log_path)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("profile_desk=debug,info"))
                .context("Invalid log directive")?,
        )
        .init();

    let config_file = cli
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    info!(
        "Loaded configuration for environment: {}",
        EnvironmentConfig::get_environment()
    );
    if config_file.exists() {
        info!("Config file: {}", config_file.display());
    } else {
        info!("No {} found, using defaults", config_file.display());
    }
    info!("Parser service: {}", config.parser_url);
    info!("Employee service: {}", config.employee_url);
    info!("Storage: {}", config.storage_path.display());

    handle_command(cli.command, &config).await
}
