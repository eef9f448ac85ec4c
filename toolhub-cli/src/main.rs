use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use toolhub_config::domains::logging::LogLevel;
use toolhub_config::{ConfigLoader, ToolhubConfig};
use toolhub_plugin::InventoryCapabilitySource;
use tracing::{debug, info};

mod cli;
mod host;
mod render;

use cli::{Cli, Commands, ConfigCommands};
use host::Host;

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(cli: &Cli) -> Result<ToolhubConfig> {
    let loader = ConfigLoader::new();
    let mut config = match cli.config.as_deref() {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => loader
            .from_env()
            .context("Failed to load configuration from environment")?,
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level =
            LogLevel::from_str(level).map_err(|_| anyhow::anyhow!("Invalid log level '{}'", level))?;
    }

    if let Some(ref locale) = cli.locale {
        config.locale.locale = Some(locale.clone());
    }

    Ok(config)
}

fn init_logging(config: &ToolhubConfig, config_path: Option<&Path>) -> Result<()> {
    match toolhub_logging::init_logging_from_config(&config.logging) {
        Ok(()) => debug!(config = ?config_path, "Structured logging initialized"),
        Err(e) => {
            eprintln!("{}, falling back to simple tracing", e);
            toolhub_logging::init_simple_tracing(&config.logging.level.to_string())?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Printing the sample needs neither logging nor capabilities
    if let Commands::Config {
        config_cmd: ConfigCommands::Sample,
    } = cli.command
    {
        print!("{}", ToolhubConfig::generate_sample());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    init_logging(&config, cli.config.as_deref())?;

    info!("Toolhub starting");
    let host = Host::start(&config, &InventoryCapabilitySource::new());
    info!(
        registered = host.report.registered.len(),
        failed = host.report.failures.len(),
        "Capabilities loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List { category, json } => render::list(&host, category, json, &mut out)?,
        Commands::Show { ref id } => {
            if !render::show(&host, id, &mut out)? {
                eprintln!("{}", host.text("capability.not_found", &[id.as_str()]));
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Status => render::status(&host, &mut out)?,
        Commands::Config { .. } => {}
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    run(Cli::parse())
}
