use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;

use traitflux::config::{Config, LogLevel};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn setup_logging(config: &Config, log_level: LogLevel) -> Result<()> {
    let log_dir = Config::expand_path(&config.paths.logs);

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("traitflux.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Check { file } => commands::check::run(&file, quiet, &config),
        Commands::Show { file, entity, format } => {
            commands::show::run(&file, entity.as_deref(), cli::OutputFormat::resolve(format), &config)
        }
        Commands::Flux {
            file,
            entity,
            states,
            format,
        } => commands::flux::run(&file, &entity, &states, cli::OutputFormat::resolve(format), quiet, &config),
        Commands::Walk { file, root } => commands::walk::run(&file, &root, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let log_level = if cli.verbose { LogLevel::Debug } else { config.log_level };
    setup_logging(&config, log_level).context("Failed to setup logging")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting traitflux with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
