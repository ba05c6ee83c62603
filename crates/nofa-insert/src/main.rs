//! NOFA Insert - Main entry point

use clap::Parser;
use nofa_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use nofa_insert::{commands, Cli, Commands, Config};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("nofa-insert")
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("nofa-insert")
            .build()
    };

    // Environment variables take precedence when set
    let log_config = if std::env::var("LOG_LEVEL").is_ok() {
        LogConfig::from_env().unwrap_or(log_config)
    } else {
        log_config
    };

    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        },
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            process::exit(2);
        },
    };

    if let Err(e) = execute_command(&cli, &config).await {
        error!(error = %e, kind = ?e.kind(), "Command failed");
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

async fn execute_command(cli: &Cli, config: &Config) -> nofa_insert::Result<()> {
    let json = cli.json;

    match &cli.command {
        Commands::Check => commands::check::run(config).await,
        Commands::Migrate => commands::check::migrate(config).await,
        Commands::Resolve(args) => commands::resolve::run(config, args, json).await,
        Commands::Record { file, dry_run } => {
            commands::record::run(config, file, *dry_run, json).await
        },
        Commands::History(args) => commands::history::run(config, args, json).await,
        Commands::Users => commands::history::users(config, json).await,
        Commands::Lookup { command } => commands::lookup::run(config, command, json).await,
        Commands::SearchLocations(args) => commands::search::run(config, args, json).await,
    }
}
