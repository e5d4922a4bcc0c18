//! Task suggestion service - main entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use suggestd::config::ServiceConfig;
use suggestd::matcher::{MatcherService, RandomInjector, RetryExecutor, RuleTable};
use suggestd::observability::init_default_logging;
use suggestd::server::ApiServer;
use tokio::signal;
use tracing::{error, info};

/// Keyword-rule task suggestion service over HTTP
#[derive(Parser)]
#[command(name = "suggestd")]
#[command(about = "Keyword-rule task suggestion service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting suggestd v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_server(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(ServiceConfig::load_from_file(path)?)
        }
        None => {
            // Try default locations
            let default_paths = vec!["suggestd.toml", "config/suggestd.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(ServiceConfig::load_from_file(&path)?);
                }
            }

            error!(
                "No configuration file found. Please provide one with -c/--config or create suggestd.toml"
            );
            process::exit(1);
        }
    }
}

async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Service starting with ID: {}", config.service.id);

    // Build the core with injected dependencies: rule table, retry schedule,
    // and the configured failure injector
    let rules = Arc::new(RuleTable::standard());
    let retry = RetryExecutor::new(
        config.matcher.max_attempts,
        Duration::from_millis(config.matcher.backoff_base_ms),
    );
    let injector = Arc::new(RandomInjector::new(config.matcher.failure_rate));
    let suggester = Arc::new(MatcherService::new(rules, retry, injector));

    // PORT env overrides the configured port
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    let server = Arc::new(ApiServer::new(
        config.service.id.clone(),
        config.server.bind_address.clone(),
        port,
        suggester,
    ));

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.start().await {
            error!("API server error: {}", e);
        }
    });

    // Graceful shutdown on SIGINT/SIGTERM
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    info!("Service is running and accepting requests on port {port}...");

    tokio::select! {
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("Application shutdown initiated");
    server_handle.abort();

    Ok(())
}

fn handle_config_command(
    config: ServiceConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
