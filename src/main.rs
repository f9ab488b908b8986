use clap::Parser;
use jejurag::cli::*;
use jejurag::config::AppConfig;
use jejurag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("Failed to load configuration: {e}"));
            return Err(e);
        }
    };

    // Initialize logging
    if cli.verbose {
        jejurag::logging::init_logging_with_level("debug")?;
    } else {
        jejurag::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Init => handle_init(&config).await,
        Commands::Search { query, limit } => handle_search(&config, &query, limit).await,
        Commands::Ask { question } => handle_ask(&config, &question).await,
        Commands::Weather { lat, lon } => handle_weather(&config, lat, lon).await,
        Commands::Serve { host, port, cors } => handle_serve_api(&config, host, port, cors).await,
        Commands::Config => handle_config_command(&config),
    }
}
