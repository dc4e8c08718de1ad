//! HEASARC query CLI application
//!
//! Command-line interface for searching HEASARC W3Browse mission catalogs
//! by object name or sky position.

use std::process;

use tracing::info;
use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use heasarc_query::cli::{
    handle_cols, handle_config, handle_missions, handle_object, handle_region, load_config, Cli,
    Commands,
};
use heasarc_query::config::AppConfig;
use heasarc_query::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // A broken config file must not prevent writing a fresh one
    let config = match load_config(&cli.global).await {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Commands::Config(_)) => {
            eprintln!("Warning: ignoring configuration: {}", e);
            AppConfig::default()
        }
        Err(e) => return Err(e),
    };

    // Initialize logging based on verbosity
    init_logging(&cli, &config);

    info!("HEASARC query v{} starting", env!("CARGO_PKG_VERSION"));

    // Execute the appropriate command
    match cli.command {
        Commands::Object(args) => {
            info!("Executing object command");
            handle_object(args, &cli.global, &config).await
        }
        Commands::Region(args) => {
            info!("Executing region command");
            handle_region(args, &cli.global, &config).await
        }
        Commands::Missions => {
            info!("Executing missions command");
            handle_missions(&cli.global, &config).await
        }
        Commands::Cols(args) => {
            info!("Executing cols command");
            handle_cols(args, &cli.global, &config).await
        }
        Commands::Config(args) => handle_config(args, &cli.global, &config).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = cli.log_level(&config.logging.level);

    // Create environment filter; an unusable configured level falls back to warn
    let directive = format!("heasarc_query={}", log_level)
        .parse::<Directive>()
        .or_else(|_| "heasarc_query=warn".parse::<Directive>());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
