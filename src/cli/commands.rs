//! Command handlers for the CLI
//!
//! Each handler builds a client from the effective configuration, runs one
//! query behind a spinner and prints the result as text or JSON.

use std::future::Future;
use std::io::Write;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::args::{ColsArgs, ConfigAction, ConfigArgs, GlobalArgs, ObjectArgs, RegionArgs};
use super::output;
use crate::app::client::{HeasarcClient, RawResponse};
use crate::app::coords::SkyCoord;
use crate::app::table::Table;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Loads the configuration and applies the `--server` flag
pub async fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(global.config.clone()).await?;
    config.apply_server_override(global.server.clone());
    Ok(config)
}

fn build_client(config: &AppConfig) -> Result<HeasarcClient> {
    let client = HeasarcClient::with_config(config.to_runtime_config()?)?;
    info!("Using server {}", client.server());
    Ok(client)
}

/// Runs `task` behind a spinner when stderr is an interactive terminal
async fn with_spinner<T, F>(global: &GlobalArgs, message: String, task: F) -> T
where
    F: Future<Output = T>,
{
    if global.quiet || !atty::is(atty::Stream::Stderr) {
        return task.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

fn print_table(global: &GlobalArgs, table: &Table) -> Result<()> {
    if global.json {
        println!("{}", serde_json::to_string_pretty(&table.to_json_records())?);
    } else {
        print!("{}", output::render_table(table));
    }
    Ok(())
}

fn print_raw(response: &RawResponse) -> Result<()> {
    if !response.is_success() {
        tracing::warn!("Server answered with HTTP {}", response.status());
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Handle the object command
pub async fn handle_object(args: ObjectArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;

    let mut options = args.query.to_options();
    options.radius = args.radius;
    let mission = args.query.mission.as_str();
    let message = format!("Querying {} around '{}'...", mission, args.name);
    let start = Instant::now();

    if args.query.raw {
        let response = with_spinner(
            global,
            message,
            client.query_object_async(&args.name, mission, &options),
        )
        .await?;
        return print_raw(&response);
    }

    let table = with_spinner(
        global,
        message,
        client.query_object(&args.name, mission, &options),
    )
    .await?;
    info!("{} rows in {:?}", table.len(), start.elapsed());
    print_table(global, &table)
}

/// Handle the region command
pub async fn handle_region(args: RegionArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;

    let coordinate = SkyCoord::parse(&args.coordinate, args.frame)?;
    let options = args.query.to_options();
    let mission = args.query.mission.as_str();
    let message = format!("Querying {} within {} of {}...", mission, args.radius, coordinate);
    let start = Instant::now();

    if args.query.raw {
        let response = with_spinner(
            global,
            message,
            client.query_region_async(&coordinate, mission, args.radius, &options),
        )
        .await?;
        return print_raw(&response);
    }

    let table = with_spinner(
        global,
        message,
        client.query_region(&coordinate, mission, args.radius, &options),
    )
    .await?;
    info!("{} rows in {:?}", table.len(), start.elapsed());
    print_table(global, &table)
}

/// Handle the missions command
pub async fn handle_missions(global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;

    let message = format!("Listing missions on {}...", client.server());
    let missions = with_spinner(global, message, client.query_mission_list()).await?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&missions)?);
    } else {
        print!("{}", output::render_missions(&missions));
    }
    Ok(())
}

/// Handle the cols command
pub async fn handle_cols(args: ColsArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;

    let message = format!("Reading columns of {}...", args.mission);
    let columns = with_spinner(global, message, client.query_mission_cols(&args.mission)).await?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else {
        print!("{}", output::render_columns(&columns));
    }
    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path.or_else(AppConfig::default_config_path) {
                Some(path) => path,
                None => {
                    return Err(AppError::generic(
                        "Could not determine user config directory; pass --path",
                    ))
                }
            };

            if AppConfig::write_default(&path, force).await? {
                if !global.quiet {
                    println!("Created configuration file: {}", path.display());
                }
            } else {
                println!(
                    "Configuration file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Ok(())
        }
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
