//! Command-line argument parsing for the HEASARC query tool
//!
//! This module defines the CLI structure using clap derive macros: object
//! and region searches, mission metadata lookups and configuration helpers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::angle::Angle;
use crate::app::client::{CoordSys, Fields, QueryOptions};
use crate::app::coords::Frame;

/// HEASARC query - search high-energy astrophysics mission catalogs
#[derive(Parser, Debug)]
#[command(
    name = "heasarc_query",
    version,
    about = "Query HEASARC W3Browse mission catalogs by object name or sky position",
    long_about = "Query the HEASARC W3Browse batch interface (or a mirror such as the ISDC)
for mission catalog entries around a named object or a sky position, and list the
missions and columns a server provides."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server endpoint (overrides config file and HEASARC_SERVER)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a mission around a named object
    Object(ObjectArgs),

    /// Search a mission around a sky position
    Region(RegionArgs),

    /// List the missions available on the server
    Missions,

    /// List the columns of a mission
    Cols(ColsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Options shared by object and region searches
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Mission (table) to search, e.g. "integral_rev3_scw"
    #[arg(short, long)]
    pub mission: String,

    /// Columns to return: "standard", "all", or a comma separated list
    #[arg(long)]
    pub fields: Option<Fields>,

    /// Maximum number of rows to return
    #[arg(long, value_name = "N")]
    pub result_max: Option<u32>,

    /// Column to sort the results by
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Time range, e.g. "2003-01-01 .. 2004-01-01"
    #[arg(long)]
    pub time: Option<String>,

    /// Coordinate system: fk5, fk4, equatorial or galactic
    #[arg(long)]
    pub coordsys: Option<CoordSys>,

    /// Equinox used with --coordsys equatorial
    #[arg(long)]
    pub equinox: Option<u32>,

    /// Mission column constraint, e.g. --param scw_type=POINTING (repeatable)
    #[arg(long = "param", value_name = "COLUMN=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Print the unparsed server response
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the object command
#[derive(Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Object name resolved by the service (GRB, SIMBAD+Sesame or NED)
    pub name: String,

    /// Search radius, e.g. "1 degree" or "30 arcmin"
    #[arg(short, long)]
    pub radius: Option<Angle>,

    #[command(flatten)]
    pub query: QueryArgs,
}

/// Arguments for the region command
#[derive(Args, Debug, Clone)]
pub struct RegionArgs {
    /// Sky position, e.g. "12h29m06.70s +02d03m08.7s" or "187.28 2.05"
    pub coordinate: String,

    /// Frame of the position: icrs, fk5, fk4 or galactic
    #[arg(short, long, default_value = "icrs")]
    pub frame: Frame,

    /// Search radius
    #[arg(short, long, default_value = "1 degree")]
    pub radius: Angle,

    #[command(flatten)]
    pub query: QueryArgs,
}

/// Arguments for the cols command
#[derive(Args, Debug, Clone)]
pub struct ColsArgs {
    /// Mission whose columns to list
    pub mission: String,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// Without a verbosity flag the configured level applies.
    pub fn log_level(&self, configured: &str) -> String {
        let level = if self.global.quiet {
            tracing::Level::ERROR.to_string()
        } else if self.global.very_verbose {
            tracing::Level::DEBUG.to_string()
        } else if self.global.verbose {
            tracing::Level::INFO.to_string()
        } else {
            configured.to_string()
        };
        level.to_lowercase()
    }
}

impl QueryArgs {
    /// Query options for the client, without the radius
    pub fn to_options(&self) -> QueryOptions {
        QueryOptions {
            radius: None,
            fields: self.fields.clone(),
            result_max: self.result_max,
            sort_var: self.sort.clone(),
            time: self.time.clone(),
            coord_sys: self.coordsys,
            equinox: self.equinox,
            params: self.params.iter().cloned().collect(),
        }
    }
}

/// Parses a `COLUMN=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("scw_type=POINTING").unwrap(),
            ("scw_type".to_string(), "POINTING".to_string())
        );
        assert_eq!(
            parse_key_val("revol=> 100").unwrap(),
            ("revol".to_string(), "> 100".to_string())
        );
        assert!(parse_key_val("no_separator").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn test_object_command_parsing() {
        let cli = Cli::try_parse_from([
            "heasarc_query",
            "object",
            "3c273",
            "--mission",
            "integral_rev3_scw",
            "--radius",
            "1 degree",
            "--param",
            "scw_type=POINTING",
            "--json",
        ])
        .unwrap();

        assert!(cli.global.json);
        match cli.command {
            Commands::Object(args) => {
                assert_eq!(args.name, "3c273");
                assert_eq!(args.radius.map(|r| r.degrees()), Some(1.0));
                let options = args.query.to_options();
                assert_eq!(options.params.get("scw_type").map(String::as_str), Some("POINTING"));
                assert!(options.radius.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_region_defaults() {
        let cli = Cli::try_parse_from([
            "heasarc_query",
            "region",
            "12h29m06.70s +02d03m08.7s",
            "-m",
            "integral_rev3_scw",
        ])
        .unwrap();

        match cli.command {
            Commands::Region(args) => {
                assert_eq!(args.frame, Frame::Icrs);
                assert_eq!(args.radius.degrees(), 1.0);
                assert!(!args.query.raw);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordsys_rejected() {
        let result = Cli::try_parse_from([
            "heasarc_query",
            "object",
            "3c273",
            "-m",
            "integral_rev3_scw",
            "--coordsys",
            "ecliptic",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_selection() {
        let mut cli = Cli::try_parse_from(["heasarc_query", "missions"]).unwrap();
        assert_eq!(cli.log_level("warn"), "warn");

        cli.global.verbose = true;
        assert_eq!(cli.log_level("warn"), "info");

        cli.global.very_verbose = true;
        assert_eq!(cli.log_level("warn"), "debug");

        cli.global.quiet = true;
        assert_eq!(cli.log_level("warn"), "error");
    }
}
