//! Command-line interface components
//!
//! This module contains CLI-specific code for the HEASARC query tool,
//! including argument parsing, command handlers and result rendering.

pub mod args;
pub mod commands;
pub mod output;

pub use args::{
    Cli, ColsArgs, Commands, ConfigAction, ConfigArgs, GlobalArgs, ObjectArgs, QueryArgs,
    RegionArgs,
};
pub use commands::{
    handle_cols, handle_config, handle_missions, handle_object, handle_region, load_config,
};
