//! Prelude module for the HEASARC Query Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use heasarc_query::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use heasarc_query::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HeasarcClient::new()?;
//!     let position = SkyCoord::parse("12h29m06.70s +02d03m08.7s", Frame::Icrs)?;
//!     let radius: Angle = "1 degree".parse()?;
//!
//!     let table = client
//!         .query_region(&position, "integral_rev3_scw", radius, &QueryOptions::default())
//!         .await?;
//!     println!("{} rows", table.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Client and query types used in most integrations
pub use crate::app::{
    Angle, ClientConfig, ColumnList, CoordSys, Fields, Frame, HeasarcClient, MissionList,
    QueryOptions, RawResponse, SkyCoord, Table, Value,
};

// Configuration
pub use crate::config::AppConfig;

// Constants that users might need
pub use crate::constants::{DEFAULT_SERVER, ISDC_SERVER};
