//! Core application logic for the HEASARC query client
//!
//! This module contains the HTTP client for the W3Browse batch interface,
//! sky coordinates and angles, result tables and metadata models.
//!
//! # Examples
//!
//! ```rust,no_run
//! use heasarc_query::app::{HeasarcClient, QueryOptions};
//! use heasarc_query::constants::ISDC_SERVER;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = HeasarcClient::new()?;
//!
//! // Query the ISDC mirror; the default server is restored afterwards
//! let isdc = client.set_temp_server(ISDC_SERVER)?;
//! let options = QueryOptions::new().with_radius("1 degree".parse()?);
//! let table = isdc.query_object("3c273", "integral_rev3_scw", &options).await?;
//!
//! println!("{} science windows", table.len());
//! # Ok(())
//! # }
//! ```

pub mod angle;
pub mod client;
pub mod coords;
pub mod models;
pub mod table;

// Re-export main public API
pub use angle::Angle;
pub use client::{
    ClientConfig, CoordSys, DisplayMode, Fields, HeasarcClient, QueryOptions, QueryPayload,
    RawResponse, TempServer,
};
pub use coords::{Frame, SkyCoord};
pub use models::{ColumnList, Mission, MissionList};
pub use table::{Column, Table, Value};
