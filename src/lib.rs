//! HEASARC Query Library
//!
//! A Rust client for the HEASARC W3Browse batch interface. Searches mission
//! catalogs around named objects or sky positions on the NASA server or a
//! mirror such as the ISDC, and decodes the FITS results into tables.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
