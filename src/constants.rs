//! Application constants for the HEASARC query client
//!
//! This module centralizes all constants used throughout the crate,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Overrides the configured HEASARC server endpoint
    pub const SERVER: &str = "HEASARC_SERVER";

    /// Explicit configuration file path
    pub const CONFIG: &str = "HEASARC_CONFIG";
}

/// HEASARC service endpoints and batch interface parameters
pub mod heasarc {
    /// Default W3Browse batch query endpoint hosted at NASA GSFC
    pub const DEFAULT_SERVER: &str = "https://heasarc.gsfc.nasa.gov/cgi-bin/W3Browse/w3query.pl";

    /// ISDC (University of Geneva) mirror of the W3Browse interface
    pub const ISDC_SERVER: &str = "https://www.isdc.unige.ch/browse/w3query.pl";

    /// Prefix of the `tablehead` parameter; the mission name is appended
    pub const TABLEHEAD_PREFIX: &str = "name=BATCHRETRIEVALCATALOG_2.0";

    /// Entry value for queries that are not position based
    pub const NO_ENTRY: &str = "none";

    /// Default value of the `Action` parameter
    pub const DEFAULT_ACTION: &str = "Query";

    /// Display mode returning a FITS binary table
    pub const FITS_DISPLAY: &str = "FitsDisplay";

    /// Display mode returning a fixed-width text table
    pub const BATCH_DISPLAY: &str = "BatchDisplay";

    /// Table name used to provoke the list of available tables
    pub const MISSION_LIST_TABLE: &str = "xray";

    /// Position used when only a mission's column names are needed
    pub const MISSION_COLS_POSITION: &str = "0.0 0.0";

    /// Radius large enough to cover the whole sky
    pub const MISSION_COLS_RADIUS: &str = "361 degree";

    /// `Coordinates` value for equatorial positions
    pub const EQUATORIAL_COORDINATES: &str = "Equatorial: R.A. Dec";

    /// `Coordinates` value for galactic positions
    pub const GALACTIC_COORDINATES: &str = "Galactic: LII BII";

    /// Equinox sent with FK4 positions
    pub const FK4_EQUINOX: u32 = 1950;
}

/// Markers the batch interface embeds in its response bodies
pub mod markers {
    /// The service did not recognize the mission or object name
    pub const BATCH_ERROR: &str = "BATCH_RETRIEVAL_MSG ERROR:";

    /// Unspecified failure inside the HEASARC database CGI
    pub const SOFTWARE_ERROR: &str = "Software error:";

    /// Query succeeded but matched nothing
    pub const NO_MATCHING_ROWS: &str = "NO MATCHING ROWS";

    /// Line preceding the mission table in a mission-list response
    pub const AVAILABLE_TABLES: &str = "Available tables:";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("heasarc-query/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// TCP keep-alive interval
    pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting configuration
pub mod limits {
    /// Default rate limit for HEASARC requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;

    /// Upper bound of the random jitter added before each request (milliseconds)
    pub const RATE_LIMIT_JITTER_MS: u64 = 100;
}

/// FITS container layout
pub mod fits {
    /// Size of a header or data block in bytes
    pub const BLOCK_SIZE: usize = 2880;

    /// Size of one header card in bytes
    pub const CARD_SIZE: usize = 80;

    /// Largest `TFIELDS` value a binary table may declare
    pub const MAX_FIELDS: usize = 999;

    /// Extension type carrying a binary table
    pub const BINTABLE: &str = "BINTABLE";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "heasarc-query.toml";

    /// Directory under the user's config dir
    pub const APP_DIR: &str = "heasarc-query";

    /// File name inside [`APP_DIR`]
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use env::SERVER as ENV_SERVER;
pub use heasarc::{DEFAULT_SERVER, ISDC_SERVER};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::DEFAULT_RATE_LIMIT_RPS;
