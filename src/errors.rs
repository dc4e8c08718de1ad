//! Error types for the HEASARC query client
//!
//! This module defines the error types for every component of the crate.
//! Errors are designed to be actionable and provide clear context for
//! debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Coordinate and angle parsing errors
#[derive(Error, Debug)]
pub enum CoordError {
    /// Coordinate text could not be interpreted
    #[error("Invalid coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    /// A component lies outside its allowed range
    #[error("{component} value {value} is out of range {range}")]
    OutOfRange {
        component: &'static str,
        value: f64,
        range: &'static str,
    },

    /// Unknown coordinate frame tag
    #[error("Unknown coordinate frame '{frame}'. Expected one of icrs, fk5, fk4, galactic")]
    UnknownFrame { frame: String },

    /// Angle text could not be interpreted
    #[error("Invalid angle '{input}': {reason}")]
    InvalidAngle { input: String, reason: String },

    /// Angle unit not recognized
    #[error("Unknown angular unit '{unit}'")]
    UnknownUnit { unit: String },
}

/// Result table decoding errors
#[derive(Error, Debug)]
pub enum TableError {
    /// FITS header is malformed
    #[error("Invalid FITS header: {reason}")]
    InvalidHeader { reason: String },

    /// Mandatory header keyword is absent
    #[error("Missing FITS keyword: {keyword}")]
    MissingKeyword { keyword: String },

    /// The response contains no binary table extension
    #[error("No BINTABLE extension found in FITS response")]
    NoTableExtension,

    /// Column format is not supported by the reader
    #[error("Unsupported column format '{tform}' for column {column}")]
    UnsupportedFormat { column: String, tform: String },

    /// Body ended before the declared data
    #[error("Truncated FITS data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Row width does not match the table's columns
    #[error("Row has {actual} values but table has {expected} columns")]
    RowLength { expected: usize, actual: usize },

    /// Text table layout could not be recognized
    #[error("Invalid text table: {reason}")]
    InvalidText { reason: String },
}

/// HTTP query errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Rate limiter cannot be built with a zero rate
    #[error("Rate limit must be non-zero")]
    InvalidRateLimit,

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Server responded with HTTP 429")]
    RateLimitExceeded,

    /// Server overloaded
    #[error("Server overloaded. Server responded with HTTP 503")]
    ServerOverloaded,

    /// Mission or object name was not recognized by the service
    #[error(
        "One or more inputs is not recognized by HEASARC. Check that the object name is in GRB, SIMBAD+Sesame, or NED format and that the mission name is as listed in the mission list: {detail}"
    )]
    UnrecognizedInput { detail: String },

    /// The HEASARC CGI reported an internal failure
    #[error("Unspecified error from HEASARC database: {message}")]
    ServiceError { message: String },

    /// A mission parameter does not name a column of the mission
    #[error("Unknown parameter '{name}' provided, must be one of {valid:?}")]
    UnknownParameter { name: String, valid: Vec<String> },

    /// Coordinate system tag not recognized
    #[error("'coordsys' must be one of fk5, fk4, equatorial, galactic; got '{value}'")]
    InvalidCoordSys { value: String },

    /// Coordinate or angle error while building the request
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Response could not be decoded
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration cannot be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O error reading or writing configuration
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Query error
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Coordinate error
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Table error
    #[error(transparent)]
    Table(#[from] TableError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output serialization error
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Query(QueryError::Http(e)) => e.is_timeout() || e.is_connect(),
            AppError::Query(QueryError::RateLimitExceeded)
            | AppError::Query(QueryError::ServerOverloaded) => true,
            AppError::Query(QueryError::ServerError { status }) => *status >= 500,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Query(QueryError::Http(_)) => "connection",
            AppError::Query(QueryError::UnrecognizedInput { .. })
            | AppError::Query(QueryError::UnknownParameter { .. }) => "lookup",
            AppError::Query(QueryError::Coord(_)) | AppError::Coord(_) => "coordinate",
            AppError::Query(QueryError::Table(_)) | AppError::Table(_) => "table",
            AppError::Query(_) => "query",
            AppError::Config(_) => "config",
            AppError::Json(_) => "output",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Query result type alias
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Coordinate result type alias
pub type CoordResult<T> = std::result::Result<T, CoordError>;

/// Table result type alias
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
