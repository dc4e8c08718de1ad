//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of HTTP clients
//! for the HEASARC batch interface, including the server endpoint to query.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{heasarc, http, limits};
use crate::errors::{QueryError, QueryResult};

/// Configuration for the HEASARC HTTP client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Batch query endpoint (`w3query.pl`)
    pub server: Url,
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            tcp_keepalive: Some(http::TCP_KEEPALIVE),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_server() -> Url {
    Url::parse(heasarc::DEFAULT_SERVER).expect("default server URL is valid")
}

/// Parses and validates a server endpoint
///
/// # Errors
///
/// Returns `QueryError::InvalidUrl` unless the URL parses and uses http(s)
pub fn parse_server_url(server: &str) -> QueryResult<Url> {
    let url = Url::parse(server.trim()).map_err(|e| QueryError::InvalidUrl {
        url: server.to_string(),
        error: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(QueryError::InvalidUrl {
            url: server.to_string(),
            error: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

impl ClientConfig {
    /// Default configuration pointed at another server
    pub fn with_server(server: &str) -> QueryResult<Self> {
        Ok(Self {
            server: parse_server_url(server)?,
            ..Default::default()
        })
    }

    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> QueryResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        // Configure TCP keep-alive if specified
        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        // Configure connection pool idle timeout
        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(QueryError::Http)
    }
}
