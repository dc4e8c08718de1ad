//! Core HTTP operations with rate limiting
//!
//! Every request waits on a per-client rate limiter before it is sent.
//! Requests are attempted exactly once; throttling and overload statuses
//! are surfaced as dedicated errors.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use url::Url;

use super::response::RawResponse;
use crate::constants::limits;
use crate::errors::{QueryError, QueryResult};

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidRateLimit` if `rate_limit_rps` is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> QueryResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> QueryResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let quota =
            Quota::per_second(NonZeroU32::new(rate_limit_rps).ok_or(QueryError::InvalidRateLimit)?);
        Ok(RateLimiter::direct(quota))
    }

    /// Sends a GET request with the given query parameters
    ///
    /// The response body is read completely before returning.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Http` on connection failure or timeout,
    /// `RateLimitExceeded` on HTTP 429 and `ServerOverloaded` on HTTP 503
    pub async fn get_response(
        &self,
        url: &Url,
        params: &[(String, String)],
    ) -> QueryResult<RawResponse> {
        // Apply rate limiting with jitter to avoid bursts against the archive
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(
                limits::RATE_LIMIT_JITTER_MS,
            )))
            .await;

        tracing::debug!("GET {} with {} parameters", url, params.len());
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} failed: {}", url, e);
                QueryError::Http(e)
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Rate limited by server (429)");
                Err(QueryError::RateLimitExceeded)
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::warn!("Server overloaded (503)");
                Err(QueryError::ServerOverloaded)
            }
            status => {
                let raw = RawResponse::from_response(response).await?;
                tracing::debug!(
                    "Received HTTP {} ({} bytes) from {}",
                    status.as_u16(),
                    raw.len(),
                    url
                );
                Ok(raw)
            }
        }
    }
}
