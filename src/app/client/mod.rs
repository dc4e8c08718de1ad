//! HTTP client for the HEASARC W3Browse batch interface
//!
//! Every query is a single rate-limited GET against the active server
//! endpoint. Methods ending in `_async` return the raw HTTP response; the
//! others decode it into a [`Table`] or a metadata list.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations with rate limiting
//! - `payload`: Request parameter construction
//! - `response`: Raw responses and error marker interpretation

use std::ops::{Deref, DerefMut};

use url::Url;

use crate::app::angle::Angle;
use crate::app::coords::{Frame, SkyCoord};
use crate::app::models::{ColumnList, MissionList};
use crate::app::table::Table;
use crate::constants::heasarc;
use crate::errors::{QueryError, QueryResult};

// Module declarations
pub mod config;
pub mod http;
pub mod payload;
pub mod response;

#[cfg(test)]
mod tests;

pub use config::{parse_server_url, ClientConfig};
pub use payload::{CoordSys, DisplayMode, Fields, QueryOptions, QueryPayload};
pub use response::RawResponse;

use http::HttpHandler;

/// Client for one W3Browse server endpoint
///
/// The endpoint can be swapped for the duration of a scope with
/// [`HeasarcClient::set_temp_server`].
#[derive(Debug)]
pub struct HeasarcClient {
    http_handler: HttpHandler,
    config: ClientConfig,
}

impl HeasarcClient {
    /// Creates a client for the default NASA endpoint
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the HTTP client cannot be built
    pub fn new() -> QueryResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the HTTP client cannot be built or the rate
    /// limit is zero
    pub fn with_config(config: ClientConfig) -> QueryResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;

        tracing::debug!("Created HEASARC client for {}", config.server);

        Ok(Self {
            http_handler,
            config,
        })
    }

    /// Creates a client for another endpoint with default settings
    pub fn with_server(server: &str) -> QueryResult<Self> {
        Self::with_config(ClientConfig::with_server(server)?)
    }

    /// The active server endpoint
    pub fn server(&self) -> &Url {
        &self.config.server
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the server endpoint permanently
    pub fn set_server(&mut self, server: &str) -> QueryResult<()> {
        self.config.server = parse_server_url(server)?;
        Ok(())
    }

    /// Points the client at another server until the returned guard drops
    ///
    /// The previous endpoint is restored on every exit path, including early
    /// returns and panics.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidUrl` if `server` is not an http(s) URL;
    /// the client is left unchanged
    pub fn set_temp_server(&mut self, server: &str) -> QueryResult<TempServer<'_>> {
        let server = parse_server_url(server)?;
        let previous = std::mem::replace(&mut self.config.server, server);
        tracing::debug!(
            "Temporarily using server {} (was {})",
            self.config.server,
            previous
        );
        Ok(TempServer {
            client: self,
            previous: Some(previous),
        })
    }

    /// Payload of an object query, without network I/O
    pub fn object_payload(&self, name: &str, mission: &str, options: &QueryOptions) -> QueryPayload {
        QueryPayload::build(
            mission,
            name.trim(),
            DisplayMode::Fits,
            options.coord_sys.unwrap_or_default(),
            options,
        )
    }

    /// Payload of a region query, without network I/O
    ///
    /// The coordinate system follows the coordinate's frame unless
    /// `options.coord_sys` is set. `radius` replaces `options.radius`.
    pub fn region_payload(
        &self,
        coordinate: &SkyCoord,
        mission: &str,
        radius: Angle,
        options: &QueryOptions,
    ) -> QueryPayload {
        let options = QueryOptions {
            radius: Some(radius),
            ..options.clone()
        };
        let coord_sys = options
            .coord_sys
            .unwrap_or_else(|| CoordSys::from(coordinate.frame()));
        QueryPayload::build(
            mission,
            &coordinate.to_entry(),
            DisplayMode::Fits,
            coord_sys,
            &options,
        )
    }

    /// Sends a payload to `url`, or to the active server when `None`
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Http` on transport failure, `RateLimitExceeded`
    /// on HTTP 429 and `ServerOverloaded` on HTTP 503. Other statuses are
    /// returned as part of the response.
    pub async fn query_async(
        &self,
        payload: &QueryPayload,
        url: Option<&Url>,
    ) -> QueryResult<RawResponse> {
        let url = url.unwrap_or(&self.config.server);
        tracing::info!(
            "Querying {} ({})",
            url,
            payload.get("tablehead").unwrap_or_default()
        );
        self.http_handler.get_response(url, payload.pairs()).await
    }

    /// Queries `mission` around an object name resolved by the service
    pub async fn query_object_async(
        &self,
        name: &str,
        mission: &str,
        options: &QueryOptions,
    ) -> QueryResult<RawResponse> {
        self.validate_params(mission, options).await?;
        let payload = self.object_payload(name, mission, options);
        self.query_async(&payload, None).await
    }

    /// Queries `mission` around an object name and decodes the result table
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnrecognizedInput` if the service does not know
    /// the object or mission. An empty table means nothing matched.
    pub async fn query_object(
        &self,
        name: &str,
        mission: &str,
        options: &QueryOptions,
    ) -> QueryResult<Table> {
        let raw = self.query_object_async(name, mission, options).await?;
        response::parse_result(&raw)
    }

    /// Queries `mission` within `radius` of a position
    pub async fn query_region_async(
        &self,
        coordinate: &SkyCoord,
        mission: &str,
        radius: Angle,
        options: &QueryOptions,
    ) -> QueryResult<RawResponse> {
        self.validate_params(mission, options).await?;
        let payload = self.region_payload(coordinate, mission, radius, options);
        self.query_async(&payload, None).await
    }

    /// Queries `mission` within `radius` of a position and decodes the result
    pub async fn query_region(
        &self,
        coordinate: &SkyCoord,
        mission: &str,
        radius: Angle,
        options: &QueryOptions,
    ) -> QueryResult<Table> {
        let raw = self
            .query_region_async(coordinate, mission, radius, options)
            .await?;
        response::parse_result(&raw)
    }

    /// Lists the missions served by the active server
    pub async fn query_mission_list(&self) -> QueryResult<MissionList> {
        let payload = QueryPayload::build(
            heasarc::MISSION_LIST_TABLE,
            heasarc::NO_ENTRY,
            DisplayMode::Batch,
            CoordSys::default(),
            &QueryOptions::default(),
        );
        let raw = self.query_async(&payload, None).await?;
        let missions = response::parse_mission_list(&raw)?;
        tracing::info!("Server lists {} missions", missions.len());
        Ok(missions)
    }

    /// Column names of `mission`
    ///
    /// Runs a whole-sky region query limited to one row and reads the columns
    /// of the result.
    pub async fn query_mission_cols(&self, mission: &str) -> QueryResult<ColumnList> {
        let coordinate = SkyCoord::parse(heasarc::MISSION_COLS_POSITION, Frame::Fk5)?;
        let radius: Angle = heasarc::MISSION_COLS_RADIUS.parse()?;
        let options = QueryOptions::new()
            .with_result_max(1)
            .with_fields(Fields::All);

        let payload = self.region_payload(&coordinate, mission, radius, &options);
        let raw = self.query_async(&payload, None).await?;
        let table = response::parse_result(&raw)?;
        Ok(response::column_list(&table))
    }

    /// Checks that every mission parameter names a column of `mission`
    async fn validate_params(&self, mission: &str, options: &QueryOptions) -> QueryResult<()> {
        if options.params.is_empty() {
            return Ok(());
        }

        let columns = self.query_mission_cols(mission).await?;
        for name in options.params.keys() {
            if !columns.contains_ignore_case(name) {
                return Err(QueryError::UnknownParameter {
                    name: name.clone(),
                    valid: columns.into_vec(),
                });
            }
        }
        Ok(())
    }
}

/// Scoped server override returned by [`HeasarcClient::set_temp_server`]
///
/// Dereferences to the client; dropping it restores the previous server.
#[derive(Debug)]
pub struct TempServer<'a> {
    client: &'a mut HeasarcClient,
    previous: Option<Url>,
}

impl TempServer<'_> {
    /// The endpoint that will be restored
    pub fn previous(&self) -> Option<&Url> {
        self.previous.as_ref()
    }
}

impl Deref for TempServer<'_> {
    type Target = HeasarcClient;

    fn deref(&self) -> &Self::Target {
        &*self.client
    }
}

impl DerefMut for TempServer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.client
    }
}

impl Drop for TempServer<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!("Restoring server {}", previous);
            self.client.config.server = previous;
        }
    }
}
