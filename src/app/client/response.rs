//! Raw responses and their interpretation
//!
//! The batch interface reports failures inside a successful HTTP response,
//! so the body is searched for the service's error markers before it is
//! decoded as a table.

use std::borrow::Cow;

use reqwest::header::HeaderMap;
use url::Url;

use crate::app::models::{ColumnList, Mission, MissionList};
use crate::app::table::{read_bintable, read_fixed_width, Table, Value};
use crate::constants::markers;
use crate::errors::{QueryError, QueryResult, TableError};

/// An unparsed HTTP response with its body fully read
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            url,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Reads the whole body of a reqwest response
    pub(crate) async fn from_response(response: reqwest::Response) -> QueryResult<Self> {
        let status = response.status().as_u16();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            url,
            headers,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Final URL, including the encoded query string
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn contains(&self, marker: &str) -> bool {
        let needle = marker.as_bytes();
        self.body.windows(needle.len()).any(|w| w == needle)
    }

    /// The remainder of the line that starts with `marker`
    fn marker_line(&self, marker: &str) -> String {
        let text = self.text();
        text.find(marker)
            .map(|start| {
                let rest = &text[start + marker.len()..];
                rest.lines().next().unwrap_or("").trim().to_string()
            })
            .unwrap_or_default()
    }
}

/// Fails on non-2xx statuses and on the service's error markers
///
/// # Errors
///
/// `ServerError` for a non-2xx status, `UnrecognizedInput` for an unknown
/// mission or object and `ServiceError` for a failure inside the service
pub fn check_service_errors(raw: &RawResponse) -> QueryResult<()> {
    if !raw.is_success() {
        return Err(QueryError::ServerError {
            status: raw.status(),
        });
    }
    if raw.contains(markers::BATCH_ERROR) {
        return Err(QueryError::UnrecognizedInput {
            detail: raw.marker_line(markers::BATCH_ERROR),
        });
    }
    if raw.contains(markers::SOFTWARE_ERROR) {
        return Err(QueryError::ServiceError {
            message: raw.text().trim().to_string(),
        });
    }
    Ok(())
}

/// Decodes a `FitsDisplay` response into a table
///
/// A response reporting no matching rows yields an empty table.
pub fn parse_result(raw: &RawResponse) -> QueryResult<Table> {
    check_service_errors(raw)?;

    if raw.contains(markers::NO_MATCHING_ROWS) {
        tracing::warn!("Query returned no results");
        return Ok(Table::empty());
    }

    let table = read_bintable(raw.bytes())?;
    tracing::debug!(
        "Parsed {} rows with {} columns",
        table.len(),
        table.num_columns()
    );
    Ok(table)
}

/// Decodes a `BatchDisplay` mission list response
///
/// Everything up to the `Available tables:` line is a preamble.
pub fn parse_mission_list(raw: &RawResponse) -> QueryResult<MissionList> {
    if !raw.is_success() {
        return Err(QueryError::ServerError {
            status: raw.status(),
        });
    }

    // The listing arrives as a complaint about the placeholder table, so the
    // error markers only matter when no listing is present.
    let text = raw.text();
    let listing = match text.find(markers::AVAILABLE_TABLES) {
        Some(start) => &text[start + markers::AVAILABLE_TABLES.len()..],
        None => {
            check_service_errors(raw)?;
            return Err(TableError::InvalidText {
                reason: format!("'{}' not found in response", markers::AVAILABLE_TABLES),
            }
            .into());
        }
    };

    let table = read_fixed_width(listing)?;
    let missions = table
        .rows()
        .iter()
        .filter_map(|row| {
            let name = row.first().and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            let description = row
                .get(1)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(Mission::new(name, description))
        })
        .collect();

    Ok(MissionList::new(missions))
}

/// Column names of a parsed result
pub fn column_list(table: &Table) -> ColumnList {
    ColumnList::new(table.column_names())
}
