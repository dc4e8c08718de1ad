//! Request payloads for the W3Browse batch interface
//!
//! A payload is an ordered list of key/value pairs sent as the query string
//! of a GET request to `w3query.pl`. Parameters are emitted in a fixed order:
//! table, entry, action, display mode, coordinate system, fields, radius,
//! result limit, sort column, time range and finally mission-column filters.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::angle::Angle;
use crate::app::coords::Frame;
use crate::constants::heasarc;
use crate::errors::QueryError;

/// Coordinate system the service interprets positions in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSys {
    #[default]
    Fk5,
    Fk4,
    /// Equatorial with an explicit `equinox`
    Equatorial,
    Galactic,
}

impl CoordSys {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordSys::Fk5 => "fk5",
            CoordSys::Fk4 => "fk4",
            CoordSys::Equatorial => "equatorial",
            CoordSys::Galactic => "galactic",
        }
    }
}

impl From<Frame> for CoordSys {
    /// ICRS and FK5 (J2000) differ by less than 25 mas and share `fk5`
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Icrs | Frame::Fk5 => CoordSys::Fk5,
            Frame::Fk4 => CoordSys::Fk4,
            Frame::Galactic => CoordSys::Galactic,
        }
    }
}

impl FromStr for CoordSys {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fk5" => Ok(CoordSys::Fk5),
            "fk4" => Ok(CoordSys::Fk4),
            "equatorial" => Ok(CoordSys::Equatorial),
            "galactic" => Ok(CoordSys::Galactic),
            _ => Err(QueryError::InvalidCoordSys {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CoordSys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fields {
    Standard,
    All,
    /// Explicit column names, sent as one `varon` per column
    Custom(Vec<String>),
}

impl FromStr for Fields {
    type Err = std::convert::Infallible;

    /// `standard`, `all`, or a comma separated list of column names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("standard") {
            Ok(Fields::Standard)
        } else if trimmed.eq_ignore_ascii_case("all") {
            Ok(Fields::All)
        } else {
            Ok(Fields::Custom(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            ))
        }
    }
}

/// Response format requested through `displaymode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// FITS binary table
    #[default]
    Fits,
    /// Fixed-width text table
    Batch,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Fits => heasarc::FITS_DISPLAY,
            DisplayMode::Batch => heasarc::BATCH_DISPLAY,
        }
    }
}

/// Optional query parameters shared by object and region queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Search radius; the service default applies when unset
    pub radius: Option<Angle>,
    pub fields: Option<Fields>,
    pub result_max: Option<u32>,
    /// Column to sort the results by
    pub sort_var: Option<String>,
    /// Time range in the service's syntax, e.g. `"2003-01-01 .. 2004-01-01"`
    pub time: Option<String>,
    /// Overrides the system derived from the target
    pub coord_sys: Option<CoordSys>,
    /// Equinox used with [`CoordSys::Equatorial`]
    pub equinox: Option<u32>,
    /// Mission column filters, column name to constraint
    pub params: BTreeMap<String, String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(mut self, radius: Angle) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_result_max(mut self, result_max: u32) -> Self {
        self.result_max = Some(result_max);
        self
    }

    pub fn with_sort_var(mut self, column: impl Into<String>) -> Self {
        self.sort_var = Some(column.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_coord_sys(mut self, coord_sys: CoordSys) -> Self {
        self.coord_sys = Some(coord_sys);
        self
    }

    pub fn with_equinox(mut self, equinox: u32) -> Self {
        self.equinox = Some(equinox);
        self
    }

    pub fn with_param(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(column.into(), value.into());
        self
    }
}

/// Ordered request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPayload {
    pairs: Vec<(String, String)>,
}

impl QueryPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full payload for one query
    ///
    /// `entry` is an object name, a `"lon,lat"` position or `"none"`.
    pub fn build(
        mission: &str,
        entry: &str,
        display: DisplayMode,
        coord_sys: CoordSys,
        options: &QueryOptions,
    ) -> Self {
        let mut payload = Self::new();
        payload.push(
            "tablehead",
            format!("{} {}", heasarc::TABLEHEAD_PREFIX, mission.trim()),
        );
        payload.push("Entry", entry);
        payload.push("Action", heasarc::DEFAULT_ACTION);
        payload.push("displaymode", display.as_str());

        match coord_sys {
            CoordSys::Fk5 => {
                payload.push("Coordinates", heasarc::EQUATORIAL_COORDINATES);
            }
            CoordSys::Fk4 => {
                payload.push("Coordinates", heasarc::EQUATORIAL_COORDINATES);
                payload.push("equinox", heasarc::FK4_EQUINOX.to_string());
            }
            CoordSys::Equatorial => {
                payload.push("Coordinates", heasarc::EQUATORIAL_COORDINATES);
                if let Some(equinox) = options.equinox {
                    payload.push("Equinox", equinox.to_string());
                }
            }
            CoordSys::Galactic => {
                payload.push("Coordinates", heasarc::GALACTIC_COORDINATES);
            }
        }

        match &options.fields {
            Some(Fields::Standard) => payload.push("Fields", "Standard"),
            Some(Fields::All) => payload.push("Fields", "All"),
            Some(Fields::Custom(columns)) => {
                for column in columns {
                    payload.push("varon", column.to_lowercase());
                }
            }
            None => {}
        }

        if let Some(radius) = options.radius {
            payload.push("Radius", radius.to_arcmin_string());
        }
        if let Some(result_max) = options.result_max {
            payload.push("ResultMax", result_max.to_string());
        }
        if let Some(sort_var) = &options.sort_var {
            payload.push("sortvar", sort_var.to_lowercase());
        }
        if let Some(time) = &options.time {
            payload.push("Time", time.as_str());
        }
        for (column, value) in &options.params {
            payload.push(format!("bparam_{}", column.to_lowercase()), value.as_str());
        }

        payload
    }

    /// Appends a parameter; repeated keys are kept
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
