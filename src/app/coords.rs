//! Sky coordinates tagged with a reference frame
//!
//! Positions can be written in sexagesimal (`"12h29m06.70s +02d03m08.7s"`,
//! `"12:29:06.7 +02:03:08.7"`, `"12 29 06.7 +02 03 08.7"`) or decimal degrees
//! (`"187.2779 2.0524"`, `"187.2779,2.0524"`). For equatorial frames an
//! unmarked sexagesimal longitude is read as hours, a decimal one as degrees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CoordError, CoordResult};

/// Celestial reference frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Icrs,
    Fk5,
    Fk4,
    Galactic,
}

impl Frame {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frame::Icrs => "icrs",
            Frame::Fk5 => "fk5",
            Frame::Fk4 => "fk4",
            Frame::Galactic => "galactic",
        }
    }

    /// Whether longitudes in this frame are right ascensions
    pub fn is_equatorial(&self) -> bool {
        !matches!(self, Frame::Galactic)
    }
}

impl FromStr for Frame {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icrs" => Ok(Frame::Icrs),
            "fk5" | "j2000" => Ok(Frame::Fk5),
            "fk4" | "b1950" => Ok(Frame::Fk4),
            "galactic" | "gal" => Ok(Frame::Galactic),
            other => Err(CoordError::UnknownFrame {
                frame: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable position on the sky
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    lon: f64,
    lat: f64,
    frame: Frame,
}

impl SkyCoord {
    /// Creates a coordinate from longitude and latitude in degrees
    ///
    /// The longitude is wrapped into [0, 360).
    ///
    /// # Errors
    ///
    /// Returns `CoordError::OutOfRange` if the latitude is outside [-90, 90]
    /// or either value is not finite
    pub fn new(lon_deg: f64, lat_deg: f64, frame: Frame) -> CoordResult<Self> {
        if !lon_deg.is_finite() {
            return Err(CoordError::OutOfRange {
                component: "longitude",
                value: lon_deg,
                range: "(finite)",
            });
        }
        if !lat_deg.is_finite() || !(-90.0..=90.0).contains(&lat_deg) {
            return Err(CoordError::OutOfRange {
                component: "latitude",
                value: lat_deg,
                range: "[-90, 90]",
            });
        }

        Ok(Self {
            lon: lon_deg.rem_euclid(360.0),
            lat: lat_deg,
            frame,
        })
    }

    /// Parses a coordinate string in the given frame
    pub fn parse(input: &str, frame: Frame) -> CoordResult<Self> {
        let (lon_text, lat_text) = split_pair(input)?;

        let lon = parse_longitude(&lon_text, frame).map_err(|e| with_input(e, input))?;
        let lat = parse_latitude(&lat_text).map_err(|e| with_input(e, input))?;

        Self::new(lon, lat, frame)
    }

    /// Longitude in degrees (right ascension for equatorial frames)
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees (declination for equatorial frames)
    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn ra(&self) -> f64 {
        self.lon
    }

    pub fn dec(&self) -> f64 {
        self.lat
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Position as sent in the `Entry` parameter: `"<lon>,<lat>"` in degrees
    pub fn to_entry(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

impl fmt::Display for SkyCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SkyCoord ({}): {} {}>", self.frame, self.lon, self.lat)
    }
}

/// Wraps a component error with the full coordinate text
fn with_input(err: CoordError, input: &str) -> CoordError {
    match err {
        CoordError::InvalidCoordinate { reason, .. } => CoordError::InvalidCoordinate {
            input: input.to_string(),
            reason,
        },
        other => other,
    }
}

fn invalid(input: &str, reason: impl Into<String>) -> CoordError {
    CoordError::InvalidCoordinate {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Splits the text into longitude and latitude parts
fn split_pair(input: &str) -> CoordResult<(String, String)> {
    let tokens: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.len() {
        2 => Ok((tokens[0].to_string(), tokens[1].to_string())),
        // "12 29 06.7 +02 03 08.7"
        6 => Ok((tokens[..3].join(":"), tokens[3..].join(":"))),
        // "12 29 +02 03"
        4 => Ok((tokens[..2].join(":"), tokens[2..].join(":"))),
        n => Err(invalid(
            input,
            format!("expected two components, found {} tokens", n),
        )),
    }
}

fn is_sexagesimal(token: &str) -> bool {
    token.contains(|c: char| matches!(c, 'h' | 'd' | 'm' | 's' | ':' | '°' | '\'' | '"'))
}

fn parse_longitude(token: &str, frame: Frame) -> CoordResult<f64> {
    if !is_sexagesimal(token) {
        return parse_decimal(token);
    }

    let hours = token.contains('h') || (frame.is_equatorial() && !token.contains(['d', '°']));
    let (negative, value) = parse_sexagesimal(token)?;
    if negative {
        return Err(invalid(token, "longitude cannot be negative"));
    }

    if hours {
        if value >= 24.0 {
            return Err(CoordError::OutOfRange {
                component: "hours",
                value,
                range: "[0, 24)",
            });
        }
        Ok(value * 15.0)
    } else {
        Ok(value)
    }
}

fn parse_latitude(token: &str) -> CoordResult<f64> {
    if token.contains('h') {
        return Err(invalid(token, "latitude cannot be given in hours"));
    }
    if !is_sexagesimal(token) {
        return parse_decimal(token);
    }

    let (negative, value) = parse_sexagesimal(token)?;
    Ok(if negative { -value } else { value })
}

fn parse_decimal(token: &str) -> CoordResult<f64> {
    token
        .trim_end_matches(|c: char| c == 'd' || c == '°')
        .parse::<f64>()
        .map_err(|_| invalid(token, format!("'{}' is not a number", token)))
}

/// Separators allowed after each field, in order
const SEPARATORS: [&[char]; 3] = [&['h', 'd', '°', ':'], &['m', '\'', ':'], &['s', '"']];

/// Parses `[+-]A[:hd°]B[:m']C[s"]` into its sign and decimal value
fn parse_sexagesimal(token: &str) -> CoordResult<(bool, f64)> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let mut fields = [0.0_f64; 3];
    let mut count = 0;
    let mut rest = body;
    while !rest.is_empty() {
        if count == fields.len() {
            return Err(invalid(token, "expected one to three sexagesimal fields"));
        }

        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(end);
        if number.is_empty() {
            let found = tail.chars().next().unwrap_or(' ');
            return Err(invalid(
                token,
                format!("unexpected '{}' in field {}", found, count + 1),
            ));
        }
        fields[count] = number
            .parse()
            .map_err(|_| invalid(token, format!("'{}' is not a number", number)))?;

        let mut chars = tail.chars();
        rest = match chars.next() {
            None => tail,
            Some(c) if SEPARATORS[count].contains(&c) => chars.as_str(),
            Some(c) => {
                return Err(invalid(
                    token,
                    format!("unexpected '{}' after field {}", c, count + 1),
                ))
            }
        };
        count += 1;
    }

    if count == 0 {
        return Err(invalid(token, "expected one to three sexagesimal fields"));
    }

    let [whole, minutes, seconds] = fields;
    if minutes >= 60.0 {
        return Err(CoordError::OutOfRange {
            component: "minutes",
            value: minutes,
            range: "[0, 60)",
        });
    }
    if seconds >= 60.0 {
        return Err(CoordError::OutOfRange {
            component: "seconds",
            value: seconds,
            range: "[0, 60)",
        });
    }

    Ok((negative, whole + minutes / 60.0 + seconds / 3600.0))
}
