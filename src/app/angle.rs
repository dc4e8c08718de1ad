//! Angular quantities parsed from free text
//!
//! Search radii are given as strings such as `"1 degree"` or `"30 arcmin"`.
//! The batch interface expects the radius in arcminutes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CoordError, CoordResult};

/// A non-negative angle, stored in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    /// Creates an angle from degrees
    ///
    /// # Errors
    ///
    /// Returns `CoordError::InvalidAngle` for negative or non-finite values
    pub fn from_degrees(degrees: f64) -> CoordResult<Self> {
        if !degrees.is_finite() || degrees < 0.0 {
            return Err(CoordError::InvalidAngle {
                input: degrees.to_string(),
                reason: "angle must be a finite, non-negative number".to_string(),
            });
        }
        Ok(Self { degrees })
    }

    /// Creates an angle from arcminutes
    pub fn from_arcmin(arcmin: f64) -> CoordResult<Self> {
        Self::from_degrees(arcmin / 60.0)
    }

    /// Creates an angle from arcseconds
    pub fn from_arcsec(arcsec: f64) -> CoordResult<Self> {
        Self::from_degrees(arcsec / 3600.0)
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn arcminutes(&self) -> f64 {
        self.degrees * 60.0
    }

    pub fn arcseconds(&self) -> f64 {
        self.degrees * 3600.0
    }

    /// Formats the angle as the service expects it, e.g. `"60.0 arcmin"`
    pub fn to_arcmin_string(&self) -> String {
        format!("{} arcmin", format_quantity(self.arcminutes()))
    }
}

/// Prints integral values with one decimal so `60` reads as `60.0`
pub(crate) fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn to_degrees(value: f64, unit: &str) -> Option<f64> {
    let degrees = match unit.to_ascii_lowercase().as_str() {
        "deg" | "degree" | "degrees" | "d" | "°" => value,
        "arcmin" | "arcminute" | "arcminutes" | "amin" | "'" => value / 60.0,
        "arcsec" | "arcsecond" | "arcseconds" | "asec" | "\"" => value / 3600.0,
        "rad" | "radian" | "radians" => value.to_degrees(),
        _ => return None,
    };
    Some(degrees)
}

impl FromStr for Angle {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let split = input
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
            .unwrap_or(input.len());

        let (number, unit) = input.split_at(split);
        let unit = unit.trim();

        if unit.is_empty() {
            return Err(CoordError::InvalidAngle {
                input: input.to_string(),
                reason: "missing angular unit".to_string(),
            });
        }

        let value: f64 = number.parse().map_err(|_| CoordError::InvalidAngle {
            input: input.to_string(),
            reason: format!("'{}' is not a number", number),
        })?;

        let degrees = to_degrees(value, unit).ok_or_else(|| CoordError::UnknownUnit {
            unit: unit.to_string(),
        })?;

        Self::from_degrees(degrees).map_err(|_| CoordError::InvalidAngle {
            input: input.to_string(),
            reason: "angle must be a finite, non-negative number".to_string(),
        })
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deg", format_quantity(self.degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_degree_radius() {
        let angle: Angle = "1 degree".parse().unwrap();
        assert_eq!(angle.degrees(), 1.0);
        assert_eq!(angle.to_arcmin_string(), "60.0 arcmin");
    }

    #[test]
    fn test_parse_unit_variants() {
        // Test that abbreviations, plurals and missing whitespace are accepted
        assert_eq!("2deg".parse::<Angle>().unwrap().degrees(), 2.0);
        assert_eq!("30 arcmin".parse::<Angle>().unwrap().degrees(), 0.5);
        assert_eq!("3600 arcseconds".parse::<Angle>().unwrap().degrees(), 1.0);
        assert_eq!("90'".parse::<Angle>().unwrap().degrees(), 1.5);
        assert_eq!("361 Degrees".parse::<Angle>().unwrap().degrees(), 361.0);

        let rad: Angle = "3.141592653589793 rad".parse().unwrap();
        assert!((rad.degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_arcmin_formatting() {
        let angle = Angle::from_degrees(0.015625).unwrap();
        assert_eq!(angle.to_arcmin_string(), "0.9375 arcmin");
    }

    #[test]
    fn test_rejects_invalid_angles() {
        // A bare number has no unit and cannot be converted
        assert!(matches!(
            "1".parse::<Angle>(),
            Err(CoordError::InvalidAngle { .. })
        ));
        assert!(matches!(
            "1 parsec".parse::<Angle>(),
            Err(CoordError::UnknownUnit { .. })
        ));
        assert!(matches!(
            "-1 degree".parse::<Angle>(),
            Err(CoordError::InvalidAngle { .. })
        ));
        assert!("degree".parse::<Angle>().is_err());
        assert!(Angle::from_degrees(f64::NAN).is_err());
    }
}
