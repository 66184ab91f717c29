//! # Coordinate Conversion
//!
//! Latitude handling for the shading calculator: degrees/minutes/seconds
//! (DMS) to decimal degrees and back, plus parsing of pasted `"lat, lon"`
//! pairs (the format map services copy to the clipboard).
//!
//! ## Sign convention
//!
//! The sign lives on the degrees field and applies to the whole value.
//! A latitude between 0° and -1° therefore cannot be written in DMS form
//! (`-0` is not an integer); such values convert with a positive sign.
//!
//! ```rust
//! use calc_core::geo::{parse_coordinates, Dms};
//!
//! let coords = parse_coordinates("38.7223, -9.1393").unwrap();
//! let dms = Dms::from_decimal(coords.latitude);
//! assert_eq!(dms, Dms { degrees: 38, minutes: 43, seconds: 20 });
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Angle as whole degrees, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dms {
    /// Signed degrees; the sign applies to the whole angle
    pub degrees: i32,
    /// Minutes (0-59)
    pub minutes: u32,
    /// Seconds (0-59)
    pub seconds: u32,
}

impl Dms {
    pub fn new(degrees: i32, minutes: u32, seconds: u32) -> Self {
        Dms {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Decimal degrees. Zero degrees counts as positive.
    ///
    /// ```rust
    /// use calc_core::geo::Dms;
    ///
    /// assert!((Dms::new(-38, 30, 0).to_decimal() + 38.5).abs() < 1e-12);
    /// ```
    pub fn to_decimal(&self) -> f64 {
        let sign = if self.degrees < 0 { -1.0 } else { 1.0 };
        let magnitude = f64::from(self.degrees.unsigned_abs())
            + f64::from(self.minutes) / 60.0
            + f64::from(self.seconds) / 3600.0;
        sign * magnitude
    }

    /// Split decimal degrees into DMS.
    ///
    /// Degrees and minutes are floored from the absolute value and seconds are
    /// rounded. A rounded 60 s carries into the minutes (and 60 min into the
    /// degrees) so the fields always stay in range.
    pub fn from_decimal(decimal: f64) -> Self {
        let abs = decimal.abs();
        let mut degrees = abs.floor() as i32;
        let minutes_f = (abs - abs.floor()) * 60.0;
        let mut minutes = minutes_f.floor() as u32;
        let mut seconds = ((minutes_f - minutes_f.floor()) * 60.0).round() as u32;

        if seconds >= 60 {
            seconds -= 60;
            minutes += 1;
        }
        if minutes >= 60 {
            minutes -= 60;
            degrees += 1;
        }

        if decimal < 0.0 {
            degrees = -degrees;
        }
        Dms {
            degrees,
            minutes,
            seconds,
        }
    }
}

impl std::fmt::Display for Dms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}° {}' {}\"", self.degrees, self.minutes, self.seconds)
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Latitude as DMS, ready for the shading form
    pub fn latitude_dms(&self) -> Dms {
        Dms::from_decimal(self.latitude)
    }
}

/// Parse `"lat, lon"` text into coordinates.
///
/// Each number is an optional minus sign, digits, and an optional decimal
/// part; whitespace around the comma is ignored.
pub fn parse_coordinates(text: &str) -> CalcResult<Coordinates> {
    let malformed = || {
        CalcError::invalid_input(
            "coordinates",
            text,
            "Expected \"latitude, longitude\" in decimal degrees",
        )
    };

    let (lat_text, lon_text) = text.trim().split_once(',').ok_or_else(malformed)?;
    let latitude = parse_decimal(lat_text.trim()).ok_or_else(malformed)?;
    let longitude = parse_decimal(lon_text.trim()).ok_or_else(malformed)?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CalcError::invalid_input(
            "latitude",
            latitude.to_string(),
            "Latitude must be between -90 and 90",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CalcError::invalid_input(
            "longitude",
            longitude.to_string(),
            "Longitude must be between -180 and 180",
        ));
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// `-?\d+\.?\d*`
fn parse_decimal(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_to_decimal() {
        assert!((Dms::new(38, 43, 20).to_decimal() - 38.722_222).abs() < 1e-5);
        assert!((Dms::new(-23, 26, 24).to_decimal() + 23.44).abs() < 1e-9);
        assert_eq!(Dms::new(0, 30, 0).to_decimal(), 0.5);
    }

    #[test]
    fn test_dms_from_decimal() {
        assert_eq!(Dms::from_decimal(41.1579), Dms::new(41, 9, 28));
        assert_eq!(Dms::from_decimal(-9.1393), Dms::new(-9, 8, 21));
        assert_eq!(Dms::from_decimal(0.0), Dms::new(0, 0, 0));
    }

    #[test]
    fn test_dms_carry() {
        // 10.99999° rounds to 59' 60" before carrying
        assert_eq!(Dms::from_decimal(10.999_999), Dms::new(11, 0, 0));
        assert_eq!(Dms::from_decimal(-5.999_999_9), Dms::new(-6, 0, 0));
    }

    #[test]
    fn test_small_negative_loses_sign() {
        let dms = Dms::from_decimal(-0.5);
        assert_eq!(dms, Dms::new(0, 30, 0));
        assert_eq!(dms.to_decimal(), 0.5);
    }

    #[test]
    fn test_parse_coordinates() {
        let c = parse_coordinates("38.7223, -9.1393").unwrap();
        assert_eq!(c.latitude, 38.7223);
        assert_eq!(c.longitude, -9.1393);

        let c = parse_coordinates("  -33 ,151.2 ").unwrap();
        assert_eq!(c.latitude, -33.0);
        assert_eq!(c.latitude_dms(), Dms::new(-33, 0, 0));

        assert!(parse_coordinates("41.,8.").is_ok());
    }

    #[test]
    fn test_parse_coordinates_rejects_malformed() {
        for bad in ["", "38.7", "a, b", "38.7; -9.1", ".5, 1", "1e3, 2", "+1, 2", "1, 2, 3"] {
            let err = parse_coordinates(bad).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT", "{bad}");
        }
    }

    #[test]
    fn test_parse_coordinates_range() {
        let err = parse_coordinates("91, 0").unwrap_err();
        assert_eq!(err.field(), Some("latitude"));
        let err = parse_coordinates("0, -180.5").unwrap_err();
        assert_eq!(err.field(), Some("longitude"));
        assert!(parse_coordinates("-90, 180").is_ok());
    }
}
