//! Coordinate normalization and formatting.
//!
//! Raw numbers scraped from provider pages do not say which one is latitude.
//! [`normalize`] decides by magnitude: the value with the larger absolute
//! value is taken as longitude. This holds across the provider's primary
//! operating region (East Asia, where longitudes exceed 100°) but is ambiguous
//! wherever both values have comparable magnitude, for example close to the
//! equator and the prime meridian. Known limitation; kept for compatibility.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Decimal places in the wire representation of a coordinate.
pub const COORD_PRECISION: usize = 6;

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*(?:,|%2C|%2c)\s*\+?(-?\d{1,3}(?:\.\d+)?)\s*$")
        .expect("valid regex")
});

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Normalizes two raw values and rejects the pair if it cannot be a
    /// position on Earth (non-finite, latitude beyond ±90 or longitude beyond
    /// ±180 after the magnitude swap).
    #[must_use]
    pub fn checked(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let coord = normalize(a, b);
        if coord.latitude.abs() > 90.0 || coord.longitude.abs() > 180.0 {
            return None;
        }
        Some(coord)
    }

    /// Parses a `"lat,lon"` string (also accepts a percent-encoded comma) and
    /// normalizes it.
    #[must_use]
    pub fn parse_pair(raw: &str) -> Option<Self> {
        let caps = PAIR_RE.captures(raw)?;
        let a = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let b = caps.get(2)?.as_str().parse::<f64>().ok()?;
        Self::checked(a, b)
    }

    /// The `"lat,lon"` wire form, both values fixed to [`COORD_PRECISION`] places.
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!(
            "{},{}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Orders two raw values into a coordinate using the magnitude heuristic.
///
/// The larger absolute value becomes the longitude. On a tie the input order
/// is kept (`a` is latitude).
#[must_use]
pub fn normalize(a: f64, b: f64) -> Coordinate {
    if a.abs() > b.abs() {
        Coordinate {
            latitude: b,
            longitude: a,
        }
    } else {
        Coordinate {
            latitude: a,
            longitude: b,
        }
    }
}

/// Formats a degree value with exactly [`COORD_PRECISION`] decimal places.
#[must_use]
pub fn format_degrees(value: f64) -> String {
    format!("{value:.prec$}", prec = COORD_PRECISION)
}

/// Returns `true` when the whole string is a bare coordinate pair.
///
/// Used to reject "place names" that are really just the numbers again.
#[must_use]
pub fn is_coordinate_shaped(raw: &str) -> bool {
    PAIR_RE.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_symmetric() {
        let forward = normalize(121.5, 25.1);
        let backward = normalize(25.1, 121.5);
        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            Coordinate {
                latitude: 25.1,
                longitude: 121.5
            }
        );
    }

    #[test]
    fn normalize_uses_absolute_magnitude() {
        let coord = normalize(-118.24, 34.05);
        assert!((coord.latitude - 34.05).abs() < f64::EPSILON);
        assert!((coord.longitude + 118.24).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_keeps_order_on_tie() {
        let coord = normalize(10.0, -10.0);
        assert!((coord.latitude - 10.0).abs() < f64::EPSILON);
        assert!((coord.longitude + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn format_pads_to_six_places() {
        assert_eq!(format_degrees(25.1), "25.100000");
        assert_eq!(format_degrees(-0.5), "-0.500000");
    }

    #[test]
    fn format_is_idempotent() {
        let once = format_degrees(25.1);
        let twice = format_degrees(once.parse::<f64>().unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn to_wire_joins_with_comma() {
        let coord = normalize(121.517_081, 25.047_925);
        assert_eq!(coord.to_wire(), "25.047925,121.517081");
        assert_eq!(coord.to_string(), "25.047925,121.517081");
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(Coordinate::checked(95.0, 200.0).is_none());
        assert!(Coordinate::checked(f64::NAN, 1.0).is_none());
        assert!(Coordinate::checked(25.0, 121.0).is_some());
    }

    #[test]
    fn parse_pair_accepts_plain_and_encoded_commas() {
        let plain = Coordinate::parse_pair("25.033,121.564").unwrap();
        let encoded = Coordinate::parse_pair("25.033%2C121.564").unwrap();
        let spaced = Coordinate::parse_pair(" 25.033, +121.564 ").unwrap();
        assert_eq!(plain, encoded);
        assert_eq!(plain, spaced);
        assert_eq!(plain.to_wire(), "25.033000,121.564000");
    }

    #[test]
    fn parse_pair_rejects_text() {
        assert!(Coordinate::parse_pair("Taipei 101").is_none());
        assert!(Coordinate::parse_pair("25.0,121.5,17z").is_none());
    }

    #[test]
    fn coordinate_shape_detection() {
        assert!(is_coordinate_shaped("25.047925,121.517081"));
        assert!(is_coordinate_shaped("-33.86,151.2"));
        assert!(!is_coordinate_shaped("Taipei Main Station"));
    }
}
