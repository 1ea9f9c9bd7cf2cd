#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared value types for the route alert system.
//!
//! Defines the coordinate, incident, and route primitives passed between
//! the incident store, geocoder, route provider, and analytics crates.
//! Coordinates are WGS84 degrees throughout; no projection is applied
//! anywhere in the system.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in WGS84 degrees.
///
/// Valid latitudes are in `[-90, 90]` and longitudes in `[-180, 180]`;
/// [`GeoPoint::new`] enforces the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point, validating the coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either component is out of
    /// range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(InvalidCoordinateError {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Planar Euclidean distance to `other` in raw degrees.
    ///
    /// Treats (latitude, longitude) as a flat 2-D space with no geodesic
    /// correction. Hazard thresholds are tuned against this unit, so it
    /// must stay in degrees.
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        dlat.hypot(dlon)
    }
}

/// Error returned when a coordinate pair violates the WGS84 ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// The offending latitude.
    pub latitude: f64,
    /// The offending longitude.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {}): latitude must be in [-90, 90] and longitude in [-180, 180]",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// Error returned when free-text coordinate input cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseGeoPointError {
    /// Input was not two comma-separated numbers.
    Malformed,
    /// Both components parsed but violate the coordinate ranges.
    OutOfRange(InvalidCoordinateError),
}

impl std::fmt::Display for ParseGeoPointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "expected coordinates as \"lat, lon\""),
            Self::OutOfRange(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseGeoPointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed => None,
            Self::OutOfRange(err) => Some(err),
        }
    }
}

impl FromStr for GeoPoint {
    type Err = ParseGeoPointError;

    /// Parses user-supplied `"lat, lon"` text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseGeoPointError::Malformed);
        };
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ParseGeoPointError::Malformed)?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| ParseGeoPointError::Malformed)?;
        Self::new(latitude, longitude).map_err(ParseGeoPointError::OutOfRange)
    }
}

/// One reported crime event.
///
/// Immutable once stored; the `(latitude, longitude, crime_type)` triple is
/// the identity key used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Report date as free text (ISO `YYYY-MM-DD` from the submission path).
    pub date: Option<String>,
    /// Time of day as free text (e.g. "10:30 PM").
    pub time_of_day: Option<String>,
    /// Crime type label.
    pub crime_type: String,
    /// Free-text area name (e.g. "Tambaram").
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Victim gender, if reported.
    pub victim_gender: Option<String>,
}

impl Incident {
    /// The incident's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Deduplication key over `(latitude, longitude, crime_type)`.
    ///
    /// Coordinates are compared bitwise, matching exact-value dedup on the
    /// stored rows.
    #[must_use]
    pub fn key(&self) -> IncidentKey {
        IncidentKey {
            latitude_bits: self.latitude.to_bits(),
            longitude_bits: self.longitude.to_bits(),
            crime_type: self.crime_type.clone(),
        }
    }
}

/// Identity key for an [`Incident`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncidentKey {
    /// Bit pattern of the latitude.
    pub latitude_bits: u64,
    /// Bit pattern of the longitude.
    pub longitude_bits: u64,
    /// Crime type label.
    pub crime_type: String,
}

/// Distance/duration totals reported by the directions provider.
///
/// Units are the provider's: meters and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total distance in meters.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
}

impl RouteSummary {
    /// Distance in kilometers.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    /// Duration in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> f64 {
        self.duration / 60.0
    }
}

/// One candidate route from the directions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Path points in travel order. Always at least two for a usable route.
    pub points: Vec<GeoPoint>,
    /// Provider-reported distance/duration totals.
    pub summary: RouteSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(13.0827, 80.2707).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.1, 80.0).is_err());
        assert!(GeoPoint::new(13.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 80.0).is_err());
    }

    #[test]
    fn parses_coordinate_text() {
        let point: GeoPoint = "13.0101, 80.2129".parse().unwrap();
        assert!((point.latitude - 13.0101).abs() < 1e-9);
        assert!((point.longitude - 80.2129).abs() < 1e-9);

        // Whitespace tolerated, third component not.
        assert!(" 12.9249 ,80.1275 ".parse::<GeoPoint>().is_ok());
        assert_eq!(
            "13.0, 80.0, 1.0".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Malformed)
        );
        assert_eq!(
            "13.0".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Malformed)
        );
        assert_eq!(
            "abc, def".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Malformed)
        );
        assert!(matches!(
            "95.0, 80.0".parse::<GeoPoint>(),
            Err(ParseGeoPointError::OutOfRange(_))
        ));
    }

    #[test]
    fn planar_distance_is_degrees() {
        let a = GeoPoint {
            latitude: 13.0,
            longitude: 80.0,
        };
        let b = GeoPoint {
            latitude: 13.0001,
            longitude: 80.0001,
        };
        let dist = a.planar_distance(&b);
        assert!((dist - 0.000_141_4).abs() < 1e-6);
    }

    #[test]
    fn incident_key_matches_on_triple() {
        let incident = Incident {
            date: Some("2024-05-01".to_string()),
            time_of_day: Some("10:30 PM".to_string()),
            crime_type: "Theft".to_string(),
            location: Some("Guindy".to_string()),
            latitude: 13.0101,
            longitude: 80.2129,
            victim_gender: None,
        };

        let mut same_spot = incident.clone();
        same_spot.date = Some("2024-06-02".to_string());
        same_spot.location = None;
        assert_eq!(incident.key(), same_spot.key());

        let mut other_type = incident.clone();
        other_type.crime_type = "Robbery".to_string();
        assert_ne!(incident.key(), other_type.key());

        let mut nudged = incident;
        nudged.latitude += 1e-9;
        assert_ne!(nudged.key(), same_spot.key());
    }
}
