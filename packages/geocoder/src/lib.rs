#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place-name resolution for the route alert system.
//!
//! Resolves free-text area names to coordinates using a three-step chain,
//! first match wins:
//!
//! 1. **Gazetteer** — a fixed, case-insensitive table of known Chennai
//!    localities. No network involved.
//! 2. **Nominatim / OpenStreetMap** — free-form search scoped to the
//!    service area by appending a region qualifier to the query, bounded
//!    by a 10-second timeout.
//! 3. **Fallback** — the Chennai city center. Lookup failures, timeouts,
//!    and empty results all land here; resolution never fails once a
//!    non-empty name is supplied.
//!
//! Callers that care whether a coordinate is exact or a degraded fallback
//! inspect [`Resolution::source`].

pub mod gazetteer;
pub mod nominatim;

use std::time::Duration;

use route_alert_models::GeoPoint;
use thiserror::Error;

/// The Chennai city center, used whenever a name cannot be resolved.
pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    latitude: 13.0827,
    longitude: 80.2707,
};

/// Region qualifier appended to every external lookup to disambiguate
/// same-named places elsewhere.
pub const DEFAULT_REGION_SUFFIX: &str = "Chennai, Tamil Nadu, India";

/// Public Nominatim search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Timeout for one external lookup.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The place name was empty or whitespace-only.
    #[error("no place name provided")]
    EmptyQuery,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// How a place name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Matched the local gazetteer; no network call was made.
    Gazetteer,
    /// Resolved by the external lookup service.
    Lookup,
    /// Lookup failed or returned nothing; the fixed center was used.
    Fallback,
}

/// A resolved place name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// The resolved coordinate.
    pub point: GeoPoint,
    /// Which step of the chain produced it.
    pub source: ResolutionSource,
}

/// Place-name resolver holding the HTTP client and lookup configuration.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    region_suffix: String,
    fallback: GeoPoint,
    timeout: Duration,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new(
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_REGION_SUFFIX.to_string(),
            FALLBACK_CENTER,
        )
    }
}

impl Geocoder {
    /// Creates a resolver against the given Nominatim endpoint.
    #[must_use]
    pub fn new(base_url: String, region_suffix: String, fallback: GeoPoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            region_suffix,
            fallback,
            timeout: LOOKUP_TIMEOUT,
        }
    }

    /// Resolves a free-text place name to a coordinate.
    ///
    /// Network failures, timeouts, and empty lookup results degrade to the
    /// fallback center with [`ResolutionSource::Fallback`]; they are never
    /// surfaced as errors.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::EmptyQuery`] if `place` is empty or
    /// whitespace-only. This is the only error path.
    pub async fn resolve(&self, place: &str) -> Result<Resolution, GeocodeError> {
        let query = place.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        if let Some(point) = gazetteer::lookup(query) {
            log::debug!("Gazetteer hit for '{query}'");
            return Ok(Resolution {
                point,
                source: ResolutionSource::Gazetteer,
            });
        }

        let scoped = format!("{query}, {}", self.region_suffix);
        match nominatim::search(&self.client, &self.base_url, &scoped, self.timeout).await {
            Ok(Some(point)) => {
                log::info!(
                    "Found '{query}' at ({:.4}, {:.4})",
                    point.latitude,
                    point.longitude
                );
                Ok(Resolution {
                    point,
                    source: ResolutionSource::Lookup,
                })
            }
            Ok(None) => {
                log::warn!("'{query}' not found, using region center");
                Ok(self.fallback_resolution())
            }
            Err(err) => {
                log::warn!("Lookup failed for '{query}' ({err}), using region center");
                Ok(self.fallback_resolution())
            }
        }
    }

    const fn fallback_resolution(&self) -> Resolution {
        Resolution {
            point: self.fallback,
            source: ResolutionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A resolver whose lookup endpoint is unreachable, so any attempted
    /// network call fails immediately.
    fn offline_geocoder() -> Geocoder {
        Geocoder::new(
            "http://127.0.0.1:1/search".to_string(),
            DEFAULT_REGION_SUFFIX.to_string(),
            FALLBACK_CENTER,
        )
    }

    #[tokio::test]
    async fn gazetteer_hit_skips_network() {
        let geocoder = offline_geocoder();

        for name in ["Guindy", "guindy", "  GUINDY  "] {
            let resolution = geocoder.resolve(name).await.unwrap();
            assert_eq!(resolution.source, ResolutionSource::Gazetteer);
            assert!((resolution.point.latitude - 13.0101).abs() < 1e-9);
            assert!((resolution.point.longitude - 80.2129).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let geocoder = offline_geocoder();
        assert!(matches!(
            geocoder.resolve("").await,
            Err(GeocodeError::EmptyQuery)
        ));
        assert!(matches!(
            geocoder.resolve("   ").await,
            Err(GeocodeError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn lookup_failure_degrades_to_fallback() {
        let geocoder = offline_geocoder();
        let resolution = geocoder.resolve("Nowhere In Particular").await.unwrap();
        assert_eq!(resolution.source, ResolutionSource::Fallback);
        assert_eq!(resolution.point, FALLBACK_CENTER);
    }
}
