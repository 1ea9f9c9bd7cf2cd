#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! OpenRouteService directions client.
//!
//! Requests a primary route plus alternates between two coordinates and
//! decodes each candidate's encoded polyline geometry into an ordered
//! point sequence. Provider ranking is preserved as-is; downstream
//! consumers conventionally use at most the first two candidates.
//!
//! A failed request surfaces as a [`RouteError`] for the caller to map to
//! an empty route list; a candidate whose geometry fails to decode is
//! skipped so the remaining candidates still come through.

pub mod polyline;

use std::time::Duration;

use route_alert_models::{GeoPoint, Route, RouteSummary};
use serde::Deserialize;
use thiserror::Error;

/// Public OpenRouteService driving directions endpoint.
pub const DEFAULT_DIRECTIONS_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car";

/// Timeout for one directions request.
pub const DIRECTIONS_TIMEOUT: Duration = Duration::from_secs(20);

/// Number of alternates requested alongside the primary route.
pub const ALTERNATE_TARGET_COUNT: u32 = 2;

/// How much overlap an alternate may share with the primary (provider
/// semantics).
const ALTERNATE_SHARE_FACTOR: f64 = 0.7;

/// How much worse than the primary an alternate may be (provider
/// semantics).
const ALTERNATE_WEIGHT_FACTOR: f64 = 2.0;

/// Errors from the directions provider.
#[derive(Debug, Error)]
pub enum RouteError {
    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("directions service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The response body was not the expected shape.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Wire shape of the directions response.
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteCandidate>,
}

/// One route candidate as returned by the provider.
#[derive(Debug, Deserialize)]
struct RouteCandidate {
    /// Encoded polyline geometry.
    geometry: String,
    #[serde(default)]
    summary: SummaryBody,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// Directions client holding the HTTP client and provider configuration.
pub struct RouteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RouteProvider {
    /// Creates a provider against the given directions endpoint.
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            timeout: DIRECTIONS_TIMEOUT,
        }
    }

    /// Fetches the primary route and up to [`ALTERNATE_TARGET_COUNT`]
    /// alternates between `start` and `end`, in provider ranking order.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] on network failure, timeout, a non-success
    /// response status, or an unparseable body. Callers treat any error as
    /// "no routes" rather than a crash.
    pub async fn alternate_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Vec<Route>, RouteError> {
        // ORS takes coordinates in (lon, lat) order.
        let body = serde_json::json!({
            "coordinates": [
                [start.longitude, start.latitude],
                [end.longitude, end.latitude],
            ],
            "alternative_routes": {
                "target_count": ALTERNATE_TARGET_COUNT,
                "share_factor": ALTERNATE_SHARE_FACTOR,
                "weight_factor": ALTERNATE_WEIGHT_FACTOR,
            },
        });

        let resp = self
            .client
            .post(&self.base_url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RouteError::Status {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let text = resp.text().await?;
        let response: DirectionsResponse =
            serde_json::from_str(&text).map_err(|err| RouteError::Parse {
                message: err.to_string(),
            })?;

        Ok(extract_routes(response))
    }
}

/// Decodes each candidate's geometry, preserving provider order.
///
/// A candidate whose polyline fails to decode is dropped with a warning
/// instead of aborting the whole extraction.
fn extract_routes(response: DirectionsResponse) -> Vec<Route> {
    let mut routes = Vec::with_capacity(response.routes.len());
    for (index, candidate) in response.routes.into_iter().enumerate() {
        match polyline::decode(&candidate.geometry) {
            Ok(points) => routes.push(Route {
                points,
                summary: RouteSummary {
                    distance: candidate.summary.distance,
                    duration: candidate.summary.duration,
                },
            }),
            Err(err) => {
                log::warn!("Skipping route candidate {index}: {err}");
            }
        }
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_routes_in_provider_order() {
        let response: DirectionsResponse = serde_json::from_str(
            r#"{
                "routes": [
                    {"geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@", "summary": {"distance": 12345.6, "duration": 1800.0}},
                    {"geometry": "_p~iF~ps|U", "summary": {"distance": 15000.0, "duration": 2100.0}}
                ]
            }"#,
        )
        .unwrap();

        let routes = extract_routes(response);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].points.len(), 3);
        assert!((routes[0].summary.distance - 12345.6).abs() < 1e-9);
        assert_eq!(routes[1].points.len(), 1);
        assert!((routes[1].summary.duration - 2100.0).abs() < 1e-9);
    }

    #[test]
    fn bad_geometry_does_not_abort_the_batch() {
        let response: DirectionsResponse = serde_json::from_str(
            r#"{
                "routes": [
                    {"geometry": "not a polyline!", "summary": {"distance": 1.0, "duration": 1.0}},
                    {"geometry": "_p~iF~ps|U", "summary": {"distance": 2.0, "duration": 2.0}}
                ]
            }"#,
        )
        .unwrap();

        let routes = extract_routes(response);
        assert_eq!(routes.len(), 1);
        assert!((routes[0].summary.distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_routes_field_means_no_candidates() {
        let response: DirectionsResponse = serde_json::from_str(r#"{"error": "quota"}"#).unwrap();
        assert!(extract_routes(response).is_empty());
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_error_not_a_panic() {
        let provider = RouteProvider::new(
            "http://127.0.0.1:1/v2/directions/driving-car".to_string(),
            "test-key".to_string(),
        );
        let start = GeoPoint {
            latitude: 13.0101,
            longitude: 80.2129,
        };
        let end = GeoPoint {
            latitude: 13.1143,
            longitude: 80.0958,
        };

        let result = provider.alternate_routes(start, end).await;
        assert!(matches!(result, Err(RouteError::Http(_))));
    }
}
