//! Nominatim / OpenStreetMap lookup client.
//!
//! Used when a place name misses the local gazetteer. Nominatim has strict
//! rate limits (1 request per second on the public instance); the resolver
//! only issues one lookup per user action, which stays well inside them.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use route_alert_models::GeoPoint;

use crate::GeocodeError;

/// Looks up a free-form query and returns the best-match coordinate.
///
/// The query should already carry the region qualifier; only the first
/// result is requested.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    timeout: Duration,
) -> Result<Option<GeoPoint>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("countrycodes", "in"),
            ("format", "jsonv2"),
            ("limit", "1"),
        ])
        .timeout(timeout)
        .send()
        .await?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a Nominatim JSON response into the first result's coordinate.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeoPoint>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let latitude = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let longitude = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    GeoPoint::new(latitude, longitude).map(Some).map_err(|err| {
        GeocodeError::Parse {
            message: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "13.0474",
            "lon": "80.2088",
            "display_name": "Koyambedu, Chennai, Tamil Nadu, India"
        }]);
        let point = parse_response(&body).unwrap().unwrap();
        assert!((point.latitude - 13.0474).abs() < 1e-4);
        assert!((point.longitude - 80.2088).abs() < 1e-4);
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_response() {
        let body = serde_json::json!({"error": "rate limited"});
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_result() {
        let body = serde_json::json!([{"lat": "113.0", "lon": "80.0"}]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
