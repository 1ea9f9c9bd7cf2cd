//! Route hazard detection against the incident set.

use route_alert_models::{GeoPoint, Incident};
use serde::Serialize;

/// Default danger threshold in raw coordinate degrees.
///
/// Roughly low single-digit kilometers at Chennai's latitude. Existing
/// deployments tuned their thresholds against this unit, so it must stay
/// in degrees rather than meters.
pub const DEFAULT_DANGER_THRESHOLD_DEG: f64 = 0.02;

/// Outcome of evaluating one route against the incident set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardVerdict {
    /// Whether any route point came within the threshold of an incident.
    pub is_dangerous: bool,
    /// The incident that triggered the flag, if any.
    ///
    /// This is the first qualifying incident in set order, not necessarily
    /// the globally nearest one.
    pub incident: Option<Incident>,
}

impl HazardVerdict {
    const fn safe() -> Self {
        Self {
            is_dangerous: false,
            incident: None,
        }
    }
}

/// Tests every route point against every incident and returns on the first
/// pair closer than `threshold` (strict comparison).
///
/// The scan is incident-major, then point-minor; the early exit keeps the
/// common safe-route case cheap, and the reported incident is a witness
/// rather than the nearest match. Callers relying on the flagged incident
/// must not assume minimality.
///
/// O(incidents × `route_points`); fine at the hundreds-by-tens scale this
/// system operates on.
#[must_use]
pub fn evaluate_route(
    route_points: &[GeoPoint],
    incidents: &[Incident],
    threshold: f64,
) -> HazardVerdict {
    for incident in incidents {
        let incident_point = incident.coordinate();
        for point in route_points {
            if point.planar_distance(&incident_point) < threshold {
                log::debug!(
                    "Route point ({}, {}) within {threshold} of {} at ({}, {})",
                    point.latitude,
                    point.longitude,
                    incident.crime_type,
                    incident.latitude,
                    incident.longitude
                );
                return HazardVerdict {
                    is_dangerous: true,
                    incident: Some(incident.clone()),
                };
            }
        }
    }
    HazardVerdict::safe()
}
