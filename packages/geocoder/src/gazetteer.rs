//! Static gazetteer of known Chennai localities.
//!
//! Checked before any network geocoding call so the common areas resolve
//! instantly and identically on every run.

use route_alert_models::GeoPoint;

/// Known locality names (lowercase) and their coordinates.
const PLACES: [(&str, f64, f64); 7] = [
    ("guindy", 13.0101, 80.2129),
    ("avadi", 13.1143, 80.0958),
    ("tambaram", 12.9249, 80.1275),
    ("velachery", 12.9791, 80.2209),
    ("chromepet", 12.9514, 80.1414),
    ("tnagar", 13.0408, 80.2343),
    ("adyar", 13.0067, 80.2577),
];

/// Case-insensitive exact lookup of a locality name.
#[must_use]
pub fn lookup(name: &str) -> Option<GeoPoint> {
    let name = name.trim();
    PLACES
        .iter()
        .find(|(place, _, _)| place.eq_ignore_ascii_case(name))
        .map(|&(_, latitude, longitude)| GeoPoint {
            latitude,
            longitude,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let lower = lookup("tambaram").unwrap();
        let mixed = lookup("TaMbArAm").unwrap();
        assert_eq!(lower, mixed);
        assert!((lower.latitude - 12.9249).abs() < 1e-9);
    }

    #[test]
    fn unknown_names_miss() {
        assert!(lookup("Mylapore").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn all_entries_are_valid_coordinates() {
        for (place, latitude, longitude) in PLACES {
            assert!(
                GeoPoint::new(latitude, longitude).is_ok(),
                "bad gazetteer entry for {place}"
            );
        }
    }
}
