//! TOML configuration for the route alert CLI.
//!
//! Every knob has a default matching the public service endpoints and the
//! tuned analytics constants, so a missing config file is not an error —
//! the defaults simply apply.

use std::path::{Path, PathBuf};

use route_alert_analytics::DEFAULT_DANGER_THRESHOLD_DEG;
use serde::Deserialize;
use thiserror::Error;

/// Errors from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid TOML for this schema.
    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the incident CSV file.
    pub data_file: PathBuf,
    /// Danger threshold in raw coordinate degrees.
    pub danger_threshold: f64,
    /// Geocoder settings.
    pub geocoder: GeocoderConfig,
    /// Directions provider settings.
    pub directions: DirectionsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("crime.csv"),
            danger_threshold: DEFAULT_DANGER_THRESHOLD_DEG,
            geocoder: GeocoderConfig::default(),
            directions: DirectionsConfig::default(),
        }
    }
}

/// Geocoder settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim search endpoint.
    pub base_url: String,
    /// Region qualifier appended to every lookup query.
    pub region_suffix: String,
    /// Fallback latitude when a name cannot be resolved.
    pub fallback_latitude: f64,
    /// Fallback longitude when a name cannot be resolved.
    pub fallback_longitude: f64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: route_alert_geocoder::DEFAULT_BASE_URL.to_string(),
            region_suffix: route_alert_geocoder::DEFAULT_REGION_SUFFIX.to_string(),
            fallback_latitude: route_alert_geocoder::FALLBACK_CENTER.latitude,
            fallback_longitude: route_alert_geocoder::FALLBACK_CENTER.longitude,
        }
    }
}

/// Directions provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// Directions endpoint.
    pub base_url: String,
    /// Environment variable holding the provider API key.
    pub api_key_env: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: route_alert_routing::DEFAULT_DIRECTIONS_URL.to_string(),
            api_key_env: "ORS_API_KEY".to_string(),
        }
    }
}

/// Loads the configuration from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] only when the file exists but cannot be read or
/// parsed.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let config: Config = toml::from_str("data_file = \"reports.csv\"").unwrap();
        assert_eq!(config.data_file, PathBuf::from("reports.csv"));
        assert!((config.danger_threshold - DEFAULT_DANGER_THRESHOLD_DEG).abs() < 1e-12);
        assert_eq!(config.directions.api_key_env, "ORS_API_KEY");
    }

    #[test]
    fn nested_sections_override() {
        let config: Config = toml::from_str(
            "[geocoder]\n\
             region_suffix = \"Madurai, Tamil Nadu, India\"\n\
             [directions]\n\
             base_url = \"http://localhost:8082/ors/v2/directions/driving-car\"\n",
        )
        .unwrap();
        assert_eq!(config.geocoder.region_suffix, "Madurai, Tamil Nadu, India");
        assert!(config.directions.base_url.starts_with("http://localhost"));
        // Untouched nested fields keep their defaults.
        assert_eq!(
            config.geocoder.base_url,
            route_alert_geocoder::DEFAULT_BASE_URL
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("route_alert_cli_tests/absent.toml");
        let config = load(&path).unwrap();
        assert_eq!(config.data_file, PathBuf::from("crime.csv"));
    }
}
