#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flat CSV incident store.
//!
//! Loads the incident table once at startup, normalizes header aliases
//! (`lat` -> `latitude`, `long`/`lon` -> `longitude`, `crime`/`type` ->
//! `crime_type`), and deduplicates rows on the `(latitude, longitude,
//! crime_type)` key. New reports are appended in memory and the whole file
//! is rewritten synchronously, so the store on disk always matches the
//! session.
//!
//! The store is the single source of truth for incidents. Analytics
//! consumers read the [`IncidentStore::incidents`] snapshot slice; nothing
//! mutates the collection while a snapshot is being read.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use route_alert_models::{GeoPoint, Incident, IncidentKey};
use thiserror::Error;

/// Canonical column order used when persisting the store.
pub const COLUMNS: [&str; 7] = [
    "date",
    "time_of_day",
    "crime_type",
    "location",
    "latitude",
    "longitude",
    "victim_gender",
];

/// Columns that must be present (after alias normalization) for a load to
/// succeed.
pub const REQUIRED_COLUMNS: [&str; 3] = ["latitude", "longitude", "crime_type"];

/// Errors from loading or persisting the incident store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The incident data file does not exist.
    #[error("incident data file not found: {}", .path.display())]
    MissingFile {
        /// The path that was checked.
        path: PathBuf,
    },

    /// Required columns could not be resolved from the header row.
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        /// Canonical names of the unresolvable columns.
        missing: Vec<String>,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory incident collection backed by a CSV file.
#[derive(Debug)]
pub struct IncidentStore {
    path: PathBuf,
    incidents: Vec<Incident>,
    keys: HashSet<IncidentKey>,
}

impl IncidentStore {
    /// Loads the store from `path`, normalizing headers and dropping
    /// duplicate rows (first occurrence wins).
    ///
    /// Rows whose coordinates cannot be parsed as in-range numbers are
    /// skipped with a warning rather than aborting the load.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingFile`] if the file does not exist and
    /// [`StoreError::MissingColumns`] if `latitude`, `longitude`, or
    /// `crime_type` cannot be resolved from the header. Both are fatal:
    /// no store is constructed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            return Err(StoreError::MissingFile { path });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let columns = resolve_columns(reader.headers()?)?;

        let mut incidents = Vec::new();
        let mut keys = HashSet::new();
        let mut duplicates: usize = 0;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let Some(incident) = parse_row(&record, &columns, row) else {
                continue;
            };
            if keys.insert(incident.key()) {
                incidents.push(incident);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::info!(
                "Dropped {duplicates} duplicate incident(s) on (latitude, longitude, crime_type)"
            );
        }
        log::info!(
            "Loaded {} incident(s) from {}",
            incidents.len(),
            path.display()
        );

        Ok(Self {
            path,
            incidents,
            keys,
        })
    }

    /// The snapshot of stored incidents, in load/append order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of stored incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the store holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// The backing CSV path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sorted, deduplicated crime type labels present in the store.
    #[must_use]
    pub fn crime_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .incidents
            .iter()
            .map(|incident| incident.crime_type.clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    /// Appends a new incident and synchronously rewrites the backing file.
    ///
    /// Returns `Ok(false)` without touching the store or the file when the
    /// incident collides with an existing `(latitude, longitude,
    /// crime_type)` key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the rewrite fails; the in-memory append is
    /// rolled back so the store stays consistent with the file.
    pub fn append(&mut self, incident: Incident) -> Result<bool, StoreError> {
        let key = incident.key();
        if self.keys.contains(&key) {
            log::warn!(
                "Rejected duplicate incident report: {} at ({}, {})",
                incident.crime_type,
                incident.latitude,
                incident.longitude
            );
            return Ok(false);
        }

        self.incidents.push(incident);
        if let Err(err) = self.persist() {
            self.incidents.pop();
            return Err(err);
        }
        self.keys.insert(key);
        Ok(true)
    }

    /// Rewrites the whole CSV in canonical column order.
    fn persist(&self) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for incident in &self.incidents {
            let latitude = incident.latitude.to_string();
            let longitude = incident.longitude.to_string();
            writer.write_record([
                incident.date.as_deref().unwrap_or(""),
                incident.time_of_day.as_deref().unwrap_or(""),
                incident.crime_type.as_str(),
                incident.location.as_deref().unwrap_or(""),
                latitude.as_str(),
                longitude.as_str(),
                incident.victim_gender.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Maps canonical column names to their index in the header row.
///
/// Headers are lowercased and alias-normalized; the first occurrence of a
/// canonical name wins.
fn resolve_columns(headers: &csv::StringRecord) -> Result<BTreeMap<String, usize>, StoreError> {
    let mut columns = BTreeMap::new();
    for (index, raw) in headers.iter().enumerate() {
        let name = canonical_column(raw);
        columns.entry(name).or_insert(index);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect();
    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(StoreError::MissingColumns { missing })
    }
}

/// Normalizes a raw header cell to its canonical column name.
fn canonical_column(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    match name.as_str() {
        "lat" => "latitude".to_string(),
        "lon" | "long" => "longitude".to_string(),
        "crime" | "type" => "crime_type".to_string(),
        _ => name,
    }
}

/// Builds an [`Incident`] from one CSV record, or skips it with a warning
/// when the coordinates are unusable.
fn parse_row(
    record: &csv::StringRecord,
    columns: &BTreeMap<String, usize>,
    row: usize,
) -> Option<Incident> {
    let latitude = numeric_field(record, columns, "latitude");
    let longitude = numeric_field(record, columns, "longitude");
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        log::warn!("Skipping row {}: unparseable coordinates", row + 1);
        return None;
    };
    if GeoPoint::new(latitude, longitude).is_err() {
        log::warn!("Skipping row {}: coordinates out of range", row + 1);
        return None;
    }

    Some(Incident {
        date: text_field(record, columns, "date"),
        time_of_day: text_field(record, columns, "time_of_day"),
        crime_type: text_field(record, columns, "crime_type").unwrap_or_default(),
        location: text_field(record, columns, "location"),
        latitude,
        longitude,
        victim_gender: text_field(record, columns, "victim_gender"),
    })
}

fn text_field(
    record: &csv::StringRecord,
    columns: &BTreeMap<String, usize>,
    name: &str,
) -> Option<String> {
    let value = record.get(*columns.get(name)?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn numeric_field(
    record: &csv::StringRecord,
    columns: &BTreeMap<String, usize>,
    name: &str,
) -> Option<f64> {
    record
        .get(*columns.get(name)?)?
        .trim()
        .parse::<f64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("route_alert_store_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn sample_incident(crime_type: &str, latitude: f64, longitude: f64) -> Incident {
        Incident {
            date: Some("2024-05-01".to_string()),
            time_of_day: Some("10:30 PM".to_string()),
            crime_type: crime_type.to_string(),
            location: Some("Guindy".to_string()),
            latitude,
            longitude,
            victim_gender: Some("F".to_string()),
        }
    }

    #[test]
    fn normalizes_header_aliases() {
        let path = temp_csv(
            "aliases.csv",
            "Date, Time_Of_Day ,Type,Location,Lat,Long,Victim_Gender\n\
             2024-05-01,10:30 PM,Theft,Guindy,13.0101,80.2129,F\n",
        );
        let store = IncidentStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        let incident = &store.incidents()[0];
        assert_eq!(incident.crime_type, "Theft");
        assert!((incident.latitude - 13.0101).abs() < 1e-9);
        assert!((incident.longitude - 80.2129).abs() < 1e-9);
    }

    #[test]
    fn missing_required_columns_is_fatal() {
        let path = temp_csv(
            "missing.csv",
            "date,location,longitude,crime_type\n2024-05-01,Guindy,80.2129,Theft\n",
        );
        let err = IncidentStore::load(&path).unwrap_err();
        match err {
            StoreError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["latitude".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        let path = std::env::temp_dir().join("route_alert_store_tests/does_not_exist.csv");
        assert!(matches!(
            IncidentStore::load(&path),
            Err(StoreError::MissingFile { .. })
        ));
    }

    #[test]
    fn dedups_on_key_triple_at_load() {
        let path = temp_csv(
            "dupes.csv",
            "date,time_of_day,crime_type,location,latitude,longitude,victim_gender\n\
             2024-05-01,,Theft,Guindy,13.0101,80.2129,\n\
             2024-06-02,,Theft,Guindy,13.0101,80.2129,\n\
             2024-06-02,,Robbery,Guindy,13.0101,80.2129,\n",
        );
        let store = IncidentStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        // First occurrence wins.
        assert_eq!(store.incidents()[0].date.as_deref(), Some("2024-05-01"));
        assert_eq!(store.crime_types(), vec!["Robbery", "Theft"]);
    }

    #[test]
    fn skips_rows_with_bad_coordinates() {
        let path = temp_csv(
            "bad_coords.csv",
            "crime_type,latitude,longitude\n\
             Theft,not-a-number,80.2129\n\
             Theft,95.0,80.2129\n\
             Robbery,13.0101,80.2129\n",
        );
        let store = IncidentStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.incidents()[0].crime_type, "Robbery");
    }

    #[test]
    fn append_then_reload_round_trips() {
        let path = temp_csv(
            "append.csv",
            "date,time_of_day,crime_type,location,latitude,longitude,victim_gender\n\
             2024-05-01,,Theft,Guindy,13.0101,80.2129,\n",
        );
        let mut store = IncidentStore::load(&path).unwrap();

        let appended = store
            .append(sample_incident("Robbery", 12.9249, 80.1275))
            .unwrap();
        assert!(appended);
        assert_eq!(store.len(), 2);

        let reloaded = IncidentStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.incidents()[0].crime_type, "Theft");
        assert_eq!(reloaded.incidents()[1].crime_type, "Robbery");
        assert_eq!(reloaded.incidents()[1].date.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn append_rejects_duplicate_key() {
        let path = temp_csv(
            "append_dupe.csv",
            "date,time_of_day,crime_type,location,latitude,longitude,victim_gender\n\
             2024-05-01,,Theft,Guindy,13.0101,80.2129,\n",
        );
        let mut store = IncidentStore::load(&path).unwrap();

        let appended = store
            .append(sample_incident("Theft", 13.0101, 80.2129))
            .unwrap();
        assert!(!appended);
        assert_eq!(store.len(), 1);

        let reloaded = IncidentStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
    }
}
