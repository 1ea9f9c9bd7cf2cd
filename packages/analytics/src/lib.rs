#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial analytics over the incident set.
//!
//! Two independent operations, both pure functions over a snapshot of the
//! stored incidents:
//!
//! - [`hotspots`] partitions incident points into k spatial clusters;
//! - [`hazard`] tests a candidate route against the incident set and
//!   reports the first incident found within the danger threshold.
//!
//! Both operate on raw (latitude, longitude) degrees as a flat 2-D space.
//! The thresholds and cluster shapes in use were tuned against that unit,
//! so no geodesic correction is applied.

pub mod hazard;
pub mod hotspots;

pub use hazard::{DEFAULT_DANGER_THRESHOLD_DEG, HazardVerdict, evaluate_route};
pub use hotspots::{ClusterSummary, cluster_points, summarize_clusters};
