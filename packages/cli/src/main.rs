#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI orchestrator for the route alert toolchain.
//!
//! Wires the incident store, geocoder, directions provider, and analytics
//! together: list or report incidents, compute hotspot clusters, and check
//! candidate routes for nearby incidents. The interactive map frontend
//! lives elsewhere; this binary is the scriptable surface over the same
//! core.
//!
//! The incident data file must exist before any command runs; everything
//! else (unresolvable place names, provider outages, duplicate reports)
//! degrades without aborting.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use route_alert_analytics::{cluster_points, evaluate_route, summarize_clusters};
use route_alert_geocoder::{Geocoder, Resolution, ResolutionSource};
use route_alert_models::{GeoPoint, Incident};
use route_alert_routing::RouteProvider;
use route_alert_store::IncidentStore;

#[derive(Parser)]
#[command(name = "route-alert", about = "Crime hotspot and route hazard toolkit")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "route-alert.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored incidents
    Incidents,
    /// Report a new incident and persist it
    Report {
        /// Crime type label (e.g. "Theft")
        #[arg(long)]
        crime_type: String,
        /// Coordinates as "lat, lon"
        #[arg(long)]
        coords: String,
        /// Area name (e.g. "Tambaram")
        #[arg(long)]
        location: Option<String>,
        /// Report date (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Time of day (e.g. "10:30 PM")
        #[arg(long)]
        time: Option<String>,
        /// Victim gender
        #[arg(long)]
        victim_gender: Option<String>,
    },
    /// Partition incidents into spatial hotspot clusters
    Hotspots {
        /// Number of clusters
        #[arg(long, default_value_t = 4)]
        k: usize,
    },
    /// Fetch routes between two places and flag hazards on the primary
    Route {
        /// Start place name (e.g. "Guindy")
        #[arg(long)]
        from: String,
        /// Destination place name (e.g. "Avadi")
        #[arg(long)]
        to: String,
        /// Danger threshold in coordinate degrees (default from config)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = config::load(&cli.config)?;

    // A missing or malformed data file halts before any core logic runs.
    let mut store = IncidentStore::load(&config.data_file)?;

    match cli.command {
        Commands::Incidents => list_incidents(&store),
        Commands::Report {
            crime_type,
            coords,
            location,
            date,
            time,
            victim_gender,
        } => {
            report_incident(
                &mut store,
                &crime_type,
                &coords,
                location,
                date,
                time,
                victim_gender,
            )?;
        }
        Commands::Hotspots { k } => show_hotspots(&store, k),
        Commands::Route {
            from,
            to,
            threshold,
        } => {
            find_route(
                &store,
                &config,
                &from,
                &to,
                threshold.unwrap_or(config.danger_threshold),
            )
            .await?;
        }
    }

    Ok(())
}

fn list_incidents(store: &IncidentStore) {
    println!(
        "{:<12} {:<20} {:<10} {:<10} CRIME",
        "DATE", "LOCATION", "LAT", "LON"
    );
    println!("{}", "-".repeat(70));
    for incident in store.incidents() {
        println!(
            "{:<12} {:<20} {:<10.4} {:<10.4} {}",
            incident.date.as_deref().unwrap_or("-"),
            incident.location.as_deref().unwrap_or("-"),
            incident.latitude,
            incident.longitude,
            incident.crime_type,
        );
    }
    println!(
        "{} incident(s), {} crime type(s)",
        store.len(),
        store.crime_types().len()
    );
}

fn report_incident(
    store: &mut IncidentStore,
    crime_type: &str,
    coords: &str,
    location: Option<String>,
    date: Option<String>,
    time: Option<String>,
    victim_gender: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // A malformed submission is rejected without touching stored data.
    let point: GeoPoint = match coords.parse() {
        Ok(point) => point,
        Err(err) => {
            log::error!("Invalid coordinates '{coords}': {err}");
            return Ok(());
        }
    };

    let incident = Incident {
        date: Some(date.unwrap_or_else(|| chrono::Local::now().date_naive().to_string())),
        time_of_day: time,
        crime_type: crime_type.to_string(),
        location,
        latitude: point.latitude,
        longitude: point.longitude,
        victim_gender,
    };

    if store.append(incident)? {
        println!("Crime reported and saved to {}.", store.path().display());
    } else {
        println!("An identical report already exists; nothing saved.");
    }
    Ok(())
}

fn show_hotspots(store: &IncidentStore, k: usize) {
    let points: Vec<GeoPoint> = store
        .incidents()
        .iter()
        .map(Incident::coordinate)
        .collect();
    let assignments = cluster_points(&points, k);
    let summaries = summarize_clusters(&points, &assignments);

    if points.len() < k {
        println!(
            "Only {} incident(s) for {k} clusters; grouped as one.",
            points.len()
        );
    }
    for summary in summaries {
        println!(
            "Cluster {}: {} incident(s) around ({:.4}, {:.4})",
            summary.id, summary.count, summary.center.latitude, summary.center.longitude,
        );
    }
}

async fn find_route(
    store: &IncidentStore,
    config: &config::Config,
    from: &str,
    to: &str,
    threshold: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let fallback = GeoPoint::new(
        config.geocoder.fallback_latitude,
        config.geocoder.fallback_longitude,
    )?;
    let geocoder = Geocoder::new(
        config.geocoder.base_url.clone(),
        config.geocoder.region_suffix.clone(),
        fallback,
    );

    let start = match geocoder.resolve(from).await {
        Ok(resolution) => resolution,
        Err(err) => {
            log::error!("Start place rejected: {err}");
            return Ok(());
        }
    };
    let end = match geocoder.resolve(to).await {
        Ok(resolution) => resolution,
        Err(err) => {
            log::error!("Destination rejected: {err}");
            return Ok(());
        }
    };
    describe_endpoint("Start", from, &start);
    describe_endpoint("Destination", to, &end);

    let api_key = std::env::var(&config.directions.api_key_env).map_err(|_| {
        format!(
            "directions API key not set; export {}",
            config.directions.api_key_env
        )
    })?;
    let provider = RouteProvider::new(config.directions.base_url.clone(), api_key);

    let routes = match provider.alternate_routes(start.point, end.point).await {
        Ok(routes) => routes,
        Err(err) => {
            log::error!("Directions request failed: {err}");
            Vec::new()
        }
    };
    if routes.is_empty() {
        println!("No routes found.");
        return Ok(());
    }

    // Only the primary and first alternate are ever shown.
    for (index, route) in routes.iter().take(2).enumerate() {
        println!(
            "Route {}: {:.1} km, {:.0} min ({} points)",
            index + 1,
            route.summary.distance_km(),
            route.summary.duration_minutes(),
            route.points.len(),
        );
    }

    let verdict = evaluate_route(&routes[0].points, store.incidents(), threshold);
    if let Some(incident) = verdict.incident {
        let area = incident
            .location
            .as_deref()
            .map_or_else(String::new, |area| format!(" in {area}"));
        println!(
            "Warning: primary route passes near a reported {} at ({:.4}, {:.4}){area}",
            incident.crime_type, incident.latitude, incident.longitude,
        );
    } else {
        println!("Primary route is clear at threshold {threshold} degrees.");
    }
    Ok(())
}

fn describe_endpoint(label: &str, name: &str, resolution: &Resolution) {
    let via = match resolution.source {
        ResolutionSource::Gazetteer => "known area",
        ResolutionSource::Lookup => "looked up",
        ResolutionSource::Fallback => "not found, using region center",
    };
    println!(
        "{label}: {name} -> ({:.4}, {:.4}) [{via}]",
        resolution.point.latitude, resolution.point.longitude,
    );
}
