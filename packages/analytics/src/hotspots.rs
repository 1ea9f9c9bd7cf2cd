//! K-means hotspot clustering of incident points.
//!
//! Plain Lloyd's algorithm over raw (latitude, longitude) with
//! deterministic farthest-point seeding, so identical input always yields
//! the identical assignment. Fewer points than clusters degrades to a
//! single cluster instead of failing.

use route_alert_models::GeoPoint;
use serde::Serialize;

/// Iteration cap for Lloyd's algorithm. Assignments at this point are
/// stable enough for hotspot display even if not fully converged.
const MAX_ITERATIONS: usize = 100;

/// Partitions `points` into `k` clusters, returning one cluster id in
/// `[0, k)` per input point, in input order.
///
/// When `k` is zero or exceeds the number of points, clustering is not
/// performed and every point is assigned cluster 0. The output is a full
/// reassignment on every call; it never merges with a prior one.
#[must_use]
pub fn cluster_points(points: &[GeoPoint], k: usize) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    if k <= 1 || points.len() < k {
        if points.len() < k {
            log::debug!(
                "Not enough points for {k} clusters ({} available), using one",
                points.len()
            );
        }
        return vec![0; points.len()];
    }

    let coords: Vec<[f64; 2]> = points
        .iter()
        .map(|point| [point.latitude, point.longitude])
        .collect();

    let mut centers = seed_centers(&coords, k);
    let mut assignments = vec![0usize; coords.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, coord) in coords.iter().enumerate() {
            let nearest = nearest_center(coord, &centers);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64, 0.0f64]; k];
        let mut counts = vec![0usize; k];
        for (coord, &cluster) in coords.iter().zip(&assignments) {
            sums[cluster][0] += coord[0];
            sums[cluster][1] += coord[1];
            counts[cluster] += 1;
        }
        for (center, (sum, count)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            if *count > 0 {
                #[allow(clippy::cast_precision_loss)]
                let divisor = *count as f64;
                *center = [sum[0] / divisor, sum[1] / divisor];
            }
        }
    }

    assignments
}

/// Farthest-point seeding: the first input point, then repeatedly the
/// point with the greatest distance to its nearest chosen center.
fn seed_centers(coords: &[[f64; 2]], k: usize) -> Vec<[f64; 2]> {
    let mut centers = Vec::with_capacity(k);
    centers.push(coords[0]);

    while centers.len() < k {
        let mut best_index = 0;
        let mut best_distance = -1.0f64;
        for (i, coord) in coords.iter().enumerate() {
            let nearest = centers
                .iter()
                .map(|center| squared_distance(coord, center))
                .fold(f64::INFINITY, f64::min);
            if nearest > best_distance {
                best_distance = nearest;
                best_index = i;
            }
        }
        centers.push(coords[best_index]);
    }

    centers
}

fn nearest_center(coord: &[f64; 2], centers: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let distance = squared_distance(coord, center);
        if distance < best_distance {
            best_distance = distance;
            best = j;
        }
    }
    best
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Size and centroid of one hotspot cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Cluster id in `[0, k)`.
    pub id: usize,
    /// Number of incidents assigned to the cluster.
    pub count: usize,
    /// Mean coordinate of the cluster's points.
    pub center: GeoPoint,
}

/// Summarizes a cluster assignment produced by [`cluster_points`].
///
/// Clusters are returned in id order; empty clusters are omitted.
#[must_use]
pub fn summarize_clusters(points: &[GeoPoint], assignments: &[usize]) -> Vec<ClusterSummary> {
    let k = assignments.iter().copied().max().map_or(0, |max| max + 1);
    let mut sums = vec![[0.0f64, 0.0f64]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments) {
        sums[cluster][0] += point.latitude;
        sums[cluster][1] += point.longitude;
        counts[cluster] += 1;
    }

    sums.iter()
        .zip(&counts)
        .enumerate()
        .filter(|&(_, (_, &count))| count > 0)
        .map(|(id, (sum, &count))| {
            #[allow(clippy::cast_precision_loss)]
            let divisor = count as f64;
            ClusterSummary {
                id,
                count,
                center: GeoPoint {
                    latitude: sum[0] / divisor,
                    longitude: sum[1] / divisor,
                },
            }
        })
        .collect()
}
