//! DBSCAN over a spatial index
//!
//! Density-based clustering (Ester et al., 1996) with the eps-neighborhood
//! oracle answered by the haversine spatial index instead of pairwise
//! scans. A point is core when its neighborhood, including itself, holds
//! at least `min_samples` points; clusters grow by iterative expansion
//! from core points; everything unreachable from a core point is noise.

use rayon::prelude::*;

use crate::cluster::NOISE;
use crate::spatial::SpatialIndex;

/// Never assigned yet. Internal only; `fit` returns no such label.
const UNCLASSIFIED: i32 = -2;

/// Neighborhood precompute switches to rayon above this point count.
const PARALLEL_THRESHOLD: usize = 1000;

/// Label every indexed point with a cluster id >= 0 or `NOISE`.
///
/// Points are visited in input order, which makes membership (and in fact
/// the exact id assignment) deterministic for a fixed input.
pub fn fit(index: &SpatialIndex, eps_miles: f64, min_samples: usize) -> Vec<i32> {
    let n = index.len();
    if n == 0 {
        return Vec::new();
    }

    // Radius queries are read-only against the built index, so the
    // precompute parallelizes without changing results.
    let neighborhoods: Vec<Vec<usize>> = if n >= PARALLEL_THRESHOLD {
        (0..n)
            .into_par_iter()
            .map(|i| neighborhood(index, i, eps_miles))
            .collect()
    } else {
        (0..n).map(|i| neighborhood(index, i, eps_miles)).collect()
    };

    let mut labels = vec![UNCLASSIFIED; n];
    let mut visited = vec![false; n];
    let mut cluster_id: i32 = 0;

    for point_idx in 0..n {
        if visited[point_idx] {
            continue;
        }
        visited[point_idx] = true;

        if neighborhoods[point_idx].len() < min_samples {
            // Not core; may still be absorbed as a border point later.
            labels[point_idx] = NOISE;
            continue;
        }

        expand_cluster(
            &neighborhoods,
            point_idx,
            &mut labels,
            cluster_id,
            &mut visited,
            min_samples,
        );
        cluster_id += 1;
    }

    labels
}

/// Indices within eps of point `i`, including `i` itself.
fn neighborhood(index: &SpatialIndex, i: usize, eps_miles: f64) -> Vec<usize> {
    index
        .query_radius_of(i, eps_miles)
        .into_iter()
        .map(|(idx, _)| idx)
        .collect()
}

/// Grow one cluster outward from a core point with a work queue.
fn expand_cluster(
    neighborhoods: &[Vec<usize>],
    core_idx: usize,
    labels: &mut [i32],
    cluster_id: i32,
    visited: &mut [bool],
    min_samples: usize,
) {
    labels[core_idx] = cluster_id;

    let mut to_process: Vec<usize> = neighborhoods[core_idx].clone();

    while let Some(neighbor_idx) = to_process.pop() {
        // Assign before the visited check: a point marked noise earlier
        // can still be promoted to a border point of this cluster.
        if labels[neighbor_idx] == UNCLASSIFIED || labels[neighbor_idx] == NOISE {
            labels[neighbor_idx] = cluster_id;
        }

        if visited[neighbor_idx] {
            continue;
        }
        visited[neighbor_idx] = true;

        // Core neighbors keep the expansion going. Promotion is gated on
        // label state, not on `visited`: a neighbor the main loop already
        // visited and marked noise never re-enters the queue, so it must
        // be claimed for this cluster right here.
        if neighborhoods[neighbor_idx].len() >= min_samples {
            for &nn in &neighborhoods[neighbor_idx] {
                if labels[nn] == UNCLASSIFIED || labels[nn] == NOISE {
                    labels[nn] = cluster_id;
                }
                if !visited[nn] {
                    to_process.push(nn);
                }
            }
        }
    }
}
