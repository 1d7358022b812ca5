//! Density-based hotspot clustering

pub mod dbscan;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{validate_records, Incident};
use crate::error::Result;
use crate::spatial::{GeoPoint, SpatialIndex};

/// Label for points not density-reachable from any core point.
pub const NOISE: i32 = -1;

/// Aggregate view of one density cluster, for the hotspot table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotCluster {
    /// Cluster id as assigned by the clusterer (>= 0; noise is excluded).
    pub cluster: i32,

    /// Number of member incidents.
    pub size: usize,

    /// Earliest member date (calendar date).
    pub date_min: String,

    /// Latest member date (calendar date).
    pub date_max: String,

    /// Arithmetic mean of member latitudes. A Euclidean mean of angular
    /// coordinates, acceptable only over small regional extents.
    pub lat_center: f64,

    /// Arithmetic mean of member longitudes (same caveat as latitude).
    pub lon_center: f64,
}

/// Result of one hotspot pass: per-incident labels plus the summary table.
#[derive(Debug, Clone)]
pub struct HotspotAnalysis {
    /// One label per input incident, in input order. `NOISE` for
    /// unclustered points.
    pub labels: Vec<i32>,

    /// Non-noise clusters, sorted by size descending (first-encountered
    /// label order on ties).
    pub clusters: Vec<HotspotCluster>,
}

/// Run density clustering over one category's incidents and summarize the
/// resulting hotspots.
///
/// An empty input yields empty labels and an empty cluster table.
pub fn detect_hotspots(incidents: &[Incident], cfg: &Config) -> Result<HotspotAnalysis> {
    cfg.validate()?;
    validate_records(incidents)?;

    if incidents.is_empty() {
        return Ok(HotspotAnalysis {
            labels: Vec::new(),
            clusters: Vec::new(),
        });
    }

    let points: Vec<GeoPoint> = incidents
        .iter()
        .map(|inc| GeoPoint::from_degrees(inc.latitude, inc.longitude))
        .collect();
    let index = SpatialIndex::build(points);

    let labels = dbscan::fit(&index, cfg.dbscan_eps_miles, cfg.dbscan_min_samples);
    let clusters = summarize_clusters(incidents, &labels);

    log::info!(
        "Density clustering: {} incidents, {} clusters, {} noise points",
        incidents.len(),
        clusters.len(),
        labels.iter().filter(|&&l| l == NOISE).count()
    );

    Ok(HotspotAnalysis { labels, clusters })
}

/// Aggregate size, date range, and centroid per non-noise label.
fn summarize_clusters(incidents: &[Incident], labels: &[i32]) -> Vec<HotspotCluster> {
    let cluster_count = labels.iter().copied().max().map_or(0, |m| (m + 1).max(0)) as usize;
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); cluster_count];
    for (i, &label) in labels.iter().enumerate() {
        if label >= 0 {
            members[label as usize].push(i);
        }
    }

    let mut clusters: Vec<HotspotCluster> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.is_empty())
        .map(|(cid, member_indices)| {
            let n = member_indices.len() as f64;
            let mut lat_sum = 0.0;
            let mut lon_sum = 0.0;
            let mut date_min = incidents[member_indices[0]].date;
            let mut date_max = date_min;
            for &i in member_indices {
                let inc = &incidents[i];
                lat_sum += inc.latitude;
                lon_sum += inc.longitude;
                date_min = date_min.min(inc.date);
                date_max = date_max.max(inc.date);
            }
            HotspotCluster {
                cluster: cid as i32,
                size: member_indices.len(),
                date_min: date_min.date().to_string(),
                date_max: date_max.date().to_string(),
                lat_center: lat_sum / n,
                lon_center: lon_sum / n,
            }
        })
        .collect();

    // Stable sort keeps first-encountered label order on equal sizes.
    clusters.sort_by(|a, b| b.size.cmp(&a.size));
    clusters
}
