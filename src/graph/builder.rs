//! Proximity graph construction

use rayon::prelude::*;

use crate::config::Config;
use crate::data::{validate_records, Incident};
use crate::error::Result;
use crate::graph::{IncidentNode, ProximityGraph};
use crate::spatial::{GeoPoint, SpatialIndex};

/// Candidate gathering switches to rayon above this node count.
const PARALLEL_THRESHOLD: usize = 1000;

/// Build the spatiotemporal proximity graph over one category's incidents.
///
/// Every incident becomes a node; an edge connects incidents i and j when
/// their great-circle distance is within `spatial_radius_miles` *and*
/// their timestamps differ by at most `temporal_days` whole days. The
/// `j > i` rule guarantees each unordered pair is evaluated and
/// materialized at most once, with no self-loops.
///
/// Empty input yields a graph with zero nodes and zero edges.
pub fn build_graph(incidents: &[Incident], cfg: &Config) -> Result<ProximityGraph> {
    cfg.validate()?;
    validate_records(incidents)?;

    let mut graph = ProximityGraph::with_capacity(incidents.len());
    for inc in incidents {
        graph.add_node(IncidentNode {
            case_number: inc.case_number.clone(),
            date: inc.date,
            latitude: inc.latitude,
            longitude: inc.longitude,
            block: inc.block.clone(),
            description: inc.description.clone(),
            arrest: inc.arrest,
        });
    }

    if incidents.is_empty() {
        return Ok(graph);
    }

    let points: Vec<GeoPoint> = incidents
        .iter()
        .map(|inc| GeoPoint::from_degrees(inc.latitude, inc.longitude))
        .collect();
    let index = SpatialIndex::build(points);

    // Per-source candidate lists are gathered independently (the built
    // index is read-only), then replayed in source order so the edge list
    // is identical to the sequential construction.
    let gather = |i: usize| -> Vec<(usize, f64, i64)> {
        index
            .query_radius_of(i, cfg.spatial_radius_miles)
            .into_iter()
            .filter(|&(j, _)| j > i)
            .filter_map(|(j, dist)| {
                let day_diff = (incidents[i].date - incidents[j].date).abs().num_days();
                (day_diff <= cfg.temporal_days).then_some((j, dist, day_diff))
            })
            .collect()
    };

    let candidates: Vec<Vec<(usize, f64, i64)>> = if incidents.len() >= PARALLEL_THRESHOLD {
        (0..incidents.len()).into_par_iter().map(gather).collect()
    } else {
        (0..incidents.len()).map(gather).collect()
    };

    for (i, list) in candidates.into_iter().enumerate() {
        for (j, distance_miles, day_diff) in list {
            graph.add_edge(i as u32, j as u32, distance_miles, day_diff);
        }
    }

    log::info!(
        "Built proximity graph: {} nodes, {} edges (radius {} mi, window {} days)",
        graph.node_count(),
        graph.edge_count(),
        cfg.spatial_radius_miles,
        cfg.temporal_days
    );

    Ok(graph)
}
