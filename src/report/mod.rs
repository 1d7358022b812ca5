//! Summary, ranking, and payload assembly
//!
//! Pure slicing and sorting over the outputs of the clusterer and the
//! graph analyzer; no new algorithmic work happens here. Everything
//! produced is a plain structured record (primitives only, dates as
//! calendar-date strings) ready for serialization.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cluster::{self, HotspotCluster};
use crate::config::Config;
use crate::data::{filter_by_type, Incident};
use crate::error::Result;
use crate::graph::algorithms::{betweenness_centrality, connected_components};
use crate::graph::{builder, ProximityGraph};

/// Category counts reported in the overall summary.
const TOP_TYPES: usize = 7;

/// Largest components kept in the network payload.
const TOP_COMPONENTS: usize = 10;

/// Highest-betweenness nodes kept in the network payload.
const TOP_CENTRALITY: usize = 15;

/// Count for one category label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub primary_type: String,
    pub count: usize,
}

/// Dataset-wide statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallSummary {
    pub rows: usize,
    pub unique_primary_types: usize,
    pub date_min: Option<String>,
    pub date_max: Option<String>,
    pub arrest_rate: f64,
    pub domestic_rate: f64,
    pub top_primary_types: Vec<TypeCount>,
}

/// Count for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCount {
    /// Month key, `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// Count for one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowCount {
    pub day: String,
    pub count: usize,
}

/// Temporal slices of the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalProfile {
    /// Trailing 12 calendar months present in the data, ascending.
    pub monthly_tail: Vec<MonthCount>,

    /// Histogram over hours 0-23.
    pub hourly: Vec<usize>,

    /// Day-of-week counts, descending.
    pub dow: Vec<DowCount>,
}

/// Aggregate view of one connected component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub size: usize,
    pub edges: usize,
    pub date_min: String,
    pub date_max: String,
    /// Arithmetic mean of member latitudes (small-extent approximation).
    pub lat_center: f64,
    pub lon_center: f64,
    /// Fraction of members with the arrest flag set.
    pub arrest_rate: f64,
}

/// Degree and betweenness for one node, with its display attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralityRecord {
    pub case_number: String,
    pub degree: usize,
    pub betweenness: f64,
    pub block: String,
    pub date: String,
    pub description: String,
}

/// The network view for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub crime_type: String,
    pub nodes: usize,
    pub edges: usize,
    pub avg_degree: f64,
    /// Largest components, size descending, capped at ten.
    pub components: Vec<ComponentSummary>,
    /// Top nodes by betweenness descending, capped at fifteen.
    pub centrality_top: Vec<CentralityRecord>,
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub crime_type: String,
    pub summary: OverallSummary,
    pub temporal: TemporalProfile,
    pub hotspots: Vec<HotspotCluster>,
    pub network: NetworkAnalysis,
}

/// Dataset-wide statistics over the full (unfiltered) batch.
pub fn overall_summary(incidents: &[Incident]) -> OverallSummary {
    let rows = incidents.len();
    let unique_primary_types = incidents
        .iter()
        .map(|inc| inc.primary_type.as_str())
        .unique()
        .count();

    let date_min = incidents.iter().map(|inc| inc.date).min();
    let date_max = incidents.iter().map(|inc| inc.date).max();

    let mut top_primary_types: Vec<TypeCount> = incidents
        .iter()
        .map(|inc| inc.primary_type.as_str())
        .counts()
        .into_iter()
        .map(|(primary_type, count)| TypeCount {
            primary_type: primary_type.to_string(),
            count,
        })
        .collect();
    // Count descending, name ascending on ties, for a stable report.
    top_primary_types.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.primary_type.cmp(&b.primary_type))
    });
    top_primary_types.truncate(TOP_TYPES);

    OverallSummary {
        rows,
        unique_primary_types,
        date_min: date_min.map(|d| d.date().to_string()),
        date_max: date_max.map(|d| d.date().to_string()),
        arrest_rate: rate(incidents, |inc| inc.arrest),
        domestic_rate: rate(incidents, |inc| inc.domestic),
        top_primary_types,
    }
}

/// Temporal slices over the full batch.
pub fn temporal_profile(incidents: &[Incident]) -> TemporalProfile {
    use chrono::{Datelike, Timelike};

    let month_counts = incidents
        .iter()
        .map(|inc| inc.date.format("%Y-%m").to_string())
        .counts();
    let mut monthly_tail: Vec<MonthCount> = month_counts
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .sorted_by(|a, b| a.month.cmp(&b.month))
        .collect();
    if monthly_tail.len() > 12 {
        monthly_tail.drain(..monthly_tail.len() - 12);
    }

    let mut hourly = vec![0usize; 24];
    for inc in incidents {
        hourly[inc.date.hour() as usize] += 1;
    }

    let mut dow_counts = [0usize; 7];
    for inc in incidents {
        dow_counts[inc.date.weekday().num_days_from_monday() as usize] += 1;
    }
    let day_names = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    let dow: Vec<DowCount> = day_names
        .iter()
        .zip(dow_counts.iter())
        .map(|(&day, &count)| DowCount {
            day: day.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .collect();

    TemporalProfile {
        monthly_tail,
        hourly,
        dow,
    }
}

/// Aggregate every connected component of the graph, size descending
/// (stable, so equal sizes keep first-member order).
pub fn summarize_components(graph: &ProximityGraph) -> Vec<ComponentSummary> {
    let mut summaries: Vec<ComponentSummary> = connected_components(graph)
        .into_iter()
        .map(|component| {
            let n = component.members.len() as f64;
            let mut lat_sum = 0.0;
            let mut lon_sum = 0.0;
            let mut arrests = 0usize;
            let first = graph.node(component.members[0] as usize);
            let mut date_min = first.date;
            let mut date_max = first.date;

            for &idx in &component.members {
                let node = graph.node(idx as usize);
                lat_sum += node.latitude;
                lon_sum += node.longitude;
                arrests += node.arrest as usize;
                date_min = date_min.min(node.date);
                date_max = date_max.max(node.date);
            }

            ComponentSummary {
                size: component.members.len(),
                edges: component.edge_count,
                date_min: date_min.date().to_string(),
                date_max: date_max.date().to_string(),
                lat_center: lat_sum / n,
                lon_center: lon_sum / n,
                arrest_rate: arrests as f64 / n,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.size.cmp(&a.size));
    summaries
}

/// Per-node degree and betweenness, in node (input) order.
pub fn centrality_records(graph: &ProximityGraph) -> Vec<CentralityRecord> {
    let scores = betweenness_centrality(graph);
    graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| CentralityRecord {
            case_number: node.case_number.clone(),
            degree: graph.degree(idx),
            betweenness: scores[idx],
            block: node.block.clone(),
            date: node.date.date().to_string(),
            description: node.description.clone(),
        })
        .collect()
}

/// Run the full pipeline for one category and assemble the payload.
pub fn build_payload(
    incidents: &[Incident],
    crime_type: &str,
    cfg: &Config,
) -> Result<AnalysisPayload> {
    cfg.validate()?;

    let subset = filter_by_type(incidents, crime_type);
    log::info!(
        "Analyzing category {:?}: {} of {} incidents",
        crime_type,
        subset.len(),
        incidents.len()
    );

    let hotspot_analysis = cluster::detect_hotspots(&subset, cfg)?;
    let graph = builder::build_graph(&subset, cfg)?;

    let mut components = summarize_components(&graph);
    components.truncate(TOP_COMPONENTS);

    let mut centrality_top = centrality_records(&graph);
    // Stable sort: equal scores keep node input order.
    centrality_top.sort_by(|a, b| b.betweenness.total_cmp(&a.betweenness));
    centrality_top.truncate(TOP_CENTRALITY);

    Ok(AnalysisPayload {
        crime_type: crime_type.to_string(),
        summary: overall_summary(incidents),
        temporal: temporal_profile(incidents),
        hotspots: hotspot_analysis.clusters,
        network: NetworkAnalysis {
            crime_type: crime_type.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            avg_degree: graph.avg_degree(),
            components,
            centrality_top,
        },
    })
}

fn rate(incidents: &[Incident], flag: impl Fn(&Incident) -> bool) -> f64 {
    if incidents.is_empty() {
        return 0.0;
    }
    incidents.iter().filter(|&inc| flag(inc)).count() as f64 / incidents.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_incident;

    fn sample_batch() -> Vec<Incident> {
        // A, B, C sit on a meridian ~0.41 miles apart, so A-B and B-C are
        // within the default half-mile radius but A-C is not.
        let mut incidents = vec![
            test_incident("A", "2024-06-01 01:00:00", 41.8800, -87.6300),
            test_incident("B", "2024-06-01 13:00:00", 41.8860, -87.6300),
            test_incident("C", "2024-06-02 13:00:00", 41.8920, -87.6300),
            test_incident("D", "2024-06-20 08:00:00", 42.9000, -87.9000),
        ];
        incidents[0].arrest = true;
        incidents[3].primary_type = "THEFT".to_string();
        incidents[3].domestic = true;
        incidents
    }

    #[test]
    fn overall_summary_counts_and_rates() {
        let incidents = sample_batch();
        let summary = overall_summary(&incidents);

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.unique_primary_types, 2);
        assert_eq!(summary.date_min.as_deref(), Some("2024-06-01"));
        assert_eq!(summary.date_max.as_deref(), Some("2024-06-20"));
        assert!((summary.arrest_rate - 0.25).abs() < 1e-12);
        assert!((summary.domestic_rate - 0.25).abs() < 1e-12);
        assert_eq!(summary.top_primary_types[0].primary_type, "ROBBERY");
        assert_eq!(summary.top_primary_types[0].count, 3);
    }

    #[test]
    fn overall_summary_of_empty_batch_is_finite() {
        let summary = overall_summary(&[]);
        assert_eq!(summary.rows, 0);
        assert!(summary.date_min.is_none());
        assert_eq!(summary.arrest_rate, 0.0);
        assert!(summary.top_primary_types.is_empty());
    }

    #[test]
    fn temporal_profile_buckets() {
        let incidents = sample_batch();
        let temporal = temporal_profile(&incidents);

        assert_eq!(temporal.monthly_tail.len(), 1);
        assert_eq!(temporal.monthly_tail[0].month, "2024-06");
        assert_eq!(temporal.monthly_tail[0].count, 4);

        assert_eq!(temporal.hourly.len(), 24);
        assert_eq!(temporal.hourly[13], 2);
        assert_eq!(temporal.hourly[1], 1);
        assert_eq!(temporal.hourly.iter().sum::<usize>(), 4);

        assert_eq!(temporal.dow.iter().map(|d| d.count).sum::<usize>(), 4);
        assert!(temporal.dow[0].count >= temporal.dow[6].count);
    }

    #[test]
    fn monthly_tail_keeps_last_twelve_months() {
        let incidents: Vec<Incident> = (1..=14)
            .map(|m| {
                let year = 2023 + (m - 1) / 12;
                let month = (m - 1) % 12 + 1;
                test_incident(
                    &format!("M{m}"),
                    &format!("{year}-{month:02}-05 12:00:00"),
                    41.88,
                    -87.63,
                )
            })
            .collect();
        let temporal = temporal_profile(&incidents);

        assert_eq!(temporal.monthly_tail.len(), 12);
        assert_eq!(temporal.monthly_tail[0].month, "2023-03");
        assert_eq!(temporal.monthly_tail[11].month, "2024-02");
    }

    #[test]
    fn payload_for_scenario_batch() {
        // D is a different category; A-B and B-C connect within the
        // spatial radius and temporal window, chaining into one component
        // with B as the bridge.
        let incidents = sample_batch();
        let cfg = Config::default();
        let payload = build_payload(&incidents, "ROBBERY", &cfg).unwrap();

        assert_eq!(payload.network.nodes, 3);
        assert_eq!(payload.network.components[0].size, 3);
        assert_eq!(payload.network.centrality_top.len(), 3);
        // B bridges A and C.
        assert_eq!(payload.network.centrality_top[0].case_number, "B");
        assert!(payload.network.centrality_top[0].betweenness > 0.0);
        for record in &payload.network.centrality_top {
            assert!(record.betweenness >= 0.0);
        }
    }

    #[test]
    fn payload_for_unknown_category_is_empty_not_error() {
        let incidents = sample_batch();
        let payload = build_payload(&incidents, "HOMICIDE", &Config::default()).unwrap();

        assert_eq!(payload.network.nodes, 0);
        assert_eq!(payload.network.edges, 0);
        assert_eq!(payload.network.avg_degree, 0.0);
        assert!(payload.network.components.is_empty());
        assert!(payload.network.centrality_top.is_empty());
        assert!(payload.hotspots.is_empty());
        // The dataset-wide summary still covers the full batch.
        assert_eq!(payload.summary.rows, 4);
    }
}
