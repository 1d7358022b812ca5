//! End-to-end scenario tests for the analysis pipeline

use chrono::NaiveDateTime;
use incident_network_analyzer::cluster::{detect_hotspots, NOISE};
use incident_network_analyzer::config::Config;
use incident_network_analyzer::data::Incident;
use incident_network_analyzer::graph::algorithms::{betweenness_centrality, connected_components};
use incident_network_analyzer::graph::builder::build_graph;
use incident_network_analyzer::report::build_payload;

fn incident(case: &str, date: &str, lat: f64, lon: f64) -> Incident {
    Incident {
        case_number: case.to_string(),
        date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
        latitude: lat,
        longitude: lon,
        primary_type: "ROBBERY".to_string(),
        description: "ARMED".to_string(),
        block: "001XX N STATE ST".to_string(),
        arrest: false,
        domestic: false,
    }
}

// Three incidents: A and B ~0.07 miles apart, C on another continent.
// Expect one edge (A, B), a size-2 component plus a singleton, degree 1
// for A and B, and zero betweenness everywhere.
#[test]
fn near_pair_and_remote_singleton() {
    let incidents = vec![
        incident("A", "2024-06-01 12:00:00", 0.0, 0.0),
        incident("B", "2024-06-01 15:00:00", 0.0, 0.001),
        incident("C", "2024-06-01 12:00:00", 50.0, 50.0),
    ];
    let cfg = Config::new(0.5, 3, 0.5, 5);

    let graph = build_graph(&incidents, &cfg).unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!((graph.edges()[0].a, graph.edges()[0].b), (0, 1));

    let components = connected_components(&graph);
    assert_eq!(components.len(), 2);
    assert_eq!(components[0].members, vec![0, 1]);
    assert_eq!(components[1].members, vec![2]);

    assert_eq!(graph.degree(0), 1);
    assert_eq!(graph.degree(1), 1);
    assert_eq!(graph.degree(2), 0);

    let scores = betweenness_centrality(&graph);
    assert!(scores.iter().all(|&s| s == 0.0));
}

// Five collinear incidents 0.1 miles apart on the same day: with eps 0.5
// and min_samples 3 they form one density cluster with no noise.
#[test]
fn collinear_incidents_cluster_without_noise() {
    let step_deg = 0.1 / 69.09;
    let incidents: Vec<Incident> = (0..5)
        .map(|i| {
            incident(
                &format!("L{i}"),
                "2024-06-01 12:00:00",
                41.80 + step_deg * i as f64,
                -87.63,
            )
        })
        .collect();
    let cfg = Config::new(0.5, 3, 0.5, 3);

    let analysis = detect_hotspots(&incidents, &cfg).unwrap();
    assert_eq!(analysis.clusters.len(), 1);
    assert_eq!(analysis.clusters[0].size, 5);
    assert!(analysis.labels.iter().all(|&l| l != NOISE));
}

#[test]
fn empty_category_degrades_everywhere() {
    let incidents = vec![incident("A", "2024-06-01 12:00:00", 41.88, -87.63)];
    let payload = build_payload(&incidents, "ARSON", &Config::default()).unwrap();

    assert_eq!(payload.network.nodes, 0);
    assert_eq!(payload.network.edges, 0);
    assert!(payload.network.components.is_empty());
    assert!(payload.network.centrality_top.is_empty());
    assert!(payload.hotspots.is_empty());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let incidents = vec![incident("A", "2024-06-01 12:00:00", 41.88, -87.63)];
    let bad = Config::new(0.5, -2, 0.5, 5);
    assert!(build_payload(&incidents, "ROBBERY", &bad).is_err());
    assert!(build_graph(&incidents, &bad).is_err());
    assert!(detect_hotspots(&incidents, &bad).is_err());
}

// The component partition must cover every node exactly once, and degrees
// must agree with the edge list.
#[test]
fn partition_and_degree_invariants() {
    let mut incidents = Vec::new();
    for i in 0..30 {
        incidents.push(incident(
            &format!("P{i}"),
            &format!("2024-06-{:02} 12:00:00", 1 + (i % 9)),
            41.80 + 0.004 * (i % 6) as f64,
            -87.70 + 0.004 * (i % 5) as f64,
        ));
    }
    let cfg = Config::new(0.35, 2, 0.5, 5);
    let graph = build_graph(&incidents, &cfg).unwrap();

    let components = connected_components(&graph);
    let mut seen = vec![false; graph.node_count()];
    for component in &components {
        for &m in &component.members {
            assert!(!seen[m as usize], "node {m} appears in two components");
            seen[m as usize] = true;
        }
    }
    assert!(seen.iter().all(|&s| s), "every node belongs to a component");

    let edge_total: usize = components.iter().map(|c| c.edge_count).sum();
    assert_eq!(edge_total, graph.edge_count());

    let mut degree_from_edges = vec![0usize; graph.node_count()];
    for edge in graph.edges() {
        degree_from_edges[edge.a as usize] += 1;
        degree_from_edges[edge.b as usize] += 1;
    }
    for idx in 0..graph.node_count() {
        assert_eq!(graph.degree(idx), degree_from_edges[idx]);
    }
}
