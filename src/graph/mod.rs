//! Spatiotemporal proximity graph

pub mod algorithms;
pub mod builder;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One incident as a graph node, keyed by case number and carrying the
/// display attributes the ranking output needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentNode {
    /// Case identifier (unique within the graph).
    pub case_number: String,

    /// Incident timestamp.
    pub date: NaiveDateTime,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Block-level location string.
    pub block: String,

    /// Free-text description.
    pub description: String,

    /// Arrest flag.
    pub arrest: bool,
}

/// An undirected edge between two incidents that are close in both space
/// and time. Endpoints are stored with `a < b`; each unordered pair
/// appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityEdge {
    /// Lower endpoint (node index).
    pub a: u32,

    /// Higher endpoint (node index).
    pub b: u32,

    /// Great-circle distance between the endpoints, in miles.
    pub distance_miles: f64,

    /// Absolute whole-day difference between the endpoint timestamps.
    pub day_diff: i64,

    /// Edge weight: 1 / max(day_diff, 1), so same-day incidents weigh 1.
    pub weight: f64,
}

/// Undirected simple graph over one category's incidents.
///
/// Every filtered incident is a node whether or not it gains edges;
/// isolated nodes are valid size-1 components.
#[derive(Debug, Clone, Default)]
pub struct ProximityGraph {
    nodes: Vec<IncidentNode>,
    edges: Vec<ProximityEdge>,
    adjacency: Vec<Vec<u32>>,
}

impl ProximityGraph {
    /// Create an empty graph with reserved node capacity.
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::new(),
            adjacency: Vec::with_capacity(node_capacity),
        }
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, node: IncidentNode) -> u32 {
        let idx = self.nodes.len() as u32;
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected edge. Endpoints must be distinct existing nodes;
    /// the builder's `i < j` rule means each pair arrives at most once.
    pub fn add_edge(&mut self, a: u32, b: u32, distance_miles: f64, day_diff: i64) {
        debug_assert!(a != b, "self-loops are not allowed");
        let (a, b) = if a < b { (a, b) } else { (b, a) };

        self.edges.push(ProximityEdge {
            a,
            b,
            distance_miles,
            day_diff,
            weight: 1.0 / day_diff.max(1) as f64,
        });
        self.adjacency[a as usize].push(b);
        self.adjacency[b as usize].push(a);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The node at `idx`.
    pub fn node(&self, idx: usize) -> &IncidentNode {
        &self.nodes[idx]
    }

    /// All nodes in insertion (input) order.
    pub fn nodes(&self) -> &[IncidentNode] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[ProximityEdge] {
        &self.edges
    }

    /// Neighbor node indices of `idx`.
    pub fn neighbors(&self, idx: usize) -> &[u32] {
        &self.adjacency[idx]
    }

    /// Number of edges incident to `idx`.
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// Mean degree, zero for an empty graph.
    pub fn avg_degree(&self) -> f64 {
        if self.nodes.is_empty() {
            0.0
        } else {
            2.0 * self.edges.len() as f64 / self.nodes.len() as f64
        }
    }
}
