//! Vantage-point tree over the haversine metric
//!
//! A metric tree rather than a coordinate-axis tree: angular coordinates
//! wrap, so axis-aligned splits need special casing at the antimeridian,
//! while a vantage-point tree only needs the distance function and its
//! triangle inequality. Build is O(N log N) expected via median splits;
//! radius queries prune whole subtrees with the ball bounds.

use std::cmp::Ordering;

use crate::spatial::{haversine_miles, GeoPoint};

#[derive(Debug, Clone)]
struct VpNode {
    /// Index of the vantage point in the original input sequence.
    point_idx: usize,

    /// Median distance from the vantage point to the rest of its subtree.
    threshold: f64,

    /// Subtree of points with distance <= threshold.
    inside: Option<usize>,

    /// Subtree of points with distance > threshold.
    outside: Option<usize>,
}

/// Immutable spatial index over a fixed ordered sequence of points.
///
/// Built once per filtered incident subset and read-only afterwards, so
/// concurrent radius queries against one index are safe.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    points: Vec<GeoPoint>,
    nodes: Vec<VpNode>,
    root: Option<usize>,
}

impl SpatialIndex {
    /// Build an index over `points`. An empty input builds successfully
    /// and answers every query with an empty result.
    pub fn build(points: Vec<GeoPoint>) -> Self {
        let mut index = Self {
            nodes: Vec::with_capacity(points.len()),
            root: None,
            points,
        };

        let mut items: Vec<(usize, f64)> = (0..index.points.len()).map(|i| (i, 0.0)).collect();
        index.root = index.build_subtree(&mut items);
        index
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed point at `idx` (original input order).
    pub fn point(&self, idx: usize) -> GeoPoint {
        self.points[idx]
    }

    /// All indexed points within `radius_miles` of `center`, as
    /// `(original_index, distance_miles)` pairs sorted ascending by
    /// distance (index as tiebreak).
    pub fn query_radius(&self, center: GeoPoint, radius_miles: f64) -> Vec<(usize, f64)> {
        let mut hits = Vec::new();
        if let Some(root) = self.root {
            // Explicit stack: tree depth is O(log N) by construction, but
            // the traversal cost is the same either way and this never
            // competes with the call stack on large inputs.
            let mut pending = vec![root];
            while let Some(node_idx) = pending.pop() {
                let node = &self.nodes[node_idx];
                let dist = haversine_miles(center, self.points[node.point_idx]);

                if dist <= radius_miles {
                    hits.push((node.point_idx, dist));
                }
                if let Some(inside) = node.inside {
                    if dist - radius_miles <= node.threshold {
                        pending.push(inside);
                    }
                }
                if let Some(outside) = node.outside {
                    if dist + radius_miles >= node.threshold {
                        pending.push(outside);
                    }
                }
            }
        }

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        hits
    }

    /// Radius query centered on an already-indexed point.
    pub fn query_radius_of(&self, idx: usize, radius_miles: f64) -> Vec<(usize, f64)> {
        self.query_radius(self.points[idx], radius_miles)
    }

    /// Recursively build a subtree over `items`, where each entry is
    /// `(original_index, scratch_distance)`. The first entry becomes the
    /// vantage point; the rest are split at the median distance to it.
    fn build_subtree(&mut self, items: &mut [(usize, f64)]) -> Option<usize> {
        let (&mut (vantage, _), rest) = items.split_first_mut()?;
        let vantage_point = self.points[vantage];

        let node_idx = self.nodes.len();
        self.nodes.push(VpNode {
            point_idx: vantage,
            threshold: 0.0,
            inside: None,
            outside: None,
        });

        if rest.is_empty() {
            return Some(node_idx);
        }

        for item in rest.iter_mut() {
            item.1 = haversine_miles(vantage_point, self.points[item.0]);
        }

        // Positional median split keeps the tree balanced even when many
        // points share identical coordinates.
        let mid = (rest.len() - 1) / 2;
        rest.select_nth_unstable_by(mid, |a, b| {
            a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)
        });
        let threshold = rest[mid].1;

        let (inside_items, outside_items) = rest.split_at_mut(mid + 1);
        let inside = self.build_subtree(inside_items);
        let outside = self.build_subtree(outside_items);

        let node = &mut self.nodes[node_idx];
        node.threshold = threshold;
        node.inside = inside;
        node.outside = outside;

        Some(node_idx)
    }
}
