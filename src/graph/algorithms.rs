//! Connected components and betweenness centrality

use std::collections::VecDeque;

use crate::graph::ProximityGraph;

/// Union-Find with path compression and union by rank.
pub struct DisjointSets {
    parent: Vec<u32>,
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create `size` singleton sets.
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Root of the set containing `x`, compressing the path on the way.
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`.
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        if self.rank[root_x as usize] >= self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }
}

/// One connected component: its member node indices and internal edge
/// count.
#[derive(Debug, Clone)]
pub struct Component {
    /// Member node indices, in ascending input order.
    pub members: Vec<u32>,

    /// Number of edges with both endpoints in this component.
    pub edge_count: usize,
}

/// Partition the graph into connected components, O(N + E).
///
/// Components are returned in order of their first member node, so the
/// result is deterministic for a fixed graph; isolated nodes come back as
/// singleton components. The union of all members is exactly the node set.
pub fn connected_components(graph: &ProximityGraph) -> Vec<Component> {
    let n = graph.node_count();
    let mut sets = DisjointSets::new(n);
    for edge in graph.edges() {
        sets.union(edge.a, edge.b);
    }

    // first_member[root] -> position in the output, assigned as nodes are
    // scanned in input order.
    let mut slot_of_root = vec![usize::MAX; n];
    let mut components: Vec<Component> = Vec::new();

    for node in 0..n as u32 {
        let root = sets.find(node) as usize;
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(Component {
                members: Vec::new(),
                edge_count: 0,
            });
        }
        components[slot_of_root[root]].members.push(node);
    }

    for edge in graph.edges() {
        let root = sets.find(edge.a) as usize;
        components[slot_of_root[root]].edge_count += 1;
    }

    components
}

/// Betweenness centrality for every node via Brandes' algorithm over
/// unweighted shortest paths, O(N * E).
///
/// The edge `weight` attribute is deliberately not used for path length;
/// scores are normalized by 1 / ((n - 1)(n - 2)) for n > 2, the standard
/// undirected normalization. Graphs with fewer than three nodes score
/// zero everywhere.
pub fn betweenness_centrality(graph: &ProximityGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0_f64; n];
    if n < 3 {
        return centrality;
    }

    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue = VecDeque::new();

    for source in 0..n {
        order.clear();
        for v in 0..n {
            predecessors[v].clear();
            sigma[v] = 0.0;
            dist[v] = -1;
            delta[v] = 0.0;
        }
        sigma[source] = 1.0;
        dist[source] = 0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in graph.neighbors(v) {
                let w = w as usize;
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Dependency accumulation in reverse BFS order.
        for &w in order.iter().rev() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    // Each unordered pair is counted from both endpoints in an undirected
    // traversal; the normalization folds that factor in.
    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for score in centrality.iter_mut() {
        *score *= scale;
    }

    centrality
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::IncidentNode;

    fn graph_with(n: usize, edges: &[(u32, u32)]) -> ProximityGraph {
        let mut graph = ProximityGraph::with_capacity(n);
        for i in 0..n {
            graph.add_node(IncidentNode {
                case_number: format!("N{i}"),
                date: chrono::NaiveDateTime::parse_from_str(
                    "2024-06-01 12:00:00",
                    "%Y-%m-%d %H:%M:%S",
                )
                .unwrap(),
                latitude: 41.88,
                longitude: -87.63,
                block: String::new(),
                description: String::new(),
                arrest: false,
            });
        }
        for &(a, b) in edges {
            graph.add_edge(a, b, 0.1, 0);
        }
        graph
    }

    #[test]
    fn empty_graph_has_no_components() {
        let graph = ProximityGraph::default();
        assert!(connected_components(&graph).is_empty());
        assert!(betweenness_centrality(&graph).is_empty());
    }

    #[test]
    fn components_partition_the_node_set() {
        let graph = graph_with(6, &[(0, 1), (1, 2), (4, 5)]);
        let components = connected_components(&graph);

        assert_eq!(components.len(), 3);
        assert_eq!(components[0].members, vec![0, 1, 2]);
        assert_eq!(components[0].edge_count, 2);
        assert_eq!(components[1].members, vec![3], "isolated node is a singleton");
        assert_eq!(components[2].members, vec![4, 5]);

        let mut all: Vec<u32> = components.iter().flat_map(|c| c.members.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn path_graph_centrality() {
        // Path 0 - 1 - 2: only the middle node lies on a shortest path;
        // its normalized betweenness is 1.0.
        let graph = graph_with(3, &[(0, 1), (1, 2)]);
        let scores = betweenness_centrality(&graph);

        assert!((scores[1] - 1.0).abs() < 1e-12);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn star_graph_center_dominates() {
        // Star with center 0 and four leaves: center sits on every
        // leaf-to-leaf shortest path, normalized score 1.0.
        let graph = graph_with(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let scores = betweenness_centrality(&graph);

        assert!((scores[0] - 1.0).abs() < 1e-12);
        for leaf in 1..5 {
            assert_eq!(scores[leaf], 0.0);
        }
    }

    #[test]
    fn disconnected_pair_scores_zero() {
        let graph = graph_with(3, &[(0, 1)]);
        let scores = betweenness_centrality(&graph);
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn scores_are_nonnegative_and_finite() {
        let graph = graph_with(
            7,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (4, 5), (5, 6)],
        );
        let scores = betweenness_centrality(&graph);
        for &s in &scores {
            assert!(s >= 0.0 && s.is_finite());
        }
        // Node 4 bridges the cycle and the tail, so it must outrank the
        // cycle corners 0 and 1.
        assert!(scores[4] > scores[0]);
        assert!(scores[4] > scores[1]);
    }
}
