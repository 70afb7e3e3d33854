//! Single-source shortest paths.
//!
//! Unweighted graphs use a breadth-first level pass, O(V + E). Weighted
//! graphs use Bellman-Ford, O(V × E), which tolerates negative weights and
//! flags negative cycles reachable from the root. Distances accumulate in
//! `i128`, so sums of `i64` weights never wrap or clip.

use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, NodeId, Weight};

// Wide enough for any sum of `i64` weights a relaxation run can produce.
type Distance = i128;

/// Algorithm used to build a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Hop counts via one breadth-first pass. Ignores weights.
    BreadthFirst,
    /// Weighted relaxation with negative-cycle detection.
    BellmanFord,
}

/// Distance/predecessor snapshot from one root.
///
/// Arrays cover every storage slot the graph had at computation time. The
/// snapshot records the graph's generation; queries against a graph that
/// has since been mutated fail with [`GraphError::StalePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    root: NodeId,
    predecessors: Vec<Option<NodeId>>,
    distances: Vec<Option<Distance>>,
    algorithm: Algorithm,
    negative_cycle: bool,
    generation: u64,
}

impl Path {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Generation of the graph when this snapshot was computed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_negative_cycle(&self) -> bool {
        self.negative_cycle
    }

    /// Number of node slots covered by the snapshot.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Whether `node` was reached from the root, according to the snapshot.
    pub fn is_reachable(&self, node: NodeId) -> bool {
        matches!(self.distances.get(node), Some(Some(_)))
    }

    /// Shortest distance from the root to `node`. `Ok(None)` if unreachable,
    /// `DistanceOverflow` if the true distance does not fit in a [`Weight`].
    pub fn distance_to<T>(&self, graph: &Graph<T>, node: NodeId) -> GraphResult<Option<Weight>> {
        self.check(graph)?;
        match self.distances.get(node).copied().flatten() {
            Some(distance) => Weight::try_from(distance)
                .map(Some)
                .map_err(|_| GraphError::DistanceOverflow { root: self.root, node }),
            None => Ok(None),
        }
    }

    /// Node sequence root → … → `node`. `[root]` for the root itself,
    /// empty if `node` is unreachable.
    pub fn path_to<T>(&self, graph: &Graph<T>, node: NodeId) -> GraphResult<Vec<NodeId>> {
        self.check(graph)?;
        if !self.is_reachable(node) {
            return Ok(Vec::new());
        }

        let mut path = vec![node];
        let mut current = node;
        while current != self.root {
            match self.predecessors[current] {
                Some(prev) if prev != current && path.len() <= self.predecessors.len() => {
                    path.push(prev);
                    current = prev;
                }
                _ => return Ok(Vec::new()),
            }
        }

        path.reverse();
        Ok(path)
    }

    fn check<T>(&self, graph: &Graph<T>) -> GraphResult<()> {
        if graph.generation() != self.generation {
            warn!(
                root = self.root,
                computed = self.generation,
                current = graph.generation(),
                "stale shortest-path snapshot"
            );
            return Err(GraphError::StalePath {
                computed: self.generation,
                current: graph.generation(),
            });
        }
        if self.negative_cycle {
            return Err(GraphError::NegativeCycle { root: self.root });
        }
        Ok(())
    }
}

impl<T> Graph<T> {
    /// Shortest paths from `root`: Bellman-Ford once the graph is weighted,
    /// breadth-first levels otherwise.
    pub fn shortest_paths(&self, root: NodeId) -> GraphResult<Path> {
        let algorithm = if self.is_weighted() {
            Algorithm::BellmanFord
        } else {
            Algorithm::BreadthFirst
        };
        self.shortest_paths_with(root, algorithm)
    }

    /// Shortest paths from `root` with an explicit algorithm.
    pub fn shortest_paths_with(&self, root: NodeId, algorithm: Algorithm) -> GraphResult<Path> {
        self.ensure_live(root)?;
        debug!(root, ?algorithm, nodes = self.order(), "computing shortest paths");

        match algorithm {
            Algorithm::BreadthFirst => bfs_distance(self, root),
            Algorithm::BellmanFord => Ok(bellman_ford(self, root)),
        }
    }
}

/// Level every node reachable from `root` in one breadth-first pass.
fn bfs_distance<T>(graph: &Graph<T>, root: NodeId) -> GraphResult<Path> {
    let capacity = graph.capacity();
    let mut distances: Vec<Option<Distance>> = vec![None; capacity];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; capacity];
    distances[root] = Some(0);

    // The queue visits nodes in non-decreasing level, so the first
    // assignment to a node is its shortest hop count.
    for node in graph.bfs(root)? {
        let Some(level) = distances[node] else {
            continue;
        };
        for &child in graph.neighbors_out(node) {
            if distances[child].is_none() {
                distances[child] = Some(level + 1);
                predecessors[child] = Some(node);
            }
        }
    }

    Ok(Path {
        root,
        predecessors,
        distances,
        algorithm: Algorithm::BreadthFirst,
        negative_cycle: false,
        generation: graph.generation(),
    })
}

fn bellman_ford<T>(graph: &Graph<T>, root: NodeId) -> Path {
    let capacity = graph.capacity();
    let mut distances: Vec<Option<Distance>> = vec![None; capacity];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; capacity];
    distances[root] = Some(0);

    let passes = graph.order().saturating_sub(1);
    for pass in 0..passes {
        if !relax_all(graph, &mut distances, &mut predecessors) {
            debug!(root, pass, "bellman-ford converged early");
            break;
        }
    }

    let negative_cycle = graph
        .weighted_edges()
        .any(|(u, v, w)| relaxed(distances[u], distances[v], w).is_some());
    if negative_cycle {
        warn!(root, "negative cycle reachable from root");
    }

    Path {
        root,
        predecessors,
        distances,
        algorithm: Algorithm::BellmanFord,
        negative_cycle,
        generation: graph.generation(),
    }
}

/// One relaxation pass over every edge. Returns whether anything changed.
fn relax_all<T>(graph: &Graph<T>, distances: &mut [Option<Distance>], predecessors: &mut [Option<NodeId>]) -> bool {
    let mut changed = false;
    for (u, v, w) in graph.weighted_edges() {
        if let Some(candidate) = relaxed(distances[u], distances[v], w) {
            distances[v] = Some(candidate);
            predecessors[v] = Some(u);
            changed = true;
        }
    }
    changed
}

/// The improved distance for `v` through an edge of weight `w` from `u`, if
/// it beats the current one. Unreachable sources never relax anything.
///
/// Each pass extends a distance by at most `size()` edges and there are
/// fewer than `order()` passes, so magnitudes stay below
/// `order · size · 2^63`, far inside `i128`.
fn relaxed(from: Option<Distance>, to: Option<Distance>, w: Weight) -> Option<Distance> {
    let candidate = from? + Distance::from(w);
    match to {
        Some(current) if current <= candidate => None,
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UNIT_WEIGHT;

    fn graph_with(n: usize, edges: &[(NodeId, NodeId, Weight)]) -> Graph<usize> {
        let mut g = Graph::new();
        for i in 0..n {
            g.insert(i);
        }
        for &(u, v, w) in edges {
            g.add_weighted_edge(u, v, w).unwrap();
        }
        g
    }

    fn make_chain(n: usize) -> Graph<usize> {
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1, UNIT_WEIGHT)).collect();
        graph_with(n, &edges)
    }

    // --- Unweighted ---

    #[test]
    fn test_unweighted_uses_breadth_first() {
        let g = make_chain(6);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.algorithm(), Algorithm::BreadthFirst);
        assert_eq!(paths.distance_to(&g, 5).unwrap(), Some(5));
        assert_eq!(paths.path_to(&g, 5).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_direct_edge() {
        let g = make_chain(2);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.path_to(&g, 1).unwrap(), vec![0, 1]);
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(1));
    }

    #[test]
    fn test_path_to_root() {
        let g = make_chain(3);
        let paths = g.shortest_paths(1).unwrap();
        assert_eq!(paths.path_to(&g, 1).unwrap(), vec![1]);
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(0));
    }

    #[test]
    fn test_unreachable() {
        let g = make_chain(3);
        let paths = g.shortest_paths(1).unwrap();
        assert!(paths.path_to(&g, 0).unwrap().is_empty());
        assert_eq!(paths.distance_to(&g, 0).unwrap(), None);
        assert!(!paths.is_reachable(0));
        assert!(paths.path_to(&g, 999).unwrap().is_empty());
    }

    #[test]
    fn test_bfs_prefers_fewest_hops() {
        // 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3.
        let g = graph_with(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1)]);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.path_to(&g, 3).unwrap(), vec![0, 3]);
        assert_eq!(paths.distance_to(&g, 2).unwrap(), Some(2));
    }

    #[test]
    fn test_cycle_distances() {
        let edges: Vec<_> = (0..6).map(|i| (i, (i + 1) % 6, 1)).collect();
        let g = graph_with(6, &edges);
        let paths = g.shortest_paths(2).unwrap();
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(5));
        assert_eq!(paths.path_to(&g, 0).unwrap(), vec![2, 3, 4, 5, 0]);
    }

    #[test]
    fn test_snapshot_covers_capacity() {
        let mut g = make_chain(4);
        g.erase(3);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(!paths.is_reachable(3));
    }

    // --- Weighted ---

    #[test]
    fn test_weighted_end_to_end() {
        let mut g = Graph::new();
        let a = g.insert("A");
        let b = g.insert("B");
        let c = g.insert("C");
        let d = g.insert("D");
        g.add_weighted_edge(a, b, 1).unwrap();
        g.add_weighted_edge(b, c, 1).unwrap();
        g.add_weighted_edge(a, c, 4).unwrap();
        g.add_weighted_edge(c, d, 1).unwrap();
        assert!(g.is_weighted());

        let paths = g.shortest_paths(a).unwrap();
        assert_eq!(paths.algorithm(), Algorithm::BellmanFord);
        assert_eq!(paths.distance_to(&g, d).unwrap(), Some(3));
        assert_eq!(paths.path_to(&g, d).unwrap(), vec![a, b, c, d]);
    }

    #[test]
    fn test_negative_cycle_is_reported() {
        let g = graph_with(2, &[(0, 1, 1), (1, 0, -3)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 1), Err(GraphError::NegativeCycle { root: 0 }));
        assert_eq!(paths.path_to(&g, 1), Err(GraphError::NegativeCycle { root: 0 }));
    }

    #[test]
    fn test_unreachable_negative_cycle_is_ignored() {
        // Cycle 2 <-> 3 is negative but not reachable from 0.
        let g = graph_with(4, &[(0, 1, 2), (2, 3, 1), (3, 2, -5)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(!paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(2));
        assert_eq!(paths.distance_to(&g, 2).unwrap(), None);
    }

    #[test]
    fn test_negative_edge_without_cycle() {
        let g = graph_with(3, &[(0, 1, 4), (0, 2, 1), (2, 1, -2)]);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(-1));
        assert_eq!(paths.path_to(&g, 1).unwrap(), vec![0, 2, 1]);
    }

    #[test]
    fn test_forced_breadth_first_on_weighted_graph() {
        let g = graph_with(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 10)]);
        let hops = g.shortest_paths_with(0, Algorithm::BreadthFirst).unwrap();
        assert_eq!(hops.distance_to(&g, 2).unwrap(), Some(1));
        let weighted = g.shortest_paths(0).unwrap();
        assert_eq!(weighted.distance_to(&g, 2).unwrap(), Some(2));
    }

    #[test]
    fn test_bellman_ford_on_unweighted_matches_bfs() {
        let g = make_chain(5);
        let bf = g.shortest_paths_with(0, Algorithm::BellmanFord).unwrap();
        let bfs = g.shortest_paths(0).unwrap();
        for node in 0..5 {
            assert_eq!(bf.distance_to(&g, node).unwrap(), bfs.distance_to(&g, node).unwrap());
        }
    }

    #[test]
    fn test_distance_beyond_weight_range_is_an_error() {
        let g = graph_with(3, &[(0, 1, Weight::MAX), (1, 2, Weight::MAX)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(!paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 1).unwrap(), Some(Weight::MAX));
        assert_eq!(
            paths.distance_to(&g, 2),
            Err(GraphError::DistanceOverflow { root: 0, node: 2 })
        );
        assert_eq!(paths.path_to(&g, 2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_negative_cycle_at_weight_floor_is_reported() {
        let g = graph_with(3, &[(0, 1, Weight::MIN), (1, 2, 0), (2, 0, 0)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 2), Err(GraphError::NegativeCycle { root: 0 }));
        assert_eq!(paths.path_to(&g, 2), Err(GraphError::NegativeCycle { root: 0 }));
    }

    #[test]
    fn test_large_negative_cycle_is_reported() {
        let w = -(Weight::MAX / 2);
        let g = graph_with(4, &[(0, 1, w), (1, 2, w), (2, 3, w), (3, 0, w)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 3), Err(GraphError::NegativeCycle { root: 0 }));
    }

    #[test]
    fn test_negative_distance_at_weight_floor() {
        let g = graph_with(3, &[(0, 1, Weight::MIN), (1, 2, 0)]);
        let paths = g.shortest_paths(0).unwrap();
        assert!(!paths.has_negative_cycle());
        assert_eq!(paths.distance_to(&g, 2).unwrap(), Some(Weight::MIN));
    }

    #[test]
    fn test_erased_edge_weight_is_not_used() {
        let mut g = graph_with(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 7)]);
        g.erase_edge(1, 2);
        let paths = g.shortest_paths(0).unwrap();
        assert_eq!(paths.distance_to(&g, 2).unwrap(), Some(7));
        assert_eq!(paths.path_to(&g, 2).unwrap(), vec![0, 2]);
    }

    // --- Staleness ---

    #[test]
    fn test_stale_snapshot_is_rejected() {
        let mut g = make_chain(3);
        let paths = g.shortest_paths(0).unwrap();
        let computed = paths.generation();
        g.insert(3);
        assert_eq!(
            paths.path_to(&g, 2),
            Err(GraphError::StalePath {
                computed,
                current: g.generation(),
            })
        );
        assert!(paths.distance_to(&g, 2).is_err());

        let fresh = g.shortest_paths(0).unwrap();
        assert_eq!(fresh.path_to(&g, 2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_root_must_be_live() {
        let mut g = make_chain(2);
        g.erase(0);
        assert_eq!(g.shortest_paths(0), Err(GraphError::NodeNotFound(0)));
        assert_eq!(g.shortest_paths(5), Err(GraphError::NodeNotFound(5)));
    }
}
