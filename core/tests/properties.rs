//! Property tests for digraph-core: id lifecycle, adjacency mirroring,
//! enumeration counts, traversal coverage and shortest-path agreement.

use std::collections::{BTreeSet, HashSet};

use digraph_core::{Algorithm, Graph, NodeId, Weight};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert,
    Erase(usize),
    EraseMany(Vec<usize>),
    Edge(usize, usize, Weight),
    EraseEdge(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Insert),
        1 => any::<usize>().prop_map(Op::Erase),
        1 => prop::collection::vec(any::<usize>(), 0..5).prop_map(Op::EraseMany),
        4 => (any::<usize>(), any::<usize>(), prop_oneof![Just(1), -3_i64..10]).prop_map(|(u, v, w)| Op::Edge(u, v, w)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(u, v)| Op::EraseEdge(u, v)),
    ]
}

/// Map an arbitrary index onto the current slot range (live or not).
fn pick(g: &Graph<u32>, raw: usize) -> NodeId {
    if g.capacity() == 0 {
        0
    } else {
        raw % (g.capacity() + 1)
    }
}

/// Apply `ops`, checking `order()` against a model of the live set.
fn run_ops(ops: &[Op]) -> Result<Graph<u32>, TestCaseError> {
    let mut g = Graph::new();
    let mut live: BTreeSet<NodeId> = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert => {
                let expected = (0..).find(|id| !live.contains(id)).unwrap();
                let id = g.insert(0);
                prop_assert_eq!(id, expected, "insert must reuse the smallest free id");
                live.insert(id);
            }
            Op::Erase(raw) => {
                let id = pick(&g, *raw);
                let was_live = live.remove(&id);
                prop_assert_eq!(g.erase(id), was_live);
                prop_assert!(!g.is_valid(id));
            }
            Op::EraseMany(raws) => {
                let ids: Vec<NodeId> = raws.iter().map(|&r| pick(&g, r)).collect();
                let unique: HashSet<NodeId> = ids.iter().copied().filter(|id| live.contains(id)).collect();
                let before = g.order();
                let erased = g.erase_many(ids.clone());
                prop_assert_eq!(erased, unique.len());
                prop_assert_eq!(g.order(), before - unique.len());
                for id in &ids {
                    live.remove(id);
                    prop_assert!(!g.is_valid(*id));
                }
            }
            Op::Edge(u, v, w) => {
                let (u, v) = (pick(&g, *u), pick(&g, *v));
                let result = g.add_weighted_edge(u, v, *w);
                prop_assert_eq!(result.is_ok(), live.contains(&u) && live.contains(&v));
            }
            Op::EraseEdge(u, v) => {
                let (u, v) = (pick(&g, *u), pick(&g, *v));
                let had = g.contains_edge(u, v);
                prop_assert_eq!(g.erase_edge(u, v), had);
            }
        }
        prop_assert_eq!(g.order(), live.len());
    }

    Ok(g)
}

fn assert_mirrored(g: &Graph<u32>) -> Result<(), TestCaseError> {
    for u in g.nodes() {
        for &v in g.neighbors_out(u) {
            prop_assert!(g.is_valid(v), "edge {}->{} points at a dead node", u, v);
            let forward = g.neighbors_out(u).iter().filter(|&&x| x == v).count();
            let reverse = g.neighbors_in(v).iter().filter(|&&x| x == u).count();
            prop_assert_eq!(forward, reverse);
            prop_assert!(g.weight(u, v).is_some());
            prop_assert_eq!(g.weight(u, v), g.incoming_weight(v, u));
        }
        for &s in g.neighbors_in(u) {
            prop_assert!(g.neighbors_out(s).contains(&u));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn order_tracks_live_ids(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let g = run_ops(&ops)?;
        prop_assert_eq!(g.nodes().count(), g.order());
    }

    #[test]
    fn adjacency_stays_mirrored(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let g = run_ops(&ops)?;
        assert_mirrored(&g)?;
    }

    #[test]
    fn edge_enumeration_matches_size(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let g = run_ops(&ops)?;
        let out_sum: usize = g.nodes().map(|n| g.out_degree(n)).sum();
        prop_assert_eq!(g.edges().count(), g.size());
        prop_assert_eq!(g.size(), out_sum);
    }

    #[test]
    fn dfs_and_bfs_visit_same_set_once(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let g = run_ops(&ops)?;
        for root in g.nodes() {
            let dfs: Vec<NodeId> = g.dfs(root).unwrap().collect();
            let bfs: Vec<NodeId> = g.bfs(root).unwrap().collect();
            let dfs_set: BTreeSet<NodeId> = dfs.iter().copied().collect();
            let bfs_set: BTreeSet<NodeId> = bfs.iter().copied().collect();
            prop_assert_eq!(dfs.len(), dfs_set.len(), "dfs emitted a node twice");
            prop_assert_eq!(bfs.len(), bfs_set.len(), "bfs emitted a node twice");
            prop_assert_eq!(dfs_set, bfs_set);
        }
    }

    #[test]
    fn bellman_ford_agrees_with_bfs_on_unit_weights(
        n in 1_usize..12,
        edges in prop::collection::vec((0_usize..12, 0_usize..12), 0..40),
    ) {
        let mut g = Graph::new();
        for i in 0..n {
            g.insert(i as u32);
        }
        for (u, v) in edges {
            if u < n && v < n {
                g.add_edge(u, v).unwrap();
            }
        }
        for root in 0..n {
            let bfs = g.shortest_paths_with(root, Algorithm::BreadthFirst).unwrap();
            let bf = g.shortest_paths_with(root, Algorithm::BellmanFord).unwrap();
            let reached: BTreeSet<NodeId> = g.bfs(root).unwrap().collect();
            for node in 0..n {
                prop_assert_eq!(bfs.distance_to(&g, node).unwrap(), bf.distance_to(&g, node).unwrap());
                prop_assert_eq!(bfs.is_reachable(node), reached.contains(&node));
                let path = bfs.path_to(&g, node).unwrap();
                match bfs.distance_to(&g, node).unwrap() {
                    Some(d) => {
                        prop_assert_eq!(path.len() as Weight, d + 1);
                        prop_assert_eq!(path.first().copied(), Some(root));
                        prop_assert_eq!(path.last().copied(), Some(node));
                        for pair in path.windows(2) {
                            prop_assert!(g.contains_edge(pair[0], pair[1]));
                        }
                    }
                    None => prop_assert!(path.is_empty()),
                }
            }
        }
    }

    #[test]
    fn weighted_paths_sum_to_distance(
        n in 2_usize..10,
        edges in prop::collection::vec((0_usize..10, 0_usize..10, 0_i64..20), 1..30),
    ) {
        let mut g = Graph::new();
        for i in 0..n {
            g.insert(i as u32);
        }
        for (u, v, w) in edges {
            if u < n && v < n {
                g.add_weighted_edge(u, v, w).unwrap();
            }
        }
        let paths = g.shortest_paths_with(0, Algorithm::BellmanFord).unwrap();
        prop_assert!(!paths.has_negative_cycle());
        for node in 0..n {
            let path = paths.path_to(&g, node).unwrap();
            if let Some(d) = paths.distance_to(&g, node).unwrap() {
                let total: Weight = path.windows(2).map(|p| g.weight(p[0], p[1]).unwrap()).sum();
                prop_assert_eq!(total, d);
                for (u, v, w) in g.weighted_edges() {
                    if u == node {
                        if let Some(dv) = paths.distance_to(&g, v).unwrap() {
                            prop_assert!(dv <= d + w);
                        }
                    }
                }
            }
        }
    }
}
