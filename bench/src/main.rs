use std::time::Instant;

use anyhow::{bail, Context, Result};
use digraph_core::{Graph, NodeId};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: usize = match args.get(2) {
        Some(raw) => raw.parse().with_context(|| format!("invalid node_count '{}'", raw))?,
        None => 200_000,
    };

    if mode == "help" || mode == "--help" {
        println!("Usage: digraph-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  tree        Fractal branching tree (deep paths)");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  barbell     Two dense cliques connected by a thin bridge");
        println!();
        println!("Default node_count: 200000. Set RUST_LOG=debug for engine events.");
        return Ok(());
    }

    if node_count < 16 {
        bail!("node_count must be at least 16, got {}", node_count);
    }

    println!("digraph-bench");
    println!("=============");
    println!();

    let generators: Vec<(&str, fn(usize) -> Result<Graph<u32>>)> = match mode {
        "tree" => vec![("Branching tree", gen_tree)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "barbell" => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        "all" => vec![
            ("Branching tree", gen_tree as fn(usize) -> Result<Graph<u32>>),
            ("Erdos-Renyi random", gen_random),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Barbell (clique-bridge-clique)", gen_barbell),
        ],
        other => bail!("unknown mode: {}. Use --help for options.", other),
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count)?;
    }
    Ok(())
}

fn run_benchmark(name: &str, generator: fn(usize) -> Result<Graph<u32>>, node_count: usize) -> Result<()> {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let mut graph = generator(node_count)?;
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.order(),
        graph.size(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    info!(generator = name, nodes = graph.order(), edges = graph.size(), "graph generated");

    // Full walks from node 0 (the root or a hub).
    println!();
    println!("{:>8} {:>12} {:>10}", "walk", "visited", "time");
    println!("{:->8} {:->12} {:->10}", "", "", "");
    for (label, breadth_first) in [("dfs", false), ("bfs", true)] {
        let t = Instant::now();
        let cursor = if breadth_first { graph.bfs(0)? } else { graph.dfs(0)? };
        let visited = cursor.count();
        println!("{:>8} {:>12} {:>8.1}ms", label, visited, t.elapsed().as_secs_f64() * 1000.0);
    }

    // Unweighted shortest path: node 0 to last node.
    let far_node = graph.last_node().context("generator produced an empty graph")?;
    println!();
    let t = Instant::now();
    let paths = graph.shortest_paths(0)?;
    let hops = paths.path_to(&graph, far_node)?;
    report_path("Shortest path", far_node, &hops, paths.distance_to(&graph, far_node)?, t);

    // Weighted shortest path on a prefix of the graph (Bellman-Ford is O(V × E)).
    let weighted = weighted_prefix(&graph, 2_000_usize.min(graph.order()))?;
    let far_node = weighted.last_node().context("weighted prefix is empty")?;
    let t = Instant::now();
    let paths = weighted.shortest_paths(0)?;
    let route = paths.path_to(&weighted, far_node)?;
    report_path("Bellman-Ford (2k prefix)", far_node, &route, paths.distance_to(&weighted, far_node)?, t);

    // Batch erase a tenth of the nodes, then refill the freed ids.
    let doomed: Vec<NodeId> = graph.nodes().step_by(10).skip(1).collect();
    let t = Instant::now();
    let erased = graph.erase_many(doomed);
    let erase_time = t.elapsed();
    let t = Instant::now();
    for _ in 0..erased {
        graph.insert(0);
    }
    println!(
        "Batch erase of {} nodes in {:.1}ms, refilled in {:.1}ms ({} edges left)",
        erased,
        erase_time.as_secs_f64() * 1000.0,
        t.elapsed().as_secs_f64() * 1000.0,
        graph.size()
    );
    println!();
    Ok(())
}

fn report_path(label: &str, target: NodeId, path: &[NodeId], distance: Option<i64>, started: Instant) {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    match distance {
        Some(d) => println!(
            "{} 0 → {}: {} hops, distance {} in {:.1}ms",
            label,
            target,
            path.len().saturating_sub(1),
            d,
            ms
        ),
        None => println!("{} 0 → {}: no path ({:.1}ms)", label, target, ms),
    }
}

/// Copy the first `limit` live nodes and their internal edges with
/// pseudo-random weights in 1..=9.
fn weighted_prefix(graph: &Graph<u32>, limit: usize) -> Result<Graph<u32>> {
    let mut rng = FastRng::new(2024);
    let mut weighted = Graph::with_capacity(limit);
    let ids: Vec<NodeId> = graph.nodes().take(limit).collect();
    for &id in &ids {
        weighted.insert(graph.get(id).copied().unwrap_or_default());
    }
    for (from, to) in graph.edges() {
        if from < limit && to < limit {
            // Prefix ids are dense because the generators never erase.
            weighted.add_weighted_edge(from, to, 1 + rng.next(9) as i64)?;
        }
    }
    Ok(weighted)
}

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn add_nodes(graph: &mut Graph<u32>, count: usize) {
    for i in 0..count {
        graph.insert(i as u32);
    }
}

/// Branching tree: each node spawns 3 children. Produces deep paths (log
/// depth) with exponential width.
fn gen_tree(node_count: usize) -> Result<Graph<u32>> {
    let mut graph = Graph::with_capacity(node_count);
    let branching = 3;
    graph.insert(0);

    let mut frontier: Vec<NodeId> = vec![0];
    while graph.order() < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching);
        for &parent in &frontier {
            for _ in 0..branching {
                if graph.order() >= node_count {
                    break;
                }
                let value = graph.order() as u32;
                let child = graph.insert(value);
                graph.add_edge(parent, child)?;
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    Ok(graph)
}

/// Erdos-Renyi: ~10 uniform random edges per node. Baseline topology with
/// no structure.
fn gen_random(node_count: usize) -> Result<Graph<u32>> {
    let mut graph = Graph::with_capacity(node_count);
    let mut rng = FastRng::new(54321);
    add_nodes(&mut graph, node_count);

    let n = node_count as u64;
    for _ in 0..node_count * 10 {
        let from = rng.next(n) as NodeId;
        let to = rng.next(n) as NodeId;
        if from != to {
            graph.add_edge(from, to)?;
        }
    }

    Ok(graph)
}

/// Small-world (Watts-Strogatz): ring lattice with K forward neighbors,
/// each edge rewired with probability p. High clustering, short paths.
fn gen_small_world(node_count: usize) -> Result<Graph<u32>> {
    let k = 10;
    let p = 0.05f64;
    let mut graph = Graph::with_capacity(node_count);
    let mut rng = FastRng::new(67890);
    add_nodes(&mut graph, node_count);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count as u64) as NodeId;
                if rewired != i { rewired } else { neighbor }
            } else {
                neighbor
            };
            graph.add_edge(i, target)?;
        }
    }

    Ok(graph)
}

/// Barbell: two dense cliques joined by a chain of 10 bridge nodes. Worst
/// case for "find path through bottleneck."
fn gen_barbell(node_count: usize) -> Result<Graph<u32>> {
    let bridge_len = 10;
    let clique_size = (node_count - bridge_len) / 2;
    let mut graph = Graph::with_capacity(node_count);
    let mut rng = FastRng::new(99999);
    add_nodes(&mut graph, clique_size * 2 + bridge_len);

    let mut wire_clique = |graph: &mut Graph<u32>, base: NodeId| -> Result<()> {
        for i in 0..clique_size {
            for _ in 0..20_usize.min(clique_size - 1) {
                let target = rng.next(clique_size as u64) as NodeId;
                if target != i {
                    graph.add_edge(base + i, base + target)?;
                }
            }
        }
        Ok(())
    };

    wire_clique(&mut graph, 0)?;
    let bridge_start = clique_size;
    graph.add_edge(clique_size - 1, bridge_start)?;
    for id in bridge_start + 1..bridge_start + bridge_len {
        graph.add_edge(id - 1, id)?;
    }
    let b_start = bridge_start + bridge_len;
    graph.add_edge(b_start - 1, b_start)?;
    wire_clique(&mut graph, b_start)?;

    Ok(graph)
}
