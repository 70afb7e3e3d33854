//! Narrowed wrappers over [`Graph`] for hierarchies and undirected graphs.
//!
//! Both own their graph and expose only the operations that keep their
//! shape intact. Read-only access to the full graph is available through
//! `graph()`.

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, GraphConfig, NodeId, Weight};
use crate::iter::Nodes;
use crate::path::Path;
use crate::traversal::Cursor;

/// Rooted hierarchy. Edges point parent → child and every node has at most
/// one parent, so `parent(n)` is the single entry of `n`'s in-list and
/// `children(n)` is its out-list.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    graph: Graph<T>,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self { graph: Graph::new() }
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            graph: Graph::with_config(config),
        }
    }

    /// Add a detached node. It is a root until appended under a parent.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.graph.insert(value)
    }

    /// Make `child` a child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> GraphResult<()> {
        self.graph.ensure_live(parent)?;
        self.graph.ensure_live(child)?;

        if let Some(existing) = self.parent(child) {
            return Err(GraphError::AlreadyHasParent {
                child,
                parent: existing,
            });
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(GraphError::WouldCreateCycle { parent, child });
        }

        self.graph.add_edge(parent, child)
    }

    /// Cut `child` loose from its parent, making it a root.
    pub fn detach(&mut self, child: NodeId) -> bool {
        match self.parent(child) {
            Some(parent) => self.graph.erase_edge(parent, child),
            None => false,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.graph.neighbors_in(node).first().copied()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.graph.neighbors_out(node)
    }

    /// Parent, grandparent, … up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// Hops from the root of `node`'s tree. None if `node` is not live.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.graph.is_valid(node).then(|| self.ancestors(node).count())
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.graph.is_valid(node) && self.children(node).is_empty()
    }

    /// Live nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes().filter(move |&n| self.parent(n).is_none())
    }

    /// Erase `node` and all its descendants. Returns the number erased.
    pub fn erase_subtree(&mut self, node: NodeId) -> usize {
        let Ok(walk) = self.graph.dfs(node) else {
            return 0;
        };
        let doomed: Vec<NodeId> = walk.collect();
        self.graph.erase_many(doomed)
    }

    pub fn dfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.graph.dfs(root)
    }

    pub fn bfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.graph.bfs(root)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.graph.get(node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.graph.get_mut(node)
    }

    pub fn order(&self) -> usize {
        self.graph.order()
    }

    /// Edge count of a connected tree: `order() - 1`, or 0 when empty.
    pub fn size(&self) -> usize {
        self.graph.order().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn graph(&self) -> &Graph<T> {
        &self.graph
    }

    pub fn into_inner(self) -> Graph<T> {
        self.graph
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Undirected graph stored as a symmetric directed graph: every edge
/// `{u, v}` is kept as `u → v` and `v → u` with the same weight. A self-loop
/// is stored once.
#[derive(Debug, Clone)]
pub struct Undirected<T> {
    graph: Graph<T>,
}

impl<T> Undirected<T> {
    pub fn new() -> Self {
        Self { graph: Graph::new() }
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            graph: Graph::with_config(config),
        }
    }

    pub fn insert(&mut self, value: T) -> NodeId {
        self.graph.insert(value)
    }

    pub fn erase(&mut self, node: NodeId) -> bool {
        self.graph.erase(node)
    }

    pub fn erase_many<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.graph.erase_many(nodes)
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> GraphResult<()> {
        self.add_weighted_edge(u, v, crate::graph::UNIT_WEIGHT)
    }

    pub fn add_weighted_edge(&mut self, u: NodeId, v: NodeId, weight: Weight) -> GraphResult<()> {
        self.graph.ensure_live(u)?;
        self.graph.ensure_live(v)?;
        self.graph.add_weighted_edge(u, v, weight)?;
        if u != v {
            self.graph.add_weighted_edge(v, u, weight)?;
        }
        Ok(())
    }

    /// Remove one instance of `{u, v}` in both directions.
    pub fn erase_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self.graph.erase_edge(u, v);
        if removed && u != v {
            self.graph.erase_edge(v, u);
        }
        removed
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.graph.neighbors_out(node)
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.graph.out_degree(node)
    }

    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<Weight> {
        self.graph.weight(u, v)
    }

    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.graph.contains_edge(u, v)
    }

    pub fn order(&self) -> usize {
        self.graph.order()
    }

    /// Number of undirected edges.
    pub fn size(&self) -> usize {
        self.graph.edges().filter(|&(u, v)| u <= v).count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn nodes(&self) -> Nodes<'_, T> {
        self.graph.nodes()
    }

    pub fn dfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.graph.dfs(root)
    }

    pub fn bfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.graph.bfs(root)
    }

    pub fn shortest_paths(&self, root: NodeId) -> GraphResult<Path> {
        self.graph.shortest_paths(root)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.graph.get(node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.graph.get_mut(node)
    }

    pub fn graph(&self) -> &Graph<T> {
        &self.graph
    }

    pub fn into_inner(self) -> Graph<T> {
        self.graph
    }
}

impl<T> Default for Undirected<T> {
    fn default() -> Self {
        Self::new()
    }
}
