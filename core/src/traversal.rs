use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::error::GraphResult;
use crate::graph::{Direction, Graph, NodeId, Weight};
use crate::path::Path;

/// Frontier discipline: which pending node is visited next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discipline {
    /// Stack: last discovered, first visited.
    #[default]
    DepthFirst,
    /// Queue: first discovered, first visited.
    BreadthFirst,
}

/// Configuration for a traversal cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalConfig {
    pub discipline: Discipline,
    pub direction: Direction,
    /// Nodes at this depth are visited but not expanded. None = unbounded.
    pub max_depth: Option<u32>,
}

impl TraversalConfig {
    #[must_use]
    pub fn depth_first() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn breadth_first() -> Self {
        Self {
            discipline: Discipline::BreadthFirst,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: NodeId,
    depth: u32,
}

/// Pending-visit collection. Both variants push at the back; they differ
/// only in which end `pop_next` takes from.
#[derive(Debug, Clone)]
enum Frontier {
    Stack(Vec<Pending>),
    Queue(VecDeque<Pending>),
}

impl Frontier {
    fn new(discipline: Discipline) -> Self {
        match discipline {
            Discipline::DepthFirst => Frontier::Stack(Vec::new()),
            Discipline::BreadthFirst => Frontier::Queue(VecDeque::new()),
        }
    }

    fn push(&mut self, pending: Pending) {
        match self {
            Frontier::Stack(s) => s.push(pending),
            Frontier::Queue(q) => q.push_back(pending),
        }
    }

    fn pop_next(&mut self) -> Option<Pending> {
        match self {
            Frontier::Stack(s) => s.pop(),
            Frontier::Queue(q) => q.pop_front(),
        }
    }

    /// First entry in pop order accepted by `keep`.
    fn peek(&self, keep: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        match self {
            Frontier::Stack(s) => s.iter().rev().map(|p| p.id).find(|&id| keep(id)),
            Frontier::Queue(q) => q.iter().map(|p| p.id).find(|&id| keep(id)),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Stack(s) => s.len(),
            Frontier::Queue(q) => q.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self) {
        match self {
            Frontier::Stack(s) => s.clear(),
            Frontier::Queue(q) => q.clear(),
        }
    }
}

/// Lazy graph walk: one node per step, pulled by the caller.
///
/// The cursor starts positioned on the root. Each step pops the next
/// unvisited node from the frontier, marks it visited and pushes its
/// unvisited neighbors in adjacency order. A node is visited at most once,
/// even when parallel edges lead to it. When the frontier runs dry the
/// cursor's current node becomes `None`.
///
/// The cursor borrows the graph, so the graph cannot change under it.
#[derive(Debug, Clone)]
pub struct Cursor<'g, T> {
    graph: &'g Graph<T>,
    config: TraversalConfig,
    root: NodeId,
    current: Option<Pending>,
    visited: HashSet<NodeId>,
    frontier: Frontier,
    // Suppresses the next entered node's expansion, then clears.
    prune: bool,
}

impl<'g, T> Cursor<'g, T> {
    pub fn new(graph: &'g Graph<T>, root: NodeId, config: TraversalConfig) -> GraphResult<Self> {
        graph.ensure_live(root)?;

        let mut cursor = Self {
            graph,
            config,
            root,
            current: None,
            visited: HashSet::new(),
            frontier: Frontier::new(config.discipline),
            prune: false,
        };
        cursor.enter(Pending { id: root, depth: 0 });
        Ok(cursor)
    }

    fn enter(&mut self, pending: Pending) {
        self.visited.insert(pending.id);
        self.current = Some(pending);

        let pruned = std::mem::take(&mut self.prune);
        if pruned || self.config.max_depth.is_some_and(|max| pending.depth >= max) {
            return;
        }
        let graph = self.graph;
        for next in graph.neighbors(pending.id, self.config.direction) {
            if !self.visited.contains(&next) {
                self.frontier.push(Pending {
                    id: next,
                    depth: pending.depth + 1,
                });
            }
        }
    }

    /// Take one step. Returns the new current node, or None at the end.
    pub fn advance(&mut self) -> Option<NodeId> {
        while let Some(pending) = self.frontier.pop_next() {
            if !self.visited.contains(&pending.id) {
                self.enter(pending);
                return Some(pending.id);
            }
        }
        self.current = None;
        None
    }

    /// Don't expand the node the next `advance` moves to: it is still
    /// visited, but its neighbors are not pushed, so the walk skips its
    /// fringe and carries on with the rest of the frontier. One-shot.
    pub fn prune(&mut self) {
        self.prune = true;
    }

    /// Restart from the root with an empty visited set.
    pub fn rewind(&mut self) {
        debug!(root = self.root, visited = self.visited.len(), "rewinding cursor");
        self.frontier.clear();
        self.visited.clear();
        self.prune = false;
        self.enter(Pending {
            id: self.root,
            depth: 0,
        });
    }

    /// The node the next `advance` would move to.
    pub fn peek(&self) -> Option<NodeId> {
        self.frontier.peek(|id| !self.visited.contains(&id))
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current.map(|p| p.id)
    }

    /// Hops from the root to the current node along the traversal tree.
    pub fn depth(&self) -> Option<u32> {
        self.current.map(|p| p.depth)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    pub fn has_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.visited.contains(&id)
    }

    /// Shortest-path snapshot rooted at the current node. None at the end.
    pub fn shortest_paths(&self) -> GraphResult<Option<Path>> {
        match self.current() {
            Some(id) => self.graph.shortest_paths(id).map(Some),
            None => Ok(None),
        }
    }

    /// Shortest route from this cursor's node to `other`'s node, both ends
    /// included. Empty if either cursor is finished or `other`'s node is
    /// unreachable.
    pub fn path_to(&self, other: &Cursor<'_, T>) -> GraphResult<Vec<NodeId>> {
        let Some(target) = other.current() else {
            return Ok(Vec::new());
        };
        match self.shortest_paths()? {
            Some(paths) => paths.path_to(self.graph, target),
            None => Ok(Vec::new()),
        }
    }

    /// Shortest distance from this cursor's node to `other`'s node.
    pub fn distance_to(&self, other: &Cursor<'_, T>) -> GraphResult<Option<Weight>> {
        let Some(target) = other.current() else {
            return Ok(None);
        };
        match self.shortest_paths()? {
            Some(paths) => paths.distance_to(self.graph, target),
            None => Ok(None),
        }
    }
}

/// Yields the current node, then steps.
impl<T> Iterator for Cursor<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current()?;
        self.advance();
        Some(id)
    }
}

impl<T> Graph<T> {
    pub fn traverse(&self, root: NodeId, config: TraversalConfig) -> GraphResult<Cursor<'_, T>> {
        Cursor::new(self, root, config)
    }

    /// Depth-first walk along out-edges.
    pub fn dfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.traverse(root, TraversalConfig::depth_first())
    }

    /// Breadth-first walk along out-edges.
    pub fn bfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.traverse(root, TraversalConfig::breadth_first())
    }

    /// Depth-first walk along in-edges.
    pub fn rdfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.traverse(root, TraversalConfig::depth_first().with_direction(Direction::Reverse))
    }

    /// Breadth-first walk along in-edges.
    pub fn rbfs(&self, root: NodeId) -> GraphResult<Cursor<'_, T>> {
        self.traverse(root, TraversalConfig::breadth_first().with_direction(Direction::Reverse))
    }
}
