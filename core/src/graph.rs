use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{GraphError, GraphResult};

/// Dense node handle. Indexes a storage slot and is recycled after erase.
pub type NodeId = usize;

/// Edge weight. Negative weights are allowed.
pub type Weight = i64;

/// Weight of an edge inserted without an explicit weight.
pub const UNIT_WEIGHT: Weight = 1;

/// Which adjacency list a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Follow `u → v` edges from `u` (out-lists).
    #[default]
    Forward,
    /// Follow `u → v` edges from `v` back to `u` (in-lists).
    Reverse,
    /// Follow both lists, out-list first (undirected walk).
    Both,
}

/// Construction-time settings for a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    /// Number of node slots to pre-allocate.
    pub node_capacity: usize,
    /// Reuse tombstoned ids on insert. When false, every insert allocates a
    /// fresh slot and erased ids stay tombstoned forever.
    pub recycle_ids: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_capacity: 0,
            recycle_ids: true,
        }
    }
}

impl GraphConfig {
    #[must_use]
    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    #[must_use]
    pub fn with_recycle_ids(mut self, recycle_ids: bool) -> Self {
        self.recycle_ids = recycle_ids;
        self
    }
}

/// One storage slot. A slot whose `value` is `None` is a tombstone and
/// always has empty adjacency.
#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    outgoing: Vec<NodeId>,
    incoming: Vec<NodeId>,
    weights_out: HashMap<NodeId, Weight>,
    weights_in: HashMap<NodeId, Weight>,
}

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            value: Some(value),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            weights_out: HashMap::new(),
            weights_in: HashMap::new(),
        }
    }

    fn tombstone(&mut self) {
        self.value = None;
        self.outgoing = Vec::new();
        self.incoming = Vec::new();
        self.weights_out = HashMap::new();
        self.weights_in = HashMap::new();
    }
}

/// In-memory directed graph: an arena of node slots with a free-list of
/// recycled ids, forward/reverse adjacency lists and forward/reverse weight
/// maps.
///
/// Edges are stored bidirectionally: `v` appears in the out-list of `u`
/// exactly as many times as `u` appears in the in-list of `v`. The weight
/// maps hold one weight per `(u, v)` pair; the latest assignment wins.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    slots: Vec<Slot<T>>,
    free: BinaryHeap<Reverse<NodeId>>,
    live: usize,
    weighted: bool,
    generation: u64,
    config: GraphConfig,
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self::with_config(GraphConfig::default().with_node_capacity(node_count))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.node_capacity),
            free: BinaryHeap::new(),
            live: 0,
            weighted: false,
            generation: 0,
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Store a value and return its id: the smallest tombstoned id when one
    /// is available, otherwise a fresh id past the end of storage.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.generation += 1;
        self.live += 1;

        if let Some(Reverse(id)) = self.free.pop() {
            trace!(id, "recycling tombstoned id");
            self.slots[id].value = Some(value);
            return id;
        }

        self.slots.push(Slot::new(value));
        self.slots.len() - 1
    }

    /// Erase one node and every edge touching it. Returns false (and does
    /// nothing) if the id was not live.
    pub fn erase(&mut self, id: NodeId) -> bool {
        if !self.is_valid(id) {
            return false;
        }

        let outgoing = std::mem::take(&mut self.slots[id].outgoing);
        let incoming = std::mem::take(&mut self.slots[id].incoming);

        for target in dedup(outgoing) {
            if target == id {
                continue;
            }
            let slot = &mut self.slots[target];
            slot.incoming.retain(|&source| source != id);
            slot.weights_in.remove(&id);
        }
        for source in dedup(incoming) {
            if source == id {
                continue;
            }
            let slot = &mut self.slots[source];
            slot.outgoing.retain(|&target| target != id);
            slot.weights_out.remove(&id);
        }

        self.slots[id].tombstone();
        self.release(id);
        self.generation += 1;
        true
    }

    /// Erase a batch of nodes in a single pass over all adjacency.
    ///
    /// Ids that are duplicated, tombstoned or out of range are ignored.
    /// Returns the number of ids that were live.
    pub fn erase_many<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let doomed: HashSet<NodeId> = ids.into_iter().filter(|&id| self.is_valid(id)).collect();
        if doomed.is_empty() {
            return 0;
        }

        for (id, slot) in self.slots.iter_mut().enumerate() {
            if doomed.contains(&id) {
                slot.tombstone();
                continue;
            }
            if slot.value.is_none() {
                continue;
            }
            slot.outgoing.retain(|target| !doomed.contains(target));
            slot.incoming.retain(|source| !doomed.contains(source));
            slot.weights_out.retain(|target, _| !doomed.contains(target));
            slot.weights_in.retain(|source, _| !doomed.contains(source));
        }

        for &id in &doomed {
            self.release(id);
        }
        self.generation += 1;

        debug!(erased = doomed.len(), remaining = self.live, "batch erase");
        doomed.len()
    }

    /// Remove one instance of the edge `from → to` from both adjacency lists.
    ///
    /// Once no instance of the pair remains, its forward and reverse weight
    /// entries are dropped as well. The weighted flag is left untouched.
    pub fn erase_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.is_valid(from) || !self.is_valid(to) {
            return false;
        }
        let Some(pos) = self.slots[from].outgoing.iter().position(|&t| t == to) else {
            return false;
        };

        self.slots[from].outgoing.remove(pos);
        if let Some(rpos) = self.slots[to].incoming.iter().position(|&s| s == from) {
            self.slots[to].incoming.remove(rpos);
        }

        if !self.slots[from].outgoing.contains(&to) {
            self.slots[from].weights_out.remove(&to);
            self.slots[to].weights_in.remove(&from);
        }

        self.generation += 1;
        true
    }

    /// Add a directed edge with unit weight.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> GraphResult<()> {
        self.add_weighted_edge(from, to, UNIT_WEIGHT)
    }

    /// Add a directed edge. Also inserts into the incoming adjacency list
    /// and mirrors the weight into the reverse map.
    ///
    /// Any weight other than [`UNIT_WEIGHT`] marks the graph as weighted for
    /// the rest of its life.
    pub fn add_weighted_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) -> GraphResult<()> {
        self.ensure_live(from)?;
        self.ensure_live(to)?;

        self.slots[from].outgoing.push(to);
        self.slots[to].incoming.push(from);
        self.slots[from].weights_out.insert(to, weight);
        self.slots[to].weights_in.insert(from, weight);

        if weight != UNIT_WEIGHT && !self.weighted {
            debug!(from, to, weight, "graph is now weighted");
            self.weighted = true;
        }

        self.generation += 1;
        Ok(())
    }

    /// Weight of `from → to`, or None if no such edge is recorded.
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.slots.get(from)?.weights_out.get(&to).copied()
    }

    /// Weight of `source → node` read from `node`'s reverse map.
    pub fn incoming_weight(&self, node: NodeId, source: NodeId) -> Option<Weight> {
        self.slots.get(node)?.weights_in.get(&source).copied()
    }

    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.neighbors_out(from).contains(&to)
    }

    /// Get outgoing neighbors for a node.
    pub fn neighbors_out(&self, id: NodeId) -> &[NodeId] {
        self.slots.get(id).map(|s| s.outgoing.as_slice()).unwrap_or(&[])
    }

    /// Get incoming neighbors for a node.
    pub fn neighbors_in(&self, id: NodeId) -> &[NodeId] {
        self.slots.get(id).map(|s| s.incoming.as_slice()).unwrap_or(&[])
    }

    /// Neighbors along `direction`. `Both` yields the out-list, then the in-list.
    pub fn neighbors(&self, id: NodeId, direction: Direction) -> impl Iterator<Item = NodeId> + '_ {
        let (out, inc): (&[NodeId], &[NodeId]) = match direction {
            Direction::Forward => (self.neighbors_out(id), &[]),
            Direction::Reverse => (&[], self.neighbors_in(id)),
            Direction::Both => (self.neighbors_out(id), self.neighbors_in(id)),
        };
        out.iter().chain(inc.iter()).copied()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.neighbors_out(id).len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.neighbors_in(id).len()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.in_degree(id) + self.out_degree(id)
    }

    /// Number of live nodes.
    pub fn order(&self) -> usize {
        self.live
    }

    /// Number of directed edges, counted over the out-lists.
    pub fn size(&self) -> usize {
        self.slots.iter().map(|s| s.outgoing.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Number of storage slots, live or tombstoned.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Mutation counter. Changes whenever nodes or edges change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_valid(&self, id: NodeId) -> bool {
        self.slots.get(id).is_some_and(|s| s.value.is_some())
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id)?.value.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id)?.value.as_mut()
    }

    /// Drop every node and edge, returning to the state of a fresh graph
    /// (including the weighted flag). The generation keeps counting.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
        self.weighted = false;
        self.generation += 1;
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let slots_mem = self.slots.capacity() * size_of::<Slot<T>>();
        let adjacency: usize = self
            .slots
            .iter()
            .map(|s| (s.outgoing.capacity() + s.incoming.capacity()) * size_of::<NodeId>())
            .sum();
        let weights: usize = self
            .slots
            .iter()
            .map(|s| (s.weights_out.capacity() + s.weights_in.capacity()) * (size_of::<NodeId>() + size_of::<Weight>() + 8))
            .sum();
        let free_mem = self.free.capacity() * size_of::<NodeId>();

        slots_mem + adjacency + weights + free_mem
    }

    pub(crate) fn ensure_live(&self, id: NodeId) -> GraphResult<()> {
        if self.is_valid(id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }

    /// First live id at or after `from`.
    pub(crate) fn live_at_or_after(&self, from: NodeId) -> Option<NodeId> {
        (from..self.slots.len()).find(|&id| self.slots[id].value.is_some())
    }

    /// Last live id strictly before `end`.
    pub(crate) fn live_before(&self, end: NodeId) -> Option<NodeId> {
        (0..end.min(self.slots.len())).rev().find(|&id| self.slots[id].value.is_some())
    }

    fn release(&mut self, id: NodeId) {
        self.live -= 1;
        if self.config.recycle_ids {
            self.free.push(Reverse(id));
        }
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup(mut ids: Vec<NodeId>) -> Vec<NodeId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
