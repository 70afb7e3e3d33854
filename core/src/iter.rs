use std::iter::FusedIterator;

use crate::graph::{Graph, NodeId, Weight, UNIT_WEIGHT};

/// Live node ids in ascending order, from either end.
///
/// Tombstoned slots are skipped. Exhausting the iterator from the front or
/// the back yields `None`.
#[derive(Debug)]
pub struct Nodes<'g, T> {
    graph: &'g Graph<T>,
    front: NodeId,
    back: NodeId,
}

impl<'g, T> Nodes<'g, T> {
    pub(crate) fn new(graph: &'g Graph<T>) -> Self {
        Self {
            graph,
            front: 0,
            back: graph.capacity(),
        }
    }
}

impl<T> Clone for Nodes<'_, T> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T> Iterator for Nodes<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.graph.live_at_or_after(self.front).filter(|&id| id < self.back);
        match id {
            Some(id) => self.front = id + 1,
            None => self.front = self.back,
        }
        id
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back.saturating_sub(self.front)))
    }
}

impl<T> DoubleEndedIterator for Nodes<'_, T> {
    fn next_back(&mut self) -> Option<NodeId> {
        let id = self.graph.live_before(self.back).filter(|&id| id >= self.front);
        match id {
            Some(id) => self.back = id,
            None => self.back = self.front,
        }
        id
    }
}

impl<T> FusedIterator for Nodes<'_, T> {}

/// Every directed edge `(u, v)`: live sources in id order, each source's
/// out-list in insertion order. Parallel edges are yielded once per instance.
#[derive(Debug)]
pub struct Edges<'g, T> {
    graph: &'g Graph<T>,
    nodes: Nodes<'g, T>,
    source: Option<NodeId>,
    index: usize,
}

impl<T> Iterator for Edges<'_, T> {
    type Item = (NodeId, NodeId);

    fn next(&mut self) -> Option<(NodeId, NodeId)> {
        loop {
            if let Some(source) = self.source {
                if let Some(&target) = self.graph.neighbors_out(source).get(self.index) {
                    self.index += 1;
                    return Some((source, target));
                }
            }
            self.source = Some(self.nodes.next()?);
            self.index = 0;
        }
    }
}

impl<T> FusedIterator for Edges<'_, T> {}

impl<T> Graph<T> {
    /// Iterate live node ids.
    pub fn nodes(&self) -> Nodes<'_, T> {
        Nodes::new(self)
    }

    /// Iterate directed edges as `(source, target)` pairs.
    pub fn edges(&self) -> Edges<'_, T> {
        Edges {
            graph: self,
            nodes: self.nodes(),
            source: None,
            index: 0,
        }
    }

    /// Iterate directed edges with their recorded weight.
    pub fn weighted_edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        self.edges()
            .map(move |(u, v)| (u, v, self.weight(u, v).unwrap_or(UNIT_WEIGHT)))
    }

    /// Smallest live id, if any.
    pub fn first_node(&self) -> Option<NodeId> {
        self.live_at_or_after(0)
    }

    /// Largest live id, if any.
    pub fn last_node(&self) -> Option<NodeId> {
        self.live_before(self.capacity())
    }

    /// Next live id after `id`.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        self.live_at_or_after(id.checked_add(1)?)
    }

    /// Previous live id before `id`.
    pub fn prev_node(&self, id: NodeId) -> Option<NodeId> {
        self.live_before(id)
    }
}
