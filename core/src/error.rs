use thiserror::Error;

use crate::graph::NodeId;

/// Errors returned by graph operations that require a live node or a fresh
/// shortest-path snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The id is out of range or tombstoned.
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// The graph was mutated after the path snapshot was computed.
    #[error("path snapshot is stale: computed at generation {computed}, graph is at {current}")]
    StalePath { computed: u64, current: u64 },

    /// A negative-weight cycle is reachable from the root, so no shortest
    /// path is well defined.
    #[error("negative cycle reachable from node {root}")]
    NegativeCycle { root: NodeId },

    /// The shortest distance exists but lies outside the `Weight` range.
    #[error("distance from node {root} to node {node} does not fit in an i64")]
    DistanceOverflow { root: NodeId, node: NodeId },

    /// Tree append on a child that already has a parent.
    #[error("node {child} already has parent {parent}")]
    AlreadyHasParent { child: NodeId, parent: NodeId },

    /// Tree append whose child is an ancestor of the parent (or the parent itself).
    #[error("appending {child} under {parent} would create a cycle")]
    WouldCreateCycle { parent: NodeId, child: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
