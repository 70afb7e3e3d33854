//! digraph-core: In-memory directed graph container.
//!
//! An arena of node slots with recycled ids, mirrored forward/reverse
//! adjacency and weight maps, lazy depth-first and breadth-first cursors,
//! and single-source shortest paths (breadth-first levels for unweighted
//! graphs, Bellman-Ford once any edge carries a non-unit weight).
//!
//! Single-threaded: callers serialize access themselves when sharing a
//! graph across threads.

mod error;
mod graph;
mod iter;
mod path;
mod traversal;
mod views;

pub use error::{GraphError, GraphResult};
pub use graph::{Direction, Graph, GraphConfig, NodeId, Weight, UNIT_WEIGHT};
pub use iter::{Edges, Nodes};
pub use path::{Algorithm, Path};
pub use traversal::{Cursor, Discipline, TraversalConfig};
pub use views::{Tree, Undirected};
