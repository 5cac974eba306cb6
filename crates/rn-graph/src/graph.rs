//! Core network data structures.

use geo::{LineString, Point};
use rn_core::{EdgeId, Length, NodeId, Real, ReachId};

use crate::indexing::ReachIndex;

/// A junction, source or outlet of the river network.
///
/// Nodes never move once created; the point is the junction location.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub point: Point<Real>,
}

/// A reach: one river line between two nodes, oriented downstream.
///
/// `geometry` starts at the `start` node's point and ends at the `end`
/// node's point.
#[derive(Debug, Clone, PartialEq)]
pub struct Reach {
    pub id: EdgeId,
    pub reach_id: ReachId,
    /// Classification code carried over from the source data.
    pub code: i64,
    pub start: NodeId,
    pub end: NodeId,
    pub geometry: LineString<Real>,
    pub length: Length,
}

/// The river network: a validated, immutable directed multigraph.
///
/// The network stores:
/// - All nodes and reaches in vectors (indexed by their IDs).
/// - Compact adjacency in both directions: for each node, the reaches
///   leaving it (downstream) and the reaches entering it (upstream).
///
/// Parallel reaches between the same node pair are allowed (braids).
#[derive(Debug, Clone)]
pub struct RiverNetwork {
    pub(crate) nodes: Vec<Node>,
    pub(crate) reaches: Vec<Reach>,

    /// node i's outgoing reaches are out_edges[out_offsets[i]..out_offsets[i+1]].
    pub(crate) out_offsets: Vec<usize>,
    pub(crate) out_edges: Vec<EdgeId>,

    /// node i's incoming reaches are in_edges[in_offsets[i]..in_offsets[i+1]].
    pub(crate) in_offsets: Vec<usize>,
    pub(crate) in_edges: Vec<EdgeId>,

    pub(crate) index: ReachIndex,
}

impl RiverNetwork {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all reaches.
    pub fn reaches(&self) -> &[Reach] {
        &self.reaches
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.as_usize())
    }

    pub fn reach(&self, id: EdgeId) -> Option<&Reach> {
        self.reaches.get(id.as_usize())
    }

    /// Look up a reach by its source identifier.
    pub fn reach_by_id(&self, reach_id: &ReachId) -> Option<&Reach> {
        self.index.get(reach_id).and_then(|id| self.reach(id))
    }

    pub fn index(&self) -> &ReachIndex {
        &self.index
    }

    /// Reaches flowing out of a node (downstream direction).
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        Self::slice(&self.out_offsets, &self.out_edges, node)
    }

    /// Reaches flowing into a node (upstream direction).
    pub fn incoming(&self, node: NodeId) -> &[EdgeId] {
        Self::slice(&self.in_offsets, &self.in_edges, node)
    }

    /// Nodes with no incoming reach (river sources).
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| self.incoming(id).is_empty())
    }

    /// Nodes with no outgoing reach (outlets, or dangling ends).
    pub fn sinks(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| self.outgoing(id).is_empty())
    }

    fn slice<'a>(offsets: &[usize], flat: &'a [EdgeId], node: NodeId) -> &'a [EdgeId] {
        let idx = node.as_usize();
        if idx + 1 >= offsets.len() {
            return &[];
        }
        &flat[offsets[idx]..offsets[idx + 1]]
    }
}
