//! Data-quality findings from topology resolution.
//!
//! None of these abort a run; they are collected while resolving and
//! returned with the partial result.

use geo::Point;
use rn_core::{NodeId, Real, ReachId};
use rn_graph::ReachEnd;

/// An endpoint that touched more than one existing node.
/// The first candidate (lowest node id) was used.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousJunction {
    pub reach: ReachId,
    pub end: ReachEnd,
    pub point: Point<Real>,
    pub candidates: Vec<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyReport {
    /// Passes of the fixed-point loop that were run.
    pub iterations: usize,
    /// Reaches never connected to an outlet when the loop stopped.
    pub unresolved: Vec<ReachId>,
    /// Reaches that cannot carry a direction (closed or zero-length).
    pub degenerate: Vec<ReachId>,
    pub ambiguous: Vec<AmbiguousJunction>,
    /// The loop hit the configured pass limit before reaching a fixed point.
    pub hit_iteration_limit: bool,
}

impl TopologyReport {
    /// Every reach was connected to an outlet.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.unresolved.len() + self.degenerate.len() + self.ambiguous.len()
    }
}
