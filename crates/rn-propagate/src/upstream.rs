//! Cumulative upstream length.
//!
//! `upstream(e) = length(e) + Σ length(p)` over every reach `p` on some
//! path from a source into the start node of `e`. Shared ancestors of a
//! braided network are counted once.

use std::collections::HashMap;

use rayon::prelude::*;
use rn_core::{EdgeId, Length, NodeId, m};
use rn_graph::RiverNetwork;

/// All reaches draining into `node`, in ascending `EdgeId` order.
///
/// Walks incoming reaches against the flow; each node is expanded once.
pub fn ancestor_edges(network: &RiverNetwork, node: NodeId) -> Vec<EdgeId> {
    let mut seen = vec![false; network.nodes().len()];
    let mut stack = vec![node];
    let mut edges = Vec::new();
    if let Some(s) = seen.get_mut(node.as_usize()) {
        *s = true;
    }

    while let Some(current) = stack.pop() {
        for &edge in network.incoming(current) {
            edges.push(edge);
            let start = network.reaches()[edge.as_usize()].start;
            if !std::mem::replace(&mut seen[start.as_usize()], true) {
                stack.push(start);
            }
        }
    }

    edges.sort_unstable();
    edges
}

/// Total length of the reaches draining into `node`.
fn ancestor_length(network: &RiverNetwork, node: NodeId) -> Length {
    ancestor_edges(network, node)
        .into_iter()
        .fold(m(0.0), |acc, e| acc + network.reaches()[e.as_usize()].length)
}

/// Upstream length for every reach, indexed by `EdgeId`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamLengths {
    lengths: Vec<Length>,
}

impl UpstreamLengths {
    /// Compute upstream lengths for the whole network.
    ///
    /// The closure is evaluated once per distinct start node. With
    /// `parallel` the per-node closures run on the rayon pool; the
    /// result is identical either way.
    pub fn compute(network: &RiverNetwork, parallel: bool) -> Self {
        let mut starts: Vec<NodeId> = network.reaches().iter().map(|r| r.start).collect();
        starts.sort_unstable();
        starts.dedup();

        let sums: Vec<Length> = if parallel {
            starts
                .par_iter()
                .map(|&n| ancestor_length(network, n))
                .collect()
        } else {
            starts.iter().map(|&n| ancestor_length(network, n)).collect()
        };
        let by_node: HashMap<NodeId, Length> = starts.into_iter().zip(sums).collect();

        let lengths = network
            .reaches()
            .iter()
            .map(|r| r.length + by_node[&r.start])
            .collect();

        Self { lengths }
    }

    /// Upstream length of a reach (returns None if ID out of bounds).
    pub fn get(&self, edge: EdgeId) -> Option<Length> {
        self.lengths.get(edge.as_usize()).copied()
    }

    pub fn as_slice(&self) -> &[Length] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}
