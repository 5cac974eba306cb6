//! Incremental network builder.

use geo::{LineString, Point};
use rn_core::geometry::line_length;
use rn_core::{EdgeId, NodeId, Real, ReachId, RnResult};

use crate::graph::{Node, Reach, RiverNetwork};
use crate::indexing::ReachIndex;
use crate::validate;

/// Builder for constructing a river network incrementally.
///
/// Use `add_node` and `add_reach` to build up the network,
/// then call `build()` to validate and freeze it into an immutable `RiverNetwork`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    reaches: Vec<Reach>,
    touch_tolerance: Real,
}

impl NetworkBuilder {
    /// Create a new empty builder (exact endpoint matching).
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance under which a reach endpoint counts as lying on its node.
    pub fn with_touch_tolerance(mut self, tolerance: Real) -> Self {
        self.touch_tolerance = tolerance;
        self
    }

    /// Add a node at `point` and return its ID.
    pub fn add_node(&mut self, point: Point<Real>) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node { id, point });
        id
    }

    /// Add a reach flowing from `start` to `end` and return its ID.
    ///
    /// The geometry must already be oriented downstream; `build()` checks it.
    pub fn add_reach(
        &mut self,
        reach_id: impl Into<ReachId>,
        code: i64,
        start: NodeId,
        end: NodeId,
        geometry: LineString<Real>,
    ) -> EdgeId {
        let id = EdgeId::from_usize(self.reaches.len());
        let length = line_length(&geometry);
        self.reaches.push(Reach {
            id,
            reach_id: reach_id.into(),
            code,
            start,
            end,
            geometry,
            length,
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn reach_count(&self) -> usize {
        self.reaches.len()
    }

    /// Build and validate the network, returning an immutable `RiverNetwork`.
    ///
    /// This performs validation and constructs compact adjacency lists.
    pub fn build(self) -> RnResult<RiverNetwork> {
        // First validate the structure
        validate::validate_structure(&self.nodes, &self.reaches, self.touch_tolerance)?;

        let index = ReachIndex::from_reaches(&self.reaches)?;

        let (out_offsets, out_edges) =
            Self::build_adjacency(self.nodes.len(), &self.reaches, |r| r.start);
        let (in_offsets, in_edges) =
            Self::build_adjacency(self.nodes.len(), &self.reaches, |r| r.end);

        validate::validate_adjacency(&self.reaches, &out_offsets, &out_edges, |r| r.start)?;
        validate::validate_adjacency(&self.reaches, &in_offsets, &in_edges, |r| r.end)?;

        // Flow must never return to its own upstream
        validate::validate_acyclic(self.nodes.len(), &self.reaches)?;

        Ok(RiverNetwork {
            nodes: self.nodes,
            reaches: self.reaches,
            out_offsets,
            out_edges,
            in_offsets,
            in_edges,
            index,
        })
    }

    /// Build compact adjacency lists: for each node, collect the reaches
    /// whose `key` endpoint is that node, in reach-ID order.
    fn build_adjacency(
        node_count: usize,
        reaches: &[Reach],
        key: impl Fn(&Reach) -> NodeId,
    ) -> (Vec<usize>, Vec<EdgeId>) {
        let mut counts = vec![0usize; node_count];
        for reach in reaches {
            counts[key(reach).as_usize()] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        for c in &counts {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + c);
        }

        // Reaches are visited in ID order, so each bucket stays sorted
        let mut cursor = offsets.clone();
        let mut flat = vec![EdgeId::from_index(0); reaches.len()];
        for reach in reaches {
            let n = key(reach).as_usize();
            flat[cursor[n]] = reach.id;
            cursor[n] += 1;
        }

        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_core::{RnError, in_m};

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node(Point::new(0.0, 10.0));
        let n2 = builder.add_node(Point::new(0.0, 0.0));
        let r1 = builder.add_reach(
            "r1",
            6224,
            n1,
            n2,
            LineString::from(vec![(0.0, 10.0), (0.0, 0.0)]),
        );

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(r1.index(), 0);
        assert_eq!(builder.node_count(), 2);
        assert_eq!(builder.reach_count(), 1);
        assert_eq!(in_m(builder.reaches[0].length), 10.0);
    }

    #[test]
    fn builder_build_simple() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node(Point::new(0.0, 10.0));
        let n2 = builder.add_node(Point::new(0.0, 0.0));
        builder.add_reach("r1", 0, n1, n2, LineString::from(vec![(0.0, 10.0), (0.0, 0.0)]));

        let network = builder.build().unwrap();
        assert_eq!(network.nodes().len(), 2);
        assert_eq!(network.reaches().len(), 1);
        assert_eq!(network.outgoing(n1).len(), 1);
        assert_eq!(network.incoming(n2).len(), 1);
        assert!(network.incoming(n1).is_empty());
    }

    #[test]
    fn build_rejects_reversed_geometry() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node(Point::new(0.0, 10.0));
        let n2 = builder.add_node(Point::new(0.0, 0.0));
        // Geometry drawn upstream while start/end say downstream
        builder.add_reach("r1", 0, n1, n2, LineString::from(vec![(0.0, 0.0), (0.0, 10.0)]));

        let err = builder.build().unwrap_err();
        assert!(matches!(err, RnError::Invariant { .. }));
        assert!(err.to_string().contains("r1"));
    }

    #[test]
    fn tolerance_allows_near_endpoints() {
        let mut builder = NetworkBuilder::new().with_touch_tolerance(0.01);
        let n1 = builder.add_node(Point::new(0.0, 10.0));
        let n2 = builder.add_node(Point::new(0.0, 0.0));
        builder.add_reach("r1", 0, n1, n2, LineString::from(vec![(0.0, 10.005), (0.0, 0.0)]));
        assert!(builder.build().is_ok());
    }
}
