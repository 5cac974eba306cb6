//! Network validation logic.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rn_core::geometry::{end_point, start_point, touches};
use rn_core::{EdgeId, NodeId, Real, RnResult};

use crate::error::{GraphError, ReachEnd};
use crate::graph::{Node, Reach};

/// Validate the network structure: all references exist and every reach
/// geometry runs from its start node to its end node.
pub(crate) fn validate_structure(
    nodes: &[Node],
    reaches: &[Reach],
    touch_tolerance: Real,
) -> RnResult<()> {
    // Check that IDs are contiguous and match their indices
    for (i, node) in nodes.iter().enumerate() {
        if node.id.as_usize() != i {
            return Err(GraphError::IdNotFound {
                what: format!("node {} stored at position {}", node.id, i),
            }
            .into());
        }
    }
    for (i, reach) in reaches.iter().enumerate() {
        if reach.id.as_usize() != i {
            return Err(GraphError::IdNotFound {
                what: format!("reach {} stored at position {}", reach.reach_id, i),
            }
            .into());
        }
    }

    for reach in reaches {
        for node in [reach.start, reach.end] {
            if node.as_usize() >= nodes.len() {
                return Err(GraphError::InvalidNodeRef {
                    reach: reach.reach_id.clone(),
                    node,
                }
                .into());
            }
        }

        if reach.start == reach.end {
            return Err(GraphError::SelfLoop {
                reach: reach.reach_id.clone(),
            }
            .into());
        }

        // Orientation: geometry start on the start node, end on the end node
        let endpoints = [
            (ReachEnd::Start, start_point(&reach.geometry), reach.start),
            (ReachEnd::End, end_point(&reach.geometry), reach.end),
        ];
        for (end, point, node) in endpoints {
            let node_point = nodes[node.as_usize()].point;
            let on_node = point.is_some_and(|p| touches(p, node_point, touch_tolerance));
            if !on_node {
                return Err(GraphError::OrientationMismatch {
                    reach: reach.reach_id.clone(),
                    end,
                    node,
                }
                .into());
            }
        }
    }

    Ok(())
}

/// Validate one adjacency direction for consistency.
pub(crate) fn validate_adjacency(
    reaches: &[Reach],
    offsets: &[usize],
    flat: &[EdgeId],
    key: impl Fn(&Reach) -> NodeId,
) -> RnResult<()> {
    let mut seen = vec![false; reaches.len()];
    for node_idx in 0..offsets.len().saturating_sub(1) {
        let node = NodeId::from_usize(node_idx);
        for &edge in &flat[offsets[node_idx]..offsets[node_idx + 1]] {
            let Some(reach) = reaches.get(edge.as_usize()) else {
                return Err(GraphError::InconsistentAdjacency { edge, node }.into());
            };
            // Reach must reference this node, and appear only once
            if key(reach) != node || std::mem::replace(&mut seen[edge.as_usize()], true) {
                return Err(GraphError::InconsistentAdjacency { edge, node }.into());
            }
        }
    }

    if let Some(missing) = seen.iter().position(|s| !s) {
        let reach = &reaches[missing];
        return Err(GraphError::InconsistentAdjacency {
            edge: reach.id,
            node: key(reach),
        }
        .into());
    }

    Ok(())
}

/// Reject any directed cycle: no reach may be its own upstream.
pub(crate) fn validate_acyclic(node_count: usize, reaches: &[Reach]) -> RnResult<()> {
    let mut g: DiGraph<(), EdgeId, u32> = DiGraph::with_capacity(node_count, reaches.len());
    for _ in 0..node_count {
        g.add_node(());
    }
    for reach in reaches {
        g.add_edge(
            NodeIndex::new(reach.start.as_usize()),
            NodeIndex::new(reach.end.as_usize()),
            reach.id,
        );
    }

    toposort(&g, None).map(|_| ()).map_err(|cycle| {
        GraphError::CycleDetected {
            node: NodeId::from_usize(cycle.node_id().index()),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};
    use rn_core::{ReachId, RnError, m};

    fn node(i: u32, x: f64, y: f64) -> Node {
        Node {
            id: NodeId::from_index(i),
            point: Point::new(x, y),
        }
    }

    fn reach(i: u32, start: u32, end: u32, coords: Vec<(f64, f64)>) -> Reach {
        Reach {
            id: EdgeId::from_index(i),
            reach_id: ReachId::new(format!("r{i}")),
            code: 0,
            start: NodeId::from_index(start),
            end: NodeId::from_index(end),
            geometry: LineString::from(coords),
            length: m(1.0),
        }
    }

    #[test]
    fn validate_empty_network() {
        assert!(validate_structure(&[], &[], 0.0).is_ok());
        assert!(validate_acyclic(0, &[]).is_ok());
    }

    #[test]
    fn validate_invalid_node_ref() {
        let nodes = vec![node(0, 0.0, 0.0)];
        let reaches = vec![reach(0, 0, 99, vec![(0.0, 0.0), (1.0, 0.0)])];

        let result = validate_structure(&nodes, &reaches, 0.0);
        assert!(matches!(result, Err(RnError::Invariant { .. })));
    }

    #[test]
    fn validate_self_loop() {
        let nodes = vec![node(0, 0.0, 0.0)];
        let reaches = vec![reach(0, 0, 0, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])];
        let err = validate_structure(&nodes, &reaches, 0.0).unwrap_err();
        assert!(err.to_string().contains("loop"));
    }

    #[test]
    fn validate_detects_cycle() {
        // 0 -> 1 -> 2 -> 0
        let reaches = vec![
            reach(0, 0, 1, vec![(0.0, 0.0), (1.0, 0.0)]),
            reach(1, 1, 2, vec![(1.0, 0.0), (1.0, 1.0)]),
            reach(2, 2, 0, vec![(1.0, 1.0), (0.0, 0.0)]),
        ];
        let err = validate_acyclic(3, &reaches).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn parallel_reaches_are_not_a_cycle() {
        let reaches = vec![
            reach(0, 0, 1, vec![(0.0, 0.0), (1.0, 0.0)]),
            reach(1, 0, 1, vec![(0.0, 0.0), (0.5, 0.5), (1.0, 0.0)]),
        ];
        assert!(validate_acyclic(2, &reaches).is_ok());
    }
}
