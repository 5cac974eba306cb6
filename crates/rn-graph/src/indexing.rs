//! Reach identifier lookup.
//!
//! Provides bidirectional mappings between source-data reach identifiers
//! (`ReachId`) and dense graph handles (`EdgeId`).

use std::collections::HashMap;

use rn_core::{EdgeId, ReachId, RnResult};

use crate::error::GraphError;
use crate::graph::Reach;

/// Index map from `ReachId` to `EdgeId` and back.
///
/// Station lookups and report consumers speak `ReachId`; traversal code
/// speaks `EdgeId`. Provides O(1) lookup in both directions.
#[derive(Debug, Clone, Default)]
pub struct ReachIndex {
    /// Dense list of reach identifiers (EdgeId index -> ReachId).
    reach_ids: Vec<ReachId>,

    /// Reverse lookup: ReachId -> EdgeId.
    edge_ids: HashMap<ReachId, EdgeId>,
}

impl ReachIndex {
    /// Build an index from reaches stored in ID order.
    pub(crate) fn from_reaches(reaches: &[Reach]) -> RnResult<Self> {
        let mut edge_ids = HashMap::with_capacity(reaches.len());
        for reach in reaches {
            if edge_ids.insert(reach.reach_id.clone(), reach.id).is_some() {
                return Err(GraphError::DuplicateReach {
                    reach: reach.reach_id.clone(),
                }
                .into());
            }
        }

        Ok(Self {
            reach_ids: reaches.iter().map(|r| r.reach_id.clone()).collect(),
            edge_ids,
        })
    }

    /// Number of reaches in the index.
    pub fn len(&self) -> usize {
        self.reach_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reach_ids.is_empty()
    }

    /// Graph handle for a reach identifier, if present.
    pub fn get(&self, reach_id: &ReachId) -> Option<EdgeId> {
        self.edge_ids.get(reach_id).copied()
    }

    /// Graph handle for a reach identifier, failing if absent.
    pub fn edge_id(&self, reach_id: &ReachId) -> RnResult<EdgeId> {
        self.get(reach_id).ok_or_else(|| {
            GraphError::IdNotFound {
                what: format!("ReachId {}", reach_id),
            }
            .into()
        })
    }

    /// Reach identifier for a graph handle (panics if out of bounds).
    pub fn reach_id(&self, id: EdgeId) -> &ReachId {
        &self.reach_ids[id.as_usize()]
    }

    /// All reach identifiers in EdgeId order.
    pub fn reach_ids(&self) -> &[ReachId] {
        &self.reach_ids
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::NetworkBuilder;
    use geo::{LineString, Point};
    use rn_core::{RnError, ReachId};

    #[test]
    fn index_round_trip() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node(Point::new(0.0, 2.0));
        let n2 = builder.add_node(Point::new(0.0, 1.0));
        let n3 = builder.add_node(Point::new(0.0, 0.0));
        let a = builder.add_reach("A", 0, n1, n2, LineString::from(vec![(0.0, 2.0), (0.0, 1.0)]));
        let b = builder.add_reach("B", 0, n2, n3, LineString::from(vec![(0.0, 1.0), (0.0, 0.0)]));
        let network = builder.build().unwrap();

        let index = network.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&ReachId::from("A")), Some(a));
        assert_eq!(index.edge_id(&ReachId::from("B")).unwrap(), b);
        assert_eq!(index.reach_id(b).as_str(), "B");
        assert!(index.get(&ReachId::from("missing")).is_none());
        assert!(index.edge_id(&ReachId::from("missing")).is_err());
    }

    #[test]
    fn duplicate_reach_ids_rejected() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node(Point::new(0.0, 1.0));
        let n2 = builder.add_node(Point::new(0.0, 0.0));
        let line = LineString::from(vec![(0.0, 1.0), (0.0, 0.0)]);
        builder.add_reach("A", 0, n1, n2, line.clone());
        builder.add_reach("A", 0, n1, n2, line);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, RnError::Invariant { .. }));
        assert!(err.to_string().contains("more than once"));
    }
}
