//! Point lookup for existing nodes.
//!
//! Buckets node points on a grid so each endpoint query only inspects
//! nearby nodes. With a zero tolerance the bucket key is the exact
//! coordinate bit pattern and a query is a single hash lookup.

use std::collections::HashMap;

use geo::Point;
use rn_core::geometry::touches;
use rn_core::{NodeId, Real};

#[derive(Debug, Clone)]
pub struct NodeLocator {
    tolerance: Real,
    points: Vec<(NodeId, Point<Real>)>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl NodeLocator {
    pub fn new(tolerance: Real) -> Self {
        Self {
            tolerance,
            points: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn insert(&mut self, id: NodeId, point: Point<Real>) {
        let slot = self.points.len();
        self.points.push((id, point));
        self.cells.entry(self.cell_of(point)).or_default().push(slot);
    }

    /// All nodes touching `point`, in insertion order.
    pub fn find(&self, point: Point<Real>) -> Vec<NodeId> {
        let mut slots: Vec<usize> = self
            .candidate_cells(point)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .filter(|&slot| touches(self.points[slot].1, point, self.tolerance))
            .collect();
        slots.sort_unstable();
        slots.into_iter().map(|slot| self.points[slot].0).collect()
    }

    /// First node touching `point`, in insertion order.
    pub fn first(&self, point: Point<Real>) -> Option<NodeId> {
        self.find(point).into_iter().next()
    }

    fn candidate_cells(&self, point: Point<Real>) -> impl Iterator<Item = (i64, i64)> {
        let (cx, cy) = self.cell_of(point);
        let reach = if self.tolerance == 0.0 { 0 } else { 1 };
        // Keys saturate for tiny tolerances; neighbours then share the edge cell
        (-reach..=reach).flat_map(move |dx| {
            (-reach..=reach).map(move |dy| (cx.saturating_add(dx), cy.saturating_add(dy)))
        })
    }

    fn cell_of(&self, point: Point<Real>) -> (i64, i64) {
        if self.tolerance == 0.0 {
            (exact_key(point.x()), exact_key(point.y()))
        } else {
            (
                (point.x() / self.tolerance).floor() as i64,
                (point.y() / self.tolerance).floor() as i64,
            )
        }
    }
}

fn exact_key(v: Real) -> i64 {
    // -0.0 == 0.0 must land in the same bucket
    let v = if v == 0.0 { 0.0 } else { v };
    v.to_bits() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup() {
        let mut locator = NodeLocator::new(0.0);
        locator.insert(NodeId::from_index(0), Point::new(1.0, 2.0));
        locator.insert(NodeId::from_index(1), Point::new(3.0, 4.0));

        assert_eq!(locator.first(Point::new(3.0, 4.0)), Some(NodeId::from_index(1)));
        assert_eq!(locator.first(Point::new(3.0, 4.000001)), None);
        assert_eq!(locator.len(), 2);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let mut locator = NodeLocator::new(0.0);
        locator.insert(NodeId::from_index(0), Point::new(0.0, 5.0));
        assert_eq!(locator.first(Point::new(-0.0, 5.0)), Some(NodeId::from_index(0)));
    }

    #[test]
    fn tolerant_lookup_crosses_cell_boundaries() {
        let mut locator = NodeLocator::new(0.5);
        locator.insert(NodeId::from_index(0), Point::new(0.49, 0.0));
        // Neighbouring cell, within tolerance
        assert_eq!(locator.first(Point::new(0.51, 0.0)), Some(NodeId::from_index(0)));
        assert_eq!(locator.first(Point::new(1.2, 0.0)), None);
    }

    #[test]
    fn tiny_tolerance_far_from_origin() {
        // 4e20 cells out: the key saturates at i64::MAX
        let mut locator = NodeLocator::new(1e-15);
        locator.insert(NodeId::from_index(0), Point::new(400_000.0, 300_000.0));
        locator.insert(NodeId::from_index(1), Point::new(400_000.0, 300_001.0));
        locator.insert(NodeId::from_index(2), Point::new(-400_000.0, -300_000.0));

        assert_eq!(locator.find(Point::new(400_000.0, 300_000.0)), vec![NodeId::from_index(0)]);
        assert_eq!(locator.first(Point::new(-400_000.0, -300_000.0)), Some(NodeId::from_index(2)));
        assert_eq!(locator.first(Point::new(400_000.0, 300_000.5)), None);
    }

    #[test]
    fn coincident_nodes_come_back_in_insertion_order() {
        let mut locator = NodeLocator::new(0.0);
        locator.insert(NodeId::from_index(4), Point::new(7.0, 7.0));
        locator.insert(NodeId::from_index(2), Point::new(7.0, 7.0));
        assert_eq!(
            locator.find(Point::new(7.0, 7.0)),
            vec![NodeId::from_index(4), NodeId::from_index(2)]
        );
    }
}
