//! Planar geometry predicates used by topology resolution and station snapping.
//!
//! All geometries share one projected coordinate system; distances and
//! lengths are in its units (metres for the British National Grid).

use geo::{Closest, ClosestPoint, Euclidean, Length as GeoLength, LineString, Point};

use crate::numeric::Real;
use crate::units::{Length, m};

/// First vertex of a line.
pub fn start_point(line: &LineString<Real>) -> Option<Point<Real>> {
    line.0.first().copied().map(Point::from)
}

/// Last vertex of a line.
pub fn end_point(line: &LineString<Real>) -> Option<Point<Real>> {
    line.0.last().copied().map(Point::from)
}

/// Reverse vertex order in place, so start and end swap.
pub fn reverse(line: &mut LineString<Real>) {
    line.0.reverse();
}

/// Euclidean length of a line.
pub fn line_length(line: &LineString<Real>) -> Length {
    m(line.length::<Euclidean>())
}

pub fn planar_distance(a: Point<Real>, b: Point<Real>) -> Real {
    (a.x() - b.x()).hypot(a.y() - b.y())
}

/// Whether two points are the same junction.
///
/// A tolerance of `0.0` means exact coordinate equality.
pub fn touches(a: Point<Real>, b: Point<Real>, tolerance: Real) -> bool {
    if tolerance == 0.0 {
        return a.x() == b.x() && a.y() == b.y();
    }
    planar_distance(a, b) <= tolerance
}

/// A line that cannot carry a direction: fewer than two vertices,
/// or a start that touches its own end.
pub fn is_degenerate(line: &LineString<Real>, tolerance: Real) -> bool {
    match (start_point(line), end_point(line)) {
        (Some(s), Some(e)) if line.0.len() >= 2 => touches(s, e, tolerance),
        _ => true,
    }
}

/// Shortest distance from a point to a line, `None` for an empty line.
pub fn distance_to_line(point: Point<Real>, line: &LineString<Real>) -> Option<Real> {
    match line.closest_point(&point) {
        Closest::Intersection(_) => Some(0.0),
        Closest::SinglePoint(p) => Some(planar_distance(point, p)),
        Closest::Indeterminate => None,
    }
}
