//! Station-to-reach linking.
//!
//! A station either names its reach directly or is snapped to the
//! nearest resolved reach within a maximum distance.

use geo::Point;
use rn_core::geometry::distance_to_line;
use rn_core::{Real, ReachId, StationId};
use rn_graph::RiverNetwork;
use tracing::{debug, warn};

use crate::report::{PropagationReport, UnmatchedStation};

/// A gauging station as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub point: Option<Point<Real>>,
    /// Explicit reach; takes precedence over snapping.
    pub reach: Option<ReachId>,
}

/// One entry of the station → reach lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GaugeLink {
    pub station: StationId,
    pub reach: ReachId,
}

impl GaugeLink {
    pub fn new(station: impl Into<StationId>, reach: impl Into<ReachId>) -> Self {
        Self {
            station: station.into(),
            reach: reach.into(),
        }
    }
}

/// Nearest reach to `point`; ties go to the lower `EdgeId`.
pub fn nearest_reach(network: &RiverNetwork, point: Point<Real>) -> Option<(ReachId, Real)> {
    let mut best: Option<(usize, Real)> = None;
    for (i, reach) in network.reaches().iter().enumerate() {
        let Some(d) = distance_to_line(point, &reach.geometry) else {
            continue;
        };
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, d)| (network.reaches()[i].reach_id.clone(), d))
}

/// Build the station → reach lookup.
///
/// Explicit reaches are passed through unchecked; propagation reports
/// those missing from the network. Stations that cannot be placed are
/// added to `report`.
pub fn link_stations(
    network: &RiverNetwork,
    stations: &[Station],
    snap_distance: Option<Real>,
    report: &mut PropagationReport,
) -> Vec<GaugeLink> {
    let mut links = Vec::with_capacity(stations.len());

    for station in stations {
        if let Some(reach) = &station.reach {
            links.push(GaugeLink {
                station: station.id.clone(),
                reach: reach.clone(),
            });
            continue;
        }

        match station.point.and_then(|p| nearest_reach(network, p)) {
            Some((reach, d)) if snap_distance.is_some_and(|max| d <= max) => {
                debug!(station = %station.id, reach = %reach, distance = d, "station snapped");
                links.push(GaugeLink {
                    station: station.id.clone(),
                    reach,
                });
            }
            nearest => {
                warn!(station = %station.id, "station could not be linked to a reach");
                report.unmatched_stations.push(UnmatchedStation {
                    station: station.id.clone(),
                    nearest,
                });
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;
    use rn_graph::NetworkBuilder;

    fn two_channels() -> RiverNetwork {
        let mut b = NetworkBuilder::new();
        let sea_w = b.add_node(Point::new(0.0, 0.0));
        let sea_e = b.add_node(Point::new(100.0, 0.0));
        let src_w = b.add_node(Point::new(0.0, 50.0));
        let src_e = b.add_node(Point::new(100.0, 50.0));
        b.add_reach("west", 0, src_w, sea_w, LineString::from(vec![(0.0, 50.0), (0.0, 0.0)]));
        b.add_reach("east", 0, src_e, sea_e, LineString::from(vec![(100.0, 50.0), (100.0, 0.0)]));
        b.build().unwrap()
    }

    fn station(id: &str, point: Option<(f64, f64)>, reach: Option<&str>) -> Station {
        Station {
            id: StationId::from(id),
            point: point.map(Point::from),
            reach: reach.map(ReachId::from),
        }
    }

    #[test]
    fn explicit_reach_wins_over_point() {
        let network = two_channels();
        let mut report = PropagationReport::default();
        let links = link_stations(
            &network,
            &[station("s1", Some((1.0, 10.0)), Some("east"))],
            Some(1500.0),
            &mut report,
        );
        assert_eq!(links, vec![GaugeLink::new("s1", "east")]);
        assert!(report.is_clean());
    }

    #[test]
    fn snaps_to_nearest_within_distance() {
        let network = two_channels();
        let mut report = PropagationReport::default();
        let links = link_stations(
            &network,
            &[station("s1", Some((70.0, 25.0)), None)],
            Some(40.0),
            &mut report,
        );
        assert_eq!(links, vec![GaugeLink::new("s1", "east")]);
    }

    #[test]
    fn too_far_is_unmatched() {
        let network = two_channels();
        let mut report = PropagationReport::default();
        let links = link_stations(
            &network,
            &[station("s1", Some((50.0, 25.0)), None)],
            Some(10.0),
            &mut report,
        );
        assert!(links.is_empty());
        assert_eq!(report.unmatched_stations.len(), 1);
        let (reach, d) = report.unmatched_stations[0].nearest.clone().unwrap();
        // Equidistant: the lower EdgeId wins
        assert_eq!(reach.as_str(), "west");
        assert!((d - 50.0).abs() < 1e-12);
    }

    #[test]
    fn snapping_disabled_or_no_point_is_unmatched() {
        let network = two_channels();
        let mut report = PropagationReport::default();
        let links = link_stations(
            &network,
            &[station("a", Some((1.0, 1.0)), None), station("b", None, None)],
            None,
            &mut report,
        );
        assert!(links.is_empty());
        assert_eq!(report.unmatched_stations.len(), 2);
        assert!(report.unmatched_stations[1].nearest.is_none());
    }
}
