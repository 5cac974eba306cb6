//! Nearest-gauge propagation.
//!
//! Every gauged reach is first marked as its own gauge (ratio 1). Then,
//! one gauge at a time in station order, two searches flood outwards:
//! against the flow from the gauge's start node, and with the flow from
//! its end node. A reach takes the first gauge that reaches it and is
//! never reassigned. Searches still walk through reaches another gauge
//! already holds, so a gauge reaches everything connected to it in its
//! search direction; each search visits a node at most once.
//!
//! The ratio stored on a reach is `upstream(reach) / upstream(gauge)`.
//! Reaches above their gauge therefore sit in `(0, 1)`, reaches below it
//! above 1, and only gauges hold exactly 1.

use std::collections::HashMap;

use rn_core::{EdgeId, Length, NodeId, Ratio, Real, RnError, RnResult, StationId, ensure_finite, in_ratio};
use rn_graph::RiverNetwork;
use tracing::{debug, info, warn};

use crate::report::{DuplicateGauge, MissingGaugeReference, PropagationReport};
use crate::stations::GaugeLink;
use crate::upstream::UpstreamLengths;

/// How a reach received its gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    /// The reach is itself gauged.
    Gauge,
    /// Found walking upstream from the gauge.
    Upstream,
    /// Found walking downstream from the gauge.
    Downstream,
}

/// Per-reach gauge assignment. One-way: once assigned, never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeState {
    Unassigned,
    Assigned { gauge: EdgeId, ratio: Real, via: Via },
}

impl GaugeState {
    pub fn is_assigned(&self) -> bool {
        matches!(self, GaugeState::Assigned { .. })
    }
}

/// A gauged reach and the station that put it there.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeRecord {
    pub station: StationId,
    pub edge: EdgeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagateOptions {
    /// Evaluate upstream-length closures on the rayon pool.
    pub parallel_upstream: bool,
}

impl Default for PropagateOptions {
    fn default() -> Self {
        Self {
            parallel_upstream: true,
        }
    }
}

/// Result of a propagation run over one network.
#[derive(Debug, Clone)]
pub struct Calibration {
    upstream: UpstreamLengths,
    states: Vec<GaugeState>,
    gauges: Vec<GaugeRecord>,
}

impl Calibration {
    /// Upstream length of a reach (returns None if ID out of bounds).
    pub fn upstream_length(&self, edge: EdgeId) -> Option<Length> {
        self.upstream.get(edge)
    }

    pub fn upstream_lengths(&self) -> &UpstreamLengths {
        &self.upstream
    }

    /// Gauge assignment of a reach (returns None if ID out of bounds).
    pub fn state(&self, edge: EdgeId) -> Option<GaugeState> {
        self.states.get(edge.as_usize()).copied()
    }

    pub fn nearest_gauge(&self, edge: EdgeId) -> Option<EdgeId> {
        match self.state(edge)? {
            GaugeState::Assigned { gauge, .. } => Some(gauge),
            GaugeState::Unassigned => None,
        }
    }

    pub fn ratio(&self, edge: EdgeId) -> Option<Real> {
        match self.state(edge)? {
            GaugeState::Assigned { ratio, .. } => Some(ratio),
            GaugeState::Unassigned => None,
        }
    }

    /// Gauged reaches in processing order.
    pub fn gauges(&self) -> &[GaugeRecord] {
        &self.gauges
    }

    pub fn assigned_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_assigned()).count()
    }

    /// Reaches no gauge search reached.
    pub fn unassigned(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_assigned())
            .map(|(i, _)| EdgeId::from_usize(i))
    }
}

pub struct Propagator<'a> {
    network: &'a RiverNetwork,
    options: PropagateOptions,
}

impl<'a> Propagator<'a> {
    pub fn new(network: &'a RiverNetwork, options: PropagateOptions) -> Self {
        Self { network, options }
    }

    /// Compute upstream lengths and assign every reachable reach its gauge.
    ///
    /// Links are processed sorted by station id, then reach id, so the
    /// outcome does not depend on the order the caller supplies them in.
    /// Links naming unknown reaches and repeat gauges go to the report.
    pub fn run(&self, links: &[GaugeLink]) -> RnResult<(Calibration, PropagationReport)> {
        let upstream = UpstreamLengths::compute(self.network, self.options.parallel_upstream);
        let mut flood = Flood {
            network: self.network,
            upstream: &upstream,
            states: vec![GaugeState::Unassigned; self.network.reaches().len()],
        };
        let mut report = PropagationReport::default();

        let mut ordered: Vec<&GaugeLink> = links.iter().collect();
        ordered.sort();

        // Seed every gauge before any search, so no gauge is claimed by another
        let mut gauges = Vec::new();
        let mut owner: HashMap<EdgeId, StationId> = HashMap::new();
        for link in ordered {
            let Some(edge) = self.network.index().get(&link.reach) else {
                warn!(station = %link.station, reach = %link.reach, "gauge reach not in network");
                report.missing_references.push(MissingGaugeReference {
                    station: link.station.clone(),
                    reach: link.reach.clone(),
                });
                continue;
            };
            if let Some(kept) = owner.get(&edge) {
                warn!(station = %link.station, reach = %link.reach, kept = %kept, "reach already gauged");
                report.duplicate_gauges.push(DuplicateGauge {
                    station: link.station.clone(),
                    reach: link.reach.clone(),
                    kept: kept.clone(),
                });
                continue;
            }
            owner.insert(edge, link.station.clone());
            flood.states[edge.as_usize()] = GaugeState::Assigned {
                gauge: edge,
                ratio: 1.0,
                via: Via::Gauge,
            };
            gauges.push(GaugeRecord {
                station: link.station.clone(),
                edge,
            });
        }

        for record in &gauges {
            let reach = &self.network.reaches()[record.edge.as_usize()];
            let up = flood.search(record.edge, reach.start, Via::Upstream)?;
            let down = flood.search(record.edge, reach.end, Via::Downstream)?;
            debug!(station = %record.station, reach = %reach.reach_id, up, down, "gauge propagated");
        }

        let Flood { states, .. } = flood;
        let calibration = Calibration {
            upstream,
            states,
            gauges,
        };
        info!(
            reaches = self.network.reaches().len(),
            gauges = calibration.gauges.len(),
            assigned = calibration.assigned_count(),
            issues = report.issue_count(),
            "propagation complete"
        );
        Ok((calibration, report))
    }
}

struct Flood<'a> {
    network: &'a RiverNetwork,
    upstream: &'a UpstreamLengths,
    states: Vec<GaugeState>,
}

impl Flood<'_> {
    /// Depth-first walk from `from`, assigning `gauge` to every unassigned
    /// reach met. Reaches that already hold a gauge are walked through but
    /// left as they are. Returns the number of reaches assigned.
    fn search(&mut self, gauge: EdgeId, from: NodeId, via: Via) -> RnResult<usize> {
        let lengths = self.upstream.as_slice();
        let gauge_upstream = lengths[gauge.as_usize()];
        let mut visited = vec![false; self.network.nodes().len()];
        visited[from.as_usize()] = true;
        let mut stack = vec![from];
        let mut assigned = 0;

        while let Some(node) = stack.pop() {
            let next = match via {
                Via::Upstream => self.network.incoming(node),
                _ => self.network.outgoing(node),
            };
            for &edge in next {
                let reach = &self.network.reaches()[edge.as_usize()];
                let onward = match via {
                    Via::Upstream => reach.start,
                    _ => reach.end,
                };
                if !visited[onward.as_usize()] {
                    visited[onward.as_usize()] = true;
                    stack.push(onward);
                }
                if self.states[edge.as_usize()].is_assigned() {
                    continue;
                }
                let ratio: Ratio = lengths[edge.as_usize()] / gauge_upstream;
                let ratio = ensure_finite(in_ratio(ratio), "upstream length ratio")?;
                if ratio <= 0.0 {
                    return Err(RnError::Invariant {
                        what: format!("non-positive upstream length ratio on reach {}", edge),
                    });
                }
                self.states[edge.as_usize()] = GaugeState::Assigned { gauge, ratio, via };
                assigned += 1;
            }
        }

        Ok(assigned)
    }
}
