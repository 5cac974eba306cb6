//! Fixed-point topology resolution.
//!
//! Starting from the outlet points, each pass:
//! 1. reverses unresolved reaches whose start lies on a known node,
//! 2. attaches unresolved reaches to the known node at their end,
//! 3. gives every reach with a known end a start node, reusing a node
//!    already at that point or creating one.
//!
//! Nodes are only discovered upstream of what is already known, so a
//! reach always flows from a newer node to an older one
//! (`start.id > end.id`) and the result is acyclic. The loop stops when
//! a pass connects nothing; whatever is left is reported as unresolved.

use geo::{LineString, Point};
use rn_core::geometry::{end_point, is_degenerate, reverse, start_point};
use rn_core::{NodeId, Real, ReachId, RnError, RnResult, ensure_non_negative};
use rn_graph::{NetworkBuilder, ReachEnd, RiverNetwork};
use tracing::{debug, info, warn};

use crate::locator::NodeLocator;
use crate::report::{AmbiguousJunction, TopologyReport};

/// An undirected river line as read from the source data.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReach {
    pub reach_id: ReachId,
    pub code: i64,
    pub geometry: LineString<Real>,
}

impl RawReach {
    pub fn new(reach_id: impl Into<ReachId>, code: i64, geometry: LineString<Real>) -> Self {
        Self {
            reach_id: reach_id.into(),
            code,
            geometry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Seeded from an outlet point; flow leaves the network here.
    Outlet,
    /// Discovered at the start of a reach.
    Junction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub id: NodeId,
    pub point: Point<Real>,
    pub role: NodeRole,
}

/// A reach after resolution, in input order.
///
/// `geometry` is oriented downstream whenever `end` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReach {
    pub reach_id: ReachId,
    pub code: i64,
    pub geometry: LineString<Real>,
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
    /// Geometry was flipped relative to the input.
    pub reversed: bool,
    /// Dropped as degenerate; never resolved.
    pub excluded: bool,
}

impl ResolvedReach {
    pub fn is_resolved(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverOptions {
    /// Distance under which two points are the same junction; `0.0` is exact.
    pub touch_tolerance: Real,
    /// Hard cap on passes, on top of the zero-progress stop.
    pub max_iterations: Option<usize>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            touch_tolerance: 0.0,
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopologyResolver {
    options: ResolverOptions,
}

impl TopologyResolver {
    pub fn new(options: ResolverOptions) -> RnResult<Self> {
        ensure_non_negative(options.touch_tolerance, "touch_tolerance")?;
        if options.max_iterations == Some(0) {
            return Err(RnError::InvalidArg {
                what: "max_iterations must be at least 1".to_string(),
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve nodes and orientation for `reaches`, seeded by `outlets`.
    ///
    /// Never fails on bad data: unreachable, degenerate and ambiguous
    /// reaches are listed in the returned report.
    pub fn resolve(&self, reaches: Vec<RawReach>, outlets: &[Point<Real>]) -> Resolution {
        info!(
            reaches = reaches.len(),
            outlets = outlets.len(),
            tolerance = self.options.touch_tolerance,
            "resolving river topology"
        );

        let mut state = ResolveState::new(self.options, reaches, outlets);
        state.run();

        let resolution = state.finish();
        info!(
            nodes = resolution.nodes.len(),
            resolved = resolution.resolved_reaches().count(),
            unresolved = resolution.report.unresolved.len(),
            iterations = resolution.report.iterations,
            "topology resolved"
        );
        resolution
    }
}

/// Output of the resolver: every node, every reach, and the findings.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub nodes: Vec<ResolvedNode>,
    pub reaches: Vec<ResolvedReach>,
    pub report: TopologyReport,
    touch_tolerance: Real,
}

impl Resolution {
    pub fn resolved_reaches(&self) -> impl Iterator<Item = &ResolvedReach> {
        self.reaches.iter().filter(|r| r.is_resolved())
    }

    /// Freeze the resolved part into a validated `RiverNetwork`.
    ///
    /// Node ids carry over unchanged; unresolved and excluded reaches
    /// are left out.
    pub fn to_network(&self) -> RnResult<RiverNetwork> {
        let mut builder = NetworkBuilder::new().with_touch_tolerance(self.touch_tolerance);
        for node in &self.nodes {
            let id = builder.add_node(node.point);
            if id != node.id {
                return Err(RnError::Invariant {
                    what: format!("node {} rebuilt as {}", node.id, id),
                });
            }
        }
        for reach in &self.reaches {
            if let (Some(start), Some(end)) = (reach.start, reach.end) {
                builder.add_reach(
                    reach.reach_id.clone(),
                    reach.code,
                    start,
                    end,
                    reach.geometry.clone(),
                );
            }
        }
        builder.build()
    }
}

struct ResolveState {
    options: ResolverOptions,
    nodes: Vec<ResolvedNode>,
    locator: NodeLocator,
    reaches: Vec<ResolvedReach>,
    report: TopologyReport,
}

impl ResolveState {
    fn new(options: ResolverOptions, raw: Vec<RawReach>, outlets: &[Point<Real>]) -> Self {
        let mut state = Self {
            options,
            nodes: Vec::new(),
            locator: NodeLocator::new(options.touch_tolerance),
            reaches: Vec::with_capacity(raw.len()),
            report: TopologyReport::default(),
        };

        for &point in outlets {
            state.add_node(point, NodeRole::Outlet);
        }

        for r in raw {
            let excluded = is_degenerate(&r.geometry, options.touch_tolerance);
            if excluded {
                warn!(reach = %r.reach_id, "degenerate reach excluded");
                state.report.degenerate.push(r.reach_id.clone());
            }
            state.reaches.push(ResolvedReach {
                reach_id: r.reach_id,
                code: r.code,
                geometry: r.geometry,
                start: None,
                end: None,
                reversed: false,
                excluded,
            });
        }

        state
    }

    fn run(&mut self) {
        let mut pending: Vec<usize> = (0..self.reaches.len())
            .filter(|&i| !self.reaches[i].excluded)
            .collect();

        while !pending.is_empty() {
            if let Some(limit) = self.options.max_iterations {
                if self.report.iterations >= limit {
                    warn!(limit, remaining = pending.len(), "resolver pass limit reached");
                    self.report.hit_iteration_limit = true;
                    break;
                }
            }
            self.report.iterations += 1;
            let nodes_before = self.nodes.len();

            self.orient(&mut pending);
            self.assign_ends(&pending);
            let resolved = self.assign_starts(&pending);

            pending.retain(|&i| self.reaches[i].end.is_none());
            debug!(
                iteration = self.report.iterations,
                resolved,
                created = self.nodes.len() - nodes_before,
                remaining = pending.len(),
                "resolver pass"
            );

            if resolved == 0 {
                break;
            }
        }

        for &i in &pending {
            let reach_id = &self.reaches[i].reach_id;
            warn!(reach = %reach_id, "reach not connected to any outlet");
            self.report.unresolved.push(reach_id.clone());
        }
    }

    /// Step 1: point every pending reach that touches a known node towards it.
    fn orient(&mut self, pending: &mut Vec<usize>) {
        let mut looped = Vec::new();
        for &i in pending.iter() {
            let reach = &mut self.reaches[i];
            let (Some(s), Some(e)) = (start_point(&reach.geometry), end_point(&reach.geometry))
            else {
                continue;
            };

            let flip = match (self.locator.first(s), self.locator.first(e)) {
                (Some(at_start), Some(at_end)) if at_start == at_end => {
                    looped.push(i);
                    false
                }
                // Both ends known: flow from the newer node to the older one
                (Some(at_start), Some(at_end)) => at_start < at_end,
                (Some(_), None) => true,
                _ => false,
            };
            if flip {
                reverse(&mut reach.geometry);
                reach.reversed = !reach.reversed;
            }
        }

        for &i in &looped {
            let reach = &mut self.reaches[i];
            warn!(reach = %reach.reach_id, "reach starts and ends on the same node; excluded");
            reach.excluded = true;
            self.report.degenerate.push(reach.reach_id.clone());
        }
        pending.retain(|i| !looped.contains(i));
    }

    /// Step 2: attach pending reaches to the known node at their end.
    fn assign_ends(&mut self, pending: &[usize]) {
        for &i in pending {
            let reach = &mut self.reaches[i];
            let Some(e) = end_point(&reach.geometry) else {
                continue;
            };
            let candidates = self.locator.find(e);
            let Some(&node) = candidates.first() else {
                continue;
            };
            if candidates.len() > 1 {
                note_ambiguity(&mut self.report, &reach.reach_id, ReachEnd::End, e, candidates);
            }
            reach.end = Some(node);
        }
    }

    /// Step 3: give every reach with an end node a start node.
    fn assign_starts(&mut self, pending: &[usize]) -> usize {
        let mut resolved = 0;
        for &i in pending {
            let reach = &self.reaches[i];
            if reach.end.is_none() || reach.start.is_some() {
                continue;
            }
            let Some(s) = start_point(&reach.geometry) else {
                continue;
            };

            let candidates = self.locator.find(s);
            let node = match candidates.first() {
                Some(&existing) => {
                    if candidates.len() > 1 {
                        note_ambiguity(&mut self.report, &reach.reach_id, ReachEnd::Start, s, candidates);
                    }
                    existing
                }
                None => self.add_node(s, NodeRole::Junction),
            };

            let reach = &mut self.reaches[i];
            debug_assert!(reach.end.is_some_and(|end| node > end));
            reach.start = Some(node);
            resolved += 1;
        }
        resolved
    }

    fn add_node(&mut self, point: Point<Real>, role: NodeRole) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(ResolvedNode { id, point, role });
        self.locator.insert(id, point);
        id
    }

    fn finish(self) -> Resolution {
        Resolution {
            nodes: self.nodes,
            reaches: self.reaches,
            report: self.report,
            touch_tolerance: self.options.touch_tolerance,
        }
    }
}

fn note_ambiguity(
    report: &mut TopologyReport,
    reach: &ReachId,
    end: ReachEnd,
    point: Point<Real>,
    candidates: Vec<NodeId>,
) {
    warn!(reach = %reach, %end, candidates = candidates.len(), "ambiguous junction; using first node");
    report.ambiguous.push(AmbiguousJunction {
        reach: reach.clone(),
        end,
        point,
        candidates,
    });
}
