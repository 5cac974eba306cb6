//! Run execution and report persistence.

use std::path::Path;

use rn_core::in_m;
use rn_graph::RiverNetwork;
use rn_project::schema::{Dataset, NetworkConfig};
use rn_propagate::{
    Calibration, GaugeState, PropagateOptions, PropagationReport, Propagator, Via, link_stations,
};
use rn_topology::{NodeRole, Resolution, ResolverOptions, TopologyResolver};
use tracing::info;

use crate::dataset_service;
use crate::error::{AppError, AppResult};
use crate::report::{
    AmbiguousEntry, Assignment, DuplicateEntry, GaugeEntry, IssueReport, NodeKind, NodeRecord,
    ReachRecord, ReachStatus, RunCounts, RunReport, UnmatchedEntry,
};

/// Command-line adjustments applied on top of the dataset's `config`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub touch_tolerance: Option<f64>,
    pub station_snap_distance: Option<f64>,
    pub disable_snapping: bool,
    pub sequential: bool,
    pub max_iterations: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: NetworkConfig) -> NetworkConfig {
        if let Some(t) = self.touch_tolerance {
            config.touch_tolerance = t;
        }
        if let Some(d) = self.station_snap_distance {
            config.station_snap_distance = Some(d);
        }
        if self.disable_snapping {
            config.station_snap_distance = None;
        }
        if self.sequential {
            config.parallel_upstream = false;
        }
        if self.max_iterations.is_some() {
            config.max_iterations = self.max_iterations;
        }
        config
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub dataset_path: &'a Path,
    pub overrides: ConfigOverrides,
    /// Where to write the JSON report, if anywhere.
    pub output_path: Option<&'a Path>,
}

/// Load, run, and optionally persist.
pub fn execute(request: &RunRequest) -> AppResult<RunReport> {
    let mut dataset = dataset_service::load_dataset(request.dataset_path)?;
    dataset.config = request.overrides.apply(dataset.config);
    dataset_service::validate_dataset(&dataset)?;

    let report = run_dataset(&dataset)?;
    if let Some(path) = request.output_path {
        save_report(path, &report)?;
    }
    Ok(report)
}

/// Resolve topology, link stations and propagate gauges for one dataset.
///
/// Data-quality findings end up in `RunReport::issues`; only structural
/// failures are errors.
pub fn run_dataset(dataset: &Dataset) -> AppResult<RunReport> {
    let config = dataset.config;

    let resolver = TopologyResolver::new(ResolverOptions {
        touch_tolerance: config.touch_tolerance,
        max_iterations: config.max_iterations,
    })?;
    let resolution = resolver.resolve(
        dataset_service::raw_reaches(dataset),
        &dataset_service::outlet_points(dataset),
    );
    let network = resolution.to_network()?;

    let mut findings = PropagationReport::default();
    let links = link_stations(
        &network,
        &dataset_service::stations(dataset),
        config.station_snap_distance,
        &mut findings,
    );
    let (calibration, propagated) = Propagator::new(
        &network,
        PropagateOptions {
            parallel_upstream: config.parallel_upstream,
        },
    )
    .run(&links)?;
    findings.missing_references = propagated.missing_references;
    findings.duplicate_gauges = propagated.duplicate_gauges;

    let report = build_report(dataset, &resolution, &network, &calibration, &findings);
    info!(
        name = %report.name,
        nodes = report.counts.nodes,
        resolved = report.counts.resolved,
        gauged = report.counts.gauged,
        calibrated = report.counts.calibrated,
        issues = report.counts.issues,
        "run complete"
    );
    Ok(report)
}

fn build_report(
    dataset: &Dataset,
    resolution: &Resolution,
    network: &RiverNetwork,
    calibration: &Calibration,
    findings: &PropagationReport,
) -> RunReport {
    let nodes = resolution
        .nodes
        .iter()
        .map(|n| NodeRecord {
            id: n.id.index(),
            x: n.point.x(),
            y: n.point.y(),
            kind: match n.role {
                NodeRole::Outlet => NodeKind::Outlet,
                NodeRole::Junction => NodeKind::Junction,
            },
        })
        .collect::<Vec<_>>();

    let reaches = resolution
        .reaches
        .iter()
        .map(|r| {
            let status = if r.excluded {
                ReachStatus::Degenerate
            } else if r.is_resolved() {
                ReachStatus::Resolved
            } else {
                ReachStatus::Unresolved
            };
            let mut record = ReachRecord {
                id: r.reach_id.clone(),
                code: r.code,
                status,
                reversed: r.reversed,
                coordinates: r.geometry.coords().map(|c| [c.x, c.y]).collect(),
                start: r.start.map(|n| n.index()),
                end: r.end.map(|n| n.index()),
                length_m: None,
                upstream_length_m: None,
                nearest_gauge: None,
                ratio: None,
                assignment: None,
            };
            if let Some(edge) = network.index().get(&r.reach_id) {
                record.length_m = Some(in_m(network.reaches()[edge.as_usize()].length));
                record.upstream_length_m = calibration.upstream_length(edge).map(in_m);
                if let Some(GaugeState::Assigned { gauge, ratio, via }) = calibration.state(edge) {
                    record.nearest_gauge = Some(network.index().reach_id(gauge).clone());
                    record.ratio = Some(ratio);
                    record.assignment = Some(match via {
                        Via::Gauge => Assignment::Gauge,
                        Via::Upstream => Assignment::Upstream,
                        Via::Downstream => Assignment::Downstream,
                    });
                }
            }
            record
        })
        .collect::<Vec<_>>();

    let gauges = calibration
        .gauges()
        .iter()
        .map(|g| GaugeEntry {
            station: g.station.clone(),
            reach: network.index().reach_id(g.edge).clone(),
        })
        .collect::<Vec<_>>();

    let topology = &resolution.report;
    let issues = IssueReport {
        iterations: topology.iterations,
        hit_iteration_limit: topology.hit_iteration_limit,
        unresolved: topology.unresolved.clone(),
        degenerate: topology.degenerate.clone(),
        ambiguous: topology
            .ambiguous
            .iter()
            .map(|a| AmbiguousEntry {
                reach: a.reach.clone(),
                end: a.end.to_string(),
                x: a.point.x(),
                y: a.point.y(),
                candidates: a.candidates.iter().map(|n| n.index()).collect(),
            })
            .collect(),
        missing_references: findings
            .missing_references
            .iter()
            .map(|m| GaugeEntry {
                station: m.station.clone(),
                reach: m.reach.clone(),
            })
            .collect(),
        unmatched_stations: findings
            .unmatched_stations
            .iter()
            .map(|u| UnmatchedEntry {
                station: u.station.clone(),
                nearest_reach: u.nearest.as_ref().map(|(r, _)| r.clone()),
                distance: u.nearest.as_ref().map(|(_, d)| *d),
            })
            .collect(),
        duplicate_gauges: findings
            .duplicate_gauges
            .iter()
            .map(|d| DuplicateEntry {
                station: d.station.clone(),
                reach: d.reach.clone(),
                kept: d.kept.clone(),
            })
            .collect(),
    };

    RunReport {
        name: dataset.name.clone(),
        config: dataset.config,
        counts: RunCounts {
            nodes: nodes.len(),
            reaches: reaches.len(),
            resolved: network.reaches().len(),
            gauged: gauges.len(),
            calibrated: calibration.assigned_count(),
            issues: issues.count(),
        },
        nodes,
        reaches,
        gauges,
        issues,
    }
}

pub fn save_report(path: &Path, report: &RunReport) -> AppResult<()> {
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content).map_err(|e| AppError::ReportFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

pub fn load_report(path: &Path) -> AppResult<RunReport> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ReportFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}
