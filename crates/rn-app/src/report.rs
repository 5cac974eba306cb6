//! Serializable run report.

use rn_core::{ReachId, StationId};
use rn_project::schema::NetworkConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub name: String,
    pub config: NetworkConfig,
    pub counts: RunCounts,
    pub nodes: Vec<NodeRecord>,
    /// Every input reach, in input order.
    pub reaches: Vec<ReachRecord>,
    /// Gauged reaches in processing order.
    pub gauges: Vec<GaugeEntry>,
    pub issues: IssueReport,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunCounts {
    pub nodes: usize,
    pub reaches: usize,
    pub resolved: usize,
    pub gauged: usize,
    pub calibrated: usize,
    pub issues: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Outlet,
    Junction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReachStatus {
    Resolved,
    Unresolved,
    Degenerate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    Gauge,
    Upstream,
    Downstream,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReachRecord {
    pub id: ReachId,
    pub code: i64,
    pub status: ReachStatus,
    /// Flipped relative to the input.
    pub reversed: bool,
    /// Vertices, oriented downstream when resolved.
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_gauge: Option<ReachId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaugeEntry {
    pub station: StationId,
    pub reach: ReachId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IssueReport {
    pub iterations: usize,
    pub hit_iteration_limit: bool,
    pub unresolved: Vec<ReachId>,
    pub degenerate: Vec<ReachId>,
    pub ambiguous: Vec<AmbiguousEntry>,
    pub missing_references: Vec<GaugeEntry>,
    pub unmatched_stations: Vec<UnmatchedEntry>,
    pub duplicate_gauges: Vec<DuplicateEntry>,
}

impl IssueReport {
    pub fn count(&self) -> usize {
        self.unresolved.len()
            + self.degenerate.len()
            + self.ambiguous.len()
            + self.missing_references.len()
            + self.unmatched_stations.len()
            + self.duplicate_gauges.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbiguousEntry {
    pub reach: ReachId,
    /// `start` or `end`.
    pub end: String,
    pub x: f64,
    pub y: f64,
    pub candidates: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnmatchedEntry {
    pub station: StationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_reach: Option<ReachId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicateEntry {
    pub station: StationId,
    pub reach: ReachId,
    pub kept: StationId,
}
