//! Data-integrity findings from gauge linking and propagation.

use rn_core::{Real, ReachId, StationId};

/// A station link naming a reach that is not in the resolved network.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingGaugeReference {
    pub station: StationId,
    pub reach: ReachId,
}

/// A station with no reach given and none close enough to snap to.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedStation {
    pub station: StationId,
    /// Closest reach and its distance, when there was any candidate.
    pub nearest: Option<(ReachId, Real)>,
}

/// A second station on an already gauged reach; the earlier one is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGauge {
    pub station: StationId,
    pub reach: ReachId,
    pub kept: StationId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationReport {
    pub missing_references: Vec<MissingGaugeReference>,
    pub unmatched_stations: Vec<UnmatchedStation>,
    pub duplicate_gauges: Vec<DuplicateGauge>,
}

impl PropagationReport {
    pub fn issue_count(&self) -> usize {
        self.missing_references.len() + self.unmatched_stations.len() + self.duplicate_gauges.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}
