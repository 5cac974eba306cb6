//! Dataset loading, validation, and conversion into pipeline inputs.

use std::path::Path;

use geo::Point;
use rn_core::{ReachId, StationId};
use rn_project::schema::Dataset;
use rn_propagate::Station;
use rn_topology::RawReach;

use crate::error::AppResult;

/// Headline counts of a dataset, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub name: String,
    pub reach_count: usize,
    pub outlet_count: usize,
    pub station_count: usize,
}

/// Load and validate a dataset; YAML or JSON by extension.
pub fn load_dataset(path: &Path) -> AppResult<Dataset> {
    Ok(rn_project::load(path)?)
}

pub fn validate_dataset(dataset: &Dataset) -> AppResult<()> {
    Ok(rn_project::validate_dataset(dataset)?)
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    DatasetSummary {
        name: dataset.name.clone(),
        reach_count: dataset.reaches.len(),
        outlet_count: dataset.outlets.len(),
        station_count: dataset.stations.len(),
    }
}

pub fn raw_reaches(dataset: &Dataset) -> Vec<RawReach> {
    dataset
        .reaches
        .iter()
        .map(|r| RawReach::new(r.id.as_str(), r.code, r.line_string()))
        .collect()
}

pub fn outlet_points(dataset: &Dataset) -> Vec<Point<f64>> {
    dataset.outlets.iter().map(|o| o.point()).collect()
}

pub fn stations(dataset: &Dataset) -> Vec<Station> {
    dataset
        .stations
        .iter()
        .map(|s| Station {
            id: StationId::new(s.id.as_str()),
            point: s.point(),
            reach: s.reach.as_deref().map(ReachId::from),
        })
        .collect()
}
