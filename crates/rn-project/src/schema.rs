//! Dataset schema definitions.

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};

/// Supported dataset format version.
pub const DATASET_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub config: NetworkConfig,
    #[serde(default)]
    pub reaches: Vec<ReachDef>,
    #[serde(default)]
    pub outlets: Vec<PointDef>,
    #[serde(default)]
    pub stations: Vec<StationDef>,
}

/// Run parameters; every field may be omitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Distance under which two points are the same junction; `0.0` is exact.
    pub touch_tolerance: f64,
    /// Maximum station-to-reach snapping distance; `None` disables snapping.
    pub station_snap_distance: Option<f64>,
    pub parallel_upstream: bool,
    /// Hard cap on resolver passes.
    pub max_iterations: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            touch_tolerance: 0.0,
            station_snap_distance: Some(1500.0),
            parallel_upstream: true,
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReachDef {
    pub id: String,
    /// Water-body classification code carried through untouched.
    #[serde(default)]
    pub code: i64,
    /// Vertices as `[x, y]`, in the direction they were digitised.
    pub coordinates: Vec<[f64; 2]>,
}

impl ReachDef {
    pub fn line_string(&self) -> LineString<f64> {
        self.coordinates
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointDef {
    pub x: f64,
    pub y: f64,
}

impl PointDef {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Explicit reach id; takes precedence over the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<String>,
}

impl StationDef {
    pub fn point(&self) -> Option<Point<f64>> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_config_uses_defaults() {
        let yaml = r#"
version: 1
name: bare
reaches:
  - id: r1
    coordinates: [[0.0, 0.0], [0.0, 10.0]]
"#;
        let dataset: Dataset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dataset.config, NetworkConfig::default());
        assert_eq!(dataset.reaches[0].code, 0);
        assert!(dataset.outlets.is_empty());
        assert_eq!(dataset.reaches[0].line_string().0.len(), 2);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let yaml = r#"
version: 1
name: tuned
config:
  touch_tolerance: 0.5
  station_snap_distance: null
"#;
        let dataset: Dataset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dataset.config.touch_tolerance, 0.5);
        assert_eq!(dataset.config.station_snap_distance, None);
        assert!(dataset.config.parallel_upstream);
    }

    #[test]
    fn station_point_needs_both_coordinates() {
        let station = StationDef {
            id: "s".to_string(),
            name: None,
            x: Some(1.0),
            y: None,
            reach: None,
        };
        assert_eq!(station.point(), None);
    }
}
