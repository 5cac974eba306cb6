//! Dataset validation logic.

use crate::schema::{DATASET_VERSION, Dataset, NetworkConfig, ReachDef, StationDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_dataset(dataset: &Dataset) -> Result<(), ValidationError> {
    if dataset.version != DATASET_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: dataset.version,
        });
    }

    validate_config(&dataset.config)?;

    let mut reach_ids = HashSet::new();
    for reach in &dataset.reaches {
        if !reach_ids.insert(&reach.id) {
            return Err(ValidationError::DuplicateId {
                id: reach.id.clone(),
                context: "reaches".to_string(),
            });
        }
        validate_reach(reach)?;
    }

    for (i, outlet) in dataset.outlets.iter().enumerate() {
        if !outlet.x.is_finite() || !outlet.y.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("outlets[{}]", i),
                value: format!("({}, {})", outlet.x, outlet.y),
                reason: "coordinates must be finite".to_string(),
            });
        }
    }

    let mut station_ids = HashSet::new();
    for station in &dataset.stations {
        if !station_ids.insert(&station.id) {
            return Err(ValidationError::DuplicateId {
                id: station.id.clone(),
                context: "stations".to_string(),
            });
        }
        validate_station(station)?;
    }

    Ok(())
}

fn validate_config(config: &NetworkConfig) -> Result<(), ValidationError> {
    if !config.touch_tolerance.is_finite() || config.touch_tolerance < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "config touch_tolerance".to_string(),
            value: config.touch_tolerance.to_string(),
            reason: "must be finite and non-negative".to_string(),
        });
    }

    if let Some(d) = config.station_snap_distance
        && (!d.is_finite() || d < 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "config station_snap_distance".to_string(),
            value: d.to_string(),
            reason: "must be finite and non-negative".to_string(),
        });
    }

    if config.max_iterations == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "config max_iterations".to_string(),
            value: "0".to_string(),
            reason: "must allow at least one pass".to_string(),
        });
    }

    Ok(())
}

fn validate_reach(reach: &ReachDef) -> Result<(), ValidationError> {
    if reach.coordinates.len() < 2 {
        return Err(ValidationError::InvalidValue {
            field: format!("reach '{}' coordinates", reach.id),
            value: reach.coordinates.len().to_string(),
            reason: "a reach needs at least two vertices".to_string(),
        });
    }

    if let Some([x, y]) = reach
        .coordinates
        .iter()
        .find(|[x, y]| !x.is_finite() || !y.is_finite())
    {
        return Err(ValidationError::InvalidValue {
            field: format!("reach '{}' coordinates", reach.id),
            value: format!("[{}, {}]", x, y),
            reason: "coordinates must be finite".to_string(),
        });
    }

    Ok(())
}

fn validate_station(station: &StationDef) -> Result<(), ValidationError> {
    match (station.x, station.y) {
        (Some(x), Some(y)) if !x.is_finite() || !y.is_finite() => {
            Err(ValidationError::InvalidValue {
                field: format!("station '{}' location", station.id),
                value: format!("({}, {})", x, y),
                reason: "coordinates must be finite".to_string(),
            })
        }
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::InvalidValue {
            field: format!("station '{}' location", station.id),
            value: format!("x = {:?}, y = {:?}", station.x, station.y),
            reason: "x and y must be given together".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PointDef;

    fn dataset() -> Dataset {
        Dataset {
            version: DATASET_VERSION,
            name: "test".to_string(),
            config: NetworkConfig::default(),
            reaches: vec![ReachDef {
                id: "r1".to_string(),
                code: 6224,
                coordinates: vec![[0.0, 0.0], [0.0, 10.0]],
            }],
            outlets: vec![PointDef { x: 0.0, y: 0.0 }],
            stations: vec![StationDef {
                id: "s1".to_string(),
                name: Some("Bridge".to_string()),
                x: None,
                y: None,
                reach: Some("r1".to_string()),
            }],
        }
    }

    #[test]
    fn valid_dataset_passes() {
        validate_dataset(&dataset()).unwrap();
    }

    #[test]
    fn rejects_unknown_version() {
        let mut d = dataset();
        d.version = 7;
        assert_eq!(
            validate_dataset(&d),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        );
    }

    #[test]
    fn rejects_duplicate_reach_and_station_ids() {
        let mut d = dataset();
        d.reaches.push(d.reaches[0].clone());
        assert!(matches!(
            validate_dataset(&d),
            Err(ValidationError::DuplicateId { ref context, .. }) if context == "reaches"
        ));

        let mut d = dataset();
        d.stations.push(d.stations[0].clone());
        assert!(matches!(
            validate_dataset(&d),
            Err(ValidationError::DuplicateId { ref context, .. }) if context == "stations"
        ));
    }

    #[test]
    fn rejects_short_or_non_finite_reach() {
        let mut d = dataset();
        d.reaches[0].coordinates.truncate(1);
        assert!(validate_dataset(&d).is_err());

        let mut d = dataset();
        d.reaches[0].coordinates[1] = [f64::NAN, 1.0];
        let err = validate_dataset(&d).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn rejects_out_of_range_config() {
        let mut d = dataset();
        d.config.touch_tolerance = -1.0;
        assert!(validate_dataset(&d).is_err());

        let mut d = dataset();
        d.config.station_snap_distance = Some(f64::INFINITY);
        assert!(validate_dataset(&d).is_err());

        let mut d = dataset();
        d.config.max_iterations = Some(0);
        assert!(validate_dataset(&d).is_err());
    }

    #[test]
    fn rejects_half_a_station_location() {
        let mut d = dataset();
        d.stations[0].x = Some(3.0);
        assert!(validate_dataset(&d).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn finite_polylines_validate(
                coords in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 2..20)
            ) {
                let mut d = dataset();
                d.reaches[0].coordinates = coords.into_iter().map(|(x, y)| [x, y]).collect();
                prop_assert!(validate_dataset(&d).is_ok());
            }
        }
    }
}
