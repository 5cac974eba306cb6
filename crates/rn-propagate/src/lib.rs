//! rn-propagate: gauge calibration over a resolved river network.
//!
//! Provides:
//! - `UpstreamLengths`: cumulative upstream channel length per reach
//! - `link_stations`: station → reach lookup, explicit or snapped
//! - `Propagator`: nearest-gauge assignment with upstream-length ratios
//!
//! # Example
//!
//! ```
//! use geo::{LineString, Point};
//! use rn_graph::NetworkBuilder;
//! use rn_propagate::{GaugeLink, PropagateOptions, Propagator};
//!
//! let mut builder = NetworkBuilder::new();
//! let sea = builder.add_node(Point::new(0.0, 0.0));
//! let mid = builder.add_node(Point::new(0.0, 60.0));
//! let src = builder.add_node(Point::new(0.0, 100.0));
//! builder.add_reach("lower", 0, mid, sea, LineString::from(vec![(0.0, 60.0), (0.0, 0.0)]));
//! builder.add_reach("upper", 0, src, mid, LineString::from(vec![(0.0, 100.0), (0.0, 60.0)]));
//! let network = builder.build().unwrap();
//!
//! let links = [GaugeLink::new("gauge-1", "lower")];
//! let (calibration, report) = Propagator::new(&network, PropagateOptions::default())
//!     .run(&links)
//!     .unwrap();
//!
//! let upper = network.index().get(&"upper".into()).unwrap();
//! assert!((calibration.ratio(upper).unwrap() - 0.4).abs() < 1e-12);
//! assert!(report.is_clean());
//! ```

pub mod propagate;
pub mod report;
pub mod stations;
pub mod upstream;

pub use propagate::{
    Calibration, GaugeRecord, GaugeState, PropagateOptions, Propagator, Via,
};
pub use report::{DuplicateGauge, MissingGaugeReference, PropagationReport, UnmatchedStation};
pub use stations::{GaugeLink, Station, link_stations, nearest_reach};
pub use upstream::{UpstreamLengths, ancestor_edges};
