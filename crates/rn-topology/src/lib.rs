//! rn-topology: turns undirected river lines into a directed network.
//!
//! Provides:
//! - `TopologyResolver`: fixed-point node discovery and reach orientation,
//!   seeded from outlet (coastline) points
//! - `NodeLocator`: endpoint-to-node lookup with an explicit touch tolerance
//! - `TopologyReport`: unresolved, degenerate and ambiguous reaches
//!
//! # Example
//!
//! ```
//! use geo::{LineString, Point};
//! use rn_topology::{RawReach, ResolverOptions, TopologyResolver};
//!
//! let resolver = TopologyResolver::new(ResolverOptions::default()).unwrap();
//! let reaches = vec![RawReach::new(
//!     "afon-1",
//!     6224,
//!     LineString::from(vec![(0.0, 0.0), (0.0, 100.0)]),
//! )];
//! let resolution = resolver.resolve(reaches, &[Point::new(0.0, 0.0)]);
//!
//! assert!(resolution.report.is_complete());
//! assert!(resolution.reaches[0].reversed);
//! let network = resolution.to_network().unwrap();
//! assert_eq!(network.reaches().len(), 1);
//! ```

pub mod locator;
pub mod report;
pub mod resolver;

pub use locator::NodeLocator;
pub use report::{AmbiguousJunction, TopologyReport};
pub use resolver::{
    NodeRole, RawReach, Resolution, ResolvedNode, ResolvedReach, ResolverOptions,
    TopologyResolver,
};
