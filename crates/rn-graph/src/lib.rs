//! rn-graph: river network layer for rivernet.
//!
//! Provides:
//! - Core network data structures (Node, Reach, RiverNetwork)
//! - Incremental network builder with validation (orientation, acyclicity)
//! - Reach identifier indexing
//!
//! # Example
//!
//! ```
//! use geo::{LineString, Point};
//! use rn_graph::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let source = builder.add_node(Point::new(0.0, 100.0));
//! let sea = builder.add_node(Point::new(0.0, 0.0));
//! builder.add_reach(
//!     "afon-1",
//!     6224,
//!     source,
//!     sea,
//!     LineString::from(vec![(0.0, 100.0), (0.0, 0.0)]),
//! );
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.nodes().len(), 2);
//! assert_eq!(network.outgoing(source).len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::{GraphError, ReachEnd};
pub use graph::{Node, Reach, RiverNetwork};
pub use indexing::ReachIndex;
