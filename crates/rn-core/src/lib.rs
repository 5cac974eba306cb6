//! rn-core: stable foundation for rivernet.
//!
//! Contains:
//! - ids (compact graph handles + source-data identifiers)
//! - error (shared error types)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI length/ratio types + constructors)
//! - geometry (planar point/line predicates over `geo` types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RnError, RnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
