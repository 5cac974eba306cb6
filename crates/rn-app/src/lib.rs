//! Shared application service layer for rivernet.
//!
//! Ties dataset loading, topology resolution and gauge propagation into
//! one run, and owns the JSON run report the CLI reads and writes.

pub mod dataset_service;
pub mod error;
pub mod report;
pub mod run_service;

// Re-export key types for convenience
pub use dataset_service::{DatasetSummary, load_dataset, summarize, validate_dataset};
pub use error::{AppError, AppResult};
pub use report::{IssueReport, ReachRecord, ReachStatus, RunCounts, RunReport};
pub use run_service::{
    ConfigOverrides, RunRequest, execute, load_report, run_dataset, save_report,
};
