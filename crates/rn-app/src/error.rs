//! Error types for the rn-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Dataset validation failed: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read report file: {path}")]
    ReportFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report file: {path}")]
    ReportFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report format error: {0}")]
    Report(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for rn-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<rn_project::ProjectError> for AppError {
    fn from(err: rn_project::ProjectError) -> Self {
        match err {
            rn_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Dataset(other.to_string()),
        }
    }
}

impl From<rn_project::ValidationError> for AppError {
    fn from(err: rn_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<rn_core::RnError> for AppError {
    fn from(err: rn_core::RnError) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Report(err.to_string())
    }
}
