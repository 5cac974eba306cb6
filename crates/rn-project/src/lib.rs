//! rn-project: dataset file format and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

pub use schema::*;
pub use validate::{ValidationError, validate_dataset};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unrecognised dataset extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(ProjectError::UnknownFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_yaml::from_str(&content)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

pub fn save_yaml(path: &Path, dataset: &Dataset) -> ProjectResult<()> {
    validate_dataset(dataset)?;
    let content = serde_yaml::to_string(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

pub fn save_json(path: &Path, dataset: &Dataset) -> ProjectResult<()> {
    validate_dataset(dataset)?;
    let content = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a dataset, picking the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<Dataset> {
    match Format::from_path(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

pub fn save(path: &Path, dataset: &Dataset) -> ProjectResult<()> {
    match Format::from_path(path)? {
        Format::Yaml => save_yaml(path, dataset),
        Format::Json => save_json(path, dataset),
    }
}
