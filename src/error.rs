use std::path::PathBuf;
use thiserror::Error;

/// The main error type for posemark operations.
#[derive(Debug, Error)]
pub enum PosemarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Input path has no file name: {0}")]
    InvalidInputPath(PathBuf),

    #[error("Pose model failed: {0}")]
    PoseBackend(String),

    #[error("Pose model returned malformed output: {source}")]
    PoseProtocol {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to display result: {0}")]
    Display(String),
}
