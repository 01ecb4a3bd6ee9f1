//! Error types for the sales forecast library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file could not be opened or parsed
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Array shape error from ndarray
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// An optional column selected by the feature schema is absent
    #[error("Column {column} is missing at row {row}")]
    MissingColumn { column: String, row: usize },

    /// Day of week outside 1..=7
    #[error("Invalid DayOfWeek {value} at row {row}, expected 1-7")]
    InvalidDayOfWeek { row: usize, value: u8 },

    /// No input files were given
    #[error("No input files configured")]
    NoInputFiles,

    /// Nothing to fit or train on
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Data was produced with a different feature schema than the scaler was fit on
    #[error("Feature schema mismatch: scaler fit on {expected:?}, got {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Array shape does not match what the model or scaler expects
    #[error("Shape mismatch: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Model weights could not be saved or loaded
    #[error("Model record error: {0}")]
    Record(String),

    /// Tensor data could not be converted back to host values
    #[error("Tensor data error: {0}")]
    Tensor(String),
}
