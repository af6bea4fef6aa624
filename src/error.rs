//! Error types for the gemstone pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, GemstoneError>;

/// Main error type for the pipeline.
///
/// Every stage raises the most specific kind for its own precondition
/// violations and wraps the cause once, at the point of failure, with the
/// offending column or value. Callers propagate with `?` and do not re-wrap.
#[derive(Error, Debug)]
pub enum GemstoneError {
    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("unknown category '{value}' in feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("fit error: {0}")]
    Fit(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preprocessor not fitted")]
    NotFitted,
}

impl From<polars::error::PolarsError> for GemstoneError {
    fn from(err: polars::error::PolarsError) -> Self {
        GemstoneError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for GemstoneError {
    fn from(err: serde_json::Error) -> Self {
        GemstoneError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for GemstoneError {
    fn from(err: ndarray::ShapeError) -> Self {
        GemstoneError::Data(err.to_string())
    }
}
