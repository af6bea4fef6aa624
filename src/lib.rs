//! Gemstone price-prediction data pipeline
//!
//! Prepares a tabular dataset of gemstone attributes for downstream price
//! prediction: raw records are split into training and evaluation
//! partitions, then a preprocessing pipeline is fit on the training
//! partition and applied to both, producing numeric feature matrices and a
//! persisted, reusable preprocessor artifact.
//!
//! # Modules
//!
//! - [`schema`] - Fixed feature schema and ordinal category catalog
//! - [`preprocessing`] - Imputation, ordinal encoding, standardization, and
//!   the pipeline assembler
//! - [`ingestion`] - Raw CSV loading and the seeded train/evaluation split
//! - [`engine`] - Fit/transform orchestration over both partitions
//! - [`artifact`] - Persistence of the fitted preprocessor
//! - [`cli`] - Command-line interface

pub mod artifact;
pub mod cli;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod preprocessing;
pub mod schema;

pub use error::{GemstoneError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::engine::{TransformConfig, TransformEngine, TransformOutput};
    pub use crate::error::{GemstoneError, Result};
    pub use crate::ingestion::{DataIngestion, IngestionConfig};
    pub use crate::preprocessing::{
        ImputeStrategy, Imputer, OrdinalEncoder, Preprocessor, StandardScaler,
    };
    pub use crate::schema::{CategoryCatalog, FeatureSchema};
}
