//! Feature preprocessing
//!
//! Provides the stages that turn raw gemstone columns into a numeric
//! feature matrix:
//! - Missing value imputation (median / most frequent)
//! - Ordinal encoding against the category catalog
//! - Standardization with training-derived parameters
//! - The pipeline assembler composing the stages per column group

mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use encoder::OrdinalEncoder;
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::Preprocessor;
pub use scaler::StandardScaler;
