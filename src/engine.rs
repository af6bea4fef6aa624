//! Fit/transform orchestration

use crate::artifact;
use crate::error::{GemstoneError, Result};
use crate::preprocessing::Preprocessor;
use crate::schema::{CategoryCatalog, FeatureSchema};
use ndarray::{concatenate, Array1, Array2, Axis};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Configuration for the fit/transform engine
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Where the fitted preprocessor artifact is persisted
    pub artifact_path: PathBuf,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("artifacts/preprocessor.json"),
        }
    }
}

impl TransformConfig {
    /// Create a configuration with the default artifact path
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the artifact path
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }
}

/// Output of one fit/transform run
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Training feature matrix with the target appended as the last column
    pub train: Array2<f64>,
    /// Evaluation feature matrix with the target appended as the last column
    pub eval: Array2<f64>,
    /// Where the fitted preprocessor was persisted
    pub artifact_path: PathBuf,
}

/// Orchestrates one training run: separates target and id columns from the
/// feature columns, fits the [`Preprocessor`] on the training partition
/// only, applies it to both partitions, appends the target back to each
/// matrix, and persists the fitted artifact.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    config: TransformConfig,
    schema: FeatureSchema,
    catalog: CategoryCatalog,
}

impl TransformEngine {
    /// Create an engine over the default gemstone schema and catalog
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            schema: FeatureSchema::default(),
            catalog: CategoryCatalog::default(),
        }
    }

    /// Builder method to override the feature schema
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Builder method to override the category catalog
    pub fn with_catalog(mut self, catalog: CategoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Fit on the training table, transform both tables, persist the artifact.
    ///
    /// Every learned parameter comes from `train_df`; `eval_df` content
    /// never influences the fitted state.
    pub fn fit_and_transform(
        &self,
        train_df: &DataFrame,
        eval_df: &DataFrame,
    ) -> Result<TransformOutput> {
        info!(
            train_rows = train_df.height(),
            eval_rows = eval_df.height(),
            "starting data transformation"
        );

        let (train_features, train_target) = self.separate_target(train_df)?;
        let (eval_features, eval_target) = self.separate_target(eval_df)?;

        let mut preprocessor = Preprocessor::new(self.schema.clone(), self.catalog.clone());
        preprocessor.fit(&train_features)?;

        let train = append_target(preprocessor.transform(&train_features)?, &train_target)?;
        let eval = append_target(preprocessor.transform(&eval_features)?, &eval_target)?;

        artifact::save(&preprocessor, &self.config.artifact_path)?;
        info!(
            artifact = %self.config.artifact_path.display(),
            "transformation completed, artifact persisted"
        );

        Ok(TransformOutput {
            train,
            eval,
            artifact_path: self.config.artifact_path.clone(),
        })
    }

    /// Split a raw table into feature columns and the target column.
    /// The id column is dropped from the features when present.
    fn separate_target(&self, df: &DataFrame) -> Result<(DataFrame, Array1<f64>)> {
        let target_name = self.schema.target_column.as_str();
        let column = df
            .column(target_name)
            .map_err(|_| GemstoneError::FeatureNotFound(target_name.to_string()))?;
        let casted = column
            .cast(&DataType::Float64)
            .map_err(|e| GemstoneError::Data(e.to_string()))?;
        let ca = casted
            .f64()
            .map_err(|e| GemstoneError::Data(e.to_string()))?;

        let mut target = Vec::with_capacity(df.height());
        for (row, opt) in ca.into_iter().enumerate() {
            target.push(opt.ok_or_else(|| {
                GemstoneError::Data(format!("missing target value '{target_name}' in row {row}"))
            })?);
        }

        let mut features = df.drop(target_name)?;
        if features.column(self.schema.id_column.as_str()).is_ok() {
            features = features.drop(self.schema.id_column.as_str())?;
        }

        Ok((features, Array1::from(target)))
    }
}

fn append_target(matrix: Array2<f64>, target: &Array1<f64>) -> Result<Array2<f64>> {
    if matrix.nrows() != target.len() {
        return Err(GemstoneError::Data(format!(
            "feature matrix has {} rows but target has {} values",
            matrix.nrows(),
            target.len()
        )));
    }
    let target_col = target.view().insert_axis(Axis(1));
    Ok(concatenate(Axis(1), &[matrix.view(), target_col])?)
}
