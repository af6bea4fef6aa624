//! Feature preprocessing pipeline

use super::{
    encoder::OrdinalEncoder,
    imputer::{ImputeStrategy, Imputer},
    scaler::StandardScaler,
};
use crate::artifact;
use crate::error::{GemstoneError, Result};
use crate::schema::{CategoryCatalog, FeatureSchema};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The fitted preprocessing assembler.
///
/// Composes two column-group sub-pipelines over the declared schema:
/// numeric columns run imputation then scaling; categorical columns run
/// imputation, then ordinal encoding, then scaling (the encoded ranks are
/// themselves standardized, deliberately). The two blocks concatenate into
/// one feature matrix, numeric block first, in declared schema order.
///
/// All learned state comes from the training table passed to [`fit`];
/// [`transform`] applies that state read-only and never re-fits.
///
/// [`fit`]: Preprocessor::fit
/// [`transform`]: Preprocessor::transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    schema: FeatureSchema,
    numeric_imputer: Imputer,
    categorical_imputer: Imputer,
    encoder: OrdinalEncoder,
    numeric_scaler: StandardScaler,
    categorical_scaler: StandardScaler,
    is_fitted: bool,
}

impl Preprocessor {
    /// Create an unfitted preprocessor over the given schema and catalog
    pub fn new(schema: FeatureSchema, catalog: CategoryCatalog) -> Self {
        Self {
            schema,
            numeric_imputer: Imputer::new(ImputeStrategy::Median),
            categorical_imputer: Imputer::new(ImputeStrategy::MostFrequent),
            encoder: OrdinalEncoder::new(catalog),
            numeric_scaler: StandardScaler::new(),
            categorical_scaler: StandardScaler::new(),
            is_fitted: false,
        }
    }

    /// The schema this preprocessor was built over
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Column names of the output matrix, in output order
    pub fn output_columns(&self) -> Vec<&str> {
        self.schema.feature_columns()
    }

    /// Fit every stage on the training table.
    ///
    /// Scalers are fit after imputation (and, for the categorical block,
    /// after encoding), so the learned parameters describe exactly the
    /// values that reach them at transform time.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        if let Some(col) = self.missing_feature_column(df) {
            return Err(GemstoneError::Fit(format!(
                "declared feature column '{col}' is absent from the training table"
            )));
        }
        let df = self.cast_numeric(df)?;

        let numeric: Vec<&str> = self.schema.numeric_features.iter().map(|s| s.as_str()).collect();
        let categorical: Vec<&str> =
            self.schema.categorical_features.iter().map(|s| s.as_str()).collect();

        self.numeric_imputer.fit(&df, &numeric)?;
        let df = self.numeric_imputer.transform(&df)?;
        self.numeric_scaler.fit(&df, &numeric)?;

        self.categorical_imputer.fit(&df, &categorical)?;
        let df = self.categorical_imputer.transform(&df)?;
        let df = self.encoder.transform(&df, &categorical)?;
        self.categorical_scaler.fit(&df, &categorical)?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the learned state to a table, producing the feature matrix.
    ///
    /// Rows keep their input order; columns are the numeric block followed
    /// by the categorical block, in declared schema order.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(GemstoneError::NotFitted);
        }
        if let Some(col) = self.missing_feature_column(df) {
            return Err(GemstoneError::FeatureNotFound(col));
        }

        let categorical: Vec<&str> =
            self.schema.categorical_features.iter().map(|s| s.as_str()).collect();

        let df = self.cast_numeric(df)?;
        let df = self.numeric_imputer.transform(&df)?;
        let df = self.categorical_imputer.transform(&df)?;
        let df = self.encoder.transform(&df, &categorical)?;
        let df = self.numeric_scaler.transform(&df)?;
        let df = self.categorical_scaler.transform(&df)?;

        to_matrix(&df, &self.output_columns())
    }

    /// Fit on a table and transform it in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Persist the fitted state as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<()> {
        artifact::save(self, path)
    }

    /// Load a previously persisted preprocessor
    pub fn load(path: &Path) -> Result<Self> {
        artifact::load(path)
    }

    fn missing_feature_column(&self, df: &DataFrame) -> Option<String> {
        self.schema
            .feature_columns()
            .into_iter()
            .find(|col_name| df.column(col_name).is_err())
            .map(|s| s.to_string())
    }

    /// Cast declared numeric columns to Float64 so integer-typed CSV input
    /// flows through the same code path as float input.
    fn cast_numeric(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for col_name in &self.schema.numeric_features {
            let column = df
                .column(col_name)
                .map_err(|_| GemstoneError::FeatureNotFound(col_name.clone()))?;
            if column.dtype() != &DataType::Float64 {
                let casted = column
                    .cast(&DataType::Float64)
                    .map_err(|e| GemstoneError::Data(e.to_string()))?;
                result = result
                    .with_column(casted)
                    .map_err(|e| GemstoneError::Data(e.to_string()))?
                    .clone();
            }
        }
        Ok(result)
    }
}

fn to_matrix(df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>> {
    let mut matrix = Array2::zeros((df.height(), columns.len()));
    for (j, col_name) in columns.iter().enumerate() {
        let column = df
            .column(col_name)
            .map_err(|_| GemstoneError::FeatureNotFound(col_name.to_string()))?;
        let ca = column
            .as_materialized_series()
            .f64()
            .map_err(|e| GemstoneError::Data(e.to_string()))?;
        for (i, opt) in ca.into_iter().enumerate() {
            matrix[[i, j]] = opt.ok_or_else(|| {
                GemstoneError::Data(format!(
                    "unexpected missing value in column '{col_name}' after imputation"
                ))
            })?;
        }
    }
    Ok(matrix)
}
