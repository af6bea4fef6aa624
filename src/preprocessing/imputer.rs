//! Missing value imputation

use crate::error::{GemstoneError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the median of non-missing training values (numeric only)
    Median,
    /// Replace with the most frequent non-missing training value
    /// (categorical; ties break toward the first-encountered value)
    MostFrequent,
}

/// Per-column fill statistic learned at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Categorical(String),
}

/// Imputer for handling missing values.
///
/// `fit` learns one fill statistic per column from training data only;
/// `transform` replaces missing entries with the learned statistic and
/// leaves non-missing entries unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the imputer to the training data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| GemstoneError::FeatureNotFound(col_name.to_string()))?;

            let fill_value = self.compute_fill_value(col_name, column.as_materialized_series())?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data by filling missing entries with the learned statistics
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(GemstoneError::NotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            if let Ok(col) = df.column(col_name) {
                let series = col.as_materialized_series();
                let filled = fill_series(series, fill_value)?;
                result = result
                    .with_column(filled)
                    .map_err(|e| GemstoneError::Data(e.to_string()))?
                    .clone();
            }
        }

        Ok(result)
    }

    fn compute_fill_value(&self, col_name: &str, series: &Series) -> Result<FillValue> {
        match self.strategy {
            ImputeStrategy::Median => {
                let median = series
                    .f64()
                    .map_err(|e| GemstoneError::Data(e.to_string()))?
                    .median()
                    .ok_or_else(|| {
                        GemstoneError::Fit(format!(
                            "cannot compute median of column '{col_name}': no non-missing values"
                        ))
                    })?;
                Ok(FillValue::Numeric(median))
            }
            ImputeStrategy::MostFrequent => {
                let mode = compute_mode(col_name, series)?;
                Ok(FillValue::Categorical(mode))
            }
        }
    }
}

/// Most frequent non-missing value, ties broken by the value encountered
/// first in the column's iteration order.
fn compute_mode(col_name: &str, series: &Series) -> Result<String> {
    let ca = series
        .str()
        .map_err(|e| GemstoneError::Data(e.to_string()))?;

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, val) in ca.into_iter().flatten().enumerate() {
        let entry = counts.entry(val).or_insert((0, pos));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .min_by_key(|(_, (count, first))| (std::cmp::Reverse(*count), *first))
        .map(|(val, _)| val.to_string())
        .ok_or_else(|| {
            GemstoneError::Fit(format!(
                "cannot compute mode of column '{col_name}': no non-missing values"
            ))
        })
}

fn fill_series(series: &Series, fill_value: &FillValue) -> Result<Series> {
    match fill_value {
        FillValue::Numeric(val) => {
            let ca = series
                .f64()
                .map_err(|e| GemstoneError::Data(e.to_string()))?;

            let filled: Float64Chunked = ca
                .into_iter()
                .map(|opt| Some(opt.unwrap_or(*val)))
                .collect();

            Ok(filled.with_name(series.name().clone()).into_series())
        }
        FillValue::Categorical(val) => {
            let ca = series
                .str()
                .map_err(|e| GemstoneError::Data(e.to_string()))?;

            let filled: StringChunked = ca
                .into_iter()
                .map(|opt| Some(opt.unwrap_or(val.as_str()).to_string()))
                .collect();

            Ok(filled.with_name(series.name().clone()).into_series())
        }
    }
}
