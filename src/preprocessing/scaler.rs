//! Feature standardization

use crate::error::{GemstoneError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for one fitted column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    std: f64,
}

/// Standard scaler: `(x - mean) / std` with training-derived parameters.
///
/// Uses the population standard deviation. A column whose training values
/// are constant has `std == 0` and scales every value to 0; the column
/// carries no signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Create a new unfitted scaler
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the scaler to the training data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| GemstoneError::FeatureNotFound(col_name.to_string()))?;
            let ca = column
                .as_materialized_series()
                .f64()
                .map_err(|e| GemstoneError::Data(e.to_string()))?;

            let mean = ca.mean().ok_or_else(|| {
                GemstoneError::Fit(format!("cannot scale column '{col_name}': no values"))
            })?;
            let std = ca.std(0).unwrap_or(0.0);

            self.params
                .insert(col_name.to_string(), ScalerParams { mean, std });
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data by standardizing every fitted column
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(GemstoneError::NotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .filter_map(|(col_name, params)| {
                df.column(col_name)
                    .ok()
                    .map(|column| scale_series(column.as_materialized_series(), params))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result = result
                .with_column(scaled)
                .map_err(|e| GemstoneError::Data(e.to_string()))?
                .clone();
        }

        Ok(result)
    }

    /// Learned `(mean, std)` for a column, if fitted
    pub fn params_for(&self, column: &str) -> Option<(f64, f64)> {
        self.params.get(column).map(|p| (p.mean, p.std))
    }
}

fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
    let ca = series
        .f64()
        .map_err(|e| GemstoneError::Data(e.to_string()))?;

    let scaled: Float64Chunked = ca
        .into_iter()
        .map(|opt| {
            opt.map(|v| {
                if params.std == 0.0 {
                    0.0
                } else {
                    (v - params.mean) / params.std
                }
            })
        })
        .collect();

    Ok(scaled.with_name(series.name().clone()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaling() {
        let df = DataFrame::new(vec![Column::new(
            "a".into(),
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        )])
        .unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&df, &["a"]).unwrap();
        let result = scaler.transform(&df).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        let mean: f64 = col.mean().unwrap();
        assert!(mean.abs() < 1e-10);

        // Population std of [1..5] is sqrt(2); first value is (1-3)/sqrt(2)
        let expected = -2.0 / 2.0_f64.sqrt();
        assert!((col.get(0).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_zero_variance_column_scales_to_zero() {
        let df = DataFrame::new(vec![Column::new("a".into(), &[7.0, 7.0, 7.0])]).unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&df, &["a"]).unwrap();

        assert_eq!(scaler.params_for("a"), Some((7.0, 0.0)));

        // Any value of the column scales to 0, not only the training mean
        let other = DataFrame::new(vec![Column::new("a".into(), &[7.0, 9.0, -1.0])]).unwrap();
        let result = scaler.transform(&other).unwrap();
        let col = result.column("a").unwrap().f64().unwrap();
        for v in col.into_iter() {
            assert_eq!(v, Some(0.0));
        }
    }

    #[test]
    fn test_transform_uses_training_parameters() {
        let train = DataFrame::new(vec![Column::new("a".into(), &[0.0, 10.0])]).unwrap();
        let eval = DataFrame::new(vec![Column::new("a".into(), &[5.0])]).unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&train, &["a"]).unwrap();
        let result = scaler.transform(&eval).unwrap();

        // Training mean is 5, so the eval value lands exactly on 0
        let col = result.column("a").unwrap().f64().unwrap();
        assert!(col.get(0).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_empty_column_fails_fit() {
        let df = DataFrame::new(vec![Column::new("a".into(), Vec::<f64>::new())]).unwrap();
        let mut scaler = StandardScaler::new();
        assert!(matches!(
            scaler.fit(&df, &["a"]),
            Err(GemstoneError::Fit(_))
        ));
    }
}
