//! Ordinal encoding against the category catalog

use crate::error::{GemstoneError, Result};
use crate::schema::CategoryCatalog;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordinal encoder backed by the static [`CategoryCatalog`].
///
/// There is nothing to fit: the rank of every valid value is declared up
/// front as a domain contract. A value absent from the catalog is an
/// explicit failure naming the feature and the offending value, never a
/// silent sentinel rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    catalog: CategoryCatalog,
}

impl OrdinalEncoder {
    /// Create an encoder over the given catalog
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this encoder ranks against
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Replace each categorical column with its ordinal ranks as f64
    pub fn transform(&self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        let mut result = df.clone();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| GemstoneError::FeatureNotFound(col_name.to_string()))?;
            let encoded = self.encode_series(col_name, column.as_materialized_series())?;
            result = result
                .with_column(encoded)
                .map_err(|e| GemstoneError::Data(e.to_string()))?
                .clone();
        }

        Ok(result)
    }

    fn encode_series(&self, feature: &str, series: &Series) -> Result<Series> {
        let ca = series
            .str()
            .map_err(|e| GemstoneError::Data(e.to_string()))?;

        let mut ranks = Vec::with_capacity(ca.len());
        for opt in ca.into_iter() {
            let value = opt.ok_or_else(|| {
                GemstoneError::Data(format!(
                    "unexpected missing value in feature '{feature}' at encoding time"
                ))
            })?;
            let rank = self.catalog.rank_of(feature, value).ok_or_else(|| {
                GemstoneError::UnknownCategory {
                    feature: feature.to_string(),
                    value: value.to_string(),
                }
            })?;
            ranks.push(rank as f64);
        }

        Ok(Series::new(series.name().clone(), ranks))
    }
}
