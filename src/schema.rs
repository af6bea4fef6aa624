//! Feature schema and category catalog
//!
//! The schema is a fixed domain contract, not inferred from data: which
//! columns are numeric measurements, which are ordered categorical grades,
//! and the declared rank order of every valid grade value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed partition of the input columns into feature groups.
///
/// The `id` column and the `price` target never enter the feature matrix;
/// the target is appended back as the last column of the output arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub id_column: String,
    pub target_column: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            numeric_features: ["carat", "depth", "table", "x", "y", "z"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            categorical_features: ["cut", "color", "clarity"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            id_column: "id".to_string(),
            target_column: "price".to_string(),
        }
    }
}

impl FeatureSchema {
    /// All feature column names, numeric block first then categorical block.
    /// This order is the column order of the output feature matrix.
    pub fn feature_columns(&self) -> Vec<&str> {
        self.numeric_features
            .iter()
            .chain(self.categorical_features.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

/// Hand-declared orderings of the valid values for each ordinal categorical
/// feature. Index 0 is the lowest grade. The ordering is a domain invariant
/// and is never learned from data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    orders: HashMap<String, Vec<String>>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        let mut orders = HashMap::new();
        orders.insert(
            "cut".to_string(),
            owned(&["Fair", "Good", "Very Good", "Premium", "Ideal"]),
        );
        orders.insert(
            "color".to_string(),
            owned(&["D", "E", "F", "G", "H", "I", "J"]),
        );
        orders.insert(
            "clarity".to_string(),
            owned(&["I1", "SI2", "SI1", "VVS2", "VVS1", "VS2", "VS1", "IF"]),
        );
        Self { orders }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl CategoryCatalog {
    /// Ordinal rank of `value` within `feature`, or `None` if the value is
    /// not declared for that feature (an unknown category).
    pub fn rank_of(&self, feature: &str, value: &str) -> Option<usize> {
        self.orders
            .get(feature)
            .and_then(|order| order.iter().position(|v| v == value))
    }

    /// Declared value ordering for `feature`, lowest rank first.
    pub fn categories(&self, feature: &str) -> Option<&[String]> {
        self.orders.get(feature).map(|v| v.as_slice())
    }
}
