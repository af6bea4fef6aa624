//! Raw data ingestion and train/evaluation split

use crate::error::{GemstoneError, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for data ingestion.
///
/// Paths are explicit values passed in at construction; nothing is read
/// from process globals. Defaults mirror the `artifacts/` layout.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub source_path: PathBuf,
    pub raw_data_path: PathBuf,
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    /// Fraction of rows assigned to the evaluation partition
    pub test_fraction: f64,
    /// Seed for the shuffle split, fixed for reproducible partitions
    pub seed: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("data/gemstone.csv"),
            raw_data_path: PathBuf::from("artifacts/raw.csv"),
            train_data_path: PathBuf::from("artifacts/train.csv"),
            test_data_path: PathBuf::from("artifacts/test.csv"),
            test_fraction: 0.30,
            seed: 42,
        }
    }
}

impl IngestionConfig {
    /// Create a configuration with default paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the raw source CSV
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    /// Builder method to place all outputs under one artifacts directory
    pub fn with_artifacts_dir(mut self, dir: &Path) -> Self {
        self.raw_data_path = dir.join("raw.csv");
        self.train_data_path = dir.join("train.csv");
        self.test_data_path = dir.join("test.csv");
        self
    }

    /// Builder method to set the evaluation fraction
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Builder method to set the split seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Reads the raw gemstone table, persists a raw copy, and writes seeded
/// train/evaluation partitions as whole files.
#[derive(Debug, Clone)]
pub struct DataIngestion {
    config: IngestionConfig,
}

impl DataIngestion {
    /// Create an ingestion step with the given configuration
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Run ingestion end to end.
    ///
    /// Returns the paths of the written train and evaluation tables.
    pub fn run(&self) -> Result<(PathBuf, PathBuf)> {
        info!(source = %self.config.source_path.display(), "starting data ingestion");

        let df = read_csv(&self.config.source_path)?;
        write_csv(&mut df.clone(), &self.config.raw_data_path)?;

        let (mut train, mut test) =
            train_test_split(&df, self.config.test_fraction, self.config.seed)?;
        write_csv(&mut train, &self.config.train_data_path)?;
        write_csv(&mut test, &self.config.test_data_path)?;

        info!(
            train_rows = train.height(),
            eval_rows = test.height(),
            "data ingestion completed"
        );

        Ok((
            self.config.train_data_path.clone(),
            self.config.test_data_path.clone(),
        ))
    }

    /// Load the written training table
    pub fn load_train_table(&self) -> Result<DataFrame> {
        read_csv(&self.config.train_data_path)
    }

    /// Load the written evaluation table
    pub fn load_eval_table(&self) -> Result<DataFrame> {
        read_csv(&self.config.test_data_path)
    }
}

/// Load a CSV file with a header row
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| GemstoneError::Data(format!("cannot parse '{}': {e}", path.display())))
}

/// Write a CSV file, creating parent directories as needed
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .finish(df)
        .map_err(|e| GemstoneError::Data(format!("cannot write '{}': {e}", path.display())))
}

/// Seeded shuffle split into (train, evaluation) partitions.
///
/// Row order within each partition follows the shuffled index order; the
/// two partitions are disjoint and together cover every input row.
pub fn train_test_split(
    df: &DataFrame,
    test_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let n = df.height();
    if n == 0 {
        return Err(GemstoneError::Data("cannot split an empty table".to_string()));
    }
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(GemstoneError::Data(format!(
            "test fraction must be in [0, 1), got {test_fraction}"
        )));
    }

    let mut indices: Vec<IdxSize> = (0..n as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    if n_test >= n {
        return Err(GemstoneError::Data(format!(
            "test fraction {test_fraction} leaves no training rows for {n} input rows"
        )));
    }

    let test_idx = IdxCa::from_vec("idx".into(), indices[..n_test].to_vec());
    let train_idx = IdxCa::from_vec("idx".into(), indices[n_test..].to_vec());

    let train = df.take(&train_idx)?;
    let test = df.take(&test_idx)?;
    Ok((train, test))
}
