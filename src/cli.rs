//! Command-line interface
//!
//! Subcommands for the two pipeline stages plus a combined end-to-end run.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::engine::{TransformConfig, TransformEngine};
use crate::error::Result;
use crate::ingestion::{self, DataIngestion, IngestionConfig};

#[derive(Parser)]
#[command(name = "gemprice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gemstone price-prediction data pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split the raw gemstone table into train/evaluation partitions
    Ingest {
        /// Raw gemstone CSV
        #[arg(short, long, default_value = "data/gemstone.csv")]
        source: PathBuf,

        /// Directory for the raw copy and the partition files
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.30)]
        test_fraction: f64,

        /// Seed for the shuffle split
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Fit the preprocessor on the training table and transform both tables
    Transform {
        /// Training partition CSV
        #[arg(long, default_value = "artifacts/train.csv")]
        train: PathBuf,

        /// Evaluation partition CSV
        #[arg(long, default_value = "artifacts/test.csv")]
        eval: PathBuf,

        /// Output path for the fitted preprocessor artifact
        #[arg(long, default_value = "artifacts/preprocessor.json")]
        artifact: PathBuf,
    },

    /// Run ingestion followed by transformation
    Run {
        /// Raw gemstone CSV
        #[arg(short, long, default_value = "data/gemstone.csv")]
        source: PathBuf,

        /// Directory for all pipeline outputs
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
}

pub fn cmd_ingest(
    source: &Path,
    artifacts_dir: &Path,
    test_fraction: f64,
    seed: u64,
) -> Result<()> {
    let config = IngestionConfig::new()
        .with_source(source)
        .with_artifacts_dir(artifacts_dir)
        .with_test_fraction(test_fraction)
        .with_seed(seed);

    let (train_path, eval_path) = DataIngestion::new(config).run()?;
    println!("train partition: {}", train_path.display());
    println!("eval partition:  {}", eval_path.display());
    Ok(())
}

pub fn cmd_transform(train: &Path, eval: &Path, artifact: &Path) -> Result<()> {
    let train_df = ingestion::read_csv(train)?;
    let eval_df = ingestion::read_csv(eval)?;

    let engine = TransformEngine::new(TransformConfig::new().with_artifact_path(artifact));
    let output = engine.fit_and_transform(&train_df, &eval_df)?;

    println!(
        "train matrix: {} rows x {} columns",
        output.train.nrows(),
        output.train.ncols()
    );
    println!(
        "eval matrix:  {} rows x {} columns",
        output.eval.nrows(),
        output.eval.ncols()
    );
    println!("artifact:     {}", output.artifact_path.display());
    Ok(())
}

pub fn cmd_run(source: &Path, artifacts_dir: &Path) -> Result<()> {
    let config = IngestionConfig::new()
        .with_source(source)
        .with_artifacts_dir(artifacts_dir);
    let ingestion_step = DataIngestion::new(config);
    ingestion_step.run()?;

    let train_df = ingestion_step.load_train_table()?;
    let eval_df = ingestion_step.load_eval_table()?;

    let engine = TransformEngine::new(
        TransformConfig::new().with_artifact_path(artifacts_dir.join("preprocessor.json")),
    );
    let output = engine.fit_and_transform(&train_df, &eval_df)?;

    println!(
        "train matrix: {} rows x {} columns",
        output.train.nrows(),
        output.train.ncols()
    );
    println!(
        "eval matrix:  {} rows x {} columns",
        output.eval.nrows(),
        output.eval.ncols()
    );
    println!("artifact:     {}", output.artifact_path.display());
    Ok(())
}
