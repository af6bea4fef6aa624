//! Integration test: ingestion and transformation end to end

use gemprice::engine::{TransformConfig, TransformEngine};
use gemprice::error::GemstoneError;
use gemprice::ingestion::{DataIngestion, IngestionConfig};
use gemprice::preprocessing::Preprocessor;
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

/// Seven-row training table with one missing depth value
fn train_table() -> DataFrame {
    DataFrame::new(vec![
        Column::new("id".into(), &[1i64, 2, 3, 4, 5, 6, 7]),
        Column::new("carat".into(), &[0.50, 0.71, 1.20, 0.90, 0.31, 1.51, 0.70]),
        Column::new(
            "depth".into(),
            &[Some(61.0), None, Some(62.5), Some(60.0), Some(59.5), Some(61.5), Some(63.0)],
        ),
        Column::new("table".into(), &[55.0, 57.0, 58.0, 56.0, 54.0, 59.0, 57.0]),
        Column::new("x".into(), &[5.1, 5.7, 6.8, 6.2, 4.3, 7.3, 5.6]),
        Column::new("y".into(), &[5.2, 5.8, 6.9, 6.3, 4.4, 7.4, 5.7]),
        Column::new("z".into(), &[3.2, 3.5, 4.1, 3.8, 2.7, 4.5, 3.4]),
        Column::new(
            "cut".into(),
            &["Ideal", "Premium", "Good", "Fair", "Ideal", "Very Good", "Premium"],
        ),
        Column::new("color".into(), &["E", "F", "D", "J", "G", "H", "I"]),
        Column::new(
            "clarity".into(),
            &["SI2", "VS1", "IF", "I1", "VVS2", "SI1", "VS2"],
        ),
        Column::new("price".into(), &[500i64, 700, 1500, 900, 350, 2100, 680]),
    ])
    .unwrap()
}

fn standardize(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = var.sqrt();
    values
        .iter()
        .map(|v| if std == 0.0 { 0.0 } else { (v - mean) / std })
        .collect()
}

#[test]
fn test_end_to_end_scenario() {
    let dir = tempdir().unwrap();
    let config = TransformConfig::new().with_artifact_path(dir.path().join("preprocessor.json"));
    let engine = TransformEngine::new(config);

    let table = train_table();
    let output = engine.fit_and_transform(&table, &table).unwrap();

    // 6 numeric + 3 categorical features plus the appended target
    assert_eq!(output.train.dim(), (7, 10));

    // depth (matrix column 1): the missing entry is filled with the median
    // of the six observed values, 61.25, then the column is standardized
    let imputed_depth = [61.0, 61.25, 62.5, 60.0, 59.5, 61.5, 63.0];
    let expected_depth = standardize(&imputed_depth);
    for row in 0..7 {
        assert!(
            (output.train[[row, 1]] - expected_depth[row]).abs() < 1e-9,
            "depth row {row}: {} != {}",
            output.train[[row, 1]],
            expected_depth[row]
        );
    }

    // cut (matrix column 6): ordinal ranks in declared order, standardized
    let cut_ranks = [4.0, 3.0, 1.0, 0.0, 4.0, 2.0, 3.0];
    let expected_cut = standardize(&cut_ranks);
    for row in 0..7 {
        assert!((output.train[[row, 6]] - expected_cut[row]).abs() < 1e-9);
    }

    // clarity (matrix column 8): SI2 has rank 1 in the declared ordering
    let clarity_ranks = [1.0, 6.0, 7.0, 0.0, 3.0, 2.0, 5.0];
    let expected_clarity = standardize(&clarity_ranks);
    for row in 0..7 {
        assert!((output.train[[row, 8]] - expected_clarity[row]).abs() < 1e-9);
    }

    // Target appended as the last column, row order preserved
    let target: Vec<f64> = output.train.column(9).to_vec();
    assert_eq!(target, vec![500.0, 700.0, 1500.0, 900.0, 350.0, 2100.0, 680.0]);
}

#[test]
fn test_evaluation_data_never_leaks_into_fitted_state() {
    let dir = tempdir().unwrap();
    let table = train_table();

    // Two evaluation tables with very different values
    let eval_a = table.clone();
    let mut eval_b = table.clone();
    eval_b
        .with_column(Column::new(
            "carat".into(),
            &[9.0, 9.1, 9.2, 9.3, 9.4, 9.5, 9.6],
        ))
        .unwrap();

    let path_a = dir.path().join("a.json");
    let path_b = dir.path().join("b.json");

    let out_a = TransformEngine::new(TransformConfig::new().with_artifact_path(&path_a))
        .fit_and_transform(&table, &eval_a)
        .unwrap();
    let out_b = TransformEngine::new(TransformConfig::new().with_artifact_path(&path_b))
        .fit_and_transform(&table, &eval_b)
        .unwrap();

    // Learned state depends only on the training partition
    let fitted_a = Preprocessor::load(&path_a).unwrap();
    let fitted_b = Preprocessor::load(&path_b).unwrap();
    assert_eq!(fitted_a, fitted_b);
    assert_eq!(out_a.train, out_b.train);
    assert_ne!(out_a.eval, out_b.eval);
}

#[test]
fn test_artifact_round_trip_transforms_identically() {
    let dir = tempdir().unwrap();
    let artifact_path = dir.path().join("preprocessor.json");
    let engine = TransformEngine::new(TransformConfig::new().with_artifact_path(&artifact_path));

    let table = train_table();
    let output = engine.fit_and_transform(&table, &table).unwrap();

    let loaded = Preprocessor::load(&artifact_path).unwrap();
    let features = table.drop("price").unwrap().drop("id").unwrap();
    let matrix = loaded.transform(&features).unwrap();

    for row in 0..7 {
        for col in 0..9 {
            assert_eq!(matrix[[row, col]], output.train[[row, col]]);
        }
    }
}

#[test]
fn test_unseen_category_in_evaluation_fails() {
    let dir = tempdir().unwrap();
    let engine = TransformEngine::new(
        TransformConfig::new().with_artifact_path(dir.path().join("preprocessor.json")),
    );

    let table = train_table();
    let mut eval = table.clone();
    eval.with_column(Column::new(
        "clarity".into(),
        &["SI2", "VS1", "IF", "I1", "VVS2", "SI1", "FL"],
    ))
    .unwrap();

    match engine.fit_and_transform(&table, &eval) {
        Err(GemstoneError::UnknownCategory { feature, value }) => {
            assert_eq!(feature, "clarity");
            assert_eq!(value, "FL");
        }
        other => panic!("expected UnknownCategory, got {other:?}"),
    }
}

#[test]
fn test_csv_ingestion_through_transformation() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("gemstone.csv");

    let mut file = File::create(&source).unwrap();
    writeln!(file, "id,carat,depth,table,x,y,z,cut,color,clarity,price").unwrap();
    for i in 0..20 {
        writeln!(
            file,
            "{},{:.2},{:.1},{:.1},{:.1},{:.1},{:.1},{},{},{},{}",
            i,
            0.3 + 0.05 * i as f64,
            59.0 + 0.2 * i as f64,
            54.0 + 0.3 * i as f64,
            4.0 + 0.1 * i as f64,
            4.1 + 0.1 * i as f64,
            2.5 + 0.1 * i as f64,
            ["Fair", "Good", "Very Good", "Premium", "Ideal"][i % 5],
            ["D", "E", "F", "G", "H", "I", "J"][i % 7],
            ["I1", "SI2", "SI1", "VVS2", "VVS1", "VS2", "VS1", "IF"][i % 8],
            300 + 25 * i,
        )
        .unwrap();
    }

    let artifacts_dir = dir.path().join("artifacts");
    let ingestion = DataIngestion::new(
        IngestionConfig::new()
            .with_source(&source)
            .with_artifacts_dir(&artifacts_dir),
    );
    ingestion.run().unwrap();

    let train_df = ingestion.load_train_table().unwrap();
    let eval_df = ingestion.load_eval_table().unwrap();
    assert_eq!(train_df.height() + eval_df.height(), 20);

    let engine = TransformEngine::new(
        TransformConfig::new().with_artifact_path(artifacts_dir.join("preprocessor.json")),
    );
    let output = engine.fit_and_transform(&train_df, &eval_df).unwrap();

    assert_eq!(output.train.ncols(), 10);
    assert_eq!(output.eval.ncols(), 10);
    assert_eq!(output.train.nrows(), train_df.height());
    assert_eq!(output.eval.nrows(), eval_df.height());
    assert!(artifacts_dir.join("preprocessor.json").exists());
}
