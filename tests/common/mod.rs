//! Shared test utilities and fixture generators

#![allow(dead_code)]

use dfconv::pipeline::{Backend, PolarsBackend, Side};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Every token a file name may end with
pub const ALL_TOKENS: [&str; 5] = ["csv", "arrow", "feather", "parquet", "xlsx"];

/// Create a simple test DataFrame with one column per basic type
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3, 4, 5],
        "value" => [Some(1.5f64), Some(2.5), None, Some(4.5), Some(5.5)],
        "name" => ["alpha", "beta", "gamma", "delta", "epsilon"],
        "flag" => [true, false, true, false, true],
    }
    .unwrap()
}

/// Same columns as `create_test_dataframe`, with the last two rows entirely null
pub fn create_sparse_dataframe() -> DataFrame {
    df! {
        "id" => [Some(1i64), Some(2), None, None],
        "value" => [Some(1.5f64), None, None, None],
        "name" => [Some("alpha"), Some("beta"), None, None],
        "flag" => [Some(true), None, None, None],
    }
    .unwrap()
}

/// Create a DataFrame with `rows` rows and `cols` float columns
pub fn create_wide_dataframe(rows: usize, cols: usize) -> DataFrame {
    let columns: Vec<Column> = (0..cols)
        .map(|c| {
            let values: Vec<f64> = (0..rows).map(|r| (r * cols + c) as f64).collect();
            Column::new(format!("col_{}", c).into(), values)
        })
        .collect();

    DataFrame::new(columns).unwrap()
}

/// Write `df` to `dir/name`, using the codec registered for the file suffix
pub fn write_fixture(dir: &TempDir, name: &str, df: &DataFrame) -> PathBuf {
    let path = dir.path().join(name);
    let token = name.rsplit('.').next().unwrap();

    let backend = PolarsBackend::new();
    let codec = backend.dispatch().lookup(token, Side::Write).unwrap();
    let mut df = df.clone();
    (codec.encode)(&mut df, path.as_path()).unwrap();

    path
}

/// Read a file back with the Polars codec for `token`
pub fn read_back(path: &Path, token: &str) -> DataFrame {
    let backend = PolarsBackend::new();
    let codec = backend.dispatch().lookup(token, Side::Read).unwrap();
    (codec.decode)(path).unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains exactly the given columns, in order
pub fn assert_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    assert_eq!(
        actual_cols, expected_cols,
        "Column mismatch: expected {:?}, got {:?}",
        expected_cols, actual_cols
    );
}
