use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::time::Duration;

/// Fetch the passenger dataset over HTTPS and parse it as headered CSV.
///
/// There is no retry, caching, or offline fallback: any network or parse
/// failure propagates to the caller and ends the run.
pub fn fetch_passenger_table(url: &str) -> Result<DataFrame> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch dataset from {}", url))?
        .error_for_status()
        .with_context(|| format!("Dataset request to {} was rejected", url))?;

    let body = response
        .bytes()
        .context("Failed to read dataset response body")?
        .to_vec();

    read_csv_bytes(body).with_context(|| format!("Failed to parse CSV body from {}", url))
}

/// Parse an in-memory CSV byte buffer (header row expected) into a DataFrame.
pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(df)
}

/// Extract a column as f64 values, keeping nulls in place so callers can
/// decide how to treat incomplete rows.
pub fn column_to_optional_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s_f64 = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("Failed to cast '{}' to Float64", name))?;
    let ca: &Float64Chunked = s_f64.f64()?;
    Ok(ca.into_iter().collect())
}

/// Per-column null counts, in column order.
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect()
}
