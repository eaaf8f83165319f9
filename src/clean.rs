use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

pub const AGE_COL: &str = "Age";
pub const EMBARKED_COL: &str = "Embarked";
pub const CABIN_COL: &str = "Cabin";

/// Replace every null `Age` with the median of the non-null ages.
///
/// Returns the rebound table together with the fill value that was used.
pub fn fill_age_with_median(df: DataFrame) -> Result<(DataFrame, f64)> {
    let age = df
        .column(AGE_COL)
        .with_context(|| format!("Column '{}' not found", AGE_COL))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("Failed to cast '{}' to Float64", AGE_COL))?;

    let Some(median) = age.median() else {
        bail!("Cannot compute median: '{}' has no non-null values", AGE_COL);
    };

    let filled = df
        .lazy()
        .with_column(col(AGE_COL).fill_null(lit(median)))
        .collect()
        .with_context(|| format!("Failed to fill nulls in '{}'", AGE_COL))?;

    Ok((filled, median))
}

/// Replace every null `Embarked` with the most frequent non-null label.
///
/// Tie-break rule: among equally frequent labels the lexicographically
/// smallest one wins.
pub fn fill_embarked_with_mode(df: DataFrame) -> Result<(DataFrame, String)> {
    let embarked = df
        .column(EMBARKED_COL)
        .with_context(|| format!("Column '{}' not found", EMBARKED_COL))?
        .as_materialized_series()
        .clone();
    let ca = embarked
        .str()
        .with_context(|| format!("Column '{}' is not a string column", EMBARKED_COL))?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in ca.into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }

    // BTreeMap iterates labels in ascending order, so keeping the first
    // maximum implements the lexicographic tie-break.
    let mut mode: Option<(&str, usize)> = None;
    for (label, count) in &counts {
        match mode {
            Some((_, best)) if *count <= best => {}
            _ => mode = Some((label, *count)),
        }
    }
    let Some((mode, _)) = mode else {
        bail!("Cannot compute mode: '{}' has no non-null values", EMBARKED_COL);
    };
    let mode = mode.to_string();

    let filled = df
        .lazy()
        .with_column(col(EMBARKED_COL).fill_null(lit(mode.clone())))
        .collect()
        .with_context(|| format!("Failed to fill nulls in '{}'", EMBARKED_COL))?;

    Ok((filled, mode))
}

/// Produce a derived table without the `Cabin` column.
///
/// The caller discards the result: the working table keeps `Cabin` and its
/// original nulls. This mirrors the behavior of the system being
/// reproduced, where the drop was never assigned back.
pub fn drop_cabin(df: &DataFrame) -> Result<DataFrame> {
    df.drop(CABIN_COL)
        .with_context(|| format!("Column '{}' not found", CABIN_COL))
}
