use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

pub const SURVIVED_COL: &str = "Survived";

fn any_value_label(av: &AnyValue) -> String {
    match av {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Count of rows per `Survived` value, sorted by value.
pub fn survival_counts(df: &DataFrame) -> Result<Vec<(i64, u32)>> {
    let survived = df
        .column(SURVIVED_COL)
        .with_context(|| format!("Column '{}' not found", SURVIVED_COL))?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let ca = survived.i64()?;

    let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
    for v in ca.into_iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }
    Ok(counts.into_iter().collect())
}

/// Mean of the 0/1 `Survived` indicator, as a percentage.
pub fn overall_survival_rate(df: &DataFrame) -> Result<f64> {
    let survived = df
        .column(SURVIVED_COL)
        .with_context(|| format!("Column '{}' not found", SURVIVED_COL))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let Some(mean) = survived.mean() else {
        bail!("Cannot compute survival rate over an empty table");
    };
    Ok(mean * 100.0)
}

/// Mean of `Survived` per distinct value of `key`, as percentages, with
/// groups sorted ascending by key.
pub fn grouped_survival_rates(df: &DataFrame, key: &str) -> Result<Vec<(String, f64)>> {
    let out = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([col(SURVIVED_COL).mean().alias("rate")])
        .sort([key], Default::default())
        .collect()
        .with_context(|| format!("Failed to group survival rates by '{}'", key))?;

    let key_s = out.column(key)?.as_materialized_series().clone();
    let rate_s = out.column("rate")?.as_materialized_series().clone();
    let rate_ca = rate_s.f64()?;

    let mut rows = Vec::with_capacity(out.height());
    for i in 0..out.height() {
        let label = any_value_label(&key_s.get(i)?);
        let rate = rate_ca.get(i).map_or(f64::NAN, |r| r * 100.0);
        rows.push((label, rate));
    }
    Ok(rows)
}

/// Per-category outcome counts for a split count plot:
/// (label, perished count, survived count), sorted by label.
pub fn grouped_outcome_counts(df: &DataFrame, key: &str) -> Result<Vec<(String, u32, u32)>> {
    let key_s = df
        .column(key)
        .with_context(|| format!("Column '{}' not found", key))?
        .as_materialized_series()
        .clone();
    let survived = df
        .column(SURVIVED_COL)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let surv_ca = survived.i64()?;

    let mut counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for i in 0..df.height() {
        let label = any_value_label(&key_s.get(i)?);
        let entry = counts.entry(label).or_insert((0, 0));
        match surv_ca.get(i) {
            Some(1) => entry.1 += 1,
            Some(_) => entry.0 += 1,
            None => {}
        }
    }
    Ok(counts
        .into_iter()
        .map(|(label, (perished, survived))| (label, perished, survived))
        .collect())
}

/// Names of all numeric-typed columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Degenerate inputs (fewer than two complete pairs, or a zero-variance
/// side) yield NaN rather than an error.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| x.zip(*y))
        .collect();
    let n = pairs.len() as f64;
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Pairwise Pearson correlation matrix over the numeric columns.
///
/// The result is square and symmetric with 1.0 on the diagonal.
pub fn correlation_matrix(df: &DataFrame) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let names = numeric_column_names(df);
    if names.is_empty() {
        bail!("No numeric columns available for the correlation matrix");
    }

    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| crate::io::column_to_optional_f64(df, name))
        .collect::<Result<_>>()?;

    let n = names.len();
    let mut matrix = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok((names, matrix))
}

/// Non-null `Age` values split by outcome: (survived, perished).
pub fn ages_by_outcome(df: &DataFrame) -> Result<(Vec<f64>, Vec<f64>)> {
    let ages = crate::io::column_to_optional_f64(df, crate::clean::AGE_COL)?;
    let survived = df
        .column(SURVIVED_COL)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let surv_ca = survived.i64()?;

    let mut survived_ages = Vec::new();
    let mut perished_ages = Vec::new();
    for (age, outcome) in ages.iter().zip(surv_ca.into_iter()) {
        let (Some(age), Some(outcome)) = (age, outcome) else {
            continue;
        };
        if outcome == 1 {
            survived_ages.push(*age);
        } else {
            perished_ages.push(*age);
        }
    }
    Ok((survived_ages, perished_ages))
}

/// Gaussian kernel density estimate sampled on a regular grid.
///
/// Bandwidth follows Silverman's rule of thumb, floored at 0.01 so that
/// constant samples still produce a finite curve. The grid spans the data
/// range padded by three bandwidths on each side.
pub fn kde(values: &[f64], n_points: usize) -> Vec<(f64, f64)> {
    if values.is_empty() || n_points < 2 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std_dev = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    let bandwidth = (1.06 * std_dev * n.powf(-0.2)).max(0.01);

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lo = min - 3.0 * bandwidth;
    let hi = max + 3.0 * bandwidth;
    let step = (hi - lo) / (n_points - 1) as f64;

    const SQRT_TWO_PI: f64 = 2.5066282746310002;
    (0..n_points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp() / (SQRT_TWO_PI * bandwidth)
                })
                .sum::<f64>()
                / n;
            (x, density)
        })
        .collect()
}
