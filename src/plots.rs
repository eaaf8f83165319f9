//! Chart rendering for the five descriptive analyses.
//!
//! All charts are drawn with the [`plotters`] bitmap backend and saved as
//! PNG files, which keeps rendering working in headless environments.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

const PERISHED_COLOR: RGBColor = RGBColor(66, 104, 177);
const SURVIVED_COLOR: RGBColor = RGBColor(221, 132, 82);

/// Prepare the directory the chart files are written into.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Tick formatter for category axes: integer positions map to labels,
/// everything else is suppressed.
fn category_label(x: f64, labels: &[String]) -> String {
    let idx = x.round();
    if (x - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Bar chart of category frequencies.
///
/// Bars are centered on integer positions; the x axis shows one label per
/// category.
pub fn count_plot(
    data: &[(String, u32)],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    if data.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }

    let labels: Vec<String> = data.iter().map(|(label, _)| label.clone()).collect();
    let y_max = data.iter().map(|(_, count)| *count).max().unwrap_or(0) as f64 * 1.1;
    let y_max = y_max.max(1.0);

    let root = BitMapBackend::new(output_path, (900, 600));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..data.len() as f64 - 0.5, 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .x_labels(data.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, (_, count))| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *count as f64)],
                PERISHED_COLOR.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Bar chart of category frequencies split by outcome: two bars per
/// category with a legend.
pub fn grouped_count_plot(
    data: &[(String, u32, u32)],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    if data.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }

    let labels: Vec<String> = data.iter().map(|(label, _, _)| label.clone()).collect();
    let y_max = data
        .iter()
        .map(|(_, perished, survived)| (*perished).max(*survived))
        .max()
        .unwrap_or(0) as f64
        * 1.1;
    let y_max = y_max.max(1.0);

    let root = BitMapBackend::new(output_path, (900, 600));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..data.len() as f64 - 0.5, 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .x_labels(data.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, (_, perished, _))| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 - 0.02, *perished as f64)],
                PERISHED_COLOR.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Survived = 0")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], PERISHED_COLOR.filled()));

    chart
        .draw_series(data.iter().enumerate().map(|(i, (_, _, survived))| {
            Rectangle::new(
                [(i as f64 + 0.02, 0.0), (i as f64 + 0.35, *survived as f64)],
                SURVIVED_COLOR.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Survived = 1")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], SURVIVED_COLOR.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Overlaid density curves for the two outcome subsets, drawn as filled
/// area series with a legend.
pub fn kde_plot(
    survived: &[(f64, f64)],
    perished: &[(f64, f64)],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    if survived.is_empty() && perished.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }

    let all_points = survived.iter().chain(perished.iter());
    let x_min = all_points
        .clone()
        .map(|(x, _)| *x)
        .fold(f64::INFINITY, f64::min);
    let x_max = all_points
        .clone()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = all_points.map(|(_, y)| *y).fold(0.0f64, f64::max) * 1.1;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let root = BitMapBackend::new(output_path, (1200, 800));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Density")
        .label_style(("sans-serif", 22))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if !survived.is_empty() {
        chart
            .draw_series(
                AreaSeries::new(survived.iter().cloned(), 0.0, SURVIVED_COLOR.mix(0.3))
                    .border_style(&SURVIVED_COLOR),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label("Survived")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SURVIVED_COLOR));
    }
    if !perished.is_empty() {
        chart
            .draw_series(
                AreaSeries::new(perished.iter().cloned(), 0.0, PERISHED_COLOR.mix(0.3))
                    .border_style(&PERISHED_COLOR),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label("Did not Survive")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PERISHED_COLOR));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 22))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Maps a correlation coefficient in [-1, 1] onto a blue-white-red
/// gradient. NaN cells render grey.
fn correlation_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let r = r.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    if r >= 0.0 {
        // white -> warm red
        RGBColor(lerp(255, 180, r), lerp(255, 4, r), lerp(255, 38, r))
    } else {
        // white -> cool blue
        let t = -r;
        RGBColor(lerp(255, 59, t), lerp(255, 76, t), lerp(255, 192, t))
    }
}

/// Annotated heatmap of a square correlation matrix.
///
/// Rows are drawn top-down in label order; every cell carries a
/// two-decimal annotation.
pub fn correlation_heatmap(
    labels: &[String],
    matrix: &[Vec<f64>],
    title: &str,
    output_path: &Path,
) -> Result<()> {
    if labels.is_empty() {
        return Err(PlotError::InvalidData("Labels cannot be empty".to_string()));
    }
    if matrix.len() != labels.len() || matrix.iter().any(|row| row.len() != labels.len()) {
        return Err(PlotError::InvalidData(format!(
            "Matrix must be square with side {}",
            labels.len()
        )));
    }

    let n = labels.len();
    let root = BitMapBackend::new(output_path, (1200, 800));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // Row i sits in the y band [n-1-i, n-i] so the first label is at the
    // top. Ticks fall on integer cell boundaries; each one carries the
    // label of the cell it opens.
    let x_labels = labels.to_vec();
    let y_labels = labels.to_vec();
    let boundary_label = |pos: f64, labels: &[String]| -> String {
        let idx = pos.floor();
        if (pos - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n + 1)
        .y_labels(n + 1)
        .x_label_formatter(&|x| boundary_label(*x, &x_labels))
        .y_label_formatter(&|y| boundary_label(n as f64 - 1.0 - *y, &y_labels))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series((0..n).flat_map(|i| {
            let row = &matrix[i];
            (0..n).map(move |j| {
                Rectangle::new(
                    [
                        (j as f64, (n - 1 - i) as f64),
                        ((j + 1) as f64, (n - i) as f64),
                    ],
                    correlation_color(row[j]).filled(),
                )
            })
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let annotation_style =
        TextStyle::from(("sans-serif", 20)).pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series((0..n).flat_map(|i| {
            let row = &matrix[i];
            let style = annotation_style.clone();
            (0..n).map(move |j| {
                Text::new(
                    format!("{:.2}", row[j]),
                    (j as f64 + 0.5, (n - 1 - i) as f64 + 0.5),
                    style.clone(),
                )
            })
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
