use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use titanic_eda::{analysis, clean, io, plots};

const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/datasciencedojo/datasets/master/titanic.csv";

#[derive(Parser, Debug)]
#[clap(author, version, about = "Descriptive survival analysis of the Titanic passenger dataset", long_about = None)]
struct Cli {
    /// URL of the passenger dataset (headered CSV)
    #[clap(long, env = "TITANIC_DATASET_URL", default_value = DEFAULT_DATASET_URL)]
    url: String,
    /// Directory the chart PNGs are written to
    #[clap(long, default_value = "plots")]
    output_dir: PathBuf,
    /// Wait for Enter after each chart instead of proceeding immediately
    #[clap(long)]
    pause: bool,
}

fn print_missing_values(df: &polars::prelude::DataFrame) {
    for (name, count) in io::null_counts(df) {
        println!("{:<14} {}", name, count);
    }
}

fn wait_for_ack(pause: bool) -> Result<()> {
    if !pause {
        return Ok(());
    }
    print!("Press Enter to continue...");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    // --- Load ---
    let df = io::fetch_passenger_table(&cli.url)?;
    log::info!(
        "Loaded passenger table from {}. Shape: {:?}",
        cli.url,
        df.shape()
    );

    println!("--- Initial Data ---");
    println!("First 5 rows of the dataset:");
    println!("{}", df.head(Some(5)));
    println!();

    // --- Clean ---
    println!("--- Data Cleaning Process ---");
    println!("Dataset Info Before Cleaning:");
    println!("{} rows x {} columns", df.height(), df.width());
    for (name, dtype) in df.schema().iter() {
        println!("{:<14} {}", name, dtype);
    }

    println!("\nMissing Values Before Cleaning:");
    print_missing_values(&df);

    let (df, age_median) = clean::fill_age_with_median(df)?;
    log::info!("Filled '{}' nulls with median {}", clean::AGE_COL, age_median);

    let (df, embarked_mode) = clean::fill_embarked_with_mode(df)?;
    log::info!(
        "Filled '{}' nulls with mode '{}'",
        clean::EMBARKED_COL,
        embarked_mode
    );

    // The derived table without 'Cabin' is discarded on purpose: the
    // working table keeps the column and its nulls, reproducing the
    // original run's behavior.
    let _ = clean::drop_cabin(&df)?;

    println!("\nMissing Values After Cleaning:");
    print_missing_values(&df);
    println!("\nData cleaning complete.\n");

    // --- Analyze / visualize ---
    println!("--- Starting Exploratory Data Analysis ---");
    plots::ensure_output_dir(&cli.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", cli.output_dir))?;

    // Analysis 1: overall survival
    let counts: Vec<(String, u32)> = analysis::survival_counts(&df)?
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    let path = cli.output_dir.join("survival_count.png");
    plots::count_plot(
        &counts,
        "Overall Survival Count (0 = No, 1 = Yes)",
        "Survived",
        &path,
    )?;
    println!("Saved chart to {:?}", path);
    wait_for_ack(cli.pause)?;

    let survival_rate = analysis::overall_survival_rate(&df)?;
    println!("Overall Survival Rate: {:.2}%", survival_rate);

    // Analysis 2: survival by gender
    let by_gender = analysis::grouped_outcome_counts(&df, "Sex")?;
    let path = cli.output_dir.join("survival_by_gender.png");
    plots::grouped_count_plot(&by_gender, "Survival Count by Gender", "Sex", &path)?;
    println!("\nSaved chart to {:?}", path);
    wait_for_ack(cli.pause)?;

    println!("Survival Rate by Gender:");
    for (label, rate) in analysis::grouped_survival_rates(&df, "Sex")? {
        println!("{:<10} {:.2}%", label, rate);
    }

    // Analysis 3: survival by passenger class
    let by_class = analysis::grouped_outcome_counts(&df, "Pclass")?;
    let path = cli.output_dir.join("survival_by_class.png");
    plots::grouped_count_plot(&by_class, "Survival Count by Passenger Class", "Pclass", &path)?;
    println!("\nSaved chart to {:?}", path);
    wait_for_ack(cli.pause)?;

    println!("Survival Rate by Passenger Class:");
    for (label, rate) in analysis::grouped_survival_rates(&df, "Pclass")? {
        println!("{:<10} {:.2}%", label, rate);
    }

    // Analysis 4: age distribution by outcome
    let (survived_ages, perished_ages) = analysis::ages_by_outcome(&df)?;
    let survived_kde = analysis::kde(&survived_ages, 200);
    let perished_kde = analysis::kde(&perished_ages, 200);
    let path = cli.output_dir.join("age_distribution.png");
    plots::kde_plot(
        &survived_kde,
        &perished_kde,
        "Age Distribution of Passengers by Survival Status",
        "Age",
        &path,
    )?;
    println!("\nSaved chart to {:?}", path);
    wait_for_ack(cli.pause)?;

    // Analysis 5: correlation heatmap over numeric columns
    let (labels, matrix) = analysis::correlation_matrix(&df)?;
    let path = cli.output_dir.join("correlation_heatmap.png");
    plots::correlation_heatmap(
        &labels,
        &matrix,
        "Correlation Matrix of Numerical Features",
        &path,
    )?;
    println!("Saved chart to {:?}", path);
    wait_for_ack(cli.pause)?;

    println!(
        "\n--- EDA Complete. Total Time: {:.2?} ---",
        start_time.elapsed()
    );
    Ok(())
}
