//! Command-line parsing for the incident trend chart.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the aggregation/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "itrend",
    version,
    about = "Aviation incident fatality trends by manufacturer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a dataset and print the run summary and manufacturer ranking.
    Summary(SummaryArgs),
    /// Print one manufacturer's yearly series with its fitted trendline.
    Trend(TrendArgs),
    /// Launch the interactive chart TUI.
    ///
    /// This uses the same aggregation pipeline as `itrend summary`, but
    /// renders the series as a chart with a selectable trendline.
    Tui(RunArgs),
}

/// Common dataset and display-filter options.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// CSV file with incident records.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Fetch the CSV from a URL instead of a file.
    #[arg(long, value_name = "URL", conflicts_with = "csv")]
    pub url: Option<String>,

    /// Generate a synthetic sample of N records instead of reading a dataset.
    #[arg(long, value_name = "N", conflicts_with_all = ["csv", "url"])]
    pub sample: Option<usize>,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Keep only records from this year onward.
    #[arg(long, value_name = "YEAR")]
    pub year_min: Option<i32>,

    /// Keep only records up to this year.
    #[arg(long, value_name = "YEAR")]
    pub year_max: Option<i32>,

    /// Keep only manufacturers whose name contains this text.
    #[arg(long, value_name = "TEXT")]
    pub make: Option<String>,

    /// Keep only the N manufacturers with the most fatalities.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Print results as JSON instead of formatted text.
    #[arg(long)]
    pub json: bool,
}

/// Options for the run summary.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Print the full per-year series table under the ranking.
    #[arg(long)]
    pub table: bool,

    /// Render an ASCII chart of every manufacturer's series.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for the trend report.
#[derive(Debug, Parser)]
pub struct TrendArgs {
    /// Manufacturer to fit (exact name as it appears in the data).
    #[arg(value_name = "MANUFACTURER")]
    pub manufacturer: String,

    #[command(flatten)]
    pub run: RunArgs,

    /// Render an ASCII chart under the report.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trend_command() {
        let cli = Cli::try_parse_from(["itrend", "trend", "Boeing", "--sample", "50", "--plot"])
            .unwrap();
        match cli.command {
            Command::Trend(args) => {
                assert_eq!(args.manufacturer, "Boeing");
                assert_eq!(args.run.sample, Some(50));
                assert!(args.plot);
            }
            other => panic!("expected trend command, got {other:?}"),
        }
    }

    #[test]
    fn csv_and_url_conflict() {
        let err = Cli::try_parse_from([
            "itrend", "summary", "--csv", "a.csv", "--url", "https://x/y.csv",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn summary_defaults() {
        let cli = Cli::try_parse_from(["itrend", "summary", "--sample", "100"]).unwrap();
        match cli.command {
            Command::Summary(args) => {
                assert_eq!(args.run.seed, 42);
                assert_eq!(args.run.top, None);
                assert!(!args.run.json);
                assert!(!args.table);
                assert!(!args.plot);
            }
            other => panic!("expected summary command, got {other:?}"),
        }
    }
}
