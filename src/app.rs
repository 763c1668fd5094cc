//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset source (flag, environment, or picker)
//! - runs the aggregation pipeline
//! - prints reports/plots or hands off to the TUI

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, RunArgs, SummaryArgs, TrendArgs, picker};
use crate::data::remote;
use crate::domain::{ChartConfig, DataSource, SeriesPoint};
use crate::error::AppError;
use crate::series;

pub mod pipeline;

/// Ranking rows shown by `summary` when `--top` is not given.
const DEFAULT_RANKING_ROWS: usize = 20;

/// Entry point for the `itrend` binary.
pub fn run() -> Result<(), AppError> {
    // We want `itrend` and `itrend --sample 500` to behave like `itrend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Trend(args) => handle_trend(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args.run)?;
    let run = pipeline::run_chart(&config)?;

    if run.series.is_empty() {
        return Err(AppError::data(
            "No plottable points after aggregation/filtering.",
        ));
    }

    if args.run.json {
        return print_summary_json(&config, &run, args.table);
    }

    let shown = args
        .run
        .top
        .unwrap_or(DEFAULT_RANKING_ROWS)
        .min(run.ranking.len());
    println!(
        "{}",
        crate::report::format_run_summary(
            &config.source.describe(),
            &run.ingest,
            &run.stats,
            &run.ranking[..shown],
        )
    );
    if run.ranking.len() > shown {
        println!("(+{} more manufacturers)", run.ranking.len() - shown);
    }

    if args.table {
        println!();
        println!("{}", crate::report::format_series_table(&run.series));
    }

    if args.plot {
        println!(
            "{}",
            crate::plot::render_ascii_chart(&run.series, &[], &[], args.width, args.height)
        );
    }

    Ok(())
}

fn handle_trend(args: TrendArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args.run)?;
    let run = pipeline::run_chart(&config)?;

    if run.series.is_empty() {
        return Err(AppError::data(
            "No plottable points after aggregation/filtering.",
        ));
    }

    let selected = series::select_manufacturer(&run.series, Some(&args.manufacturer));
    let summary = series::trend_summary(&args.manufacturer, &selected);

    if args.run.json {
        let payload = serde_json::json!({
            "manufacturer": args.manufacturer,
            "points": selected,
            "trend": summary,
        });
        println!("{}", to_pretty_json(&payload)?);
        return Ok(());
    }

    println!(
        "{}",
        crate::report::format_trend_report(&args.manufacturer, &selected, summary.as_ref())
    );

    if args.plot && !selected.is_empty() {
        let trend = summary.map(|s| s.points).unwrap_or_default();
        let background: Vec<SeriesPoint> = run
            .series
            .iter()
            .filter(|p| p.manufacturer != args.manufacturer)
            .cloned()
            .collect();
        println!(
            "{}",
            crate::plot::render_ascii_chart(&background, &selected, &trend, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_tui(args: RunArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args)?;
    crate::tui::run(config)
}

fn print_summary_json(
    config: &ChartConfig,
    run: &pipeline::RunOutput,
    include_series: bool,
) -> Result<(), AppError> {
    let mut payload = serde_json::json!({
        "source": config.source.describe(),
        "rows": {
            "read": run.ingest.rows_read,
            "undated": run.ingest.rows_undated,
            "blank_fatalities": run.ingest.rows_defaulted,
            "malformed": run.ingest.row_errors.len(),
        },
        "stats": run.stats,
        "ranking": run.ranking,
    });
    if include_series {
        payload["series"] = serde_json::json!(run.series);
    }
    println!("{}", to_pretty_json(&payload)?);
    Ok(())
}

fn to_pretty_json(value: &serde_json::Value) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::runtime(format!("JSON encoding failed: {e}")))
}

/// Build the run configuration, resolving the dataset source.
pub fn chart_config_from_args(args: &RunArgs) -> Result<ChartConfig, AppError> {
    if let (Some(lo), Some(hi)) = (args.year_min, args.year_max) {
        if lo > hi {
            return Err(AppError::usage(format!(
                "--year-min {lo} is greater than --year-max {hi}."
            )));
        }
    }

    Ok(ChartConfig {
        source: resolve_source(args)?,
        year_min: args.year_min,
        year_max: args.year_max,
        make_filter: args.make.clone(),
        top_makes: args.top,
    })
}

/// Resolution order: explicit flags, then the `INCIDENTS_CSV` environment
/// variable (path or URL), then the interactive picker.
fn resolve_source(args: &RunArgs) -> Result<DataSource, AppError> {
    if let Some(count) = args.sample {
        return Ok(DataSource::Sample {
            count,
            seed: args.seed,
        });
    }
    if let Some(url) = &args.url {
        return Ok(DataSource::Url(url.clone()));
    }
    if let Some(path) = &args.csv {
        return Ok(DataSource::File(picker::validate_dataset_path(path)?));
    }

    if let Some(location) = remote::dataset_from_env() {
        if remote::is_url(&location) {
            return Ok(DataSource::Url(location));
        }
        return Ok(DataSource::File(picker::validate_dataset_path(Path::new(
            &location,
        ))?));
    }

    Ok(DataSource::File(picker::prompt_for_dataset()?))
}

/// Rewrite argv so `itrend` defaults to `itrend tui`.
///
/// Rules:
/// - `itrend`                      -> `itrend tui`
/// - `itrend --sample 500 ...`     -> `itrend tui --sample 500 ...`
/// - `itrend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "trend" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["itrend"])), argv(&["itrend", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["itrend", "--sample", "500"])),
            argv(&["itrend", "tui", "--sample", "500"])
        );
    }

    #[test]
    fn subcommands_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["itrend", "summary", "-f", "x.csv"])),
            argv(&["itrend", "summary", "-f", "x.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["itrend", "trend", "Boeing"])),
            argv(&["itrend", "trend", "Boeing"])
        );
    }

    #[test]
    fn help_and_version_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["itrend", "--help"])),
            argv(&["itrend", "--help"])
        );
        assert_eq!(
            rewrite_args(argv(&["itrend", "-V"])),
            argv(&["itrend", "-V"])
        );
    }

    #[test]
    fn sample_flag_resolves_to_sample_source() {
        let args = RunArgs {
            csv: None,
            url: None,
            sample: Some(250),
            seed: 9,
            year_min: None,
            year_max: None,
            make: None,
            top: None,
            json: false,
        };

        let config = chart_config_from_args(&args).unwrap();
        match config.source {
            DataSource::Sample { count, seed } => {
                assert_eq!(count, 250);
                assert_eq!(seed, 9);
            }
            other => panic!("expected sample source, got {other:?}"),
        }
    }

    #[test]
    fn inverted_year_range_is_a_usage_error() {
        let args = RunArgs {
            csv: None,
            url: None,
            sample: Some(10),
            seed: 42,
            year_min: Some(2005),
            year_max: Some(2000),
            make: None,
            top: None,
            json: false,
        };

        let err = chart_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
