//! Shared run pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load records -> aggregate -> display filters -> stats/rankings
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{remote, sample};
use crate::domain::{ChartConfig, DataSource, SeriesPoint, SeriesStats};
use crate::error::AppError;
use crate::io::{self, IngestedData};
use crate::report::{MakeTotal, rank_manufacturers};
use crate::series;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    /// The flattened series after display filters, sorted by year.
    pub series: Vec<SeriesPoint>,
    /// Distinct manufacturers in series order (legend/selection order).
    pub manufacturers: Vec<String>,
    pub stats: SeriesStats,
    /// Manufacturers ranked by total fatalities, highest first.
    pub ranking: Vec<MakeTotal>,
}

/// Execute the full pipeline and return the computed outputs.
///
/// An empty dataset is a valid outcome: the result carries an empty series
/// and zeroed stats, and the front-end decides how to present that.
pub fn run_chart(config: &ChartConfig) -> Result<RunOutput, AppError> {
    let ingest = load_records(&config.source)?;
    Ok(build_output(config, ingest))
}

/// Load raw records from whichever source the config names.
pub fn load_records(source: &DataSource) -> Result<IngestedData, AppError> {
    match source {
        DataSource::File(path) => io::load_csv_file(path),
        DataSource::Url(url) => remote::fetch_csv(url),
        DataSource::Sample { count, seed } => sample::generate_sample(*count, *seed),
    }
}

/// Aggregate and post-process a pre-loaded dataset.
///
/// Split out from `run_chart` so the TUI can re-apply filters without
/// re-reading the source.
pub fn build_output(config: &ChartConfig, ingest: IngestedData) -> RunOutput {
    let full = series::aggregate(&ingest.records);
    let series = apply_display_filters(&full, config);
    let manufacturers = series::manufacturers(&series);
    let stats = SeriesStats::from_series(&series);
    let ranking = rank_manufacturers(&series);

    RunOutput {
        ingest,
        series,
        manufacturers,
        stats,
        ranking,
    }
}

/// Narrow the plotted series per the display filters.
///
/// Filters never change aggregation semantics: totals are computed first,
/// then points are dropped. `top_makes` keeps the N manufacturers with the
/// highest totals within the already year/name-filtered series.
fn apply_display_filters(series: &[SeriesPoint], config: &ChartConfig) -> Vec<SeriesPoint> {
    let needle = config.make_filter.as_ref().map(|s| s.to_lowercase());

    let mut out: Vec<SeriesPoint> = series
        .iter()
        .filter(|p| config.year_min.map_or(true, |lo| p.year >= lo))
        .filter(|p| config.year_max.map_or(true, |hi| p.year <= hi))
        .filter(|p| match &needle {
            Some(text) => p.manufacturer.to_lowercase().contains(text),
            None => true,
        })
        .cloned()
        .collect();

    if let Some(n) = config.top_makes {
        let ranking = rank_manufacturers(&out);
        let keep: Vec<&str> = ranking
            .iter()
            .take(n)
            .map(|t| t.manufacturer.as_str())
            .collect();
        out.retain(|p| keep.contains(&p.manufacturer.as_str()));
    }

    out
}
