//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be:
//!
//! - used in-memory during aggregation and trend fitting
//! - printed as tables or emitted as JSON on stdout
//! - handed to the chart widgets without further conversion

use std::path::PathBuf;

use serde::Serialize;

/// A raw incident row as handed over by the data source.
///
/// Values stay close to the source on purpose: the aggregator owns year
/// extraction and fatality defaulting, so a record with a bad date or a blank
/// fatality cell is still a valid `IncidentRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentRecord {
    /// Raw event-date text. Parsed to a year by the aggregator; records whose
    /// date cannot be parsed are excluded from the series.
    pub event_date: String,
    /// Fatal-injury count. `None` means the source cell was missing or not a
    /// non-negative integer; such records count as zero fatalities.
    pub fatalities: Option<u32>,
    /// Manufacturer name as written in the source. May be empty. Name and
    /// case variants are deliberately kept as distinct groups.
    pub manufacturer: String,
}

/// One aggregated point: total fatalities for a (manufacturer, year) pair.
///
/// Within one manufacturer's subset the year is unique; the total is the exact
/// sum over every record with that manufacturer and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub manufacturer: String,
    pub year: i32,
    pub total_fatalities: u64,
}

/// One fitted point of an OLS trendline, parallel to a `SeriesPoint` subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub fitted: f64,
}

/// Trend output in report-friendly form: line parameters plus fitted points.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub manufacturer: String,
    pub slope: f64,
    pub intercept: f64,
    pub n_points: usize,
    pub points: Vec<TrendPoint>,
}

/// Where the raw records come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A local CSV file.
    File(PathBuf),
    /// A CSV document fetched over HTTP(S).
    Url(String),
    /// A deterministic synthetic dataset (demo mode, no file needed).
    Sample { count: usize, seed: u64 },
}

impl DataSource {
    /// Short label for headers and status lines.
    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
            DataSource::Sample { count, seed } => {
                format!("synthetic sample (n={count}, seed={seed})")
            }
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). The display filters are
/// presentation conveniences: they narrow what is plotted and never change
/// the aggregation semantics themselves.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub source: DataSource,
    /// Keep only records from this year onward (inclusive).
    pub year_min: Option<i32>,
    /// Keep only records up to this year (inclusive).
    pub year_max: Option<i32>,
    /// Case-insensitive substring filter on the manufacturer name.
    pub make_filter: Option<String>,
    /// Keep only the N manufacturers with the highest fatality totals.
    pub top_makes: Option<usize>,
}

/// Summary stats over the flattened series, used for chart bounds and reports.
///
/// `year_span` is `None` when the series is empty; an empty series is a valid
/// outcome (blank chart), not an error.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesStats {
    pub n_points: usize,
    pub n_manufacturers: usize,
    pub year_span: Option<(i32, i32)>,
    pub max_fatalities: u64,
    pub total_fatalities: u64,
}

impl SeriesStats {
    pub fn from_series(series: &[SeriesPoint]) -> Self {
        let mut year_span: Option<(i32, i32)> = None;
        let mut max_fatalities = 0u64;
        let mut total_fatalities = 0u64;
        let mut manufacturers: Vec<&str> = Vec::new();

        for p in series {
            year_span = Some(match year_span {
                None => (p.year, p.year),
                Some((lo, hi)) => (lo.min(p.year), hi.max(p.year)),
            });
            max_fatalities = max_fatalities.max(p.total_fatalities);
            total_fatalities += p.total_fatalities;
            if !manufacturers.contains(&p.manufacturer.as_str()) {
                manufacturers.push(&p.manufacturer);
            }
        }

        Self {
            n_points: series.len(),
            n_manufacturers: manufacturers.len(),
            year_span,
            max_fatalities,
            total_fatalities,
        }
    }
}
