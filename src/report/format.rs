//! Formatted terminal reports for the summary and trend commands.

use crate::domain::{SeriesPoint, SeriesStats, TrendSummary};
use crate::io::IngestedData;
use crate::report::MakeTotal;

/// Format the run summary: dataset diagnostics, series stats, and the
/// manufacturer ranking table.
pub fn format_run_summary(
    source: &str,
    ingest: &IngestedData,
    stats: &SeriesStats,
    ranking: &[MakeTotal],
) -> String {
    let mut out = String::new();

    out.push_str("=== itrend - Incident Fatality Trends ===\n");
    out.push_str(&format!("Source: {source}\n"));

    out.push_str(&format!(
        "Rows: {} read | {} undated (skipped) | {} blank fatalities (count as 0)",
        ingest.rows_read, ingest.rows_undated, ingest.rows_defaulted
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(" | {} malformed", ingest.row_errors.len()));
    }
    out.push('\n');

    match stats.year_span {
        Some((lo, hi)) => out.push_str(&format!(
            "Series: {} points | {} manufacturers | years {lo}-{hi} | max {} fatalities/year\n",
            stats.n_points, stats.n_manufacturers, stats.max_fatalities
        )),
        None => out.push_str("Series: empty (no plottable points)\n"),
    }

    if !ranking.is_empty() {
        out.push_str("\nTop manufacturers by total fatalities:\n");
        out.push_str(&format!(
            "{:<24} {:>8} {:>6}\n",
            "make", "total", "years"
        ));
        out.push_str(&format!("{:-<24} {:-<8} {:-<6}\n", "", "", ""));
        for total in ranking {
            out.push_str(&format!(
                "{:<24} {:>8} {:>6}\n",
                truncate(&total.manufacturer, 24),
                total.total_fatalities,
                total.years
            ));
        }
    }

    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "\nMalformed rows (first {} of {}):\n",
            MAX_ROW_ERRORS_SHOWN.min(ingest.row_errors.len()),
            ingest.row_errors.len()
        ));
        for err in ingest.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
        }
    }

    out
}

/// Row-error lines shown before the listing is cut off.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the flattened series as a year-ordered table.
pub fn format_series_table(series: &[SeriesPoint]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<6} {:<24} {:>8}\n", "year", "make", "total"));
    out.push_str(&format!("{:-<6} {:-<24} {:-<8}\n", "", "", ""));
    for point in series {
        out.push_str(&format!(
            "{:<6} {:<24} {:>8}\n",
            point.year,
            truncate(&point.manufacturer, 24),
            point.total_fatalities
        ));
    }

    out
}

/// Format one manufacturer's series with its fitted trendline, if defined.
pub fn format_trend_report(
    manufacturer: &str,
    points: &[SeriesPoint],
    summary: Option<&TrendSummary>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Trend: {manufacturer} ===\n"));

    if points.is_empty() {
        out.push_str("No data points for this manufacturer.\n");
        return out;
    }

    let stats = SeriesStats::from_series(points);
    if let Some((lo, hi)) = stats.year_span {
        out.push_str(&format!(
            "Points: {} | years {lo}-{hi} | total {} fatalities\n",
            stats.n_points, stats.total_fatalities
        ));
    }

    match summary {
        Some(summary) => {
            out.push_str(&format!("Slope: {:.4} fatalities/year\n", summary.slope));
            out.push_str(&format!("Intercept: {:.4}\n", summary.intercept));
            out.push('\n');

            out.push_str(&format!("{:<6} {:>8} {:>10}\n", "year", "total", "fitted"));
            out.push_str(&format!("{:-<6} {:-<8} {:-<10}\n", "", "", ""));
            for (point, fitted) in points.iter().zip(&summary.points) {
                out.push_str(&format!(
                    "{:<6} {:>8} {:>10.1}\n",
                    point.year, point.total_fatalities, fitted.fitted
                ));
            }
        }
        None => {
            out.push('\n');
            out.push_str(&format!("{:<6} {:>8}\n", "year", "total"));
            out.push_str(&format!("{:-<6} {:-<8}\n", "", ""));
            for point in points {
                out.push_str(&format!("{:<6} {:>8}\n", point.year, point.total_fatalities));
            }
            out.push_str("\nTrendline: not defined (need at least two distinct years).\n");
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::rank_manufacturers;
    use crate::series::trend_summary;

    fn point(make: &str, year: i32, total: u64) -> SeriesPoint {
        SeriesPoint {
            manufacturer: make.to_string(),
            year,
            total_fatalities: total,
        }
    }

    #[test]
    fn run_summary_mentions_source_counts_and_top_make() {
        let ingest = IngestedData {
            rows_read: 5,
            rows_undated: 1,
            rows_defaulted: 2,
            ..Default::default()
        };
        let series = vec![point("Boeing", 2000, 50), point("Cessna", 2001, 3)];
        let stats = SeriesStats::from_series(&series);
        let ranking = rank_manufacturers(&series);

        let text = format_run_summary("incidents.csv", &ingest, &stats, &ranking);
        assert!(text.contains("Source: incidents.csv"));
        assert!(text.contains("5 read"));
        assert!(text.contains("1 undated"));
        assert!(text.contains("years 2000-2001"));
        assert!(text.contains("Boeing"));
    }

    #[test]
    fn run_summary_lists_malformed_rows() {
        let ingest = IngestedData {
            rows_read: 3,
            row_errors: vec![crate::io::RowError {
                line: 7,
                message: "unterminated quote".to_string(),
            }],
            ..Default::default()
        };
        let stats = SeriesStats::from_series(&[]);

        let text = format_run_summary("incidents.csv", &ingest, &stats, &[]);
        assert!(text.contains("1 malformed"));
        assert!(text.contains("(line 7) unterminated quote"));
    }

    #[test]
    fn series_table_is_year_ordered_rows() {
        let series = vec![point("Cessna", 2000, 3), point("Piper", 2001, 1)];
        let text = format_series_table(&series);

        assert!(text.contains("year"));
        let cessna = text.find("Cessna").unwrap();
        let piper = text.find("Piper").unwrap();
        assert!(cessna < piper);
    }

    #[test]
    fn run_summary_handles_empty_series() {
        let ingest = IngestedData::default();
        let stats = SeriesStats::from_series(&[]);

        let text = format_run_summary("incidents.csv", &ingest, &stats, &[]);
        assert!(text.contains("empty"));
        assert!(!text.contains("Top manufacturers"));
    }

    #[test]
    fn trend_report_lists_fitted_values() {
        let points = vec![
            point("Boeing", 2000, 0),
            point("Boeing", 2001, 2),
            point("Boeing", 2002, 4),
        ];
        let summary = trend_summary("Boeing", &points);

        let text = format_trend_report("Boeing", &points, summary.as_ref());
        assert!(text.contains("=== Trend: Boeing ==="));
        assert!(text.contains("Slope: 2.0000"));
        assert!(text.contains("fitted"));
        assert!(text.contains("2001"));
    }

    #[test]
    fn trend_report_explains_degenerate_fit() {
        let points = vec![point("Boeing", 2000, 5)];
        let text = format_trend_report("Boeing", &points, None);
        assert!(text.contains("not defined"));
        assert!(text.contains("2000"));
    }

    #[test]
    fn trend_report_handles_unknown_manufacturer() {
        let text = format_trend_report("Nonesuch", &[], None);
        assert!(text.contains("No data points"));
    }
}
