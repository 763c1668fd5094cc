//! Trendline fitting over one manufacturer's sub-series.
//!
//! The fit is plain OLS on (year, total fatalities). Degenerate input, which
//! here means fewer than two points or every point on the same year, yields
//! an empty trend rather than an error; the chart simply draws no trendline.

use crate::domain::{SeriesPoint, TrendPoint, TrendSummary};
use crate::math::{OlsLine, fit_line};

/// The fitted regression line for a sub-series, when one is defined.
pub fn trend_line(points: &[SeriesPoint]) -> Option<OlsLine> {
    let pairs: Vec<(f64, f64)> = points
        .iter()
        .map(|point| (f64::from(point.year), point.total_fatalities as f64))
        .collect();
    fit_line(&pairs)
}

/// Fit a trendline and evaluate it at every input point.
///
/// The result is parallel to the input: one fitted point per series point, in
/// the same order. Degenerate input yields an empty vector. Fitted values are
/// always finite.
pub fn fit_trend(points: &[SeriesPoint]) -> Vec<TrendPoint> {
    match trend_line(points) {
        Some(line) => evaluate(points, line),
        None => Vec::new(),
    }
}

/// Trend parameters plus fitted points, in report-friendly form.
pub fn trend_summary(manufacturer: &str, points: &[SeriesPoint]) -> Option<TrendSummary> {
    let line = trend_line(points)?;
    Some(TrendSummary {
        manufacturer: manufacturer.to_string(),
        slope: line.slope,
        intercept: line.intercept,
        n_points: points.len(),
        points: evaluate(points, line),
    })
}

fn evaluate(points: &[SeriesPoint], line: OlsLine) -> Vec<TrendPoint> {
    points
        .iter()
        .map(|point| TrendPoint {
            year: point.year,
            fitted: line.value_at(f64::from(point.year)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(make: &str, year: i32, total: u64) -> SeriesPoint {
        SeriesPoint {
            manufacturer: make.to_string(),
            year,
            total_fatalities: total,
        }
    }

    #[test]
    fn fits_known_line_exactly() {
        // (2000,0) (2001,2) (2002,4): slope 2, intercept -4000, exact in f64.
        let points = vec![
            point("Boeing", 2000, 0),
            point("Boeing", 2001, 2),
            point("Boeing", 2002, 4),
        ];

        let line = trend_line(&points).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-9);
        assert!((line.intercept - (-4000.0)).abs() < 1e-6);

        let trend = fit_trend(&points);
        assert_eq!(trend.len(), 3);
        assert!((trend[0].fitted - 0.0).abs() < 1e-9);
        assert!((trend[1].fitted - 2.0).abs() < 1e-9);
        assert!((trend[2].fitted - 4.0).abs() < 1e-9);
    }

    #[test]
    fn trend_is_parallel_to_input_order() {
        let points = vec![
            point("Cessna", 1990, 5),
            point("Cessna", 1991, 2),
            point("Cessna", 1995, 9),
        ];

        let trend = fit_trend(&points);
        let years: Vec<i32> = trend.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![1990, 1991, 1995]);
    }

    #[test]
    fn residuals_of_ols_fit_sum_to_zero() {
        let points = vec![
            point("Piper", 1980, 3),
            point("Piper", 1981, 7),
            point("Piper", 1982, 4),
            point("Piper", 1985, 12),
        ];

        let line = trend_line(&points).unwrap();
        let residual_sum: f64 = points
            .iter()
            .map(|p| p.total_fatalities as f64 - line.value_at(f64::from(p.year)))
            .sum();
        assert!(residual_sum.abs() < 1e-9);
    }

    #[test]
    fn single_point_yields_empty_trend() {
        let points = vec![point("Boeing", 2000, 5)];
        assert!(fit_trend(&points).is_empty());
        assert!(trend_line(&points).is_none());
        assert!(trend_summary("Boeing", &points).is_none());
    }

    #[test]
    fn empty_input_yields_empty_trend() {
        assert!(fit_trend(&[]).is_empty());
    }

    #[test]
    fn fitted_values_are_always_finite() {
        let points = vec![
            point("Beech", 1970, 0),
            point("Beech", 2020, u64::from(u32::MAX)),
        ];

        for t in fit_trend(&points) {
            assert!(t.fitted.is_finite());
        }
    }

    #[test]
    fn summary_carries_line_parameters() {
        let points = vec![
            point("Boeing", 2000, 0),
            point("Boeing", 2001, 2),
            point("Boeing", 2002, 4),
        ];

        let summary = trend_summary("Boeing", &points).unwrap();
        assert_eq!(summary.manufacturer, "Boeing");
        assert_eq!(summary.n_points, 3);
        assert!((summary.slope - 2.0).abs() < 1e-9);
        assert_eq!(summary.points.len(), 3);
    }
}
