//! Reporting utilities: manufacturer rankings and formatted terminal output.
//!
//! Formatting code lives in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use serde::Serialize;

use crate::domain::SeriesPoint;

pub mod format;

pub use format::*;

/// Fatality totals for one manufacturer across the whole series.
#[derive(Debug, Clone, Serialize)]
pub struct MakeTotal {
    pub manufacturer: String,
    pub total_fatalities: u64,
    pub years: usize,
}

/// Rank manufacturers by total fatalities, highest first.
///
/// Ties keep series order, so the ranking is deterministic.
pub fn rank_manufacturers(series: &[SeriesPoint]) -> Vec<MakeTotal> {
    let mut totals: Vec<MakeTotal> = Vec::new();

    for point in series {
        match totals
            .iter_mut()
            .find(|t| t.manufacturer == point.manufacturer)
        {
            Some(total) => {
                total.total_fatalities += point.total_fatalities;
                total.years += 1;
            }
            None => totals.push(MakeTotal {
                manufacturer: point.manufacturer.clone(),
                total_fatalities: point.total_fatalities,
                years: 1,
            }),
        }
    }

    totals.sort_by_key(|t| std::cmp::Reverse(t.total_fatalities));
    totals
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
    fn ranks_by_total_descending() {
        let series = vec![
            point("Cessna", 2000, 3),
            point("Boeing", 2000, 100),
            point("Cessna", 2001, 4),
            point("Piper", 2001, 9),
        ];

        let ranking = rank_manufacturers(&series);
        let names: Vec<&str> = ranking.iter().map(|t| t.manufacturer.as_str()).collect();
        assert_eq!(names, vec!["Boeing", "Piper", "Cessna"]);
        assert_eq!(ranking[0].total_fatalities, 100);
        assert_eq!(ranking[2].total_fatalities, 7);
        assert_eq!(ranking[2].years, 2);
    }

    #[test]
    fn tied_totals_keep_series_order() {
        let series = vec![
            point("Mooney", 1990, 5),
            point("Bell", 1991, 5),
        ];

        let ranking = rank_manufacturers(&series);
        let names: Vec<&str> = ranking.iter().map(|t| t.manufacturer.as_str()).collect();
        assert_eq!(names, vec!["Mooney", "Bell"]);
    }

    #[test]
    fn empty_series_ranks_nothing() {
        assert!(rank_manufacturers(&[]).is_empty());
    }
}
