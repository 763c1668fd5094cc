//! Aggregation: raw incident records in, one flattened ordered series out.
//!
//! The transform is deliberately forgiving. Rows with unparseable dates are
//! dropped without ceremony, missing fatality counts sum as zero, and an
//! empty input produces an empty series. Callers that want row diagnostics
//! run the same parse functions themselves; the aggregate never fails.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{IncidentRecord, SeriesPoint};

/// Accepted event-date layouts, tried in order. The aviation datasets mix ISO
/// dates with US-style slashed dates, so both families are recognized. The
/// two-digit-year form must come before `%m/%d/%Y`: chrono's `%Y` accepts
/// short years, so "12/31/99" would otherwise parse as year 99.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d"];

/// Extract the calendar year from an event-date cell.
///
/// Returns `None` for blank or unrecognized text; the caller drops such
/// records from the series.
pub fn parse_event_year(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.year());
        }
    }
    None
}

/// Coerce an optional fatality count to the number that enters the sum.
///
/// Missing counts contribute zero. The default is deliberate: a blank cell in
/// the source means "no fatalities recorded", not "discard the incident".
pub fn fatality_count(fatalities: Option<u32>) -> u64 {
    fatalities.map_or(0, u64::from)
}

/// Aggregate incident records into a flattened series of
/// (manufacturer, year, total fatalities) points.
///
/// Grouping runs in first-encounter order: the first record naming a
/// manufacturer fixes that manufacturer's position, and within a manufacturer
/// the first record of a year fixes that year's position. The flattened
/// result is then stable-sorted by year, so points sharing a year keep their
/// grouping order. Records whose date yields no year are skipped.
pub fn aggregate(records: &[IncidentRecord]) -> Vec<SeriesPoint> {
    let mut groups: Vec<(String, Vec<(i32, u64)>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(year) = parse_event_year(&record.event_date) else {
            continue;
        };
        let count = fatality_count(record.fatalities);

        let at = match index.get(record.manufacturer.as_str()) {
            Some(&at) => at,
            None => {
                let at = groups.len();
                index.insert(record.manufacturer.clone(), at);
                groups.push((record.manufacturer.clone(), Vec::new()));
                at
            }
        };

        let years = &mut groups[at].1;
        match years.iter_mut().find(|(y, _)| *y == year) {
            Some((_, total)) => *total += count,
            None => years.push((year, count)),
        }
    }

    let mut series: Vec<SeriesPoint> = groups
        .into_iter()
        .flat_map(|(manufacturer, years)| {
            years.into_iter().map(move |(year, total_fatalities)| SeriesPoint {
                manufacturer: manufacturer.clone(),
                year,
                total_fatalities,
            })
        })
        .collect();

    // Stable by construction: sort_by_key preserves grouping order within a year.
    series.sort_by_key(|point| point.year);
    series
}

/// Distinct manufacturer names in order of first appearance in the series.
///
/// This is the order the legend and the selection list use.
pub fn manufacturers(series: &[SeriesPoint]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for point in series {
        if !names.iter().any(|name| name == &point.manufacturer) {
            names.push(point.manufacturer.clone());
        }
    }
    names
}

/// The sub-series for one manufacturer, in series order.
///
/// `None` means no selection; both it and an unknown name yield an empty
/// vector, which downstream renders as "nothing highlighted" rather than an
/// error.
pub fn select_manufacturer(series: &[SeriesPoint], selection: Option<&str>) -> Vec<SeriesPoint> {
    match selection {
        Some(name) => series
            .iter()
            .filter(|point| point.manufacturer == name)
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}
