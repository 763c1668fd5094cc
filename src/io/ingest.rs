//! CSV ingest for incident datasets.
//!
//! This module turns a raw incident CSV into `IncidentRecord`s plus row-level
//! diagnostics. It validates the schema (clear errors + exit code 2) but is
//! deliberately lenient about row content: a record with a blank date or a
//! non-numeric fatality cell is still ingested, and the aggregation layer
//! applies the documented defaults. An empty dataset is not an ingest error;
//! it simply yields an empty series downstream.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::IncidentRecord;
use crate::error::AppError;
use crate::series::parse_event_year;

/// Normalized names of the three required columns.
const COL_DATE: &str = "event_date";
const COL_FATALITIES: &str = "total_fatal_injuries";
const COL_MAKE: &str = "make";

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw records plus counts for the run report.
///
/// `rows_undated` counts rows whose date cell will not yield a year (the
/// aggregation drops them); `rows_defaulted` counts rows whose fatality cell
/// was missing or non-numeric (they sum as zero).
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub records: Vec<IncidentRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_undated: usize,
    pub rows_defaulted: usize,
}

/// Load incident records from a CSV file on disk.
pub fn load_csv_file(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_csv(file)
}

/// Parse incident records from any CSV byte stream.
///
/// Shared by the file and HTTP sources.
pub fn parse_csv(input: impl Read) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut data = IngestedData::default();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        data.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                data.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let event_date = get_optional(&record, &header_map, COL_DATE)
            .unwrap_or("")
            .to_string();
        let fatalities = get_optional(&record, &header_map, COL_FATALITIES).and_then(parse_fatalities);
        let manufacturer = get_optional(&record, &header_map, COL_MAKE)
            .unwrap_or("")
            .to_string();

        if parse_event_year(&event_date).is_none() {
            data.rows_undated += 1;
        }
        if fatalities.is_none() {
            data.rows_defaulted += 1;
        }

        data.records.push(IncidentRecord {
            event_date,
            fatalities,
            manufacturer,
        });
    }

    Ok(data)
}

/// Parse a fatality cell to a non-negative count.
///
/// Anything that is not a plain non-negative integer reads as `None`, which
/// the aggregation counts as zero.
pub fn parse_fatalities(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u32>().ok()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. Dataset variants also write `Event.Date` or `Event Date`
    // where this crate expects `Event_Date`, so separators are folded too.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase().replace(['.', ' '], "_")
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in [COL_DATE, COL_FATALITIES, COL_MAKE] {
        if !header_map.contains_key(name) {
            return Err(AppError::usage(format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ingest(text: &str) -> IngestedData {
        parse_csv(Cursor::new(text.to_string())).unwrap()
    }

    #[test]
    fn reads_well_formed_rows() {
        let data = ingest(
            "Event_Date,Total_Fatal_Injuries,Make\n\
             2000-05-01,2,Boeing\n\
             2001-01-15,0,Cessna\n",
        );

        assert_eq!(data.rows_read, 2);
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.records[0].event_date, "2000-05-01");
        assert_eq!(data.records[0].fatalities, Some(2));
        assert_eq!(data.records[0].manufacturer, "Boeing");
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let data = ingest(
            "\u{feff}EVENT_DATE,total_fatal_injuries,MAKE\n\
             2000-05-01,1,Piper\n",
        );
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].manufacturer, "Piper");
    }

    #[test]
    fn dotted_and_spaced_header_variants_are_accepted() {
        let data = ingest(
            "Event.Date,Total.Fatal.Injuries,Make\n\
             2000-05-01,3,Beech\n",
        );
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].fatalities, Some(3));
    }

    #[test]
    fn missing_required_column_is_a_usage_error() {
        let err = parse_csv(Cursor::new(
            "Event_Date,Make\n2000-05-01,Boeing\n".to_string(),
        ))
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("total_fatal_injuries"));
    }

    #[test]
    fn blank_and_bad_cells_become_defaults() {
        let data = ingest(
            "Event_Date,Total_Fatal_Injuries,Make\n\
             not-a-date,5,Boeing\n\
             2000-01-01,,Boeing\n\
             2000-02-01,n/a,Cessna\n",
        );

        assert_eq!(data.rows_read, 3);
        assert_eq!(data.records.len(), 3);
        assert_eq!(data.rows_undated, 1);
        assert_eq!(data.rows_defaulted, 2);
        assert_eq!(data.records[1].fatalities, None);
        assert_eq!(data.records[2].fatalities, None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let data = ingest(
            "Event_Date,Total_Fatal_Injuries,Make\n\
             2000-05-01\n",
        );
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].fatalities, None);
        assert_eq!(data.records[0].manufacturer, "");
    }

    #[test]
    fn fatality_parse_is_strict() {
        assert_eq!(parse_fatalities("3"), Some(3));
        assert_eq!(parse_fatalities(" 12 "), Some(12));
        assert_eq!(parse_fatalities(""), None);
        assert_eq!(parse_fatalities("-1"), None);
        assert_eq!(parse_fatalities("2.5"), None);
        assert_eq!(parse_fatalities("two"), None);
    }

    #[test]
    fn header_only_file_yields_empty_dataset() {
        let data = ingest("Event_Date,Total_Fatal_Injuries,Make\n");
        assert!(data.records.is_empty());
        assert_eq!(data.rows_read, 0);
    }
}
