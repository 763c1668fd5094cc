//! Interactive dataset picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `itrend` and choose a dataset" UX
//!
//! The picker searches for `*.csv` files under the current working directory
//! and marks the ones whose header carries the incident schema, so the user
//! can tell an incident export from some unrelated CSV at a glance.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select an incident CSV from the current directory tree.
///
/// Behavior:
/// - list discovered `*.csv` files, marking ones with the incident schema
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_dataset() -> Result<PathBuf, AppError> {
    let files = discover_datasets();
    if files.is_empty() {
        return Err(AppError::usage(
            "No .csv files found. Provide one with `-f <file.csv>` or run with `--sample 500`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        let marker = if file_has_incident_header(path) {
            "  [incident schema]"
        } else {
            ""
        };
        println!("{:>3}) {}{marker}", idx + 1, pretty_path(path));
    }

    loop {
        print!(
            "Select a file by number (1-{}) or type a path (q to quit): ",
            files.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::usage(
                "No input received. Provide a CSV path with `-f <file.csv>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::usage("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_dataset_path(&files[choice - 1]);
            }
            println!(
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                files.len()
            );
            continue;
        }

        let candidate = PathBuf::from(input);
        match validate_dataset_path(&candidate) {
            Ok(path) => return Ok(path),
            Err(err) => {
                println!("{err}");
                continue;
            }
        }
    }
}

/// Validate that the provided path points to a `.csv` file.
pub fn validate_dataset_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::usage(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::usage(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::usage(format!(
            "Expected a .csv file (got: {}). Use -f to pass a CSV path.",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory (deterministic order).
pub fn discover_datasets() -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk_for_csv(Path::new("."), 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by(|a, b| pretty_path(a).cmp(&pretty_path(b)));
    out
}

fn walk_for_csv(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };

        if file_type.is_dir() {
            if should_skip_dir(&path) {
                continue;
            }
            walk_for_csv(&path, depth + 1, max_depth, out);
            continue;
        }

        if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        == Some(true)
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

/// Whether a header line names the three incident columns.
///
/// Uses the same normalization as ingest: case-insensitive, BOM-stripped,
/// with `.`/space folded to `_`.
fn header_matches(line: &str) -> bool {
    let mut have_date = false;
    let mut have_fatal = false;
    let mut have_make = false;

    for raw in line.split(',') {
        let name = raw
            .trim()
            .trim_matches('"')
            .trim_start_matches('\u{feff}')
            .to_ascii_lowercase()
            .replace(['.', ' '], "_");
        match name.as_str() {
            "event_date" => have_date = true,
            "total_fatal_injuries" => have_fatal = true,
            "make" => have_make = true,
            _ => {}
        }
    }

    have_date && have_fatal && have_make
}

fn file_has_incident_header(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut line = String::new();
    if BufReader::new(file).read_line(&mut line).is_err() {
        return false;
    }
    header_matches(&line)
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_incident_headers() {
        assert!(header_matches("Event_Date,Total_Fatal_Injuries,Make"));
        assert!(header_matches("\u{feff}Event.Date,Total.Fatal.Injuries,Make,Model"));
        assert!(header_matches("\"Event Date\",\"Total Fatal Injuries\",\"Make\""));
        assert!(!header_matches("id,maturity_date,oas"));
        assert!(!header_matches("Event_Date,Make"));
    }

    #[test]
    fn csv_extension_check_is_case_insensitive() {
        assert!(has_csv_extension(Path::new("data/incidents.CSV")));
        assert!(has_csv_extension(Path::new("incidents.csv")));
        assert!(!has_csv_extension(Path::new("incidents.tsv")));
        assert!(!has_csv_extension(Path::new("incidents")));
    }
}
