//! Remote dataset fetching over HTTP.
//!
//! Incident datasets are published as plain CSV documents, so the remote path
//! is just: fetch the body, hand it to the regular CSV ingest. Network and
//! HTTP failures map to exit code 4; the schema checks inside ingest keep
//! their usual exit code 2.

use reqwest::blocking::Client;

use crate::error::AppError;
use crate::io::{IngestedData, parse_csv};

/// Environment variable naming the default dataset location (path or URL).
pub const ENV_DATASET: &str = "INCIDENTS_CSV";

/// Fetch a CSV document from `url` and ingest it.
pub fn fetch_csv(url: &str) -> Result<IngestedData, AppError> {
    let client = Client::builder()
        .user_agent(concat!("incident-trends/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::runtime(format!("Request for '{url}' failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::runtime(format!(
            "Request for '{url}' failed with status {}.",
            resp.status()
        )));
    }

    let body = resp
        .text()
        .map_err(|e| AppError::runtime(format!("Failed to read response body: {e}")))?;

    parse_csv(body.as_bytes())
}

/// Resolve the default dataset location from the environment, if any.
///
/// Loads `.env` first so a local setup can pin a dataset without exporting
/// variables.
pub fn dataset_from_env() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(ENV_DATASET)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Whether a dataset location is a URL rather than a filesystem path.
pub fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
