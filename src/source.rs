//! Loading the statistics file from disk or over HTTP

use crate::error::{Result, StatsError};
use crate::model::{Dataset, RawRecord};
use csv::ReaderBuilder;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Where the statistics file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// Interpret a command-line value: http(s) URLs are fetched, anything else is a path
    pub fn parse(value: &str) -> Self {
        let lower = value.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(value.to_string())
        } else {
            Source::Path(PathBuf::from(value))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and parse the statistics file
pub fn load_dataset(source: &Source) -> Result<Dataset> {
    log::info!("Loading statistics from {}", source);
    let dataset = match source {
        Source::Path(path) => parse_dataset(std::fs::File::open(path)?)?,
        Source::Url(url) => {
            let body = fetch_text(url)?;
            parse_dataset(body.as_bytes())?
        }
    };
    log::info!(
        "Loaded {} records with {} columns",
        dataset.records.len(),
        dataset.headers.len()
    );
    Ok(dataset)
}

/// Parse CSV content with a header row into records
pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut records = Vec::new();
    // Bad bytes in one row must not sink the whole file
    for result in reader.byte_records() {
        let record = result?;
        // Short rows just lack the trailing fields
        let raw: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), String::from_utf8_lossy(v)))
            .collect();
        records.push(raw);
    }

    if records.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    Ok(Dataset { headers, records })
}

fn fetch_text(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| StatsError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .header("Accept", "text/csv,text/plain;q=0.9,*/*;q=0.8")
        .send()
        .map_err(|e| StatsError::Fetch(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StatsError::Fetch(format!(
            "HTTP error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    response
        .text()
        .map_err(|e| StatsError::Fetch(format!("Failed to read response: {}", e)))
}
