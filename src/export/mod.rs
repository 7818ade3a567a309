//! Export the full matching result (every page) to a spreadsheet or CSV

pub mod xlsx;

pub use xlsx::write_rows_to_xlsx;

use crate::error::{Result, StatsError};
use crate::model::{DerivedRow, FieldSelection};
use crate::render::format_fixed;
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

/// Header row shared by all export formats
pub fn export_headers(selection: &FieldSelection) -> Vec<String> {
    vec![
        "Rank".to_string(),
        "Agent Name".to_string(),
        "Faction".to_string(),
        selection.stat1.to_string(),
        selection.stat2.to_string(),
        "Ratio".to_string(),
        "Ratio %".to_string(),
        "Difference".to_string(),
    ]
}

/// Write rows in the format implied by the file extension (`.xlsx` or `.csv`)
pub fn export_rows(rows: &[&DerivedRow], selection: &FieldSelection, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" => write_rows_to_xlsx(rows, selection, path),
        "csv" => write_rows_to_csv(rows, selection, path),
        _ => Err(StatsError::UnsupportedFormat(ext)),
    }
}

/// One exported line. Numbers are pre-formatted so whole values print
/// without a trailing `.0`.
#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    rank: usize,
    agent_name: &'a str,
    faction: &'a str,
    stat1: String,
    stat2: String,
    ratio: String,
    ratio_percent: String,
    difference: String,
}

impl<'a> From<&'a DerivedRow> for ExportRecord<'a> {
    fn from(row: &'a DerivedRow) -> Self {
        Self {
            rank: row.display_index,
            agent_name: &row.agent_name,
            faction: &row.faction,
            stat1: row.stat1_value.to_string(),
            stat2: row.stat2_value.to_string(),
            ratio: format_fixed(row.ratio, 7),
            ratio_percent: format_fixed(row.ratio_percent, 7),
            difference: row.difference.to_string(),
        }
    }
}

/// Write rows to a CSV file
pub fn write_rows_to_csv(
    rows: &[&DerivedRow],
    selection: &FieldSelection,
    path: &Path,
) -> Result<()> {
    // Header names depend on the selection, so write them by hand
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(export_headers(selection))?;

    for row in rows {
        writer.serialize(ExportRecord::from(*row))?;
    }

    writer.flush()?;
    Ok(())
}
