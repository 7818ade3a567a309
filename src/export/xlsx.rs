use crate::error::Result;
use crate::model::{DerivedRow, FieldSelection};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use super::export_headers;

/// Write rows to an Excel file
pub fn write_rows_to_xlsx(
    rows: &[&DerivedRow],
    selection: &FieldSelection,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    write_stats_sheet(worksheet, rows, selection)?;

    workbook.save(path)?;
    Ok(())
}

fn write_stats_sheet(
    sheet: &mut Worksheet,
    rows: &[&DerivedRow],
    selection: &FieldSelection,
) -> Result<()> {
    sheet.set_name("Agent Statistics")?;

    // Set column widths
    sheet.set_column_width(0, 7)?;   // Rank
    sheet.set_column_width(1, 22)?;  // Agent Name
    sheet.set_column_width(2, 8)?;   // Faction
    sheet.set_column_width(3, 14)?;  // stat1
    sheet.set_column_width(4, 14)?;  // stat2
    sheet.set_column_width(5, 14)?;  // Ratio
    sheet.set_column_width(6, 14)?;  // Ratio %
    sheet.set_column_width(7, 14)?;  // Difference

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let headers = export_headers(selection);
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);
    let count_format = Format::new().set_num_format("#,##0");
    let ratio_format = Format::new().set_num_format("0.0000000");

    for (row_idx, stats) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_number_with_format(row, 0, stats.display_index as f64, &center_format)?;

        // Agent name in the faction colour
        let name_format = Format::new().set_font_color(stats.style.color.trim_start_matches('#'));
        sheet.write_string_with_format(row, 1, &stats.agent_name, &name_format)?;
        sheet.write_string_with_format(row, 2, &stats.faction, &center_format)?;

        sheet.write_number_with_format(row, 3, stats.stat1_value, &count_format)?;
        sheet.write_number_with_format(row, 4, stats.stat2_value, &count_format)?;
        sheet.write_number_with_format(row, 5, stats.ratio, &ratio_format)?;
        sheet.write_number_with_format(row, 6, stats.ratio_percent, &ratio_format)?;
        sheet.write_number_with_format(row, 7, stats.difference, &count_format)?;
    }

    // Keep the header and the rank/name columns in view
    sheet.set_freeze_panes(1, 2)?;

    let last_row = rows.len() as u32;
    let last_col = (headers.len() - 1) as u16;
    sheet.autofilter(0, 0, last_row, last_col)?;

    Ok(())
}
