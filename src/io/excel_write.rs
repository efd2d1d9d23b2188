//! Serializes the computed result set into a multi-sheet xlsx workbook.

use std::collections::HashSet;

use rust_xlsxwriter::Workbook;

use crate::error::{FilterError, Result};
use crate::model::{Cell, OUTPUT_COLUMNS, PLACEHOLDER, ResultSet};

/// Builds the workbook for the whole result set and returns it as an
/// in-memory buffer.
///
/// Each file gets its own sheet named after the file (sanitized for
/// Excel's sheet-name rules). Cell A1 carries the file name as a label,
/// row 2 the column headers, followed by one row per output row. Numeric
/// currents are written as numbers, placeholders as text.
pub fn workbook_buffer(results: &ResultSet) -> Result<Vec<u8>> {
    if results.is_empty() {
        return Err(FilterError::EmptyResult(
            "no computed results to export".to_string(),
        ));
    }

    let mut workbook = Workbook::new();
    let mut sheet_names = SheetNameRegistry::default();

    for file in &results.files {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_names.assign(&file.file_name))?;

        worksheet.write_string(0, 0, &file.file_name)?;

        for (col_idx, header) in OUTPUT_COLUMNS.iter().enumerate() {
            worksheet.write_string(1, col_idx as u16, *header)?;
        }

        for (row_idx, row) in file.rows.iter().enumerate() {
            let excel_row = (row_idx + 2) as u32;
            worksheet.write_string(excel_row, 0, &row.display_name)?;
            worksheet.write_string(excel_row, 1, &row.base_voltage)?;
            write_cell(worksheet, excel_row, 2, row.three_phase)?;
            write_cell(worksheet, excel_row, 3, row.single_phase)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: Cell,
) -> Result<()> {
    match cell {
        Cell::Number(value) => worksheet.write_number(row, col, value)?,
        Cell::Placeholder => worksheet.write_string(row, col, PLACEHOLDER)?,
    };
    Ok(())
}

#[derive(Debug, Default)]
struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if !self.used.contains(&base) {
            self.used.insert(base.clone());
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix = truncate_chars(&base, 31 - suffix.chars().count());
            let candidate = format!("{prefix}{suffix}");
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let mut sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        sanitized = "Sheet".to_string();
    }

    // Excel caps sheet names at 31 characters.
    truncate_chars(&sanitized, 31)
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
