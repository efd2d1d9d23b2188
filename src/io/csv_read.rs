//! Reads GBK-encoded fault report CSV files into typed rows.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{FilterError, Result};
use crate::model::{COL_BASE_VOLTAGE, COL_BUS_NAME, COL_FAULT_TYPE, CURRENT_COLUMN, InputRow};

/// Display name of a path, used in file-scoped errors and sheet names.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parses one report into its ordered row sequence.
///
/// The file is decoded as GBK before CSV parsing; the upstream reports are
/// exported with that encoding. Validates that the three named columns are
/// present and that at least five physical columns exist, since the
/// fault-current value is read positionally from the fifth column. Rows
/// shorter than the header are padded with empty fields, which downstream
/// coercion renders as the placeholder.
pub fn read_rows(path: &Path) -> Result<Vec<InputRow>> {
    let bytes = fs::read(path)?;
    let (text, _, _) = encoding_rs::GBK.decode(&bytes);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = required_columns(path, &headers)?;

    if headers.len() <= CURRENT_COLUMN {
        return Err(FilterError::InsufficientColumns {
            file: file_label(path),
            found: headers.len(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(InputRow {
            bus_name: field(&record, columns.bus_name),
            fault_type: field(&record, columns.fault_type),
            base_voltage: field(&record, columns.base_voltage),
            current: field(&record, CURRENT_COLUMN),
        });
    }

    debug!(file = %file_label(path), row_count = rows.len(), "parsed report");
    Ok(rows)
}

/// Collects the distinct bus names of one report, used for the suggestion
/// list. Returns `None` when the file lacks the bus-name column; unlike
/// [`read_rows`], suggestion gathering tolerates otherwise malformed
/// headers.
pub fn read_bus_names(path: &Path) -> Result<Option<BTreeSet<String>>> {
    let bytes = fs::read(path)?;
    let (text, _, _) = encoding_rs::GBK.decode(&bytes);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let Some(index) = position(&headers, COL_BUS_NAME) else {
        return Ok(None);
    };

    let mut names = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        let name = field(&record, index);
        if !name.is_empty() {
            names.insert(name);
        }
    }

    Ok(Some(names))
}

struct ColumnIndices {
    bus_name: usize,
    fault_type: usize,
    base_voltage: usize,
}

fn required_columns(path: &Path, headers: &StringRecord) -> Result<ColumnIndices> {
    let mut missing = Vec::new();
    let mut lookup = |name: &str| match position(headers, name) {
        Some(index) => index,
        None => {
            missing.push(name.to_string());
            0
        }
    };

    let indices = ColumnIndices {
        bus_name: lookup(COL_BUS_NAME),
        fault_type: lookup(COL_FAULT_TYPE),
        base_voltage: lookup(COL_BASE_VOLTAGE),
    };

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(FilterError::MissingColumns {
            file: file_label(path),
            columns: missing,
        })
    }
}

fn position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn field(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}
