//! Typed representations of fault report rows, user parameters, and the
//! computed result tables.

use serde::{Serialize, Serializer};

use crate::error::{FilterError, Result};

/// Header name of the bus-name column in upstream reports.
pub const COL_BUS_NAME: &str = "母线名";
/// Header name of the fault-type column.
pub const COL_FAULT_TYPE: &str = "故障类型";
/// Header name of the base-voltage column.
pub const COL_BASE_VOLTAGE: &str = "基电压";

/// Zero-based index of the fault-current value. The upstream report format
/// is fixed, so the value is read from the fifth physical column regardless
/// of its header name. Reordering the source columns breaks this.
pub const CURRENT_COLUMN: usize = 4;

/// Rendered in place of missing or non-numeric values.
pub const PLACEHOLDER: &str = "-";

/// Column headers of a composed result table, in output order.
pub const OUTPUT_COLUMNS: [&str; 4] = ["sub_name", "基电压", "三相", "单相"];

/// Recognised fault classifications. Any other label in the fault-type
/// column is silently dropped during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultKind {
    SinglePhase,
    ThreePhase,
}

impl FaultKind {
    /// Maps the exact localized label onto a fault kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "单相" => Some(FaultKind::SinglePhase),
            "三相" => Some(FaultKind::ThreePhase),
            _ => None,
        }
    }
}

/// One data row of an uploaded fault report. Immutable once parsed; the
/// fault-current value keeps its raw text until the composer coerces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRow {
    pub bus_name: String,
    pub fault_type: String,
    pub base_voltage: String,
    pub current: String,
}

/// Positional pairing of a user-supplied match key with the display alias
/// that replaces it in the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasRequest {
    pub key: String,
    pub alias: String,
}

impl AliasRequest {
    /// Builds the alias request list from the two user-entered strings.
    ///
    /// Both lists accept ASCII commas and fullwidth commas (`，`) as
    /// separators; entries are trimmed and empty entries dropped. Fails
    /// with [`FilterError::ParameterMismatch`] when either list is empty
    /// or the lengths disagree.
    pub fn parse_lists(keys: &str, aliases: &str) -> Result<Vec<AliasRequest>> {
        let keys = split_list(keys);
        let aliases = split_list(aliases);

        if keys.is_empty() || aliases.is_empty() || keys.len() != aliases.len() {
            return Err(FilterError::ParameterMismatch {
                keys: keys.len(),
                aliases: aliases.len(),
            });
        }

        Ok(keys
            .into_iter()
            .zip(aliases)
            .map(|(key, alias)| AliasRequest { key, alias })
            .collect())
    }
}

/// Splits a user-entered list on ASCII and fullwidth commas, trimming
/// entries and dropping empty ones.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split([',', '，'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// A single value of the two current columns: either a number rounded to
/// one decimal place or the `-` placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Number(f64),
    Placeholder,
}

impl Cell {
    /// Coerces a raw field into a cell. Non-numeric or empty text becomes
    /// the placeholder; parsed values are rounded to one decimal place.
    /// The coercion is idempotent: re-coercing a rendered cell yields the
    /// same cell.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Cell::Number((value * 10.0).round() / 10.0),
            _ => Cell::Placeholder,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(value) => serializer.serialize_f64(*value),
            Cell::Placeholder => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Placeholder => write!(f, "{PLACEHOLDER}"),
        }
    }
}

/// One row of a composed result table, one per matched three-phase bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub display_name: String,
    pub base_voltage: String,
    pub three_phase: Cell,
    pub single_phase: Cell,
}

/// The composed table for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub file_name: String,
    pub rows: Vec<OutputRow>,
}

/// Mapping from input file to its composed table, in upload order. Rebuilt
/// wholesale on every computation; the only session-lifetime state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub files: Vec<FileResult>,
}

impl ResultSet {
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn push(&mut self, result: FileResult) {
        self.files.push(result);
    }
}
