//! Joins the two alias-mapped buckets of one file into its output table.

use crate::classify::AliasedRow;
use crate::error::{FilterError, Result};
use crate::model::{Cell, OutputRow, PLACEHOLDER};

/// Composes the output table for one file from its alias-mapped buckets.
///
/// The join is purely positional: three-phase row `i` is paired with
/// single-phase row `i`, regardless of whether they name the same bus.
/// This mirrors the upstream report convention where both buckets carry
/// the same key order; callers that cannot guarantee shared ordering get
/// rows paired by index anyway. The output row count equals the
/// three-phase bucket size, with absent single-phase positions rendered
/// as the placeholder.
pub fn compose(
    file_name: &str,
    three_phase: &[AliasedRow],
    single_phase: &[AliasedRow],
) -> Result<Vec<OutputRow>> {
    if three_phase.is_empty() && single_phase.is_empty() {
        return Err(FilterError::EmptyResult(format!(
            "file '{file_name}' produced no rows to compose"
        )));
    }

    let rows = three_phase
        .iter()
        .enumerate()
        .map(|(index, row)| OutputRow {
            display_name: row.display_name.clone(),
            base_voltage: non_empty_or_placeholder(&row.base_voltage),
            three_phase: Cell::from_raw(&row.current),
            single_phase: single_phase
                .get(index)
                .map(|other| Cell::from_raw(&other.current))
                .unwrap_or(Cell::Placeholder),
        })
        .collect();

    Ok(rows)
}

fn non_empty_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliased(name: &str, volt: &str, current: &str) -> AliasedRow {
        AliasedRow {
            display_name: name.to_string(),
            base_voltage: volt.to_string(),
            current: current.to_string(),
        }
    }

    #[test]
    fn pairs_buckets_by_index() {
        let three = vec![aliased("Station A", "110", "1234.56"), aliased("B2", "220", "800.04")];
        let single = vec![aliased("Station A", "110", "567.89")];

        let rows = compose("f1.csv", &three, &single).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "Station A");
        assert_eq!(rows[0].three_phase, Cell::Number(1234.6));
        assert_eq!(rows[0].single_phase, Cell::Number(567.9));
        // No single-phase row at index 1.
        assert_eq!(rows[1].three_phase, Cell::Number(800.0));
        assert_eq!(rows[1].single_phase, Cell::Placeholder);
    }

    #[test]
    fn row_count_follows_three_phase_bucket() {
        let three: Vec<AliasedRow> = Vec::new();
        let single = vec![aliased("A1", "110", "567.89")];
        // Extra single-phase rows are dropped when the three-phase bucket
        // is shorter.
        let rows = compose("f1.csv", &three, &single).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn non_numeric_current_becomes_placeholder() {
        let three = vec![aliased("A1", "110", "overflow")];
        let rows = compose("f1.csv", &three, &[]).unwrap();
        assert_eq!(rows[0].three_phase, Cell::Placeholder);
    }

    #[test]
    fn empty_base_voltage_becomes_placeholder() {
        let three = vec![aliased("A1", "  ", "1.0")];
        let rows = compose("f1.csv", &three, &[]).unwrap();
        assert_eq!(rows[0].base_voltage, "-");
    }

    #[test]
    fn both_buckets_empty_is_an_error() {
        assert!(matches!(
            compose("f1.csv", &[], &[]),
            Err(FilterError::EmptyResult(_))
        ));
    }
}
