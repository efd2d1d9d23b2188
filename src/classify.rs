//! Row selection and renaming: partitions parsed rows into single-phase and
//! three-phase buckets by match key, then substitutes display aliases.

use tracing::warn;

use crate::error::{FilterError, Result};
use crate::model::{AliasRequest, FaultKind, InputRow};

/// The two per-file buckets produced by classification. Rows keep the order
/// in which the match keys selected them; a row whose bus name contains
/// several keys appears once per key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FaultBuckets {
    pub single_phase: Vec<InputRow>,
    pub three_phase: Vec<InputRow>,
}

/// A bucket row after alias substitution, carrying only the fields that
/// reach the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedRow {
    pub display_name: String,
    pub base_voltage: String,
    pub current: String,
}

/// Scans all rows once per match key. A row is selected when the key is a
/// substring of its bus name; selected rows are bucketed by exact equality
/// of the fault-type label, and rows with any other label are dropped.
///
/// A key that selects zero rows emits a warning and contributes nothing.
/// Fails with [`FilterError::NoMatch`] only when both buckets end up empty.
pub fn classify(file_name: &str, rows: &[InputRow], requests: &[AliasRequest]) -> Result<FaultBuckets> {
    let mut buckets = FaultBuckets::default();

    for request in requests {
        let mut found = false;
        for row in rows {
            if !row.bus_name.contains(&request.key) {
                continue;
            }
            found = true;
            match FaultKind::from_label(&row.fault_type) {
                Some(FaultKind::SinglePhase) => buckets.single_phase.push(row.clone()),
                Some(FaultKind::ThreePhase) => buckets.three_phase.push(row.clone()),
                None => {}
            }
        }
        if !found {
            warn!(file = file_name, key = %request.key, "no rows with a bus name containing the key");
        }
    }

    if buckets.single_phase.is_empty() && buckets.three_phase.is_empty() {
        return Err(FilterError::NoMatch(file_name.to_string()));
    }

    Ok(buckets)
}

/// Replaces each row's bus name with the alias of the first request whose
/// key exactly equals it. Substring matches selected the row during
/// classification, but substitution is exact-match only: rows without an
/// exact key keep their original name.
pub fn apply_aliases(rows: &[InputRow], requests: &[AliasRequest]) -> Vec<AliasedRow> {
    rows.iter()
        .map(|row| {
            let display_name = requests
                .iter()
                .find(|request| request.key == row.bus_name)
                .map(|request| request.alias.clone())
                .unwrap_or_else(|| row.bus_name.clone());
            AliasedRow {
                display_name,
                base_voltage: row.base_voltage.clone(),
                current: row.current.clone(),
            }
        })
        .collect()
}
