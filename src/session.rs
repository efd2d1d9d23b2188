//! Session context and command handlers.
//!
//! The session is an explicit context object threaded through every
//! operation instead of ambient globals: loading files, computing result
//! tables, and exporting the workbook are plain methods from (state,
//! command) to (new state, output). States move `Idle → FilesLoaded →
//! Computed`; reloading files drops back to `FilesLoaded` with refreshed
//! bus-name suggestions, and loading an empty set resets to `Idle`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::classify;
use crate::compose;
use crate::error::{FilterError, Result};
use crate::io::csv_read;
use crate::io::excel_write;
use crate::model::{AliasRequest, FileResult, ResultSet};

/// Where the session currently stands in the load/compute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FilesLoaded,
    Computed,
}

/// Per-session state: the loaded file set, the bus-name suggestion list,
/// and the last computed result set. Rebuilt wholesale on each transition,
/// never mutated incrementally.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    files: Vec<PathBuf>,
    bus_names: Vec<String>,
    results: ResultSet,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            files: Vec::new(),
            bus_names: Vec::new(),
            results: ResultSet::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sorted, deduplicated bus names across all loaded files, for use as
    /// match-key suggestions.
    pub fn bus_names(&self) -> &[String] {
        &self.bus_names
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Replaces the loaded file set, refreshing the bus-name suggestions
    /// and clearing any prior results. An empty set resets the session to
    /// idle. Files without a bus-name column contribute no suggestions
    /// but stay loaded; a missing file aborts the load.
    #[instrument(level = "info", skip_all, fields(file_count = paths.len()))]
    pub fn load_files(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        if paths.is_empty() {
            info!("all files removed, resetting session");
            *self = Session::new();
            return Ok(());
        }

        for path in &paths {
            if !path.exists() {
                return Err(FilterError::MissingInput(path.clone()));
            }
        }

        let mut names: BTreeSet<String> = BTreeSet::new();
        for path in &paths {
            match csv_read::read_bus_names(path)? {
                Some(file_names) => names.extend(file_names),
                None => {
                    warn!(file = %csv_read::file_label(path), "file lacks the bus-name column");
                }
            }
        }

        self.files = paths;
        self.bus_names = names.into_iter().collect();
        self.results.clear();
        self.state = SessionState::FilesLoaded;
        info!(bus_count = self.bus_names.len(), "files loaded");
        Ok(())
    }

    /// Runs the full pipeline over the loaded files in upload order,
    /// rebuilding the result set from scratch.
    ///
    /// Parameter validation happens before any file is touched, so a
    /// mismatched key/alias pair never partially computes. A failing file
    /// aborts the whole computation; results are only published when
    /// every file processed cleanly.
    #[instrument(level = "info", skip_all)]
    pub fn compute(&mut self, keys: &str, aliases: &str) -> Result<()> {
        if self.files.is_empty() {
            return Err(FilterError::NoFiles);
        }

        let requests = AliasRequest::parse_lists(keys, aliases)?;

        let mut results = ResultSet::default();
        for path in &self.files {
            results.push(process_file(path, &requests)?);
        }

        self.results = results;
        self.state = SessionState::Computed;
        info!(file_count = self.results.files.len(), "computation finished");
        Ok(())
    }

    /// Serializes the computed result set into an xlsx workbook buffer.
    pub fn export(&self) -> Result<Vec<u8>> {
        excel_write::workbook_buffer(&self.results)
    }
}

/// Parser → classifier → alias mapper → composer for one file.
#[instrument(level = "debug", skip(requests), fields(file = %csv_read::file_label(path)))]
fn process_file(path: &Path, requests: &[AliasRequest]) -> Result<FileResult> {
    let file_name = csv_read::file_label(path);
    let rows = csv_read::read_rows(path)?;
    let buckets = classify::classify(&file_name, &rows, requests)?;

    let three_phase = classify::apply_aliases(&buckets.three_phase, requests);
    let single_phase = classify::apply_aliases(&buckets.single_phase, requests);
    let rows = compose::compose(&file_name, &three_phase, &single_phase)?;

    Ok(FileResult { file_name, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_gbk_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let (bytes, _, _) = encoding_rs::GBK.encode(content);
        let mut file = std::fs::File::create(&path).expect("file created");
        file.write_all(&bytes).expect("CSV written");
        path
    }

    const REPORT: &str = "母线名,故障类型,基电压,备注,短路电流\n\
                          A1,三相,110,x,1234.56\n\
                          A1,单相,110,x,567.89\n";

    #[test]
    fn load_compute_export_cycle() {
        let dir = TempDir::new().expect("temporary directory");
        let path = write_gbk_csv(&dir, "f1.csv", REPORT);

        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.load_files(vec![path]).expect("files loaded");
        assert_eq!(session.state(), SessionState::FilesLoaded);
        assert_eq!(session.bus_names(), ["A1".to_string()]);

        session.compute("A1", "Station A").expect("computed");
        assert_eq!(session.state(), SessionState::Computed);

        let results = session.results();
        assert_eq!(results.files.len(), 1);
        let row = &results.files[0].rows[0];
        assert_eq!(row.display_name, "Station A");
        assert_eq!(row.base_voltage, "110");

        let buffer = session.export().expect("workbook exported");
        assert!(!buffer.is_empty());
    }

    #[test]
    fn reload_clears_results_and_empty_set_resets_to_idle() {
        let dir = TempDir::new().expect("temporary directory");
        let path = write_gbk_csv(&dir, "f1.csv", REPORT);

        let mut session = Session::new();
        session.load_files(vec![path.clone()]).expect("files loaded");
        session.compute("A1", "Station A").expect("computed");
        assert!(!session.results().is_empty());

        session.load_files(vec![path]).expect("files reloaded");
        assert_eq!(session.state(), SessionState::FilesLoaded);
        assert!(session.results().is_empty());

        session.load_files(Vec::new()).expect("files removed");
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.bus_names().is_empty());
    }

    #[test]
    fn parameter_mismatch_aborts_before_any_file() {
        let dir = TempDir::new().expect("temporary directory");
        // A file that would fail parsing if it were touched.
        let path = write_gbk_csv(&dir, "broken.csv", "a,b\n1,2\n");

        let mut session = Session::new();
        session.load_files(vec![path]).expect("files loaded");

        let error = session.compute("A1,B2", "Station A").unwrap_err();
        assert!(matches!(error, FilterError::ParameterMismatch { .. }));
    }

    #[test]
    fn compute_without_files_is_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.compute("A1", "Station A"),
            Err(FilterError::NoFiles)
        ));
    }

    #[test]
    fn failing_file_aborts_and_keeps_no_partial_results() {
        let dir = TempDir::new().expect("temporary directory");
        let good = write_gbk_csv(&dir, "good.csv", REPORT);
        let bad = write_gbk_csv(
            &dir,
            "bad.csv",
            "母线名,故障类型,基电压,备注,短路电流\nB9,三相,220,x,1.0\n",
        );

        let mut session = Session::new();
        session.load_files(vec![good, bad]).expect("files loaded");

        let error = session.compute("A1", "Station A").unwrap_err();
        assert!(matches!(error, FilterError::NoMatch(file) if file == "bad.csv"));
        assert!(session.results().is_empty());
        assert_eq!(session.state(), SessionState::FilesLoaded);
    }
}
