use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, filters, or exports fault report data.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when CSV parsing fails at the record level.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when JSON serialization of the result view fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a report is missing one of the required header columns.
    #[error("file '{file}' is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    /// Raised when a report has fewer physical columns than the fixed
    /// position of the fault-current value requires.
    #[error("file '{file}' has only {found} column(s); the fault-current value is read from column 5")]
    InsufficientColumns { file: String, found: usize },

    /// Raised when the match-key and alias lists disagree in length or are
    /// empty. Aborts the computation before any file is touched.
    #[error("match keys ({keys}) and display aliases ({aliases}) must be non-empty lists of equal length")]
    ParameterMismatch { keys: usize, aliases: usize },

    /// Raised when no row of a file matches any of the requested keys.
    #[error("file '{0}' contains no single-phase or three-phase rows matching the requested keys")]
    NoMatch(String),

    /// Raised when there is nothing to compose or export.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// Raised when a computation is requested before any files are loaded.
    #[error("no input files loaded")]
    NoFiles,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
