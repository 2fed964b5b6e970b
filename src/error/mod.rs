//! Error handling for the survey import pipeline.
//!
//! Fatal conditions surface as [`ImportError`] variants; recoverable
//! conditions (ambiguous sign batches, failed downcasts, absent optional
//! question blocks) are logged and recorded on the run report instead.

use arrow::error::ArrowError;

/// Errors that can occur while building the panel datasets
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A column required by the active schema vintage is absent
    #[error("Column '{column}' not found in the response table")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// A column exists but cannot be read as the requested type
    #[error("Column '{column}' has type {actual}, expected {expected}")]
    InvalidColumnType {
        /// Name of the offending column
        column: String,
        /// Type the caller asked for
        expected: String,
        /// Type found in the table
        actual: String,
    },

    /// Input sequences that must be index-aligned have different lengths
    #[error("Length mismatch: expected {expected} rows, got {actual}")]
    LengthMismatch {
        /// Rows expected by the panel index
        expected: usize,
        /// Rows actually supplied
        actual: usize,
    },

    /// The same respondent appears twice in one survey wave
    #[error("Duplicate panel key: respondent {respondent} appears more than once in wave {wave}")]
    DuplicateKey {
        /// Respondent identifier
        respondent: i64,
        /// Wave identifier
        wave: i32,
    },

    /// A respondent-constant column holds conflicting values for one respondent
    #[error("Column '{column}' has multiple distinct values for respondent {respondent}")]
    AmbiguousConstant {
        /// Name of the column being broadcast
        column: String,
        /// Respondent identifier with conflicting values
        respondent: i64,
    },

    /// A structural skip-pattern invariant of the questionnaire is violated
    #[error("Invariant violated for '{variable}': {detail} ({violations} rows)")]
    DomainInvariant {
        /// Variable whose invariant failed
        variable: String,
        /// What the invariant requires
        detail: String,
        /// Number of offending rows
        violations: usize,
    },

    /// The income rank lookup contains the same (year, bracket) twice
    #[error("Duplicate rank entry for year {year}, income bracket {bracket}")]
    DuplicateRankKey {
        /// Fiscal year of the duplicate entry
        year: i32,
        /// Income bracket code of the duplicate entry
        bracket: i32,
    },

    /// Error with the shape or content of an input table
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error serializing the run report
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
