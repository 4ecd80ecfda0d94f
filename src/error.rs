use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, EconError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests tables, evaluates the economic model, or writes results.
#[derive(Debug, Error)]
pub enum EconError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the configuration file is not valid TOML for the schema.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook has no worksheet to read from.
    #[error("workbook {0} contains no worksheet")]
    EmptyWorkbook(PathBuf),

    /// Raised when a table lacks a column the schema requires.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    /// Raised when a calculation is requested before every input table is loaded.
    #[error("{0} table has not been provided")]
    MissingTable(&'static str),

    /// Raised when the same year appears twice in one input table.
    #[error("{table} table lists year {year} more than once")]
    DuplicateYear { table: &'static str, year: i32 },

    /// Raised when a cell cannot be interpreted as the number its column expects.
    #[error("invalid value '{value}' in column {column} (row {row})")]
    InvalidCell {
        column: String,
        row: usize,
        value: String,
    },

    /// Raised when an economic assumption is outside its meaningful range.
    #[error("invalid assumption {field}: {reason}")]
    InvalidAssumption { field: &'static str, reason: String },

    /// Raised when a sensitivity summary text cannot be parsed.
    #[error("malformed sensitivity summary {path}: {reason}")]
    MalformedSummary { path: PathBuf, reason: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
