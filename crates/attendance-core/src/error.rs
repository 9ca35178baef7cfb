use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the attendance crates.
///
/// Field-level parse failures and unidentifiable records are recovered
/// inside the normalizer and never show up here.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV table could not be parsed.
    #[error("Failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// A spreadsheet workbook could not be opened or has no readable sheet.
    #[error("Failed to read workbook {path}: {message}")]
    WorkbookParse { path: PathBuf, message: String },

    /// The file extension does not map to a supported table format.
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The configured data path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A directory was given but contains no attendance tables.
    #[error("No attendance files found in {0}")]
    NoDataFiles(PathBuf),

    /// No record in the dataset carries the requested employee id.
    #[error("Employee ID {0} not found")]
    EmployeeNotFound(u64),

    /// The employee id supplied by the user is not a non-negative integer.
    #[error("Invalid employee ID: {0:?} (expected a numeric ID)")]
    InvalidEmployeeId(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the attendance crates.
pub type Result<T> = std::result::Result<T, AttendanceError>;
