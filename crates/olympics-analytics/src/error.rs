//! Analytics error types.

use std::path::PathBuf;
use thiserror::Error;

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// DuckDB error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// An input table could not be found on disk
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Data conversion error
    #[error("Data conversion error: {0}")]
    Conversion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
