//! Unified application error type.
//! Store backends, the CLI handlers and the exporters all return AppError so
//! the failure reaches `main` through a single path.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Record store
    // ---------------------------
    #[error("Could not read records from {0}")]
    ReadFailure(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Store is busy: {0} is locked by another writer")]
    StoreBusy(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid glucose value {0}: must be a finite number of at least 20 mg/dL")]
    InvalidGlucose(f64),

    #[error("Invalid insulin value {0}: must be a finite number of at least 0 U")]
    InvalidInsulin(f64),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Nothing to export: the record set is empty")]
    EmptyExport,

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
