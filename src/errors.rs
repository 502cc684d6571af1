//! Unified application error type.
//! All modules (db, core, identity, cli) return AppError so that the
//! request boundary can map every failure to one status label.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Domain errors (surfaced to the caller as-is)
    // ---------------------------
    #[error("{0} not found")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Invalid credential token: {0}")]
    InvalidToken(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Import / export errors
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Status label used at the request boundary.
    pub fn status(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not found",
            AppError::Permission(_) => "forbidden",
            AppError::InvalidToken(_) => "unauthorized",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidCoordinate(_) | AppError::InvalidInput(_) => "bad request",
            _ => "internal error",
        }
    }

    /// Process exit code for the CLI front-end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidCoordinate(_) | AppError::InvalidInput(_) => 2,
            AppError::InvalidToken(_) => 3,
            AppError::Permission(_) => 4,
            AppError::NotFound(_) => 5,
            AppError::Conflict(_) => 6,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
