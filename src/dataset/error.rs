// Dataset error types
// Maps read/parse failures onto the HTTP status reported to clients

use hyper::StatusCode;
use std::path::PathBuf;

/// Message returned to clients when the backing file does not exist
pub const NOT_FOUND_MESSAGE: &str = "El archivo CSV no se encontró en el servidor.";

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Backing file is absent
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed CSV structure or invalid UTF-8
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("No columns to parse from file")]
    Empty,
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl DatasetError {
    /// HTTP status for this error: 404 for a missing file, 500 for everything else
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
