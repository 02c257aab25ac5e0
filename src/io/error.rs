use std::io;
use thiserror::Error;

/// IO-level errors for CSV parsing and record input
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV async parsing error: {0}")]
    CsvAsync(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid branch index: {0}")]
    InvalidIndex(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}
