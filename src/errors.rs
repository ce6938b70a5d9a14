use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for TongueScanR
#[derive(Error, Debug)]
pub enum TongueScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    JsonOutput(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, TongueScanError>;
