//! Error type shared by every stage of the extraction pipeline.

use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read input file {}: {source}", .path.display())]
    ReadError { path: PathBuf, source: io::Error },
    #[error("Failed to decode GTFS-RT feed from {}: {message}", .path.display())]
    DecodeError { path: PathBuf, message: String },
    #[error("Failed to render CSV output: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to render JSON output: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to write output file {}: {source}", .path.display())]
    WriteError { path: PathBuf, source: io::Error },
}

impl ExtractError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ExtractError::FileNotFound(_) | ExtractError::ReadError { .. } => "read",
            ExtractError::DecodeError { .. } => "decode",
            ExtractError::CsvError(_) | ExtractError::JsonError(_) => "render",
            ExtractError::WriteError { .. } => "write",
        }
    }
}
