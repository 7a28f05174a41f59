//! Analyzer error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to open '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sales history line {line}: {reason}")]
    DataFormat { line: usize, reason: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("insufficient sales history: {0}")]
    InsufficientData(String),

    #[error("report export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("report export failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
