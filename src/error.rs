//! Error handling for ingestion and export operations.
//!
//! Input errors (no sheets, empty sheet, unreadable bytes) are surfaced to
//! the caller verbatim and are never retried. A new upload is required.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Workbook '{file}' contains no sheets")]
    NoSheets { file: String },

    #[error("Sheet '{sheet}' is empty")]
    EmptySheet { sheet: String },

    #[error("Could not read '{file}': {reason}")]
    UnreadableInput { file: String, reason: String },

    #[error("Unsupported file format: {file}")]
    UnsupportedFormat { file: String },

    #[error("Input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export error: {0}")]
    Export(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unreadable input error
    pub fn unreadable(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreadableInput {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the input family (bad upload, not a bug)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NoSheets { .. }
                | Self::EmptySheet { .. }
                | Self::UnreadableInput { .. }
                | Self::UnsupportedFormat { .. }
                | Self::InputTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
