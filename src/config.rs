//! Configuration management and validation.
//!
//! Provides the ingestion settings shared by the header locator, type
//! inferencer and table materializer, plus export compression options.

use crate::constants::{
    DEFAULT_CATEGORY_MAX_DISTINCT, DEFAULT_HEADER_SCAN_ROWS, DEFAULT_MAX_INPUT_BYTES,
    DEFAULT_PREVIEW_ROWS, DEFAULT_SAMPLE_SIZE, DEFAULT_TYPE_THRESHOLD,
};
use crate::error::{Error, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};

/// Supported compression algorithms for exported parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    None,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::None => ParquetCompression::Uncompressed,
        }
    }
}

/// Settings for one ingestion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Leading rows examined when locating the header row
    pub header_scan_rows: usize,

    /// Minimum fraction of values that must share a shape to type a column
    pub type_threshold: f64,

    /// Distinct-value ceiling for Category columns (above it: Text)
    pub category_max_distinct: usize,

    /// Sample values kept per column
    pub sample_size: usize,

    /// Rows exposed in the table preview
    pub preview_rows: usize,

    /// Inputs larger than this are rejected before decoding
    pub max_input_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            type_threshold: DEFAULT_TYPE_THRESHOLD,
            category_max_distinct: DEFAULT_CATEGORY_MAX_DISTINCT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl IngestConfig {
    /// Set the header scan window
    pub fn with_header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows;
        self
    }

    /// Set the dominant-type threshold
    pub fn with_type_threshold(mut self, threshold: f64) -> Self {
        self.type_threshold = threshold;
        self
    }

    /// Set the category distinct-value ceiling
    pub fn with_category_max_distinct(mut self, max_distinct: usize) -> Self {
        self.category_max_distinct = max_distinct;
        self
    }

    /// Set the number of preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set the input size limit
    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.header_scan_rows == 0 {
            return Err(Error::configuration("header_scan_rows must be at least 1"));
        }
        if !(self.type_threshold > 0.0 && self.type_threshold <= 1.0) {
            return Err(Error::configuration(format!(
                "type_threshold must be in (0, 1], got {}",
                self.type_threshold
            )));
        }
        Ok(())
    }
}
