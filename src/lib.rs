//! Gridchart Library
//!
//! Turns uploaded spreadsheets and delimited text files into typed tables
//! and recommends charts for them.
//!
//! This library provides tools for:
//! - Extracting a raw cell grid from CSV/TSV text or Excel/ODS workbooks
//! - Locating the header row in messy, human-authored layouts
//! - Dropping blank rows and decorative section labels
//! - Inferring a semantic type for every column
//! - Enumerating chart suggestions from column types alone
//! - Exporting typed tables to Parquet

pub mod charts;
pub mod cli;
pub mod columns;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod filter;
pub mod grid;
pub mod header;
pub mod models;
pub mod patterns;
pub mod processor;
pub mod schema;

pub use charts::ChartRecommender;
pub use config::{CompressionAlgorithm, IngestConfig};
pub use error::{Error, Result};
pub use models::{
    CellValue, ChartSuggestion, ChartSuggestions, ChartType, Column, ColumnSpec, ColumnType,
    ParsedTable, Row,
};
pub use processor::TableBuilder;

/// Parse an upload with the default configuration
pub fn parse(bytes: &[u8], file_name: &str, selected_sheet: Option<&str>) -> Result<ParsedTable> {
    TableBuilder::new().parse(bytes, file_name, selected_sheet)
}

/// Suggest charts for an ordered column list
pub fn suggest_charts(columns: &[ColumnSpec]) -> ChartSuggestions {
    ChartRecommender::new().suggest(columns)
}
