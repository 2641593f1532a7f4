//! Application constants for gridchart
//!
//! Default thresholds, recognized tokens and file extensions used throughout
//! the ingestion pipeline and chart engine.

// =============================================================================
// Ingestion Defaults
// =============================================================================

/// Number of leading rows examined when locating the header row
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// Minimum fraction of classified values needed to assign a dominant type
pub const DEFAULT_TYPE_THRESHOLD: f64 = 0.6;

/// Columns with at most this many distinct values become categories
pub const DEFAULT_CATEGORY_MAX_DISTINCT: usize = 20;

/// Number of sample values kept per column
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Number of materialized rows exposed as the table preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Largest input accepted by a single parse call (50 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Prefix for header cells that are blank
pub const PLACEHOLDER_COLUMN_PREFIX: &str = "Column_";

/// Sheet name used for delimited text without a usable file stem
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

// =============================================================================
// Recognized Tokens
// =============================================================================

/// Currency glyphs recognized next to amounts
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₩', '₽', '₺', '₫', '₱', '₪'];

/// Three-letter month abbreviations accepted in textual dates
pub const MONTH_ABBREVIATIONS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// =============================================================================
// File Formats
// =============================================================================

/// Extensions decoded as delimited text
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Extensions decoded as workbooks
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];

/// Candidate delimiters tried when sniffing delimited text
pub const DELIMITER_CANDIDATES: &[u8] = &[b',', b';', b'\t', b'|'];

/// Lines examined when sniffing the delimiter
pub const DELIMITER_SNIFF_LINES: usize = 10;
