//! Raw grid extraction from workbook and delimited-text bytes.
//!
//! Decodes an upload into the list of sheet names plus a rectangular grid of
//! raw cells for the selected sheet. Workbooks go through calamine; delimited
//! text goes through the csv reader after encoding and delimiter detection.

use crate::constants::{
    DEFAULT_SHEET_NAME, DELIMITED_EXTENSIONS, DELIMITER_CANDIDATES, DELIMITER_SNIFF_LINES,
    WORKBOOK_EXTENSIONS,
};
use crate::error::{Error, Result};
use crate::models::{CellValue, RawGrid, SheetGrid};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// How an upload will be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Workbook,
    Unknown,
}

impl InputFormat {
    /// Detect the format from the file extension
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
            InputFormat::Delimited
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            InputFormat::Workbook
        } else {
            InputFormat::Unknown
        }
    }
}

/// Decode bytes into sheet names and the raw grid of the selected sheet.
///
/// The selected sheet is the requested one when present, otherwise the first
/// sheet. Fails with [`Error::NoSheets`] for a workbook without sheets and
/// [`Error::EmptySheet`] when the selected grid has no rows.
pub fn read_grid(bytes: &[u8], file_name: &str, selected_sheet: Option<&str>) -> Result<SheetGrid> {
    let sheet_grid = match InputFormat::from_file_name(file_name) {
        InputFormat::Delimited => read_delimited(bytes, file_name)?,
        InputFormat::Workbook => read_workbook(bytes, file_name, selected_sheet)?,
        InputFormat::Unknown => read_workbook(bytes, file_name, selected_sheet).map_err(|e| {
            debug!("Workbook fallback failed for {}: {}", file_name, e);
            Error::UnsupportedFormat {
                file: file_name.to_string(),
            }
        })?,
    };

    if sheet_grid.grid.is_empty() {
        return Err(Error::EmptySheet {
            sheet: sheet_grid.selected_sheet,
        });
    }

    debug!(
        "Read {} rows x {} columns from sheet '{}' of {}",
        sheet_grid.grid.len(),
        sheet_grid.grid.first().map_or(0, Vec::len),
        sheet_grid.selected_sheet,
        file_name
    );

    Ok(sheet_grid)
}

fn read_workbook(bytes: &[u8], file_name: &str, selected_sheet: Option<&str>) -> Result<SheetGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::unreadable(file_name, format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    let selected = choose_sheet(&sheet_names, selected_sheet).ok_or_else(|| Error::NoSheets {
        file: file_name.to_string(),
    })?;

    let range = workbook
        .worksheet_range(&selected)
        .map_err(|e| Error::unreadable(file_name, format!("Failed to read sheet '{}': {}", selected, e)))?;

    // calamine trims leading empty columns; pad them back so positions match the sheet
    let leading_columns = range.start().map_or(0, |(_, col)| col as usize);
    let grid: RawGrid = range
        .rows()
        .map(|row| {
            std::iter::repeat_n(CellValue::Empty, leading_columns)
                .chain(row.iter().map(cell_from_data))
                .collect()
        })
        .collect();

    Ok(SheetGrid {
        sheet_names,
        selected_sheet: selected,
        grid,
    })
}

/// Requested sheet when it exists, else the first sheet
fn choose_sheet(sheet_names: &[String], requested: Option<&str>) -> Option<String> {
    if let Some(name) = requested {
        if sheet_names.iter().any(|s| s == name) {
            return Some(name.to_string());
        }
        warn!("Sheet '{}' not found, falling back to the first sheet", name);
    }
    sheet_names.first().cloned()
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn read_delimited(bytes: &[u8], file_name: &str) -> Result<SheetGrid> {
    let text = decode_text(bytes);
    let delimiter = if file_name.to_lowercase().ends_with(".tsv") {
        b'\t'
    } else {
        detect_delimiter(&text)
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut grid: RawGrid = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::unreadable(file_name, format!("Failed to parse row {}: {}", index + 1, e))
        })?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    pad_to_rectangle(&mut grid);

    let sheet_name = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    Ok(SheetGrid {
        sheet_names: vec![sheet_name.clone()],
        selected_sheet: sheet_name,
        grid,
    })
}

/// UTF-8 when valid (BOM stripped), Windows-1252 otherwise
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("Input is neither UTF-8 nor Windows-1252; some characters were replaced");
            }
            text
        }
    }
}

/// Detect delimiter from content (comma, semicolon, tab, pipe)
pub fn detect_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(DELIMITER_SNIFF_LINES)
        .collect();

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in DELIMITER_CANDIDATES {
        if sample_lines.is_empty() {
            break;
        }

        // Raw byte counts: delimiters inside quoted fields are counted too, and the
        // consistency penalty below keeps that from outweighing the real delimiter.
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        // Score by frequency, penalized by inconsistency across lines
        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

fn pad_to_rectangle(grid: &mut RawGrid) {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in grid.iter_mut() {
        row.resize(width, CellValue::Empty);
    }
}
