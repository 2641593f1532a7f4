//! Table building pipeline.
//!
//! Orchestrates one parse call: grid extraction, header location, row
//! filtering, active column selection, type inference and materialization.
//! The builder holds only its immutable configuration, so one instance can
//! serve any number of concurrent calls.

pub mod materialize;

#[cfg(test)]
pub mod tests;

use self::materialize::{build_columns, build_rows};

use crate::columns::select_active_columns;
use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::filter::filter_rows;
use crate::grid::read_grid;
use crate::header::locate_header;
use crate::models::{ColumnType, ParsedTable, SheetGrid};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Builds [`ParsedTable`]s from uploaded bytes
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    config: IngestConfig,
}

impl TableBuilder {
    /// Create a table builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the builder
    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse an upload into a typed table, inferring every column type
    pub fn parse(
        &self,
        bytes: &[u8],
        file_name: &str,
        selected_sheet: Option<&str>,
    ) -> Result<ParsedTable> {
        self.parse_with_overrides(bytes, file_name, selected_sheet, &HashMap::new())
    }

    /// Parse an upload, taking the types of the named columns as given
    pub fn parse_with_overrides(
        &self,
        bytes: &[u8],
        file_name: &str,
        selected_sheet: Option<&str>,
        overrides: &HashMap<String, ColumnType>,
    ) -> Result<ParsedTable> {
        let start_time = Instant::now();
        self.config.validate()?;

        if bytes.len() > self.config.max_input_bytes {
            return Err(Error::InputTooLarge {
                size: bytes.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let sheet = read_grid(bytes, file_name, selected_sheet)?;
        let table = self.build_table(sheet, overrides);

        info!(
            "Parsed {} from sheet '{}': {} rows, {} columns in {}ms",
            file_name,
            table.selected_sheet,
            table.row_count,
            table.columns.len(),
            start_time.elapsed().as_millis()
        );

        Ok(table)
    }

    /// Build a table from an already extracted grid
    pub fn build_table(
        &self,
        sheet: SheetGrid,
        overrides: &HashMap<String, ColumnType>,
    ) -> ParsedTable {
        let SheetGrid {
            sheet_names,
            selected_sheet,
            grid,
        } = sheet;

        let Some(header) = locate_header(&grid, self.config.header_scan_rows) else {
            debug!("Sheet '{}' has no rows, producing an empty table", selected_sheet);
            return ParsedTable {
                sheet_names,
                selected_sheet,
                row_count: 0,
                columns: Vec::new(),
                preview: Vec::new(),
                rows: Vec::new(),
            };
        };

        for name in overrides.keys() {
            if !header.names.contains(name) {
                debug!("Ignoring type override for unknown column '{}'", name);
            }
        }

        let body = grid.into_iter().skip(header.index + 1).collect();
        let filtered = filter_rows(body);
        let active = select_active_columns(&header, &filtered.rows);

        let columns = build_columns(&header, &active, &filtered.rows, overrides, &self.config);
        let rows = build_rows(&header, &active, filtered.rows);
        let preview = rows.iter().take(self.config.preview_rows).cloned().collect();

        ParsedTable {
            sheet_names,
            selected_sheet,
            row_count: rows.len(),
            columns,
            preview,
            rows,
        }
    }
}
