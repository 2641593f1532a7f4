//! Projection of retained rows onto the active columns.

use crate::config::IngestConfig;
use crate::header::HeaderRow;
use crate::models::{CellValue, Column, ColumnType, RawRow, Row};
use crate::schema::infer_named_column;
use std::collections::HashMap;
use tracing::debug;

/// Build the typed column descriptors for the active columns.
///
/// A column named in `overrides` takes that type as given and skips
/// inference.
pub fn build_columns(
    header: &HeaderRow,
    active: &[usize],
    rows: &[RawRow],
    overrides: &HashMap<String, ColumnType>,
    config: &IngestConfig,
) -> Vec<Column> {
    active
        .iter()
        .map(|&index| {
            let name = header.names[index].clone();
            let values = || rows.iter().filter_map(move |row| row.get(index));

            let column_type = match overrides.get(&name) {
                Some(&overridden) => {
                    debug!("Column '{}' type overridden to {}", name, overridden);
                    overridden
                }
                None => infer_named_column(&name, values(), config),
            };

            let sample = values()
                .filter(|cell| !cell.is_blank())
                .take(config.sample_size)
                .cloned()
                .collect();

            Column {
                name,
                column_type,
                sample,
            }
        })
        .collect()
}

/// Map each retained row to its active columns, blanks becoming null
pub fn build_rows(header: &HeaderRow, active: &[usize], rows: Vec<RawRow>) -> Vec<Row> {
    rows.into_iter()
        .map(|mut raw| {
            let cells = active
                .iter()
                .map(|&index| {
                    let value = raw
                        .get_mut(index)
                        .map(std::mem::take)
                        .filter(|cell| !cell.is_blank());
                    (header.names[index].clone(), value)
                })
                .collect();
            Row::new(cells)
        })
        .collect()
}
