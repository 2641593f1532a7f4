//! Active column selection.
//!
//! A raw column is kept when its header cell was filled or when any retained
//! row has a value in it. Columns that are blank throughout are dropped.

use crate::header::HeaderRow;
use crate::models::RawRow;
use tracing::debug;

/// Raw column indices that carry content, left to right
pub fn select_active_columns(header: &HeaderRow, rows: &[RawRow]) -> Vec<usize> {
    let active: Vec<usize> = (0..header.names.len())
        .filter(|&index| {
            header.filled.get(index).copied().unwrap_or(false)
                || rows
                    .iter()
                    .any(|row| row.get(index).is_some_and(|cell| !cell.is_blank()))
        })
        .collect();

    debug!(
        "Selected {} active columns, dropped {} blank columns",
        active.len(),
        header.names.len() - active.len()
    );

    active
}
