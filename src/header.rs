//! Header row location and column naming.
//!
//! Finds the header row among the leading rows of a raw grid and builds the
//! column names from it. Title rows usually fill a single cell, so the row
//! with the most filled cells in the scan window is taken as the header.

use crate::constants::PLACEHOLDER_COLUMN_PREFIX;
use crate::models::{CellValue, RawGrid};
use std::collections::HashSet;
use tracing::debug;

/// Located header row and the names derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    /// Index of the header row in the raw grid
    pub index: usize,
    /// One unique name per raw column index
    pub names: Vec<String>,
    /// Whether the original header cell at each index was filled
    pub filled: Vec<bool>,
}

/// Count cells that are non-null with a non-empty trimmed string form
pub fn count_filled(row: &[CellValue]) -> usize {
    row.iter().filter(|cell| !cell.is_blank()).count()
}

/// Index of the first row reaching the largest filled-cell count within the
/// first `min(scan_rows, grid.len())` rows. `None` for an empty grid.
pub fn find_header_index(grid: &RawGrid, scan_rows: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, row) in grid.iter().take(scan_rows).enumerate() {
        let filled = count_filled(row);
        if best.is_none_or(|(_, max)| filled > max) {
            best = Some((index, filled));
        }
    }
    best.map(|(index, _)| index)
}

/// Locate the header row and build unique column names for every raw index
pub fn locate_header(grid: &RawGrid, scan_rows: usize) -> Option<HeaderRow> {
    let index = find_header_index(grid, scan_rows)?;
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let header_cells = &grid[index];

    let mut names = Vec::with_capacity(width);
    let mut filled = Vec::with_capacity(width);
    for position in 0..width {
        match header_cells.get(position) {
            Some(cell) if !cell.is_blank() => {
                names.push(cell.as_text().trim().to_string());
                filled.push(true);
            }
            _ => {
                names.push(placeholder_name(position));
                filled.push(false);
            }
        }
    }

    debug!(
        "Header located at row {} with {} of {} cells filled",
        index,
        filled.iter().filter(|f| **f).count(),
        width
    );

    Some(HeaderRow {
        index,
        names: make_unique(names),
        filled,
    })
}

/// Positional name for a blank header cell (1-based)
pub fn placeholder_name(position: usize) -> String {
    format!("{}{}", PLACEHOLDER_COLUMN_PREFIX, position + 1)
}

/// Suffix repeated names with `_2`, `_3`, ... keeping the first occurrence
fn make_unique(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.clone()) {
            unique.push(name);
            continue;
        }
        let mut suffix = 2;
        let candidate = loop {
            let candidate = format!("{}_{}", name, suffix);
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        taken.insert(candidate.clone());
        seen.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}
