//! Row classification for data below the header.
//!
//! Fully blank rows and decorative section labels (a lone non-numeric cell
//! in the first column, e.g. "North Region" or "TOTAL") are dropped; every
//! other row is kept in its original order.

use crate::header::count_filled;
use crate::models::{CellValue, RawRow};
use crate::patterns::looks_like_data;
use tracing::debug;

/// Classification of one row below the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    Data,
    Blank,
    SectionLabel,
}

/// Counters reported by [`filter_rows`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub retained: usize,
    pub blank_dropped: usize,
    pub labels_dropped: usize,
}

/// Rows that survived filtering, plus how many were dropped and why
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRows {
    pub rows: Vec<RawRow>,
    pub stats: FilterStats,
}

/// Classify a single row
pub fn classify_row(row: &[CellValue]) -> RowClass {
    match count_filled(row) {
        0 => RowClass::Blank,
        1 => match row.first() {
            Some(first) if !first.is_blank() && !looks_like_data(first) => RowClass::SectionLabel,
            _ => RowClass::Data,
        },
        _ => RowClass::Data,
    }
}

/// Drop blank and section-label rows in a single ordered pass
pub fn filter_rows(rows: Vec<RawRow>) -> FilteredRows {
    let mut stats = FilterStats::default();
    let mut retained = Vec::with_capacity(rows.len());

    for row in rows {
        match classify_row(&row) {
            RowClass::Data => {
                stats.retained += 1;
                retained.push(row);
            }
            RowClass::Blank => stats.blank_dropped += 1,
            RowClass::SectionLabel => stats.labels_dropped += 1,
        }
    }

    debug!(
        "Row filter kept {} rows, dropped {} blank and {} section labels",
        stats.retained, stats.blank_dropped, stats.labels_dropped
    );

    FilteredRows {
        rows: retained,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Option<&str>]) -> RawRow {
        cells
            .iter()
            .map(|c| c.map(CellValue::from).unwrap_or(CellValue::Empty))
            .collect()
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        assert_eq!(classify_row(&row(&[None, None, None])), RowClass::Blank);
        assert_eq!(classify_row(&row(&[Some("  "), None])), RowClass::Blank);
        assert_eq!(classify_row(&[]), RowClass::Blank);
    }

    #[test]
    fn test_section_label_in_first_column_is_dropped() {
        assert_eq!(
            classify_row(&row(&[Some("North Region"), None, None])),
            RowClass::SectionLabel
        );
        assert_eq!(
            classify_row(&row(&[Some("  TOTAL "), None])),
            RowClass::SectionLabel
        );
    }

    #[test]
    fn test_lone_cell_elsewhere_is_kept() {
        assert_eq!(
            classify_row(&row(&[None, Some("TOTAL"), None, None])),
            RowClass::Data
        );
    }

    #[test]
    fn test_lone_data_value_in_first_column_is_kept() {
        assert_eq!(classify_row(&row(&[Some("1200"), None])), RowClass::Data);
        assert_eq!(classify_row(&row(&[Some("$450"), None])), RowClass::Data);
        assert_eq!(classify_row(&row(&[Some("-3"), None])), RowClass::Data);
        assert_eq!(
            classify_row(&[CellValue::Number(5.0), CellValue::Empty]),
            RowClass::Data
        );
    }

    #[test]
    fn test_filter_preserves_order_and_counts() {
        let rows = vec![
            row(&[Some("2024-01-05"), Some("$450")]),
            row(&[None, None]),
            row(&[Some("West"), None]),
            row(&[Some("2024-01-06"), Some("$510")]),
            row(&[None, Some("note")]),
        ];
        let filtered = filter_rows(rows);

        assert_eq!(filtered.rows.len(), 3);
        assert_eq!(filtered.rows[0][1], CellValue::from("$450"));
        assert_eq!(filtered.rows[1][1], CellValue::from("$510"));
        assert_eq!(filtered.rows[2][1], CellValue::from("note"));
        assert_eq!(
            filtered.stats,
            FilterStats {
                retained: 3,
                blank_dropped: 1,
                labels_dropped: 1,
            }
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = vec![
            row(&[Some("Summary"), None, None]),
            row(&[Some("a"), Some("1"), None]),
            row(&[None, None, None]),
            row(&[None, Some("TOTAL"), None]),
            row(&[Some("7"), None, None]),
        ];
        let once = filter_rows(rows);
        let twice = filter_rows(once.rows.clone());

        assert_eq!(twice.rows, once.rows);
        assert_eq!(twice.stats.blank_dropped, 0);
        assert_eq!(twice.stats.labels_dropped, 0);
    }
}
