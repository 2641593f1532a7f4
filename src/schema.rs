//! Column type inference.
//!
//! Every non-empty value of a column is classified by shape (see
//! [`crate::patterns`]), then the column type is chosen from the class
//! fractions in a fixed order: percentage, currency, date, then number
//! (plain numbers plus currency amounts). Columns with no dominant shape are
//! Category when they have few distinct values and Text otherwise.

use crate::config::IngestConfig;
use crate::models::{CellValue, ColumnType};
use crate::patterns::{ValueClass, classify_cell};
use std::collections::HashSet;
use tracing::debug;

/// Per-class counts over the non-empty values of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassTally {
    pub percentage: usize,
    pub currency: usize,
    pub number: usize,
    pub date: usize,
    pub unclassified: usize,
}

impl ClassTally {
    pub fn record(&mut self, class: ValueClass) {
        match class {
            ValueClass::Percentage => self.percentage += 1,
            ValueClass::Currency => self.currency += 1,
            ValueClass::Number => self.number += 1,
            ValueClass::Date => self.date += 1,
            ValueClass::Unclassified => self.unclassified += 1,
        }
    }

    /// Count of non-empty values seen
    pub fn total(&self) -> usize {
        self.percentage + self.currency + self.number + self.date + self.unclassified
    }

    fn fraction(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }
}

/// Outcome of inferring one column
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInference {
    pub column_type: ColumnType,
    pub tally: ClassTally,
    /// Distinct case-insensitive values; only computed when no shape dominates
    pub distinct: Option<usize>,
}

/// Infer the semantic type of a column from its values in row order.
///
/// Blank values are skipped. A column without any non-empty value is Text.
pub fn infer_column_type<'a, I>(values: I, config: &IngestConfig) -> TypeInference
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let present: Vec<&CellValue> = values.into_iter().filter(|v| !v.is_blank()).collect();

    let mut tally = ClassTally::default();
    for value in &present {
        tally.record(classify_cell(value));
    }

    if tally.total() == 0 {
        return TypeInference {
            column_type: ColumnType::Text,
            tally,
            distinct: None,
        };
    }

    let threshold = config.type_threshold;
    let dominant = if tally.fraction(tally.percentage) >= threshold {
        Some(ColumnType::Percentage)
    } else if tally.fraction(tally.currency) >= threshold {
        Some(ColumnType::Currency)
    } else if tally.fraction(tally.date) >= threshold {
        Some(ColumnType::Date)
    } else if tally.fraction(tally.number + tally.currency) >= threshold {
        Some(ColumnType::Number)
    } else {
        None
    };

    if let Some(column_type) = dominant {
        return TypeInference {
            column_type,
            tally,
            distinct: None,
        };
    }

    let distinct = present
        .iter()
        .map(|v| v.as_text().trim().to_lowercase())
        .collect::<HashSet<_>>()
        .len();
    let column_type = if distinct <= config.category_max_distinct {
        ColumnType::Category
    } else {
        ColumnType::Text
    };

    TypeInference {
        column_type,
        tally,
        distinct: Some(distinct),
    }
}

/// Infer a named column and log the decision
pub fn infer_named_column<'a, I>(name: &str, values: I, config: &IngestConfig) -> ColumnType
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let inference = infer_column_type(values, config);
    debug!(
        "Column '{}' inferred as {} (tally {:?}, distinct {:?})",
        name, inference.column_type, inference.tally, inference.distinct
    );
    inference.column_type
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    fn infer(values: &[&str]) -> ColumnType {
        infer_column_type(&texts(values), &IngestConfig::default()).column_type
    }

    #[test]
    fn test_currency_column() {
        assert_eq!(infer(&["$450", "$1,200", "$510"]), ColumnType::Currency);
    }

    #[test]
    fn test_percentage_column() {
        assert_eq!(infer(&["45%", "12.5%", "-3%", "n/a"]), ColumnType::Percentage);
    }

    #[test]
    fn test_number_column_with_noise() {
        assert_eq!(infer(&["12", "1,400", "7.5", "-", "n/a"]), ColumnType::Number);
    }

    #[test]
    fn test_mixed_currency_and_numbers_score_as_number() {
        // Neither shape reaches 0.6 alone, together they do
        assert_eq!(infer(&["$10", "$20", "30", "40", "x"]), ColumnType::Number);
    }

    #[test]
    fn test_currency_checked_before_combined_number() {
        assert_eq!(infer(&["$10", "$20", "$30", "40", "x"]), ColumnType::Currency);
    }

    #[test]
    fn test_date_column() {
        assert_eq!(
            infer(&["2024-01-05", "05/02/2024", "Mar 3, 2024", "4 Apr 2024"]),
            ColumnType::Date
        );
    }

    #[test]
    fn test_month_year_only_falls_through_to_category() {
        assert_eq!(infer(&["Jan 2024", "Feb 2024", "Mar 2024"]), ColumnType::Category);
    }

    #[test]
    fn test_category_versus_text_by_distinct_count() {
        let regions = ["North", "south", "NORTH", "South ", "East"];
        assert_eq!(infer(&regions), ColumnType::Category);
        let inference = infer_column_type(&texts(&regions), &IngestConfig::default());
        assert_eq!(inference.distinct, Some(3));

        let names: Vec<String> = (0..21).map(|i| format!("Customer {}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(infer(&names), ColumnType::Text);
    }

    #[test]
    fn test_empty_column_is_text() {
        let values = vec![CellValue::Empty, CellValue::from("  ")];
        let inference = infer_column_type(&values, &IngestConfig::default());
        assert_eq!(inference.column_type, ColumnType::Text);
        assert_eq!(inference.tally.total(), 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // Exactly 3 of 5 percentages
        assert_eq!(infer(&["1%", "2%", "3%", "a", "b"]), ColumnType::Percentage);
        // 2 of 5 falls short
        assert_eq!(infer(&["1%", "2%", "a", "b", "c"]), ColumnType::Category);
    }

    #[test]
    fn test_typed_workbook_cells() {
        let values = vec![
            CellValue::Number(1.0),
            CellValue::Number(2.5),
            CellValue::Empty,
            CellValue::from("3"),
        ];
        let inference = infer_column_type(&values, &IngestConfig::default());
        assert_eq!(inference.column_type, ColumnType::Number);
        assert_eq!(inference.tally.number, 3);
    }

    #[test]
    fn test_inference_ignores_value_order() {
        let mut values = texts(&["$1", "2", "x", "$4", "$5", "y", "7%"]);
        let forward = infer_column_type(&values, &IngestConfig::default());
        values.reverse();
        let backward = infer_column_type(&values, &IngestConfig::default());
        values.rotate_left(3);
        let rotated = infer_column_type(&values, &IngestConfig::default());

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_custom_threshold() {
        let config = IngestConfig::default().with_type_threshold(1.0);
        let values = texts(&["$1", "$2", "3"]);
        assert_eq!(
            infer_column_type(&values, &config).column_type,
            ColumnType::Number
        );
    }
}
