//! Type override tests

use crate::grid::read_grid;
use crate::models::{ColumnType, SheetGrid};
use crate::processor::TableBuilder;
use std::collections::HashMap;

const CSV: &str = "\
Code,Amount,Team
007,$450,Red
012,$510,Blue
031,$300,Red
";

#[test]
fn test_override_replaces_inferred_type() {
    let builder = TableBuilder::new();
    let inferred = builder.parse(CSV.as_bytes(), "codes.csv", None).unwrap();
    assert_eq!(inferred.column("Code").unwrap().column_type, ColumnType::Number);

    let overrides = HashMap::from([
        ("Code".to_string(), ColumnType::Category),
        ("Amount".to_string(), ColumnType::Number),
    ]);
    let table = builder
        .parse_with_overrides(CSV.as_bytes(), "codes.csv", None, &overrides)
        .unwrap();

    assert_eq!(table.column("Code").unwrap().column_type, ColumnType::Category);
    assert_eq!(table.column("Amount").unwrap().column_type, ColumnType::Number);
    assert_eq!(table.column("Team").unwrap().column_type, ColumnType::Category);
}

#[test]
fn test_unknown_override_is_ignored() {
    let overrides = HashMap::from([("Missing".to_string(), ColumnType::Date)]);
    let table = TableBuilder::new()
        .parse_with_overrides(CSV.as_bytes(), "codes.csv", None, &overrides)
        .unwrap();
    assert_eq!(table.column_names(), vec!["Code", "Amount", "Team"]);
    assert!(table.column("Missing").is_none());
}

#[test]
fn test_build_table_from_extracted_grid() {
    let sheet = read_grid(CSV.as_bytes(), "codes.csv", None).unwrap();
    let builder = TableBuilder::new();
    let from_grid = builder.build_table(sheet, &HashMap::new());
    let from_bytes = builder.parse(CSV.as_bytes(), "codes.csv", None).unwrap();
    assert_eq!(from_grid, from_bytes);
}

#[test]
fn test_build_table_on_empty_grid_is_empty() {
    let sheet = SheetGrid {
        sheet_names: vec!["Blank".to_string()],
        selected_sheet: "Blank".to_string(),
        grid: Vec::new(),
    };
    let table = TableBuilder::new().build_table(sheet, &HashMap::new());
    assert_eq!(table.row_count, 0);
    assert!(table.columns.is_empty());
    assert_eq!(table.selected_sheet, "Blank");
}
