//! Typed export of parsed tables.
//!
//! Numeric-family columns become Float64, date columns become Date and the
//! rest stay as strings. Values that do not coerce to the column type are
//! written as nulls, so the output row count always equals `row_count`.

use crate::config::CompressionAlgorithm;
use crate::error::Result;
use crate::models::{CellValue, Column, ColumnType, ParsedTable, Row};
use crate::patterns::{parse_date, parse_numeric};

use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, ParquetWriter, Series};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a parsed table into a typed DataFrame
pub fn to_dataframe(table: &ParsedTable) -> Result<DataFrame> {
    let columns = table
        .columns
        .iter()
        .enumerate()
        .map(|(position, column)| column_series(column, position, &table.rows).into_column())
        .collect();

    let df = DataFrame::new(columns)?;
    debug!(
        "Built DataFrame with {} rows and {} columns",
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a parsed table to a Parquet file, returning the rows written
pub fn write_parquet(
    table: &ParsedTable,
    path: &Path,
    compression: CompressionAlgorithm,
) -> Result<usize> {
    let start_time = Instant::now();
    let mut df = to_dataframe(table)?;

    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(compression.to_polars_compression())
        .finish(&mut df)?;

    info!(
        "Wrote {} rows to {} in {}ms",
        df.height(),
        path.display(),
        start_time.elapsed().as_millis()
    );
    Ok(df.height())
}

fn column_series(column: &Column, position: usize, rows: &[Row]) -> Series {
    let name = column.name.as_str();
    let cells = rows.iter().map(|row| row.value_at(position));

    match column.column_type {
        t if t.is_numeric() => {
            let values: Vec<Option<f64>> = cells.map(|cell| cell.and_then(numeric_value)).collect();
            Series::new(name.into(), values)
        }
        ColumnType::Date => {
            let values: Vec<Option<NaiveDate>> = cells.map(|cell| cell.and_then(date_value)).collect();
            Series::new(name.into(), values)
        }
        _ => {
            let values: Vec<Option<String>> = cells
                .map(|cell| cell.map(|value| value.as_text().into_owned()))
                .collect();
            Series::new(name.into(), values)
        }
    }
}

fn numeric_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(text) => parse_numeric(text),
        _ => None,
    }
}

fn date_value(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(text) => parse_date(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::TableBuilder;
    use polars::prelude::{DataType, ParquetReader, SerReader};
    use tempfile::TempDir;

    const CSV: &str = "\
Date,Amount,Share,Region
2024-01-05,$450,12%,North
2024-01-06,\"$1,200\",40%,South
,n/a,48%,North
";

    fn table() -> ParsedTable {
        TableBuilder::new()
            .parse(CSV.as_bytes(), "sales.csv", None)
            .unwrap()
    }

    #[test]
    fn test_dataframe_types_follow_columns() {
        let df = to_dataframe(&table()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("Date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("Amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Share").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Region").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_numeric_coercion_and_nulls() {
        let df = to_dataframe(&table()).unwrap();

        let amount = df.column("Amount").unwrap().f64().unwrap();
        assert_eq!(amount.get(0), Some(450.0));
        assert_eq!(amount.get(1), Some(1200.0));
        assert_eq!(amount.get(2), None);

        // Percentages keep their displayed magnitude
        let share = df.column("Share").unwrap().f64().unwrap();
        assert_eq!(share.get(0), Some(12.0));

        assert_eq!(df.column("Date").unwrap().null_count(), 1);
    }

    #[test]
    fn test_iso_dates_export_without_nulls() {
        let table = TableBuilder::new()
            .parse(b"Day,Sales\n2024-02-01,10\n2024-02-12,20\n2024/12/31,5\n", "daily.csv", None)
            .unwrap();
        let df = to_dataframe(&table).unwrap();

        let day = df.column("Day").unwrap();
        assert_eq!(day.dtype(), &DataType::Date);
        assert_eq!(day.null_count(), 0);
    }

    #[test]
    fn test_values_follow_column_positions() {
        let csv = "A,B,C,D\n1,x,2024-01-05,$3\n4,y,2024-01-06,$5\n";
        let table = TableBuilder::new()
            .parse(csv.as_bytes(), "wide.csv", None)
            .unwrap();
        let df = to_dataframe(&table).unwrap();

        let a = df.column("A").unwrap().f64().unwrap();
        assert_eq!((a.get(0), a.get(1)), (Some(1.0), Some(4.0)));
        let b = df.column("B").unwrap().str().unwrap();
        assert_eq!((b.get(0), b.get(1)), (Some("x"), Some("y")));
        let d = df.column("D").unwrap().f64().unwrap();
        assert_eq!((d.get(0), d.get(1)), (Some(3.0), Some(5.0)));
    }

    #[test]
    fn test_write_parquet_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sales.parquet");

        for compression in [
            CompressionAlgorithm::Snappy,
            CompressionAlgorithm::Zstd,
            CompressionAlgorithm::None,
        ] {
            let written = write_parquet(&table(), &path, compression).unwrap();
            assert_eq!(written, 3);

            let df = ParquetReader::new(File::open(&path).unwrap())
                .finish()
                .unwrap();
            assert_eq!(df.height(), 3);
            assert_eq!(
                df.get_column_names()
                    .iter()
                    .map(|n| n.as_str())
                    .collect::<Vec<_>>(),
                vec!["Date", "Amount", "Share", "Region"]
            );
        }
    }

    #[test]
    fn test_empty_table_exports_no_rows() {
        let table = TableBuilder::new()
            .parse(b"Name,Notes\n", "header.csv", None)
            .unwrap();
        let df = to_dataframe(&table).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }
}
