//! Core data structures and types for tabular ingestion.
//!
//! Defines raw cell values, the semantic column types, materialized rows and
//! tables, and the chart suggestion records produced by the recommender.

use chrono::{NaiveDateTime, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A single unparsed cell as decoded from a workbook or delimited text
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for empty cells and text that trims to nothing
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// True when the cell already holds a date instant
    pub fn is_date_instant(&self) -> bool {
        matches!(self, CellValue::DateTime(_))
    }

    /// String form used by every text heuristic
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => {
                Cow::Owned(dt.format("%Y-%m-%d").to_string())
            }
            CellValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

/// One row of raw cells
pub type RawRow = Vec<CellValue>;

/// Rectangular array of raw cells for one sheet
pub type RawGrid = Vec<RawRow>;

/// Output of the raw grid extractor
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub sheet_names: Vec<String>,
    pub selected_sheet: String,
    pub grid: RawGrid,
}

/// Closed set of semantic column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Date,
    Number,
    Currency,
    Percentage,
    Category,
    Text,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Date,
        ColumnType::Number,
        ColumnType::Currency,
        ColumnType::Percentage,
        ColumnType::Category,
        ColumnType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Date => "Date",
            ColumnType::Number => "Number",
            ColumnType::Currency => "Currency",
            ColumnType::Percentage => "Percentage",
            ColumnType::Category => "Category",
            ColumnType::Text => "Text",
        }
    }

    /// Number, Currency and Percentage columns can be aggregated
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Number | ColumnType::Currency | ColumnType::Percentage
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown column type '{}'", s))
    }
}

/// A named, typed column of a parsed table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub sample: Vec<CellValue>,
}

/// Materialized row keyed by column name, in column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Option<CellValue>)>,
}

impl Row {
    pub fn new(cells: Vec<(String, Option<CellValue>)>) -> Self {
        Self { cells }
    }

    /// Value for a column; `None` when the column is absent or the cell is null
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Value at a column position; rows share the column order of their table
    pub fn value_at(&self, position: usize) -> Option<&CellValue> {
        self.cells.get(position).and_then(|(_, value)| value.as_ref())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CellValue>)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Immutable result of one parse call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTable {
    pub sheet_names: Vec<String>,
    pub selected_sheet: String,
    pub row_count: usize,
    pub columns: Vec<Column>,
    pub preview: Vec<Row>,
    pub rows: Vec<Row>,
}

impl ParsedTable {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Chart kinds produced by the recommender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Area,
    Bar,
    Pie,
    Stats,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Stats => "stats",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestion {
    pub id: String,
    pub chart_type: ChartType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    pub y_column: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestions {
    pub charts: Vec<ChartSuggestion>,
    pub stat_cards: Vec<ChartSuggestion>,
}

impl ChartSuggestions {
    pub fn len(&self) -> usize {
        self.charts.len() + self.stat_cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty() && self.stat_cards.is_empty()
    }

    /// Charts followed by stat cards, in generation order
    pub fn iter(&self) -> impl Iterator<Item = &ChartSuggestion> {
        self.charts.iter().chain(self.stat_cards.iter())
    }
}

/// Column name/type pair accepted by the chart recommender.
///
/// The type travels as a string so that edited or foreign column lists can be
/// passed through unchanged; strings outside [`ColumnType`] are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.type_name.parse().ok()
    }
}

impl From<&Column> for ColumnSpec {
    fn from(column: &Column) -> Self {
        Self::new(column.name.clone(), column.column_type.as_str())
    }
}

impl From<(&str, ColumnType)> for ColumnSpec {
    fn from((name, column_type): (&str, ColumnType)) -> Self {
        Self::new(name, column_type.as_str())
    }
}
