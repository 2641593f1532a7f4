//! Chart recommendation from column types.
//!
//! Suggestions depend only on the ordered column name/type list, never on
//! cell values. Date x numeric pairs give line and area charts, category x
//! numeric pairs give bar and pie charts, and every numeric column gets a
//! summary stats card.

use crate::models::{
    ChartSuggestion, ChartSuggestions, ChartType, ColumnSpec, ColumnType, ParsedTable,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("invalid pattern: {}", e)));

/// Stateless chart recommender
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRecommender;

impl ChartRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Enumerate suggestions for an ordered column list.
    ///
    /// Columns whose type string is outside the closed set are ignored.
    pub fn suggest(&self, columns: &[ColumnSpec]) -> ChartSuggestions {
        let mut date_cols = Vec::new();
        let mut numeric_cols = Vec::new();
        let mut category_cols = Vec::new();

        for column in columns {
            match column.column_type() {
                Some(ColumnType::Date) => date_cols.push(column.name.as_str()),
                Some(t) if t.is_numeric() => numeric_cols.push(column.name.as_str()),
                Some(ColumnType::Category) => category_cols.push(column.name.as_str()),
                Some(_) => {}
                None => debug!(
                    "Skipping column '{}' with unknown type '{}'",
                    column.name, column.type_name
                ),
            }
        }

        let pair_count = (date_cols.len() + category_cols.len()) * numeric_cols.len();
        let mut charts = Vec::with_capacity(2 * pair_count);
        for date in &date_cols {
            for value in &numeric_cols {
                charts.push(pair_suggestion(ChartType::Line, date, value));
                charts.push(pair_suggestion(ChartType::Area, date, value));
            }
        }
        for category in &category_cols {
            for value in &numeric_cols {
                charts.push(pair_suggestion(ChartType::Bar, category, value));
                charts.push(pair_suggestion(ChartType::Pie, category, value));
            }
        }

        let stat_cards: Vec<ChartSuggestion> =
            numeric_cols.iter().map(|value| stats_card(value)).collect();

        debug!(
            "Suggested {} charts and {} stat cards from {} columns",
            charts.len(),
            stat_cards.len(),
            columns.len()
        );

        ChartSuggestions { charts, stat_cards }
    }

    /// Suggestions for the columns of a parsed table
    pub fn suggest_for_table(&self, table: &ParsedTable) -> ChartSuggestions {
        let specs: Vec<ColumnSpec> = table.columns.iter().map(ColumnSpec::from).collect();
        self.suggest(&specs)
    }
}

/// Deterministic id with whitespace runs collapsed to underscores
pub fn suggestion_id(chart_type: ChartType, columns: &[&str]) -> String {
    let raw = std::iter::once(chart_type.as_str())
        .chain(columns.iter().copied())
        .collect::<Vec<_>>()
        .join("_");
    WHITESPACE_RUN.replace_all(&raw, "_").into_owned()
}

fn pair_suggestion(chart_type: ChartType, x: &str, y: &str) -> ChartSuggestion {
    let (title, description) = match chart_type {
        ChartType::Line => (
            format!("{} over time", y),
            format!("Line chart of {} by {}", y, x),
        ),
        ChartType::Area => (
            format!("{} trend", y),
            format!("Cumulative area view of {} across {}", y, x),
        ),
        ChartType::Bar => (
            format!("{} by {}", y, x),
            format!("Compare {} across each {}", y, x),
        ),
        ChartType::Pie => (
            format!("{} share by {}", y, x),
            format!("Proportion of total {} contributed by each {}", y, x),
        ),
        ChartType::Stats => return stats_card(y),
    };

    ChartSuggestion {
        id: suggestion_id(chart_type, &[x, y]),
        chart_type,
        title,
        x_column: Some(x.to_string()),
        y_column: y.to_string(),
        description,
    }
}

fn stats_card(y: &str) -> ChartSuggestion {
    ChartSuggestion {
        id: suggestion_id(ChartType::Stats, &[y]),
        chart_type: ChartType::Stats,
        title: format!("{} summary", y),
        x_column: None,
        y_column: y.to_string(),
        description: format!("Total, average, minimum and maximum of {}", y),
    }
}
