//! Command-line interface components.

use crate::charts::ChartRecommender;
use crate::config::CompressionAlgorithm;
use crate::export::write_parquet;
use crate::grid::InputFormat;
use crate::models::{ChartSuggestions, ColumnSpec, ColumnType, ParsedTable};
use crate::processor::TableBuilder;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "gridchart")]
#[command(about = "Normalize messy spreadsheet exports into typed tables and suggest charts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse spreadsheet or CSV files into typed tables
    Parse(ParseArgs),
    /// Suggest charts for a JSON list of {name, type} columns
    Suggest(SuggestArgs),
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Files or directories to parse
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Sheet to read from workbooks (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Force a column type, e.g. --override "Code=Category"
    #[arg(long = "override", value_name = "NAME=TYPE", value_parser = parse_override)]
    pub overrides: Vec<(String, ColumnType)>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write each parsed table to DIR/<file stem>.parquet
    #[arg(long, value_name = "DIR")]
    pub parquet: Option<PathBuf>,

    /// Parquet compression algorithm
    #[arg(long, value_enum, default_value_t = CompressionAlgorithm::Snappy)]
    pub compression: CompressionAlgorithm,
}

#[derive(clap::Args, Debug)]
pub struct SuggestArgs {
    /// JSON file holding an array of {"name", "type"} objects, or "-" for stdin
    #[arg(value_name = "COLUMNS_JSON")]
    pub columns: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseReport<'a> {
    file: String,
    table: &'a ParsedTable,
    suggestions: &'a ChartSuggestions,
}

/// Parse a `NAME=TYPE` override. The last `=` separates name from type.
pub fn parse_override(raw: &str) -> std::result::Result<(String, ColumnType), String> {
    let (name, type_name) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=TYPE, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("missing column name in '{}'", raw));
    }
    let column_type = type_name.trim().parse::<ColumnType>()?;
    Ok((name.to_string(), column_type))
}

/// Expand files and directories into the list of supported input files
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("Input path does not exist: {}", path.display());
        }

        let mut found: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!("Found {} input files under {}", found.len(), path.display());
        files.extend(found);
    }

    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    InputFormat::from_file_name(&name) != InputFormat::Unknown
}

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    match args.command {
        Commands::Parse(parse_args) => run_parse(parse_args),
        Commands::Suggest(suggest_args) => run_suggest(suggest_args),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gridchart={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let files = collect_input_files(&args.paths)?;
    if files.is_empty() {
        anyhow::bail!("No supported input files found");
    }

    let builder = TableBuilder::new();
    let overrides: HashMap<String, ColumnType> = args.overrides.iter().cloned().collect();
    let recommender = ChartRecommender::new();

    if let Some(dir) = &args.parquet {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut failures = 0;
    let mut reports = Vec::new();

    for file in &files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes =
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

        let table = match builder.parse_with_overrides(
            &bytes,
            &file_name,
            args.sheet.as_deref(),
            &overrides,
        ) {
            Ok(table) => table,
            Err(e) if e.is_input_error() => {
                error!("Skipping {}: {}", file.display(), e);
                failures += 1;
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to parse {}", file.display())),
        };

        if let Some(dir) = &args.parquet {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_string());
            let output = dir.join(format!("{}.parquet", stem));
            write_parquet(&table, &output, args.compression)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }

        let suggestions = recommender.suggest_for_table(&table);
        reports.push((file.display().to_string(), table, suggestions));
    }

    match args.format {
        OutputFormat::Json => {
            let json: Vec<ParseReport> = reports
                .iter()
                .map(|(file, table, suggestions)| ParseReport {
                    file: file.clone(),
                    table,
                    suggestions,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            for (file, table, suggestions) in &reports {
                print_table_summary(file, table);
                print_suggestions(suggestions);
            }
        }
    }

    info!("Parsed {} of {} files", reports.len(), files.len());
    if failures > 0 {
        anyhow::bail!("{} of {} files could not be parsed", failures, files.len());
    }
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let raw = if args.columns.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read columns from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&args.columns)
            .with_context(|| format!("Failed to read {}", args.columns.display()))?
    };

    let columns: Vec<ColumnSpec> =
        serde_json::from_str(&raw).context("Expected a JSON array of {\"name\", \"type\"} objects")?;
    let suggestions = ChartRecommender::new().suggest(&columns);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        OutputFormat::Table => print_suggestions(&suggestions),
    }
    Ok(())
}

fn print_table_summary(file: &str, table: &ParsedTable) {
    println!();
    println!("{}", file.bright_green().bold());
    println!(
        "  {} {}   {} {}   {} {}",
        "Sheet:".bright_white(),
        table.selected_sheet.bright_cyan(),
        "Rows:".bright_white(),
        table.row_count.to_string().bright_yellow(),
        "Columns:".bright_white(),
        table.columns.len().to_string().bright_yellow()
    );
    if table.sheet_names.len() > 1 {
        println!(
            "  {} {}",
            "Sheets:".bright_white(),
            table.sheet_names.join(", ").bright_black()
        );
    }

    println!();
    for column in &table.columns {
        let sample: Vec<String> = column
            .sample
            .iter()
            .map(|value| value.as_text().into_owned())
            .collect();
        println!(
            "  {:<24} {:<12} {}",
            column.name.bright_cyan(),
            column.column_type.to_string().yellow(),
            sample.join(", ").bright_black()
        );
    }
}

fn print_suggestions(suggestions: &ChartSuggestions) {
    println!();
    if suggestions.is_empty() {
        println!("  {}", "No chart suggestions".bright_black());
        return;
    }

    println!("  {}", "Suggested charts:".bright_green().bold());
    for suggestion in suggestions.iter() {
        println!(
            "  {:<6} {:<36} {}",
            suggestion.chart_type.to_string().bright_yellow(),
            suggestion.title.bright_white(),
            suggestion.description.bright_black()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("Code=Category").unwrap(),
            ("Code".to_string(), ColumnType::Category)
        );
        assert_eq!(
            parse_override("a=b=Number").unwrap(),
            ("a=b".to_string(), ColumnType::Number)
        );
        assert!(parse_override("Code").is_err());
        assert!(parse_override("=Date").is_err());
        assert!(parse_override("Code=category").is_err());
    }

    #[test]
    fn test_args_parse_subcommands() {
        let args = Args::try_parse_from([
            "gridchart",
            "-v",
            "parse",
            "sales.csv",
            "--override",
            "Code=Category",
            "--format",
            "json",
            "--compression",
            "zstd",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Parse(parse) => {
                assert_eq!(parse.paths, vec![PathBuf::from("sales.csv")]);
                assert_eq!(
                    parse.overrides,
                    vec![("Code".to_string(), ColumnType::Category)]
                );
                assert_eq!(parse.format, OutputFormat::Json);
                assert_eq!(parse.compression, CompressionAlgorithm::Zstd);
                assert!(parse.parquet.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from(["gridchart", "parse"]).is_err());
        assert!(Args::try_parse_from(["gridchart", "-v", "-q", "suggest", "cols.json"]).is_err());
    }

    #[test]
    fn test_collect_input_files_walks_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(temp_dir.path().join("b.csv"), "A,B\n1,2\n").unwrap();
        fs::write(nested.join("a.xlsx"), b"not really").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "# notes").unwrap();

        let files = collect_input_files(&[temp_dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"b.csv".to_string()));
        assert!(names.contains(&"a.xlsx".to_string()));
    }

    #[test]
    fn test_collect_input_files_keeps_explicit_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("export.dat");
        fs::write(&file, "A,B\n").unwrap();

        let files = collect_input_files(std::slice::from_ref(&file)).unwrap();
        assert_eq!(files, vec![file]);

        let missing = temp_dir.path().join("missing.csv");
        assert!(collect_input_files(&[missing]).is_err());
    }
}
