//! Import command arguments

pub mod handler;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

pub use handler::handle_import_command;

#[derive(Args, Debug)]
pub struct ImportCommands {
    /// Workbook to import (.xlsx, .xlsm, .xlsb, .xls or .ods)
    pub file: PathBuf,

    /// Import configuration (TOML). Defaults to the per-user config if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Confirm a sheet's date, e.g. --confirm "05/03/2024=2024-05-03"
    #[arg(long = "confirm", value_name = "SHEET=YYYY-MM-DD", value_parser = parse_confirmation)]
    pub confirmations: Vec<(String, NaiveDate)>,

    /// Exit with an error if any sheet date still needs confirmation
    #[arg(long)]
    pub strict_dates: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable overview
    Summary,
    /// Full trial and diagnostics as JSON
    Json,
}

fn parse_confirmation(s: &str) -> Result<(String, NaiveDate), String> {
    let (sheet, date) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SHEET=YYYY-MM-DD, got '{}'", s))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", date, e))?;
    Ok((sheet.to_string(), date))
}
