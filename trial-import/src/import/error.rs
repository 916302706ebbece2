//! Fatal import errors

use thiserror::Error;

/// Errors that abort an import. Row-level problems and ambiguous dates are
/// never errors; they show up as diagnostics and confirmation flags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No data sheets found in workbook (all sheets were templates, spares or empty)")]
    NoDataSheets,

    #[error("Could not find a header row with 'Block!' and 'Plot!' markers in sheet '{sheet}'")]
    HeaderNotFound { sheet: String },

    #[error("Header row in sheet '{sheet}' has no {column} column")]
    MissingColumn { sheet: String, column: String },

    #[error("Failed to read workbook: {0}")]
    FileRead(String),

    #[error("Invalid import configuration: {0}")]
    Config(String),

    #[error("Sheet not found in trial: {0}")]
    UnknownSheet(String),
}
