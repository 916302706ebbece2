//! Trial workbook import
//!
//! Converts a field-trial workbook (one sheet per assessment date) into a
//! normalized [`Trial`]. Ambiguous or missing dates are never an error; they
//! are reported through each sheet's [`DateInterpretation`] for the caller to
//! confirm.

pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod types;

pub use dates::DateInterpreter;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
pub use error::ImportError;
pub use excel::read_workbook_file;
pub use pipeline::{ImportReport, import_workbook, import_workbook_with};
pub use types::*;

use std::path::Path;

use crate::config::ImportConfig;

/// Import a workbook supplied as raw file bytes
pub fn import_bytes(bytes: &[u8], config: &ImportConfig) -> Result<ImportReport, ImportError> {
    let workbook = Workbook::from_bytes(bytes)?;
    import_workbook(&workbook, config)
}

/// Read a workbook file and import it
pub async fn import_file(
    path: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<ImportReport, ImportError> {
    let workbook = read_workbook_file(path).await?;
    import_workbook(&workbook, config)
}
