//! Workbook → trial pipeline
//!
//! Stages run strictly in order, once per workbook: sheet selection, then
//! per sheet header location, metadata, column mapping and row extraction,
//! then date interpretation and finally assembly. Any fatal error aborts the
//! whole import; no partial trial is produced.

mod assemble;
mod columns;
mod grid;
mod header;
mod metadata;
mod rows;
mod sheets;

pub use assemble::{SchemaSheet, assemble_trial, collect_assessment_types, infer_unit};
pub use columns::map_columns;
pub use grid::{TreatmentIndex, build_grid};
pub use header::locate_header;
pub use metadata::extract_metadata;
pub use rows::extract_rows;
pub use sheets::{is_data_sheet, select_data_sheets};

use serde::{Deserialize, Serialize};

use crate::config::ImportConfig;
use crate::import::dates::DateInterpreter;
use crate::import::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
use crate::import::error::ImportError;
use crate::import::types::{
    DateInterpretation, DateSource, ParsedSheet, Sheet, SheetDate, Trial, Workbook,
};

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub trial: Trial,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    /// Per-sheet date readings for the caller's confirmation step
    pub fn date_interpretations(&self) -> &[SheetDate] {
        &self.trial.date_interpretations
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

/// Import a workbook, reading "today" from the local clock
pub fn import_workbook(workbook: &Workbook, config: &ImportConfig) -> Result<ImportReport, ImportError> {
    import_workbook_with(workbook, config, &DateInterpreter::new())
}

/// Import a workbook with an explicit date interpreter
pub fn import_workbook_with(
    workbook: &Workbook,
    config: &ImportConfig,
    interpreter: &DateInterpreter,
) -> Result<ImportReport, ImportError> {
    let mut diagnostics = Diagnostics::new();

    let data_sheets = select_data_sheets(workbook, &config.sheets, &mut diagnostics)?;

    let mut parsed = Vec::with_capacity(data_sheets.len());
    for sheet in data_sheets {
        parsed.push(parse_sheet(sheet, config, &mut diagnostics)?);
    }

    let dates: Vec<SheetDate> = parsed
        .iter()
        .map(|sheet| resolve_sheet_date(interpreter, sheet, &mut diagnostics))
        .collect();

    let schema = SchemaSheet::first(&parsed).ok_or(ImportError::NoDataSheets)?;
    let trial = assemble_trial(schema, &parsed, dates, config, &mut diagnostics);

    log::info!(
        "Imported '{}': {} sheets, {} blocks, {} treatments, {} assessment types",
        trial.name,
        trial.snapshots.len(),
        trial.block_count,
        trial.treatment_count,
        trial.assessment_types.len()
    );

    Ok(ImportReport {
        trial,
        diagnostics: diagnostics.into_vec(),
    })
}

/// Run header location, metadata, column mapping and row extraction on one sheet
pub fn parse_sheet(
    sheet: &Sheet,
    config: &ImportConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ParsedSheet, ImportError> {
    let header_row = locate_header(sheet, &config.header)?;
    diagnostics.debug(
        DiagnosticKind::HeaderFound,
        &sheet.name,
        Some(header_row),
        "Header row found",
    );

    let metadata = extract_metadata(&sheet.rows[..header_row]);
    let header = map_columns(
        &sheet.name,
        header_row,
        &sheet.rows[header_row],
        &config.header,
    )?;
    let records = extract_rows(sheet, &header, &config.header, diagnostics);

    Ok(ParsedSheet {
        name: sheet.name.clone(),
        metadata,
        header,
        records,
    })
}

/// Interpret a sheet's date from its name, falling back to the metadata date
/// when the name is not a date at all
pub fn resolve_sheet_date(
    interpreter: &DateInterpreter,
    sheet: &ParsedSheet,
    diagnostics: &mut Diagnostics,
) -> SheetDate {
    let by_name = interpreter.interpret(&sheet.name);

    if by_name.is_fallback() && !sheet.metadata.date.trim().is_empty() {
        let by_metadata = interpreter.interpret(&sheet.metadata.date);
        if !by_metadata.is_fallback() {
            diagnostics.info(
                DiagnosticKind::DateFromMetadata,
                &sheet.name,
                None,
                format!("Sheet name is not a date; using metadata date '{}'", sheet.metadata.date),
            );
            report_ambiguity(&sheet.name, &by_metadata, diagnostics);
            return SheetDate {
                sheet: sheet.name.clone(),
                source: DateSource::MetadataDate,
                interpretation: by_metadata,
            };
        }
    }

    if by_name.is_fallback() {
        diagnostics.warn(
            DiagnosticKind::DateFallback,
            &sheet.name,
            None,
            format!("No date found; using {} until confirmed", by_name.detected),
        );
    }
    report_ambiguity(&sheet.name, &by_name, diagnostics);

    SheetDate {
        sheet: sheet.name.clone(),
        source: DateSource::SheetName,
        interpretation: by_name,
    }
}

fn report_ambiguity(
    sheet: &str,
    interpretation: &DateInterpretation,
    diagnostics: &mut Diagnostics,
) {
    if interpretation.needs_confirmation && !interpretation.is_fallback() {
        let options: Vec<&str> = interpretation
            .candidates
            .iter()
            .map(|c| c.iso.as_str())
            .collect();
        diagnostics.info(
            DiagnosticKind::DateAmbiguous,
            sheet,
            None,
            format!(
                "'{}' is ambiguous ({}); defaulting to {}",
                interpretation.original.trim(),
                options.join(" or "),
                interpretation.detected
            ),
        );
    }
}
