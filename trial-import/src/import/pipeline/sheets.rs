//! Pick the data sheets out of a workbook

use crate::config::SheetConfig;
use crate::import::diagnostics::{DiagnosticKind, Diagnostics};
use crate::import::error::ImportError;
use crate::import::types::{Sheet, Workbook};

/// Check a sheet name against the exclusion patterns (case-insensitive)
pub fn is_data_sheet(name: &str, config: &SheetConfig) -> bool {
    let lower = name.to_lowercase();
    !config
        .excluded_patterns
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

/// Data sheets in workbook order. Fails if every sheet is excluded.
pub fn select_data_sheets<'a>(
    workbook: &'a Workbook,
    config: &SheetConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<&'a Sheet>, ImportError> {
    let mut selected = Vec::new();

    for sheet in &workbook.sheets {
        if is_data_sheet(&sheet.name, config) {
            selected.push(sheet);
        } else {
            diagnostics.debug(
                DiagnosticKind::SheetExcluded,
                &sheet.name,
                None,
                "Sheet excluded by name",
            );
        }
    }

    if selected.is_empty() {
        return Err(ImportError::NoDataSheets);
    }

    log::debug!(
        "Selected {} of {} sheets",
        selected.len(),
        workbook.sheets.len()
    );
    Ok(selected)
}
