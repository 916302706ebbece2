//! Plot rows below the header

use std::collections::HashSet;

use crate::config::HeaderConfig;
use crate::import::diagnostics::{DiagnosticKind, Diagnostics};
use crate::import::types::{CellValue, HeaderMap, PlotRecord, Reading, Sheet, cell_at};

/// Build one plot record per usable row below the header.
///
/// Blank rows, rows marked as blank plots and rows without block, plot and
/// treatment are skipped. Empty assessment cells are left out of the record;
/// non-numeric ones are kept as [`Reading::Invalid`].
pub fn extract_rows(
    sheet: &Sheet,
    header: &HeaderMap,
    config: &HeaderConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<PlotRecord> {
    let blank_marker = config.blank_plot_marker.trim().to_uppercase();
    let columns = distinct_assessment_columns(sheet, header, diagnostics);
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut records = Vec::new();

    for (row_idx, row) in sheet.rows.iter().enumerate().skip(header.header_row + 1) {
        if row.iter().all(CellValue::is_empty) {
            continue;
        }

        if !blank_marker.is_empty() && cell_at(row, 0).as_text().to_uppercase() == blank_marker {
            diagnostics.debug(
                DiagnosticKind::BlankPlotMarker,
                &sheet.name,
                Some(row_idx),
                "Blank plot row skipped",
            );
            continue;
        }

        let block_cell = cell_at(row, header.block_col);
        let plot_cell = cell_at(row, header.plot_col);
        let treatment_cell = cell_at(row, header.treatment_col);

        if block_cell.is_empty() || plot_cell.is_empty() || treatment_cell.is_empty() {
            diagnostics.debug(
                DiagnosticKind::MissingPlotKey,
                &sheet.name,
                Some(row_idx),
                "Row without block, plot or treatment skipped",
            );
            continue;
        }

        let (Some(block), Some(plot), Some(treatment)) = (
            block_cell.as_positive_int(),
            plot_cell.as_positive_int(),
            treatment_cell.as_positive_int(),
        ) else {
            diagnostics.warn(
                DiagnosticKind::InvalidPlotKey,
                &sheet.name,
                Some(row_idx),
                format!(
                    "Block/plot/treatment must be positive whole numbers, got '{}', '{}', '{}'",
                    block_cell, plot_cell, treatment_cell
                ),
            );
            continue;
        };

        if !seen.insert((block, plot)) {
            diagnostics.warn(
                DiagnosticKind::DuplicatePlot,
                &sheet.name,
                Some(row_idx),
                format!("Block {} plot {} appears more than once; keeping the first", block, plot),
            );
            continue;
        }

        let mut record = PlotRecord::new(block, plot, treatment);
        record.row = row_idx;
        record.treatment_name = header
            .treatment_name_col
            .map(|col| cell_at(row, col).as_text())
            .filter(|name| !name.is_empty());

        for &(name, col) in &columns {
            let cell = cell_at(row, col);
            if cell.is_empty() {
                continue;
            }
            let reading = match cell.as_number() {
                Some(value) => Reading::Value(value),
                None => Reading::Invalid(cell.as_text()),
            };
            record.readings.insert(name.to_string(), reading);
        }

        records.push(record);
    }

    log::debug!("Sheet '{}': {} plot records", sheet.name, records.len());
    records
}

/// Assessment columns with repeated names dropped; the leftmost one is read
fn distinct_assessment_columns<'a>(
    sheet: &Sheet,
    header: &'a HeaderMap,
    diagnostics: &mut Diagnostics,
) -> Vec<(&'a str, usize)> {
    let mut names = HashSet::new();
    let mut columns = Vec::with_capacity(header.assessment_cols.len());

    for (name, col) in &header.assessment_cols {
        if names.insert(name.as_str()) {
            columns.push((name.as_str(), *col));
        } else {
            diagnostics.warn(
                DiagnosticKind::DuplicateAssessmentColumn,
                &sheet.name,
                Some(header.header_row),
                format!("Assessment '{}' appears in more than one column; column {} ignored", name, col + 1),
            );
        }
    }

    columns
}
