//! Header row detection

use crate::config::HeaderConfig;
use crate::import::error::ImportError;
use crate::import::types::{CellValue, Sheet};

/// Index of the first row, within the scan window, that carries both the
/// block and plot markers
pub fn locate_header(sheet: &Sheet, config: &HeaderConfig) -> Result<usize, ImportError> {
    let block = config.block_marker.to_lowercase();
    let plot = config.plot_marker.to_lowercase();

    sheet
        .rows
        .iter()
        .take(config.scan_rows)
        .position(|row| has_marker(row, &block) && has_marker(row, &plot))
        .ok_or_else(|| ImportError::HeaderNotFound {
            sheet: sheet.name.clone(),
        })
}

fn has_marker(row: &[CellValue], marker: &str) -> bool {
    row.iter().any(|cell| cell.contains(marker))
}
