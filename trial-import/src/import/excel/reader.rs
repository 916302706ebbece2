//! Read a workbook from bytes with calamine

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;

use crate::import::error::ImportError;
use crate::import::types::{CellValue, Sheet, Workbook, format_iso};

impl Workbook {
    /// Parse a workbook from an in-memory file (xlsx, xlsm, xlsb, xls or ods)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ImportError::FileRead(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names();
        log::debug!("Workbook has {} sheets: {:?}", sheet_names.len(), sheet_names);

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                ImportError::FileRead(format!("Failed to read sheet '{}': {}", name, e))
            })?;

            // Ranges start at the first used cell; pad back to A1 so column
            // positions match what the author sees.
            let (start_row, start_col) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
            for row in range.rows() {
                let mut cells = vec![CellValue::Empty; start_col];
                cells.extend(row.iter().map(convert_cell));
                rows.push(cells);
            }

            sheets.push(Sheet::new(name, rows));
        }

        Ok(Workbook::new(sheets))
    }
}

/// Read a workbook file from disk.
///
/// The whole file is loaded before parsing starts; this is the only
/// asynchronous step of an import.
pub async fn read_workbook_file(path: impl AsRef<Path>) -> Result<Workbook, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::FileRead(format!("{}: {}", path.display(), e)))?;

    log::info!("Read {} bytes from {}", bytes.len(), path.display());
    Workbook::from_bytes(&bytes)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        // Elapsed time, not a calendar date
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => match calendar_date(dt) {
            Some(date) => CellValue::Text(format_iso(date)),
            None => CellValue::Number(dt.as_f64()),
        },
        // "2024-03-05T00:00:00" keeps only its date part
        Data::DateTimeIso(s) => CellValue::text(s.split('T').next().unwrap_or(s.as_str())),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
    }
}

/// Date part of a date cell, honouring the workbook's 1900 or 1904 epoch
fn calendar_date(dt: &ExcelDateTime) -> Option<NaiveDate> {
    let (year, month, day, ..) = dt.to_ymd_hms_milli();
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}
