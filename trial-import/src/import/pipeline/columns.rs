//! Classify header cells into key and assessment columns

use crate::config::HeaderConfig;
use crate::import::error::ImportError;
use crate::import::types::{CellValue, HeaderMap};

/// Build the column layout from the header row.
///
/// Assessment columns are the non-empty, non-marker cells to the right of
/// every key column. Names are kept as written (trimmed); the same name in
/// several sheets is merged later by the assembler.
pub fn map_columns(
    sheet: &str,
    header_row: usize,
    row: &[CellValue],
    config: &HeaderConfig,
) -> Result<HeaderMap, ImportError> {
    let block_marker = config.block_marker.to_lowercase();
    let plot_marker = config.plot_marker.to_lowercase();
    let treatment_marker = config.treatment_marker.to_lowercase();
    let name_marker = config.treatment_name_marker.to_lowercase();

    let mut block_col = None;
    let mut plot_col = None;
    let mut treatment_col = None;
    let mut treatment_name_col = None;
    let mut assessment_cols: Vec<(String, usize)> = Vec::new();

    for (idx, cell) in row.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let lower = cell.as_lower();

        if lower.contains(&block_marker) {
            block_col.get_or_insert(idx);
        } else if lower.contains(&plot_marker) {
            plot_col.get_or_insert(idx);
        } else if lower.contains(&treatment_marker) {
            if !name_marker.is_empty() && lower.contains(&name_marker) {
                treatment_name_col.get_or_insert(idx);
            } else {
                treatment_col.get_or_insert(idx);
            }
        } else if !lower.contains('!') {
            let past_markers = [block_col, plot_col, treatment_col, treatment_name_col]
                .into_iter()
                .flatten()
                .all(|marker| idx > marker);
            if past_markers {
                assessment_cols.push((cell.as_text(), idx));
            }
        }
    }

    let (Some(block_col), Some(plot_col)) = (block_col, plot_col) else {
        return Err(ImportError::HeaderNotFound {
            sheet: sheet.to_string(),
        });
    };
    let treatment_col = treatment_col.ok_or_else(|| ImportError::MissingColumn {
        sheet: sheet.to_string(),
        column: "treatment".to_string(),
    })?;

    // A key column that comes after a value column still bounds the value
    // columns from the left.
    let last_key = block_col
        .max(plot_col)
        .max(treatment_col)
        .max(treatment_name_col.unwrap_or(0));
    assessment_cols.retain(|(_, idx)| *idx > last_key);

    log::debug!(
        "Sheet '{}': block={}, plot={}, treatment={}, {} assessment columns",
        sheet,
        block_col,
        plot_col,
        treatment_col,
        assessment_cols.len()
    );

    Ok(HeaderMap {
        header_row,
        block_col,
        plot_col,
        treatment_col,
        treatment_name_col,
        assessment_cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    fn names(map: &HeaderMap) -> Vec<&str> {
        map.assessment_names().collect()
    }

    #[test]
    fn test_standard_layout() {
        let row = header(&["Block!", "Plot!", "Treatment", " Turf Quality ", "", "Colour"]);
        let map = map_columns("s", 3, &row, &HeaderConfig::default()).unwrap();

        assert_eq!(map.header_row, 3);
        assert_eq!((map.block_col, map.plot_col, map.treatment_col), (0, 1, 2));
        assert_eq!(map.treatment_name_col, None);
        assert_eq!(
            map.assessment_cols,
            vec![("Turf Quality".to_string(), 3), ("Colour".to_string(), 5)]
        );
    }

    #[test]
    fn test_marker_like_cells_are_not_assessments() {
        let row = header(&["Block!", "Plot!", "Trt", "Treatment", "Comment!", "Disease %"]);
        let map = map_columns("s", 0, &row, &HeaderConfig::default()).unwrap();

        assert_eq!(map.treatment_col, 3);
        assert_eq!(names(&map), vec!["Disease %"]);
    }

    #[test]
    fn test_columns_left_of_markers_are_ignored() {
        let row = header(&["Notes", "Block!", "Plot!", "NDVI", "Treatment", "Soil Temp"]);
        let map = map_columns("s", 0, &row, &HeaderConfig::default()).unwrap();

        assert_eq!(names(&map), vec!["Soil Temp"]);
        assert!(map.assessment_cols.iter().all(|(_, c)| *c > map.last_marker_col()));
    }

    #[test]
    fn test_treatment_name_column() {
        let row = header(&["Block!", "Plot!", "Treatment", "Treatment Name", "VWC"]);
        let map = map_columns("s", 0, &row, &HeaderConfig::default()).unwrap();

        assert_eq!(map.treatment_col, 2);
        assert_eq!(map.treatment_name_col, Some(3));
        assert_eq!(map.assessment_cols, vec![("VWC".to_string(), 4)]);
    }

    #[test]
    fn test_missing_treatment_column() {
        let row = header(&["Block!", "Plot!", "Quality"]);
        let err = map_columns("01.03.24", 0, &row, &HeaderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumn {
                sheet: "01.03.24".into(),
                column: "treatment".into()
            }
        );
    }
}
