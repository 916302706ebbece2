//! Metadata rows above the header

use crate::import::types::{CellValue, SheetMetadata, cell_at};

/// Read labelled fields from the rows above the header.
///
/// The label is the first cell of each row. For a trial name the value is
/// the first non-empty cell after the label; for every other field it is
/// the second cell. A repeated label overwrites the earlier value.
pub fn extract_metadata(rows: &[Vec<CellValue>]) -> SheetMetadata {
    let mut metadata = SheetMetadata::default();

    for row in rows {
        let label = cell_at(row, 0).as_lower();
        if label.is_empty() {
            continue;
        }

        if label.contains("trial name") || label.contains("trial code") {
            metadata.trial_name = row
                .iter()
                .skip(1)
                .find(|c| !c.is_empty())
                .map(CellValue::as_text)
                .unwrap_or_default();
            continue;
        }

        let value = cell_at(row, 1).as_text();
        if label.contains("date") {
            metadata.date = value;
        } else if label.contains("area") {
            metadata.area = value;
        } else if label.contains("assessor") {
            metadata.assessor = value;
        } else if label.contains("notes") {
            metadata.notes = value;
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[CellValue]) -> Vec<CellValue> {
        cells.to_vec()
    }

    #[test]
    fn test_reads_labelled_fields() {
        let rows = vec![
            row(&["Trial Name:".into(), CellValue::Empty, "Fairway Wetting Agent".into()]),
            row(&["Assessment date".into(), "05/03/2024".into()]),
            row(&["Area".into(), "Green 4".into()]),
            row(&["Assessor".into(), "J. Smith".into()]),
            row(&["Notes".into(), "Frost at 7am".into()]),
        ];

        let metadata = extract_metadata(&rows);
        assert_eq!(metadata.trial_name, "Fairway Wetting Agent");
        assert_eq!(metadata.date, "05/03/2024");
        assert_eq!(metadata.area, "Green 4");
        assert_eq!(metadata.assessor, "J. Smith");
        assert_eq!(metadata.notes, "Frost at 7am");
    }

    #[test]
    fn test_last_writer_wins_and_missing_default_empty() {
        let rows = vec![
            row(&["Trial code".into(), "T-001".into()]),
            row(&["Trial code".into(), "T-002".into()]),
            row(&["Date".into(), 45356.0.into()]),
        ];

        let metadata = extract_metadata(&rows);
        assert_eq!(metadata.trial_name, "T-002");
        assert_eq!(metadata.date, "45356");
        assert_eq!(metadata.area, "");
        assert_eq!(metadata.notes, "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_metadata(&[]), SheetMetadata::default());
    }
}
