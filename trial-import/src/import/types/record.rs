//! Per-sheet intermediate records: header layout, metadata, plot rows

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Column layout discovered in a sheet's header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMap {
    /// Zero-based index of the header row within the sheet
    pub header_row: usize,
    pub block_col: usize,
    pub plot_col: usize,
    pub treatment_col: usize,
    /// Optional column carrying treatment display names
    pub treatment_name_col: Option<usize>,
    /// Assessment name and column, left to right
    pub assessment_cols: Vec<(String, usize)>,
}

impl HeaderMap {
    /// Rightmost of the block/plot/treatment columns
    pub fn last_marker_col(&self) -> usize {
        self.block_col.max(self.plot_col).max(self.treatment_col)
    }

    pub fn assessment_names(&self) -> impl Iterator<Item = &str> {
        self.assessment_cols.iter().map(|(name, _)| name.as_str())
    }
}

/// Free-form fields found above the header row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub trial_name: String,
    pub date: String,
    pub area: String,
    pub assessor: String,
    pub notes: String,
}

/// A recorded assessment cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Reading {
    /// Numeric value as entered
    Value(f64),
    /// Non-empty cell that did not coerce to a number; raw text kept for reporting
    Invalid(String),
}

impl Reading {
    /// The numeric value, if this is a usable reading
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Invalid(_) => None,
        }
    }
}

/// One plot row of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub block: u32,
    pub plot: u32,
    pub treatment: u32,
    /// Display name from a treatment-name column, when the sheet has one
    pub treatment_name: Option<String>,
    /// Sparse readings keyed by assessment name; absent means not entered
    pub readings: HashMap<String, Reading>,
    /// Zero-based sheet row the record came from
    pub row: usize,
}

impl PlotRecord {
    pub fn new(block: u32, plot: u32, treatment: u32) -> Self {
        Self {
            block,
            plot,
            treatment,
            treatment_name: None,
            readings: HashMap::new(),
            row: 0,
        }
    }

    pub fn with_reading(mut self, name: &str, reading: Reading) -> Self {
        self.readings.insert(name.to_string(), reading);
        self
    }

    /// Stable plot identifier shared by the grid and the snapshots
    pub fn plot_id(&self) -> String {
        plot_id(self.block, self.treatment)
    }
}

/// Build the identifier for a plot from its block and treatment numbers
pub fn plot_id(block: u32, treatment: u32) -> String {
    format!("b{}-t{}", block, treatment)
}

/// Everything extracted from one data sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub name: String,
    pub metadata: SheetMetadata,
    pub header: HeaderMap,
    pub records: Vec<PlotRecord>,
}

impl ParsedSheet {
    /// Distinct treatment numbers, ascending
    pub fn treatment_numbers(&self) -> Vec<u32> {
        let mut treatments: Vec<u32> = self.records.iter().map(|r| r.treatment).collect();
        treatments.sort_unstable();
        treatments.dedup();
        treatments
    }

    /// Distinct block numbers, ascending
    pub fn block_numbers(&self) -> Vec<u32> {
        let mut blocks: Vec<u32> = self.records.iter().map(|r| r.block).collect();
        blocks.sort_unstable();
        blocks.dedup();
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with(records: Vec<PlotRecord>) -> ParsedSheet {
        ParsedSheet {
            name: "01.03.24".to_string(),
            metadata: SheetMetadata::default(),
            header: HeaderMap {
                header_row: 0,
                block_col: 0,
                plot_col: 1,
                treatment_col: 2,
                treatment_name_col: None,
                assessment_cols: vec![],
            },
            records,
        }
    }

    #[test]
    fn test_distinct_numbers_sorted() {
        let sheet = sheet_with(vec![
            PlotRecord::new(2, 4, 3),
            PlotRecord::new(1, 1, 1),
            PlotRecord::new(2, 5, 1),
        ]);
        assert_eq!(sheet.treatment_numbers(), vec![1, 3]);
        assert_eq!(sheet.block_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_plot_id() {
        assert_eq!(PlotRecord::new(2, 7, 3).plot_id(), "b2-t3");
    }
}
