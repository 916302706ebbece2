//! The normalized trial produced by an import

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::{DateCandidate, DateFormat, SheetDate, format_iso};
use crate::import::error::ImportError;

/// A measured variable recorded per plot per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentType {
    pub name: String,
    /// Unit inferred from the name, empty when unknown
    pub unit: String,
    pub min: f64,
    pub max: f64,
}

/// One plot in the grid layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// Stable identifier, shared with snapshot keys
    pub id: String,
    pub block: u32,
    pub plot: u32,
    pub treatment: u32,
    /// Zero-based position of the treatment in the trial's treatment list
    pub treatment_index: usize,
    pub treatment_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBlock {
    pub block: u32,
    pub cells: Vec<GridCell>,
}

/// Block-ordered physical layout of the trial
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridLayout {
    pub blocks: Vec<GridBlock>,
}

impl GridLayout {
    pub fn plot_count(&self) -> usize {
        self.blocks.iter().map(|b| b.cells.len()).sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.blocks.iter().flat_map(|b| b.cells.iter())
    }

    pub fn find(&self, id: &str) -> Option<&GridCell> {
        self.cells().find(|c| c.id == id)
    }
}

/// A single plot's value for one assessment on one date
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentEntry {
    /// Stringified number, empty when not entered
    pub value: String,
    pub entered: bool,
}

impl AssessmentEntry {
    pub fn entered(value: f64) -> Self {
        Self {
            value: value.to_string(),
            entered: true,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// All assessment values of one sheet, keyed by assessment name then plot id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    pub sheet: String,
    /// Canonical `YYYY-MM-DD`
    pub date: String,
    pub values: BTreeMap<String, BTreeMap<String, AssessmentEntry>>,
}

impl AssessmentSnapshot {
    pub fn entry(&self, assessment: &str, plot_id: &str) -> Option<&AssessmentEntry> {
        self.values.get(assessment)?.get(plot_id)
    }
}

/// Free-form trial metadata, taken from the first data sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrialMetadata {
    pub date: String,
    pub area: String,
    pub assessor: String,
    pub notes: String,
    /// Data sheet names, in import order
    pub source_sheets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub name: String,
    pub block_count: usize,
    pub treatment_count: usize,
    pub treatment_names: Vec<String>,
    pub assessment_types: Vec<AssessmentType>,
    pub grid: GridLayout,
    pub snapshots: Vec<AssessmentSnapshot>,
    pub metadata: TrialMetadata,
    /// Per-sheet date readings for the caller's confirmation step
    pub date_interpretations: Vec<SheetDate>,
}

impl Trial {
    /// Sheet dates that still need a human decision
    pub fn pending_confirmations(&self) -> Vec<&SheetDate> {
        self.date_interpretations
            .iter()
            .filter(|d| d.interpretation.needs_confirmation)
            .collect()
    }

    pub fn assessment_names(&self) -> Vec<&str> {
        self.assessment_types.iter().map(|a| a.name.as_str()).collect()
    }

    /// Return a copy of the trial with `sheet`'s date fixed to `date`.
    ///
    /// The chosen date replaces the detected one and the interpretation no
    /// longer needs confirmation. Picking a date that is not among the
    /// candidates is allowed (e.g. to correct a fallback).
    pub fn with_confirmed_date(mut self, sheet: &str, date: NaiveDate) -> Result<Self, ImportError> {
        let iso = format_iso(date);

        let sheet_date = self
            .date_interpretations
            .iter_mut()
            .find(|d| d.sheet == sheet)
            .ok_or_else(|| ImportError::UnknownSheet(sheet.to_string()))?;

        let interpretation = &mut sheet_date.interpretation;
        interpretation.detected = iso.clone();
        interpretation.needs_confirmation = false;
        if !interpretation.candidates.iter().any(|c| c.iso == iso) {
            interpretation
                .candidates
                .retain(|c| c.format != DateFormat::Fallback);
            interpretation
                .candidates
                .push(DateCandidate::new(DateFormat::Iso, date));
        }

        for snapshot in self.snapshots.iter_mut().filter(|s| s.sheet == sheet) {
            snapshot.date = iso.clone();
        }

        log::info!("Confirmed date {} for sheet '{}'", iso, sheet);
        Ok(self)
    }
}
