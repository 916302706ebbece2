//! Merge parsed sheets into one trial

use std::collections::{BTreeMap, HashSet};

use crate::config::ImportConfig;
use crate::import::diagnostics::{DiagnosticKind, Diagnostics};
use crate::import::types::{
    AssessmentEntry, AssessmentSnapshot, AssessmentType, ParsedSheet, Reading, SheetDate, Trial,
    TrialMetadata,
};

use super::grid::{TreatmentIndex, build_grid};

/// The sheet whose plots define the grid layout and treatment list.
///
/// Later sheets are assumed to share its block/treatment structure and only
/// contribute assessment values.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSheet<'a>(&'a ParsedSheet);

impl<'a> SchemaSheet<'a> {
    pub fn new(sheet: &'a ParsedSheet) -> Self {
        Self(sheet)
    }

    /// The first data sheet, the default schema
    pub fn first(sheets: &'a [ParsedSheet]) -> Option<Self> {
        sheets.first().map(Self)
    }

    pub fn sheet(&self) -> &'a ParsedSheet {
        self.0
    }
}

/// Unit guessed from an assessment name
pub fn infer_unit(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.contains('%') || lower.contains("percent") {
        "%"
    } else if lower.contains("temp") {
        "°C"
    } else if lower.contains("moisture") || lower.contains("vwc") {
        "%"
    } else {
        ""
    }
}

/// Union of assessment names over all sheets, in first-seen order
pub fn collect_assessment_types(sheets: &[ParsedSheet], config: &ImportConfig) -> Vec<AssessmentType> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut types = Vec::new();

    for name in sheets.iter().flat_map(|s| s.header.assessment_names()) {
        if seen.insert(name) {
            types.push(AssessmentType {
                name: name.to_string(),
                unit: infer_unit(name).to_string(),
                min: config.assessments.default_min,
                max: config.assessments.default_max,
            });
        }
    }

    types
}

/// Build the trial. `dates` holds one entry per sheet, in sheet order.
pub fn assemble_trial(
    schema: SchemaSheet<'_>,
    sheets: &[ParsedSheet],
    dates: Vec<SheetDate>,
    config: &ImportConfig,
    diagnostics: &mut Diagnostics,
) -> Trial {
    let schema_sheet = schema.sheet();
    let prefix = &config.trial.treatment_name_prefix;

    let treatments = TreatmentIndex::build(schema_sheet, prefix);
    let grid = build_grid(schema_sheet, &treatments, prefix, diagnostics);
    let assessment_types = collect_assessment_types(sheets, config);

    let snapshots = sheets
        .iter()
        .zip(&dates)
        .map(|(sheet, date)| {
            build_snapshot(sheet, &date.interpretation.detected, &assessment_types, &treatments, diagnostics)
        })
        .collect();

    let name = if schema_sheet.metadata.trial_name.is_empty() {
        config.trial.default_name.clone()
    } else {
        schema_sheet.metadata.trial_name.clone()
    };

    let metadata = TrialMetadata {
        date: schema_sheet.metadata.date.clone(),
        area: schema_sheet.metadata.area.clone(),
        assessor: schema_sheet.metadata.assessor.clone(),
        notes: schema_sheet.metadata.notes.clone(),
        source_sheets: sheets.iter().map(|s| s.name.clone()).collect(),
    };

    Trial {
        name,
        block_count: grid.blocks.len(),
        treatment_count: treatments.len(),
        treatment_names: treatments.names().to_vec(),
        assessment_types,
        grid,
        snapshots,
        metadata,
        date_interpretations: dates,
    }
}

/// One entry per plot per assessment type, entered or not
fn build_snapshot(
    sheet: &ParsedSheet,
    date: &str,
    assessment_types: &[AssessmentType],
    treatments: &TreatmentIndex,
    diagnostics: &mut Diagnostics,
) -> AssessmentSnapshot {
    // Plot ids are block + treatment; a repeat in a later sheet keeps the first row
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(sheet.records.len());
    for record in &sheet.records {
        if treatments.index_of(record.treatment).is_none() {
            diagnostics.warn(
                DiagnosticKind::UnmappedTreatment,
                &sheet.name,
                Some(record.row),
                format!(
                    "Treatment {} (block {}, plot {}) is not in the first sheet's layout",
                    record.treatment, record.block, record.plot
                ),
            );
        }

        let id = record.plot_id();
        if !seen.insert(id.clone()) {
            diagnostics.warn(
                DiagnosticKind::DuplicatePlotId,
                &sheet.name,
                Some(record.row),
                format!(
                    "Plot {} repeats block {} treatment {} ({}); keeping the first row",
                    record.plot, record.block, record.treatment, id
                ),
            );
            continue;
        }
        kept.push((id, record));
    }

    let mut values = BTreeMap::new();
    for assessment in assessment_types {
        let mut entries = BTreeMap::new();

        for (id, record) in &kept {
            let entry = match record.readings.get(&assessment.name) {
                Some(Reading::Value(value)) => AssessmentEntry::entered(*value),
                Some(Reading::Invalid(raw)) => {
                    diagnostics.warn(
                        DiagnosticKind::InvalidReading,
                        &sheet.name,
                        Some(record.row),
                        format!("'{}' for {} is not a number; treated as not entered", raw, assessment.name),
                    );
                    AssessmentEntry::missing()
                }
                None => AssessmentEntry::missing(),
            };
            entries.insert(id.clone(), entry);
        }

        values.insert(assessment.name.clone(), entries);
    }

    AssessmentSnapshot {
        sheet: sheet.name.clone(),
        date: date.to_string(),
        values,
    }
}
