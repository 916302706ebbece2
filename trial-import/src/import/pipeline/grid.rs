//! Grid layout from the schema sheet

use std::collections::{BTreeMap, HashSet};

use crate::import::diagnostics::{DiagnosticKind, Diagnostics};
use crate::import::types::{GridBlock, GridCell, GridLayout, ParsedSheet, PlotRecord};

/// Treatment number → zero-based index and display name.
///
/// Built once from the schema sheet and shared read-only by the grid builder
/// and the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentIndex {
    positions: BTreeMap<u32, usize>,
    names: Vec<String>,
}

impl TreatmentIndex {
    /// Index the distinct treatment numbers of `schema`, ascending. Names come
    /// from the sheet's treatment-name column when present, else
    /// `"{prefix} {number}"`.
    pub fn build(schema: &ParsedSheet, prefix: &str) -> Self {
        let numbers = schema.treatment_numbers();

        let positions = numbers
            .iter()
            .enumerate()
            .map(|(idx, number)| (*number, idx))
            .collect();

        let names = numbers
            .iter()
            .map(|number| {
                schema
                    .records
                    .iter()
                    .filter(|r| r.treatment == *number)
                    .find_map(|r| r.treatment_name.clone())
                    .unwrap_or_else(|| default_name(prefix, *number))
            })
            .collect();

        Self { positions, names }
    }

    pub fn index_of(&self, treatment: u32) -> Option<usize> {
        self.positions.get(&treatment).copied()
    }

    pub fn name_of(&self, treatment: u32) -> Option<&str> {
        self.index_of(treatment).map(|idx| self.names[idx].as_str())
    }

    /// Display names in index order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn default_name(prefix: &str, number: u32) -> String {
    format!("{} {}", prefix, number)
}

/// Arrange the schema sheet's plots block by block, plots ascending
pub fn build_grid(
    schema: &ParsedSheet,
    treatments: &TreatmentIndex,
    prefix: &str,
    diagnostics: &mut Diagnostics,
) -> GridLayout {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut blocks = Vec::new();

    for block in schema.block_numbers() {
        let mut records: Vec<&PlotRecord> =
            schema.records.iter().filter(|r| r.block == block).collect();
        records.sort_by_key(|r| r.plot);

        let cells = records
            .into_iter()
            .map(|record| {
                let treatment_index = treatments.index_of(record.treatment).unwrap_or_else(|| {
                    diagnostics.warn(
                        DiagnosticKind::UnmappedTreatment,
                        &schema.name,
                        Some(record.row),
                        format!("Treatment {} has no index; using 0", record.treatment),
                    );
                    0
                });
                let treatment_name = treatments
                    .name_of(record.treatment)
                    .map(str::to_string)
                    .unwrap_or_else(|| default_name(prefix, record.treatment));

                let id = record.plot_id();
                if !seen_ids.insert(id.clone()) {
                    diagnostics.warn(
                        DiagnosticKind::DuplicatePlotId,
                        &schema.name,
                        Some(record.row),
                        format!(
                            "Treatment {} occurs more than once in block {}; plot id '{}' is shared",
                            record.treatment, block, id
                        ),
                    );
                }

                GridCell {
                    id,
                    block,
                    plot: record.plot,
                    treatment: record.treatment,
                    treatment_index,
                    treatment_name,
                }
            })
            .collect();

        blocks.push(GridBlock { block, cells });
    }

    GridLayout { blocks }
}
