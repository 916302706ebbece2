//! Structured diagnostics collected during an import
//!
//! Every stage reports what it skipped or guessed through a [`Diagnostics`]
//! collector. The caller receives the full list alongside the trial; each
//! event is also forwarded to the `log` facade at the matching level.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warning,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    SheetExcluded,
    HeaderFound,
    BlankPlotMarker,
    MissingPlotKey,
    InvalidPlotKey,
    DuplicatePlot,
    InvalidReading,
    DuplicateAssessmentColumn,
    UnmappedTreatment,
    DuplicatePlotId,
    DateFallback,
    DateFromMetadata,
    DateAmbiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub sheet: Option<String>,
    /// 1-based row number, as a spreadsheet user would see it
    pub row: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.sheet, self.row) {
            (Some(sheet), Some(row)) => write!(f, "[{} row {}] {}", sheet, row, self.message),
            (Some(sheet), None) => write!(f, "[{}] {}", sheet, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Per-import diagnostic sink
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event; `row` is zero-based and stored 1-based
    pub fn push(
        &mut self,
        level: DiagnosticLevel,
        kind: DiagnosticKind,
        sheet: Option<&str>,
        row: Option<usize>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            level,
            kind,
            sheet: sheet.map(str::to_string),
            row: row.map(|r| r + 1),
            message: message.into(),
        };

        match level {
            DiagnosticLevel::Debug => log::debug!("{}", diagnostic),
            DiagnosticLevel::Info => log::info!("{}", diagnostic),
            DiagnosticLevel::Warning => log::warn!("{}", diagnostic),
        }

        self.events.push(diagnostic);
    }

    pub fn debug(&mut self, kind: DiagnosticKind, sheet: &str, row: Option<usize>, message: impl Into<String>) {
        self.push(DiagnosticLevel::Debug, kind, Some(sheet), row, message);
    }

    pub fn info(&mut self, kind: DiagnosticKind, sheet: &str, row: Option<usize>, message: impl Into<String>) {
        self.push(DiagnosticLevel::Info, kind, Some(sheet), row, message);
    }

    pub fn warn(&mut self, kind: DiagnosticKind, sheet: &str, row: Option<usize>, message: impl Into<String>) {
        self.push(DiagnosticLevel::Warning, kind, Some(sheet), row, message);
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.events.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_reported_one_based() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(DiagnosticKind::InvalidPlotKey, "01.03.24", Some(4), "bad block");

        let events = diagnostics.into_vec();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].row, Some(5));
        assert_eq!(events[0].to_string(), "[01.03.24 row 5] bad block");
    }

    #[test]
    fn test_count_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.debug(DiagnosticKind::BlankPlotMarker, "s", Some(1), "blank");
        diagnostics.debug(DiagnosticKind::BlankPlotMarker, "s", Some(2), "blank");
        diagnostics.warn(DiagnosticKind::DuplicatePlot, "s", Some(3), "dup");

        assert_eq!(diagnostics.count(DiagnosticKind::BlankPlotMarker), 2);
        assert_eq!(diagnostics.count(DiagnosticKind::DuplicatePlot), 1);
    }
}
