//! Date interpretation results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a candidate date was read from its token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// Already canonical `YYYY-MM-DD`
    Iso,
    /// Day first
    Uk,
    /// Month first
    Us,
    /// Any other recognised layout
    AutoDetected,
    /// Nothing parsed; today's date substituted
    Fallback,
}

impl DateFormat {
    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::Iso => "ISO",
            DateFormat::Uk => "UK (DD/MM/YYYY)",
            DateFormat::Us => "US (MM/DD/YYYY)",
            DateFormat::AutoDetected => "Auto-detected",
            DateFormat::Fallback => "Fallback",
        }
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One possible reading of a date token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCandidate {
    pub format: DateFormat,
    /// Format label shown to the user
    pub label: String,
    /// Canonical `YYYY-MM-DD`
    pub iso: String,
    /// e.g. "5 March 2024"
    pub display: String,
}

impl DateCandidate {
    pub fn new(format: DateFormat, date: NaiveDate) -> Self {
        Self {
            format,
            label: format.label().to_string(),
            iso: format_iso(date),
            display: format_display(date),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_iso(&self.iso)
    }
}

/// The outcome of interpreting one raw date token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterpretation {
    /// Token exactly as it appeared in the workbook
    pub original: String,
    /// Canonical date used for the snapshot
    pub detected: String,
    pub candidates: Vec<DateCandidate>,
    pub needs_confirmation: bool,
}

impl DateInterpretation {
    /// Detected date as a calendar value
    pub fn detected_date(&self) -> Option<NaiveDate> {
        parse_iso(&self.detected)
    }

    /// True when today's date was substituted for an unparseable token
    pub fn is_fallback(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| c.format == DateFormat::Fallback)
    }

    /// Look up a candidate by its format
    pub fn candidate(&self, format: DateFormat) -> Option<&DateCandidate> {
        self.candidates.iter().find(|c| c.format == format)
    }
}

/// Where a sheet's date token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    SheetName,
    MetadataDate,
}

/// A sheet's date interpretation, reported back for caller review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDate {
    pub sheet: String,
    pub source: DateSource,
    pub interpretation: DateInterpretation,
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
