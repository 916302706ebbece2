//! Tagged spreadsheet cell values

use serde::{Deserialize, Serialize};

/// A single cell as read from a worksheet.
///
/// Workbook cells are loosely typed; everything downstream goes through the
/// coercions on this type rather than comparing raw strings and numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Blank cell (or an error cell)
    #[default]
    Empty,
    /// Numeric cell (integers are widened)
    Number(f64),
    /// Text cell, untrimmed
    Text(String),
}

impl CellValue {
    /// Build a text cell, collapsing whitespace-only text to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    /// Check if this cell carries no content
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Render the cell as trimmed text. Whole numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
        }
    }

    /// Lowercased trimmed text, for marker matching
    pub fn as_lower(&self) -> String {
        self.as_text().to_lowercase()
    }

    /// Best-effort numeric coercion. `None` for empty or non-numeric cells.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => n.is_finite().then_some(*n),
            CellValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
        }
    }

    /// Coerce to a positive whole number (block, plot and treatment cells)
    pub fn as_positive_int(&self) -> Option<u32> {
        let n = self.as_number()?;
        if n.fract() != 0.0 || n < 1.0 || n > u32::MAX as f64 {
            return None;
        }
        Some(n as u32)
    }

    /// Check if the lowercased text contains `needle` (already lowercase)
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            CellValue::Text(s) => s.to_lowercase().contains(needle),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Fetch a cell from a row, treating out-of-range columns as empty
pub fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_text_is_empty() {
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert!(CellValue::Text("  ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_as_text_whole_numbers() {
        assert_eq!(CellValue::Number(3.0).as_text(), "3");
        assert_eq!(CellValue::Number(7.5).as_text(), "7.5");
        assert_eq!(CellValue::Text("  Plot! ".into()).as_text(), "Plot!");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::Text(" 4.25 ".into()).as_number(), Some(4.25));
        assert_eq!(CellValue::Text("n/a".into()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_positive_int_coercion() {
        assert_eq!(CellValue::Number(2.0).as_positive_int(), Some(2));
        assert_eq!(CellValue::Text("12".into()).as_positive_int(), Some(12));
        assert_eq!(CellValue::Number(2.5).as_positive_int(), None);
        assert_eq!(CellValue::Number(0.0).as_positive_int(), None);
        assert_eq!(CellValue::Text("Total".into()).as_positive_int(), None);
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let row = vec![CellValue::from("a")];
        assert_eq!(cell_at(&row, 5), &CellValue::Empty);
    }
}
