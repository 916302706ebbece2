//! Date interpretation engine
//!
//! Turns a raw date token (a sheet name such as `05/03/2024`, or a metadata
//! cell) into a canonical date plus every plausible alternative reading.
//! Ambiguous day/month orderings are never resolved silently: both readings
//! are returned and the interpretation is flagged for confirmation. The
//! default pick is the day-first (UK) reading.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::general::parse_general;
use crate::import::types::{DateCandidate, DateFormat, DateInterpretation, format_iso, parse_iso};

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// `A<sep>B<sep>C` with A, B of 1-2 digits and C of 2 or 4 digits
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{2}|\d{4})$").unwrap());

/// Interprets date tokens relative to a fixed "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterpreter {
    today: NaiveDate,
}

impl Default for DateInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl DateInterpreter {
    /// Interpreter using the local calendar date
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    /// Interpreter with an explicit "today", used for empty and unparseable tokens
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn interpret(&self, token: &str) -> DateInterpretation {
        let trimmed = token.trim();

        if trimmed.is_empty() {
            return DateInterpretation {
                original: token.to_string(),
                detected: format_iso(self.today),
                candidates: Vec::new(),
                needs_confirmation: false,
            };
        }

        if ISO_DATE.is_match(trimmed) {
            if let Some(date) = parse_iso(trimmed) {
                return single(token, DateFormat::Iso, date);
            }
            log::debug!("'{}' looks like ISO but is not a real date", trimmed);
        }

        if let Some(interpretation) = interpret_day_month(token, trimmed) {
            return interpretation;
        }

        if let Some(date) = parse_general(trimmed) {
            return single(token, DateFormat::AutoDetected, date);
        }

        log::warn!("Could not parse date '{}', substituting {}", token, self.today);
        DateInterpretation {
            original: token.to_string(),
            detected: format_iso(self.today),
            candidates: vec![DateCandidate::new(DateFormat::Fallback, self.today)],
            needs_confirmation: true,
        }
    }
}

fn single(token: &str, format: DateFormat, date: NaiveDate) -> DateInterpretation {
    DateInterpretation {
        original: token.to_string(),
        detected: format_iso(date),
        candidates: vec![DateCandidate::new(format, date)],
        needs_confirmation: false,
    }
}

/// Day/month reading of a numeric token. `None` if the token does not match
/// or neither ordering names a real calendar date.
fn interpret_day_month(token: &str, trimmed: &str) -> Option<DateInterpretation> {
    let caps = NUMERIC_DATE.captures(trimmed)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    // Fixed window: two-digit years always land in 2000-2099
    let year = if year < 100 { 2000 + year } else { year };

    // from_ymd_opt rejects impossible dates (31 April, 29 February in
    // non-leap years) rather than rolling them into the next month.
    let uk = NaiveDate::from_ymd_opt(year, second, first);
    let us = NaiveDate::from_ymd_opt(year, first, second);

    let mut candidates = Vec::with_capacity(2);
    if let Some(date) = uk {
        candidates.push(DateCandidate::new(DateFormat::Uk, date));
    }
    if let Some(date) = us {
        if uk != Some(date) {
            candidates.push(DateCandidate::new(DateFormat::Us, date));
        }
    }

    let detected = candidates.first()?.iso.clone();
    let needs_confirmation = candidates.len() > 1;
    if needs_confirmation {
        log::debug!(
            "Ambiguous date '{}': {} or {}",
            trimmed,
            candidates[0].iso,
            candidates[1].iso
        );
    }

    Some(DateInterpretation {
        original: token.to_string(),
        detected,
        candidates,
        needs_confirmation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> DateInterpreter {
        DateInterpreter::with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    fn isos(interpretation: &DateInterpretation) -> Vec<&str> {
        interpretation
            .candidates
            .iter()
            .map(|c| c.iso.as_str())
            .collect()
    }

    #[test]
    fn test_empty_token_uses_today_without_confirmation() {
        let result = interpreter().interpret("   ");
        assert_eq!(result.detected, "2025-06-01");
        assert!(result.candidates.is_empty());
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_iso_round_trip() {
        for token in ["2024-03-05", "1999-12-31", "2024-02-29"] {
            let result = interpreter().interpret(token);
            assert_eq!(result.detected, token);
            assert!(!result.needs_confirmation);
            assert_eq!(result.candidates.len(), 1);
            assert_eq!(result.candidates[0].format, DateFormat::Iso);
            assert_eq!(result.candidates[0].label, "ISO");
        }
    }

    #[test]
    fn test_ambiguous_day_month() {
        let result = interpreter().interpret("05/03/2024");
        assert_eq!(isos(&result), vec!["2024-03-05", "2024-05-03"]);
        assert_eq!(result.candidates[0].format, DateFormat::Uk);
        assert_eq!(result.candidates[1].format, DateFormat::Us);
        assert_eq!(result.detected, "2024-03-05");
        assert!(result.needs_confirmation);
    }

    #[test]
    fn test_unambiguous_day_first() {
        let result = interpreter().interpret("25/03/2024");
        assert_eq!(isos(&result), vec!["2024-03-25"]);
        assert_eq!(result.candidates[0].format, DateFormat::Uk);
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_only_month_first_valid() {
        let result = interpreter().interpret("03/25/2024");
        assert_eq!(isos(&result), vec!["2024-03-25"]);
        assert_eq!(result.candidates[0].format, DateFormat::Us);
        assert_eq!(result.detected, "2024-03-25");
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_two_digit_year() {
        let short = interpreter().interpret("03.05.24");
        let long = interpreter().interpret("03.05.2024");
        assert_eq!(short.detected, "2024-05-03");
        assert_eq!(isos(&short), isos(&long));
        assert!(short.needs_confirmation);
    }

    #[test]
    fn test_same_day_and_month_is_not_ambiguous() {
        let result = interpreter().interpret("04-04-2024");
        assert_eq!(isos(&result), vec!["2024-04-04"]);
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_impossible_dates_do_not_roll_over() {
        // 31 April does not exist and 31 is not a month
        let result = interpreter().interpret("31/04/2024");
        assert!(!isos(&result).contains(&"2024-05-01"));
        assert_eq!(result.candidates[0].format, DateFormat::Fallback);

        let result = interpreter().interpret("29/02/2023");
        assert_eq!(result.candidates[0].format, DateFormat::Fallback);
        assert!(result.needs_confirmation);

        let result = interpreter().interpret("29/02/2024");
        assert_eq!(isos(&result), vec!["2024-02-29"]);
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_textual_dates_are_auto_detected() {
        let result = interpreter().interpret("5 March 2024");
        assert_eq!(result.detected, "2024-03-05");
        assert_eq!(result.candidates[0].format, DateFormat::AutoDetected);
        assert!(!result.needs_confirmation);
    }

    #[test]
    fn test_fallback() {
        let result = interpreter().interpret("not a date");
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].format, DateFormat::Fallback);
        assert_eq!(result.candidates[0].iso, "2025-06-01");
        assert_eq!(result.detected, "2025-06-01");
        assert!(result.needs_confirmation);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_invalid_iso_does_not_pass_through() {
        let result = interpreter().interpret("2024-13-45");
        assert_ne!(result.detected, "2024-13-45");
        assert!(result.needs_confirmation);
    }

    #[test]
    fn test_original_token_is_kept_verbatim() {
        let result = interpreter().interpret(" 01.03.24 ");
        assert_eq!(result.original, " 01.03.24 ");
        assert_eq!(result.detected, "2024-03-01");
    }
}
