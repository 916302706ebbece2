//! Locale-agnostic parsing for date layouts other than `A/B/C`

use chrono::{DateTime, Days, Month, NaiveDate, NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());

static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})$").unwrap());

/// 5 March 2024, 5-Mar-24
static DAY_MONTH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[\s\-/]+([A-Za-z]+)\.?[\s\-/]+(\d{2}|\d{4})$").unwrap());

/// March 5 2024 (commas already removed)
static MONTH_NAME_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})\s+(\d{2}|\d{4})$").unwrap());

static SERIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(\.\d+)?$").unwrap());

/// Spreadsheet serials accepted as bare numbers (1954-10-22 to 2173-10-14)
const SERIAL_RANGE: std::ops::RangeInclusive<f64> = 20_000.0..=100_000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse any recognised non-ambiguous layout
pub fn parse_general(token: &str) -> Option<NaiveDate> {
    let token = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, format) {
            return Some(dt.date());
        }
    }

    if let Some(caps) = YEAR_FIRST.captures(token) {
        return NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }

    if SERIAL.is_match(token) {
        let serial: f64 = token.parse().ok()?;
        if SERIAL_RANGE.contains(&serial) {
            return serial_to_date(serial);
        }
        return None;
    }

    parse_textual(token)
}

/// Dates spelling out the month, with optional weekday and ordinal suffixes
fn parse_textual(token: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL.replace_all(token, "$1").replace(',', " ");
    let mut words: Vec<&str> = cleaned.split_whitespace().collect();

    // "Tuesday 5 March 2024"
    if words
        .first()
        .is_some_and(|w| w.trim_end_matches('.').parse::<Weekday>().is_ok())
    {
        words.remove(0);
    }
    let normalized = words.join(" ");

    if let Some(caps) = DAY_MONTH_NAME.captures(&normalized) {
        return build(&caps[3], &caps[2], &caps[1]);
    }
    if let Some(caps) = MONTH_NAME_DAY.captures(&normalized) {
        return build(&caps[3], &caps[1], &caps[2]);
    }
    None
}

fn build(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let year = if year < 100 { 2000 + year } else { year };
    let month = month.parse::<Month>().ok()?.number_from_month();
    NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
}

/// Convert a spreadsheet serial day number (1900 date system) to a date
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.floor() as u64;
    // Serials below 60 predate the phantom 29 February 1900
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days))
}
