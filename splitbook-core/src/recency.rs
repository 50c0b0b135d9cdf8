//! Loose date parsing and the "latest transaction" tracker.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex"));

static MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}$").expect("valid month/day regex"));

static MONTH_NAME_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3,9}\s+\d{1,2}$").expect("valid month-name regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

// Order matters: chrono's `%Y` accepts one to four digits, so every
// year-first format comes after the day/month-first ones, and `%y` variants
// come before their `%Y` twins.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
];

/// Parse a statement date in any of the common bank export formats.
///
/// Slash dates are month-first; dash and dot dates with a trailing year are
/// day-first. Dates without a year ("1/15", "Jan 15") use `reference_year`.
pub fn parse_instant(text: &str, reference_year: i32) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = ORDINAL_RE.replace_all(trimmed, "$1");
    let cleaned = cleaned.as_ref();

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    if MONTH_DAY_RE.is_match(cleaned) {
        let with_year = format!("{cleaned}/{reference_year}");
        return NaiveDate::parse_from_str(&with_year, "%m/%d/%Y")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    if MONTH_NAME_DAY_RE.is_match(cleaned) {
        let with_year = format!("{cleaned} {reference_year}");
        return ["%b %d %Y", "%B %d %Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&with_year, fmt).ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    None
}

#[derive(Debug, Clone, Copy)]
struct Held {
    index: usize,
    instant: Option<NaiveDateTime>,
}

/// Tracks which transaction (by position) is the most recent.
///
/// The first row always becomes latest. After that a row only takes over when
/// its date parses and is at or after the held one; ties go to the later row.
/// A held row whose own date never parsed yields to any row with a parseable date.
#[derive(Debug, Clone)]
pub struct RecencyTracker {
    reference_year: i32,
    held: Option<Held>,
}

impl RecencyTracker {
    pub fn new(reference_year: i32) -> Self {
        Self {
            reference_year,
            held: None,
        }
    }

    /// Offer the row at `index` with raw `date`. Returns true if it became latest.
    pub fn observe(&mut self, index: usize, date: &str) -> bool {
        let instant = parse_instant(date, self.reference_year);

        let replace = match (&self.held, instant) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(Held { instant: None, .. }), Some(_)) => true,
            (Some(Held { instant: Some(held), .. }), Some(new)) => new >= *held,
        };

        if replace {
            self.held = Some(Held { index, instant });
        }
        replace
    }

    /// Position of the current latest row, if any row has been observed.
    pub fn latest_index(&self) -> Option<usize> {
        self.held.map(|h| h.index)
    }
}
