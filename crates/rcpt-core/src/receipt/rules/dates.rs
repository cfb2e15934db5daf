//! Date extraction for receipts.

use std::fmt;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::{
    DATE_DMY, DATE_MDY, DATE_MONTH_NAME, DATE_YMD, MONTH_NAME_PARTS, NUMERIC_DATE_PARTS,
};
use super::{ExtractionMatch, FieldExtractor, ReceiptText};

/// A named date pattern.
#[derive(Debug)]
pub struct DateRule {
    pub name: &'static str,
    pub pattern: &'static Regex,
}

impl DateRule {
    const fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }
}

lazy_static! {
    /// Date patterns in priority order. The first pattern matching anywhere
    /// in the text wins, so `month_day_year` shadows `day_month_year` for
    /// every slash or hyphen triad with a four-digit year.
    pub static ref DATE_RULES: [DateRule; 4] = [
        DateRule::new("month_day_year", &DATE_MDY),
        DateRule::new("day_month_year", &DATE_DMY),
        DateRule::new("month_name", &DATE_MONTH_NAME),
        DateRule::new("year_month_day", &DATE_YMD),
    ];
}

/// A date as it appears on a receipt record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptDate {
    /// A valid calendar date.
    Calendar(NaiveDate),
    /// A fragment that looked like a date but did not parse; kept verbatim.
    Unparsed(String),
}

impl ReceiptDate {
    /// Normalize a matched fragment.
    pub fn from_fragment(fragment: &str) -> Self {
        match parse_calendar_date(fragment) {
            Some(date) => Self::Calendar(date),
            None => Self::Unparsed(fragment.to_string()),
        }
    }

    pub fn is_calendar(&self) -> bool {
        matches!(self, Self::Calendar(_))
    }
}

impl fmt::Display for ReceiptDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Date field extractor.
#[derive(Debug, Clone)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<ReceiptDate>;

    fn extract(&self, text: &ReceiptText<'_>) -> Option<Self::Output> {
        DATE_RULES.iter().find_map(|rule| {
            let m = rule.pattern.captures(text.raw)?.get(1)?;
            debug!("Date rule {} matched {:?}", rule.name, m.as_str());
            Some(ExtractionMatch::new(
                ReceiptDate::from_fragment(m.as_str()),
                rule.name,
                m.as_str(),
            ))
        })
    }
}

/// Normalize a date fragment to `YYYY-MM-DD`, or return it unchanged when it
/// is not a valid calendar date.
pub fn normalize_date(fragment: &str) -> String {
    ReceiptDate::from_fragment(fragment).to_string()
}

/// Parse the date shapes receipts use: `M/D/Y`, `M-D-Y`, `Y-M-D`, `Y/M/D`
/// and `Month D, Y`.
pub fn parse_calendar_date(fragment: &str) -> Option<NaiveDate> {
    let fragment = fragment.trim();

    if let Some(caps) = NUMERIC_DATE_PARTS.captures(fragment) {
        let (first, second, third) = (&caps[1], &caps[2], &caps[3]);
        return if first.len() == 4 {
            NaiveDate::from_ymd_opt(first.parse().ok()?, second.parse().ok()?, third.parse().ok()?)
        } else if third.len() == 2 || third.len() == 4 {
            NaiveDate::from_ymd_opt(parse_year(third)?, first.parse().ok()?, second.parse().ok()?)
        } else {
            None
        };
    }

    if let Some(caps) = MONTH_NAME_PARTS.captures(fragment) {
        let month = month_to_number(&caps[1])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?);
    }

    None
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        Some(if year <= 50 { 2000 + year } else { 1900 + year })
    } else {
        Some(year)
    }
}

fn month_to_number(prefix: &str) -> Option<u32> {
    let month = match prefix.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
