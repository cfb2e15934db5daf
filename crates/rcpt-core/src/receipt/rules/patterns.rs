//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date patterns, in priority order. The date is capture group 1. Numeric
    // dates are fenced by non-digits only, so `Date01/15/2024` still matches.
    pub static ref DATE_MDY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b((?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.? \d{1,2},? \d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"(?:^|\D)(\d{4}[/\-]\d{1,2}[/\-]\d{1,2})(?:\D|$)"
    ).unwrap();

    // Whole-fragment shapes used by the normalizer
    pub static ref NUMERIC_DATE_PARTS: Regex = Regex::new(
        r"^(\d{1,4})[/\-](\d{1,2})[/\-](\d{1,4})$"
    ).unwrap();

    pub static ref MONTH_NAME_PARTS: Regex = Regex::new(
        r"(?i)^([a-z]{3})[a-z]*\.? (\d{1,2}),? (\d{4})$"
    ).unwrap();

    // Vendor skip rule: a number, date or time rather than a name
    pub static ref NUMERIC_LINE: Regex = Regex::new(
        r"^\d+[\d\s/\-:]*$"
    ).unwrap();

    // Currency-like amount: optional $, digits with separators, optional cents
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\$?\s*(\d+[,\d]*\.?\d{0,2})"
    ).unwrap();

    // Item line: description, then a trailing price with cents
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"^(.+?)\s+\$?\s*(\d[,\d]*\.\d{2})$"
    ).unwrap();

    pub static ref NON_ITEM_LABEL: Regex = Regex::new(
        r"(?i)total|subtotal|tax|amount"
    ).unwrap();
}
