//! Rule-based field extractors for receipts.
//!
//! Each extractor walks an ordered rule table and stops at the first rule
//! that fires, so the tie-break order between overlapping rules is the
//! table order.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod lines;
pub mod patterns;
pub mod vendor;

pub use amounts::{AmountExtractor, AmountSource, KEYWORD_RULES, format_amount, parse_amount};
pub use dates::{DATE_RULES, DateExtractor, DateRule, ReceiptDate, normalize_date, parse_calendar_date};
pub use items::extract_line_items;
pub use lines::LineSequence;
pub use vendor::{SkipRule, VENDOR_SKIP_RULES, VendorExtractor};

/// Input shared by all extractors: the raw OCR text and its line view.
#[derive(Debug, Clone)]
pub struct ReceiptText<'a> {
    /// Verbatim OCR output.
    pub raw: &'a str,
    /// Trimmed, non-empty lines of `raw`.
    pub lines: LineSequence<'a>,
}

impl<'a> ReceiptText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lines: LineSequence::new(raw),
        }
    }
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, or `None` when no rule fired.
    fn extract(&self, text: &ReceiptText<'_>) -> Option<Self::Output>;
}

/// An extracted value together with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            source: source.into(),
        }
    }
}
