//! Total amount extraction for receipts.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor, ReceiptText};

/// Labels that mark a line as carrying the receipt total. Checked in this
/// order for each line; the first label found names the match.
pub const KEYWORD_RULES: [&str; 6] = [
    "total",
    "amount due",
    "balance",
    "grand total",
    "amount",
    "sum",
];

/// Amounts at or above this are treated as OCR misreads in the fallback scan.
pub const DEFAULT_AMOUNT_CEILING: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// How the total was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    /// First amount on the first keyword-bearing line.
    Keyword,
    /// Largest plausible amount anywhere on the receipt.
    Largest,
}

/// Total amount extractor.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    ceiling: Decimal,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            ceiling: DEFAULT_AMOUNT_CEILING,
        }
    }

    /// Set the fallback sanity ceiling.
    pub fn with_ceiling(mut self, ceiling: Decimal) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Phase one: the first line holding a total keyword and an amount.
    pub fn keyword_amount(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<Decimal>> {
        text.lines.iter().find_map(|line| {
            let lower = line.to_lowercase();
            let keyword = KEYWORD_RULES.iter().find(|k| lower.contains(*k))?;
            let amount = first_amount(line)?;
            debug!("Keyword {:?} anchored amount {} on {:?}", keyword, amount, line);
            Some(ExtractionMatch::new(amount, "keyword", line))
        })
    }

    /// Phase two: the largest amount below the ceiling, if positive.
    pub fn largest_amount(&self, text: &ReceiptText<'_>) -> Option<ExtractionMatch<Decimal>> {
        let mut best: Option<ExtractionMatch<Decimal>> = None;

        for line in text.lines.iter() {
            let Some(amount) = first_amount(line) else {
                continue;
            };
            if amount >= self.ceiling {
                debug!("Discarding implausible amount {} on {:?}", amount, line);
                continue;
            }
            if best.as_ref().is_none_or(|b| amount > b.value) {
                best = Some(ExtractionMatch::new(amount, "largest", line));
            }
        }

        best.filter(|b| b.value > Decimal::ZERO)
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = (ExtractionMatch<Decimal>, AmountSource);

    fn extract(&self, text: &ReceiptText<'_>) -> Option<Self::Output> {
        if let Some(found) = self.keyword_amount(text) {
            return Some((found, AmountSource::Keyword));
        }
        self.largest_amount(text).map(|found| (found, AmountSource::Largest))
    }
}

/// The first currency-like amount on a line.
fn first_amount(line: &str) -> Option<Decimal> {
    AMOUNT_PATTERN
        .captures(line)
        .and_then(|caps| parse_amount(&caps[1]))
}

/// Parse an amount such as `1,234.56`, `$ 45` or `12.5`, ignoring thousands
/// separators and whitespace.
///
/// Amounts are `Decimal`s: values with more than 28 significant digits are
/// rounded to fit, and integer parts beyond `Decimal::MAX` yield `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() {
        return None;
    }

    match Decimal::from_str(cleaned) {
        Ok(amount) => Some(amount),
        Err(e) => {
            debug!("Unparseable amount {:?}: {}", cleaned, e);
            None
        }
    }
}

/// Format an amount with exactly two fraction digits.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
