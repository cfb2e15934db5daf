//! Vendor (store name) extraction.

use tracing::debug;

use super::patterns::NUMERIC_LINE;
use super::{ExtractionMatch, FieldExtractor, ReceiptText};

/// Number of leading lines searched for a vendor name.
pub const DEFAULT_SCAN_LINES: usize = 5;

/// Shortest line accepted as a vendor name, in characters.
pub const DEFAULT_MIN_LEN: usize = 3;

/// A rule that rejects a candidate vendor line.
pub struct SkipRule {
    pub name: &'static str,
    pub skips: fn(&str, &VendorExtractor) -> bool,
}

/// Skip rules, checked in order against each candidate line.
pub const VENDOR_SKIP_RULES: [SkipRule; 3] = [
    SkipRule {
        name: "numeric",
        skips: |line, _| NUMERIC_LINE.is_match(line),
    },
    SkipRule {
        name: "no_letters",
        skips: |line, _| !line.chars().any(char::is_alphabetic),
    },
    SkipRule {
        name: "too_short",
        skips: |line, extractor| line.chars().count() < extractor.min_len,
    },
];

/// Vendor field extractor.
#[derive(Debug, Clone)]
pub struct VendorExtractor {
    scan_lines: usize,
    min_len: usize,
}

impl VendorExtractor {
    pub fn new() -> Self {
        Self {
            scan_lines: DEFAULT_SCAN_LINES,
            min_len: DEFAULT_MIN_LEN,
        }
    }

    /// Set how many leading lines are searched.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    /// Set the minimum vendor name length.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    fn skip_reason(&self, line: &str) -> Option<&'static str> {
        VENDOR_SKIP_RULES
            .iter()
            .find(|rule| (rule.skips)(line, self))
            .map(|rule| rule.name)
    }

    /// Vendor name with the first-line fallback applied; empty when the text
    /// has no lines at all.
    pub fn extract_or_first_line(&self, text: &ReceiptText<'_>) -> String {
        self.extract(text)
            .map(|m| m.value)
            .or_else(|| text.lines.first().map(str::to_string))
            .unwrap_or_default()
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    /// The first leading line that survives every skip rule.
    fn extract(&self, text: &ReceiptText<'_>) -> Option<Self::Output> {
        for line in text.lines.iter().take(self.scan_lines) {
            match self.skip_reason(line) {
                Some(reason) => debug!("Vendor candidate {:?} skipped ({})", line, reason),
                None => return Some(ExtractionMatch::new(line.to_string(), "leading_line", line)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(raw: &str) -> String {
        VendorExtractor::new().extract_or_first_line(&ReceiptText::new(raw))
    }

    #[test]
    fn test_first_name_like_line() {
        assert_eq!(vendor("ACME STORE\n123 Main St\n01/15/2024"), "ACME STORE");
    }

    #[test]
    fn test_skips_numbers_dates_and_noise() {
        let text = "01/15/2024 10:42\n*** ---\nAB\n4521\nCorner Cafe\nMilk 2.00";
        assert_eq!(vendor(text), "Corner Cafe");
    }

    #[test]
    fn test_address_line_is_not_numeric() {
        // Starts with digits but carries letters.
        assert_eq!(vendor("12:00\n42 Market Street"), "42 Market Street");
    }

    #[test]
    fn test_only_first_five_lines_are_searched() {
        let text = "1\n2\n3\n4\n5\nLate Name";
        assert_eq!(vendor(text), "1");
    }

    #[test]
    fn test_falls_back_to_first_line() {
        assert_eq!(vendor("##\n12/01/2024\n99"), "##");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(vendor(""), "");
        assert_eq!(vendor("\n  \n"), "");
    }

    #[test]
    fn test_non_ascii_letters_count() {
        assert_eq!(vendor("2024\nCafé Zoë"), "Café Zoë");
    }

    #[test]
    fn test_configurable_window() {
        let extractor = VendorExtractor::new().with_scan_lines(1).with_min_len(2);
        let text = ReceiptText::new("007\nAB");
        assert!(extractor.extract(&text).is_none());

        let extractor = VendorExtractor::new().with_min_len(2);
        assert_eq!(extractor.extract(&text).unwrap().value, "AB");
    }
}
