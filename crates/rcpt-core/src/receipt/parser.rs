//! Receipt parser assembling the field extractors into a record.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ParserConfig;
use crate::models::receipt::{LineItem, ReceiptRecord};

use super::rules::{
    AmountExtractor, AmountSource, DateExtractor, FieldExtractor, ReceiptText, VendorExtractor,
    extract_line_items, format_amount,
};

/// Result of receipt extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Parsed record.
    pub record: ReceiptRecord,
    /// Priced lines other than totals and tax.
    pub line_items: Vec<LineItem>,
    /// How the total was found, if it was.
    pub amount_source: Option<AmountSource>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based receipt parser.
///
/// `today` stands in for the receipt date when the text has none, so the
/// same text and the same `today` always give the same record.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    today: NaiveDate,
    dates: DateExtractor,
    vendor: VendorExtractor,
    amounts: AmountExtractor,
}

impl ReceiptParser {
    /// Create a parser with default settings.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            dates: DateExtractor::new(),
            vendor: VendorExtractor::new(),
            amounts: AmountExtractor::new(),
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ParserConfig, today: NaiveDate) -> Self {
        Self::new(today)
            .with_vendor_scan_lines(config.vendor_scan_lines)
            .with_min_vendor_len(config.min_vendor_len)
            .with_amount_ceiling(config.amount_ceiling)
    }

    /// Set how many leading lines are searched for the vendor.
    pub fn with_vendor_scan_lines(mut self, lines: usize) -> Self {
        self.vendor = self.vendor.with_scan_lines(lines);
        self
    }

    /// Set the minimum vendor name length.
    pub fn with_min_vendor_len(mut self, len: usize) -> Self {
        self.vendor = self.vendor.with_min_len(len);
        self
    }

    /// Set the fallback amount ceiling.
    pub fn with_amount_ceiling(mut self, ceiling: Decimal) -> Self {
        self.amounts = self.amounts.with_ceiling(ceiling);
        self
    }

    /// The date used when the text has none.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Parse OCR text into a record.
    pub fn parse(&self, text: &str) -> ReceiptRecord {
        self.parse_detailed(text).record
    }

    /// Parse OCR text into a record plus line items and warnings.
    pub fn parse_detailed(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let receipt = ReceiptText::new(text);

        let date = match self.dates.extract(&receipt) {
            Some(found) => {
                if !found.value.is_calendar() {
                    warnings.push(format!("Date {:?} is not a valid calendar date", found.source));
                }
                found.value.to_string()
            }
            None => {
                warnings.push(format!("No date found, using {}", self.today));
                self.today.format("%Y-%m-%d").to_string()
            }
        };

        let vendor = self.vendor.extract_or_first_line(&receipt);
        if vendor.is_empty() {
            warnings.push("Could not extract vendor".to_string());
        }

        let (amount, amount_source) = match self.amounts.extract(&receipt) {
            Some((found, source)) => (format_amount(found.value), Some(source)),
            None => {
                warnings.push("Could not extract total amount".to_string());
                (String::new(), None)
            }
        };

        let record = ReceiptRecord {
            date,
            vendor,
            category: String::new(),
            description: String::new(),
            amount,
            payment_method: String::new(),
            receipt: text.to_string(),
        };

        let line_items = extract_line_items(text);

        debug!(
            "Extracted receipt from {:?}: date {}, amount {:?}, {} line items",
            record.vendor,
            record.date,
            record.amount,
            line_items.len()
        );

        ExtractionResult {
            record,
            line_items,
            amount_source,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Parse OCR text with default settings.
pub fn parse_receipt(text: &str, today: NaiveDate) -> ReceiptRecord {
    ReceiptParser::new(today).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_parse_basic_receipt() {
        let text = "ACME STORE\n123 Main St\n01/15/2024\nTotal $9.99";
        let record = parse_receipt(text, today());

        assert_eq!(
            record,
            ReceiptRecord {
                date: "2024-01-15".to_string(),
                vendor: "ACME STORE".to_string(),
                category: String::new(),
                description: String::new(),
                amount: "9.99".to_string(),
                payment_method: String::new(),
                receipt: text.to_string(),
            }
        );
    }

    #[test]
    fn test_parse_empty_text() {
        let result = ReceiptParser::new(today()).parse_detailed("");

        assert_eq!(
            result.record,
            ReceiptRecord {
                date: "2026-10-18".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(result.amount_source, None);
        assert!(result.line_items.is_empty());
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_parse_full_receipt() {
        let text = r#"
            BLUE BOTTLE COFFEE
            66 Mint St, San Francisco
            Mar 4, 2024   08:15 AM

            Latte                $5.25
            Croissant            $4.50
            Subtotal             $9.75
            Tax                  $0.83
            Total                $10.58
            VISA ****1234        $10.58
        "#;

        let result = ReceiptParser::new(today()).parse_detailed(text);

        assert_eq!(result.record.vendor, "BLUE BOTTLE COFFEE");
        assert_eq!(result.record.date, "2024-03-04");
        // "Subtotal" is the first line carrying a total keyword.
        assert_eq!(result.record.amount, "9.75");
        assert_eq!(result.amount_source, Some(AmountSource::Keyword));
        assert_eq!(result.record.receipt, text);
        assert_eq!(
            result.line_items,
            vec![
                LineItem { description: "Latte".to_string(), price: "5.25".to_string() },
                LineItem { description: "Croissant".to_string(), price: "4.50".to_string() },
                LineItem { description: "VISA ****1234".to_string(), price: "10.58".to_string() },
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_fallback_amount_and_unparsed_date() {
        let text = "Hardware Depot\n13/45/2023\nPaint 12.50\nLadder 340.00";
        let result = ReceiptParser::new(today()).parse_detailed(text);

        assert_eq!(result.record.date, "13/45/2023");
        assert_eq!(result.record.amount, "340.00");
        assert_eq!(result.amount_source, Some(AmountSource::Largest));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_date_glued_to_label_is_not_replaced_by_today() {
        for text in ["Deli\nDate01/15/2024", "Deli\n01/15/2024PM", "Deli\nVisit_01/15/2024"] {
            assert_eq!(parse_receipt(text, today()).date, "2024-01-15", "{text}");
        }
    }

    #[test]
    fn test_no_digits_means_no_amount() {
        let record = parse_receipt("Thank you\nPlease come again", today());
        assert_eq!(record.amount, "");
        assert_eq!(record.vendor, "Thank you");
        assert_eq!(record.date, "2026-10-18");
    }

    #[test]
    fn test_configured_parser() {
        let config = ParserConfig {
            vendor_scan_lines: 1,
            min_vendor_len: 3,
            amount_ceiling: Decimal::from(50),
        };
        let parser = ReceiptParser::from_config(&config, today());
        let record = parser.parse("2024\nDeli\nSoup 7.00\nCatering 400.00");

        assert_eq!(record.vendor, "2024");
        assert_eq!(record.amount, "7.00");
        assert_eq!(parser.today(), today());
    }

    #[test]
    fn test_amount_invariant_holds_for_noisy_text() {
        let inputs = [
            "",
            "$",
            "Total: $",
            "TOTAL 1,2,3",
            "amount 007",
            "~~~\n\n\t\n",
            "Sum 99999.999",
            "1.\n2.\n3.",
        ];
        for text in inputs {
            let record = parse_receipt(text, today());
            if !record.amount.is_empty() {
                let (_, fraction) = record.amount.split_once('.').unwrap();
                assert_eq!(fraction.len(), 2, "amount {:?} for {:?}", record.amount, text);
                assert!(record.amount_value().unwrap() >= Decimal::ZERO);
            }
            assert_eq!(record.receipt, text);
        }
    }
}
