//! Line item extraction: lines that end in a price.

use crate::models::receipt::LineItem;

use super::amounts::{format_amount, parse_amount};
use super::lines::LineSequence;
use super::patterns::{LINE_ITEM, NON_ITEM_LABEL};

/// Extract `description  $price` lines, skipping totals, subtotals and tax.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    LineSequence::new(text)
        .iter()
        .filter_map(|line| {
            let caps = LINE_ITEM.captures(line)?;
            let description = caps[1].trim();
            if NON_ITEM_LABEL.is_match(description) {
                return None;
            }
            let price = parse_amount(&caps[2])?;
            Some(LineItem {
                description: description.to_string(),
                price: format_amount(price),
            })
        })
        .collect()
}
