//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, ReceiptParser, parse_receipt};
pub use rules::extract_line_items;
