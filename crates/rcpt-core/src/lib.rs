//! Core library for receipt OCR text parsing.
//!
//! This crate provides:
//! - Receipt field extraction from OCR text (date, vendor, total, line items)
//! - Receipt records in spreadsheet column order
//! - Decoding of the OCR service's text-detection response
//! - Sheet append requests and a local CSV sheet

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod sheets;

pub use error::{OcrError, RcptError, Result, SheetError};
pub use models::config::{ParserConfig, RcptConfig, SheetConfig};
pub use models::receipt::{COLUMNS, LineItem, ReceiptRecord, RecordEdits};
pub use ocr::AnnotateResponse;
pub use receipt::{ExtractionResult, ReceiptParser, extract_line_items, parse_receipt};
pub use sheets::{AppendRequest, AppendResponse, CsvSheet, append_range, header_range};
