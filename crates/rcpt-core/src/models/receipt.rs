//! Receipt data models exchanged with the OCR and spreadsheet collaborators.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column names, in the order rows are written to the sheet.
pub const COLUMNS: [&str; 7] = [
    "date",
    "vendor",
    "category",
    "description",
    "amount",
    "paymentMethod",
    "receipt",
];

/// A parsed receipt, ready for user edits and a sheet append.
///
/// Every field is a plain string because the user may overwrite any of them
/// with free text before the row is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptRecord {
    /// `YYYY-MM-DD`, or the date fragment as printed when it did not parse.
    pub date: String,

    /// Store or merchant name.
    pub vendor: String,

    /// Expense category (user supplied).
    pub category: String,

    /// Free-form note (user supplied).
    pub description: String,

    /// Total with two fraction digits, or empty when none was found.
    pub amount: String,

    /// Card, cash, etc. (user supplied).
    pub payment_method: String,

    /// The OCR text the record was parsed from.
    pub receipt: String,
}

impl ReceiptRecord {
    /// The record as a sheet row, in [`COLUMNS`] order.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.date.clone(),
            self.vendor.clone(),
            self.category.clone(),
            self.description.clone(),
            self.amount.clone(),
            self.payment_method.clone(),
            self.receipt.clone(),
        ]
    }

    /// Amount as a number, when it parses.
    pub fn amount_value(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }

    /// Apply user edits, returning the edited record.
    pub fn apply(mut self, edits: RecordEdits) -> Self {
        let RecordEdits {
            date,
            vendor,
            category,
            description,
            amount,
            payment_method,
        } = edits;

        if let Some(date) = date {
            self.date = date;
        }
        if let Some(vendor) = vendor {
            self.vendor = vendor;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(payment_method) = payment_method {
            self.payment_method = payment_method;
        }
        self
    }
}

/// User overrides for the editable fields of a [`ReceiptRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordEdits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl RecordEdits {
    /// True when no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A purchased item: a line ending in a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Text before the price.
    pub description: String,

    /// Price with two fraction digits.
    pub price: String,
}
