//! Spreadsheet row output.
//!
//! Rows are appended to columns A through G of a sheet tab, one column per
//! record field in [`COLUMNS`] order. [`AppendRequest`] is the JSON body the
//! spreadsheet service's append call takes; [`CsvSheet`] writes the same rows
//! to a local file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SheetError;
use crate::models::config::SheetConfig;
use crate::models::receipt::{COLUMNS, ReceiptRecord};

const LAST_COLUMN: char = 'G';

/// `<sheet>!A:G`, the range rows are appended to.
pub fn append_range(sheet_name: &str) -> Result<String, SheetError> {
    Ok(format!("{}!A:{}", quote_sheet_name(sheet_name)?, LAST_COLUMN))
}

/// `<sheet>!A1:G1`, the header row.
pub fn header_range(sheet_name: &str) -> Result<String, SheetError> {
    Ok(format!("{}!A1:{}1", quote_sheet_name(sheet_name)?, LAST_COLUMN))
}

/// Quote a tab name for A1 notation when it is not a plain identifier.
fn quote_sheet_name(name: &str) -> Result<String, SheetError> {
    if name.trim().is_empty() || name.contains(['[', ']', '*', '?', '/', '\\', ':']) {
        return Err(SheetError::InvalidRange(name.to_string()));
    }

    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name.to_string())
    } else {
        Ok(format!("'{}'", name.replace('\'', "''")))
    }
}

/// Body of a values append call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest {
    /// Target range, e.g. `Sheet1!A:G`.
    pub range: String,
    /// How the sheet interprets the values, e.g. `USER_ENTERED`.
    #[serde(skip)]
    pub value_input_option: String,
    /// One row per record.
    pub values: Vec<Vec<String>>,
}

impl AppendRequest {
    /// Build an append request for the configured sheet.
    pub fn from_records<'a>(
        config: &SheetConfig,
        records: impl IntoIterator<Item = &'a ReceiptRecord>,
    ) -> Result<Self, SheetError> {
        let values = records
            .into_iter()
            .map(|r| r.to_row().to_vec())
            .collect();

        Ok(Self {
            range: append_range(&config.sheet_name)?,
            value_input_option: config.value_input_option.clone(),
            values,
        })
    }

    /// Query string for the append call.
    pub fn query(&self) -> String {
        format!("valueInputOption={}", self.value_input_option)
    }
}

/// Reply of a values append call.
///
/// Library API for callers that perform the HTTP call themselves; the CLI
/// stops at printing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppendResponse {
    pub spreadsheet_id: String,
    pub updates: AppendUpdates,
}

/// What an append call changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppendUpdates {
    pub updated_range: String,
    pub updated_rows: u32,
}

/// A CSV file standing in for a sheet tab.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append records, writing the header row first if the file is new or
    /// empty. Returns the number of rows written.
    pub fn append<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ReceiptRecord>,
    ) -> crate::Result<usize> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if needs_header {
            debug!("Writing header row to {}", self.path.display());
            writer.write_record(COLUMNS).map_err(SheetError::from)?;
        }

        let mut rows = 0;
        for record in records {
            writer.write_record(record.to_row()).map_err(SheetError::from)?;
            rows += 1;
        }
        writer.flush()?;

        info!("Appended {} rows to {}", rows, self.path.display());
        Ok(rows)
    }

    /// Read every record back, skipping the header row.
    pub fn records(&self) -> crate::Result<Vec<ReceiptRecord>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(SheetError::from)?;
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row.map_err(SheetError::from)?;
            let field = |i: usize| row.get(i).unwrap_or_default().to_string();
            records.push(ReceiptRecord {
                date: field(0),
                vendor: field(1),
                category: field(2),
                description: field(3),
                amount: field(4),
                payment_method: field(5),
                receipt: field(6),
            });
        }

        Ok(records)
    }
}
