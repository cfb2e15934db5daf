//! Configuration structures for receipt parsing and sheet output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::receipt::rules::amounts::DEFAULT_AMOUNT_CEILING;
use crate::receipt::rules::vendor::{DEFAULT_MIN_LEN, DEFAULT_SCAN_LINES};

/// Environment variable naming the target spreadsheet.
pub const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";

/// Environment variable naming the target tab.
pub const SHEET_NAME_ENV: &str = "GOOGLE_SHEET_NAME";

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Parser tuning.
    pub parser: ParserConfig,

    /// Spreadsheet target.
    pub sheet: SheetConfig,
}

/// Receipt parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Number of leading lines searched for the vendor name.
    pub vendor_scan_lines: usize,

    /// Minimum vendor name length in characters.
    pub min_vendor_len: usize,

    /// Fallback amounts at or above this are ignored.
    pub amount_ceiling: Decimal,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            vendor_scan_lines: DEFAULT_SCAN_LINES,
            min_vendor_len: DEFAULT_MIN_LEN,
            amount_ceiling: DEFAULT_AMOUNT_CEILING,
        }
    }
}

/// Spreadsheet append configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet identifier.
    pub spreadsheet_id: Option<String>,

    /// Tab the rows are appended to.
    pub sheet_name: String,

    /// How the sheet interprets appended values.
    pub value_input_option: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: "Sheet1".to_string(),
            value_input_option: "USER_ENTERED".to_string(),
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Override the sheet target from `GOOGLE_SHEET_ID` / `GOOGLE_SHEET_NAME`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(id) = lookup(SHEET_ID_ENV).filter(|v| !v.is_empty()) {
            debug!("Spreadsheet id taken from {}", SHEET_ID_ENV);
            self.sheet.spreadsheet_id = Some(id);
        }
        if let Some(name) = lookup(SHEET_NAME_ENV).filter(|v| !v.is_empty()) {
            debug!("Sheet name taken from {}", SHEET_NAME_ENV);
            self.sheet.sheet_name = name;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RcptConfig::default();
        assert_eq!(config.parser.vendor_scan_lines, 5);
        assert_eq!(config.parser.min_vendor_len, 3);
        assert_eq!(config.parser.amount_ceiling, Decimal::from(100_000));
        assert_eq!(config.sheet.sheet_name, "Sheet1");
        assert_eq!(config.sheet.spreadsheet_id, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{"sheet": {"sheet_name": "Receipts"}}"#).unwrap();
        assert_eq!(config.sheet.sheet_name, "Receipts");
        assert_eq!(config.sheet.value_input_option, "USER_ENTERED");
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RcptConfig::default();
        config.parser.vendor_scan_lines = 3;
        config.sheet.spreadsheet_id = Some("abc123".to_string());
        config.save(&path).unwrap();

        assert_eq!(RcptConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = RcptConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_env_overrides() {
        let config = RcptConfig::default().with_overrides_from(|key| match key {
            SHEET_ID_ENV => Some("sheet-42".to_string()),
            SHEET_NAME_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.sheet.spreadsheet_id.as_deref(), Some("sheet-42"));
        assert_eq!(config.sheet.sheet_name, "Sheet1");
    }
}
