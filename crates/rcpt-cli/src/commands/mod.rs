//! Subcommands of the rcpt CLI.

pub mod append;
pub mod batch;
pub mod config;
pub mod parse;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Args;
use tokio::io::AsyncReadExt;
use tracing::debug;

use rcpt_core::{AnnotateResponse, RcptConfig, ReceiptParser};

/// Where receipt text comes from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Receipt text file, or `-` for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Input is an OCR annotate response (JSON) rather than plain text
    #[arg(long)]
    pub vision: bool,

    /// Date to use when the receipt shows none (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,
}

impl InputArgs {
    /// Read the receipt text, decoding an annotate response if asked to.
    pub async fn load_text(&self) -> anyhow::Result<String> {
        let raw = read_input(&self.input).await?;
        if self.vision {
            decode_annotate_response(&raw)
        } else {
            Ok(raw)
        }
    }

    /// Parser for this input, with the caller's notion of today.
    pub fn parser(&self, config: &RcptConfig) -> ReceiptParser {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        ReceiptParser::from_config(&config.parser, today)
    }
}

/// Read a file, or stdin when the path is `-`.
pub async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Pull the full text out of an annotate response body.
pub fn decode_annotate_response(body: &str) -> anyhow::Result<String> {
    let response = AnnotateResponse::from_json(body)?;
    let text = response.full_text()?;
    debug!("Decoded {} characters of OCR text", text.len());
    Ok(text.to_string())
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcpt")
        .join("config.json")
}

/// Load configuration from `--config`, else the default file if present,
/// then apply environment overrides.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    let config = match config_path {
        Some(path) => RcptConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                RcptConfig::from_file(&path)?
            } else {
                RcptConfig::default()
            }
        }
    };

    Ok(config.with_env_overrides())
}
