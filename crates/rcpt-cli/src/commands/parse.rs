//! Parse command - extract a record from a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info, warn};

use rcpt_core::receipt::ExtractionResult;
use rcpt_core::{COLUMNS, LineItem, ReceiptRecord};

use super::{InputArgs, load_config};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include priced line items
    #[arg(long)]
    items: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// JSON shape of a parsed receipt.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParsedReceipt<'a> {
    #[serde(flatten)]
    record: &'a ReceiptRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_items: Option<&'a [LineItem]>,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing {}", args.input.input.display());

    let text = args.input.load_text().await?;
    let result = args.input.parser(&config).parse_detailed(&text);

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    let output = format_result(&result, args.format, args.items)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    items: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let parsed = ParsedReceipt {
                record: &result.record,
                line_items: items.then_some(result.line_items.as_slice()),
            };
            Ok(serde_json::to_string_pretty(&parsed)?)
        }
        OutputFormat::Csv => format_csv(&result.record),
        OutputFormat::Text => Ok(format_text(result, items)),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    wtr.write_record(record.to_row())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, items: bool) -> String {
    let record = &result.record;
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", record.vendor));
    output.push_str(&format!("Date:   {}\n", record.date));
    if record.amount.is_empty() {
        output.push_str("Total:  (not found)\n");
    } else {
        output.push_str(&format!("Total:  {}\n", record.amount));
    }

    if items && !result.line_items.is_empty() {
        output.push_str("\nItems:\n");
        for item in &result.line_items {
            output.push_str(&format!("  {:<32} {:>10}\n", item.description, item.price));
        }
    }

    output
}
