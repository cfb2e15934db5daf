//! Append command - parse a receipt, apply edits, and hand the row to a sheet.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use rcpt_core::{AppendRequest, COLUMNS, CsvSheet, RecordEdits, header_range};

use super::{InputArgs, load_config};

/// Arguments for the append command.
#[derive(Args)]
pub struct AppendArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Append to this CSV file (created with a header row if missing)
    #[arg(long, value_name = "FILE", conflicts_with = "request")]
    sheet: Option<PathBuf>,

    /// Print the spreadsheet append request instead of writing a file
    #[arg(long)]
    request: bool,

    #[command(flatten)]
    edits: EditArgs,
}

/// User overrides for the parsed fields.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Replace the parsed date
    #[arg(long)]
    date: Option<String>,

    /// Replace the parsed vendor
    #[arg(long)]
    vendor: Option<String>,

    /// Expense category
    #[arg(long)]
    category: Option<String>,

    /// Free-form description
    #[arg(long)]
    description: Option<String>,

    /// Replace the parsed total
    #[arg(long)]
    amount: Option<String>,

    /// Payment method (card, cash, ...)
    #[arg(long)]
    payment_method: Option<String>,
}

impl From<EditArgs> for RecordEdits {
    fn from(args: EditArgs) -> Self {
        Self {
            date: args.date,
            vendor: args.vendor,
            category: args.category,
            description: args.description,
            amount: args.amount,
            payment_method: args.payment_method,
        }
    }
}

pub async fn run(args: AppendArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if args.sheet.is_none() && !args.request {
        anyhow::bail!("Nothing to append to. Use --sheet <FILE> or --request.");
    }

    let config = load_config(config_path)?;
    let text = args.input.load_text().await?;
    let result = args.input.parser(&config).parse_detailed(&text);

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    let edits = RecordEdits::from(args.edits);
    if !edits.is_empty() {
        info!("Applying user edits: {:?}", edits);
    }
    let record = result.record.apply(edits);

    if let Some(path) = &args.sheet {
        let sheet = CsvSheet::new(path);
        sheet.append([&record])?;
        eprintln!(
            "{} Appended {} {} to {}",
            style("✓").green(),
            record.vendor,
            record.amount,
            path.display()
        );
        return Ok(());
    }

    let request = AppendRequest::from_records(&config.sheet, [&record])?;
    let call = serde_json::json!({
        "spreadsheetId": config.sheet.spreadsheet_id,
        "headerRange": header_range(&config.sheet.sheet_name)?,
        "header": COLUMNS,
        "range": request.range,
        "valueInputOption": request.value_input_option,
        "body": { "values": request.values },
    });

    if config.sheet.spreadsheet_id.is_none() {
        eprintln!(
            "{} No spreadsheet id configured (set {} or sheet.spreadsheet_id)",
            style("ℹ").blue(),
            rcpt_core::models::config::SHEET_ID_ENV
        );
    }

    println!("{}", serde_json::to_string_pretty(&call)?);

    Ok(())
}
