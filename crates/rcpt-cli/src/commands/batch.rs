//! Batch processing command for multiple receipt text files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use rcpt_core::{COLUMNS, CsvSheet, ReceiptParser, ReceiptRecord};

use super::{decode_annotate_response, load_config, read_input};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of receipt files (.txt text, .json annotate responses)
    #[arg(required = true)]
    input: String,

    /// Append the records to this CSV file (default: print CSV to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Date to use when a receipt shows none (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    record: Option<ReceiptRecord>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "json")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let parser = ReceiptParser::from_config(&config.parser, today);

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_single_file(&path, &parser).await {
            Ok(record) => results.push(FileResult {
                path,
                record: Some(record),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let records: Vec<&ReceiptRecord> = results.iter().filter_map(|r| r.record.as_ref()).collect();
    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output) = &args.output {
        CsvSheet::new(output).append(records.iter().copied())?;
        eprintln!(
            "{} Records written to {}",
            style("✓").green(),
            output.display()
        );
    } else {
        print!("{}", records_csv(&records)?);
    }

    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(records.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(path: &Path, parser: &ReceiptParser) -> anyhow::Result<ReceiptRecord> {
    let raw = read_input(path).await?;

    let text = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => decode_annotate_response(&raw)?,
        _ => raw,
    };

    if text.trim().is_empty() {
        anyhow::bail!("No text in {}", path.display());
    }

    let record = parser.parse(&text);
    debug!("{}: {} {}", path.display(), record.vendor, record.amount);
    Ok(record)
}

fn records_csv(records: &[&ReceiptRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
