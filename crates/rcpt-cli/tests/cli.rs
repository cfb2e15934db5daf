use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "ACME STORE\n123 Main St\n01/15/2024\nSoap 3.50\nTotal $9.99\n";

/// `rcpt` isolated from the user's config directory and sheet env vars.
fn rcpt(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rcpt").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("GOOGLE_SHEET_ID")
        .env_remove("GOOGLE_SHEET_NAME");
    cmd
}

fn write_receipt(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn parse_prints_json_record() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "acme.txt", RECEIPT);

    let output = rcpt(dir.path())
        .args(["parse", "--today", "2026-10-18"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["date"], "2024-01-15");
    assert_eq!(value["vendor"], "ACME STORE");
    assert_eq!(value["amount"], "9.99");
    assert_eq!(value["category"], "");
    assert_eq!(value["receipt"], RECEIPT);
}

#[test]
fn parse_reads_stdin_and_defaults_date() {
    let dir = TempDir::new().unwrap();

    let output = rcpt(dir.path())
        .args(["parse", "-", "--today", "2026-10-18"])
        .write_stdin("")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "date": "2026-10-18",
            "vendor": "",
            "category": "",
            "description": "",
            "amount": "",
            "paymentMethod": "",
            "receipt": "",
        })
    );
}

#[test]
fn parse_text_format_with_items() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "acme.txt", RECEIPT);

    rcpt(dir.path())
        .args(["parse", "--format", "text", "--items"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor: ACME STORE"))
        .stdout(predicate::str::contains("Soap"));
}

#[test]
fn parse_annotate_response() {
    let dir = TempDir::new().unwrap();
    let body = serde_json::json!({
        "responses": [{"textAnnotations": [{"description": RECEIPT}, {"description": "ACME"}]}]
    });
    let input = write_receipt(&dir, "vision.json", &body.to_string());

    rcpt(dir.path())
        .args(["parse", "--vision", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "date,vendor,category,description,amount,paymentMethod,receipt\n2024-01-15,ACME STORE,,,9.99,,",
        ));
}

#[test]
fn parse_annotate_response_without_text_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "vision.json", r#"{"responses": [{}]}"#);

    rcpt(dir.path())
        .args(["parse", "--vision"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text detected"));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    rcpt(dir.path())
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn append_to_csv_sheet_with_edits() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "acme.txt", RECEIPT);
    let sheet = dir.path().join("sheet.csv");

    for category in ["Office", "Travel"] {
        rcpt(dir.path())
            .args(["append", "--category", category, "--payment-method", "Visa", "--sheet"])
            .arg(&sheet)
            .arg(&input)
            .assert()
            .success();
    }

    let mut reader = csv::Reader::from_path(&sheet).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["date", "vendor", "category", "description", "amount", "paymentMethod", "receipt"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "Office");
    assert_eq!(&rows[1][2], "Travel");
    assert_eq!(&rows[1][4], "9.99");
    assert_eq!(&rows[1][5], "Visa");
    assert_eq!(&rows[1][6], RECEIPT);
}

#[test]
fn append_request_uses_configured_sheet() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "acme.txt", RECEIPT);

    let output = rcpt(dir.path())
        .env("GOOGLE_SHEET_ID", "sheet-123")
        .env("GOOGLE_SHEET_NAME", "Receipts")
        .args(["append", "--request", "--amount", "10.00"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["spreadsheetId"], "sheet-123");
    assert_eq!(value["range"], "Receipts!A:G");
    assert_eq!(value["headerRange"], "Receipts!A1:G1");
    assert_eq!(value["header"][5], "paymentMethod");
    assert_eq!(value["valueInputOption"], "USER_ENTERED");
    assert_eq!(value["body"]["values"][0][1], "ACME STORE");
    assert_eq!(value["body"]["values"][0][4], "10.00");
}

#[test]
fn append_needs_a_target() {
    let dir = TempDir::new().unwrap();
    let input = write_receipt(&dir, "acme.txt", RECEIPT);

    rcpt(dir.path())
        .arg("append")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sheet"));
}

#[test]
fn batch_writes_one_row_per_file() {
    let dir = TempDir::new().unwrap();
    write_receipt(&dir, "a.txt", RECEIPT);
    write_receipt(&dir, "b.txt", "Corner Cafe\nLatte 4.50\nMuffin 3.25\n");
    write_receipt(&dir, "notes.md", "ignored");
    let out = dir.path().join("all.csv");

    rcpt(dir.path())
        .args(["batch", "--today", "2026-10-18", "--output"])
        .arg(&out)
        .arg(format!("{}/*", dir.path().display()))
        .assert()
        .success();

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "ACME STORE");
    assert_eq!(&rows[1][0], "2026-10-18");
    assert_eq!(&rows[1][1], "Corner Cafe");
    assert_eq!(&rows[1][4], "4.50");
}

#[test]
fn batch_continue_on_error_skips_bad_files() {
    let dir = TempDir::new().unwrap();
    write_receipt(&dir, "a.txt", RECEIPT);
    write_receipt(&dir, "broken.json", "{ not json");

    let pattern = format!("{}/*", dir.path().display());

    rcpt(dir.path())
        .args(["batch"])
        .arg(&pattern)
        .assert()
        .failure();

    rcpt(dir.path())
        .args(["batch", "--continue-on-error"])
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACME STORE"))
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    rcpt(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    rcpt(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "sheet.sheet_name", "Expenses"])
        .assert()
        .success();

    rcpt(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "sheet.sheet_name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Expenses\""));

    rcpt(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "sheet.nope"])
        .assert()
        .failure();
}

#[test]
fn config_file_tunes_parser() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"parser": {"amount_ceiling": "50"}}"#).unwrap();
    let input = write_receipt(&dir, "r.txt", "Deli\nSoup 7.00\nCatering 400.00\n");

    let output = rcpt(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["amount"], "7.00");
}
