use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_delfor") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("delfor{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_delfor is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> String {
    repo_root()
        .join("testdata/edi")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("temporary file should be writable");
    path.to_string_lossy().into_owned()
}

fn run_delfor(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run delfor")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn parse_command_outputs_json_to_stdout() {
    let input = fixture("cummins_delfor_d97a.edi");

    let output = run_delfor(&["parse", &input, "--dialect", "cummins", "--pretty"]);

    assert_success(&output);
    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should contain valid JSON");
    let files = parsed.as_array().expect("parse output should be a JSON array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["dialect"], "cummins");
    assert_eq!(files[0]["deliveries"].as_array().map(Vec::len), Some(6));
    assert_eq!(files[0]["header"]["document_number"], "DF-240315-01");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parse summary: files=1, deliveries=6"));
}

#[test]
fn parse_command_keeps_files_independent_and_ordered() {
    let output = run_delfor(&[
        "parse",
        &fixture("minebea_delfor_d97a.edi"),
        &fixture("trw_delfor_d96a.edi"),
        "--dialect",
        "minebea",
    ]);

    assert_success(&output);
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should contain valid JSON");
    let files = parsed.as_array().expect("parse output should be a JSON array");
    assert_eq!(files.len(), 2);
    assert!(files[0]["path"].as_str().unwrap().ends_with("minebea_delfor_d97a.edi"));
    assert_eq!(files[0]["header"]["document_number"], "MB-2024-0320");
    assert_eq!(files[1]["header"]["document_number"], "KOB-88");
    assert_eq!(files[1]["dialect"], "minebea");
}

#[test]
fn config_default_dialect_applies_without_flag() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(dir.path(), "delfor.yaml", "default_dialect: trw\n");

    let output = run_delfor(&["--config", &config, "parse", &fixture("trw_delfor_d96a.edi")]);

    assert_success(&output);
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should contain valid JSON");
    assert_eq!(parsed[0]["dialect"], "trw-koblenz");
    assert_eq!(parsed[0]["deliveries"].as_array().map(Vec::len), Some(3));
}

#[test]
fn invalid_config_returns_fatal_exit_code() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(dir.path(), "bad.yaml", "color: neon");

    let output = run_delfor(&["--config", &config, "parse", &fixture("cummins_delfor_d97a.edi")]);

    assert_eq!(output.status.code(), Some(3));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR:"),
        "expected error prefix; stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_input_fails_with_error_line() {
    let output = run_delfor(&["parse", "/definitely/not/here.edi"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("/definitely/not/here.edi"));
}

#[test]
fn unknown_dialect_is_rejected_by_argument_parsing() {
    let output = run_delfor(&["parse", &fixture("cummins_delfor_d97a.edi"), "-d", "bosch"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bosch"));
}

#[test]
fn summary_command_json() {
    let output = run_delfor(&["summary", &fixture("cummins_delfor_d97a.edi"), "--json"]);

    assert_success(&output);
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should contain valid JSON");
    assert_eq!(summary["deliveries"], 6);
    assert_eq!(summary["total_quantity"], 560);
    assert_eq!(summary["by_condition"][0]["label"], "Backlog");
}

#[test]
fn summary_command_text() {
    let output = run_delfor(&["summary", &fixture("minebea_delfor_d97a.edi"), "-d", "minebea"]);

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deliveries: 3"));
    assert!(stdout.contains("total quantity: 6000"));
    assert!(stdout.contains("Quantity to be delivered"));
}

#[test]
fn export_command_writes_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let destination = dir.path().join("minebea.csv");

    let output = run_delfor(&[
        "export",
        &fixture("minebea_delfor_d97a.edi"),
        destination.to_string_lossy().as_ref(),
        "--dialect",
        "minebea",
        "--delimiter",
        ",",
    ]);

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Exported 3 delivery rows"));
    let csv = fs::read_to_string(&destination).expect("export should create the file");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Week,Quantity,Condition,Delivery location");
    assert!(lines[1].starts_with("01.04.2024,14,1500,Firm,"));
    assert_eq!(lines.len(), 4);
}

#[test]
fn export_uses_configured_fallback_location() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(
        dir.path(),
        "delfor.yaml",
        "delimiter: \"|\"\nfallback_locations:\n  cummins: PLANT 9\n",
    );
    let input = write_file(
        dir.path(),
        "no-address.edi",
        "LIN+1++P-1:IN'SCC+1'QTY+1:5'DTM+2:20240401:102'",
    );
    let destination = dir.path().join("out.csv");

    let output = run_delfor(&[
        "--config",
        &config,
        "export",
        &input,
        destination.to_string_lossy().as_ref(),
        "--no-header",
    ]);

    assert_success(&output);
    let csv = fs::read_to_string(&destination).expect("export should create the file");
    assert_eq!(csv.trim_end(), "P-1|01.04.2024|14|5|Firm|PLANT 9");
}

#[test]
fn export_with_nothing_to_export_warns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_file(dir.path(), "empty.edi", "UNB+UNOA:3+S+R+240101:1200+1'UNZ+0+1'");
    let destination = dir.path().join("out.csv");

    let output = run_delfor(&["export", &input, destination.to_string_lossy().as_ref()]);

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARNING: no delivery rows"));
    assert!(!destination.exists());
}
