//! Integration tests for the cadastro commands.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const COMPANY: &str = "CNPJ\n11.222.333/0001-81\nRazão Social\nACME SOLUCOES LTDA ACME\n";

/// Command with the config directory pointed at `home`.
fn cadastro(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cadastro"));
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn extract_prints_json_record() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("company.txt");
    fs::write(&input, COMPANY).unwrap();

    cadastro(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""taxIdCompany": "11.222.333/0001-81""#))
        .stdout(predicate::str::contains(r#""tradeName": "ACME""#))
        .stdout(predicate::str::contains("taxIdPerson").not());
}

#[test]
fn extract_reads_stdin_and_honours_ocr_flag() {
    let dir = TempDir::new().unwrap();

    cadastro(dir.path())
        .args(["extract", "-"])
        .write_stdin("contatoefindup.com.br\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("contato@findup.com.br"));

    cadastro(dir.path())
        .args(["extract", "-", "--no-ocr-correction"])
        .write_stdin("contatoefindup.com.br\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("contato@findup.com.br").not());
}

#[test]
fn extract_with_diagnostics_prints_report() {
    let dir = TempDir::new().unwrap();

    cadastro(dir.path())
        .args(["extract", "-", "--diagnostics"])
        .write_stdin("CNPJ: 11.222.333/0001-80\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""lineCount": 1"#))
        .stdout(predicate::str::contains(r#""reason": "checksum""#));
}

#[test]
fn extract_writes_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("company.txt");
    let output = dir.path().join("company.csv");
    fs::write(&input, COMPANY).unwrap();

    cadastro(dir.path())
        .arg("extract")
        .arg(&input)
        .args(["--format", "csv", "--output"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("taxIdCompany,"));
    assert!(csv.contains("11.222.333/0001-81"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    cadastro(dir.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn validate_reports_valid_and_invalid_values() {
    let dir = TempDir::new().unwrap();

    cadastro(dir.path())
        .args(["validate", "cnpj", "11222333000181"])
        .assert()
        .success()
        .stdout(predicate::str::contains("11.222.333/0001-81"));

    cadastro(dir.path())
        .args(["validate", "cnpj", "11.222.333/0001-80"])
        .assert()
        .failure();

    cadastro(dir.path())
        .args(["validate", "cnpj", "11222333000180"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid Cnpj"));

    cadastro(dir.path())
        .args(["validate", "cep", "01310100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01310-100"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), COMPANY).unwrap();
    fs::write(inputs.join("b.txt"), "contatoefindup.com.br\n").unwrap();
    fs::write(inputs.join("empty.txt"), "\n").unwrap();

    let pattern = format!("{}/*.txt", inputs.display());
    cadastro(dir.path())
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-j", "2"])
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 files"));

    let a = fs::read_to_string(outputs.join("a.json")).unwrap();
    assert!(a.contains("11.222.333/0001-81"));
    assert!(outputs.join("b.json").exists());
    assert!(!outputs.join("empty.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert!(summary.contains("empty.txt,error"));
}

#[test]
fn batch_stops_on_error_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.txt"), "   \n").unwrap();

    let pattern = format!("{}/*.txt", dir.path().display());
    cadastro(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    let pattern = format!("{}/*.txt", dir.path().display());
    cadastro(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_get_and_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let config_arg = config.to_str().unwrap();

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "get", "extraction.lookahead_lines"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "set", "extraction.lookahead_lines", "5"])
        .assert()
        .success();

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "get", "extraction.lookahead_lines"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    cadastro(dir.path())
        .args(["--config", config_arg, "config", "set", "extraction.lookahead_lines", "0"])
        .assert()
        .failure();
}

#[test]
fn config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();

    cadastro(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cadastro"))
        .stdout(predicate::str::contains("not created"));
}
