use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_docx(path: &Path, text: &str) {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:body></w:document>"#,
        text
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    fs::write(path, bytes).unwrap();
}

#[test]
fn missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path().join("does-not-exist.pdf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.pdf"));
}

#[test]
fn empty_directory_succeeds_with_warning() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No supported files found"));
}

#[test]
fn empty_directory_warns_in_json_mode() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a document").unwrap();

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path())
        .args(["--output-format", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""level":"warning""#)
                .and(predicate::str::contains("No supported files found"))
                .and(predicate::str::contains(r#""processed_count": 0"#)),
        );
}

#[test]
fn failed_file_warns_in_json_mode() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.xlsx"), "not a workbook").unwrap();

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path())
        .args(["--output-format", "json"])
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains(r#""level":"warning""#)
                .and(predicate::str::contains("Failed to extract"))
                .and(predicate::str::contains("broken.xlsx")),
        );
}

#[test]
fn single_docx_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.docx");
    write_docx(&input, "Q1 results");
    let output = temp_dir.path().join("out").join("report.txt");

    cargo_bin_cmd!("docextract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--output-format", "plain"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "Q1 results");
}

#[test]
fn single_docx_prints_text_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("memo.docx");
    write_docx(&input, "Quarterly memo");

    cargo_bin_cmd!("docextract")
        .arg(&input)
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quarterly memo"));
}

#[test]
fn directory_with_broken_file_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    write_docx(&temp_dir.path().join("good.docx"), "fine");
    fs::write(temp_dir.path().join("broken.xlsx"), "not a workbook").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();
    let output = temp_dir.path().join("out");

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&output)
        .args(["--output-format", "plain"])
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(output.join("good.txt")).unwrap(), "fine");
    assert!(!output.join("broken.txt").exists());
    assert!(!output.join("notes.txt").exists());
}

#[test]
fn report_is_written_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let docs = temp_dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    write_docx(&docs.join("a.docx"), "alpha beta");
    let report_path = temp_dir.path().join("report.json");

    cargo_bin_cmd!("docextract")
        .arg(&docs)
        .arg("--sibling")
        .arg("--report")
        .arg(&report_path)
        .args(["--output-format", "plain"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(docs.join("a.txt")).unwrap(), "alpha beta");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["processed_count"], 1);
    assert_eq!(report["error_count"], 0);
    assert_eq!(report["file_records"][0]["word_count"], 2);
}

#[test]
fn generate_config_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("docextract.toml");

    cargo_bin_cmd!("docextract")
        .arg("--generate-config")
        .arg("-c")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[extraction]"));
}

#[test]
fn quiet_and_verbose_conflict() {
    cargo_bin_cmd!("docextract")
        .args(["somewhere", "-q", "-v"])
        .assert()
        .failure();
}

#[test]
fn dry_run_extracts_nothing() {
    let temp_dir = TempDir::new().unwrap();
    write_docx(&temp_dir.path().join("a.docx"), "alpha");

    cargo_bin_cmd!("docextract")
        .arg(temp_dir.path())
        .arg("--sibling")
        .arg("--dry-run")
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.docx"));

    assert!(!temp_dir.path().join("a.txt").exists());
}
