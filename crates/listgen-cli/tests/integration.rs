//! Integration tests for the listgen CLI
//!
//! These tests drive the commands the binary dispatches to and inspect the
//! written reports.

use std::fs;
use std::path::PathBuf;

use listgen_cli::{generate_command, styles_command, GenerateArgs};
use listgen_ooxml::test_utils::create_numbering_template;
use listgen_ooxml::WordDocument;
use tempfile::TempDir;

fn write_template(dir: &TempDir, bindings: &[(u32, Option<&str>)]) -> PathBuf {
    let path = dir.path().join("template.dotx");
    fs::write(&path, create_numbering_template(bindings)).unwrap();
    path
}

#[test]
fn test_generate_with_bundled_template() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.docx");

    generate_command(&GenerateArgs {
        output: output.clone(),
        passes: Some(1),
        ..GenerateArgs::default()
    })
    .unwrap();

    let report = WordDocument::open(&output).unwrap();
    // 4 styles x (heading + 5 items + blank)
    assert_eq!(report.paragraphs().count(), 4 * 7);
    assert_eq!(
        report.paragraphs().next().unwrap().text(),
        "List 1: - ListNumber"
    );
}

#[test]
fn test_generate_with_template_and_config() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &[(1, Some("A")), (2, Some("B"))]);
    let config = dir.path().join("report.toml");
    fs::write(&config, "items_per_list = 2\npass_count = 2\n").unwrap();
    let output = dir.path().join("report.docx");

    generate_command(&GenerateArgs {
        output: output.clone(),
        template: Some(template),
        config: Some(config),
        ..GenerateArgs::default()
    })
    .unwrap();

    let report = WordDocument::open(&output).unwrap();
    let headings: Vec<_> = report
        .paragraphs()
        .map(|p| p.text())
        .filter(|t| t.starts_with("List "))
        .collect();
    assert_eq!(
        headings,
        vec!["List 1: - A", "List 2: - B", "List 1: - A", "List 2: - B"]
    );
    // 4 lists x (heading + 2 items + blank)
    assert_eq!(report.paragraphs().count(), 16);
}

#[test]
fn test_generate_nested_flag() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &[(1, Some("A"))]);
    let output = dir.path().join("nested.docx");

    generate_command(&GenerateArgs {
        output: output.clone(),
        template: Some(template),
        nested: true,
        passes: Some(1),
        items: Some(2),
        ..GenerateArgs::default()
    })
    .unwrap();

    let report = WordDocument::open(&output).unwrap();
    let deepest = report.paragraphs().filter_map(|p| p.ilvl()).max();
    assert_eq!(deepest, Some(3));
}

#[test]
fn test_generate_unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("missing-dir").join("report.docx");

    let result = generate_command(&GenerateArgs {
        output,
        passes: Some(1),
        ..GenerateArgs::default()
    });

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to write report"));
}

#[test]
fn test_generate_missing_template_fails() {
    let dir = TempDir::new().unwrap();

    let result = generate_command(&GenerateArgs {
        output: dir.path().join("report.docx"),
        template: Some(dir.path().join("absent.dotx")),
        ..GenerateArgs::default()
    });

    assert!(result.is_err());
    assert!(!dir.path().join("report.docx").exists());
}

#[test]
fn test_generate_malformed_template_writes_empty_report() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("broken.dotx");
    fs::write(&template, b"not a zip archive").unwrap();
    let output = dir.path().join("report.docx");

    generate_command(&GenerateArgs {
        output: output.clone(),
        template: Some(template),
        ..GenerateArgs::default()
    })
    .unwrap();

    let report = WordDocument::open(&output).unwrap();
    assert_eq!(report.paragraphs().count(), 0);
}

#[test]
fn test_styles_command() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &[(1, Some("ListNumber"))]);

    assert!(styles_command(Some(&template)).is_ok());
    assert!(styles_command(None).is_ok());
    assert!(styles_command(Some(&dir.path().join("absent.dotx"))).is_err());
}
