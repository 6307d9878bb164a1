//! Integration tests for the `pdfrows` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cmd() -> Command {
    Command::cargo_bin("pdfrows").unwrap()
}

/// Create a PDF with one Letter page per content stream, sharing a
/// WinAnsi Helvetica `/F1`.
fn pdf_with_pages(pages: &[&[u8]]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(pages.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write PDF bytes to a temporary file and return the path.
fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

/// Two text rows at baselines 720 and 700, no rulings.
const NAME_AGE: &[u8] = b"BT /F1 12 Tf \
    1 0 0 1 72 720 Tm (Name) Tj 1 0 0 1 200 720 Tm (Age) Tj \
    1 0 0 1 72 700 Tm (Alice) Tj 1 0 0 1 200 700 Tm (30) Tj ET";

/// 2x2 ruled grid holding A B / 1 2, plus loose text above it.
const GRID: &[u8] = b"0.5 w \
    100 700 m 300 700 l S 100 650 m 300 650 l S 100 600 m 300 600 l S \
    100 600 m 100 700 l S 200 600 m 200 700 l S 300 600 m 300 700 l S \
    BT /F1 12 Tf 1 0 0 1 110 670 Tm (A) Tj 1 0 0 1 210 670 Tm (B) Tj \
    1 0 0 1 110 620 Tm (1) Tj 1 0 0 1 210 620 Tm (2) Tj \
    1 0 0 1 72 750 Tm (Heading) Tj ET";

fn run_ok(pdf: &[u8]) -> String {
    let file = write_temp_pdf(pdf);
    let output = cmd().arg(file.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn word_rows_print_as_json() {
    let stdout = run_ok(&pdf_with_pages(&[NAME_AGE]));
    assert_eq!(stdout, "[[\"Name\", \"Age\"], [\"Alice\", \"30\"]]\n");
}

#[test]
fn table_rows_print_as_json() {
    let stdout = run_ok(&pdf_with_pages(&[GRID]));
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([["A", "B"], ["1", "2"]]));
}

#[test]
fn table_on_any_page_wins_over_words() {
    let stdout = run_ok(&pdf_with_pages(&[NAME_AGE, GRID]));
    assert_eq!(stdout.trim_end(), r#"[["A", "B"], ["1", "2"]]"#);
}

#[test]
fn zero_pages_prints_empty_array() {
    let stdout = run_ok(&pdf_with_pages(&[]));
    assert_eq!(stdout, "[]\n");
}

#[test]
fn page_without_text_prints_empty_array() {
    let stdout = run_ok(&pdf_with_pages(&[b"72 700 m 300 700 l S"]));
    assert_eq!(stdout, "[]\n");
}

#[test]
fn non_ascii_is_printed_raw() {
    let stdout = run_ok(&pdf_with_pages(&[b"BT /F1 12 Tf 72 720 Td (Caf\xe9) Tj ET"]));
    assert_eq!(stdout, "[[\"Café\"]]\n");
    assert!(!stdout.contains("\\u"));
}

#[test]
fn output_is_stable_across_runs() {
    let file = write_temp_pdf(&pdf_with_pages(&[NAME_AGE, b"", GRID]));
    let first = cmd().arg(file.path()).output().unwrap();
    let second = cmd().arg(file.path()).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn diagnostics_do_not_reach_stdout() {
    let file = write_temp_pdf(&pdf_with_pages(&[NAME_AGE]));
    let output = cmd()
        .env("RUST_LOG", "debug")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "[[\"Name\", \"Age\"], [\"Alice\", \"30\"]]\n");
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_file_fails_without_stdout() {
    cmd()
        .arg("/nonexistent/missing.pdf")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn corrupt_file_fails_without_stdout() {
    let file = write_temp_pdf(b"this is not a pdf");
    cmd()
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn missing_argument_is_usage_error() {
    cmd()
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_mentions_file_argument() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"));
}
