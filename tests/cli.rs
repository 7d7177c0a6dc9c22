//! Failure paths of the `pdf2pptx` binary.
//!
//! None of these reach pdfium: each one must fail during argument parsing,
//! input validation or the Inkscape version check, exit non-zero, and leave no
//! output file behind.

use std::path::Path;
use std::process::{Command, Output};

fn pdf2pptx(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdf2pptx"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn pdf2pptx")
}

/// A file that passes the magic-byte check; pdfium is never asked to open it.
fn fake_pdf(dir: &Path) -> &'static str {
    std::fs::write(dir.join("deck.pdf"), b"%PDF-1.4\n%%EOF\n").unwrap();
    "deck.pdf"
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn no_pptx_in(dir: &Path) {
    let leftovers: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n != "deck.pdf")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = pdf2pptx(dir.path(), &["absent.pdf", "out.pptx", "--no-progress"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("not found"), "{}", stderr(&out));
    no_pptx_in(dir.path());
}

#[test]
fn non_pdf_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("deck.pdf"), b"PK\x03\x04").unwrap();
    let out = pdf2pptx(dir.path(), &["deck.pdf", "--no-progress"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("not a valid PDF"), "{}", stderr(&out));
    no_pptx_in(dir.path());
}

#[test]
fn malformed_aspect_ratio_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = fake_pdf(dir.path());
    let out = pdf2pptx(dir.path(), &[input, "out.pptx", "--aspect-ratio", "abc"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("aspect"), "{}", stderr(&out));
    no_pptx_in(dir.path());
}

#[test]
fn ratio_beyond_slide_limits_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = fake_pdf(dir.path());
    for ratio in ["100:1", "1:80", "1e300"] {
        let out = pdf2pptx(dir.path(), &[input, "out.pptx", "--aspect-ratio", ratio]);

        assert_eq!(out.status.code(), Some(2), "{ratio}");
        assert!(stderr(&out).contains("1:56"), "{}", stderr(&out));
    }
    no_pptx_in(dir.path());
}

#[test]
fn zero_dpi_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = fake_pdf(dir.path());
    let out = pdf2pptx(dir.path(), &[input, "--dpi", "0"]);

    assert_eq!(out.status.code(), Some(2));
    no_pptx_in(dir.path());
}

#[test]
fn svg_without_inkscape_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = fake_pdf(dir.path());
    let out = pdf2pptx(dir.path(), &[input, "out.pptx", "-svg"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("Inkscape"), "{}", stderr(&out));
    no_pptx_in(dir.path());
}

#[test]
fn svg_with_missing_inkscape_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = fake_pdf(dir.path());
    let out = pdf2pptx(
        dir.path(),
        &[input, "out.pptx", "--svg", "--inkscape-path", "/nonexistent/inkscape"],
    );

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("Inkscape"), "{err}");
    assert!(err.contains("/nonexistent/inkscape"), "{err}");
    no_pptx_in(dir.path());
}

#[test]
fn help_mentions_vector_mode() {
    let dir = tempfile::tempdir().unwrap();
    let out = pdf2pptx(dir.path(), &["--help"]);

    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("--svg"));
    assert!(text.contains("--aspect-ratio"));
}
