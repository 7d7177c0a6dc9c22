//! End-to-end integration tests for pdf2pptx.
//!
//! These tests use real PDF files in `./test_cases/` and need a pdfium
//! library at runtime. They are gated behind the `E2E_ENABLED` environment
//! variable so they do not run in CI unless explicitly requested. The vector
//! test additionally needs `INKSCAPE_PATH`.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e test_inspect -- --nocapture

use pdf2pptx::{convert, inspect, AspectRatioSetting, ConversionConfig, Pdf2PptxError};
use std::io::Read;
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/output");
    std::fs::create_dir_all(&d).ok();
    d
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            println!("       Run: make download-test-pdfs");
            return;
        }
        p
    }};
}

/// The parts of a written package these tests look at.
struct PackageSummary {
    slides: usize,
    media: Vec<String>,
    presentation: String,
    hyperlinks: usize,
}

fn summarise(path: &Path) -> PackageSummary {
    let file = std::fs::File::open(path).expect("output exists");
    let mut archive = zip::ZipArchive::new(file).expect("output is a zip");

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let slides: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .collect();

    let mut hyperlinks = 0;
    for name in &slides {
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        hyperlinks += xml.matches("<a:hlinkClick").count();
    }

    let mut presentation = String::new();
    archive
        .by_name("ppt/presentation.xml")
        .unwrap()
        .read_to_string(&mut presentation)
        .unwrap();

    let mut media: Vec<String> = names
        .iter()
        .filter(|n| n.starts_with("ppt/media/"))
        .cloned()
        .collect();
    media.sort();

    PackageSummary {
        slides: slides.len(),
        media,
        presentation,
        hyperlinks,
    }
}

// ── Inspect tests ────────────────────────────────────────────────────────────

#[test]
fn test_inspect_arxiv_paper() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));

    let info = inspect(&path, None).expect("inspect() should succeed");

    assert_eq!(info.page_count, 15, "Attention paper should have 15 pages");
    assert_eq!(info.pages.len(), 15);
    assert!(!info.pdf_version.is_empty());
    assert_eq!(info.aspect_ratio.as_deref(), Some("17:22"), "US Letter pages");
    assert!(
        info.pages.iter().map(|p| p.link_count).sum::<usize>() > 0,
        "paper has citation and URL links"
    );

    println!("Info: {:?}", info);
}

#[test]
fn test_inspect_irs_form() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));

    let info = inspect(&path, None).expect("inspect() should succeed");

    assert_eq!(info.page_count, 2, "IRS form should have 2 pages");
    assert!(
        info.title.as_deref().unwrap_or("").contains("1040"),
        "Title should mention 1040"
    );
}

#[test]
fn test_inspect_nonexistent() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }

    let result = inspect("/definitely/not/a/real/file.pdf", None);
    assert!(matches!(result, Err(Pdf2PptxError::FileNotFound { .. })));
}

// ── Conversion tests ─────────────────────────────────────────────────────────

#[test]
fn test_convert_irs_form_raster() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));
    let out_path = output_dir().join("irs_form_1040.pptx");
    let _ = std::fs::remove_file(&out_path);

    let config = ConversionConfig::builder()
        .dpi(150)
        .build()
        .expect("valid config");

    let stats = convert(&path, &out_path, &config).expect("conversion should succeed");

    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.slides_written, 2);

    let pkg = summarise(&out_path);
    assert_eq!(pkg.slides, 2, "one slide per page");
    assert_eq!(pkg.media, vec!["ppt/media/image1.png", "ppt/media/image2.png"]);
    println!("Wrote {}: {:?}", out_path.display(), stats);
}

#[test]
fn test_convert_arxiv_paper_keeps_links() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));
    let out_path = output_dir().join("attention.pptx");

    let config = ConversionConfig::builder()
        .dpi(96)
        .build()
        .expect("valid config");

    let stats = convert(&path, &out_path, &config).expect("conversion should succeed");

    let pkg = summarise(&out_path);
    assert_eq!(pkg.slides, 15);
    assert!(stats.links_written > 0, "expected clickable links");
    assert_eq!(pkg.hyperlinks, stats.links_written);
}

#[test]
fn test_convert_fixed_wide_ratio() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));
    let out_path = output_dir().join("irs_form_1040_16x9.pptx");

    let config = ConversionConfig::builder()
        .dpi(72)
        .aspect_ratio("16:9".parse::<AspectRatioSetting>().unwrap())
        .build()
        .expect("valid config");

    let stats = convert(&path, &out_path, &config).expect("conversion should succeed");
    assert_eq!(stats.aspect_ratio, "16:9");

    let pkg = summarise(&out_path);
    assert!(
        pkg.presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500""#),
        "unexpected slide size in {}",
        pkg.presentation
    );
}

#[test]
fn test_convert_vector_with_inkscape() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));
    let Ok(inkscape) = std::env::var("INKSCAPE_PATH") else {
        println!("SKIP — set INKSCAPE_PATH to run the vector test");
        return;
    };
    let out_path = output_dir().join("irs_form_1040_vector.pptx");

    let config = ConversionConfig::builder()
        .vector(true)
        .inkscape_path(inkscape)
        .build()
        .expect("valid config");

    convert(&path, &out_path, &config).expect("conversion should succeed");

    let pkg = summarise(&out_path);
    assert_eq!(pkg.slides, 2);
    assert!(pkg.media.iter().all(|m| m.ends_with(".emf")));
}

#[test]
fn test_corrupt_pdf_leaves_no_output() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pdf");
    std::fs::write(&input, b"%PDF-1.7\nthis is not a real document\n").unwrap();
    let out_path = dir.path().join("broken.pptx");

    let result = convert(&input, &out_path, &ConversionConfig::default());

    assert!(matches!(result, Err(Pdf2PptxError::CorruptPdf { .. })), "{result:?}");
    assert!(!out_path.exists());
}
