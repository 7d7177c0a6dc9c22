//! Error type for the pdf2pptx library.
//!
//! Every failure is fatal to the run. A presentation is written as a single
//! package that is only moved into place after the last slide, so there is no
//! partial result worth handing back: the first error aborts the conversion
//! and surfaces as `Err(Pdf2PptxError)` from the top-level functions.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// `--aspect-ratio` could not be parsed or is not positive.
    #[error("Invalid aspect ratio '{input}': {reason}\nUse 'width:height' (e.g. 16:9) or a positive decimal.")]
    InvalidAspectRatio { input: String, reason: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document opened fine but has no pages to turn into slides.
    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// pdfium-render returned an error while rendering or reading a page.
    #[error("Rendering failed for page {page}: {detail}")]
    PageRenderFailed { page: usize, detail: String },

    // ── Vector conversion errors ──────────────────────────────────────────
    /// Vector mode was requested but no usable Inkscape executable exists.
    #[error("Inkscape not available{}: {reason}\nInstall Inkscape or pass --inkscape-path <PATH>.", tool_location(.path))]
    VectorToolMissing {
        path: Option<PathBuf>,
        reason: String,
    },

    /// Inkscape ran but failed, timed out, or produced no output.
    #[error("Vector conversion failed for page {page}: {detail}")]
    VectorConversionFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create, write or move the output presentation file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip/OOXML package could not be assembled.
    #[error("Failed to assemble presentation package: {0}")]
    PackageWriteFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory), place the library\n\
next to the working directory, or install it on the system library path.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn tool_location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at '{}'", p.display()))
        .unwrap_or_default()
}

impl From<zip::result::ZipError> for Pdf2PptxError {
    fn from(e: zip::result::ZipError) -> Self {
        Pdf2PptxError::PackageWriteFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Pdf2PptxError::FileNotFound {
            path: PathBuf::from("/nope/deck.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("not found"), "got: {msg}");
        assert!(msg.contains("/nope/deck.pdf"), "got: {msg}");
    }

    #[test]
    fn invalid_aspect_ratio_display() {
        let e = Pdf2PptxError::InvalidAspectRatio {
            input: "abc".into(),
            reason: "not a number".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'abc'"), "got: {msg}");
        assert!(msg.contains("16:9"), "got: {msg}");
    }

    #[test]
    fn vector_tool_missing_with_path() {
        let e = Pdf2PptxError::VectorToolMissing {
            path: Some(PathBuf::from("/opt/inkscape")),
            reason: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("at '/opt/inkscape'"), "got: {msg}");
        assert!(msg.contains("--inkscape-path"), "got: {msg}");
    }

    #[test]
    fn vector_tool_missing_without_path() {
        let e = Pdf2PptxError::VectorToolMissing {
            path: None,
            reason: "no --inkscape-path given".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Inkscape not available: "), "got: {msg}");
    }

    #[test]
    fn vector_conversion_failed_display() {
        let e = Pdf2PptxError::VectorConversionFailed {
            page: 4,
            detail: "timed out after 300s".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(e.to_string().contains("timed out"));
    }

    #[test]
    fn zip_error_converts_to_package_failure() {
        let e: Pdf2PptxError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(e, Pdf2PptxError::PackageWriteFailed(_)));
    }
}
