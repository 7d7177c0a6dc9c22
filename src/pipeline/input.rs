//! Input resolution: validate that a user-supplied path is a readable PDF.
//!
//! pdfium reports a missing file and a garbage file with the same opaque
//! error, and Inkscape only fails much later. Checking existence, read
//! permission and the `%PDF` magic up front gives a precise error before any
//! rendering work starts.

use crate::error::Pdf2PptxError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<PathBuf, Pdf2PptxError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(Pdf2PptxError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(f) => {
            // files shorter than the magic are zero-padded and fail the check
            let mut head = Vec::with_capacity(4);
            if let Err(e) = f.take(4).read_to_end(&mut head) {
                return Err(match e.kind() {
                    std::io::ErrorKind::PermissionDenied => Pdf2PptxError::PermissionDenied { path },
                    _ => Pdf2PptxError::FileNotFound { path },
                });
            }
            let mut magic = [0u8; 4];
            magic[..head.len()].copy_from_slice(&head);
            if &magic != b"%PDF" {
                return Err(Pdf2PptxError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2PptxError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2PptxError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// The default output path: the input path with its extension set to `.pptx`.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("pptx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_local(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_local(dir.path()).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 not a pdf").unwrap();
        let err = resolve_local(f.path()).unwrap_err();
        match err {
            Pdf2PptxError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn short_and_empty_files_are_not_pdfs() {
        for content in [&b""[..], b"%P", b"%PD"] {
            let mut f = tempfile::NamedTempFile::new().unwrap();
            f.write_all(content).unwrap();
            let err = resolve_local(f.path()).unwrap_err();
            assert!(
                matches!(err, Pdf2PptxError::NotAPdf { .. }),
                "{content:?}: expected NotAPdf, got {err:?}"
            );
        }
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n%%EOF\n").unwrap();
        assert_eq!(resolve_local(f.path()).unwrap(), f.path());
    }

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(default_output_path("talks/deck.pdf"), PathBuf::from("talks/deck.pptx"));
        assert_eq!(default_output_path("notes"), PathBuf::from("notes.pptx"));
        assert_eq!(default_output_path("a.b/slides.PDF"), PathBuf::from("a.b/slides.pptx"));
    }
}
