//! PDF access via pdfium: page sizes, links, and rasterisation.
//!
//! [`PageSource`] is the seam the converter depends on. [`PdfiumSource`] is
//! the production implementation; tests drive the converter with in-memory
//! sources instead of real PDFs.
//!
//! ## Why scale, then cap pixels?
//!
//! DPI is what users reason about, so pages render at `dpi / 72` pixels per
//! point. Page sizes vary wildly though, and an A0 poster at 600 DPI would
//! need gigabytes of bitmap. `max_rendered_pixels` caps the longest edge
//! regardless of physical size.

use crate::error::Pdf2PptxError;
use crate::geometry::PageSize;
use crate::output::DocumentInfo;
use crate::pipeline::links::{self, PageBox, PageLinks};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encoding of a rendered page picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicFormat {
    Png,
    Emf,
}

impl GraphicFormat {
    /// File extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            GraphicFormat::Png => "png",
            GraphicFormat::Emf => "emf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            GraphicFormat::Png => "image/png",
            GraphicFormat::Emf => "image/x-emf",
        }
    }
}

/// The encoded picture of one page.
#[derive(Debug, Clone)]
pub struct PageGraphic {
    pub data: Vec<u8>,
    pub format: GraphicFormat,
    /// Bitmap size for raster renders; `None` for vector output.
    pub pixel_size: Option<(u32, u32)>,
}

/// Read access to a PDF document, one page at a time.
///
/// Indices are 0-based. Errors name the 1-based page.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Page size in points, as displayed.
    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError>;

    /// Hyperlinks of the page, already normalised to page fractions.
    fn page_links(&self, index: usize) -> Result<PageLinks, Pdf2PptxError>;

    /// Rasterise the page at `dpi` and PNG-encode it.
    fn render_page_to_image(
        &self,
        index: usize,
        dpi: u32,
        max_pixels: u32,
    ) -> Result<PageGraphic, Pdf2PptxError>;
}

/// Bind to a pdfium shared library.
///
/// Lookup order: `PDFIUM_LIB_PATH` (the library itself or its directory),
/// the working directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2PptxError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(raw) => {
            let path = PathBuf::from(raw);
            let path_str = path.to_string_lossy().into_owned();
            debug!("Binding pdfium from PDFIUM_LIB_PATH={}", path_str);
            if path.is_dir() {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    path_str.as_str(),
                ))
            } else {
                Pdfium::bind_to_library(path_str.as_str())
            }
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Pdf2PptxError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// A PDF opened with pdfium.
pub struct PdfiumSource<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    /// Open `pdf_path`, mapping pdfium's failures to precise errors.
    pub fn open(
        pdfium: &'a Pdfium,
        pdf_path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, Pdf2PptxError> {
        let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    Pdf2PptxError::WrongPassword {
                        path: pdf_path.to_path_buf(),
                    }
                } else {
                    Pdf2PptxError::PasswordRequired {
                        path: pdf_path.to_path_buf(),
                    }
                }
            } else {
                Pdf2PptxError::CorruptPdf {
                    path: pdf_path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        info!("PDF loaded: {} pages", document.pages().len());

        Ok(Self {
            path: pdf_path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, Pdf2PptxError> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| Pdf2PptxError::PageRenderFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })
    }

    /// Document metadata. Page-level facts are filled in by the caller.
    pub fn document_info(&self) -> DocumentInfo {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentInfo {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            pdf_version: format!("{:?}", self.document.version()),
            page_count: self.page_count(),
            aspect_ratio: None,
            pages: Vec::new(),
        }
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value as f64, page.height().value as f64))
    }

    fn page_links(&self, index: usize) -> Result<PageLinks, Pdf2PptxError> {
        let page = self.page(index)?;
        let width = page.width().value as f64;
        let height = page.height().value as f64;

        let page_box = match page.boundaries().crop() {
            Ok(b) if b.bounds.width().value > 0.0 && b.bounds.height().value > 0.0 => PageBox {
                left: b.bounds.left().value as f64,
                bottom: b.bounds.bottom().value as f64,
                width: b.bounds.width().value as f64,
                height: b.bounds.height().value as f64,
            },
            _ => PageBox {
                left: 0.0,
                bottom: 0.0,
                width,
                height,
            },
        };

        Ok(links::extract_links(&page, index, self.page_count(), page_box))
    }

    fn render_page_to_image(
        &self,
        index: usize,
        dpi: u32,
        max_pixels: u32,
    ) -> Result<PageGraphic, Pdf2PptxError> {
        let page = self.page(index)?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi as f32 / 72.0)
            .set_maximum_width(max_pixels as i32)
            .set_maximum_height(max_pixels as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2PptxError::PageRenderFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        encode_png(&image).map_err(|e| Pdf2PptxError::PageRenderFailed {
            page: index + 1,
            detail: format!("PNG encoding failed: {}", e),
        })
    }
}

/// PNG-encode a rendered page. PNG keeps text edges crisp where JPEG
/// artefacts would show on projected slides.
pub fn encode_png(img: &DynamicImage) -> Result<PageGraphic, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded page → {} bytes PNG", buf.len());

    Ok(PageGraphic {
        data: buf,
        format: GraphicFormat::Png,
        pixel_size: Some((img.width(), img.height())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 6, Rgba([255, 0, 0, 255])));
        let graphic = encode_png(&img).expect("encode should succeed");
        assert_eq!(graphic.format, GraphicFormat::Png);
        assert_eq!(graphic.pixel_size, Some((10, 6)));
        assert_eq!(&graphic.data[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn open_takes_a_password_borrowed_for_the_document() {
        // skips silently where no pdfium library is installed
        let Ok(pdfium) = bind_pdfium() else { return };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.pdf");
        std::fs::write(&path, b"%PDF-1.7\nnot really a document\n").unwrap();

        let password = String::from("hunter2");
        let opened = PdfiumSource::open(&pdfium, &path, Some(password.as_str()));
        assert!(opened.is_err());
    }

    #[test]
    fn format_metadata() {
        assert_eq!(GraphicFormat::Png.extension(), "png");
        assert_eq!(GraphicFormat::Emf.extension(), "emf");
        assert_eq!(GraphicFormat::Emf.mime_type(), "image/x-emf");
    }
}
