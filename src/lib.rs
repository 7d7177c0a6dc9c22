//! # pdf2pptx
//!
//! Convert PDF documents to PowerPoint presentations, one slide per page.
//!
//! Each page becomes a picture on its own slide: a PNG rendered by pdfium at
//! a chosen DPI, or an EMF exported by Inkscape when scalable output is
//! wanted. Hyperlinks survive as invisible clickable rectangles laid exactly
//! over the link areas of the page, so web links open and in-document links
//! jump to the right slide.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   validate path and %PDF magic
//!  ├─ 2. Canvas  fix the slide size from --aspect-ratio or page 1
//!  ├─ 3. Render  pdfium PNG at DPI, or Inkscape EMF
//!  ├─ 4. Links   link annotations → slide rectangles
//!  └─ 5. Package stream slides into a .pptx, rename into place
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let stats = convert("slides.pdf", "slides.pptx", &config)?;
//!     eprintln!("{} slides, {} links", stats.slides_written, stats.links_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime Requirements
//!
//! pdfium is loaded at runtime from `PDFIUM_LIB_PATH`, the working directory,
//! or the system library path. Vector mode additionally needs Inkscape 1.x.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AspectRatioSetting, ConversionConfig, ConversionConfigBuilder, RenderMode};
pub use convert::{convert, convert_document, inspect, plan_canvas, write_presentation};
pub use error::Pdf2PptxError;
pub use geometry::{AspectRatio, EmuRect, PageSize, Placement, SlideCanvas};
pub use output::{ConversionStats, DocumentInfo, PageInfo};
pub use pipeline::input::default_output_path;
pub use pipeline::links::{Hyperlink, LinkRect, LinkTarget, PageLinks};
pub use pipeline::render::{GraphicFormat, PageGraphic, PageSource};
pub use pipeline::vector::{InkscapeConverter, VectorConverter};
pub use pptx::{LinkOverlay, PptxWriter, PresentationBuilder, SlideContent};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
