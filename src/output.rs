//! Result types returned by the conversion and inspection entry points.
//!
//! All of them are `Serialize` so the CLI's `--json` flag can print them
//! as-is.

use crate::config::RenderMode;
use crate::geometry::{PageSize, SlideCanvas};
use serde::Serialize;

/// Summary of one finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    /// Pages in the source document (= slides written).
    pub total_pages: usize,
    /// Slides in the written presentation.
    pub slides_written: usize,
    /// Hyperlink overlays placed across all slides.
    pub links_written: usize,
    /// Links found in the PDF but not reproduced (unsupported kind or
    /// invalid target).
    pub links_skipped: usize,
    pub render_mode: RenderMode,
    /// The slide ratio actually used, e.g. `"16:9"`.
    pub aspect_ratio: String,
    pub canvas: SlideCanvas,
    /// Time spent producing page pictures (pdfium or Inkscape).
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Document facts gathered without converting anything.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub pdf_version: String,
    pub page_count: usize,
    /// Ratio the slides would get with `--aspect-ratio auto`.
    pub aspect_ratio: Option<String>,
    pub pages: Vec<PageInfo>,
}

/// Per-page facts reported by [`crate::convert::inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// 1-indexed page number.
    pub page_num: usize,
    pub size: PageSize,
    /// Links that would become overlays.
    pub link_count: usize,
}
