//! Pipeline stages for PDF-to-PowerPoint conversion.
//!
//! Each submodule owns one step of turning a page into a slide. The
//! converter in [`crate::convert`] only talks to them through the
//! [`render::PageSource`] and [`vector::VectorConverter`] traits.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render / vector ──▶ links ──▶ pptx
//! (path)    (pdfium PNG or      (page     (slide with picture
//!            Inkscape EMF)       fractions) and link overlays)
//! ```
//!
//! 1. [`input`]  — validate the user-supplied path is a readable PDF
//! 2. [`render`] — page sizes and rasterisation via pdfium
//! 3. [`vector`] — per-page EMF export through an Inkscape subprocess
//! 4. [`links`]  — link annotations as page-relative rectangles and targets

pub mod input;
pub mod links;
pub mod render;
pub mod vector;
