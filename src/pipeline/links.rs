//! Hyperlink extraction: PDF link annotations → page-relative rectangles.
//!
//! PDF link rectangles live in page user space (points, bottom-left
//! origin). Slides want top-left origin. Converting to page *fractions* here
//! decouples extraction from the slide canvas: the converter later maps the
//! fractions through the same [`crate::geometry::Placement`] as the page
//! picture.

use pdfium_render::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Where a hyperlink points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum LinkTarget {
    /// External URI (web page, `mailto:`, remote file).
    Uri(String),
    /// Another page of the same document (0-based), i.e. another slide.
    Page(usize),
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Uri(uri) => f.write_str(uri),
            LinkTarget::Page(idx) => write!(f, "page {}", idx + 1),
        }
    }
}

/// A link rectangle as fractions of the page, top-left origin.
///
/// Always normalised so that `x0 <= x1` and `y0 <= y1`. Values may fall
/// slightly outside 0..1 for annotations that overhang the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl LinkRect {
    /// Convert a rectangle in PDF user space to page fractions.
    pub fn from_pdf_rect(left: f64, bottom: f64, right: f64, top: f64, page: PageBox) -> Self {
        let fx = |x: f64| (x - page.left) / page.width;
        // flip: PDF y grows upwards
        let fy = |y: f64| (page.bottom + page.height - y) / page.height;

        let (ax, bx) = (fx(left), fx(right));
        let (ay, by) = (fy(top), fy(bottom));
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    /// True when the rectangle has no clickable area.
    pub fn is_empty(&self) -> bool {
        !(self.x1 > self.x0 && self.y1 > self.y0)
    }
}

/// The visible page area in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// One clickable region of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperlink {
    pub rect: LinkRect,
    pub target: LinkTarget,
}

/// Links of one page plus the number that could not be reproduced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLinks {
    pub links: Vec<Hyperlink>,
    pub skipped: usize,
}

/// Decide whether an in-document jump is worth keeping.
///
/// Jumps to the page the link sits on are no-ops on a slide, and targets
/// past the end of the document cannot be resolved to a slide.
pub fn keep_page_target(target: usize, own_page: usize, page_count: usize) -> bool {
    target != own_page && target < page_count
}

/// Read every link annotation of `page` (0-based `page_index`).
pub fn extract_links(
    page: &PdfPage,
    page_index: usize,
    page_count: usize,
    page_box: PageBox,
) -> PageLinks {
    let mut out = PageLinks::default();

    for link in page.links().iter() {
        let rect = match link.rect() {
            Ok(r) => LinkRect::from_pdf_rect(
                r.left().value as f64,
                r.bottom().value as f64,
                r.right().value as f64,
                r.top().value as f64,
                page_box,
            ),
            Err(e) => {
                warn!("Page {}: link without a rectangle skipped: {:?}", page_index + 1, e);
                out.skipped += 1;
                continue;
            }
        };

        if rect.is_empty() {
            debug!("Page {}: zero-area link skipped", page_index + 1);
            out.skipped += 1;
            continue;
        }

        match resolve_target(&link) {
            Ok(LinkTarget::Page(target)) if !keep_page_target(target, page_index, page_count) => {
                debug!(
                    "Page {}: jump to page {} dropped (self or out of range)",
                    page_index + 1,
                    target + 1
                );
                out.skipped += 1;
            }
            Ok(target) => out.links.push(Hyperlink { rect, target }),
            Err(kind) => {
                warn!("Page {}: {} skipped", page_index + 1, kind);
                out.skipped += 1;
            }
        }
    }

    out
}

/// A link annotation that cannot become a slide overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedLink {
    /// GoToR: a page of another PDF file.
    RemoteFile,
    /// GoToE: a page of a PDF embedded in this one.
    EmbeddedFile,
    /// Launches an application or opens a file.
    Launch,
    /// No usable action or destination.
    Other,
}

impl fmt::Display for UnsupportedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnsupportedLink::RemoteFile => "remote-file link (into another PDF)",
            UnsupportedLink::EmbeddedFile => "embedded-file link",
            UnsupportedLink::Launch => "launch link",
            UnsupportedLink::Other => "link without a usable target",
        })
    }
}

/// Map a pdfium link to a target. URI actions and local destinations are
/// supported; launch, remote and embedded destinations are not.
fn resolve_target(link: &PdfLink) -> Result<LinkTarget, UnsupportedLink> {
    if let Some(action) = link.action() {
        return match action {
            PdfAction::Uri(uri) => uri
                .uri()
                .ok()
                .filter(|u| !u.is_empty())
                .map(LinkTarget::Uri)
                .ok_or(UnsupportedLink::Other),
            PdfAction::LocalDestination(local) => local
                .destination()
                .ok()
                .and_then(|d| d.page_index().ok())
                .map(|idx| LinkTarget::Page(idx as usize))
                .ok_or(UnsupportedLink::Other),
            PdfAction::RemoteDestination(_) => Err(UnsupportedLink::RemoteFile),
            PdfAction::EmbeddedDestination(_) => Err(UnsupportedLink::EmbeddedFile),
            PdfAction::Launch(_) => Err(UnsupportedLink::Launch),
            _ => Err(UnsupportedLink::Other),
        };
    }

    link.destination()
        .and_then(|d| d.page_index().ok())
        .map(|idx| LinkTarget::Page(idx as usize))
        .ok_or(UnsupportedLink::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: PageBox = PageBox {
        left: 0.0,
        bottom: 0.0,
        width: 612.0,
        height: 792.0,
    };

    #[test]
    fn flips_y_axis() {
        // a link hugging the top-left corner in PDF space
        let r = LinkRect::from_pdf_rect(0.0, 742.0, 306.0, 792.0, LETTER);
        assert_eq!(r.x0, 0.0);
        assert_eq!(r.x1, 0.5);
        assert_eq!(r.y0, 0.0);
        assert!((r.y1 - 50.0 / 792.0).abs() < 1e-12);
    }

    #[test]
    fn normalises_inverted_corners() {
        let a = LinkRect::from_pdf_rect(100.0, 100.0, 200.0, 150.0, LETTER);
        let b = LinkRect::from_pdf_rect(200.0, 150.0, 100.0, 100.0, LETTER);
        assert_eq!(a, b);
        assert!(a.x0 < a.x1 && a.y0 < a.y1);
    }

    #[test]
    fn honours_crop_box_origin() {
        let cropped = PageBox {
            left: 50.0,
            bottom: 50.0,
            width: 500.0,
            height: 700.0,
        };
        let r = LinkRect::from_pdf_rect(50.0, 50.0, 550.0, 750.0, cropped);
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn zero_area_is_empty() {
        let r = LinkRect::from_pdf_rect(10.0, 10.0, 10.0, 40.0, LETTER);
        assert!(r.is_empty());
    }

    #[test]
    fn self_and_out_of_range_jumps_are_dropped() {
        assert!(keep_page_target(2, 0, 5));
        assert!(!keep_page_target(0, 0, 5));
        assert!(!keep_page_target(5, 0, 5));
    }

    #[test]
    fn unsupported_kinds_are_named() {
        assert!(UnsupportedLink::RemoteFile.to_string().starts_with("remote-file link"));
        assert_eq!(UnsupportedLink::Launch.to_string(), "launch link");
        assert_ne!(
            UnsupportedLink::EmbeddedFile.to_string(),
            UnsupportedLink::Other.to_string()
        );
    }

    #[test]
    fn target_display() {
        assert_eq!(LinkTarget::Uri("https://example.com".into()).to_string(), "https://example.com");
        assert_eq!(LinkTarget::Page(2).to_string(), "page 3");
    }
}
