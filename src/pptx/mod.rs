//! Presentation output.
//!
//! [`PresentationBuilder`] is what the converter writes slides into.
//! [`PptxWriter`] is the OOXML implementation: it streams a `.pptx` package
//! into any `Write + Seek`, so nothing but the current slide is held in
//! memory.
//!
//! Package layout:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/{core,app}.xml
//! ppt/presentation.xml            (+ _rels)
//! ppt/slideMasters/slideMaster1.xml (+ _rels)
//! ppt/slideLayouts/slideLayout1.xml (+ _rels)
//! ppt/theme/theme1.xml
//! ppt/{presProps,viewProps,tableStyles}.xml
//! ppt/slides/slideN.xml           (+ _rels)   one per page
//! ppt/media/imageN.{png,emf}                  one per page
//! ```

pub(crate) mod parts;
pub(crate) mod slide;

use crate::error::Pdf2PptxError;
use crate::geometry::{EmuRect, SlideCanvas};
use crate::pipeline::links::LinkTarget;
use crate::pipeline::render::PageGraphic;
use std::io::{Seek, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A clickable region on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOverlay {
    pub rect: EmuRect,
    pub target: LinkTarget,
}

/// Everything one slide shows.
#[derive(Debug, Clone)]
pub struct SlideContent {
    pub picture: PageGraphic,
    /// Where the picture sits on the slide.
    pub placement: EmuRect,
    pub links: Vec<LinkOverlay>,
}

/// Sink for slides, in presentation order.
pub trait PresentationBuilder {
    type Output;

    /// Append the next slide.
    fn add_slide(&mut self, slide: SlideContent) -> Result<(), Pdf2PptxError>;

    /// Complete the presentation. Fails when fewer slides were added than
    /// announced.
    fn finish(self) -> Result<Self::Output, Pdf2PptxError>;
}

/// Streams a `.pptx` package with a fixed number of slides into `W`.
///
/// ```rust,no_run
/// use pdf2pptx::{PptxWriter, SlideCanvas};
/// use std::io::Cursor;
///
/// let canvas = SlideCanvas { width: 9_144_000, height: 5_143_500 };
/// let writer = PptxWriter::new(Cursor::new(Vec::new()), canvas, 3)?;
/// # Ok::<(), pdf2pptx::Pdf2PptxError>(())
/// ```
pub struct PptxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    slide_count: usize,
    written: usize,
}

impl<W: Write + Seek> PptxWriter<W> {
    /// Start a package of `slide_count` slides of size `canvas`.
    ///
    /// All parts that do not depend on slide content are written here.
    pub fn new(writer: W, canvas: SlideCanvas, slide_count: usize) -> Result<Self, Pdf2PptxError> {
        if slide_count == 0 {
            return Err(Pdf2PptxError::PackageWriteFailed(
                "a presentation needs at least one slide".into(),
            ));
        }

        let mut this = Self {
            zip: ZipWriter::new(writer),
            slide_count,
            written: 0,
        };

        this.add_xml("[Content_Types].xml", parts::content_types_xml(slide_count))?;
        this.add_xml("_rels/.rels", parts::root_rels_xml())?;
        this.add_xml("docProps/core.xml", parts::core_xml())?;
        this.add_xml("docProps/app.xml", parts::app_xml(slide_count))?;
        this.add_xml("ppt/presentation.xml", parts::presentation_xml(canvas, slide_count))?;
        this.add_xml(
            "ppt/_rels/presentation.xml.rels",
            parts::presentation_rels_xml(slide_count),
        )?;
        this.add_xml("ppt/slideMasters/slideMaster1.xml", parts::slide_master_xml())?;
        this.add_xml(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::slide_master_rels_xml(),
        )?;
        this.add_xml("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout_xml())?;
        this.add_xml(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::slide_layout_rels_xml(),
        )?;
        this.add_xml("ppt/theme/theme1.xml", parts::theme_xml())?;
        this.add_xml("ppt/presProps.xml", parts::pres_props_xml())?;
        this.add_xml("ppt/viewProps.xml", parts::view_props_xml())?;
        this.add_xml("ppt/tableStyles.xml", parts::table_styles_xml())?;

        debug!(
            "PPTX skeleton written: {} slides at {}x{} EMU",
            slide_count, canvas.width, canvas.height
        );
        Ok(this)
    }

    /// Slides added so far.
    pub fn slides_written(&self) -> usize {
        self.written
    }

    fn add_xml(&mut self, path: &str, xml: String) -> Result<(), Pdf2PptxError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.add_part(path, xml.as_bytes(), options)
    }

    fn add_part(
        &mut self,
        path: &str,
        content: &[u8],
        options: SimpleFileOptions,
    ) -> Result<(), Pdf2PptxError> {
        self.zip.start_file(path, options)?;
        self.zip
            .write_all(content)
            .map_err(|e| Pdf2PptxError::PackageWriteFailed(format!("{path}: {e}")))
    }
}

impl<W: Write + Seek> PresentationBuilder for PptxWriter<W> {
    type Output = W;

    fn add_slide(&mut self, content: SlideContent) -> Result<(), Pdf2PptxError> {
        if self.written >= self.slide_count {
            return Err(Pdf2PptxError::PackageWriteFailed(format!(
                "presentation was declared with {} slides",
                self.slide_count
            )));
        }
        if let Some(bad) = content.links.iter().find_map(|l| match l.target {
            LinkTarget::Page(p) if p >= self.slide_count => Some(p),
            _ => None,
        }) {
            return Err(Pdf2PptxError::PackageWriteFailed(format!(
                "link to slide {} of {}",
                bad + 1,
                self.slide_count
            )));
        }

        let n = self.written + 1;
        let media_name = format!("image{}.{}", n, content.picture.format.extension());

        self.add_xml(&format!("ppt/slides/slide{n}.xml"), slide::slide_xml(n, &content))?;
        self.add_xml(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide::slide_rels_xml(&content, &media_name),
        )?;
        // media is stored, XML deflated
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.add_part(&format!("ppt/media/{media_name}"), &content.picture.data, stored)?;

        self.written = n;
        debug!(
            "Slide {} written: {} bytes {}, {} links",
            n,
            content.picture.data.len(),
            content.picture.format.extension(),
            content.links.len()
        );
        Ok(())
    }

    fn finish(self) -> Result<W, Pdf2PptxError> {
        if self.written != self.slide_count {
            return Err(Pdf2PptxError::PackageWriteFailed(format!(
                "only {} of {} slides were written",
                self.written, self.slide_count
            )));
        }
        Ok(self.zip.finish()?)
    }
}
