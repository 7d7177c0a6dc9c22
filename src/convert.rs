//! Conversion entry points.
//!
//! [`convert`] wires the real collaborators together: pdfium for pages and
//! links, Inkscape for vector mode, and [`write_presentation`] streaming a
//! [`PptxWriter`] into a temp file that is renamed over the output only
//! after the last slide.
//!
//! [`convert_document`] is the page loop on its own, generic over the
//! [`PageSource`], [`VectorConverter`] and [`PresentationBuilder`] seams. It
//! is a single forward pass: one page in, one slide out, first error wins.

use crate::config::{AspectRatioSetting, ConversionConfig, RenderMode};
use crate::error::Pdf2PptxError;
use crate::geometry::{AspectRatio, PageSize, SlideCanvas};
use crate::output::{ConversionStats, DocumentInfo, PageInfo};
use crate::pipeline::input;
use crate::pipeline::links::{keep_page_target, LinkTarget};
use crate::pipeline::render::{self, PageGraphic, PageSource, PdfiumSource};
use crate::pipeline::vector::{InkscapeConverter, VectorConverter};
use crate::pptx::{LinkOverlay, PptxWriter, PresentationBuilder, SlideContent};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Convert the PDF at `input` into a presentation at `output`.
///
/// One slide per page, in page order. The output file appears only when
/// every slide was written; on error nothing is left behind.
///
/// # Errors
/// The first failure aborts the run:
/// - input missing, unreadable, or not a PDF
/// - vector mode without a working Inkscape
/// - PDF corrupt, encrypted, or empty
/// - any page failing to render or vectorise
/// - the output file cannot be written
///
/// # Example
/// ```rust,no_run
/// use pdf2pptx::{convert, ConversionConfig};
///
/// let config = ConversionConfig::builder().dpi(300).build()?;
/// let stats = convert("talk.pdf", "talk.pptx", &config)?;
/// println!("{} slides, {} links", stats.slides_written, stats.links_written);
/// # Ok::<(), pdf2pptx::Pdf2PptxError>(())
/// ```
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let total_start = Instant::now();
    let output = output.as_ref();
    info!(
        "Starting conversion: {} → {} ({} mode)",
        input.as_ref().display(),
        output.display(),
        config.render_mode
    );

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_local(input)?;

    // ── Step 2: Probe the vector tool before any rendering ───────────────
    let vector = match config.render_mode {
        RenderMode::Vector => Some(InkscapeConverter::new(
            config.inkscape_path.as_deref(),
            &pdf_path,
            Duration::from_secs(config.vector_timeout_secs),
        )?),
        RenderMode::Raster => None,
    };

    // ── Step 3: Open the document ────────────────────────────────────────
    let pdfium = render::bind_pdfium()?;
    let source = PdfiumSource::open(&pdfium, &pdf_path, config.password.as_deref())?;
    let page_count = source.page_count();
    if page_count == 0 {
        return Err(Pdf2PptxError::EmptyDocument { path: pdf_path });
    }

    // ── Step 4: Fix the slide canvas from the first page ─────────────────
    let (ratio, canvas) = plan_canvas(source.page_size(0)?, &config.aspect_ratio)?;

    // ── Step 5: Write slides and move the package into place ─────────────
    let vector_ref = vector.as_ref().map(|v| v as &dyn VectorConverter);
    let mut stats = write_presentation(&source, vector_ref, canvas, config, output)?;

    stats.aspect_ratio = ratio.to_string();
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} slides, {} links, {}ms total",
        stats.slides_written, stats.links_written, stats.total_duration_ms
    );
    Ok(stats)
}

/// Write every page of `source` as a `.pptx` at `output`.
///
/// Slides are streamed into a temp file in the output's directory, which is
/// renamed over `output` only after the package is complete and synced. On
/// any error the temp file is removed and `output` is left untouched.
pub fn write_presentation<S>(
    source: &S,
    vector: Option<&dyn VectorConverter>,
    canvas: SlideCanvas,
    config: &ConversionConfig,
    output: &Path,
) -> Result<ConversionStats, Pdf2PptxError>
where
    S: PageSource + ?Sized,
{
    let write_failed = |source: std::io::Error| Pdf2PptxError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    };
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_failed)?;
    debug!("Writing package to {}", tmp.path().display());

    let builder = PptxWriter::new(tmp.as_file_mut(), canvas, source.page_count())?;
    let (file, stats) = convert_document(source, vector, builder, canvas, config)?;
    file.sync_all().map_err(write_failed)?;

    tmp.persist(output).map_err(|e| write_failed(e.error))?;
    Ok(stats)
}

/// Turn every page of `source` into a slide of `builder`.
///
/// Pictures come from `vector` when given, otherwise from the source's own
/// rasteriser at `config.dpi`. Page pictures are fitted into `canvas` and
/// links are mapped through the same placement.
///
/// Progress callbacks fire per page. The first page error is reported via
/// `on_page_error` and returned; `builder` is dropped unfinished.
pub fn convert_document<S, B>(
    source: &S,
    vector: Option<&dyn VectorConverter>,
    mut builder: B,
    canvas: SlideCanvas,
    config: &ConversionConfig,
) -> Result<(B::Output, ConversionStats), Pdf2PptxError>
where
    S: PageSource + ?Sized,
    B: PresentationBuilder,
{
    let start = Instant::now();
    let total = source.page_count();

    if config.render_mode == RenderMode::Vector && vector.is_none() {
        return Err(Pdf2PptxError::VectorToolMissing {
            path: config.inkscape_path.clone(),
            reason: "no vector converter available".into(),
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let mut render_time = Duration::ZERO;
    let mut links_written = 0;
    let mut links_skipped = 0;

    for index in 0..total {
        let page_num = index + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }

        let result = build_slide(source, vector, canvas, config, index).and_then(|built| {
            let links = built.content.links.len();
            builder.add_slide(built.content)?;
            Ok((links, built.skipped, built.render_time))
        });

        match result {
            Ok((links, skipped, elapsed)) => {
                render_time += elapsed;
                links_written += links;
                links_skipped += skipped;
                debug!("Page {}/{} → slide ({} links)", page_num, total, links);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total, links);
                }
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    let output = builder.finish()?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total);
    }

    let aspect_ratio = AspectRatio::from_f64(canvas.ratio())
        .map(|r| r.to_string())
        .unwrap_or_default();

    let stats = ConversionStats {
        total_pages: total,
        slides_written: total,
        links_written,
        links_skipped,
        render_mode: config.render_mode,
        aspect_ratio,
        canvas,
        render_duration_ms: render_time.as_millis() as u64,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Wrote {} slides in {}ms ({}ms rendering)",
        total, stats.total_duration_ms, stats.render_duration_ms
    );

    Ok((output, stats))
}

/// Choose the presentation's aspect ratio and slide canvas.
///
/// `Auto` takes the first page's ratio. A fixed ratio wins over the
/// document's, with a warning when the two differ, since pages will then be
/// letterboxed.
pub fn plan_canvas(
    first_page: PageSize,
    setting: &AspectRatioSetting,
) -> Result<(AspectRatio, SlideCanvas), Pdf2PptxError> {
    let ratio = match setting {
        AspectRatioSetting::Auto => {
            if !first_page.is_valid() {
                return Err(Pdf2PptxError::PageRenderFailed {
                    page: 1,
                    detail: format!(
                        "cannot derive an aspect ratio from a {}x{} page",
                        first_page.width, first_page.height
                    ),
                });
            }
            let ratio = AspectRatio::of_page(first_page)?;
            info!("Using the document's aspect ratio {}", ratio);
            ratio
        }
        AspectRatioSetting::Fixed(ratio) => {
            if first_page.is_valid() {
                if let Ok(document) = AspectRatio::of_page(first_page) {
                    if document != *ratio {
                        warn!(
                            "Aspect ratio {} differs from the document's {}; pages will be letterboxed",
                            ratio, document
                        );
                    }
                }
            }
            *ratio
        }
    };

    let canvas = SlideCanvas::for_ratio(ratio);
    debug!(
        "Slide canvas {}x{} EMU for ratio {}",
        canvas.width, canvas.height, ratio
    );
    Ok((ratio, canvas))
}

/// Read document metadata, page sizes and link counts without converting.
pub fn inspect(
    input: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentInfo, Pdf2PptxError> {
    let pdf_path = input::resolve_local(input)?;
    let pdfium = render::bind_pdfium()?;
    let source = PdfiumSource::open(&pdfium, &pdf_path, password)?;

    let mut info = source.document_info();
    for index in 0..source.page_count() {
        let size = source.page_size(index)?;
        let links = source.page_links(index)?;
        info.pages.push(PageInfo {
            page_num: index + 1,
            size,
            link_count: links.links.len(),
        });
    }

    info.aspect_ratio = info
        .pages
        .first()
        .filter(|p| p.size.is_valid())
        .and_then(|p| AspectRatio::of_page(p.size).ok())
        .map(|r| r.to_string());

    Ok(info)
}

// ── Internal helpers ─────────────────────────────────────────────────────

struct BuiltSlide {
    content: SlideContent,
    skipped: usize,
    render_time: Duration,
}

fn build_slide<S: PageSource + ?Sized>(
    source: &S,
    vector: Option<&dyn VectorConverter>,
    canvas: SlideCanvas,
    config: &ConversionConfig,
    index: usize,
) -> Result<BuiltSlide, Pdf2PptxError> {
    let page_num = index + 1;
    let total = source.page_count();

    let size = source.page_size(index)?;
    if !size.is_valid() {
        return Err(Pdf2PptxError::PageRenderFailed {
            page: page_num,
            detail: format!("page has no visible area ({}x{} pt)", size.width, size.height),
        });
    }
    let placement = canvas.place(size);

    let render_start = Instant::now();
    let picture: PageGraphic = match vector {
        Some(v) => v.convert_page_to_vector(index)?,
        None => source.render_page_to_image(index, config.dpi, config.max_rendered_pixels)?,
    };
    let render_time = render_start.elapsed();

    let page_links = source.page_links(index)?;
    let mut skipped = page_links.skipped;
    let mut links = Vec::with_capacity(page_links.links.len());
    for link in page_links.links {
        if let LinkTarget::Page(target) = link.target {
            if !keep_page_target(target, index, total) {
                debug!("Page {}: jump to page {} dropped", page_num, target + 1);
                skipped += 1;
                continue;
            }
        }

        let rect = placement.map_rect(link.rect.x0, link.rect.y0, link.rect.x1, link.rect.y1);
        if rect.width <= 0 || rect.height <= 0 {
            warn!("Page {}: link to {} is too small to place", page_num, link.target);
            skipped += 1;
            continue;
        }
        links.push(LinkOverlay {
            rect,
            target: link.target,
        });
    }

    Ok(BuiltSlide {
        content: SlideContent {
            picture,
            placement: placement.to_emu(),
            links,
        },
        skipped,
        render_time,
    })
}
