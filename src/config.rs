//! Configuration types for PDF-to-PowerPoint conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The CLI maps its flags onto the
//! builder one-to-one; library callers set only the knobs they care about.

use crate::error::Pdf2PptxError;
use crate::geometry::AspectRatio;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for a PDF-to-PowerPoint conversion.
///
/// # Example
/// ```rust
/// use pdf2pptx::{AspectRatioSetting, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .aspect_ratio("16:9".parse::<AspectRatioSetting>().unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Raster (pdfium bitmap) or vector (Inkscape EMF) rendering. Default: raster.
    pub render_mode: RenderMode,

    /// Rendering DPI for raster mode. Ignored in vector mode. Default: 600.
    ///
    /// The page is rendered at `dpi / 72` pixels per point, so a US Letter
    /// page at 600 DPI is 5100 × 6600 px.
    pub dpi: u32,

    /// Maximum rendered bitmap side in pixels. Default: 16 384.
    ///
    /// A cap independent of DPI: a 600-DPI render of an A0 poster would be
    /// roughly 20 000 × 28 000 px. pdfium scales the other side down
    /// proportionally when the cap bites.
    pub max_rendered_pixels: u32,

    /// Slide aspect ratio. Default: derived from the first page.
    pub aspect_ratio: AspectRatioSetting,

    /// Inkscape executable. Required in vector mode.
    pub inkscape_path: Option<PathBuf>,

    /// Per-page limit for one Inkscape invocation, in seconds. Default: 300.
    pub vector_timeout_secs: u64,

    /// PDF user password for encrypted documents (raster mode).
    pub password: Option<String>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            dpi: 600,
            max_rendered_pixels: 16_384,
            aspect_ratio: AspectRatioSetting::default(),
            inkscape_path: None,
            vector_timeout_secs: 300,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("render_mode", &self.render_mode)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("inkscape_path", &self.inkscape_path)
            .field("vector_timeout_secs", &self.vector_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.config.render_mode = mode;
        self
    }

    /// Shorthand for `render_mode(RenderMode::Vector)` when `v` is true.
    pub fn vector(mut self, v: bool) -> Self {
        self.config.render_mode = if v { RenderMode::Vector } else { RenderMode::Raster };
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn aspect_ratio(mut self, setting: AspectRatioSetting) -> Self {
        self.config.aspect_ratio = setting;
        self
    }

    pub fn inkscape_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.inkscape_path = Some(path.into());
        self
    }

    pub fn vector_timeout_secs(mut self, secs: u64) -> Self {
        self.config.vector_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing Inkscape path in vector mode is not a configuration error:
    /// it is reported as [`Pdf2PptxError::VectorToolMissing`] when the
    /// conversion starts, after the input has been checked.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(Pdf2PptxError::InvalidConfig("DPI must be a positive integer".into()));
        }
        if c.max_rendered_pixels < 16 {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "max rendered pixels must be ≥ 16, got {}",
                c.max_rendered_pixels
            )));
        }
        if c.vector_timeout_secs == 0 {
            return Err(Pdf2PptxError::InvalidConfig(
                "vector timeout must be at least 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How each page is turned into the picture placed on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rasterise with pdfium at the configured DPI and embed a PNG. (default)
    #[default]
    Raster,
    /// Convert with Inkscape and embed an EMF. Scales without blurring but
    /// depends on an external executable.
    Vector,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Raster => f.write_str("raster"),
            RenderMode::Vector => f.write_str("vector"),
        }
    }
}

/// Where the slide aspect ratio comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatioSetting {
    /// Use the first page's ratio. (default)
    #[default]
    Auto,
    /// Use this ratio for every slide; pages are letterboxed to fit.
    Fixed(AspectRatio),
}

impl FromStr for AspectRatioSetting {
    type Err = Pdf2PptxError;

    /// `auto` (any case) or anything [`AspectRatio`] parses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(AspectRatioSetting::Auto);
        }
        s.parse().map(AspectRatioSetting::Fixed)
    }
}

impl fmt::Display for AspectRatioSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatioSetting::Auto => f.write_str("auto"),
            AspectRatioSetting::Fixed(r) => r.fmt(f),
        }
    }
}
