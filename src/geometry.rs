//! Slide geometry: aspect ratios, the shared slide canvas, and page placement.
//!
//! PowerPoint measures everything in EMU (English Metric Units): 914 400 per
//! inch, 12 700 per PDF point. All geometry that ends up in the package is
//! integral EMU; the intermediate maths stays in `f64` so that a page image
//! and the hyperlinks drawn on top of it go through exactly the same
//! transform.

use crate::error::Pdf2PptxError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// EMU per PDF point (1/72 inch).
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Width of the reference 16:9 box the canvas is fitted into (10 in).
pub const MAX_CANVAS_WIDTH: i64 = 9_144_000;

/// Height of the reference 16:9 box the canvas is fitted into (5.625 in).
pub const MAX_CANVAS_HEIGHT: i64 = 5_143_500;

/// Smallest slide side PowerPoint accepts in `p:sldSz` (1 in).
pub const MIN_SLIDE_SIDE: i64 = 914_400;

/// Largest slide side PowerPoint accepts in `p:sldSz` (56 in).
pub const MAX_SLIDE_SIDE: i64 = 51_206_400;

/// Largest denominator kept when reducing a ratio.
pub const MAX_RATIO_DENOMINATOR: u64 = 100;

/// Narrowest accepted slide shape (1:56).
pub const MIN_RATIO: f64 = MIN_SLIDE_SIDE as f64 / MAX_SLIDE_SIDE as f64;

/// Widest accepted slide shape (56:1).
pub const MAX_RATIO: f64 = MAX_SLIDE_SIDE as f64 / MIN_SLIDE_SIDE as f64;

static RATIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*:\s*(\d+(?:\.\d+)?)\s*$").expect("valid aspect ratio regex")
});

// ── AspectRatio ──────────────────────────────────────────────────────────

/// A slide aspect ratio, kept as a reduced fraction `num:den`.
///
/// Ratios are snapped to the closest fraction whose denominator is at most
/// [`MAX_RATIO_DENOMINATOR`], so `612:792` (US Letter) becomes `17:22` and a
/// float such as `1.7777` becomes `16:9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AspectRatio {
    num: u64,
    den: u64,
}

impl AspectRatio {
    /// Build a ratio from integral parts. Both must be non-zero.
    pub fn new(num: u64, den: u64) -> Result<Self, Pdf2PptxError> {
        if num == 0 || den == 0 {
            return Err(Pdf2PptxError::InvalidAspectRatio {
                input: format!("{num}:{den}"),
                reason: "both sides must be positive".into(),
            });
        }
        Self::from_f64(num as f64 / den as f64)
    }

    /// Snap a positive finite value to the nearest `p/q` with `q <= 100`.
    ///
    /// Values outside [`MIN_RATIO`]`..=`[`MAX_RATIO`] are rejected: no slide
    /// PowerPoint accepts has that shape.
    pub fn from_f64(value: f64) -> Result<Self, Pdf2PptxError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Pdf2PptxError::InvalidAspectRatio {
                input: value.to_string(),
                reason: "ratio must be a positive number".into(),
            });
        }
        if !(MIN_RATIO..=MAX_RATIO).contains(&value) {
            return Err(Pdf2PptxError::InvalidAspectRatio {
                input: value.to_string(),
                reason: format!(
                    "ratio must lie between 1:{0} and {0}:1 (PowerPoint's slide size limits)",
                    MAX_SLIDE_SIDE / MIN_SLIDE_SIDE
                ),
            });
        }

        let mut best = (0u64, 1u64);
        let mut best_err = f64::INFINITY;
        for den in 1..=MAX_RATIO_DENOMINATOR {
            let num = (value * den as f64).round();
            if num < 1.0 {
                continue;
            }
            let err = (value - num / den as f64).abs();
            // Strict comparison keeps the smallest denominator on ties, which
            // is also the reduced form.
            if err < best_err {
                best_err = err;
                best = (num as u64, den);
            }
        }

        if best.0 == 0 {
            return Err(Pdf2PptxError::InvalidAspectRatio {
                input: value.to_string(),
                reason: format!("ratio is too small to express with a denominator ≤ {MAX_RATIO_DENOMINATOR}"),
            });
        }

        let g = gcd(best.0, best.1);
        Ok(Self {
            num: best.0 / g,
            den: best.1 / g,
        })
    }

    /// Ratio of a page given its size in points.
    pub fn of_page(size: PageSize) -> Result<Self, Pdf2PptxError> {
        Self::from_f64(size.width / size.height)
    }

    pub fn numerator(&self) -> u64 {
        self.num
    }

    pub fn denominator(&self) -> u64 {
        self.den
    }

    pub fn value(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.num, self.den)
    }
}

impl FromStr for AspectRatio {
    type Err = Pdf2PptxError;

    /// Accepts `W:H` (integers or decimals) or a bare positive decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Pdf2PptxError::InvalidAspectRatio {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let value = if let Some(caps) = RATIO_RE.captures(s) {
            let w: f64 = caps[1].parse().map_err(|_| invalid("width is not a number"))?;
            let h: f64 = caps[2].parse().map_err(|_| invalid("height is not a number"))?;
            if w <= 0.0 || h <= 0.0 {
                return Err(invalid("both sides must be positive"));
            }
            w / h
        } else {
            s.trim()
                .parse::<f64>()
                .map_err(|_| invalid("expected 'width:height' or a decimal"))?
        };

        if !value.is_finite() || value <= 0.0 {
            return Err(invalid("ratio must be positive"));
        }

        Self::from_f64(value).map_err(|e| match e {
            Pdf2PptxError::InvalidAspectRatio { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// ── PageSize ─────────────────────────────────────────────────────────────

/// Page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A page is usable for layout only if both sides are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

// ── SlideCanvas ──────────────────────────────────────────────────────────

/// The slide size shared by every slide in one presentation, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideCanvas {
    pub width: i64,
    pub height: i64,
}

impl SlideCanvas {
    /// Fit `ratio` into the 16:9 reference box.
    ///
    /// Uses integer arithmetic on the reduced fraction so that ratios whose
    /// sides divide the box exactly (16:9, 4:3, 3:2, ...) come out exact.
    /// Very narrow or very wide ratios are scaled up until the short side
    /// reaches [`MIN_SLIDE_SIDE`].
    pub fn for_ratio(ratio: AspectRatio) -> Self {
        let num = ratio.numerator() as i128;
        let den = ratio.denominator() as i128;

        let width_at_max_height = MAX_CANVAS_HEIGHT as i128 * num / den;
        let (mut width, mut height) = if width_at_max_height <= MAX_CANVAS_WIDTH as i128 {
            (width_at_max_height, MAX_CANVAS_HEIGHT as i128)
        } else {
            (MAX_CANVAS_WIDTH as i128, MAX_CANVAS_WIDTH as i128 * den / num)
        };

        // pin the short side to the minimum and derive the long side from
        // the fraction, so the ratio stays exact
        let min = MIN_SLIDE_SIDE as i128;
        if width < min && width <= height {
            width = min;
            height = min * den / num;
        } else if height < min {
            height = min;
            width = min * num / den;
        }

        Self {
            width: width.clamp(MIN_SLIDE_SIDE as i128, MAX_SLIDE_SIDE as i128) as i64,
            height: height.clamp(MIN_SLIDE_SIDE as i128, MAX_SLIDE_SIDE as i128) as i64,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Scale and centre a page of `page` points inside this canvas.
    pub fn place(&self, page: PageSize) -> Placement {
        let scale = (self.width as f64 / page.width).min(self.height as f64 / page.height);
        let width = page.width * scale;
        let height = page.height * scale;
        Placement {
            x: (self.width as f64 - width) / 2.0,
            y: (self.height as f64 - height) / 2.0,
            width,
            height,
        }
    }
}

// ── Placement ────────────────────────────────────────────────────────────

/// Where one page lands on the canvas, in (fractional) EMU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    /// The page image rectangle, rounded to whole EMU.
    pub fn to_emu(&self) -> EmuRect {
        EmuRect::from_edges(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Map a rectangle given as page fractions (top-left origin) into slide
    /// EMU through the same transform as the page image.
    pub fn map_rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> EmuRect {
        EmuRect::from_edges(
            self.x + x0 * self.width,
            self.y + y0 * self.height,
            self.x + x1 * self.width,
            self.y + y1 * self.height,
        )
    }

    /// Inverse of [`Placement::map_rect`]: slide EMU back to page fractions.
    pub fn unmap_rect(&self, rect: &EmuRect) -> (f64, f64, f64, f64) {
        (
            (rect.x as f64 - self.x) / self.width,
            (rect.y as f64 - self.y) / self.height,
            ((rect.x + rect.width) as f64 - self.x) / self.width,
            ((rect.y + rect.height) as f64 - self.y) / self.height,
        )
    }
}

/// An axis-aligned rectangle in whole EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmuRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl EmuRect {
    /// Round each edge independently so adjacent rectangles never overlap or
    /// leave a gap.
    fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let (l, r) = (left.min(right).round() as i64, left.max(right).round() as i64);
        let (t, b) = (top.min(bottom).round() as i64, top.max(bottom).round() as i64);
        Self {
            x: l,
            y: t,
            width: r - l,
            height: b - t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_ratio() {
        let r: AspectRatio = "16:9".parse().unwrap();
        assert_eq!((r.numerator(), r.denominator()), (16, 9));
        assert_eq!(r.to_string(), "16:9");
    }

    #[test]
    fn reduces_colon_ratio() {
        let r: AspectRatio = "1920:1080".parse().unwrap();
        assert_eq!(r.to_string(), "16:9");
    }

    #[test]
    fn parses_decimal_ratio() {
        let r: AspectRatio = "1.5".parse().unwrap();
        assert_eq!(r.to_string(), "3:2");
        let r: AspectRatio = "2.35:1".parse().unwrap();
        assert_eq!(r.to_string(), "47:20");
    }

    #[test]
    fn rejects_malformed_ratios() {
        for bad in ["abc", "", "16:", ":9", "16/9", "-4:3", "0:5", "16:0", "0", "-1.5", "inf", "NaN"] {
            let err = bad.parse::<AspectRatio>().unwrap_err();
            assert!(
                matches!(err, Pdf2PptxError::InvalidAspectRatio { .. }),
                "{bad:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn snaps_letter_page_to_small_fraction() {
        let r = AspectRatio::of_page(PageSize::new(612.0, 792.0)).unwrap();
        assert_eq!(r.to_string(), "17:22");
    }

    #[test]
    fn snaps_a4_page() {
        // 595.28 / 841.89 ≈ 0.70707 → 70/99 is the closest with q ≤ 100
        let r = AspectRatio::of_page(PageSize::new(595.28, 841.89)).unwrap();
        assert_eq!(r.to_string(), "70:99");
    }

    #[test]
    fn canvas_for_16_9_is_exact() {
        let c = SlideCanvas::for_ratio(AspectRatio::new(16, 9).unwrap());
        assert_eq!(c, SlideCanvas { width: 9_144_000, height: 5_143_500 });
        assert_eq!(c.width * 9, c.height * 16);
    }

    #[test]
    fn canvas_for_4_3_is_height_bound() {
        let c = SlideCanvas::for_ratio(AspectRatio::new(4, 3).unwrap());
        assert_eq!(c, SlideCanvas { width: 6_858_000, height: 5_143_500 });
    }

    #[test]
    fn canvas_for_wide_ratio_is_width_bound() {
        let c = SlideCanvas::for_ratio(AspectRatio::new(2, 1).unwrap());
        assert_eq!(c, SlideCanvas { width: 9_144_000, height: 4_572_000 });
    }

    #[test]
    fn canvas_for_narrow_ratio_respects_minimum_side() {
        let c = SlideCanvas::for_ratio(AspectRatio::new(1, 10).unwrap());
        assert!(c.width >= MIN_SLIDE_SIDE, "{c:?}");
        assert!(c.height <= MAX_SLIDE_SIDE, "{c:?}");
        assert!((c.ratio() - 0.1).abs() < 1e-3, "{c:?}");
    }

    #[test]
    fn rejects_ratios_powerpoint_cannot_hold() {
        for bad in ["100:1", "1:80", "57:1", "1e300", "0.001"] {
            let err = bad.parse::<AspectRatio>().unwrap_err();
            match err {
                Pdf2PptxError::InvalidAspectRatio { input, reason } => {
                    assert_eq!(input, bad);
                    assert!(reason.contains("1:56"), "{reason}");
                }
                other => panic!("{bad:?}: expected InvalidAspectRatio, got {other:?}"),
            }
        }
    }

    #[test]
    fn extreme_accepted_ratios_keep_their_shape() {
        let wide = SlideCanvas::for_ratio("56:1".parse().unwrap());
        assert_eq!(wide, SlideCanvas { width: MAX_SLIDE_SIDE, height: MIN_SLIDE_SIDE });

        let narrow = SlideCanvas::for_ratio("1:56".parse().unwrap());
        assert_eq!(narrow, SlideCanvas { width: MIN_SLIDE_SIDE, height: MAX_SLIDE_SIDE });

        let tall = SlideCanvas::for_ratio(AspectRatio::new(1, 20).unwrap());
        assert_eq!(tall.height, tall.width * 20);
    }

    #[test]
    fn placement_fills_matching_canvas() {
        let c = SlideCanvas::for_ratio(AspectRatio::new(16, 9).unwrap());
        let p = c.place(PageSize::new(960.0, 540.0)).to_emu();
        assert_eq!(p, EmuRect { x: 0, y: 0, width: c.width, height: c.height });
    }

    #[test]
    fn placement_letterboxes_portrait_page() {
        let c = SlideCanvas { width: 9_144_000, height: 5_143_500 };
        let p = c.place(PageSize::new(500.0, 1000.0)).to_emu();
        assert_eq!(p.height, 5_143_500);
        assert_eq!(p.width, 2_571_750);
        assert_eq!(p.y, 0);
        // centred horizontally
        assert_eq!(p.x, (9_144_000 - 2_571_750) / 2);
    }

    #[test]
    fn mapped_link_round_trips_within_one_emu() {
        let c = SlideCanvas { width: 6_858_000, height: 5_143_500 };
        let placement = c.place(PageSize::new(612.0, 792.0));
        let (x0, y0, x1, y1) = (0.125, 0.5, 0.375, 0.55);
        let rect = placement.map_rect(x0, y0, x1, y1);
        let back = placement.unmap_rect(&rect);

        let tol_x = 1.0 / placement.width;
        let tol_y = 1.0 / placement.height;
        assert!((back.0 - x0).abs() <= tol_x);
        assert!((back.1 - y0).abs() <= tol_y);
        assert!((back.2 - x1).abs() <= tol_x);
        assert!((back.3 - y1).abs() <= tol_y);
    }

    #[test]
    fn full_page_link_matches_image_rect() {
        let c = SlideCanvas { width: 9_144_000, height: 5_143_500 };
        let placement = c.place(PageSize::new(612.0, 792.0));
        assert_eq!(placement.map_rect(0.0, 0.0, 1.0, 1.0), placement.to_emu());
    }
}
