//! Line box geometry: where the baseline sits inside a line of a given height.

use crate::metrics::FontMetrics;

/// How tall a line box is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineHeight {
    /// Ascender minus descender plus the font's line gap.
    #[default]
    Normal,
    /// A multiple of the font size.
    Multiplier(f64),
    /// An absolute height in text space units.
    Explicit(f64),
}

impl LineHeight {
    /// Resolve to an absolute height.
    ///
    /// `normal` is the height [`LineHeight::Normal`] stands for.
    pub fn resolve(self, font_size: f64, normal: f64) -> f64 {
        match self {
            LineHeight::Normal => normal,
            LineHeight::Multiplier(m) => font_size * m,
            LineHeight::Explicit(h) => h,
        }
    }
}

/// Vertical layout of one line.
///
/// All values are in the same (already font-size scaled) units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineBox {
    /// Total line height L.
    pub height: f64,
    /// Distance from the top of the box down to the baseline.
    pub baseline_offset: f64,
    /// Distance from the baseline down to the bottom of the box.
    pub below_baseline: f64,
    /// Space added above and below the glyph content; never negative.
    pub half_leading: f64,
}

impl LineBox {
    /// Lay out a line of height `line_height` around content spanning
    /// `ascender` above and `descender` (zero or negative) below the baseline.
    ///
    /// When the line is shorter than the content, the half-leading clamps
    /// to zero and the content overflows the box.
    pub fn new(ascender: f64, descender: f64, line_height: f64) -> Self {
        let content_height = ascender - descender;
        let half_leading = ((line_height - content_height) / 2.0).max(0.0);
        Self {
            height: line_height,
            baseline_offset: half_leading + ascender,
            below_baseline: half_leading - descender,
            half_leading,
        }
    }

    /// Lay out a line for `metrics` shown at `font_size`.
    pub fn from_metrics(metrics: &dyn FontMetrics, font_size: f64, line_height: LineHeight) -> Self {
        let scale = font_size / metrics.units_per_em();
        let ascender = metrics.ascender() * scale;
        let descender = metrics.descender() * scale;
        let normal = ascender - descender + metrics.line_gap() * scale;
        Self::new(ascender, descender, line_height.resolve(font_size, normal))
    }

    /// Height of the glyph content (ascender minus descender).
    pub fn content_height(&self) -> f64 {
        self.baseline_offset + self.below_baseline - 2.0 * self.half_leading
    }

    /// Distance from the top of the box to the top of the glyph content.
    pub fn top_offset(&self) -> f64 {
        self.half_leading
    }
}
