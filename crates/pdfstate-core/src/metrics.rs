//! Font metrics collaborator.
//!
//! Font program parsing happens elsewhere. This module only describes what
//! the text-positioning code needs from a font: advance widths, vertical
//! metrics, writing mode and how many bytes make up one character code.

use crate::displacement::WritingMode;

/// Default ascent when not specified (750/1000 of text space).
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
const DEFAULT_WIDTH: f64 = 600.0;

/// Number of bytes per character code in a shown string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeWidth {
    /// Simple fonts: one byte per code.
    #[default]
    SingleByte,
    /// Composite fonts with a two-byte CMap (e.g. Identity-H).
    TwoByte,
}

impl CodeWidth {
    /// Split a shown string into character codes.
    ///
    /// A trailing odd byte in two-byte mode becomes its own code.
    pub fn codes(self, bytes: &[u8]) -> Vec<u32> {
        match self {
            CodeWidth::SingleByte => bytes.iter().map(|&b| u32::from(b)).collect(),
            CodeWidth::TwoByte => bytes
                .chunks(2)
                .map(|pair| match *pair {
                    [hi, lo] => (u32::from(hi) << 8) | u32::from(lo),
                    [single] => u32::from(single),
                    _ => 0,
                })
                .collect(),
        }
    }
}

/// Metrics a font must provide, in glyph space units.
pub trait FontMetrics {
    /// Glyph space units per text space unit.
    fn units_per_em(&self) -> f64 {
        1000.0
    }

    /// Horizontal advance (w0) for a character code.
    fn advance_width(&self, code: u32) -> f64;

    /// Vertical advance (w1) for a character code. Negative moves down.
    fn vertical_advance(&self, _code: u32) -> f64 {
        -1000.0
    }

    /// Ascender above the baseline (positive).
    fn ascender(&self) -> f64;

    /// Descender below the baseline (zero or negative).
    fn descender(&self) -> f64;

    /// Extra gap between lines.
    fn line_gap(&self) -> f64 {
        0.0
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    fn code_width(&self) -> CodeWidth {
        CodeWidth::SingleByte
    }
}

/// Widths-table metrics of a simple font (/Widths, /FirstChar, /LastChar
/// and the /FontDescriptor entries).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleFontMetrics {
    /// Glyph widths indexed by (code - first_char).
    widths: Vec<f64>,
    first_char: u32,
    last_char: u32,
    /// Width for codes outside [first_char, last_char].
    missing_width: f64,
    ascent: f64,
    descent: f64,
    /// Font bounding box [llx, lly, urx, ury].
    font_bbox: Option<[f64; 4]>,
    writing_mode: WritingMode,
    code_width: CodeWidth,
}

impl SimpleFontMetrics {
    pub fn new(
        widths: Vec<f64>,
        first_char: u32,
        last_char: u32,
        missing_width: f64,
        ascent: f64,
        descent: f64,
        font_bbox: Option<[f64; 4]>,
    ) -> Self {
        Self {
            widths,
            first_char,
            last_char,
            missing_width,
            ascent,
            descent,
            font_bbox,
            writing_mode: WritingMode::Horizontal,
            code_width: CodeWidth::SingleByte,
        }
    }

    /// Metrics used when a font supplies nothing: every glyph 600 wide,
    /// ascent 750, descent -250.
    pub fn default_metrics() -> Self {
        Self::new(
            Vec::new(),
            0,
            0,
            DEFAULT_WIDTH,
            DEFAULT_ASCENT,
            DEFAULT_DESCENT,
            None,
        )
    }

    /// Same metrics, laid out vertically.
    pub fn with_writing_mode(mut self, mode: WritingMode) -> Self {
        self.writing_mode = mode;
        self
    }

    /// Same metrics, read with two-byte codes.
    pub fn with_code_width(mut self, code_width: CodeWidth) -> Self {
        self.code_width = code_width;
        self
    }

    pub fn font_bbox(&self) -> Option<[f64; 4]> {
        self.font_bbox
    }

    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }
}

impl Default for SimpleFontMetrics {
    fn default() -> Self {
        Self::default_metrics()
    }
}

impl FontMetrics for SimpleFontMetrics {
    fn advance_width(&self, code: u32) -> f64 {
        if code >= self.first_char && code <= self.last_char {
            let index = (code - self.first_char) as usize;
            if let Some(&w) = self.widths.get(index) {
                return w;
            }
        }
        self.missing_width
    }

    fn ascender(&self) -> f64 {
        self.ascent
    }

    fn descender(&self) -> f64 {
        self.descent
    }

    fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    fn code_width(&self) -> CodeWidth {
        self.code_width
    }
}
