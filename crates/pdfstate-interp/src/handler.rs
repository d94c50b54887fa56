//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter reports what the state machine produces through
//! [`ContentHandler`]: one [`GlyphEvent`] per shown glyph, one
//! [`PaintEvent`] per painting operator (carrying the paint-time state the
//! color/rasterizer collaborator consumes) and every [`InterpretWarning`].

use pdfstate_core::{
    BlendMode, Color, ColorSpace, Ctm, DashPattern, GraphicsState, InterpretWarning, LineCap,
    LineJoin, Point, SoftMask, TextRenderMode, WritingMode,
};

/// Information about one shown glyph.
///
/// Produced by the text-showing operators (Tj, TJ, ', "). Matrices are
/// the values in effect when the glyph was painted, before the advance.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphEvent {
    /// The character code from the shown string.
    pub code: u32,
    /// Text rendering matrix: glyph space (scaled to text space) to device space.
    pub rendering_matrix: Ctm,
    /// Text matrix at the time of painting.
    pub text_matrix: Ctm,
    /// Current transformation matrix at the time of painting.
    pub ctm: Ctm,
    /// Text space displacement applied after this glyph.
    pub displacement: Point,
    /// Font resource name selected by `Tf`.
    pub font_name: String,
    /// Font size selected by `Tf`.
    pub font_size: f64,
    pub writing_mode: WritingMode,
    pub render_mode: TextRenderMode,
    /// Text knockout flag.
    pub knockout: bool,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub fill_alpha: f64,
    pub stroke_alpha: f64,
    pub blend_mode: BlendMode,
}

/// The type of paint operation applied to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    /// `S`, `s`
    Stroke,
    /// `f`, `F`, `f*`
    Fill,
    /// `B`, `B*`, `b`, `b*`
    FillAndStroke,
    /// `sh`
    Shading,
}

impl PaintOp {
    /// Map a path-painting operator name. `n` paints nothing and maps to `None`.
    pub fn from_operator(name: &str) -> Option<Self> {
        match name {
            "S" | "s" => Some(PaintOp::Stroke),
            "f" | "F" | "f*" => Some(PaintOp::Fill),
            "B" | "B*" | "b" | "b*" => Some(PaintOp::FillAndStroke),
            "sh" => Some(PaintOp::Shading),
            _ => None,
        }
    }

    pub fn strokes(self) -> bool {
        matches!(self, PaintOp::Stroke | PaintOp::FillAndStroke)
    }

    pub fn fills(self) -> bool {
        !matches!(self, PaintOp::Stroke)
    }
}

/// Device-independent state in effect when something is painted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintEvent {
    pub op: PaintOp,
    pub ctm: Ctm,
    pub stroke_color_space: ColorSpace,
    pub stroke_color: Color,
    pub fill_color_space: ColorSpace,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub dash_pattern: DashPattern,
    pub stroke_alpha: f64,
    pub fill_alpha: f64,
    pub blend_mode: BlendMode,
    pub soft_mask: Option<SoftMask>,
}

impl PaintEvent {
    /// Snapshot the paint-relevant part of `gs`.
    pub fn capture(op: PaintOp, gs: &GraphicsState) -> Self {
        let gi = &gs.independent;
        Self {
            op,
            ctm: gi.ctm,
            stroke_color_space: gi.stroke_color_space.clone(),
            stroke_color: gi.stroke_color.clone(),
            fill_color_space: gi.fill_color_space.clone(),
            fill_color: gi.fill_color.clone(),
            line_width: gi.line_width,
            line_cap: gi.line_cap,
            line_join: gi.line_join,
            miter_limit: gi.miter_limit,
            dash_pattern: gi.dash_pattern.clone(),
            stroke_alpha: gi.stroke_alpha,
            fill_alpha: gi.fill_alpha,
            blend_mode: gi.blend_mode,
            soft_mask: gi.soft_mask.clone(),
        }
    }
}

/// Callback handler for content stream interpretation.
///
/// All methods have default no-op implementations, allowing handlers to
/// subscribe only to the event types they care about.
pub trait ContentHandler {
    /// Called for each glyph painted with a positive font size.
    fn on_glyph(&mut self, _event: GlyphEvent) {}

    /// Called when a path or shading is painted.
    fn on_paint(&mut self, _event: PaintEvent) {}

    /// Called when a non-fatal warning is encountered during interpretation.
    ///
    /// Only called when warning collection is enabled and strict mode is off.
    fn on_warning(&mut self, _warning: InterpretWarning) {}
}

/// A handler that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandler;

impl ContentHandler for NullHandler {}
