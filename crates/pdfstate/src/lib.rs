//! pdfstate: graphics state and text positioning for PDF content streams.
//!
//! This is the public API facade crate for pdfstate. It re-exports types from
//! pdfstate-core and pdfstate-interp and adds page-level entry points.
//!
//! # Architecture
//!
//! - **pdfstate-core**: State records, the save/restore stack and the text
//!   positioning algorithms
//! - **pdfstate-interp**: Operator dispatch over an interpretation session
//! - **pdfstate** (this crate): Pages, batch interpretation, event collection
//!
//! # Example
//!
//! ```
//! use pdfstate::{
//!     CollectingHandler, InterpretOptions, MapResources, Operand, Operator, PageContent,
//!     SimpleFontMetrics, interpret_page,
//! };
//!
//! let page = PageContent::new(
//!     vec![
//!         Operator::bare("BT"),
//!         Operator::new("Tf", vec![Operand::Name("F1".into()), Operand::Real(12.0)]),
//!         Operator::numeric("Td", &[72.0, 700.0]),
//!         Operator::new("Tj", vec![Operand::LiteralString(b"Hi".to_vec())]),
//!         Operator::bare("ET"),
//!     ],
//!     MapResources::new().with_font("F1", SimpleFontMetrics::default_metrics()),
//! );
//!
//! let mut events = CollectingHandler::default();
//! let summary = interpret_page(&page, &mut events, &InterpretOptions::default()).unwrap();
//! assert_eq!(summary.glyph_count, 2);
//! assert!((events.glyphs[1].text_matrix.e - 79.2).abs() < 1e-9);
//! ```

pub use pdfstate_core;
pub use pdfstate_interp;

pub use pdfstate_core::{
    BlendMode, CodeWidth, Color, ColorSpace, Ctm, DashPattern, DeviceDependentState,
    DeviceIndependentState, ExtGState, FontMetrics, GraphicsState, InterpretOptions,
    InterpretWarning, InterpretWarningCode, LineBox, LineCap, LineHeight, LineJoin, PdfError,
    Point, RenderingIntent, SimpleFontMetrics, SoftMask, SoftMaskEntry, StateStack, TextObject,
    TextRenderMode, TextState, WritingMode, glyph_displacement, rendering_matrix,
};
pub use pdfstate_interp::{
    ContentHandler, FormXObject, GlyphEvent, InterpretError, InterpretSummary, InterpreterState,
    MapResources, NullHandler, Operand, Operator, PaintEvent, PaintOp, Resources,
    TransparencyGroup, interpret_operators,
};

/// The tokenized content and resolved resources of one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub operators: Vec<Operator>,
    pub resources: MapResources,
    /// Default user space to device space; identity unless set.
    pub initial_ctm: Ctm,
}

impl PageContent {
    pub fn new(operators: Vec<Operator>, resources: MapResources) -> Self {
        Self {
            operators,
            resources,
            initial_ctm: Ctm::identity(),
        }
    }

    /// Start interpretation from `ctm` instead of the identity.
    pub fn with_initial_ctm(mut self, ctm: Ctm) -> Self {
        self.initial_ctm = ctm;
        self
    }
}

/// Result of interpreting one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSummary {
    /// Graphics state stack depth after the last operator (1 when balanced).
    pub final_depth: usize,
    pub glyph_count: usize,
    pub paint_count: usize,
    /// Warnings raised, including those not delivered to the handler.
    pub warning_count: usize,
}

/// A [`ContentHandler`] that keeps every event it receives.
#[derive(Debug, Clone, Default)]
pub struct CollectingHandler {
    pub glyphs: Vec<GlyphEvent>,
    pub paints: Vec<PaintEvent>,
    pub warnings: Vec<InterpretWarning>,
}

impl ContentHandler for CollectingHandler {
    fn on_glyph(&mut self, event: GlyphEvent) {
        self.glyphs.push(event);
    }

    fn on_paint(&mut self, event: PaintEvent) {
        self.paints.push(event);
    }

    fn on_warning(&mut self, warning: InterpretWarning) {
        self.warnings.push(warning);
    }
}

/// Interpret one page from a fresh graphics state.
///
/// # Errors
///
/// Returns [`InterpretError`] when a configured limit is exceeded, or for
/// any warning when `options.strict_mode` is set.
pub fn interpret_page(
    page: &PageContent,
    handler: &mut dyn ContentHandler,
    options: &InterpretOptions,
) -> Result<PageSummary, InterpretError> {
    let mut state = InterpreterState::with_options(page.initial_ctm, options);
    let summary = interpret_operators(
        &page.operators,
        &page.resources,
        &mut state,
        handler,
        options,
    )?;
    Ok(PageSummary {
        final_depth: state.stack_depth(),
        glyph_count: summary.glyph_count,
        paint_count: summary.paint_count,
        warning_count: summary.warning_count,
    })
}

/// Interpret every page independently, collecting their events.
///
/// Results are ordered like `pages`. Each page gets its own state stack, so
/// a failure on one page does not affect the others. With the `parallel`
/// feature pages are processed concurrently on the rayon thread pool.
pub fn interpret_pages(
    pages: &[PageContent],
    options: &InterpretOptions,
) -> Vec<Result<(PageSummary, CollectingHandler), InterpretError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        pages
            .par_iter()
            .map(|page| collect_page(page, options))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pages
            .iter()
            .map(|page| collect_page(page, options))
            .collect()
    }
}

fn collect_page(
    page: &PageContent,
    options: &InterpretOptions,
) -> Result<(PageSummary, CollectingHandler), InterpretError> {
    let mut handler = CollectingHandler::default();
    let summary = interpret_page(page, &mut handler, options)?;
    Ok((summary, handler))
}
