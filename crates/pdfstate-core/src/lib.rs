//! pdfstate-core: Graphics state and text positioning primitives.
//!
//! This crate provides the value types a PDF content stream interpreter
//! mutates (graphics state, text state, colors, line style), the
//! save/restore stack that brackets them, and the text positioning
//! algorithms (rendering matrix, glyph displacement, line box).
//! It has no mandatory external dependencies.

pub mod color;
pub mod displacement;
pub mod error;
pub mod ext_gstate;
pub mod geometry;
pub mod graphics_state;
pub mod line_box;
pub mod line_style;
pub mod metrics;
pub mod stack;
pub mod text_object;
pub mod text_state;

pub use color::{Color, ColorSpace};
pub use displacement::{
    WritingMode, adjustment_displacement, glyph_displacement, horizontal_displacement,
    vertical_displacement,
};
pub use error::{InterpretOptions, InterpretWarning, InterpretWarningCode, PdfError};
pub use ext_gstate::{ExtGState, SoftMaskEntry};
pub use geometry::{Ctm, Point};
pub use graphics_state::{
    BlackPointCompensation, BlendMode, DeviceDependentState, DeviceIndependentState, FunctionRef,
    GraphicsState, HalftoneRef, ObjectRef, RenderingIntent, SoftMask, SoftMaskKind,
};
pub use line_box::{LineBox, LineHeight};
pub use line_style::{DashPattern, LineCap, LineJoin};
pub use metrics::{CodeWidth, FontMetrics, SimpleFontMetrics};
pub use stack::{ScopedState, StateStack};
pub use text_object::{TextObject, rendering_matrix, text_space_matrix};
pub use text_state::{TextRenderMode, TextState};
