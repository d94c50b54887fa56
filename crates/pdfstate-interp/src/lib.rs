//! pdfstate-interp: content stream interpretation session.
//!
//! This crate drives the pdfstate-core state records from typed content
//! stream operators: `q`/`Q` scoping, `cm`, the line style and color
//! operators, `gs`, text objects and the text-showing operators, and form
//! XObjects. Tokenizing and object resolution are left to the caller,
//! which hands over [`Operator`]s and a [`Resources`] implementation.

pub mod error;
pub mod handler;
pub mod interpreter;
pub mod interpreter_state;
pub mod operator;
pub mod resources;
pub mod text_renderer;

pub use error::InterpretError;
pub use handler::{ContentHandler, GlyphEvent, NullHandler, PaintEvent, PaintOp};
pub use interpreter::{InterpretSummary, interpret_operators};
pub use interpreter_state::InterpreterState;
pub use operator::{Operand, Operator};
pub use pdfstate_core;
pub use resources::{FormXObject, MapResources, Resources, SharedFont, TransparencyGroup};
pub use text_renderer::{
    TjElement, double_quote_show_string, quote_show_string, show_string,
    show_string_with_positioning,
};
