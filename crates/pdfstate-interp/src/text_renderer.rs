//! Text showing operators (Tj, TJ, ', ") for the content stream interpreter.
//!
//! For each character code of a shown string: record the text rendering
//! matrix, compute the glyph displacement from the font's width and the
//! text state, then advance the text matrix. Codes are split according to
//! the font's [`CodeWidth`] and advance along its [`WritingMode`].

use pdfstate_core::{
    CodeWidth, FontMetrics, GraphicsState, Point, TextObject, WritingMode, adjustment_displacement,
    glyph_displacement,
};

use crate::handler::GlyphEvent;

/// An element of a TJ array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    /// A string of bytes to show.
    String(Vec<u8>),
    /// A numeric adjustment in thousandths of a unit of text space.
    /// Positive values move left (tighten), negative move right (loosen).
    Adjustment(f64),
}

/// `Tj` operator: show a string.
///
/// Returns one [`GlyphEvent`] per code, or none at all when the font size
/// is zero or negative. The text matrix advances either way.
pub fn show_string(
    text_object: &mut TextObject,
    gs: &GraphicsState,
    font: &dyn FontMetrics,
    string_bytes: &[u8],
) -> Vec<GlyphEvent> {
    let ts = gs.text_state();
    let mode = font.writing_mode();
    let code_width = font.code_width();
    let units_per_em = match font.units_per_em() {
        u if u > 0.0 => u,
        _ => 1000.0,
    };
    let font_size = ts.effective_font_size();
    let font_name = ts.font.clone().unwrap_or_default();

    let codes = code_width.codes(string_bytes);
    let mut glyphs = Vec::with_capacity(if font_size > 0.0 { codes.len() } else { 0 });

    for code in codes {
        let width = match mode {
            WritingMode::Horizontal => font.advance_width(code),
            WritingMode::Vertical => font.vertical_advance(code),
        } / units_per_em;
        // Word spacing applies to the single-byte code 32 only, never to a
        // two-byte code that happens to equal 32.
        let is_word_space = code_width == CodeWidth::SingleByte && code == 32;
        let (tx, ty) = glyph_displacement(width, ts, is_word_space, mode);

        if font_size > 0.0 {
            glyphs.push(GlyphEvent {
                code,
                rendering_matrix: text_object.rendering_matrix(ts, gs.ctm()),
                text_matrix: *text_object.text_matrix(),
                ctm: *gs.ctm(),
                displacement: Point::new(tx, ty),
                font_name: font_name.clone(),
                font_size,
                writing_mode: mode,
                render_mode: ts.render_mode,
                knockout: ts.knockout,
                fill_color: gs.independent.fill_color.clone(),
                stroke_color: gs.independent.stroke_color.clone(),
                fill_alpha: gs.independent.fill_alpha,
                stroke_alpha: gs.independent.stroke_alpha,
                blend_mode: gs.independent.blend_mode,
            });
        }

        text_object.advance(tx, ty);
    }

    glyphs
}

/// `TJ` operator: show strings with positioning adjustments.
pub fn show_string_with_positioning(
    text_object: &mut TextObject,
    gs: &GraphicsState,
    font: &dyn FontMetrics,
    elements: &[TjElement],
) -> Vec<GlyphEvent> {
    let mut glyphs = Vec::new();

    for element in elements {
        match element {
            TjElement::String(bytes) => {
                glyphs.extend(show_string(text_object, gs, font, bytes));
            }
            TjElement::Adjustment(adj) => {
                let (tx, ty) = adjustment_displacement(*adj, gs.text_state(), font.writing_mode());
                text_object.advance(tx, ty);
            }
        }
    }

    glyphs
}

/// `'` (single quote) operator: `T*` then `Tj`.
pub fn quote_show_string(
    text_object: &mut TextObject,
    gs: &GraphicsState,
    font: &dyn FontMetrics,
    string_bytes: &[u8],
) -> Vec<GlyphEvent> {
    text_object.move_to_next_line(gs.text_state());
    show_string(text_object, gs, font, string_bytes)
}

/// `"` (double quote) operator: `aw Tw`, `ac Tc`, then `string '`.
///
/// The spacing values persist in the graphics state afterwards.
pub fn double_quote_show_string(
    text_object: &mut TextObject,
    gs: &mut GraphicsState,
    font: &dyn FontMetrics,
    word_spacing: f64,
    char_spacing: f64,
    string_bytes: &[u8],
) -> Vec<GlyphEvent> {
    gs.text_state_mut().set_word_spacing(word_spacing);
    gs.text_state_mut().set_char_spacing(char_spacing);
    quote_show_string(text_object, gs, font, string_bytes)
}
