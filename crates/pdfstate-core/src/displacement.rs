//! Glyph displacement (PDF 32000-1 §9.4.4).
//!
//! After a glyph is painted the text matrix advances by
//! `tx = ((w0 - adj/1000) × Tfs + Tc + Tw) × Th` in horizontal writing, or
//! `ty = (w1 - adj/1000) × Tfs + Tc + Tw` in vertical writing. Widths are
//! in text space units (glyph space / units per em).

use crate::text_state::TextState;

/// Writing direction of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WritingMode {
    /// Glyphs advance along the x axis of text space.
    #[default]
    Horizontal,
    /// Glyphs advance along the y axis of text space.
    Vertical,
}

/// Horizontal displacement of one glyph.
///
/// `h_scaling` is the `Tz` percentage. The adjustment is subtracted before
/// scaling by font size; Th applies to the whole sum.
pub fn horizontal_displacement(
    w0: f64,
    adjustment: f64,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scaling: f64,
) -> f64 {
    ((w0 - adjustment / 1000.0) * font_size + char_spacing + word_spacing) * (h_scaling / 100.0)
}

/// Vertical displacement of one glyph. Horizontal scaling does not apply.
pub fn vertical_displacement(
    w1: f64,
    adjustment: f64,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
) -> f64 {
    (w1 - adjustment / 1000.0) * font_size + char_spacing + word_spacing
}

/// Displacement `(tx, ty)` for a glyph shown with the current text state.
///
/// `width` is w0 in horizontal mode and w1 in vertical mode.
/// `is_word_space` must be true only for the single-byte code 32.
pub fn glyph_displacement(
    width: f64,
    text_state: &TextState,
    is_word_space: bool,
    mode: WritingMode,
) -> (f64, f64) {
    let font_size = text_state.effective_font_size();
    let word_spacing = if is_word_space {
        text_state.word_spacing
    } else {
        0.0
    };
    match mode {
        WritingMode::Horizontal => (
            horizontal_displacement(
                width,
                0.0,
                font_size,
                text_state.char_spacing,
                word_spacing,
                text_state.h_scaling,
            ),
            0.0,
        ),
        WritingMode::Vertical => (
            0.0,
            vertical_displacement(
                width,
                0.0,
                font_size,
                text_state.char_spacing,
                word_spacing,
            ),
        ),
    }
}

/// Displacement for a numeric `TJ` element.
///
/// Positive adjustments move left (or down in vertical mode).
pub fn adjustment_displacement(
    adjustment: f64,
    text_state: &TextState,
    mode: WritingMode,
) -> (f64, f64) {
    let font_size = text_state.effective_font_size();
    match mode {
        WritingMode::Horizontal => (
            horizontal_displacement(0.0, adjustment, font_size, 0.0, 0.0, text_state.h_scaling),
            0.0,
        ),
        WritingMode::Vertical => (0.0, vertical_displacement(0.0, adjustment, font_size, 0.0, 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    fn state(font_size: f64) -> TextState {
        let mut ts = TextState::new();
        ts.set_font("F1", font_size);
        ts
    }

    // --- formula ---

    #[test]
    fn test_plain_advance() {
        assert_approx(horizontal_displacement(0.5, 0.0, 12.0, 0.0, 0.0, 100.0), 6.0);
    }

    #[test]
    fn test_word_spacing_advance() {
        assert_approx(horizontal_displacement(0.5, 0.0, 12.0, 0.0, 2.0, 100.0), 8.0);
    }

    #[test]
    fn test_adjustment_subtracted_before_font_size() {
        // (0.5 - 0.1) × 10 = 4
        assert_approx(horizontal_displacement(0.5, 100.0, 10.0, 0.0, 0.0, 100.0), 4.0);
    }

    #[test]
    fn test_h_scaling_applies_to_spacing_too() {
        // (0.5 × 10 + 1 + 2) × 0.5 = 4
        assert_approx(horizontal_displacement(0.5, 0.0, 10.0, 1.0, 2.0, 50.0), 4.0);
    }

    #[test]
    fn test_vertical_ignores_h_scaling() {
        assert_approx(vertical_displacement(-1.0, 0.0, 10.0, 1.0, 0.0), -9.0);
    }

    // --- glyph_displacement ---

    #[test]
    fn test_glyph_displacement_horizontal() {
        let ts = state(12.0);
        let (tx, ty) = glyph_displacement(0.5, &ts, false, WritingMode::Horizontal);
        assert_approx(tx, 6.0);
        assert_eq!(ty, 0.0);
    }

    #[test]
    fn test_word_spacing_only_for_space() {
        let mut ts = state(12.0);
        ts.set_word_spacing(2.0);
        let (space, _) = glyph_displacement(0.5, &ts, true, WritingMode::Horizontal);
        let (letter, _) = glyph_displacement(0.5, &ts, false, WritingMode::Horizontal);
        assert_approx(space, 8.0);
        assert_approx(letter, 6.0);
    }

    #[test]
    fn test_glyph_displacement_vertical() {
        let mut ts = state(10.0);
        ts.set_h_scaling(200.0);
        let (tx, ty) = glyph_displacement(-1.0, &ts, false, WritingMode::Vertical);
        assert_eq!(tx, 0.0);
        assert_approx(ty, -10.0);
    }

    #[test]
    fn test_zero_font_size_only_spacing_remains() {
        let mut ts = state(0.0);
        ts.set_char_spacing(1.5);
        let (tx, _) = glyph_displacement(0.6, &ts, false, WritingMode::Horizontal);
        assert_approx(tx, 1.5);
    }

    #[test]
    fn test_negative_font_size_reverses_advance() {
        let ts = state(-12.0);
        let (tx, _) = glyph_displacement(0.5, &ts, false, WritingMode::Horizontal);
        assert_approx(tx, -6.0);
    }

    // --- TJ adjustments ---

    #[test]
    fn test_adjustment_displacement_horizontal() {
        let mut ts = state(12.0);
        ts.set_h_scaling(50.0);
        ts.set_char_spacing(3.0);
        let (tx, ty) = adjustment_displacement(-250.0, &ts, WritingMode::Horizontal);
        // 250/1000 × 12 × 0.5, spacing not applied
        assert_approx(tx, 1.5);
        assert_eq!(ty, 0.0);
    }

    #[test]
    fn test_adjustment_displacement_vertical() {
        let ts = state(10.0);
        let (tx, ty) = adjustment_displacement(500.0, &ts, WritingMode::Vertical);
        assert_eq!(tx, 0.0);
        assert_approx(ty, -5.0);
    }
}
