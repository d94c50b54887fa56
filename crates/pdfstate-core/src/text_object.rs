//! Text object matrices and the text rendering matrix (PDF 32000-1 §9.4).
//!
//! A [`TextObject`] exists only between `BT` and `ET`. It carries the text
//! matrix (Tm) and text line matrix (Tlm); both start as identity and are
//! discarded at `ET`. The text rendering matrix (Trm) is never stored: it is
//! recomputed for each glyph by [`rendering_matrix`].

use crate::geometry::Ctm;
use crate::text_state::TextState;

/// The text matrix pair of an open text object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextObject {
    /// The text matrix (set by Tm, updated by Td/TD/T* and by glyph advances).
    text_matrix: Ctm,
    /// The text line matrix: Tm as it was at the most recent line start.
    line_matrix: Ctm,
}

impl TextObject {
    /// `BT` operator: open a text object with Tm = Tlm = identity.
    pub fn begin() -> Self {
        Self {
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }

    /// Get the current text matrix.
    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    /// Get the current line matrix.
    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    // --- Tm operator ---

    /// `Tm` operator: set the text matrix and line matrix directly.
    ///
    /// This replaces (not concatenates) the current text matrix.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    // --- Td operator ---

    /// `Td` operator: move to the start of the next line, offset from the
    /// start of the current line by `(tx, ty)`.
    ///
    /// `Tlm := translation(tx, ty) × Tlm; Tm := Tlm`.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    // --- TD operator ---

    /// `TD` operator: `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(
        &mut self,
        text_state: &mut TextState,
        tx: f64,
        ty: f64,
    ) {
        text_state.set_leading(-ty);
        self.move_text_position(tx, ty);
    }

    // --- T* operator ---

    /// `T*` operator: `0 -TL Td` with the current leading.
    pub fn move_to_next_line(&mut self, text_state: &TextState) {
        self.move_text_position(0.0, -text_state.leading);
    }

    // --- Glyph advance ---

    /// Advance the text matrix by a glyph displacement `(tx, ty)` in text
    /// space: `Tm := translation(tx, ty) × Tm`. The line matrix is untouched.
    pub fn advance(&mut self, tx: f64, ty: f64) {
        self.text_matrix = Ctm::translation(tx, ty).concat(&self.text_matrix);
    }

    /// The text rendering matrix for the next glyph.
    pub fn rendering_matrix(&self, text_state: &TextState, ctm: &Ctm) -> Ctm {
        rendering_matrix(&self.text_matrix, text_state, ctm)
    }
}

/// Text space parameters as a matrix:
/// `[Tfs×Th 0 0 Tfs 0 Trise]`.
pub fn text_space_matrix(text_state: &TextState) -> Ctm {
    let font_size = text_state.effective_font_size();
    Ctm::new(
        font_size * text_state.h_scaling_normalized(),
        0.0,
        0.0,
        font_size,
        0.0,
        text_state.rise,
    )
}

/// `Trm = [Tfs×Th 0 0 Tfs 0 Trise] × Tm × CTM`.
///
/// Font size, horizontal scaling and rise apply first, then the text
/// matrix, then the CTM. A zero font size yields a singular matrix.
pub fn rendering_matrix(text_matrix: &Ctm, text_state: &TextState, ctm: &Ctm) -> Ctm {
    text_space_matrix(text_state)
        .concat(text_matrix)
        .concat(ctm)
}
