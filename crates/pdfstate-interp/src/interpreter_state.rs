//! Graphics state stack for the content stream interpreter.
//!
//! [`InterpreterState`] is one interpretation session: the `q`/`Q` stack of
//! [`GraphicsState`] records, the text object that exists between `BT` and
//! `ET`, and the frames of the form XObjects and transparency groups
//! currently being executed.

use std::ops::{Deref, DerefMut};

use pdfstate_core::{
    Color, ColorSpace, Ctm, ExtGState, GraphicsState, InterpretOptions, LineCap, LineJoin,
    PdfError, RenderingIntent, StateStack, TextObject, TextState,
};

use crate::error::InterpretError;

/// A form XObject or transparency group being executed.
#[derive(Debug, Clone, PartialEq)]
struct FormFrame {
    /// Stack depth before the form's implicit `q`.
    entry_depth: usize,
    /// Text object of the invoking stream, put back when the form ends.
    outer_text_object: Option<TextObject>,
}

/// Full interpreter state: graphics state stack plus text object.
///
/// The `q` operator pushes a copy of the current [`GraphicsState`] (text
/// state included); `Q` restores it. `BT`/`ET` only touch the text object.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterState {
    stack: StateStack<GraphicsState>,
    text_object: Option<TextObject>,
    forms: Vec<FormFrame>,
    /// Restore floors of the open [`with_scoped_state`](Self::with_scoped_state) scopes.
    scope_floors: Vec<usize>,
    max_stack_depth: Option<usize>,
    max_form_depth: usize,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    /// Create a new interpreter state with identity CTM and default graphics state.
    pub fn new() -> Self {
        Self::with_ctm(Ctm::identity())
    }

    /// Create a state whose initial CTM maps default user space to the device.
    pub fn with_ctm(ctm: Ctm) -> Self {
        let defaults = InterpretOptions::default();
        Self {
            stack: StateStack::new(GraphicsState::with_ctm(ctm)),
            text_object: None,
            forms: Vec::new(),
            scope_floors: Vec::new(),
            max_stack_depth: defaults.max_stack_depth,
            max_form_depth: defaults.max_recursion_depth,
        }
    }

    /// Create a state that enforces the limits in `options`.
    pub fn with_options(ctm: Ctm, options: &InterpretOptions) -> Self {
        Self {
            max_stack_depth: options.max_stack_depth,
            max_form_depth: options.max_recursion_depth,
            ..Self::with_ctm(ctm)
        }
    }

    /// Get the current transformation matrix.
    pub fn ctm(&self) -> &Ctm {
        self.stack.current().ctm()
    }

    /// Get the current graphics state.
    pub fn graphics_state(&self) -> &GraphicsState {
        self.stack.current()
    }

    /// Get a mutable reference to the current graphics state.
    pub fn graphics_state_mut(&mut self) -> &mut GraphicsState {
        self.stack.current_mut()
    }

    pub fn text_state(&self) -> &TextState {
        self.stack.current().text_state()
    }

    pub fn text_state_mut(&mut self) -> &mut TextState {
        self.stack.current_mut().text_state_mut()
    }

    /// Returns the current stack depth (1 when nothing is saved).
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Number of forms and groups currently being executed.
    pub fn form_depth(&self) -> usize {
        self.forms.len()
    }

    /// Lowest depth `Q` may return to: neither a form nor a scope can restore
    /// past its own entry.
    fn restore_floor(&self) -> usize {
        let form = self.forms.last().map_or(1, |frame| frame.entry_depth + 1);
        let scope = self.scope_floors.last().copied().unwrap_or(1);
        form.max(scope)
    }

    // --- q/Q operators ---

    /// `q` operator: save the current graphics state onto the stack.
    ///
    /// Fails only when `max_stack_depth` is configured and would be exceeded.
    pub fn save_state(&mut self) -> Result<(), InterpretError> {
        if let Some(limit) = self.max_stack_depth {
            let next = self.stack.depth() + 1;
            if next > limit {
                return Err(PdfError::ResourceLimitExceeded {
                    limit_name: "max_stack_depth".to_string(),
                    limit_value: limit,
                    actual_value: next,
                }
                .into());
            }
        }
        self.stack.save();
        Ok(())
    }

    /// `Q` operator: restore the most recently saved graphics state.
    ///
    /// Returns `false` and changes nothing when there is no matching `q`,
    /// either at the bottom of the stack or at the start of the current form
    /// or scope.
    pub fn restore_state(&mut self) -> bool {
        if self.stack.depth() <= self.restore_floor() {
            return false;
        }
        self.stack.restore()
    }

    /// Run `body` between a save and a restore of the graphics state.
    ///
    /// The stack returns to its prior depth when `body` finishes or unwinds,
    /// even if `body` left saves unbalanced, and `restore_state` inside `body`
    /// can not pop the scope's own save. `max_stack_depth` is not checked for
    /// this save.
    pub fn with_scoped_state<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.stack.depth();
        self.stack.save();
        self.scope_floors.push(depth + 1);
        let mut scope = StateScope { state: self, depth };
        body(&mut *scope)
    }

    // --- cm operator ---

    /// `cm` operator: `CTM := matrix × CTM`.
    pub fn concat_matrix(&mut self, matrix: &Ctm) {
        self.graphics_state_mut().independent.concatenate(matrix);
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.graphics_state_mut().independent.translate(tx, ty);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.graphics_state_mut().independent.scale(sx, sy);
    }

    /// Rotate user space by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.graphics_state_mut().independent.rotate(angle);
    }

    // --- Line style and rendering operators ---

    /// `w` operator.
    pub fn set_line_width(&mut self, width: f64) {
        self.graphics_state_mut().independent.set_line_width(width);
    }

    /// `J` operator.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.graphics_state_mut().independent.set_line_cap(cap);
    }

    /// `j` operator.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.graphics_state_mut().independent.set_line_join(join);
    }

    /// `M` operator.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.graphics_state_mut().independent.set_miter_limit(limit);
    }

    /// `d` operator.
    pub fn set_dash_pattern(&mut self, dash_array: Vec<f64>, dash_phase: f64) {
        self.graphics_state_mut()
            .independent
            .set_dash_pattern(dash_array, dash_phase);
    }

    /// `ri` operator.
    pub fn set_rendering_intent(&mut self, intent: RenderingIntent) {
        self.graphics_state_mut()
            .independent
            .set_rendering_intent(intent);
    }

    /// `i` operator.
    pub fn set_flatness(&mut self, flatness: f64) {
        self.graphics_state_mut().dependent.set_flatness(flatness);
    }

    // --- Color operators ---

    /// `CS` operator.
    pub fn set_stroke_color_space(&mut self, space: ColorSpace) {
        self.graphics_state_mut()
            .independent
            .set_stroke_color_space(space);
    }

    /// `cs` operator.
    pub fn set_fill_color_space(&mut self, space: ColorSpace) {
        self.graphics_state_mut()
            .independent
            .set_fill_color_space(space);
    }

    /// `SC`/`SCN` operators: components in the current stroking space.
    pub fn set_stroke_components(&mut self, components: &[f32]) {
        let gi = &mut self.graphics_state_mut().independent;
        let color = gi.stroke_color_space.color_from_components(components);
        gi.set_stroke_color(color);
    }

    /// `sc`/`scn` operators: components in the current non-stroking space.
    pub fn set_fill_components(&mut self, components: &[f32]) {
        let gi = &mut self.graphics_state_mut().independent;
        let color = gi.fill_color_space.color_from_components(components);
        gi.set_fill_color(color);
    }

    /// `G`, `RG`, `K` operators: select a device space and a color in it.
    pub fn set_stroke_device_color(&mut self, color: Color) {
        let gi = &mut self.graphics_state_mut().independent;
        gi.stroke_color_space = device_space_of(&color);
        gi.set_stroke_color(color);
    }

    /// `g`, `rg`, `k` operators.
    pub fn set_fill_device_color(&mut self, color: Color) {
        let gi = &mut self.graphics_state_mut().independent;
        gi.fill_color_space = device_space_of(&color);
        gi.set_fill_color(color);
    }

    // --- gs operator ---

    /// `gs` operator: apply an extended graphics state dictionary.
    ///
    /// `/TK` is ignored inside a text object; returns `true` when that happened.
    pub fn apply_ext_gstate(&mut self, ext: &ExtGState) -> bool {
        if self.text_object.is_some() && ext.text_knockout.is_some() {
            let without_tk = ExtGState {
                text_knockout: None,
                ..ext.clone()
            };
            self.graphics_state_mut().apply_ext_gstate(&without_tk);
            true
        } else {
            self.graphics_state_mut().apply_ext_gstate(ext);
            false
        }
    }

    // --- BT/ET operators ---

    /// `BT` operator: start a text object with Tm = Tlm = identity.
    ///
    /// Returns `false` if a text object was already open (it is replaced).
    pub fn begin_text(&mut self) -> bool {
        self.text_object.replace(TextObject::begin()).is_none()
    }

    /// `ET` operator: discard the text matrices.
    ///
    /// Returns `false` if no text object was open.
    pub fn end_text(&mut self) -> bool {
        self.text_object.take().is_some()
    }

    pub fn in_text_object(&self) -> bool {
        self.text_object.is_some()
    }

    pub fn text_object(&self) -> Option<&TextObject> {
        self.text_object.as_ref()
    }

    /// The open text object together with the current graphics state.
    pub fn text_parts_mut(&mut self) -> Option<(&mut TextObject, &mut GraphicsState)> {
        let text_object = self.text_object.as_mut()?;
        Some((text_object, self.stack.current_mut()))
    }

    // --- Text positioning operators ---

    /// `Td` operator. Returns `false` outside a text object.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) -> bool {
        match self.text_object.as_mut() {
            Some(to) => {
                to.move_text_position(tx, ty);
                true
            }
            None => false,
        }
    }

    /// `TD` operator. Returns `false` outside a text object.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) -> bool {
        match self.text_parts_mut() {
            Some((to, gs)) => {
                to.move_text_position_and_set_leading(gs.text_state_mut(), tx, ty);
                true
            }
            None => false,
        }
    }

    /// `Tm` operator. Returns `false` outside a text object.
    pub fn set_text_matrix(&mut self, matrix: Ctm) -> bool {
        match self.text_object.as_mut() {
            Some(to) => {
                to.set_text_matrix(matrix);
                true
            }
            None => false,
        }
    }

    /// `T*` operator. Returns `false` outside a text object.
    pub fn move_to_next_line(&mut self) -> bool {
        match self.text_parts_mut() {
            Some((to, gs)) => {
                to.move_to_next_line(gs.text_state());
                true
            }
            None => false,
        }
    }

    /// Text rendering matrix for the next glyph, if a text object is open.
    pub fn rendering_matrix(&self) -> Option<Ctm> {
        let gs = self.stack.current();
        self.text_object
            .as_ref()
            .map(|to| to.rendering_matrix(gs.text_state(), gs.ctm()))
    }

    // --- Form XObjects and transparency groups ---

    /// Enter a form XObject: save the state and concatenate the form matrix.
    ///
    /// A transparency group additionally starts with blend mode Normal, no
    /// soft mask and alpha 1.0.
    pub fn begin_form(&mut self, matrix: &Ctm, transparency_group: bool) -> Result<(), InterpretError> {
        if self.forms.len() >= self.max_form_depth {
            return Err(InterpretError::RecursionLimit {
                max: self.max_form_depth,
            });
        }
        let entry_depth = self.stack.depth();
        self.save_state()?;
        self.forms.push(FormFrame {
            entry_depth,
            outer_text_object: self.text_object.take(),
        });

        let gi = &mut self.graphics_state_mut().independent;
        gi.concatenate(matrix);
        if transparency_group {
            gi.reset_transparency();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            depth = self.forms.len(),
            transparency_group,
            "entered form"
        );
        Ok(())
    }

    /// Leave the innermost form, restoring the state it was entered with.
    ///
    /// Returns `false` if no form is open.
    pub fn end_form(&mut self) -> bool {
        let Some(frame) = self.forms.pop() else {
            return false;
        };
        self.stack.restore_to_depth(frame.entry_depth);
        self.text_object = frame.outer_text_object;

        #[cfg(feature = "tracing")]
        tracing::debug!(depth = self.forms.len(), "left form");
        true
    }

    /// Run `body` inside a form, ending the form whatever `body` returns,
    /// and also when it unwinds.
    pub fn with_form<R>(
        &mut self,
        matrix: &Ctm,
        transparency_group: bool,
        body: impl FnOnce(&mut Self) -> Result<R, InterpretError>,
    ) -> Result<R, InterpretError> {
        let open = self.forms.len();
        self.begin_form(matrix, transparency_group)?;
        let mut scope = FormScope { state: self, open };
        body(&mut *scope)
    }
}

/// The device color space a typed color value belongs to.
fn device_space_of(color: &Color) -> ColorSpace {
    match color {
        Color::Gray(_) => ColorSpace::DeviceGray,
        Color::Rgb(..) => ColorSpace::DeviceRgb,
        Color::Cmyk(..) => ColorSpace::DeviceCmyk,
        Color::Other(components) => match components.len() {
            3 => ColorSpace::DeviceRgb,
            4 => ColorSpace::DeviceCmyk,
            _ => ColorSpace::DeviceGray,
        },
    }
}

/// Guard returned to [`InterpreterState::with_scoped_state`] bodies.
struct StateScope<'a> {
    state: &'a mut InterpreterState,
    depth: usize,
}

impl Deref for StateScope<'_> {
    type Target = InterpreterState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for StateScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for StateScope<'_> {
    fn drop(&mut self) {
        let depth = self.depth;
        self.state.scope_floors.pop();
        // Forms opened inside the scope can not outlive it.
        while self
            .state
            .forms
            .last()
            .is_some_and(|frame| frame.entry_depth >= depth)
        {
            self.state.end_form();
        }
        self.state.stack.restore_to_depth(depth);
    }
}

/// Guard returned to [`InterpreterState::with_form`] bodies.
struct FormScope<'a> {
    state: &'a mut InterpreterState,
    /// Number of forms open before this one.
    open: usize,
}

impl Deref for FormScope<'_> {
    type Target = InterpreterState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for FormScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for FormScope<'_> {
    fn drop(&mut self) {
        while self.state.forms.len() > self.open {
            self.state.end_form();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfstate_core::{BlendMode, FunctionRef, ObjectRef, SoftMask, SoftMaskEntry, SoftMaskKind};
    use std::f64::consts::FRAC_PI_2;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    // --- Construction ---

    #[test]
    fn new_state_has_identity_ctm_and_depth_one() {
        let state = InterpreterState::new();
        assert_eq!(*state.ctm(), Ctm::identity());
        assert_eq!(state.stack_depth(), 1);
        assert!(!state.in_text_object());
        assert_eq!(state.form_depth(), 0);
    }

    #[test]
    fn with_ctm_seeds_page_transform() {
        let page = Ctm::new(1.0, 0.0, 0.0, -1.0, 0.0, 792.0);
        let state = InterpreterState::with_ctm(page);
        assert_eq!(*state.ctm(), page);
    }

    // --- q/Q ---

    #[test]
    fn save_restore_round_trip() {
        let mut state = InterpreterState::new();
        state.save_state().unwrap();
        state.set_line_width(4.0);
        state.translate(10.0, 10.0);
        state.text_state_mut().set_font("F1", 12.0);

        assert!(state.restore_state());
        assert_eq!(*state.graphics_state(), GraphicsState::default());
    }

    #[test]
    fn unbalanced_restore_returns_false() {
        let mut state = InterpreterState::new();
        state.set_line_width(3.0);
        assert!(!state.restore_state());
        assert!(!state.restore_state());
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(state.graphics_state().independent.line_width, 3.0);
    }

    #[test]
    fn save_respects_max_stack_depth() {
        let options = InterpretOptions {
            max_stack_depth: Some(2),
            ..InterpretOptions::default()
        };
        let mut state = InterpreterState::with_options(Ctm::identity(), &options);
        state.save_state().unwrap();
        let err = state.save_state().unwrap_err();
        assert_eq!(
            err,
            InterpretError::Pdf(PdfError::ResourceLimitExceeded {
                limit_name: "max_stack_depth".to_string(),
                limit_value: 2,
                actual_value: 3,
            })
        );
        assert_eq!(state.stack_depth(), 2);
    }

    #[test]
    fn text_state_is_saved_with_graphics_state() {
        let mut state = InterpreterState::new();
        state.text_state_mut().set_font("F1", 10.0);
        state.save_state().unwrap();
        state.text_state_mut().set_font("F2", 20.0);
        state.text_state_mut().set_char_spacing(1.0);
        state.restore_state();
        assert_eq!(state.text_state().font.as_deref(), Some("F1"));
        assert_eq!(state.text_state().font_size, Some(10.0));
        assert_eq!(state.text_state().char_spacing, 0.0);
    }

    // --- with_scoped_state ---

    #[test]
    fn scoped_state_is_isolated() {
        let mut state = InterpreterState::new();
        let width = state.with_scoped_state(|s| {
            s.set_line_width(8.0);
            s.rotate(FRAC_PI_2);
            s.graphics_state().independent.line_width
        });
        assert_eq!(width, 8.0);
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(*state.graphics_state(), GraphicsState::default());
    }

    #[test]
    fn scoped_state_rebalances_and_survives_panic() {
        let mut state = InterpreterState::new();
        state.with_scoped_state(|s| {
            s.save_state().unwrap();
            s.save_state().unwrap();
        });
        assert_eq!(state.stack_depth(), 1);

        let caught = catch_unwind(AssertUnwindSafe(|| {
            state.with_scoped_state(|s| {
                s.set_line_width(5.0);
                if s.stack_depth() > 1 {
                    panic!("body failed");
                }
            })
        }));
        assert!(caught.is_err());
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(state.graphics_state().independent.line_width, 1.0);
    }

    #[test]
    fn scoped_state_closes_forms_opened_inside() {
        let mut state = InterpreterState::new();
        state.with_scoped_state(|s| {
            s.begin_form(&Ctm::translation(5.0, 5.0), false).unwrap();
        });
        assert_eq!(state.form_depth(), 0);
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(*state.ctm(), Ctm::identity());
    }

    #[test]
    fn scoped_state_extra_restores_keep_outer_saves() {
        let mut state = InterpreterState::new();
        state.save_state().unwrap();
        state.set_line_width(5.0);

        state.with_scoped_state(|s| {
            s.set_line_width(7.0);
            assert!(!s.restore_state());
            assert!(!s.restore_state());
            assert_eq!(s.graphics_state().independent.line_width, 7.0);
        });
        assert_eq!(state.stack_depth(), 2);
        assert_eq!(state.graphics_state().independent.line_width, 5.0);

        assert!(state.restore_state());
        assert_eq!(state.graphics_state().independent.line_width, 1.0);
    }

    // --- cm ---

    #[test]
    fn concat_matrix_premultiplies() {
        let mut state = InterpreterState::new();
        state.concat_matrix(&Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        state.concat_matrix(&Ctm::translation(10.0, 0.0));
        // translation acts in the scaled space
        assert_eq!(*state.ctm(), Ctm::new(2.0, 0.0, 0.0, 2.0, 20.0, 0.0));
    }

    // --- Colors ---

    #[test]
    fn device_color_operators_set_space() {
        let mut state = InterpreterState::new();
        state.set_fill_device_color(Color::Rgb(1.0, 0.0, 0.0));
        state.set_stroke_device_color(Color::Cmyk(0.0, 1.0, 0.0, 0.0));
        let gi = &state.graphics_state().independent;
        assert_eq!(gi.fill_color_space, ColorSpace::DeviceRgb);
        assert_eq!(gi.fill_color, Color::Rgb(1.0, 0.0, 0.0));
        assert_eq!(gi.stroke_color_space, ColorSpace::DeviceCmyk);
    }

    #[test]
    fn color_space_then_components() {
        let mut state = InterpreterState::new();
        state.set_fill_color_space(ColorSpace::DeviceCmyk);
        assert_eq!(
            state.graphics_state().independent.fill_color,
            Color::Cmyk(0.0, 0.0, 0.0, 1.0)
        );
        state.set_fill_components(&[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(
            state.graphics_state().independent.fill_color,
            Color::Cmyk(0.1, 0.2, 0.3, 0.4)
        );
        state.set_stroke_components(&[0.5, 0.5]);
        assert_eq!(
            state.graphics_state().independent.stroke_color,
            Color::Other(vec![0.5, 0.5])
        );
    }

    // --- gs ---

    #[test]
    fn knockout_ignored_inside_text_object() {
        let mut state = InterpreterState::new();
        let ext = ExtGState {
            text_knockout: Some(false),
            line_width: Some(2.0),
            ..ExtGState::default()
        };
        state.begin_text();
        assert!(state.apply_ext_gstate(&ext));
        assert!(state.text_state().knockout);
        assert_eq!(state.graphics_state().independent.line_width, 2.0);

        state.end_text();
        assert!(!state.apply_ext_gstate(&ext));
        assert!(!state.text_state().knockout);
    }

    // --- BT/ET and positioning ---

    #[test]
    fn begin_text_resets_matrices_but_not_text_state() {
        let mut state = InterpreterState::new();
        state.text_state_mut().set_font("F1", 12.0);
        state.begin_text();
        state.move_text_position(100.0, 200.0);
        state.end_text();

        assert!(state.begin_text());
        let to = state.text_object().unwrap();
        assert_eq!(*to.text_matrix(), Ctm::identity());
        assert_eq!(*to.line_matrix(), Ctm::identity());
        assert_eq!(state.text_state().font.as_deref(), Some("F1"));
        assert_eq!(state.text_state().font_size, Some(12.0));
    }

    #[test]
    fn nested_bt_and_stray_et_are_reported() {
        let mut state = InterpreterState::new();
        assert!(state.begin_text());
        assert!(!state.begin_text());
        assert!(state.end_text());
        assert!(!state.end_text());
    }

    #[test]
    fn positioning_outside_text_object_is_rejected() {
        let mut state = InterpreterState::new();
        assert!(!state.move_text_position(1.0, 2.0));
        assert!(!state.move_text_position_and_set_leading(0.0, -12.0));
        assert!(!state.set_text_matrix(Ctm::identity()));
        assert!(!state.move_to_next_line());
        assert_eq!(state.text_state().leading, 0.0);
        assert!(state.rendering_matrix().is_none());
    }

    #[test]
    fn td_and_t_star_track_leading() {
        let mut state = InterpreterState::new();
        state.begin_text();
        state.move_text_position(72.0, 720.0);
        state.move_text_position_and_set_leading(0.0, -14.0);
        state.move_to_next_line();
        assert_eq!(state.text_state().leading, 14.0);
        let tm = state.text_object().unwrap().text_matrix();
        assert_approx(tm.e, 72.0);
        assert_approx(tm.f, 692.0);
    }

    #[test]
    fn rendering_matrix_uses_current_ctm() {
        let mut state = InterpreterState::new();
        state.scale(2.0, 2.0);
        state.text_state_mut().set_font("F1", 10.0);
        state.begin_text();
        state.set_text_matrix(Ctm::translation(5.0, 5.0));
        let trm = state.rendering_matrix().unwrap();
        assert_eq!(trm, Ctm::new(20.0, 0.0, 0.0, 20.0, 10.0, 10.0));
    }

    // --- Forms ---

    #[test]
    fn form_concatenates_matrix_and_restores() {
        let mut state = InterpreterState::new();
        state.translate(100.0, 0.0);
        state.begin_form(&Ctm::scaling(0.5, 0.5), false).unwrap();
        assert_eq!(*state.ctm(), Ctm::new(0.5, 0.0, 0.0, 0.5, 100.0, 0.0));
        assert_eq!(state.stack_depth(), 2);

        // unbalanced q inside the form
        state.save_state().unwrap();
        assert!(state.end_form());
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(*state.ctm(), Ctm::translation(100.0, 0.0));
        assert!(!state.end_form());
    }

    #[test]
    fn restore_can_not_escape_form() {
        let mut state = InterpreterState::new();
        state.save_state().unwrap();
        state.begin_form(&Ctm::identity(), false).unwrap();
        assert!(!state.restore_state());
        assert_eq!(state.stack_depth(), 3);
        state.end_form();
        assert!(state.restore_state());
    }

    #[test]
    fn transparency_group_resets_transparency() {
        let mut state = InterpreterState::new();
        state.apply_ext_gstate(&ExtGState {
            blend_mode: Some(BlendMode::Multiply),
            fill_alpha: Some(0.5),
            stroke_alpha: Some(0.25),
            soft_mask: Some(SoftMaskEntry::Mask(SoftMask {
                kind: SoftMaskKind::Alpha,
                group: ObjectRef::new(4, 0),
                backdrop: None,
                transfer: FunctionRef::Identity,
            })),
            ..ExtGState::default()
        });

        state.begin_form(&Ctm::identity(), true).unwrap();
        let gi = &state.graphics_state().independent;
        assert_eq!(gi.blend_mode, BlendMode::Normal);
        assert_eq!(gi.soft_mask, None);
        assert_eq!(gi.fill_alpha, 1.0);
        assert_eq!(gi.stroke_alpha, 1.0);

        state.end_form();
        let gi = &state.graphics_state().independent;
        assert_eq!(gi.blend_mode, BlendMode::Multiply);
        assert_eq!(gi.fill_alpha, 0.5);
        assert!(gi.soft_mask.is_some());
    }

    #[test]
    fn plain_form_keeps_transparency() {
        let mut state = InterpreterState::new();
        state.graphics_state_mut().independent.fill_alpha = 0.5;
        state.begin_form(&Ctm::identity(), false).unwrap();
        assert_eq!(state.graphics_state().independent.fill_alpha, 0.5);
    }

    #[test]
    fn form_hides_and_restores_text_object() {
        let mut state = InterpreterState::new();
        state.begin_text();
        state.move_text_position(10.0, 10.0);
        state.begin_form(&Ctm::identity(), false).unwrap();
        assert!(!state.in_text_object());
        state.end_form();
        assert_eq!(
            *state.text_object().unwrap().text_matrix(),
            Ctm::translation(10.0, 10.0)
        );
    }

    #[test]
    fn form_nesting_limit() {
        let options = InterpretOptions {
            max_recursion_depth: 2,
            ..InterpretOptions::default()
        };
        let mut state = InterpreterState::with_options(Ctm::identity(), &options);
        state.begin_form(&Ctm::identity(), false).unwrap();
        state.begin_form(&Ctm::identity(), false).unwrap();
        assert_eq!(
            state.begin_form(&Ctm::identity(), false),
            Err(InterpretError::RecursionLimit { max: 2 })
        );
        assert_eq!(state.form_depth(), 2);
        assert_eq!(state.stack_depth(), 3);
    }

    #[test]
    fn with_form_ends_form_on_error() {
        let mut state = InterpreterState::new();
        let result: Result<(), InterpretError> =
            state.with_form(&Ctm::scaling(2.0, 2.0), true, |s| {
                s.set_line_width(9.0);
                Err(InterpretError::Interpreter("stop".to_string()))
            });
        assert!(result.is_err());
        assert_eq!(state.form_depth(), 0);
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(state.graphics_state().independent.line_width, 1.0);
    }

    #[test]
    fn with_form_ends_form_on_panic() {
        let mut state = InterpreterState::new();
        let caught = catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), InterpretError> =
                state.with_form(&Ctm::translation(3.0, 4.0), false, |s| {
                    s.save_state().unwrap();
                    if s.form_depth() == 1 {
                        panic!("form body failed");
                    }
                    Ok(())
                });
        }));
        assert!(caught.is_err());
        assert_eq!(state.form_depth(), 0);
        assert_eq!(state.stack_depth(), 1);
        assert_eq!(*state.ctm(), Ctm::identity());
    }
}
