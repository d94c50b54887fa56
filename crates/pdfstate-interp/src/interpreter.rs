//! Content stream interpreter.
//!
//! Interprets tokenized PDF content stream operators against an
//! [`InterpreterState`], emitting glyph, paint and warning events to a
//! [`ContentHandler`]. Form XObjects invoked by `Do` are executed
//! recursively inside their own state scope.

use pdfstate_core::{
    Color, Ctm, FontMetrics, InterpretOptions, InterpretWarning, InterpretWarningCode, LineCap,
    LineJoin, RenderingIntent, TextRenderMode,
};

use crate::error::InterpretError;
use crate::handler::{ContentHandler, GlyphEvent, PaintEvent, PaintOp};
use crate::interpreter_state::InterpreterState;
use crate::operator::{
    Operand, Operator, get_f32, get_f64, get_i64, get_name, get_numbers, numeric_components,
};
use crate::resources::Resources;
use crate::text_renderer::{TjElement, show_string, show_string_with_positioning};

/// Counts gathered while interpreting a stream (forms included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpretSummary {
    /// Glyph events delivered to the handler.
    pub glyph_count: usize,
    /// Paint events delivered to the handler.
    pub paint_count: usize,
    /// Warnings raised, whether or not they were delivered.
    pub warning_count: usize,
}

/// Interpret `operators` with `state` as the current graphics state.
///
/// Nesting and stack limits are the ones `state` was created with (see
/// [`InterpreterState::with_options`]); `options` decides how warnings are
/// delivered and whether they abort interpretation.
///
/// The state is left as the last operator left it, including any unbalanced
/// `q` and an unterminated text object.
pub fn interpret_operators(
    operators: &[Operator],
    resources: &dyn Resources,
    state: &mut InterpreterState,
    handler: &mut dyn ContentHandler,
    options: &InterpretOptions,
) -> Result<InterpretSummary, InterpretError> {
    let mut session = Session {
        handler,
        options,
        summary: InterpretSummary::default(),
    };
    session.run(operators, resources, state)?;
    Ok(session.summary)
}

struct Session<'a> {
    handler: &'a mut dyn ContentHandler,
    options: &'a InterpretOptions,
    summary: InterpretSummary,
}

impl Session<'_> {
    fn run(
        &mut self,
        operators: &[Operator],
        resources: &dyn Resources,
        state: &mut InterpreterState,
    ) -> Result<(), InterpretError> {
        // Unknown operators inside BX ... EX are expected and stay silent.
        let mut compat_depth = 0usize;

        for (index, op) in operators.iter().enumerate() {
            #[cfg(feature = "tracing")]
            tracing::trace!(index, operator = %op.name, "dispatch");

            let operands = op.operands.as_slice();
            match op.name.as_str() {
                // --- Graphics state operators ---
                "q" => state.save_state()?,
                "Q" => {
                    if !state.restore_state() {
                        self.warn(
                            InterpretWarning::new(
                                InterpretWarningCode::UnbalancedRestore,
                                "Q without a matching q",
                            )
                            .at_operator(index, "Q"),
                        )?;
                    }
                }
                "cm" => match get_numbers::<6>(operands) {
                    Some(m) => state.concat_matrix(&Ctm::from_array(m)),
                    None => self.malformed(index, op)?,
                },
                "w" => match get_f64(operands, 0) {
                    Some(width) => state.set_line_width(width),
                    None => self.malformed(index, op)?,
                },
                "J" => match get_i64(operands, 0).and_then(LineCap::from_i64) {
                    Some(cap) => state.set_line_cap(cap),
                    None => self.malformed(index, op)?,
                },
                "j" => match get_i64(operands, 0).and_then(LineJoin::from_i64) {
                    Some(join) => state.set_line_join(join),
                    None => self.malformed(index, op)?,
                },
                "M" => match get_f64(operands, 0) {
                    Some(limit) => state.set_miter_limit(limit),
                    None => self.malformed(index, op)?,
                },
                "d" => match (operands.first(), get_f64(operands, 1)) {
                    (Some(Operand::Array(arr)), Some(phase)) => {
                        let dash_array = arr.iter().filter_map(Operand::as_f64).collect();
                        state.set_dash_pattern(dash_array, phase);
                    }
                    _ => self.malformed(index, op)?,
                },
                "ri" => match get_name(operands, 0) {
                    Some(name) => state.set_rendering_intent(RenderingIntent::from_name(name)),
                    None => self.malformed(index, op)?,
                },
                "i" => match get_f64(operands, 0) {
                    Some(flatness) => state.set_flatness(flatness),
                    None => self.malformed(index, op)?,
                },
                "gs" => {
                    let Some(name) = get_name(operands, 0) else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    match resources.ext_gstate(name) {
                        Some(ext) => {
                            if state.apply_ext_gstate(ext) {
                                self.warn(
                                    InterpretWarning::new(
                                        InterpretWarningCode::TextKnockoutInTextObject,
                                        format!("/TK in {name} ignored inside BT/ET"),
                                    )
                                    .at_operator(index, "gs"),
                                )?;
                            }
                        }
                        None => self.missing_resource(index, op, "ExtGState", name)?,
                    }
                }

                // --- Color operators ---
                "CS" | "cs" => {
                    let Some(name) = get_name(operands, 0) else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    match resources.color_space(name) {
                        Some(space) if op.name == "CS" => state.set_stroke_color_space(space),
                        Some(space) => state.set_fill_color_space(space),
                        None => self.missing_resource(index, op, "color space", name)?,
                    }
                }
                "SC" | "SCN" => state.set_stroke_components(&numeric_components(operands)),
                "sc" | "scn" => state.set_fill_components(&numeric_components(operands)),
                "G" | "g" => match get_f32(operands, 0) {
                    Some(gray) => set_device_color(state, &op.name, Color::Gray(gray)),
                    None => self.malformed(index, op)?,
                },
                "RG" | "rg" => match get_numbers::<3>(operands) {
                    Some([r, g, b]) => set_device_color(
                        state,
                        &op.name,
                        Color::Rgb(r as f32, g as f32, b as f32),
                    ),
                    None => self.malformed(index, op)?,
                },
                "K" | "k" => match get_numbers::<4>(operands) {
                    Some([c, m, y, k]) => set_device_color(
                        state,
                        &op.name,
                        Color::Cmyk(c as f32, m as f32, y as f32, k as f32),
                    ),
                    None => self.malformed(index, op)?,
                },

                // --- Text object and text state operators ---
                "BT" => {
                    if !state.begin_text() {
                        self.warn(
                            InterpretWarning::new(
                                InterpretWarningCode::Other("NESTED_TEXT_OBJECT".to_string()),
                                "BT inside an open text object",
                            )
                            .at_operator(index, "BT"),
                        )?;
                    }
                }
                "ET" => {
                    if !state.end_text() {
                        self.no_text_object(index, op)?;
                    }
                }
                "Td" | "TD" => match get_numbers::<2>(operands) {
                    Some([tx, ty]) => {
                        let moved = if op.name == "Td" {
                            state.move_text_position(tx, ty)
                        } else {
                            state.move_text_position_and_set_leading(tx, ty)
                        };
                        if !moved {
                            self.no_text_object(index, op)?;
                        }
                    }
                    None => self.malformed(index, op)?,
                },
                "Tm" => match get_numbers::<6>(operands) {
                    Some(m) => {
                        if !state.set_text_matrix(Ctm::from_array(m)) {
                            self.no_text_object(index, op)?;
                        }
                    }
                    None => self.malformed(index, op)?,
                },
                "T*" => {
                    if !state.move_to_next_line() {
                        self.no_text_object(index, op)?;
                    }
                }
                "Tc" => match get_f64(operands, 0) {
                    Some(v) => state.text_state_mut().set_char_spacing(v),
                    None => self.malformed(index, op)?,
                },
                "Tw" => match get_f64(operands, 0) {
                    Some(v) => state.text_state_mut().set_word_spacing(v),
                    None => self.malformed(index, op)?,
                },
                "Tz" => match get_f64(operands, 0) {
                    Some(v) => state.text_state_mut().set_h_scaling(v),
                    None => self.malformed(index, op)?,
                },
                "TL" => match get_f64(operands, 0) {
                    Some(v) => state.text_state_mut().set_leading(v),
                    None => self.malformed(index, op)?,
                },
                "Ts" => match get_f64(operands, 0) {
                    Some(v) => state.text_state_mut().set_rise(v),
                    None => self.malformed(index, op)?,
                },
                "Tr" => match get_i64(operands, 0).and_then(TextRenderMode::from_i64) {
                    Some(mode) => state.text_state_mut().set_render_mode(mode),
                    None => self.malformed(index, op)?,
                },
                "Tf" => match (get_name(operands, 0), get_f64(operands, 1)) {
                    (Some(name), Some(size)) => state.text_state_mut().set_font(name, size),
                    _ => self.malformed(index, op)?,
                },

                // --- Text showing operators ---
                "Tj" => {
                    let Some(bytes) = operands.first().and_then(Operand::as_bytes) else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    let Some(font) = self.text_font(index, op, resources, state)? else {
                        continue;
                    };
                    let Some((text_object, gs)) = state.text_parts_mut() else {
                        continue;
                    };
                    self.emit_glyphs(show_string(text_object, gs, font, bytes));
                }
                "'" | "\"" => {
                    let parsed = if op.name == "'" {
                        operands.first().and_then(Operand::as_bytes).map(|b| (None, b))
                    } else {
                        get_numbers::<2>(operands)
                            .zip(operands.get(2).and_then(Operand::as_bytes))
                            .map(|(spacing, b)| (Some(spacing), b))
                    };
                    let Some((spacing, bytes)) = parsed else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    if !state.in_text_object() {
                        self.no_text_object(index, op)?;
                        continue;
                    }
                    // Spacing and the line move apply even when no glyphs are shown.
                    if let Some([aw, ac]) = spacing {
                        state.text_state_mut().set_word_spacing(aw);
                        state.text_state_mut().set_char_spacing(ac);
                    }
                    state.move_to_next_line();
                    let Some(font) = self.text_font(index, op, resources, state)? else {
                        continue;
                    };
                    let Some((text_object, gs)) = state.text_parts_mut() else {
                        continue;
                    };
                    self.emit_glyphs(show_string(text_object, gs, font, bytes));
                }
                "TJ" => {
                    let Some(Operand::Array(array)) = operands.first() else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    let elements = tj_elements(array);
                    let Some(font) = self.text_font(index, op, resources, state)? else {
                        continue;
                    };
                    let Some((text_object, gs)) = state.text_parts_mut() else {
                        continue;
                    };
                    let glyphs = show_string_with_positioning(text_object, gs, font, &elements);
                    self.emit_glyphs(glyphs);
                }

                // --- XObjects ---
                "Do" => {
                    let Some(name) = get_name(operands, 0) else {
                        self.malformed(index, op)?;
                        continue;
                    };
                    let Some(form) = resources.form(name) else {
                        self.missing_resource(index, op, "form XObject", name)?;
                        continue;
                    };
                    let form_resources: &dyn Resources = match &form.resources {
                        Some(own) => own,
                        None => resources,
                    };
                    state.with_form(&form.matrix, form.group.is_some(), |s| {
                        self.run(&form.operators, form_resources, s)
                    })?;
                }

                // --- Painting operators ---
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" | "sh" => {
                    if let Some(paint) = PaintOp::from_operator(&op.name) {
                        self.summary.paint_count += 1;
                        self.handler
                            .on_paint(PaintEvent::capture(paint, state.graphics_state()));
                    }
                }

                // --- Compatibility sections ---
                "BX" => compat_depth += 1,
                "EX" => compat_depth = compat_depth.saturating_sub(1),

                // Path construction, clipping, marked content, Type 3 glyph
                // metrics and inline images do not touch the tracked state.
                "m" | "l" | "c" | "v" | "y" | "re" | "h" | "n" | "W" | "W*" | "BMC" | "BDC"
                | "EMC" | "MP" | "DP" | "d0" | "d1" | "BI" | "ID" | "EI" => {}

                _ => {
                    if compat_depth == 0 {
                        self.warn(
                            InterpretWarning::new(
                                InterpretWarningCode::UnsupportedOperator,
                                format!("unknown operator {}", op.name),
                            )
                            .at_operator(index, &op.name),
                        )?;
                    }
                }
            }
        }

        if state.in_text_object() {
            self.warn(InterpretWarning::new(
                InterpretWarningCode::UnterminatedTextObject,
                "content ended inside BT/ET",
            ))?;
        }
        Ok(())
    }

    /// Font for a text-showing operator, or `None` after warning that the
    /// glyphs must be skipped.
    fn text_font<'r>(
        &mut self,
        index: usize,
        op: &Operator,
        resources: &'r dyn Resources,
        state: &InterpreterState,
    ) -> Result<Option<&'r dyn FontMetrics>, InterpretError> {
        if !state.in_text_object() {
            self.no_text_object(index, op)?;
            return Ok(None);
        }
        let Some(name) = state.text_state().font.as_deref() else {
            self.warn(
                InterpretWarning::new(
                    InterpretWarningCode::MissingFont,
                    format!("{} before any Tf", op.name),
                )
                .at_operator(index, &op.name),
            )?;
            return Ok(None);
        };
        match resources.font(name) {
            Some(font) => Ok(Some(font)),
            None => {
                self.warn(
                    InterpretWarning::new(
                        InterpretWarningCode::MissingFont,
                        "font not found in resources",
                    )
                    .at_operator(index, &op.name)
                    .with_font(name),
                )?;
                Ok(None)
            }
        }
    }

    fn emit_glyphs(&mut self, glyphs: Vec<GlyphEvent>) {
        self.summary.glyph_count += glyphs.len();
        for glyph in glyphs {
            self.handler.on_glyph(glyph);
        }
    }

    fn malformed(&mut self, index: usize, op: &Operator) -> Result<(), InterpretError> {
        self.warn(
            InterpretWarning::new(
                InterpretWarningCode::MalformedOperands,
                format!("missing or invalid operands for {}", op.name),
            )
            .at_operator(index, &op.name),
        )
    }

    fn missing_resource(
        &mut self,
        index: usize,
        op: &Operator,
        kind: &str,
        name: &str,
    ) -> Result<(), InterpretError> {
        self.warn(
            InterpretWarning::new(
                InterpretWarningCode::MissingResource,
                format!("{kind} {name} not found"),
            )
            .at_operator(index, &op.name),
        )
    }

    fn no_text_object(&mut self, index: usize, op: &Operator) -> Result<(), InterpretError> {
        self.warn(
            InterpretWarning::new(
                InterpretWarningCode::Other("NO_TEXT_OBJECT".to_string()),
                format!("{} outside BT/ET", op.name),
            )
            .at_operator(index, &op.name),
        )
    }

    /// Deliver a warning, or turn it into an error in strict mode.
    fn warn(&mut self, warning: InterpretWarning) -> Result<(), InterpretError> {
        #[cfg(feature = "tracing")]
        tracing::warn!(code = warning.code.as_str(), "{}", warning);

        if self.options.strict_mode {
            return Err(escalate(warning));
        }
        self.summary.warning_count += 1;
        if self.options.collect_warnings {
            self.handler.on_warning(warning);
        }
        Ok(())
    }
}

fn escalate(warning: InterpretWarning) -> InterpretError {
    let operator_index = warning.operator_index.unwrap_or(0);
    match warning.code {
        InterpretWarningCode::UnbalancedRestore => {
            InterpretError::UnbalancedRestore { operator_index }
        }
        InterpretWarningCode::MissingFont => InterpretError::MissingFont {
            operator: warning.operator.unwrap_or_default(),
            operator_index,
        },
        _ => InterpretError::Pdf(warning.to_error()),
    }
}

/// Uppercase operators set the stroking color, lowercase the non-stroking one.
fn set_device_color(state: &mut InterpreterState, name: &str, color: Color) {
    if name.starts_with(|c: char| c.is_ascii_uppercase()) {
        state.set_stroke_device_color(color);
    } else {
        state.set_fill_device_color(color);
    }
}

fn tj_elements(array: &[Operand]) -> Vec<TjElement> {
    array
        .iter()
        .filter_map(|item| match item {
            Operand::LiteralString(s) | Operand::HexString(s) => Some(TjElement::String(s.clone())),
            Operand::Integer(_) | Operand::Real(_) => item.as_f64().map(TjElement::Adjustment),
            _ => None,
        })
        .collect()
}
