//! Extended graphics state parameter dictionaries (`gs` operator).
//!
//! An [`ExtGState`] is the already-resolved content of an `/ExtGState`
//! resource entry. Every field is optional; only present entries override
//! the current graphics state.

use crate::geometry::Point;
use crate::graphics_state::{
    BlackPointCompensation, BlendMode, FunctionRef, GraphicsState, HalftoneRef,
    RenderingIntent, SoftMask,
};
use crate::line_style::{DashPattern, LineCap, LineJoin};

/// Value of an `/SMask` entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoftMaskEntry {
    /// The name `/None`: clears the current soft mask.
    None,
    /// A soft mask dictionary.
    Mask(SoftMask),
}

impl SoftMaskEntry {
    /// The mask this entry installs, `None` when it clears the mask.
    pub fn mask(&self) -> Option<&SoftMask> {
        match self {
            SoftMaskEntry::None => None,
            SoftMaskEntry::Mask(mask) => Some(mask),
        }
    }
}

/// Parsed graphics state parameter dictionary (Table 58).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtGState {
    /// `/LW`
    pub line_width: Option<f64>,
    /// `/LC`
    pub line_cap: Option<LineCap>,
    /// `/LJ`
    pub line_join: Option<LineJoin>,
    /// `/ML`
    pub miter_limit: Option<f64>,
    /// `/D`
    pub dash_pattern: Option<DashPattern>,
    /// `/RI`
    pub rendering_intent: Option<RenderingIntent>,
    /// `/OP`: stroking overprint; also the non-stroking value when `/op` is absent.
    pub overprint_stroke: Option<bool>,
    /// `/op`
    pub overprint_fill: Option<bool>,
    /// `/OPM`
    pub overprint_mode: Option<i64>,
    /// `/Font`: font resource name and size.
    pub font: Option<(String, f64)>,
    /// `/BG`
    pub black_generation: Option<FunctionRef>,
    /// `/BG2`, takes precedence over `/BG`.
    pub black_generation2: Option<FunctionRef>,
    /// `/UCR`
    pub undercolor_removal: Option<FunctionRef>,
    /// `/UCR2`, takes precedence over `/UCR`.
    pub undercolor_removal2: Option<FunctionRef>,
    /// `/TR`
    pub transfer: Option<FunctionRef>,
    /// `/TR2`, takes precedence over `/TR`.
    pub transfer2: Option<FunctionRef>,
    /// `/HT`
    pub halftone: Option<HalftoneRef>,
    /// `/HTO`
    pub halftone_origin: Option<Point>,
    /// `/FL`
    pub flatness: Option<f64>,
    /// `/SM`
    pub smoothness: Option<f64>,
    /// `/SA`
    pub stroke_adjustment: Option<bool>,
    /// `/BM`
    pub blend_mode: Option<BlendMode>,
    /// `/SMask`
    pub soft_mask: Option<SoftMaskEntry>,
    /// `/CA`
    pub stroke_alpha: Option<f64>,
    /// `/ca`
    pub fill_alpha: Option<f64>,
    /// `/AIS`
    pub alpha_is_shape: Option<bool>,
    /// `/TK`
    pub text_knockout: Option<bool>,
    /// `/UseBlackPtComp`
    pub black_point_compensation: Option<BlackPointCompensation>,
}

impl GraphicsState {
    /// Apply every entry present in `ext` to this state.
    pub fn apply_ext_gstate(&mut self, ext: &ExtGState) {
        let gi = &mut self.independent;
        let gd = &mut self.dependent;

        if let Some(v) = ext.line_width {
            gi.line_width = v;
        }
        if let Some(v) = ext.line_cap {
            gi.line_cap = v;
        }
        if let Some(v) = ext.line_join {
            gi.line_join = v;
        }
        if let Some(v) = ext.miter_limit {
            gi.miter_limit = v;
        }
        if let Some(ref v) = ext.dash_pattern {
            gi.dash_pattern = v.clone();
        }
        if let Some(v) = ext.rendering_intent {
            gi.rendering_intent = v;
        }
        if let Some(v) = ext.stroke_adjustment {
            gi.stroke_adjustment = v;
        }
        if let Some(v) = ext.blend_mode {
            gi.blend_mode = v;
        }
        if let Some(ref v) = ext.soft_mask {
            gi.soft_mask = v.mask().cloned();
        }
        if let Some(v) = ext.stroke_alpha {
            gi.stroke_alpha = v;
        }
        if let Some(v) = ext.fill_alpha {
            gi.fill_alpha = v;
        }
        if let Some(v) = ext.alpha_is_shape {
            gi.alpha_is_shape = v;
        }
        if let Some(v) = ext.black_point_compensation {
            gi.black_point_compensation = v;
        }
        if let Some((ref name, size)) = ext.font {
            gi.text_state.set_font(name.clone(), size);
        }
        if let Some(v) = ext.text_knockout {
            gi.text_state.set_knockout(v);
        }

        // `/op` defaults to `/OP` when only the latter is given.
        if let Some(v) = ext.overprint_stroke {
            gd.overprint_stroke = v;
            if ext.overprint_fill.is_none() {
                gd.overprint_fill = v;
            }
        }
        if let Some(v) = ext.overprint_fill {
            gd.overprint_fill = v;
        }
        if let Some(v) = ext.overprint_mode {
            gd.overprint_mode = v;
        }
        if let Some(v) = ext.black_generation2.or(ext.black_generation) {
            gd.black_generation = v;
        }
        if let Some(v) = ext.undercolor_removal2.or(ext.undercolor_removal) {
            gd.undercolor_removal = v;
        }
        if let Some(v) = ext.transfer2.or(ext.transfer) {
            gd.transfer = v;
        }
        if let Some(v) = ext.halftone {
            gd.halftone = v;
        }
        if let Some(v) = ext.halftone_origin {
            gd.halftone_origin = Some(v);
        }
        if let Some(v) = ext.flatness {
            gd.flatness = v;
        }
        if let Some(v) = ext.smoothness {
            gd.smoothness = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics_state::{ObjectRef, SoftMaskKind};

    #[test]
    fn test_empty_ext_gstate_changes_nothing() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState::default());
        assert_eq!(gs, GraphicsState::default());
    }

    #[test]
    fn test_line_parameters() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            line_width: Some(2.5),
            line_cap: Some(LineCap::Round),
            line_join: Some(LineJoin::Bevel),
            miter_limit: Some(4.0),
            dash_pattern: Some(DashPattern::new(vec![3.0, 1.0], 0.5)),
            ..ExtGState::default()
        });
        assert_eq!(gs.independent.line_width, 2.5);
        assert_eq!(gs.independent.line_cap, LineCap::Round);
        assert_eq!(gs.independent.line_join, LineJoin::Bevel);
        assert_eq!(gs.independent.miter_limit, 4.0);
        assert_eq!(
            gs.independent.dash_pattern,
            DashPattern::new(vec![3.0, 1.0], 0.5)
        );
    }

    #[test]
    fn test_transparency_parameters() {
        let mask = SoftMask {
            kind: SoftMaskKind::Alpha,
            group: ObjectRef::new(7, 0),
            backdrop: None,
            transfer: FunctionRef::Identity,
        };
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            blend_mode: Some(BlendMode::Multiply),
            soft_mask: Some(SoftMaskEntry::Mask(mask.clone())),
            stroke_alpha: Some(0.25),
            fill_alpha: Some(0.5),
            alpha_is_shape: Some(true),
            ..ExtGState::default()
        });
        assert_eq!(gs.independent.blend_mode, BlendMode::Multiply);
        assert_eq!(gs.independent.soft_mask, Some(mask));
        assert_eq!(gs.independent.stroke_alpha, 0.25);
        assert_eq!(gs.independent.fill_alpha, 0.5);
        assert!(gs.independent.alpha_is_shape);

        // /SMask /None clears it again.
        gs.apply_ext_gstate(&ExtGState {
            soft_mask: Some(SoftMaskEntry::None),
            ..ExtGState::default()
        });
        assert_eq!(gs.independent.soft_mask, None);
    }

    #[test]
    fn test_font_entry_sets_text_state() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            font: Some(("F2".to_string(), 9.0)),
            text_knockout: Some(false),
            ..ExtGState::default()
        });
        assert_eq!(gs.text_state().font.as_deref(), Some("F2"));
        assert_eq!(gs.text_state().font_size, Some(9.0));
        assert!(!gs.text_state().knockout);
    }

    #[test]
    fn test_op_alone_sets_both_overprint_flags() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            overprint_stroke: Some(true),
            ..ExtGState::default()
        });
        assert!(gs.dependent.overprint_stroke);
        assert!(gs.dependent.overprint_fill);

        gs.apply_ext_gstate(&ExtGState {
            overprint_stroke: Some(true),
            overprint_fill: Some(false),
            ..ExtGState::default()
        });
        assert!(gs.dependent.overprint_stroke);
        assert!(!gs.dependent.overprint_fill);
    }

    #[test]
    fn test_second_generation_functions_take_precedence() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            black_generation: Some(FunctionRef::Reference(ObjectRef::new(1, 0))),
            black_generation2: Some(FunctionRef::Default),
            transfer: Some(FunctionRef::Identity),
            undercolor_removal: Some(FunctionRef::Reference(ObjectRef::new(2, 0))),
            ..ExtGState::default()
        });
        assert_eq!(gs.dependent.black_generation, FunctionRef::Default);
        assert_eq!(gs.dependent.transfer, FunctionRef::Identity);
        assert_eq!(
            gs.dependent.undercolor_removal,
            FunctionRef::Reference(ObjectRef::new(2, 0))
        );
    }

    #[test]
    fn test_device_dependent_tuning() {
        let mut gs = GraphicsState::default();
        gs.apply_ext_gstate(&ExtGState {
            halftone: Some(HalftoneRef::Reference(ObjectRef::new(9, 0))),
            halftone_origin: Some(Point::new(1.0, 2.0)),
            flatness: Some(0.2),
            smoothness: Some(0.02),
            overprint_mode: Some(1),
            ..ExtGState::default()
        });
        assert_eq!(
            gs.dependent.halftone,
            HalftoneRef::Reference(ObjectRef::new(9, 0))
        );
        assert_eq!(gs.dependent.halftone_origin, Some(Point::new(1.0, 2.0)));
        assert_eq!(gs.dependent.flatness, 0.2);
        assert_eq!(gs.dependent.smoothness, Some(0.02));
        assert_eq!(gs.dependent.overprint_mode, 1);
        // Device-independent half untouched.
        assert_eq!(gs.independent, GraphicsState::default().independent);
    }
}
