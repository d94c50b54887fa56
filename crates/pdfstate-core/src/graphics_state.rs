//! Graphics state records (PDF 32000-1 §8.4).
//!
//! [`GraphicsState`] pairs the device-independent parameters with the
//! device-dependent ones. The two halves are separate types so that
//! rasterizer tuning (overprint, halftone, flatness) can never leak into
//! what is handed to device-independent consumers.

use crate::color::{Color, ColorSpace};
use crate::geometry::{Ctm, Point};
use crate::line_style::{DashPattern, LineCap, LineJoin};
use crate::text_state::TextState;

/// Indirect object reference `id generation R`, resolved by the syntax layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    pub id: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub fn new(id: u32, generation: u16) -> Self {
        Self { id, generation }
    }
}

/// A function-valued parameter: black generation, undercolor removal, transfer.
///
/// `Default` is the device's own choice, `Identity` the identity function;
/// both are distinct from a concrete function object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionRef {
    #[default]
    Default,
    Identity,
    Reference(ObjectRef),
}

/// The halftone parameter: the device default screen or a halftone object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HalftoneRef {
    #[default]
    Default,
    Reference(ObjectRef),
}

/// Rendering intent (`ri` operator, `/RI` in an ExtGState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderingIntent {
    AbsoluteColorimetric,
    #[default]
    RelativeColorimetric,
    Saturation,
    Perceptual,
}

impl RenderingIntent {
    /// Resolve an intent name. Unknown names fall back to RelativeColorimetric,
    /// which is what a conforming reader uses for unrecognized intents.
    pub fn from_name(name: &str) -> Self {
        match name {
            "AbsoluteColorimetric" => Self::AbsoluteColorimetric,
            "Saturation" => Self::Saturation,
            "Perceptual" => Self::Perceptual,
            _ => Self::RelativeColorimetric,
        }
    }
}

/// Blend mode of the transparent imaging model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Resolve a blend mode name. `Compatible` is an alias of `Normal`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" | "Compatible" => Some(Self::Normal),
            "Multiply" => Some(Self::Multiply),
            "Screen" => Some(Self::Screen),
            "Overlay" => Some(Self::Overlay),
            "Darken" => Some(Self::Darken),
            "Lighten" => Some(Self::Lighten),
            "ColorDodge" => Some(Self::ColorDodge),
            "ColorBurn" => Some(Self::ColorBurn),
            "HardLight" => Some(Self::HardLight),
            "SoftLight" => Some(Self::SoftLight),
            "Difference" => Some(Self::Difference),
            "Exclusion" => Some(Self::Exclusion),
            "Hue" => Some(Self::Hue),
            "Saturation" => Some(Self::Saturation),
            "Color" => Some(Self::Color),
            "Luminosity" => Some(Self::Luminosity),
            _ => None,
        }
    }

    /// Pick the first recognized mode from a `/BM` array, as readers must.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        names.into_iter().find_map(Self::from_name)
    }
}

/// Which channel of the mask group becomes the soft mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoftMaskKind {
    Alpha,
    Luminosity,
}

/// A soft-mask dictionary (`/SMask` in an ExtGState).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftMask {
    pub kind: SoftMaskKind,
    /// The transparency group XObject that defines the mask.
    pub group: ObjectRef,
    /// Backdrop color for luminosity masks, in the group's color space.
    pub backdrop: Option<Vec<f32>>,
    /// Transfer function applied to the mask values.
    pub transfer: FunctionRef,
}

/// `/UseBlackPtComp` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlackPointCompensation {
    #[default]
    Default,
    On,
    Off,
}

/// Device-independent graphics state parameters (Table 52).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIndependentState {
    /// Current transformation matrix (user space to device space).
    pub ctm: Ctm,
    /// Stroking color space (set by CS).
    pub stroke_color_space: ColorSpace,
    /// Non-stroking color space (set by cs).
    pub fill_color_space: ColorSpace,
    /// Stroking color.
    pub stroke_color: Color,
    /// Non-stroking (fill) color.
    pub fill_color: Color,
    /// Line width (default 1.0).
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Miter limit (default 10.0).
    pub miter_limit: f64,
    pub dash_pattern: DashPattern,
    pub rendering_intent: RenderingIntent,
    pub stroke_adjustment: bool,
    pub blend_mode: BlendMode,
    /// Soft mask; `None` is the name `/None`.
    pub soft_mask: Option<SoftMask>,
    /// Stroking alpha constant (`/CA`, default 1.0).
    pub stroke_alpha: f64,
    /// Non-stroking alpha constant (`/ca`, default 1.0).
    pub fill_alpha: f64,
    /// Alpha source flag (`/AIS`): alpha values are shape rather than opacity.
    pub alpha_is_shape: bool,
    pub black_point_compensation: BlackPointCompensation,
    /// Text state parameters, saved and restored with the rest of the state.
    pub text_state: TextState,
}

impl Default for DeviceIndependentState {
    fn default() -> Self {
        Self {
            ctm: Ctm::identity(),
            stroke_color_space: ColorSpace::DeviceGray,
            fill_color_space: ColorSpace::DeviceGray,
            stroke_color: Color::black(),
            fill_color: Color::black(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash_pattern: DashPattern::solid(),
            rendering_intent: RenderingIntent::RelativeColorimetric,
            stroke_adjustment: false,
            blend_mode: BlendMode::Normal,
            soft_mask: None,
            stroke_alpha: 1.0,
            fill_alpha: 1.0,
            alpha_is_shape: false,
            black_point_compensation: BlackPointCompensation::Default,
            text_state: TextState::new(),
        }
    }
}

impl DeviceIndependentState {
    /// Start from the page's initial state with the given default CTM.
    pub fn with_ctm(ctm: Ctm) -> Self {
        Self {
            ctm,
            ..Self::default()
        }
    }

    // --- cm and wrappers ---

    /// `cm` operator: `CTM := transform × CTM`.
    ///
    /// The operand matrix acts in the current user space, so it is
    /// pre-multiplied onto the CTM.
    pub fn concatenate(&mut self, transform: &Ctm) {
        self.ctm = transform.concat(&self.ctm);
    }

    /// Translate user space by `(tx, ty)`.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.concatenate(&Ctm::translation(tx, ty));
    }

    /// Scale user space by `(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concatenate(&Ctm::scaling(sx, sy));
    }

    /// Rotate user space counter-clockwise by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.concatenate(&Ctm::rotation(angle));
    }

    // --- Colors ---

    /// Replace the stroking color. The value is not checked against the space.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    /// Replace the non-stroking color. The value is not checked against the space.
    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// `CS` operator: select the stroking space and reset to its initial color.
    pub fn set_stroke_color_space(&mut self, space: ColorSpace) {
        self.stroke_color = space.initial_color();
        self.stroke_color_space = space;
    }

    /// `cs` operator: select the non-stroking space and reset to its initial color.
    pub fn set_fill_color_space(&mut self, space: ColorSpace) {
        self.fill_color = space.initial_color();
        self.fill_color_space = space;
    }

    // --- Line style ---

    /// `w` operator. Zero is legal (thinnest line the device can draw).
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    /// `J` operator.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    /// `j` operator.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    /// `M` operator.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.miter_limit = limit;
    }

    /// `d` operator.
    pub fn set_dash_pattern(&mut self, dash_array: Vec<f64>, dash_phase: f64) {
        self.dash_pattern = DashPattern::new(dash_array, dash_phase);
    }

    /// `ri` operator.
    pub fn set_rendering_intent(&mut self, intent: RenderingIntent) {
        self.rendering_intent = intent;
    }

    /// Reset the parameters a transparency group starts from: blend mode
    /// Normal, no soft mask, both alpha constants 1.0.
    pub fn reset_transparency(&mut self) {
        self.blend_mode = BlendMode::Normal;
        self.soft_mask = None;
        self.stroke_alpha = 1.0;
        self.fill_alpha = 1.0;
    }
}

/// Device-dependent graphics state parameters (Table 53).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceDependentState {
    /// Overprint for stroking operations (`/OP`).
    pub overprint_stroke: bool,
    /// Overprint for all other painting operations (`/op`).
    pub overprint_fill: bool,
    /// Overprint mode (`/OPM`), 0 or 1.
    pub overprint_mode: i64,
    pub black_generation: FunctionRef,
    pub undercolor_removal: FunctionRef,
    pub transfer: FunctionRef,
    pub halftone: HalftoneRef,
    /// Halftone origin in device space (`/HTO`).
    pub halftone_origin: Option<Point>,
    /// Flatness tolerance (`i` operator, `/FL`; default 1.0).
    pub flatness: f64,
    /// Smoothness tolerance (`/SM`). `None` leaves the choice to the device.
    pub smoothness: Option<f64>,
}

impl Default for DeviceDependentState {
    fn default() -> Self {
        Self {
            overprint_stroke: false,
            overprint_fill: false,
            overprint_mode: 0,
            black_generation: FunctionRef::Default,
            undercolor_removal: FunctionRef::Default,
            transfer: FunctionRef::Default,
            halftone: HalftoneRef::Default,
            halftone_origin: None,
            flatness: 1.0,
            smoothness: None,
        }
    }
}

impl DeviceDependentState {
    /// `i` operator.
    pub fn set_flatness(&mut self, flatness: f64) {
        self.flatness = flatness;
    }
}

/// The complete graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphicsState {
    pub independent: DeviceIndependentState,
    pub dependent: DeviceDependentState,
}

impl GraphicsState {
    /// Initial page state with the given default CTM.
    pub fn with_ctm(ctm: Ctm) -> Self {
        Self {
            independent: DeviceIndependentState::with_ctm(ctm),
            dependent: DeviceDependentState::default(),
        }
    }

    pub fn ctm(&self) -> &Ctm {
        &self.independent.ctm
    }

    pub fn text_state(&self) -> &TextState {
        &self.independent.text_state
    }

    pub fn text_state_mut(&mut self) -> &mut TextState {
        &mut self.independent.text_state
    }
}
