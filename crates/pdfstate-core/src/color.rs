//! Color values and color space families.
//!
//! A [`Color`] is stored as raw components; the active [`ColorSpace`] lives
//! next to it in the graphics state. Setting a color never validates the
//! component count against the active space.

/// A color value as set by the color operators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray (1 component).
    Gray(f32),
    /// DeviceRGB (3 components).
    Rgb(f32, f32, f32),
    /// DeviceCMYK (4 components).
    Cmyk(f32, f32, f32, f32),
    /// Any other component list (Indexed index, Separation/DeviceN tints, pattern components).
    Other(Vec<f32>),
}

impl Color {
    /// Black in DeviceGray, the initial color of the graphics state.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// Build a color from a component list, inferring the family from its length.
    pub fn from_components(components: &[f32]) -> Self {
        match *components {
            [g] => Color::Gray(g),
            [r, g, b] => Color::Rgb(r, g, b),
            [c, m, y, k] => Color::Cmyk(c, m, y, k),
            _ => Color::Other(components.to_vec()),
        }
    }

    /// The raw components of this color.
    pub fn components(&self) -> Vec<f32> {
        match self {
            Color::Gray(g) => vec![*g],
            Color::Rgb(r, g, b) => vec![*r, *g, *b],
            Color::Cmyk(c, m, y, k) => vec![*c, *m, *y, *k],
            Color::Other(v) => v.clone(),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Color space families.
///
/// Resource-backed spaces keep only what the state machine needs (component
/// counts, Indexed `hival`); their full definitions stay with the color
/// collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    #[default]
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    CalGray,
    CalRgb,
    Lab,
    IccBased {
        components: u32,
    },
    Indexed {
        hival: u32,
    },
    Pattern,
    Separation,
    DeviceN {
        components: u32,
    },
}

impl ColorSpace {
    /// Resolve one of the color space names usable without a resource lookup.
    ///
    /// Abbreviated inline-image names (`G`, `RGB`, `CMYK`) are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DeviceGray" | "G" => Some(Self::DeviceGray),
            "DeviceRGB" | "RGB" => Some(Self::DeviceRgb),
            "DeviceCMYK" | "CMYK" => Some(Self::DeviceCmyk),
            "Pattern" => Some(Self::Pattern),
            _ => None,
        }
    }

    /// Number of color components a value in this space carries.
    pub fn num_components(&self) -> u32 {
        match self {
            Self::DeviceGray | Self::CalGray | Self::Indexed { .. } | Self::Separation => 1,
            Self::DeviceRgb | Self::CalRgb | Self::Lab => 3,
            Self::DeviceCmyk => 4,
            Self::IccBased { components } | Self::DeviceN { components } => *components,
            Self::Pattern => 0,
        }
    }

    /// The color a `CS`/`cs` operator installs when it selects this space.
    pub fn initial_color(&self) -> Color {
        match self {
            Self::DeviceGray | Self::CalGray => Color::Gray(0.0),
            Self::DeviceRgb | Self::CalRgb => Color::Rgb(0.0, 0.0, 0.0),
            Self::DeviceCmyk => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
            Self::Lab => Color::Other(vec![0.0, 0.0, 0.0]),
            Self::IccBased { components } => match components {
                1 => Color::Gray(0.0),
                3 => Color::Rgb(0.0, 0.0, 0.0),
                4 => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
                n => Color::Other(vec![0.0; *n as usize]),
            },
            Self::Indexed { .. } => Color::Other(vec![0.0]),
            Self::Separation => Color::Other(vec![1.0]),
            Self::DeviceN { components } => Color::Other(vec![1.0; *components as usize]),
            Self::Pattern => Color::Other(Vec::new()),
        }
    }

    /// Interpret `SC`/`SCN` operands as a color of this space.
    ///
    /// Gray, RGB and CMYK families get their typed variants when the
    /// component count fits; anything else is kept as raw components.
    pub fn color_from_components(&self, components: &[f32]) -> Color {
        match (self, components) {
            (Self::DeviceGray | Self::CalGray, &[g]) => Color::Gray(g),
            (Self::DeviceRgb | Self::CalRgb, &[r, g, b]) => Color::Rgb(r, g, b),
            (Self::DeviceCmyk, &[c, m, y, k]) => Color::Cmyk(c, m, y, k),
            (Self::IccBased { .. }, _) => Color::from_components(components),
            _ => Color::Other(components.to_vec()),
        }
    }
}
