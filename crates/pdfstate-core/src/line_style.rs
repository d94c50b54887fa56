//! Line style parameters: cap style (`J`), join style (`j`) and dash pattern (`d`).

/// Line cap style (`J` operator, `/LC` in an ExtGState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    /// Square butt cap (default).
    #[default]
    Butt = 0,
    /// Round cap.
    Round = 1,
    /// Projecting square cap.
    ProjectingSquare = 2,
}

impl LineCap {
    /// Create a LineCap from its integer code (0-2).
    /// Returns None for invalid values.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Butt),
            1 => Some(Self::Round),
            2 => Some(Self::ProjectingSquare),
            _ => None,
        }
    }
}

/// Line join style (`j` operator, `/LJ` in an ExtGState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    /// Mitered join (default).
    #[default]
    Miter = 0,
    /// Round join.
    Round = 1,
    /// Bevel join.
    Bevel = 2,
}

impl LineJoin {
    /// Create a LineJoin from its integer code (0-2).
    /// Returns None for invalid values.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Miter),
            1 => Some(Self::Round),
            2 => Some(Self::Bevel),
            _ => None,
        }
    }
}

/// Dash pattern for stroking.
///
/// An empty `dash_array` means a solid line. Values are stored as given;
/// negative or all-zero arrays are not rejected here.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashPattern {
    /// Alternating dash and gap lengths.
    pub dash_array: Vec<f64>,
    /// Distance into the pattern at which to start.
    pub dash_phase: f64,
}

impl DashPattern {
    pub fn new(dash_array: Vec<f64>, dash_phase: f64) -> Self {
        Self {
            dash_array,
            dash_phase,
        }
    }

    /// A solid line: `[] 0 d`.
    pub fn solid() -> Self {
        Self::default()
    }

    /// Whether this pattern draws a solid line.
    pub fn is_solid(&self) -> bool {
        self.dash_array.is_empty()
    }
}
