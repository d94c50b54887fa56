//! Named resources a content stream refers to.
//!
//! Object resolution is done by the syntax layer. The interpreter only asks
//! for already-resolved values by resource name through [`Resources`];
//! [`MapResources`] is an in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pdfstate_core::{ColorSpace, Ctm, ExtGState, FontMetrics};

use crate::operator::Operator;

/// Font metrics shared between resource dictionaries and pages.
pub type SharedFont = Arc<dyn FontMetrics + Send + Sync>;

/// Lookup of the named resources of a page or form.
pub trait Resources {
    /// `/Font` entry, used by `Tf` and the text-showing operators.
    fn font(&self, name: &str) -> Option<&dyn FontMetrics>;

    /// `/ExtGState` entry, used by `gs`.
    fn ext_gstate(&self, name: &str) -> Option<&ExtGState>;

    /// `/ColorSpace` entry or a built-in family name, used by `CS`/`cs`.
    fn color_space(&self, name: &str) -> Option<ColorSpace> {
        ColorSpace::from_name(name)
    }

    /// Form XObject entry, used by `Do`.
    fn form(&self, _name: &str) -> Option<&FormXObject> {
        None
    }
}

/// Transparency group attributes (`/Group` with `/S /Transparency`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransparencyGroup {
    /// `/I`
    pub isolated: bool,
    /// `/K`
    pub knockout: bool,
    /// `/CS`, the group color space.
    pub color_space: Option<ColorSpace>,
}

/// A resolved form XObject.
#[derive(Debug, Clone, Default)]
pub struct FormXObject {
    /// `/Matrix`, form space to user space.
    pub matrix: Ctm,
    /// `/Group`, present when the form is a transparency group.
    pub group: Option<TransparencyGroup>,
    /// The form's content, already tokenized.
    pub operators: Vec<Operator>,
    /// `/Resources`; the invoking stream's resources are used when absent.
    pub resources: Option<MapResources>,
}

/// In-memory [`Resources`] keyed by resource name.
#[derive(Clone, Default)]
pub struct MapResources {
    fonts: HashMap<String, SharedFont>,
    ext_gstates: HashMap<String, ExtGState>,
    color_spaces: HashMap<String, ColorSpace>,
    forms: HashMap<String, FormXObject>,
}

impl MapResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(
        mut self,
        name: impl Into<String>,
        metrics: impl FontMetrics + Send + Sync + 'static,
    ) -> Self {
        self.fonts.insert(name.into(), Arc::new(metrics));
        self
    }

    /// Register a font that is already shared with other resource sets.
    pub fn with_shared_font(mut self, name: impl Into<String>, metrics: SharedFont) -> Self {
        self.fonts.insert(name.into(), metrics);
        self
    }

    pub fn with_ext_gstate(mut self, name: impl Into<String>, ext: ExtGState) -> Self {
        self.ext_gstates.insert(name.into(), ext);
        self
    }

    pub fn with_color_space(mut self, name: impl Into<String>, space: ColorSpace) -> Self {
        self.color_spaces.insert(name.into(), space);
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, form: FormXObject) -> Self {
        self.forms.insert(name.into(), form);
        self
    }
}

impl Resources for MapResources {
    fn font(&self, name: &str) -> Option<&dyn FontMetrics> {
        self.fonts
            .get(name)
            .map(|f| f.as_ref() as &dyn FontMetrics)
    }

    fn ext_gstate(&self, name: &str) -> Option<&ExtGState> {
        self.ext_gstates.get(name)
    }

    fn color_space(&self, name: &str) -> Option<ColorSpace> {
        self.color_spaces
            .get(name)
            .cloned()
            .or_else(|| ColorSpace::from_name(name))
    }

    fn form(&self, name: &str) -> Option<&FormXObject> {
        self.forms.get(name)
    }
}

impl fmt::Debug for MapResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fonts: Vec<&String> = self.fonts.keys().collect();
        fonts.sort();
        f.debug_struct("MapResources")
            .field("fonts", &fonts)
            .field("ext_gstates", &self.ext_gstates)
            .field("color_spaces", &self.color_spaces)
            .field("forms", &self.forms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfstate_core::SimpleFontMetrics;

    #[test]
    fn empty_resources_resolve_only_builtin_spaces() {
        let res = MapResources::new();
        assert!(res.font("F1").is_none());
        assert!(res.ext_gstate("GS0").is_none());
        assert!(res.form("Fm0").is_none());
        assert_eq!(res.color_space("DeviceRGB"), Some(ColorSpace::DeviceRgb));
        assert_eq!(res.color_space("CS0"), None);
    }

    #[test]
    fn named_entries_resolve() {
        let res = MapResources::new()
            .with_font("F1", SimpleFontMetrics::default_metrics())
            .with_ext_gstate(
                "GS0",
                ExtGState {
                    line_width: Some(3.0),
                    ..ExtGState::default()
                },
            )
            .with_color_space("CS0", ColorSpace::IccBased { components: 3 })
            .with_form("Fm0", FormXObject::default());

        assert_eq!(res.font("F1").map(|f| f.advance_width(65)), Some(600.0));
        assert_eq!(res.ext_gstate("GS0").and_then(|e| e.line_width), Some(3.0));
        assert_eq!(
            res.color_space("CS0"),
            Some(ColorSpace::IccBased { components: 3 })
        );
        assert!(res.form("Fm0").is_some());
    }

    #[test]
    fn named_color_space_shadows_builtin_name() {
        let res = MapResources::new().with_color_space("DeviceRGB", ColorSpace::CalRgb);
        assert_eq!(res.color_space("DeviceRGB"), Some(ColorSpace::CalRgb));
    }

    #[test]
    fn shared_font_is_not_copied() {
        let font: SharedFont = Arc::new(SimpleFontMetrics::default_metrics());
        let a = MapResources::new().with_shared_font("F1", Arc::clone(&font));
        let b = MapResources::new().with_shared_font("F1", Arc::clone(&font));
        assert_eq!(Arc::strong_count(&font), 3);
        assert!(a.font("F1").is_some() && b.font("F1").is_some());
    }

    #[test]
    fn debug_lists_font_names() {
        let res = MapResources::new()
            .with_font("F2", SimpleFontMetrics::default_metrics())
            .with_font("F1", SimpleFontMetrics::default_metrics());
        let dbg = format!("{res:?}");
        assert!(dbg.contains("[\"F1\", \"F2\"]"));
    }
}
