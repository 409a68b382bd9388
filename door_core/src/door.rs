//! # Door Specification
//!
//! The request side of a quote: dimensions, material selections, structural
//! options and add-ons. A `DoorSpec` is built fresh for every quote and has
//! no identity of its own.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "length_mm": 2133.6,
//!   "width_mm": 914.4,
//!   "thickness_mm": 40.0,
//!   "rails_material": "Hardwood",
//!   "filler_material": "Ecolax Board",
//!   "core_option": "Core + HDF",
//!   "door_type": "Veneer",
//!   "finish_option": "Smoke Oak Veneer",
//!   "add_ons": {
//!     "vision_hole": true,
//!     "coating": { "variant": "Resin Coated", "sides": "Both Sides" },
//!     "grooving": { "sides": "Both Sides" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};

/// Internal reinforcement configuration of the door body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoreOption {
    /// Standard single core
    #[default]
    None,
    /// Double core
    #[serde(rename = "Double Core")]
    DoubleCore,
    /// Core with an HDF layer
    #[serde(rename = "Core + HDF")]
    CoreHdf,
}

impl CoreOption {
    /// All core options for UI selection
    pub const ALL: [CoreOption; 3] = [CoreOption::None, CoreOption::DoubleCore, CoreOption::CoreHdf];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CoreOption::None => "None",
            CoreOption::DoubleCore => "Double Core",
            CoreOption::CoreHdf => "Core + HDF",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match normalize_option_text(s).to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "" | "none" | "single" | "singlecore" => Ok(CoreOption::None),
            "doublecore" | "double" => Ok(CoreOption::DoubleCore),
            "core+hdf" | "corehdf" | "hdf" => Ok(CoreOption::CoreHdf),
            _ => Err(PricingError::invalid_input(
                "core_option",
                s,
                "Expected one of: None, Double Core, Core + HDF",
            )),
        }
    }
}

impl std::fmt::Display for CoreOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Door face type, which decides how the finish is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorType {
    /// Laminate face, fixed fee per door
    Laminate,
    /// Veneer face, priced per sqft on both faces
    Veneer,
}

impl DoorType {
    /// All door types for UI selection
    pub const ALL: [DoorType; 2] = [DoorType::Laminate, DoorType::Veneer];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DoorType::Laminate => "Laminate",
            DoorType::Veneer => "Veneer",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "laminate" | "lam" => Ok(DoorType::Laminate),
            "veneer" | "ven" => Ok(DoorType::Veneer),
            _ => Err(PricingError::invalid_input(
                "door_type",
                s,
                "Expected Laminate or Veneer",
            )),
        }
    }
}

impl std::fmt::Display for DoorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which faces an area add-on is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sides {
    #[serde(rename = "One Side")]
    OneSide,
    #[serde(rename = "Both Sides")]
    BothSides,
}

impl Sides {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Sides::OneSide => "One Side",
            Sides::BothSides => "Both Sides",
        }
    }
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Area-priced add-on features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddonFeature {
    Coating,
    Grooving,
    Routing,
}

impl AddonFeature {
    /// All area add-on features, in evaluation order
    pub const ALL: [AddonFeature; 3] = [AddonFeature::Coating, AddonFeature::Grooving, AddonFeature::Routing];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            AddonFeature::Coating => "Coating",
            AddonFeature::Grooving => "Grooving",
            AddonFeature::Routing => "Routing",
        }
    }
}

impl std::fmt::Display for AddonFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A selected area add-on option, e.g. "Resin Coated" on both sides.
///
/// Together with its [`AddonFeature`] this forms the rate lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AreaAddon {
    /// Named variant of the feature ("Resin Coated"), if the feature has variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Faces the add-on covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<Sides>,
}

impl AreaAddon {
    /// Add-on with only a side selection (grooving, routing)
    pub fn sides(sides: Sides) -> Self {
        AreaAddon {
            variant: None,
            sides: Some(sides),
        }
    }

    /// Add-on with a named variant and a side selection (coating)
    pub fn variant(variant: impl Into<String>, sides: Sides) -> Self {
        AreaAddon {
            variant: Some(variant.into()),
            sides: Some(sides),
        }
    }

    /// Parse free option text such as `"Resin Coated (Both Sides)"`.
    ///
    /// Whitespace is collapsed and parentheses are stripped. A trailing
    /// "One Side" / "Both Sides" becomes [`Sides`], anything before it the
    /// variant. Returns `None` for blank text or "none" in any case.
    ///
    /// ```rust
    /// use door_core::door::{AreaAddon, Sides};
    ///
    /// let coating = AreaAddon::parse("Resin Coated (Both Sides)").unwrap();
    /// assert_eq!(coating.variant.as_deref(), Some("Resin Coated"));
    /// assert_eq!(coating.sides, Some(Sides::BothSides));
    ///
    /// assert!(AreaAddon::parse("none").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = normalize_option_text(text);
        if normalized.is_empty() || normalized.eq_ignore_ascii_case("none") {
            return None;
        }

        let words: Vec<&str> = normalized.split(' ').collect();
        let (rest, sides) = match words.as_slice() {
            [rest @ .., a, b] if a.eq_ignore_ascii_case("one") && b.eq_ignore_ascii_case("side") => {
                (rest, Some(Sides::OneSide))
            }
            [rest @ .., a, b] if a.eq_ignore_ascii_case("both") && b.eq_ignore_ascii_case("sides") => {
                (rest, Some(Sides::BothSides))
            }
            all => (all, None),
        };

        let variant = if rest.is_empty() { None } else { Some(rest.join(" ")) };
        Some(AreaAddon { variant, sides })
    }

    /// Human-readable label, e.g. "Resin Coated (Both Sides)"
    pub fn label(&self) -> String {
        match (&self.variant, self.sides) {
            (Some(v), Some(s)) => format!("{} ({})", v, s),
            (Some(v), None) => v.clone(),
            (None, Some(s)) => s.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Collapse runs of whitespace and strip parentheses from option text.
pub fn normalize_option_text(text: &str) -> String {
    text.replace(['(', ')'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_true() -> bool {
    true
}

/// Optional extras selected for a door.
///
/// Edge banding is on unless explicitly switched off; everything else is off
/// unless selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnSelection {
    /// Second leaf, charged as a percentage of the skeleton cost
    #[serde(default)]
    pub double_leaf: bool,

    /// Glazed vision cut-out, fixed fee by thickness bracket
    #[serde(default)]
    pub vision_hole: bool,

    /// Perimeter edge banding, priced on edge surface area
    #[serde(default = "default_true")]
    pub edge_banding: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coating: Option<AreaAddon>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grooving: Option<AreaAddon>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<AreaAddon>,
}

impl Default for AddOnSelection {
    fn default() -> Self {
        AddOnSelection {
            double_leaf: false,
            vision_hole: false,
            edge_banding: true,
            coating: None,
            grooving: None,
            routing: None,
        }
    }
}

impl AddOnSelection {
    /// Selected area add-ons paired with their feature, in evaluation order
    pub fn area_addons(&self) -> impl Iterator<Item = (AddonFeature, &AreaAddon)> {
        [
            (AddonFeature::Coating, self.coating.as_ref()),
            (AddonFeature::Grooving, self.grooving.as_ref()),
            (AddonFeature::Routing, self.routing.as_ref()),
        ]
        .into_iter()
        .filter_map(|(feature, addon)| addon.map(|a| (feature, a)))
    }

    /// Get the selection slot for a feature
    pub fn area_addon(&self, feature: AddonFeature) -> Option<&AreaAddon> {
        match feature {
            AddonFeature::Coating => self.coating.as_ref(),
            AddonFeature::Grooving => self.grooving.as_ref(),
            AddonFeature::Routing => self.routing.as_ref(),
        }
    }

    /// Builder: set an area add-on for a feature
    pub fn with_area_addon(mut self, feature: AddonFeature, addon: Option<AreaAddon>) -> Self {
        match feature {
            AddonFeature::Coating => self.coating = addon,
            AddonFeature::Grooving => self.grooving = addon,
            AddonFeature::Routing => self.routing = addon,
        }
        self
    }
}

/// A customer's door request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    /// Door height in millimetres
    pub length_mm: f64,

    /// Door width in millimetres
    pub width_mm: f64,

    /// Door thickness in millimetres
    pub thickness_mm: f64,

    /// Rails (frame) material, e.g. "Hardwood"
    pub rails_material: String,

    /// Filler (infill) material, e.g. "Ecolax Board"
    pub filler_material: String,

    #[serde(default)]
    pub core_option: CoreOption,

    pub door_type: DoorType,

    /// Finish name keying the laminate or veneer rate list
    pub finish_option: String,

    #[serde(default)]
    pub add_ons: AddOnSelection,
}

impl DoorSpec {
    /// Validate input parameters.
    ///
    /// The pricing engine assumes a valid spec and does not call this;
    /// front ends should call it before pricing.
    pub fn validate(&self) -> PricingResult<()> {
        for (field, value) in [
            ("length_mm", self.length_mm),
            ("width_mm", self.width_mm),
            ("thickness_mm", self.thickness_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be a positive number of millimetres",
                ));
            }
        }
        if self.rails_material.trim().is_empty() {
            return Err(PricingError::invalid_input(
                "rails_material",
                &self.rails_material,
                "Rails material is required",
            ));
        }
        if self.filler_material.trim().is_empty() {
            return Err(PricingError::invalid_input(
                "filler_material",
                &self.filler_material,
                "Filler material is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> DoorSpec {
        DoorSpec {
            length_mm: 2133.6,
            width_mm: 914.4,
            thickness_mm: 40.0,
            rails_material: "Hardwood".to_string(),
            filler_material: "Ecolax Board".to_string(),
            core_option: CoreOption::CoreHdf,
            door_type: DoorType::Veneer,
            finish_option: "Smoke Oak Veneer".to_string(),
            add_ons: AddOnSelection {
                vision_hole: true,
                coating: Some(AreaAddon::variant("Resin Coated", Sides::BothSides)),
                grooving: Some(AreaAddon::sides(Sides::BothSides)),
                ..AddOnSelection::default()
            },
        }
    }

    #[test]
    fn test_parse_coating_with_sides() {
        let addon = AreaAddon::parse("  Resin   Coated (One Side) ").unwrap();
        assert_eq!(addon, AreaAddon::variant("Resin Coated", Sides::OneSide));
        assert_eq!(addon.label(), "Resin Coated (One Side)");
    }

    #[test]
    fn test_parse_sides_only() {
        assert_eq!(AreaAddon::parse("Both Sides"), Some(AreaAddon::sides(Sides::BothSides)));
        assert_eq!(AreaAddon::parse("one side"), Some(AreaAddon::sides(Sides::OneSide)));
    }

    #[test]
    fn test_parse_variant_without_sides() {
        let addon = AreaAddon::parse("Resin Coated").unwrap();
        assert_eq!(addon.variant.as_deref(), Some("Resin Coated"));
        assert_eq!(addon.sides, None);
    }

    #[test]
    fn test_parse_none() {
        assert!(AreaAddon::parse("none").is_none());
        assert!(AreaAddon::parse("NONE").is_none());
        assert!(AreaAddon::parse("   ").is_none());
    }

    #[test]
    fn test_normalize_option_text() {
        assert_eq!(normalize_option_text("Resin Coated (Both Sides)"), "Resin Coated Both Sides");
        assert_eq!(normalize_option_text("a\t\tb  c"), "a b c");
    }

    #[test]
    fn test_core_option_parsing() {
        assert_eq!(CoreOption::from_str_flexible("Core + HDF").unwrap(), CoreOption::CoreHdf);
        assert_eq!(CoreOption::from_str_flexible("double core").unwrap(), CoreOption::DoubleCore);
        assert_eq!(CoreOption::from_str_flexible("none").unwrap(), CoreOption::None);
        assert!(CoreOption::from_str_flexible("triple").is_err());
    }

    #[test]
    fn test_door_type_parsing() {
        assert_eq!(DoorType::from_str_flexible("veneer").unwrap(), DoorType::Veneer);
        assert_eq!(DoorType::from_str_flexible(" Laminate ").unwrap(), DoorType::Laminate);
        assert!(DoorType::from_str_flexible("glass").is_err());
    }

    #[test]
    fn test_add_on_defaults() {
        let addons: AddOnSelection = serde_json::from_str("{}").unwrap();
        assert!(addons.edge_banding);
        assert!(!addons.double_leaf);
        assert!(!addons.vision_hole);
        assert_eq!(addons.area_addons().count(), 0);
    }

    #[test]
    fn test_area_addons_order() {
        let addons = AddOnSelection::default()
            .with_area_addon(AddonFeature::Routing, Some(AreaAddon::sides(Sides::OneSide)))
            .with_area_addon(AddonFeature::Coating, Some(AreaAddon::variant("Resin Coated", Sides::OneSide)));
        let features: Vec<_> = addons.area_addons().map(|(f, _)| f).collect();
        assert_eq!(features, vec![AddonFeature::Coating, AddonFeature::Routing]);
        assert!(addons.area_addon(AddonFeature::Grooving).is_none());
    }

    #[test]
    fn test_spec_json_names() {
        let json = serde_json::to_string(&sample_spec()).unwrap();
        assert!(json.contains("\"core_option\":\"Core + HDF\""));
        assert!(json.contains("\"sides\":\"Both Sides\""));
        let roundtrip: DoorSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, sample_spec());
    }

    #[test]
    fn test_validate() {
        assert!(sample_spec().validate().is_ok());

        let mut spec = sample_spec();
        spec.thickness_mm = 0.0;
        assert!(spec.validate().is_err());

        let mut spec = sample_spec();
        spec.width_mm = f64::NAN;
        assert!(spec.validate().is_err());

        let mut spec = sample_spec();
        spec.rails_material = " ".to_string();
        assert_eq!(spec.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }
}
