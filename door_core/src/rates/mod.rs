//! # Rate Table
//!
//! The price list the engine is driven by: base thickness and per-mm
//! surcharge, per-material-pair base rates, core surcharges, finish rates,
//! thickness-bracketed vision hole fees and area add-on rates.
//!
//! A [`RateTable`] is immutable once built. Construct it once (from a file
//! via [`crate::file_io::load_rate_table`] or the built-in
//! [`RateTable::standard`]) and pass it by reference to every quote; it is
//! `Send + Sync` and can be shared across threads without locking.
//!
//! ## Example
//!
//! ```rust
//! use door_core::rates::RateTable;
//!
//! let rates = RateTable::standard().unwrap();
//! assert_eq!(rates.material_base_rate("Hardwood", "Ecolax Board"), Some(131.0));
//! assert_eq!(rates.vision_hole_fee(40.0), Some(65.0));
//! ```

pub mod config;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::door::{normalize_option_text, AddonFeature, AreaAddon, CoreOption, Sides};
use crate::errors::PricingResult;

pub use config::{AddonRateEntry, MaterialRateEntry, RateTableConfig, SCHEMA_VERSION};

/// Built-in price list, TOML form
pub const STANDARD_RATES_TOML: &str = include_str!("standard_rates.toml");

/// Scalar pricing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConstants {
    /// Thickness included in the material base rate (mm)
    pub base_thickness_mm: f64,
    /// Surcharge per sqft for every mm above the base thickness
    pub thickness_surcharge_rate: f64,
    /// Double-leaf surcharge as a fraction of the skeleton cost (0.16 = 16%)
    pub double_leaf_factor: f64,
    /// Edge banding rate per sqft of edge surface
    pub edge_banding_rate: f64,
    /// Square millimetres per square foot
    pub sqmm_per_sqft: f64,
}

/// Core reinforcement surcharges per sqft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreSurcharges {
    pub double_core: f64,
    pub core_hdf: f64,
}

impl CoreSurcharges {
    /// Full surcharge for a core option; zero for no core upgrade
    pub fn full(&self, option: CoreOption) -> f64 {
        match option {
            CoreOption::None => 0.0,
            CoreOption::DoubleCore => self.double_core,
            CoreOption::CoreHdf => self.core_hdf,
        }
    }

    /// HDF cost over and above a double core
    pub fn hdf_differential(&self) -> f64 {
        self.core_hdf - self.double_core
    }
}

/// Thickness thresholds that switch the core surcharge rule.
///
/// At or below `full_surcharge_max_mm` the full core surcharge applies.
/// At or above `differential_min_mm` a double core is considered part of the
/// body and only the HDF differential is charged. Thicknesses strictly
/// between the two take no core surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreTiers {
    pub full_surcharge_max_mm: f64,
    pub differential_min_mm: f64,
}

impl Default for CoreTiers {
    fn default() -> Self {
        CoreTiers {
            full_surcharge_max_mm: 35.0,
            differential_min_mm: 36.0,
        }
    }
}

/// Inclusive thickness bracket with a fixed vision hole fee
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionHoleBracket {
    pub min_thickness_mm: f64,
    pub max_thickness_mm: f64,
    pub fee: f64,
}

impl VisionHoleBracket {
    /// Check whether a thickness falls inside this bracket (both ends inclusive)
    pub fn contains(&self, thickness_mm: f64) -> bool {
        self.min_thickness_mm <= thickness_mm && thickness_mm <= self.max_thickness_mm
    }
}

/// Lookup key for an area add-on rate: feature, optional variant, optional sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddonRateKey {
    pub feature: AddonFeature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<Sides>,
}

impl AddonRateKey {
    /// Key for a selected add-on
    pub fn new(feature: AddonFeature, addon: &AreaAddon) -> Self {
        Self::from_parts(feature, addon.variant.as_deref(), addon.sides)
    }

    /// Build a key from raw parts. The variant is normalized the same way
    /// free option text is (whitespace collapsed, parentheses stripped) and
    /// a blank variant counts as none.
    pub fn from_parts(feature: AddonFeature, variant: Option<&str>, sides: Option<Sides>) -> Self {
        let variant = variant.map(normalize_option_text).filter(|v| !v.is_empty());
        AddonRateKey {
            feature,
            variant,
            sides,
        }
    }

    /// Flat label such as `Coating_Resin_Coated_Both_Sides`, for diagnostics
    pub fn label(&self) -> String {
        let mut parts = vec![self.feature.display_name().to_string()];
        if let Some(variant) = &self.variant {
            parts.extend(variant.split_whitespace().map(str::to_string));
        }
        if let Some(sides) = self.sides {
            parts.extend(sides.display_name().split(' ').map(str::to_string));
        }
        parts.join("_")
    }
}

impl std::fmt::Display for AddonRateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Validated, immutable price list.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    name: String,
    version: String,
    currency: String,
    constants: PricingConstants,
    core_surcharges: CoreSurcharges,
    core_tiers: CoreTiers,
    material_rates: BTreeMap<(String, String), f64>,
    laminate_rates: BTreeMap<String, f64>,
    veneer_rates: BTreeMap<String, f64>,
    vision_hole_fees: Vec<VisionHoleBracket>,
    addon_rates: BTreeMap<AddonRateKey, f64>,
}

impl RateTable {
    /// The built-in standard price list.
    pub fn standard() -> PricingResult<Self> {
        Self::from_config(RateTableConfig::from_toml_str(STANDARD_RATES_TOML)?)
    }

    /// Price list name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price list revision
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Currency code for display
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn constants(&self) -> &PricingConstants {
        &self.constants
    }

    pub fn core_surcharges(&self) -> &CoreSurcharges {
        &self.core_surcharges
    }

    pub fn core_tiers(&self) -> &CoreTiers {
        &self.core_tiers
    }

    /// Base rate per sqft for an ordered (rails, filler) pair.
    ///
    /// `None` means the pair is not priced, which is not the same as free.
    pub fn material_base_rate(&self, rails: &str, filler: &str) -> Option<f64> {
        self.material_rates
            .get(&(rails.to_string(), filler.to_string()))
            .copied()
    }

    /// Full core surcharge for an option (no thickness rule applied)
    pub fn core_surcharge(&self, option: CoreOption) -> f64 {
        self.core_surcharges.full(option)
    }

    /// Fixed laminate fee per door
    pub fn laminate_rate(&self, finish: &str) -> Option<f64> {
        self.laminate_rates.get(finish).copied()
    }

    /// Veneer rate per sqft
    pub fn veneer_rate(&self, finish: &str) -> Option<f64> {
        self.veneer_rates.get(finish).copied()
    }

    /// Fee of the first bracket containing `thickness_mm`
    pub fn vision_hole_fee(&self, thickness_mm: f64) -> Option<f64> {
        self.vision_hole_fees
            .iter()
            .find(|b| b.contains(thickness_mm))
            .map(|b| b.fee)
    }

    pub fn vision_hole_fees(&self) -> &[VisionHoleBracket] {
        &self.vision_hole_fees
    }

    /// Area add-on rate per sqft
    pub fn addon_rate(&self, key: &AddonRateKey) -> Option<f64> {
        self.addon_rates.get(key).copied()
    }

    /// Priced (rails, filler) pairs with their base rate
    pub fn materials(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.material_rates
            .iter()
            .map(|((rails, filler), rate)| (rails.as_str(), filler.as_str(), *rate))
    }

    /// Laminate finishes with their per-door fee
    pub fn laminate_finishes(&self) -> impl Iterator<Item = (&str, f64)> {
        self.laminate_rates.iter().map(|(name, rate)| (name.as_str(), *rate))
    }

    /// Veneer finishes with their per-sqft rate
    pub fn veneer_finishes(&self) -> impl Iterator<Item = (&str, f64)> {
        self.veneer_rates.iter().map(|(name, rate)| (name.as_str(), *rate))
    }

    /// Priced add-on keys with their per-sqft rate
    pub fn addon_rates(&self) -> impl Iterator<Item = (&AddonRateKey, f64)> {
        self.addon_rates.iter().map(|(key, rate)| (key, *rate))
    }
}
