//! Rate table file format.
//!
//! `RateTableConfig` is the serde shape of a price list on disk (TOML or
//! JSON). Pair-keyed and composite-keyed tables are written as lists of
//! entries so that both formats can express them. Converting a config into
//! a [`RateTable`] validates it; a `RateTable` never holds unchecked data.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::door::{AddonFeature, Sides};
use crate::errors::{PricingError, PricingResult};

use super::{AddonRateKey, CoreSurcharges, CoreTiers, PricingConstants, RateTable, VisionHoleBracket};

/// Current schema version for rate table files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Rails/filler base rate entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRateEntry {
    pub rails: String,
    pub filler: String,
    /// Base rate per sqft
    pub rate: f64,
}

/// Area add-on rate entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonRateEntry {
    pub feature: AddonFeature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<Sides>,
    /// Rate per sqft of single face area
    pub rate: f64,
}

/// Serialized form of a rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableConfig {
    pub schema_version: String,
    pub name: String,
    /// Revision of the price list, reported on every quote
    pub version: String,
    /// Display only; no conversion is ever applied
    pub currency: String,
    pub constants: PricingConstants,
    pub core_surcharges: CoreSurcharges,
    #[serde(default)]
    pub core_tiers: CoreTiers,
    pub material_rates: Vec<MaterialRateEntry>,
    #[serde(default, deserialize_with = "unique_finish_rates")]
    pub laminate_rates: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "unique_finish_rates")]
    pub veneer_rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub vision_hole_fees: Vec<VisionHoleBracket>,
    #[serde(default)]
    pub addon_rates: Vec<AddonRateEntry>,
}

impl RateTableConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> PricingResult<Self> {
        toml::from_str(text).map_err(|e| PricingError::serialization(format!("Invalid rate table TOML: {}", e)))
    }

    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> PricingResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| PricingError::serialization(format!("Invalid rate table JSON: {}", e)))
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> PricingResult<String> {
        toml::to_string_pretty(self).map_err(|e| PricingError::serialization(e.to_string()))
    }
}

impl RateTable {
    /// Build a validated rate table from its file form.
    ///
    /// # Returns
    ///
    /// * `Ok(RateTable)` - Table passed every check
    /// * `Err(PricingError::VersionMismatch)` - Unsupported schema version
    /// * `Err(PricingError::InvalidRateTable)` - First failed check
    pub fn from_config(config: RateTableConfig) -> PricingResult<Self> {
        validate_version(&config.schema_version)?;
        validate_constants(&config.constants)?;

        check_rate("core_surcharges.double_core", config.core_surcharges.double_core)?;
        check_rate("core_surcharges.core_hdf", config.core_surcharges.core_hdf)?;

        let tiers = config.core_tiers;
        if !(tiers.full_surcharge_max_mm < tiers.differential_min_mm) {
            return Err(PricingError::invalid_rate_table(format!(
                "core_tiers.full_surcharge_max_mm ({}) must be below differential_min_mm ({})",
                tiers.full_surcharge_max_mm, tiers.differential_min_mm
            )));
        }

        let mut material_rates = BTreeMap::new();
        for entry in config.material_rates {
            if entry.rails.trim().is_empty() || entry.filler.trim().is_empty() {
                return Err(PricingError::invalid_rate_table(
                    "material_rates entries need both rails and filler names",
                ));
            }
            check_rate(&format!("material_rates[{} / {}]", entry.rails, entry.filler), entry.rate)?;
            let key = (entry.rails, entry.filler);
            if material_rates.contains_key(&key) {
                return Err(PricingError::invalid_rate_table(format!(
                    "duplicate material_rates entry for {} / {}",
                    key.0, key.1
                )));
            }
            material_rates.insert(key, entry.rate);
        }

        for (finish, rate) in &config.laminate_rates {
            check_rate(&format!("laminate_rates[{}]", finish), *rate)?;
        }
        for (finish, rate) in &config.veneer_rates {
            check_rate(&format!("veneer_rates[{}]", finish), *rate)?;
        }

        validate_brackets(&config.vision_hole_fees)?;

        let mut addon_rates = BTreeMap::new();
        for entry in config.addon_rates {
            let key = AddonRateKey::from_parts(entry.feature, entry.variant.as_deref(), entry.sides);
            check_rate(&format!("addon_rates[{}]", key.label()), entry.rate)?;
            if addon_rates.contains_key(&key) {
                return Err(PricingError::invalid_rate_table(format!(
                    "duplicate addon_rates entry for {}",
                    key.label()
                )));
            }
            addon_rates.insert(key, entry.rate);
        }

        Ok(RateTable {
            name: config.name,
            version: config.version,
            currency: config.currency,
            constants: config.constants,
            core_surcharges: config.core_surcharges,
            core_tiers: tiers,
            material_rates,
            laminate_rates: config.laminate_rates,
            veneer_rates: config.veneer_rates,
            vision_hole_fees: config.vision_hole_fees,
            addon_rates,
        })
    }

    /// Convert back to the file form (for display or export)
    pub fn to_config(&self) -> RateTableConfig {
        RateTableConfig {
            schema_version: SCHEMA_VERSION.to_string(),
            name: self.name.clone(),
            version: self.version.clone(),
            currency: self.currency.clone(),
            constants: self.constants,
            core_surcharges: self.core_surcharges,
            core_tiers: self.core_tiers,
            material_rates: self
                .material_rates
                .iter()
                .map(|((rails, filler), rate)| MaterialRateEntry {
                    rails: rails.clone(),
                    filler: filler.clone(),
                    rate: *rate,
                })
                .collect(),
            laminate_rates: self.laminate_rates.clone(),
            veneer_rates: self.veneer_rates.clone(),
            vision_hole_fees: self.vision_hole_fees.clone(),
            addon_rates: self
                .addon_rates
                .iter()
                .map(|(key, rate)| AddonRateEntry {
                    feature: key.feature,
                    variant: key.variant.clone(),
                    sides: key.sides,
                    rate: *rate,
                })
                .collect(),
        }
    }
}

fn check_rate(field: &str, value: f64) -> PricingResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PricingError::invalid_rate_table(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> PricingResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::invalid_rate_table(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_constants(c: &PricingConstants) -> PricingResult<()> {
    check_positive("constants.base_thickness_mm", c.base_thickness_mm)?;
    check_rate("constants.thickness_surcharge_rate", c.thickness_surcharge_rate)?;
    check_rate("constants.double_leaf_factor", c.double_leaf_factor)?;
    check_rate("constants.edge_banding_rate", c.edge_banding_rate)?;
    check_positive("constants.sqmm_per_sqft", c.sqmm_per_sqft)
}

/// Finish tables are keyed by name; a name listed twice is rejected
/// instead of the later entry silently winning.
fn unique_finish_rates<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueRates;

    impl<'de> Visitor<'de> for UniqueRates {
        type Value = BTreeMap<String, f64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of finish names to rates")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut rates = BTreeMap::new();
            while let Some((name, rate)) = access.next_entry::<String, f64>()? {
                if rates.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate finish '{}'", name)));
                }
                rates.insert(name, rate);
            }
            Ok(rates)
        }
    }

    deserializer.deserialize_map(UniqueRates)
}

/// Brackets must be well-formed and pairwise disjoint. Their order is kept
/// as written; lookup takes the first match.
fn validate_brackets(brackets: &[VisionHoleBracket]) -> PricingResult<()> {
    for (i, b) in brackets.iter().enumerate() {
        check_rate(&format!("vision_hole_fees[{}].fee", i), b.fee)?;
        if !b.min_thickness_mm.is_finite() || !b.max_thickness_mm.is_finite() || b.min_thickness_mm > b.max_thickness_mm {
            return Err(PricingError::invalid_rate_table(format!(
                "vision_hole_fees[{}] has an empty range {}..={}",
                i, b.min_thickness_mm, b.max_thickness_mm
            )));
        }
    }

    for (i, a) in brackets.iter().enumerate() {
        for (j, b) in brackets.iter().enumerate().skip(i + 1) {
            if a.min_thickness_mm <= b.max_thickness_mm && b.min_thickness_mm <= a.max_thickness_mm {
                return Err(PricingError::invalid_rate_table(format!(
                    "vision_hole_fees[{}] and vision_hole_fees[{}] overlap",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

/// Check that a file schema version is readable by this build.
///
/// Major versions must match; within 0.x the file minor may not be newer.
pub(crate) fn validate_version(file_version: &str) -> PricingResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || PricingError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::STANDARD_RATES_TOML;

    fn standard_config() -> RateTableConfig {
        RateTableConfig::from_toml_str(STANDARD_RATES_TOML).unwrap()
    }

    fn expect_invalid(config: RateTableConfig) -> String {
        match RateTable::from_config(config) {
            Err(PricingError::InvalidRateTable { reason }) => reason,
            other => panic!("expected InvalidRateTable, got {:?}", other),
        }
    }

    #[test]
    fn test_standard_config_is_valid() {
        let config = standard_config();
        assert_eq!(config.material_rates.len(), 6);
        assert_eq!(config.addon_rates.len(), 6);
        assert!(RateTable::from_config(config).is_ok());
    }

    #[test]
    fn test_duplicate_material_pair_rejected() {
        let mut config = standard_config();
        config.material_rates.push(MaterialRateEntry {
            rails: "Hardwood".to_string(),
            filler: "Hardwood".to_string(),
            rate: 150.0,
        });
        assert!(expect_invalid(config).contains("duplicate material_rates"));
    }

    #[test]
    fn test_reversed_material_pair_is_distinct() {
        // (rails, filler) is ordered: Hardwood/Pinewood and Pinewood/Hardwood are both listed
        let table = RateTable::from_config(standard_config()).unwrap();
        assert_eq!(table.material_base_rate("Hardwood", "Pinewood (S.Y.P)"), Some(165.0));
        assert_eq!(table.material_base_rate("Pinewood (S.Y.P)", "Hardwood"), Some(156.0));
    }

    #[test]
    fn test_overlapping_brackets_rejected() {
        let mut config = standard_config();
        config.vision_hole_fees.push(VisionHoleBracket {
            min_thickness_mm: 35.0,
            max_thickness_mm: 40.0,
            fee: 10.0,
        });
        assert!(expect_invalid(config).contains("overlap"));
    }

    #[test]
    fn test_inverted_bracket_rejected() {
        let mut config = standard_config();
        config.vision_hole_fees = vec![VisionHoleBracket {
            min_thickness_mm: 50.0,
            max_thickness_mm: 40.0,
            fee: 10.0,
        }];
        assert!(expect_invalid(config).contains("empty range"));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut config = standard_config();
        config.veneer_rates.insert("Bad".to_string(), -1.0);
        assert!(expect_invalid(config).contains("veneer_rates[Bad]"));
    }

    #[test]
    fn test_zero_conversion_factor_rejected() {
        let mut config = standard_config();
        config.constants.sqmm_per_sqft = 0.0;
        assert!(expect_invalid(config).contains("sqmm_per_sqft"));
    }

    #[test]
    fn test_zero_base_thickness_rejected() {
        let mut config = standard_config();
        config.constants.base_thickness_mm = 0.0;
        assert!(expect_invalid(config).contains("base_thickness_mm must be positive"));
    }

    #[test]
    fn test_duplicate_finish_rejected() {
        let json = serde_json::to_string(&standard_config()).unwrap().replacen(
            "\"Smoke Oak Veneer\":90.0",
            "\"Smoke Oak Veneer\":90.0,\"Smoke Oak Veneer\":95.0",
            1,
        );
        assert_eq!(json.matches("Smoke Oak Veneer").count(), 2);

        match RateTableConfig::from_json_str(&json) {
            Err(PricingError::SerializationError { reason }) => {
                assert!(reason.contains("duplicate finish 'Smoke Oak Veneer'"));
            }
            other => panic!("expected SerializationError, got {:?}", other),
        }
    }

    #[test]
    fn test_addon_variant_text_normalized_on_load() {
        let mut config = standard_config();
        config.addon_rates.retain(|e| e.feature != AddonFeature::Coating);
        config.addon_rates.push(AddonRateEntry {
            feature: AddonFeature::Coating,
            variant: Some("(Resin   Coated)".to_string()),
            sides: Some(Sides::OneSide),
            rate: 80.0,
        });
        let table = RateTable::from_config(config).unwrap();
        let key = AddonRateKey::new(
            AddonFeature::Coating,
            &crate::door::AreaAddon::variant("Resin Coated", Sides::OneSide),
        );
        assert_eq!(table.addon_rate(&key), Some(80.0));
    }

    #[test]
    fn test_core_tiers_must_be_ordered() {
        let mut config = standard_config();
        config.core_tiers = CoreTiers {
            full_surcharge_max_mm: 36.0,
            differential_min_mm: 36.0,
        };
        assert!(expect_invalid(config).contains("core_tiers"));
    }

    #[test]
    fn test_duplicate_addon_rejected() {
        let mut config = standard_config();
        config.addon_rates.push(AddonRateEntry {
            feature: AddonFeature::Grooving,
            variant: None,
            sides: Some(Sides::OneSide),
            rate: 13.0,
        });
        assert!(expect_invalid(config).contains("Grooving_One_Side"));
    }

    #[test]
    fn test_to_config_roundtrip() {
        let table = RateTable::from_config(standard_config()).unwrap();
        let again = RateTable::from_config(table.to_config()).unwrap();
        assert_eq!(table, again);

        let toml_text = table.to_config().to_toml_string().unwrap();
        let reparsed = RateTable::from_config(RateTableConfig::from_toml_str(&toml_text).unwrap()).unwrap();
        assert_eq!(table, reparsed);
    }

    #[test]
    fn test_json_form_accepted() {
        let json = serde_json::to_string(&standard_config()).unwrap();
        let config = RateTableConfig::from_json_str(&json).unwrap();
        assert!(RateTable::from_config(config).is_ok());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
