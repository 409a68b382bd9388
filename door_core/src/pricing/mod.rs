//! # Pricing Engine
//!
//! Turns a [`DoorSpec`] and a [`RateTable`] into a cost breakdown. The
//! pipeline runs one way and every stage is a pure function of its inputs:
//!
//! ```text
//! DoorSpec ──► geometry ──┬──► skeleton ──┬──────────────► PriceBreakdown
//!                         ├──► finish     │                      ▲
//!                         └──► add-ons ◄──┘ (double leaf is a    │
//!                                            % of skeleton)  ────┘
//! ```
//!
//! - [`geometry`] - face and edge areas in sqft
//! - [`skeleton`] - PSF rate and structural cost
//! - [`finish`] - laminate / veneer finishing cost
//! - [`addons`] - double leaf, vision hole, edge banding, area add-ons
//!
//! [`price`] is the entry point; [`quote`] returns the same numbers with
//! the intermediate figures, add-on lines and notices attached.
//!
//! ## Example
//!
//! ```rust
//! use door_core::door::{AddOnSelection, CoreOption, DoorSpec, DoorType};
//! use door_core::pricing::price;
//! use door_core::rates::RateTable;
//!
//! let rates = RateTable::standard().unwrap();
//! let spec = DoorSpec {
//!     length_mm: 2133.6,
//!     width_mm: 914.4,
//!     thickness_mm: 40.0,
//!     rails_material: "Hardwood".to_string(),
//!     filler_material: "Ecolax Board".to_string(),
//!     core_option: CoreOption::CoreHdf,
//!     door_type: DoorType::Veneer,
//!     finish_option: "Smoke Oak Veneer".to_string(),
//!     add_ons: AddOnSelection::default(),
//! };
//!
//! let breakdown = price(&spec, &rates).unwrap();
//! assert_eq!(breakdown.skeleton_cost(), 3622.5);
//! assert_eq!(breakdown.finish_cost(), 3780.0);
//! ```

pub mod addons;
pub mod finish;
pub mod geometry;
pub mod skeleton;

use serde::Serialize;
use tracing::debug;

use crate::door::{DoorSpec, DoorType};
use crate::errors::PricingResult;
use crate::rates::{AddonRateKey, RateTable};
use crate::units::round_to;

pub use addons::{AddonItem, AddonLine};

/// Decimal places kept on every currency amount
pub const MONEY_DECIMALS: u32 = 2;

/// Final cost breakdown of a door quote.
///
/// The total is derived from the three components when the breakdown is
/// built and cannot be set independently.
///
/// ## JSON Example
///
/// ```json
/// {
///   "skeleton_cost": 3622.5,
///   "finish_cost": 3780.0,
///   "addon_cost": 4438.24,
///   "total_price": 11840.74
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBreakdown {
    skeleton_cost: f64,
    finish_cost: f64,
    addon_cost: f64,
    total_price: f64,
}

impl PriceBreakdown {
    /// Build from the three component costs; the total is their rounded sum.
    pub fn new(skeleton_cost: f64, finish_cost: f64, addon_cost: f64) -> Self {
        PriceBreakdown {
            skeleton_cost,
            finish_cost,
            addon_cost,
            total_price: round_to(skeleton_cost + finish_cost + addon_cost, MONEY_DECIMALS),
        }
    }

    pub fn skeleton_cost(&self) -> f64 {
        self.skeleton_cost
    }

    pub fn finish_cost(&self) -> f64 {
        self.finish_cost
    }

    pub fn addon_cost(&self) -> f64 {
        self.addon_cost
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }
}

/// A condition the engine priced through instead of failing.
///
/// These are kept apart from [`PricingError`](crate::errors::PricingError):
/// an unknown material pair stops the quote, an unpriced finish or add-on
/// does not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PricingNotice {
    /// Finish name absent from the laminate/veneer list; finish priced at zero
    MissingFinishRate { door_type: DoorType, finish: String },
    /// Add-on key absent from the add-on rates; add-on priced at zero
    MissingAddonRate { key: AddonRateKey },
    /// Vision hole selected but no bracket covers the thickness; fee is zero
    NoVisionHoleBracket { thickness_mm: f64 },
}

impl std::fmt::Display for PricingNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingNotice::MissingFinishRate { door_type, finish } => {
                write!(f, "No {} rate for finish '{}' - finish priced at 0", door_type, finish)
            }
            PricingNotice::MissingAddonRate { key } => {
                write!(f, "No add-on rate for '{}' - add-on priced at 0", key)
            }
            PricingNotice::NoVisionHoleBracket { thickness_mm } => {
                write!(f, "No vision hole bracket covers {} mm - fee is 0", thickness_mm)
            }
        }
    }
}

/// Itemized quote: the breakdown plus the figures it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quotation {
    pub breakdown: PriceBreakdown,
    /// Skeleton PSF rate, rounded to 2 places
    pub psf_rate: f64,
    /// Single face area (sqft)
    pub face_area_sqft: f64,
    /// Edge surface area (sqft), when edge banding was priced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_area_sqft: Option<f64>,
    /// Applied add-ons in evaluation order
    pub addon_lines: Vec<AddonLine>,
    /// Non-fatal pricing conditions
    pub notices: Vec<PricingNotice>,
}

/// Price a door.
///
/// # Returns
///
/// * `Ok(PriceBreakdown)` - Skeleton, finish, add-on and total cost
/// * `Err(PricingError::UnknownMaterialCombination)` - Rails/filler pair not
///   priced; no partial breakdown is produced
pub fn price(spec: &DoorSpec, rates: &RateTable) -> PricingResult<PriceBreakdown> {
    quote(spec, rates).map(|q| q.breakdown)
}

/// Price a door and keep the itemization.
///
/// Same numbers as [`price`]. The spec is assumed valid (see
/// [`DoorSpec::validate`]).
pub fn quote(spec: &DoorSpec, rates: &RateTable) -> PricingResult<Quotation> {
    let skeleton = skeleton::skeleton_price(
        spec.length_mm,
        spec.width_mm,
        spec.thickness_mm,
        &spec.rails_material,
        &spec.filler_material,
        spec.core_option,
        rates,
    )?;

    let (finish_cost, finish_notice) = finish::finish_cost(
        spec.length_mm,
        spec.width_mm,
        spec.door_type,
        &spec.finish_option,
        rates,
    );

    let addons = addons::addon_price(
        spec.length_mm,
        spec.width_mm,
        spec.thickness_mm,
        skeleton.cost,
        &spec.add_ons,
        rates,
    );

    let breakdown = PriceBreakdown::new(skeleton.cost, finish_cost, addons.cost);
    debug!(
        skeleton = breakdown.skeleton_cost(),
        finish = breakdown.finish_cost(),
        addons = breakdown.addon_cost(),
        total = breakdown.total_price(),
        "priced door"
    );

    let notices = finish_notice.into_iter().chain(addons.notices).collect();

    Ok(Quotation {
        breakdown,
        psf_rate: skeleton.psf_rate,
        face_area_sqft: skeleton.face_area.0,
        edge_area_sqft: addons.edge_area.map(|a| a.0),
        addon_lines: addons.lines,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::{AddOnSelection, AddonFeature, AreaAddon, CoreOption, Sides};
    use crate::errors::PricingError;

    fn rates() -> RateTable {
        RateTable::standard().unwrap()
    }

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
    fn test_sample_door_breakdown() {
        let breakdown = price(&sample_spec(), &rates()).unwrap();
        assert_eq!(breakdown.skeleton_cost(), 3622.5);
        assert_eq!(breakdown.finish_cost(), 3780.0);
        assert!((breakdown.addon_cost() - 4438.24).abs() < 1e-9);
        assert!((breakdown.total_price() - 11840.74).abs() < 1e-9);
    }

    #[test]
    fn test_sample_door_itemization() {
        let quotation = quote(&sample_spec(), &rates()).unwrap();
        assert_eq!(quotation.psf_rate, 172.5);
        assert_eq!(quotation.face_area_sqft, 21.0);
        assert_eq!(quotation.edge_area_sqft, Some(2.6247));
        let items: Vec<_> = quotation.addon_lines.iter().map(|l| l.item.clone()).collect();
        assert_eq!(items[0], AddonItem::VisionHole);
        assert_eq!(items[1], AddonItem::EdgeBanding);
        assert_eq!(items.len(), 4);
        assert!(quotation.notices.is_empty());
    }

    #[test]
    fn test_laminate_double_leaf_door() {
        let spec = DoorSpec {
            length_mm: 2100.0,
            width_mm: 900.0,
            thickness_mm: 35.0,
            rails_material: "Pinewood (S.Y.P)".to_string(),
            filler_material: "Hardwood".to_string(),
            core_option: CoreOption::DoubleCore,
            door_type: DoorType::Laminate,
            finish_option: "Wenge walnut shade 1mm".to_string(),
            add_ons: AddOnSelection {
                double_leaf: true,
                vision_hole: true,
                edge_banding: false,
                ..AddOnSelection::default()
            }
            .with_area_addon(AddonFeature::Routing, Some(AreaAddon::sides(Sides::OneSide))),
        };
        let breakdown = price(&spec, &rates()).unwrap();
        assert!((breakdown.skeleton_cost() - 3687.31).abs() < 1e-9);
        assert_eq!(breakdown.finish_cost(), 4250.0);
        // 3687.31 x 0.16 + 45 + 20.3438 x 15
        assert!((breakdown.addon_cost() - 940.13).abs() < 1e-9);
        assert!((breakdown.total_price() - 8877.44).abs() < 1e-9);
    }

    #[test]
    fn test_unpriced_finish_and_addon_still_quote() {
        let spec = DoorSpec {
            length_mm: 2100.0,
            width_mm: 900.0,
            thickness_mm: 32.0,
            rails_material: "Hardwood".to_string(),
            filler_material: "Hardwood".to_string(),
            core_option: CoreOption::None,
            door_type: DoorType::Veneer,
            finish_option: "Unknown".to_string(),
            add_ons: AddOnSelection::default()
                .with_area_addon(AddonFeature::Coating, AreaAddon::parse("Matte (One Side)")),
        };
        let quotation = quote(&spec, &rates()).unwrap();
        assert_eq!(quotation.breakdown.finish_cost(), 0.0);
        assert!((quotation.breakdown.skeleton_cost() - 3061.74).abs() < 1e-9);
        assert!((quotation.breakdown.addon_cost() - 103.33).abs() < 1e-9);
        assert!((quotation.breakdown.total_price() - 3165.07).abs() < 1e-9);
        assert_eq!(quotation.notices.len(), 2);
        assert!(matches!(quotation.notices[0], PricingNotice::MissingFinishRate { .. }));
        assert!(matches!(quotation.notices[1], PricingNotice::MissingAddonRate { .. }));
    }

    #[test]
    fn test_unknown_material_fails_whole_quote() {
        let mut spec = sample_spec();
        spec.filler_material = "Cardboard".to_string();
        assert_eq!(
            price(&spec, &rates()),
            Err(PricingError::unknown_material_combination("Hardwood", "Cardboard"))
        );
        assert!(quote(&spec, &rates()).is_err());
    }

    #[test]
    fn test_total_is_rounded_sum_of_components() {
        let rates = rates();
        let mut spec = sample_spec();
        for (t, core) in [
            (28.0, CoreOption::None),
            (33.0, CoreOption::DoubleCore),
            (35.0, CoreOption::CoreHdf),
            (36.0, CoreOption::DoubleCore),
            (44.5, CoreOption::CoreHdf),
        ] {
            for (l, w) in [(1981.2, 762.0), (2032.0, 812.8), (2400.0, 1200.0)] {
                spec.length_mm = l;
                spec.width_mm = w;
                spec.thickness_mm = t;
                spec.core_option = core;
                spec.add_ons.double_leaf = t > 35.0;
                let b = price(&spec, &rates).unwrap();
                let expected = round_to(b.skeleton_cost() + b.finish_cost() + b.addon_cost(), MONEY_DECIMALS);
                assert_eq!(b.total_price(), expected);
            }
        }
    }

    #[test]
    fn test_price_is_idempotent() {
        let rates = rates();
        let spec = sample_spec();
        let first = quote(&spec, &rates).unwrap();
        let second = quote(&spec, &rates).unwrap();
        assert_eq!(first, second);
        assert_eq!(price(&spec, &rates).unwrap(), first.breakdown);
    }

    #[test]
    fn test_shared_rate_table_across_threads() {
        let rates = std::sync::Arc::new(rates());
        let expected = price(&sample_spec(), &rates).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rates = std::sync::Arc::clone(&rates);
                std::thread::spawn(move || price(&sample_spec(), &rates).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_breakdown_serialization() {
        let breakdown = PriceBreakdown::new(3622.5, 3780.0, 4438.24);
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["skeleton_cost"], 3622.5);
        assert_eq!(json["total_price"], 11840.74);
    }

    #[test]
    fn test_notice_messages() {
        let notice = PricingNotice::MissingFinishRate {
            door_type: DoorType::Laminate,
            finish: "Oak".to_string(),
        };
        assert_eq!(notice.to_string(), "No Laminate rate for finish 'Oak' - finish priced at 0");
    }
}
