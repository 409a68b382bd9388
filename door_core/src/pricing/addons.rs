//! Add-on pricer.
//!
//! Each selected add-on is priced on its own and the contributions are
//! summed, then rounded once to 2 places:
//!
//! - **Double leaf**: `skeleton_cost × double_leaf_factor`
//! - **Vision hole**: fee of the first thickness bracket that contains the
//!   door thickness, zero when none does
//! - **Edge banding**: `edge_area × edge_banding_rate` (on by default)
//! - **Coating / grooving / routing**: `single_face_area × rate[key]`
//!
//! An area add-on whose key has no rate contributes zero. The miss is logged
//! and returned as a [`PricingNotice::MissingAddonRate`]; it does not fail
//! the quote.

use serde::Serialize;
use tracing::{debug, warn};

use crate::door::AddOnSelection;
use crate::rates::{AddonRateKey, RateTable};
use crate::units::{round_to, SqFt};

use super::geometry::{edge_area_sqft, face_area_sqft};
use super::{PricingNotice, MONEY_DECIMALS};

/// What an add-on line charges for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AddonItem {
    DoubleLeaf,
    VisionHole,
    EdgeBanding,
    Area { key: AddonRateKey },
}

impl AddonItem {
    /// Line description for printed quotes
    pub fn description(&self) -> String {
        match self {
            AddonItem::DoubleLeaf => "Double leaf".to_string(),
            AddonItem::VisionHole => "Vision hole".to_string(),
            AddonItem::EdgeBanding => "Edge banding".to_string(),
            AddonItem::Area { key } => {
                let mut text = key.feature.display_name().to_string();
                let detail: Vec<String> = key
                    .variant
                    .iter()
                    .cloned()
                    .chain(key.sides.map(|s| s.to_string()))
                    .collect();
                if !detail.is_empty() {
                    text.push_str(&format!(" ({})", detail.join(", ")));
                }
                text
            }
        }
    }
}

/// One priced add-on. `cost` is the unrounded contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonLine {
    pub item: AddonItem,
    pub cost: f64,
}

/// Result of pricing all add-ons
#[derive(Debug, Clone, PartialEq)]
pub struct AddonPrice {
    pub lines: Vec<AddonLine>,
    pub edge_area: Option<SqFt>,
    pub notices: Vec<PricingNotice>,
    /// Sum of the lines, rounded to 2 places
    pub cost: f64,
}

/// Price the selected add-ons.
///
/// `skeleton_cost` is the already rounded skeleton cost; the double-leaf
/// surcharge is a percentage of it.
pub fn addon_price(
    length_mm: f64,
    width_mm: f64,
    thickness_mm: f64,
    skeleton_cost: f64,
    add_ons: &AddOnSelection,
    rates: &RateTable,
) -> AddonPrice {
    let constants = rates.constants();
    let mut lines = Vec::new();
    let mut notices = Vec::new();
    let mut edge_area = None;

    if add_ons.double_leaf {
        lines.push(AddonLine {
            item: AddonItem::DoubleLeaf,
            cost: skeleton_cost * constants.double_leaf_factor,
        });
    }

    if add_ons.vision_hole {
        match rates.vision_hole_fee(thickness_mm) {
            Some(fee) => lines.push(AddonLine {
                item: AddonItem::VisionHole,
                cost: fee,
            }),
            None => {
                warn!(thickness_mm, "no vision hole bracket for thickness, fee is zero");
                notices.push(PricingNotice::NoVisionHoleBracket { thickness_mm });
            }
        }
    }

    if add_ons.edge_banding {
        let area = edge_area_sqft(length_mm, width_mm, thickness_mm, constants.sqmm_per_sqft);
        edge_area = Some(area);
        lines.push(AddonLine {
            item: AddonItem::EdgeBanding,
            cost: area.0 * constants.edge_banding_rate,
        });
    }

    let face_area = face_area_sqft(length_mm, width_mm, 1.0, constants.sqmm_per_sqft);
    for (feature, addon) in add_ons.area_addons() {
        let key = AddonRateKey::new(feature, addon);
        match rates.addon_rate(&key) {
            Some(rate) => lines.push(AddonLine {
                item: AddonItem::Area { key },
                cost: face_area.0 * rate,
            }),
            None => {
                warn!(key = %key, "add-on rate not found, add-on priced at zero");
                notices.push(PricingNotice::MissingAddonRate { key });
            }
        }
    }

    let total = lines.iter().fold(0.0, |acc, line| acc + line.cost);
    let cost = round_to(total, MONEY_DECIMALS);

    debug!(lines = lines.len(), misses = notices.len(), cost, "priced add-ons");

    AddonPrice {
        lines,
        edge_area,
        notices,
        cost,
    }
}
