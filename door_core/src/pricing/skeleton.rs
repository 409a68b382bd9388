//! Skeleton pricer: structural cost of the door body.
//!
//! The per-sqft ("PSF") rate is built up from the material pair base rate,
//! a per-mm thickness surcharge above the base thickness and a core
//! surcharge whose rule depends on the thickness tier:
//!
//! ```text
//! thickness <= 35 mm   Double Core   +double_core
//!                      Core + HDF    +core_hdf
//! thickness >= 36 mm   Double Core   +0   (absorbed in the thicker body)
//!                      Core + HDF    +(core_hdf - double_core)
//! ```
//!
//! The rate is rounded to 2 places before it is applied to the single face
//! area.

use tracing::debug;

use crate::door::CoreOption;
use crate::errors::{PricingError, PricingResult};
use crate::rates::RateTable;
use crate::units::{round_to, SqFt};

use super::geometry::face_area_sqft;
use super::MONEY_DECIMALS;

/// Intermediate figures of a skeleton price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonPrice {
    /// Final PSF rate, rounded to 2 places
    pub psf_rate: f64,
    /// Single face area used
    pub face_area: SqFt,
    /// `face_area × psf_rate`, rounded to 2 places
    pub cost: f64,
}

/// Thickness surcharge per sqft: `max(0, T - base) × rate`
pub fn thickness_surcharge(thickness_mm: f64, rates: &RateTable) -> f64 {
    let c = rates.constants();
    (thickness_mm - c.base_thickness_mm).max(0.0) * c.thickness_surcharge_rate
}

/// Core surcharge per sqft after the thickness tier rule
pub fn core_surcharge(thickness_mm: f64, core_option: CoreOption, rates: &RateTable) -> f64 {
    let tiers = rates.core_tiers();
    let surcharges = rates.core_surcharges();

    if thickness_mm <= tiers.full_surcharge_max_mm {
        surcharges.full(core_option)
    } else if thickness_mm >= tiers.differential_min_mm {
        match core_option {
            CoreOption::CoreHdf => surcharges.hdf_differential(),
            CoreOption::DoubleCore | CoreOption::None => 0.0,
        }
    } else {
        0.0
    }
}

/// Resolve the PSF rate for a material pair, thickness and core option.
///
/// # Returns
///
/// * `Ok(rate)` - Rate per sqft rounded to 2 places
/// * `Err(PricingError::UnknownMaterialCombination)` - Pair not in the table
pub fn psf_rate(
    rails: &str,
    filler: &str,
    thickness_mm: f64,
    core_option: CoreOption,
    rates: &RateTable,
) -> PricingResult<f64> {
    let base = rates
        .material_base_rate(rails, filler)
        .ok_or_else(|| PricingError::unknown_material_combination(rails, filler))?;

    let rate = base + thickness_surcharge(thickness_mm, rates) + core_surcharge(thickness_mm, core_option, rates);

    Ok(round_to(rate, MONEY_DECIMALS))
}

/// Price the door skeleton.
pub fn skeleton_price(
    length_mm: f64,
    width_mm: f64,
    thickness_mm: f64,
    rails: &str,
    filler: &str,
    core_option: CoreOption,
    rates: &RateTable,
) -> PricingResult<SkeletonPrice> {
    let psf_rate = psf_rate(rails, filler, thickness_mm, core_option, rates)?;
    let face_area = face_area_sqft(length_mm, width_mm, 1.0, rates.constants().sqmm_per_sqft);
    let cost = round_to(face_area.0 * psf_rate, MONEY_DECIMALS);

    debug!(
        rails,
        filler,
        thickness_mm,
        core = %core_option,
        psf_rate,
        face_area_sqft = face_area.0,
        cost,
        "priced skeleton"
    );

    Ok(SkeletonPrice {
        psf_rate,
        face_area,
        cost,
    })
}
