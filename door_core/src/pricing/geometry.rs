//! Door geometry: face and edge areas in square feet.
//!
//! Both functions round to 4 decimal places, and every downstream cost is
//! computed from the rounded figure. Dimensions must be positive; that is the
//! caller's responsibility and nothing here checks it.

use crate::units::{SqFt, SqMm};

/// Decimal places kept on computed areas
pub const AREA_DECIMALS: u32 = 4;

/// Face area `(L × W / conversion) × side_factor`, rounded to 4 places.
///
/// `side_factor` is 1 for single-face pricing and 2 when both faces are
/// priced (veneer).
pub fn face_area_sqft(length_mm: f64, width_mm: f64, side_factor: f64, sqmm_per_sqft: f64) -> SqFt {
    (SqMm(length_mm * width_mm).to_sqft(sqmm_per_sqft) * side_factor).rounded(AREA_DECIMALS)
}

/// Perimeter band surface `2(L + W) × T / conversion`, rounded to 4 places.
pub fn edge_area_sqft(length_mm: f64, width_mm: f64, thickness_mm: f64, sqmm_per_sqft: f64) -> SqFt {
    let perimeter_mm = 2.0 * (length_mm + width_mm);
    SqMm(perimeter_mm * thickness_mm)
        .to_sqft(sqmm_per_sqft)
        .rounded(AREA_DECIMALS)
}
