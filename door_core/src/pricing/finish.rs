//! Finish pricer.
//!
//! Laminate is a fixed fee per door. Veneer is priced per sqft over both
//! faces. A finish name missing from the relevant list prices at zero and is
//! reported as a [`PricingNotice::MissingFinishRate`], never as an error.

use tracing::{debug, warn};

use crate::door::DoorType;
use crate::rates::RateTable;
use crate::units::round_to;

use super::geometry::face_area_sqft;
use super::{PricingNotice, MONEY_DECIMALS};

/// Finishing cost for a door, with a notice when the finish is unpriced.
pub fn finish_cost(
    length_mm: f64,
    width_mm: f64,
    door_type: DoorType,
    finish_option: &str,
    rates: &RateTable,
) -> (f64, Option<PricingNotice>) {
    let cost = match door_type {
        DoorType::Laminate => rates.laminate_rate(finish_option).map(|fee| round_to(fee, MONEY_DECIMALS)),
        DoorType::Veneer => rates.veneer_rate(finish_option).map(|rate| {
            let both_faces = face_area_sqft(length_mm, width_mm, 2.0, rates.constants().sqmm_per_sqft);
            round_to(both_faces.0 * rate, MONEY_DECIMALS)
        }),
    };

    match cost {
        Some(cost) => {
            debug!(door_type = %door_type, finish = finish_option, cost, "priced finish");
            (cost, None)
        }
        None => {
            warn!(
                door_type = %door_type,
                finish = finish_option,
                "finish rate not found, pricing finish at zero"
            );
            (
                0.0,
                Some(PricingNotice::MissingFinishRate {
                    door_type,
                    finish: finish_option.to_string(),
                }),
            )
        }
    }
}
