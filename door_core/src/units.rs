//! # Unit Types
//!
//! Lightweight wrappers for the areas the pricing engine works in.
//! Door dimensions arrive in millimetres while every rate in the price list
//! is quoted per square foot, so the one conversion that matters is
//! mm² → sqft, using the factor carried by the rate table.
//!
//! ## Example
//!
//! ```rust
//! use door_core::units::{SqMm, SqFt};
//!
//! let face = SqMm(2133.6 * 914.4);
//! let sqft: SqFt = face.to_sqft(92_903.04);
//! assert!((sqft.0 - 21.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

impl SqMm {
    /// Convert to square feet using the given mm² per sqft factor
    pub fn to_sqft(self, sqmm_per_sqft: f64) -> SqFt {
        SqFt(self.0 / sqmm_per_sqft)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            /// Round to the given number of decimal places
            pub fn rounded(self, places: u32) -> Self {
                Self(round_to(self.0, places))
            }
        }
    };
}

impl_arithmetic!(SqMm);
impl_arithmetic!(SqFt);

/// Round `value` to `places` decimal places.
///
/// Rounds the exact binary value rather than `value × 10^places`, so a
/// double stored just below a half (103.335 is really 103.33499…) rounds
/// down. Multiplying first would land on 10333.5 and round up.
pub fn round_to(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}
