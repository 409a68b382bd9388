//! # Quote Report
//!
//! JSON envelope around an itemized quote for front ends: a fresh quote id,
//! the generation time, which price list was used, the request and the
//! result. Building a report is the only place a clock or random id is
//! touched; the pricing itself stays pure.
//!
//! ## Structure
//!
//! ```text
//! QuoteReport
//! ├── meta: QuoteMetadata (quote id, timestamp, rate table name/version, currency)
//! ├── spec: DoorSpec
//! └── quotation: Quotation (breakdown, PSF rate, areas, add-on lines, notices)
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::door::DoorSpec;
use crate::errors::PricingResult;
use crate::pricing::{quote, Quotation};
use crate::rates::RateTable;

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct QuoteMetadata {
    pub quote_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub rates_name: String,
    pub rates_version: String,
    pub currency: String,
}

/// A priced door request, ready to print or hand to another system.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReport {
    pub meta: QuoteMetadata,
    pub spec: DoorSpec,
    pub quotation: Quotation,
}

impl QuoteReport {
    /// Price `spec` against `rates` and wrap the result.
    pub fn generate(spec: &DoorSpec, rates: &RateTable) -> PricingResult<Self> {
        let quotation = quote(spec, rates)?;
        Ok(QuoteReport {
            meta: QuoteMetadata {
                quote_id: Uuid::new_v4(),
                generated_at: Utc::now(),
                rates_name: rates.name().to_string(),
                rates_version: rates.version().to_string(),
                currency: rates.currency().to_string(),
            },
            spec: spec.clone(),
            quotation,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> PricingResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::errors::PricingError::serialization(e.to_string()))
    }
}
