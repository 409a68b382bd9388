//! # door_core - Door Pricing Engine
//!
//! `door_core` turns a configurable price list and a customer's door
//! specification into an itemized, reproducible quotation. All inputs and
//! outputs are serde types, so the engine can sit behind a CLI, a web form
//! or another service unchanged.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pricing is a pure function of `(DoorSpec, RateTable)`
//! - **Immutable configuration**: A `RateTable` is validated once and only read
//! - **Two failure tiers**: An unknown material pair is an error; an unpriced
//!   finish or add-on is priced at zero and reported as a notice
//!
//! ## Quick Start
//!
//! ```rust
//! use door_core::{price, AddOnSelection, CoreOption, DoorSpec, DoorType, RateTable};
//!
//! let rates = RateTable::standard().unwrap();
//! let spec = DoorSpec {
//!     length_mm: 2100.0,
//!     width_mm: 900.0,
//!     thickness_mm: 35.0,
//!     rails_material: "Hardwood".to_string(),
//!     filler_material: "Hardwood".to_string(),
//!     core_option: CoreOption::DoubleCore,
//!     door_type: DoorType::Laminate,
//!     finish_option: "Wenge walnut shade 0.8mm".to_string(),
//!     add_ons: AddOnSelection::default(),
//! };
//!
//! let breakdown = price(&spec, &rates).unwrap();
//! println!("Total: {:.2} {}", breakdown.total_price(), rates.currency());
//! ```
//!
//! ## Modules
//!
//! - [`door`] - The request: dimensions, materials, core, finish, add-ons
//! - [`rates`] - Rate table, its file format and validation
//! - [`pricing`] - Geometry, skeleton, finish and add-on pricers
//! - [`report`] - Quote envelope with id and timestamp
//! - [`units`] - Area newtypes and rounding
//! - [`errors`] - Structured error types
//! - [`file_io`] - Loading rate tables and door specs

pub mod door;
pub mod errors;
pub mod file_io;
pub mod pricing;
pub mod rates;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use door::{AddOnSelection, AddonFeature, AreaAddon, CoreOption, DoorSpec, DoorType, Sides};
pub use errors::{PricingError, PricingResult};
pub use file_io::{load_door_spec, load_rate_table};
pub use pricing::{price, quote, PriceBreakdown, PricingNotice, Quotation};
pub use rates::RateTable;
pub use report::QuoteReport;
