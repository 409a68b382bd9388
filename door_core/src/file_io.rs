//! # File I/O Module
//!
//! Loads the two inputs a quote needs from disk:
//! - **Rate tables** as `.toml` or `.json` (format chosen by extension,
//!   TOML when there is none), version-checked and validated
//! - **Door specs** as JSON
//!
//! Quotes themselves are never written back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use door_core::file_io::{load_door_spec, load_rate_table};
//! use door_core::pricing::price;
//! use std::path::Path;
//!
//! let rates = load_rate_table(Path::new("rates/2025.toml"))?;
//! let spec = load_door_spec(Path::new("door.json"))?;
//! let breakdown = price(&spec, &rates)?;
//! println!("Total: {:.2}", breakdown.total_price());
//! # Ok::<(), door_core::errors::PricingError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::door::DoorSpec;
use crate::errors::{PricingError, PricingResult};
use crate::rates::{RateTable, RateTableConfig};

/// On-disk formats for a rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFileFormat {
    Toml,
    Json,
}

impl RateFileFormat {
    /// Pick the format from a file extension (TOML unless `.json`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RateFileFormat::Json,
            _ => RateFileFormat::Toml,
        }
    }
}

fn read_to_string(path: &Path) -> PricingResult<String> {
    let mut file = File::open(path)
        .map_err(|e| PricingError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PricingError::file_error("read", path.display().to_string(), e.to_string()))?;

    Ok(contents)
}

/// Load and validate a rate table file.
///
/// # Returns
///
/// * `Ok(RateTable)` - Validated, immutable table
/// * `Err(PricingError::FileError)` - I/O error
/// * `Err(PricingError::SerializationError)` - Malformed TOML/JSON
/// * `Err(PricingError::VersionMismatch)` - Unsupported schema version
/// * `Err(PricingError::InvalidRateTable)` - Table failed validation
pub fn load_rate_table(path: &Path) -> PricingResult<RateTable> {
    let contents = read_to_string(path)?;

    let config = match RateFileFormat::from_path(path) {
        RateFileFormat::Toml => RateTableConfig::from_toml_str(&contents),
        RateFileFormat::Json => RateTableConfig::from_json_str(&contents),
    }
    .map_err(|e| match e {
        PricingError::SerializationError { reason } => PricingError::SerializationError {
            reason: format!("{} ({})", reason, path.display()),
        },
        other => other,
    })?;

    let table = RateTable::from_config(config)?;
    info!(
        path = %path.display(),
        name = table.name(),
        version = table.version(),
        "loaded rate table"
    );
    Ok(table)
}

/// Load a door spec from a JSON file.
pub fn load_door_spec(path: &Path) -> PricingResult<DoorSpec> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        PricingError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::STANDARD_RATES_TOML;
    use std::env::temp_dir;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("door_core_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RateFileFormat::from_path(Path::new("a/rates.json")), RateFileFormat::Json);
        assert_eq!(RateFileFormat::from_path(Path::new("a/rates.JSON")), RateFileFormat::Json);
        assert_eq!(RateFileFormat::from_path(Path::new("a/rates.toml")), RateFileFormat::Toml);
        assert_eq!(RateFileFormat::from_path(Path::new("rates")), RateFileFormat::Toml);
    }

    #[test]
    fn test_load_toml_rate_table() {
        let path = temp_path("rates.toml");
        fs::write(&path, STANDARD_RATES_TOML).unwrap();

        let table = load_rate_table(&path).unwrap();
        assert_eq!(table, RateTable::standard().unwrap());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_rate_table() {
        let path = temp_path("rates.json");
        let config = RateTable::standard().unwrap().to_config();
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let table = load_rate_table(&path).unwrap();
        assert_eq!(table.version(), "2025.1");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let path = temp_path("future.toml");
        let text = STANDARD_RATES_TOML.replace("schema_version = \"0.1.0\"", "schema_version = \"0.9.0\"");
        fs::write(&path, text).unwrap();

        assert!(matches!(
            load_rate_table(&path),
            Err(PricingError::VersionMismatch { .. })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_rate_table() {
        let path = temp_path("broken.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = load_rate_table(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(err.to_string().contains("broken.toml"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_rate_table(&temp_path("does_not_exist.toml")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_door_spec() {
        let path = temp_path("door.json");
        fs::write(
            &path,
            r#"{
                "length_mm": 2133.6,
                "width_mm": 914.4,
                "thickness_mm": 40.0,
                "rails_material": "Hardwood",
                "filler_material": "Ecolax Board",
                "core_option": "Core + HDF",
                "door_type": "Veneer",
                "finish_option": "Smoke Oak Veneer",
                "add_ons": { "vision_hole": true, "grooving": { "sides": "Both Sides" } }
            }"#,
        )
        .unwrap();

        let spec = load_door_spec(&path).unwrap();
        assert_eq!(spec.thickness_mm, 40.0);
        assert!(spec.add_ons.edge_banding);
        assert!(spec.add_ons.vision_hole);
        assert!(spec.add_ons.grooving.is_some());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_door_spec_variant_with_irregular_whitespace_is_priced() {
        let path = temp_path("door_spacing.json");
        fs::write(
            &path,
            r#"{
                "length_mm": 2133.6,
                "width_mm": 914.4,
                "thickness_mm": 40.0,
                "rails_material": "Hardwood",
                "filler_material": "Ecolax Board",
                "door_type": "Veneer",
                "finish_option": "Smoke Oak Veneer",
                "add_ons": {
                    "edge_banding": false,
                    "coating": { "variant": "Resin  Coated", "sides": "Both Sides" }
                }
            }"#,
        )
        .unwrap();

        let spec = load_door_spec(&path).unwrap();
        let quotation = crate::pricing::quote(&spec, &RateTable::standard().unwrap()).unwrap();

        assert!(quotation.notices.is_empty());
        assert_eq!(quotation.addon_lines.len(), 1);
        // 21.0 sqft single face × 180
        assert!((quotation.breakdown.addon_cost() - 3780.0).abs() < 0.01);

        let _ = fs::remove_file(&path);
    }
}
