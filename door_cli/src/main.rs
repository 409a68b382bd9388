//! # door-quote
//!
//! Command-line driver for `door_core`: prices a door from flags or a JSON
//! spec, prints or validates rate tables.
//!
//! ```text
//! door-quote quote --length 2100 --width 900 --thickness 35 \
//!     --rails Hardwood --filler Hardwood --door-type laminate \
//!     --finish "Wenge walnut shade 1mm" --coating "Resin Coated (One Side)"
//! door-quote quote --spec door.json --json
//! door-quote --rates rates.toml rates --list
//! door-quote check-rates rates.toml
//! ```

mod telemetry;

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use door_core::{
    load_door_spec, load_rate_table, AddOnSelection, AreaAddon, CoreOption, DoorSpec, DoorType,
    PricingError, QuoteReport, RateTable,
};
use thiserror::Error;
use tracing::debug;

use crate::telemetry::TelemetryError;

#[derive(Parser, Debug)]
#[command(
    name = "door-quote",
    about = "Price doors from a configurable rate table",
    version
)]
struct Cli {
    /// Log level/filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Rate table file (.toml or .json); the built-in standard table when omitted
    #[arg(long, global = true, env = "DOOR_QUOTE_RATES")]
    rates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a door and print the itemized quote
    Quote(QuoteArgs),
    /// Print the active rate table
    Rates(RatesArgs),
    /// Load and validate a rate table file
    CheckRates {
        /// Rate table file to check
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Read the door spec from a JSON file instead of flags
    #[arg(
        long,
        conflicts_with_all = [
            "length", "width", "thickness", "rails", "filler", "core", "door_type", "finish",
            "double_leaf", "vision_hole", "no_edge_banding", "coating", "grooving", "routing",
        ]
    )]
    spec: Option<PathBuf>,

    /// Door length (height) in mm
    #[arg(long, required_unless_present = "spec")]
    length: Option<f64>,
    /// Door width in mm
    #[arg(long, required_unless_present = "spec")]
    width: Option<f64>,
    /// Door thickness in mm
    #[arg(long, required_unless_present = "spec")]
    thickness: Option<f64>,
    /// Rails material, e.g. "Hardwood"
    #[arg(long, required_unless_present = "spec")]
    rails: Option<String>,
    /// Filler material, e.g. "Ecolax Board"
    #[arg(long, required_unless_present = "spec")]
    filler: Option<String>,
    /// Core option: none, "Double Core" or "Core + HDF"
    #[arg(long)]
    core: Option<String>,
    /// Door type: laminate or veneer
    #[arg(long, required_unless_present = "spec")]
    door_type: Option<String>,
    /// Finish name from the laminate or veneer list
    #[arg(long, required_unless_present = "spec")]
    finish: Option<String>,

    #[arg(long)]
    double_leaf: bool,
    #[arg(long)]
    vision_hole: bool,
    /// Skip edge banding (included by default)
    #[arg(long)]
    no_edge_banding: bool,
    /// Coating option, e.g. "Resin Coated (Both Sides)"
    #[arg(long)]
    coating: Option<String>,
    /// Grooving option: "One Side" or "Both Sides"
    #[arg(long)]
    grooving: Option<String>,
    /// Routing option: "One Side" or "Both Sides"
    #[arg(long)]
    routing: Option<String>,

    /// Print the quote report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RatesArgs {
    /// Output format for the full table
    #[arg(long, value_enum, default_value_t = RatesFormat::Toml)]
    format: RatesFormat,
    /// List priced materials, finishes and add-ons instead of the full table
    #[arg(long)]
    list: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RatesFormat {
    Toml,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("missing required option --{0} (or pass --spec)")]
    MissingArgument(&'static str),
    #[error("failed to format output")]
    Render(#[from] fmt::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Pricing(PricingError::UnknownMaterialCombination { .. })
            | CliError::Pricing(PricingError::InvalidInput { .. })
            | CliError::MissingArgument(_) => 2,
            _ => 1,
        }
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument(name))
}

impl QuoteArgs {
    fn door_spec(&self) -> Result<DoorSpec, CliError> {
        if let Some(path) = &self.spec {
            return Ok(load_door_spec(path)?);
        }

        let core_option = match self.core.as_deref() {
            Some(text) => CoreOption::from_str_flexible(text)?,
            None => CoreOption::default(),
        };
        let door_type = DoorType::from_str_flexible(required(self.door_type.as_deref(), "door-type")?)?;

        Ok(DoorSpec {
            length_mm: required(self.length, "length")?,
            width_mm: required(self.width, "width")?,
            thickness_mm: required(self.thickness, "thickness")?,
            rails_material: required(self.rails.clone(), "rails")?,
            filler_material: required(self.filler.clone(), "filler")?,
            core_option,
            door_type,
            finish_option: required(self.finish.clone(), "finish")?,
            add_ons: AddOnSelection {
                double_leaf: self.double_leaf,
                vision_hole: self.vision_hole,
                edge_banding: !self.no_edge_banding,
                coating: self.coating.as_deref().and_then(AreaAddon::parse),
                grooving: self.grooving.as_deref().and_then(AreaAddon::parse),
                routing: self.routing.as_deref().and_then(AreaAddon::parse),
            },
        })
    }
}

fn active_rates(path: Option<&Path>) -> Result<RateTable, CliError> {
    match path {
        Some(path) => Ok(load_rate_table(path)?),
        None => {
            debug!("no rate table given, using the built-in standard table");
            Ok(RateTable::standard()?)
        }
    }
}

const RULE: &str = "═══════════════════════════════════════════════";

fn render_quote(report: &QuoteReport) -> Result<String, fmt::Error> {
    let spec = &report.spec;
    let quotation = &report.quotation;
    let breakdown = &quotation.breakdown;
    let currency = &report.meta.currency;
    let mut out = String::new();

    writeln!(out, "{}", RULE)?;
    writeln!(out, "  DOOR QUOTATION")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Quote:  {}", report.meta.quote_id)?;
    writeln!(out, "Rates:  {} ({})", report.meta.rates_name, report.meta.rates_version)?;
    writeln!(out)?;
    writeln!(out, "Door:")?;
    writeln!(
        out,
        "  Size:      {} x {} x {} mm",
        spec.length_mm, spec.width_mm, spec.thickness_mm
    )?;
    writeln!(
        out,
        "  Materials: {} rails / {} filler",
        spec.rails_material, spec.filler_material
    )?;
    writeln!(out, "  Core:      {}", spec.core_option)?;
    writeln!(out, "  Finish:    {} - {}", spec.door_type, spec.finish_option)?;
    writeln!(out)?;
    writeln!(
        out,
        "Skeleton  {:.4} sqft @ {:.2}/sqft {:>14.2}",
        quotation.face_area_sqft,
        quotation.psf_rate,
        breakdown.skeleton_cost()
    )?;
    writeln!(out, "Finish {:>40.2}", breakdown.finish_cost())?;
    writeln!(out, "Add-ons {:>39.2}", breakdown.addon_cost())?;
    for line in &quotation.addon_lines {
        writeln!(out, "  {:<32} {:>10.2}", line.item.description(), line.cost)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out, "TOTAL {:>41.2} {}", breakdown.total_price(), currency)?;
    writeln!(out, "{}", RULE)?;

    if !quotation.notices.is_empty() {
        writeln!(out)?;
        writeln!(out, "Notices:")?;
        for notice in &quotation.notices {
            writeln!(out, "  [!] {}", notice)?;
        }
    }
    Ok(out)
}

fn render_rate_list(rates: &RateTable) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "{} ({}, {})", rates.name(), rates.version(), rates.currency())?;
    writeln!(out)?;
    writeln!(out, "Materials (rails / filler, per sqft):")?;
    for (rails, filler, rate) in rates.materials() {
        writeln!(out, "  {} / {}  {:.2}", rails, filler, rate)?;
    }
    writeln!(out, "Laminate finishes (per door):")?;
    for (finish, fee) in rates.laminate_finishes() {
        writeln!(out, "  {}  {:.2}", finish, fee)?;
    }
    writeln!(out, "Veneer finishes (per sqft, both faces):")?;
    for (finish, rate) in rates.veneer_finishes() {
        writeln!(out, "  {}  {:.2}", finish, rate)?;
    }
    writeln!(out, "Vision hole fees:")?;
    for bracket in rates.vision_hole_fees() {
        writeln!(
            out,
            "  {}-{} mm  {:.2}",
            bracket.min_thickness_mm, bracket.max_thickness_mm, bracket.fee
        )?;
    }
    writeln!(out, "Add-ons (per sqft of face):")?;
    for (key, rate) in rates.addon_rates() {
        writeln!(out, "  {}  {:.2}", key, rate)?;
    }
    Ok(out)
}

fn run(cli: Cli) -> Result<(), CliError> {
    telemetry::init(&cli.log_level)?;
    debug!(command = ?cli.command, "door-quote starting");

    match cli.command {
        Command::Quote(args) => {
            let rates = active_rates(cli.rates.as_deref())?;
            let spec = args.door_spec()?;
            spec.validate()?;
            let report = QuoteReport::generate(&spec, &rates)?;
            if args.json {
                println!("{}", report.to_json_pretty()?);
            } else {
                print!("{}", render_quote(&report)?);
            }
        }
        Command::Rates(args) => {
            let rates = active_rates(cli.rates.as_deref())?;
            if args.list {
                print!("{}", render_rate_list(&rates)?);
            } else {
                let config = rates.to_config();
                let text = match args.format {
                    RatesFormat::Toml => config.to_toml_string()?,
                    RatesFormat::Json => serde_json::to_string_pretty(&config)
                        .map_err(|e| PricingError::serialization(e.to_string()))?,
                };
                println!("{}", text);
            }
        }
        Command::CheckRates { file } => {
            let rates = load_rate_table(&file)?;
            println!(
                "OK: {} (version {}) - {} material pairs, {} finishes, {} vision hole brackets, {} add-on rates",
                rates.name(),
                rates.version(),
                rates.materials().count(),
                rates.laminate_finishes().count() + rates.veneer_finishes().count(),
                rates.vision_hole_fees().len(),
                rates.addon_rates().count()
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if let CliError::Pricing(pricing) = &err {
                if let Ok(json) = serde_json::to_string_pretty(pricing) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}
