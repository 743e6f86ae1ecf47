//! # Brick Wall Cost Calculation
//!
//! Converts wall geometry into a brick count, mortar coverage, and a
//! material/labor cost breakdown.
//!
//! ## Algorithm
//!
//! 1. `net_area = wall_area - openings_area` (doors and windows deducted)
//! 2. bricks per m² resolved from the brick type unless supplied
//! 3. `raw_bricks = ceil(net_area * bricks_per_m2)`
//! 4. `total_bricks = ceil(raw_bricks * (1 + waste))`
//! 5. bricks and labor priced per 1000 units, mortar per m² of net area
//! 6. crew days from the catalog's daily productivity figure
//!
//! ## Example
//!
//! ```rust
//! use cost_core::calculations::brick::{calculate, BrickInput};
//! use cost_core::catalog::default_catalog;
//!
//! let input = BrickInput::new(100.0, 10.0);
//! let result = calculate(&input, default_catalog()).unwrap();
//! assert_eq!(result.total_bricks, 5297);
//! ```

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CostBreakdown};
use crate::catalog::{codes, constants, PriceCatalog, Region};
use crate::errors::{EstimateError, EstimateResult};
use crate::money::{CostLine, Currency};
use crate::pricing::PricingResolver;

use super::validate_price;

/// Brick varieties common in the Iraqi market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickType {
    /// Standard clay brick (tabuq)
    Normal,
    /// Jamhouri pressed brick
    Jamhouri,
    /// Thermostone (AAC) block
    Thermostone,
}

impl BrickType {
    /// All brick types for UI selection
    pub const ALL: [BrickType; 3] = [BrickType::Normal, BrickType::Jamhouri, BrickType::Thermostone];

    /// Code string used in serialized requests
    pub fn code(&self) -> &'static str {
        match self {
            BrickType::Normal => "normal",
            BrickType::Jamhouri => "jamhouri",
            BrickType::Thermostone => "thermostone",
        }
    }

    /// Human-readable description
    pub fn display_name(&self) -> &'static str {
        match self {
            BrickType::Normal => "Normal clay brick",
            BrickType::Jamhouri => "Jamhouri brick",
            BrickType::Thermostone => "Thermostone block",
        }
    }

    /// Catalog material code for the per-1000 unit price
    pub fn price_code(&self) -> &'static str {
        match self {
            BrickType::Normal => codes::BRICK_NORMAL_PER_1000,
            BrickType::Jamhouri => codes::BRICK_JAMHOURI_PER_1000,
            BrickType::Thermostone => codes::BRICK_THERMOSTONE_PER_1000,
        }
    }

    /// Catalog constant key for bricks per m² of wall
    pub fn per_m2_key(&self) -> &'static str {
        match self {
            BrickType::Normal => constants::BRICKS_PER_M2_NORMAL,
            BrickType::Jamhouri => constants::BRICKS_PER_M2_JAMHOURI,
            BrickType::Thermostone => constants::BRICKS_PER_M2_THERMOSTONE,
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "tabuq" | "clay" => Ok(BrickType::Normal),
            "jamhouri" | "jumhuri" => Ok(BrickType::Jamhouri),
            "thermostone" | "thermoston" | "aac" => Ok(BrickType::Thermostone),
            _ => Err(EstimateError::unknown_material_type("brick type", s)),
        }
    }
}

impl Default for BrickType {
    fn default() -> Self {
        BrickType::Normal
    }
}

impl std::fmt::Display for BrickType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_waste() -> f64 {
    0.07
}

/// Input parameters for a brick wall estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "North wall",
///   "wall_area_m2": 100.0,
///   "openings_area_m2": 10.0,
///   "brick_type": "normal",
///   "waste_pct": 0.07,
///   "region": "baghdad",
///   "currency": "IQD"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickInput {
    /// User label for this estimate (e.g. "North wall")
    #[serde(default)]
    pub label: String,

    /// Gross wall area in m², openings included
    pub wall_area_m2: f64,

    /// Total area of doors and windows in m²
    #[serde(default)]
    pub openings_area_m2: f64,

    /// Brick variety (drives unit price and bricks-per-m²)
    #[serde(default)]
    pub brick_type: BrickType,

    /// Override for bricks per m²; resolved from the catalog when absent
    #[serde(default)]
    pub bricks_per_m2: Option<f64>,

    /// Fractional waste allowance (0.07 = 7% breakage/cutting loss)
    #[serde(default = "default_waste")]
    pub waste_pct: f64,

    /// Explicit brick price per 1000 units; catalog price when absent
    #[serde(default)]
    pub brick_price_per_1000: Option<f64>,

    /// Explicit laying labor price per 1000 bricks
    #[serde(default)]
    pub labor_price_per_1000: Option<f64>,

    /// Explicit mortar cost per m² of net wall
    #[serde(default)]
    pub mortar_price_per_m2: Option<f64>,

    /// Estimate currency
    #[serde(default)]
    pub currency: Currency,

    /// Pricing zone
    #[serde(default)]
    pub region: Region,
}

impl BrickInput {
    /// Create an input with default classifiers and waste.
    pub fn new(wall_area_m2: f64, openings_area_m2: f64) -> Self {
        BrickInput {
            label: String::new(),
            wall_area_m2,
            openings_area_m2,
            brick_type: BrickType::default(),
            bricks_per_m2: None,
            waste_pct: default_waste(),
            brick_price_per_1000: None,
            labor_price_per_1000: None,
            mortar_price_per_m2: None,
            currency: Currency::default(),
            region: Region::default(),
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.wall_area_m2 <= 0.0 {
            return Err(EstimateError::invalid_geometry(
                "wall_area_m2",
                self.wall_area_m2.to_string(),
                "Wall area must be positive",
            ));
        }
        if self.openings_area_m2 < 0.0 {
            return Err(EstimateError::invalid_geometry(
                "openings_area_m2",
                self.openings_area_m2.to_string(),
                "Openings area cannot be negative",
            ));
        }
        if self.openings_area_m2 >= self.wall_area_m2 {
            return Err(EstimateError::invalid_geometry(
                "openings_area_m2",
                self.openings_area_m2.to_string(),
                "Openings cannot equal or exceed the wall area",
            ));
        }
        if self.waste_pct < 0.0 {
            return Err(EstimateError::invalid_input(
                "waste_pct",
                self.waste_pct.to_string(),
                "Waste percentage cannot be negative",
            ));
        }
        validate_price("bricks_per_m2", self.bricks_per_m2)?;
        validate_price("brick_price_per_1000", self.brick_price_per_1000)?;
        validate_price("labor_price_per_1000", self.labor_price_per_1000)?;
        validate_price("mortar_price_per_m2", self.mortar_price_per_m2)?;
        Ok(())
    }

    /// Net wall area after opening deductions
    pub fn net_area_m2(&self) -> f64 {
        self.wall_area_m2 - self.openings_area_m2
    }
}

/// Results from a brick wall estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickResult {
    /// Resolved brick variety
    pub brick_type: BrickType,

    /// Net wall area in m² (openings deducted)
    pub net_area_m2: f64,

    /// Bricks per m² used for the quantity takeoff
    pub bricks_per_m2: f64,

    /// Theoretical brick count before waste
    pub raw_bricks: u64,

    /// Purchase quantity after the waste allowance
    pub total_bricks: u64,

    /// Estimated duration for the catalog's standard crew, whole days
    pub estimated_work_days: u32,

    /// Crew size the duration assumes
    pub crew_workers: u32,

    /// Itemized costs and totals
    pub breakdown: CostBreakdown,

    /// Echo of the request for traceability
    pub input_summary: serde_json::Value,
}

impl BrickResult {
    /// Total cost per m² of net wall, when the net area is non-zero
    pub fn cost_per_m2(&self) -> Option<f64> {
        self.breakdown.cost_per_unit
    }
}

/// Estimate the cost of a brick wall.
///
/// # Arguments
///
/// * `input` - Wall geometry, classifiers, and optional price overrides
/// * `catalog` - Price and constant source for anything not supplied
///
/// # Returns
///
/// * `Ok(BrickResult)` - Quantities and cost breakdown
/// * `Err(EstimateError)` - Invalid input or unresolvable catalog data
pub fn calculate(input: &BrickInput, catalog: &dyn PriceCatalog) -> EstimateResult<BrickResult> {
    input.validate()?;

    let resolver = PricingResolver::new(catalog, input.region.clone(), input.currency);
    let net_area = input.net_area_m2();

    let bricks_per_m2 = resolver.constant(input.brick_type.per_m2_key(), input.bricks_per_m2)?;
    let raw_bricks = (net_area * bricks_per_m2).ceil() as u64;
    let total_bricks = (raw_bricks as f64 * (1.0 + input.waste_pct)).ceil() as u64;

    let brick_price = resolver.price(input.brick_type.price_code(), input.brick_price_per_1000)?;
    let labor_price = resolver.price(codes::LABOR_BRICKLAYING_PER_1000, input.labor_price_per_1000)?;
    let mortar_price = resolver.price(codes::MORTAR_PER_M2, input.mortar_price_per_m2)?;

    let thousands = total_bricks as f64 / 1000.0;
    let lines = vec![
        CostLine::new("bricks", thousands * brick_price),
        CostLine::new("labor", thousands * labor_price),
        CostLine::new("mortar", net_area * mortar_price),
    ];
    let breakdown = aggregate(lines, net_area, input.currency);

    let daily_productivity = resolver.constant(constants::BRICK_DAILY_PRODUCTIVITY, None)?;
    let crew_workers = resolver.constant(constants::BRICK_CREW_WORKERS, None)?;
    let estimated_work_days =
        (total_bricks as f64 / (daily_productivity * crew_workers)).ceil() as u32;

    Ok(BrickResult {
        brick_type: input.brick_type,
        net_area_m2: net_area,
        bricks_per_m2,
        raw_bricks,
        total_bricks,
        estimated_work_days,
        crew_workers: crew_workers as u32,
        breakdown,
        input_summary: serde_json::to_value(input).unwrap_or(serde_json::Value::Null),
    })
}
