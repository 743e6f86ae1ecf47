//! # Tile Installation Cost Calculation
//!
//! Converts a floor or wall area into tile boxes, adhesive and joint-cement
//! bags, and an optional baseboard run, then prices materials and labor.
//!
//! Waste inflates the purchase quantities only: labor and the per-m² rate
//! are billed on the original area, since cutting loss does not add
//! installation effort.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CostBreakdown};
use crate::catalog::{codes, constants, PriceCatalog, Region};
use crate::errors::{EstimateError, EstimateResult};
use crate::money::{CostLine, Currency};
use crate::pricing::PricingResolver;

use super::validate_price;

/// Tile material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Ceramic,
    Porcelain,
    Marble,
}

impl TileType {
    pub const ALL: [TileType; 3] = [TileType::Ceramic, TileType::Porcelain, TileType::Marble];

    pub fn code(&self) -> &'static str {
        match self {
            TileType::Ceramic => "ceramic",
            TileType::Porcelain => "porcelain",
            TileType::Marble => "marble",
        }
    }

    /// Catalog material code for the per-box price
    pub fn price_code(&self) -> &'static str {
        match self {
            TileType::Ceramic => codes::TILE_CERAMIC_PER_BOX,
            TileType::Porcelain => codes::TILE_PORCELAIN_PER_BOX,
            TileType::Marble => codes::TILE_MARBLE_PER_BOX,
        }
    }

    /// Catalog constant key for box coverage in m²
    pub fn box_coverage_key(&self) -> &'static str {
        match self {
            TileType::Ceramic => constants::TILE_BOX_COVERAGE_CERAMIC,
            TileType::Porcelain => constants::TILE_BOX_COVERAGE_PORCELAIN,
            TileType::Marble => constants::TILE_BOX_COVERAGE_MARBLE,
        }
    }

    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "ceramic" => Ok(TileType::Ceramic),
            "porcelain" | "porcelein" => Ok(TileType::Porcelain),
            "marble" => Ok(TileType::Marble),
            _ => Err(EstimateError::unknown_material_type("tile type", s)),
        }
    }
}

impl Default for TileType {
    fn default() -> Self {
        TileType::Ceramic
    }
}

/// Where the tiles go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallLocation {
    Floor,
    Wall,
    Bathroom,
    Kitchen,
}

impl InstallLocation {
    pub const ALL: [InstallLocation; 4] = [
        InstallLocation::Floor,
        InstallLocation::Wall,
        InstallLocation::Bathroom,
        InstallLocation::Kitchen,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            InstallLocation::Floor => "floor",
            InstallLocation::Wall => "wall",
            InstallLocation::Bathroom => "bathroom",
            InstallLocation::Kitchen => "kitchen",
        }
    }
}

impl Default for InstallLocation {
    fn default() -> Self {
        InstallLocation::Floor
    }
}

fn default_waste() -> f64 {
    0.10
}

/// Input parameters for a tile installation estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Living room floor",
///   "tile_type": "porcelain",
///   "location": "floor",
///   "area_m2": 30.0,
///   "include_baseboard": true,
///   "baseboard_length_m": 22.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileInput {
    /// User label for this estimate
    #[serde(default)]
    pub label: String,

    /// Tile material
    #[serde(default)]
    pub tile_type: TileType,

    /// Installation location
    #[serde(default)]
    pub location: InstallLocation,

    /// Area to be tiled in m²
    pub area_m2: f64,

    /// Fractional cutting-loss allowance
    #[serde(default = "default_waste")]
    pub waste_pct: f64,

    /// Whether to include a baseboard (skirting) run
    #[serde(default)]
    pub include_baseboard: bool,

    /// Baseboard run length in m; required when `include_baseboard` is set
    #[serde(default)]
    pub baseboard_length_m: Option<f64>,

    /// Explicit tile price per box
    #[serde(default)]
    pub tile_price_per_box: Option<f64>,

    /// Explicit adhesive price per bag
    #[serde(default)]
    pub adhesive_price_per_bag: Option<f64>,

    /// Explicit white (joint) cement price per bag
    #[serde(default)]
    pub white_cement_price_per_bag: Option<f64>,

    /// Explicit baseboard price per meter
    #[serde(default)]
    pub baseboard_price_per_m: Option<f64>,

    /// Explicit installation labor price per m²
    #[serde(default)]
    pub labor_price_per_m2: Option<f64>,

    /// Estimate currency
    #[serde(default)]
    pub currency: Currency,

    /// Pricing zone
    #[serde(default)]
    pub region: Region,
}

impl TileInput {
    /// Create an input with default classifiers and waste.
    pub fn new(area_m2: f64) -> Self {
        TileInput {
            label: String::new(),
            tile_type: TileType::default(),
            location: InstallLocation::default(),
            area_m2,
            waste_pct: default_waste(),
            include_baseboard: false,
            baseboard_length_m: None,
            tile_price_per_box: None,
            adhesive_price_per_bag: None,
            white_cement_price_per_bag: None,
            baseboard_price_per_m: None,
            labor_price_per_m2: None,
            currency: Currency::default(),
            region: Region::default(),
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.area_m2 <= 0.0 {
            return Err(EstimateError::invalid_geometry(
                "area_m2",
                self.area_m2.to_string(),
                "Area must be positive",
            ));
        }
        if self.waste_pct < 0.0 {
            return Err(EstimateError::invalid_input(
                "waste_pct",
                self.waste_pct.to_string(),
                "Waste percentage cannot be negative",
            ));
        }
        if self.include_baseboard {
            match self.baseboard_length_m {
                Some(l) if l > 0.0 => {}
                _ => {
                    return Err(EstimateError::missing_dimension(
                        "baseboard_length_m",
                        "baseboard",
                    ))
                }
            }
        }
        validate_price("tile_price_per_box", self.tile_price_per_box)?;
        validate_price("adhesive_price_per_bag", self.adhesive_price_per_bag)?;
        validate_price("white_cement_price_per_bag", self.white_cement_price_per_bag)?;
        validate_price("baseboard_price_per_m", self.baseboard_price_per_m)?;
        validate_price("labor_price_per_m2", self.labor_price_per_m2)?;
        Ok(())
    }
}

/// Results from a tile installation estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileResult {
    /// Resolved tile material
    pub tile_type: TileType,

    /// Resolved location
    pub location: InstallLocation,

    /// Billed area in m²
    pub area_m2: f64,

    /// Purchase area after the waste allowance
    pub area_with_waste_m2: f64,

    /// Tile boxes to purchase
    pub tile_boxes: u64,

    /// Adhesive bags to purchase
    pub adhesive_bags: u64,

    /// White (joint) cement bags to purchase
    pub white_cement_bags: u64,

    /// Baseboard run length, when included
    pub baseboard_length_m: Option<f64>,

    /// Itemized costs and totals; `cost_per_unit` is per m² of billed area
    pub breakdown: CostBreakdown,

    /// Echo of the request for traceability
    pub input_summary: serde_json::Value,
}

impl TileResult {
    pub fn cost_per_m2(&self) -> Option<f64> {
        self.breakdown.cost_per_unit
    }
}

/// Estimate the cost of a tile installation.
pub fn calculate(input: &TileInput, catalog: &dyn PriceCatalog) -> EstimateResult<TileResult> {
    input.validate()?;

    let resolver = PricingResolver::new(catalog, input.region.clone(), input.currency);

    let area_with_waste_m2 = input.area_m2 * (1.0 + input.waste_pct);

    let box_coverage = resolver.constant(input.tile_type.box_coverage_key(), None)?;
    let adhesive_coverage = resolver.constant(constants::TILE_ADHESIVE_COVERAGE_PER_BAG, None)?;
    let joint_coverage = resolver.constant(constants::TILE_JOINT_COVERAGE_PER_BAG, None)?;

    let tile_boxes = (area_with_waste_m2 / box_coverage).ceil() as u64;
    let adhesive_bags = (area_with_waste_m2 / adhesive_coverage).ceil() as u64;
    let white_cement_bags = (area_with_waste_m2 / joint_coverage).ceil() as u64;

    let tile_price = resolver.price(input.tile_type.price_code(), input.tile_price_per_box)?;
    let adhesive_price = resolver.price(codes::ADHESIVE_PER_BAG, input.adhesive_price_per_bag)?;
    let white_cement_price =
        resolver.price(codes::WHITE_CEMENT_PER_BAG, input.white_cement_price_per_bag)?;
    let labor_price = resolver.price(codes::LABOR_TILING_PER_M2, input.labor_price_per_m2)?;

    let mut lines = vec![
        CostLine::new("tiles", tile_boxes as f64 * tile_price),
        CostLine::new("adhesive", adhesive_bags as f64 * adhesive_price),
        CostLine::new("white_cement", white_cement_bags as f64 * white_cement_price),
    ];

    let baseboard_length_m = if input.include_baseboard {
        // validate() guarantees a positive length here
        let length = input.baseboard_length_m.unwrap_or_default();
        let baseboard_price =
            resolver.price(codes::BASEBOARD_PER_M, input.baseboard_price_per_m)?;
        lines.push(CostLine::new("baseboard", length * baseboard_price));
        Some(length)
    } else {
        None
    };

    // Labor on the original area - waste does not add installation effort
    lines.push(CostLine::new("labor", input.area_m2 * labor_price));

    let breakdown = aggregate(lines, input.area_m2, input.currency);

    Ok(TileResult {
        tile_type: input.tile_type,
        location: input.location,
        area_m2: input.area_m2,
        area_with_waste_m2,
        tile_boxes,
        adhesive_bags,
        white_cement_bags,
        baseboard_length_m,
        breakdown,
        input_summary: serde_json::to_value(input).unwrap_or(serde_json::Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn test_input() -> TileInput {
        TileInput::new(30.0)
    }

    #[test]
    fn test_purchase_quantities() {
        let result = calculate(&test_input(), default_catalog()).unwrap();

        assert!((result.area_with_waste_m2 - 33.0).abs() < 1e-9);
        // ceil(33 / 1.44) = 23 boxes, ceil(33 / 5) = 7 bags, ceil(33 / 20) = 2 bags
        assert_eq!(result.tile_boxes, 23);
        assert_eq!(result.adhesive_bags, 7);
        assert_eq!(result.white_cement_bags, 2);
    }

    #[test]
    fn test_labor_billed_on_original_area() {
        let result = calculate(&test_input(), default_catalog()).unwrap();
        assert!((result.breakdown.line("labor").unwrap() - 30.0 * 7_000.0).abs() < 1e-6);

        let per_m2 = result.cost_per_m2().unwrap();
        assert!((per_m2 - result.breakdown.total_cost / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseboard_requires_length() {
        let mut input = test_input();
        input.include_baseboard = true;
        input.baseboard_length_m = Some(0.0);
        let err = calculate(&input, default_catalog()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::missing_dimension("baseboard_length_m", "baseboard")
        );

        input.baseboard_length_m = None;
        assert!(calculate(&input, default_catalog()).is_err());
    }

    #[test]
    fn test_baseboard_line_when_included() {
        let mut input = test_input();
        input.include_baseboard = true;
        input.baseboard_length_m = Some(22.0);
        let result = calculate(&input, default_catalog()).unwrap();

        assert_eq!(result.baseboard_length_m, Some(22.0));
        assert!((result.breakdown.line("baseboard").unwrap() - 22.0 * 3_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_baseboard_line_when_excluded() {
        let result = calculate(&test_input(), default_catalog()).unwrap();
        assert_eq!(result.breakdown.line("baseboard"), None);
        assert_eq!(result.baseboard_length_m, None);
    }

    #[test]
    fn test_waste_inflates_materials_not_labor() {
        let base = calculate(&test_input(), default_catalog()).unwrap();

        let mut more_waste = test_input();
        more_waste.waste_pct = 0.25;
        let inflated = calculate(&more_waste, default_catalog()).unwrap();

        assert!(inflated.tile_boxes > base.tile_boxes);
        assert_eq!(inflated.breakdown.line("labor"), base.breakdown.line("labor"));
    }

    #[test]
    fn test_marble_uses_its_own_coverage_and_price() {
        let mut input = test_input();
        input.tile_type = TileType::Marble;
        let result = calculate(&input, default_catalog()).unwrap();

        // 1 m² per box -> ceil(33) boxes
        assert_eq!(result.tile_boxes, 33);
        assert!((result.breakdown.line("tiles").unwrap() - 33.0 * 35_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_serialization() {
        let mut input = test_input();
        input.tile_type = TileType::Porcelain;
        input.location = InstallLocation::Bathroom;
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"porcelain\""));
        assert!(json.contains("\"bathroom\""));
        let roundtrip: TileInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
