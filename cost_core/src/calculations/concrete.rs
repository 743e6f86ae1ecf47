//! # Concrete/Slab Cost Calculation
//!
//! Prices a concrete pour - foundation, slab, column, or beam - including
//! reinforcement steel, formwork, slab infill (hollow block or styrofoam),
//! and placement labor.
//!
//! ## Approximations
//!
//! - Steel tonnage uses a per-type kg/m³ ratio from the catalog unless the
//!   caller supplies one.
//! - Formwork area is the poured plan area for foundations and slabs, and
//!   `length × thickness × 2` (the two long faces) for columns and beams.
//! - Hollow-block count comes from a blocks-per-m² constant; styrofoam
//!   covers the plan area 1:1.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CostBreakdown};
use crate::catalog::{codes, constants, PriceCatalog, Region};
use crate::errors::{EstimateError, EstimateResult};
use crate::money::{CostLine, Currency};
use crate::pricing::PricingResolver;

use super::validate_price;

/// Structural element being poured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcreteType {
    Foundation,
    Slab,
    Column,
    Beam,
}

impl ConcreteType {
    /// All concrete types for UI selection
    pub const ALL: [ConcreteType; 4] = [
        ConcreteType::Foundation,
        ConcreteType::Slab,
        ConcreteType::Column,
        ConcreteType::Beam,
    ];

    /// Code string used in serialized requests
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteType::Foundation => "foundation",
            ConcreteType::Slab => "slab",
            ConcreteType::Column => "column",
            ConcreteType::Beam => "beam",
        }
    }

    /// Human-readable description
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteType::Foundation => "Foundation",
            ConcreteType::Slab => "Roof/floor slab",
            ConcreteType::Column => "Column",
            ConcreteType::Beam => "Beam",
        }
    }

    /// Catalog constant key for the default steel ratio (kg/m³)
    pub fn steel_ratio_key(&self) -> &'static str {
        match self {
            ConcreteType::Foundation => constants::STEEL_RATIO_FOUNDATION,
            ConcreteType::Slab => constants::STEEL_RATIO_SLAB,
            ConcreteType::Column => constants::STEEL_RATIO_COLUMN,
            ConcreteType::Beam => constants::STEEL_RATIO_BEAM,
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "foundation" | "footing" => Ok(ConcreteType::Foundation),
            "slab" | "roof" => Ok(ConcreteType::Slab),
            "column" => Ok(ConcreteType::Column),
            "beam" => Ok(ConcreteType::Beam),
            _ => Err(EstimateError::unknown_material_type("concrete type", s)),
        }
    }
}

impl std::fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Infill method for a roof/floor slab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabType {
    /// Hollow concrete block infill
    Hollow,
    /// Styrofoam/foam block infill
    Styrofoam,
    /// Solid pour, no infill
    Solid,
}

impl SlabType {
    pub const ALL: [SlabType; 3] = [SlabType::Hollow, SlabType::Styrofoam, SlabType::Solid];

    pub fn code(&self) -> &'static str {
        match self {
            SlabType::Hollow => "hollow",
            SlabType::Styrofoam => "styrofoam",
            SlabType::Solid => "solid",
        }
    }

    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "hollow" | "block" => Ok(SlabType::Hollow),
            "styrofoam" | "foam" => Ok(SlabType::Styrofoam),
            "solid" => Ok(SlabType::Solid),
            _ => Err(EstimateError::unknown_material_type("slab type", s)),
        }
    }
}

impl Default for SlabType {
    fn default() -> Self {
        SlabType::Solid
    }
}

fn default_waste() -> f64 {
    0.05
}

/// Input parameters for a concrete pour estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Roof slab",
///   "concrete_type": "slab",
///   "slab_type": "hollow",
///   "length_m": 5.0,
///   "width_m": 4.0,
///   "thickness_m": 0.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteInput {
    /// User label for this estimate
    #[serde(default)]
    pub label: String,

    /// Element being poured
    pub concrete_type: ConcreteType,

    /// Infill method; only consulted when `concrete_type` is `slab`
    #[serde(default)]
    pub slab_type: Option<SlabType>,

    /// Pour length in m
    pub length_m: f64,

    /// Pour width in m
    pub width_m: f64,

    /// Pour thickness/depth in m
    pub thickness_m: f64,

    /// Override for the reinforcement ratio in kg/m³
    #[serde(default)]
    pub steel_ratio_kg_per_m3: Option<f64>,

    /// Fractional waste allowance on the poured volume
    #[serde(default = "default_waste")]
    pub waste_pct: f64,

    /// Explicit ready-mix price per m³
    #[serde(default)]
    pub concrete_price_per_m3: Option<f64>,

    /// Explicit rebar price per ton
    #[serde(default)]
    pub steel_price_per_ton: Option<f64>,

    /// Explicit formwork price per m²
    #[serde(default)]
    pub formwork_price_per_m2: Option<f64>,

    /// Explicit placement labor price per m³
    #[serde(default)]
    pub labor_price_per_m3: Option<f64>,

    /// Explicit hollow-block price per unit
    #[serde(default)]
    pub block_price_per_unit: Option<f64>,

    /// Explicit styrofoam price per m²
    #[serde(default)]
    pub styrofoam_price_per_m2: Option<f64>,

    /// Estimate currency
    #[serde(default)]
    pub currency: Currency,

    /// Pricing zone
    #[serde(default)]
    pub region: Region,
}

impl ConcreteInput {
    /// Create an input with default waste, region, and currency.
    pub fn new(concrete_type: ConcreteType, length_m: f64, width_m: f64, thickness_m: f64) -> Self {
        ConcreteInput {
            label: String::new(),
            concrete_type,
            slab_type: None,
            length_m,
            width_m,
            thickness_m,
            steel_ratio_kg_per_m3: None,
            waste_pct: default_waste(),
            concrete_price_per_m3: None,
            steel_price_per_ton: None,
            formwork_price_per_m2: None,
            labor_price_per_m3: None,
            block_price_per_unit: None,
            styrofoam_price_per_m2: None,
            currency: Currency::default(),
            region: Region::default(),
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        for (field, value) in [
            ("length_m", self.length_m),
            ("width_m", self.width_m),
            ("thickness_m", self.thickness_m),
        ] {
            if value <= 0.0 {
                return Err(EstimateError::invalid_geometry(
                    field,
                    value.to_string(),
                    "Dimension must be positive",
                ));
            }
        }
        if self.waste_pct < 0.0 {
            return Err(EstimateError::invalid_input(
                "waste_pct",
                self.waste_pct.to_string(),
                "Waste percentage cannot be negative",
            ));
        }
        validate_price("steel_ratio_kg_per_m3", self.steel_ratio_kg_per_m3)?;
        validate_price("concrete_price_per_m3", self.concrete_price_per_m3)?;
        validate_price("steel_price_per_ton", self.steel_price_per_ton)?;
        validate_price("formwork_price_per_m2", self.formwork_price_per_m2)?;
        validate_price("labor_price_per_m3", self.labor_price_per_m3)?;
        validate_price("block_price_per_unit", self.block_price_per_unit)?;
        validate_price("styrofoam_price_per_m2", self.styrofoam_price_per_m2)?;
        Ok(())
    }

    /// Poured volume before waste
    pub fn volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.thickness_m
    }

    /// Plan area of the pour
    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }
}

/// Results from a concrete pour estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteResult {
    /// Resolved element type
    pub concrete_type: ConcreteType,

    /// Resolved infill; `None` for non-slab elements
    pub slab_type: Option<SlabType>,

    /// Poured volume in m³ before waste
    pub volume_m3: f64,

    /// Plan area in m²
    pub area_m2: f64,

    /// Volume including the waste allowance
    pub adjusted_volume_m3: f64,

    /// Reinforcement ratio used, kg/m³
    pub steel_ratio_kg_per_m3: f64,

    /// Reinforcement weight in kg
    pub steel_weight_kg: f64,

    /// Reinforcement weight in tons
    pub steel_weight_ton: f64,

    /// Hollow-block purchase count; only for hollow slabs
    pub hollow_block_count: Option<u64>,

    /// Styrofoam coverage in m²; only for styrofoam slabs
    pub styrofoam_area_m2: Option<f64>,

    /// Formwork area the formwork line was billed on
    pub formwork_area_m2: f64,

    /// Total cost per m² of plan area
    pub cost_per_m2: Option<f64>,

    /// Itemized costs and totals; `cost_per_unit` is per m³ of volume
    pub breakdown: CostBreakdown,

    /// Echo of the request for traceability
    pub input_summary: serde_json::Value,
}

impl ConcreteResult {
    /// Total cost per m³ of poured volume
    pub fn cost_per_m3(&self) -> Option<f64> {
        self.breakdown.cost_per_unit
    }
}

/// Estimate the cost of a concrete pour.
pub fn calculate(input: &ConcreteInput, catalog: &dyn PriceCatalog) -> EstimateResult<ConcreteResult> {
    input.validate()?;

    let resolver = PricingResolver::new(catalog, input.region.clone(), input.currency);

    let volume_m3 = input.volume_m3();
    let area_m2 = input.area_m2();
    let adjusted_volume_m3 = volume_m3 * (1.0 + input.waste_pct);

    let steel_ratio = resolver.constant(
        input.concrete_type.steel_ratio_key(),
        input.steel_ratio_kg_per_m3,
    )?;
    let steel_weight_kg = adjusted_volume_m3 * steel_ratio;
    let steel_weight_ton = steel_weight_kg / 1000.0;

    let concrete_price = resolver.price(codes::CONCRETE_PER_M3, input.concrete_price_per_m3)?;
    let steel_price = resolver.price(codes::STEEL_PER_TON, input.steel_price_per_ton)?;
    let formwork_price = resolver.price(codes::FORMWORK_PER_M2, input.formwork_price_per_m2)?;
    let labor_price = resolver.price(codes::LABOR_CONCRETE_PER_M3, input.labor_price_per_m3)?;

    let mut lines = vec![
        CostLine::new("concrete", adjusted_volume_m3 * concrete_price),
        CostLine::new("steel", steel_weight_ton * steel_price),
    ];

    // Slab-only fields are ignored for other element types
    let slab_type = match input.concrete_type {
        ConcreteType::Slab => Some(input.slab_type.unwrap_or_default()),
        _ => None,
    };

    let mut hollow_block_count = None;
    let mut styrofoam_area_m2 = None;
    match slab_type {
        Some(SlabType::Hollow) => {
            let blocks_per_m2 = resolver.constant(constants::HOLLOW_BLOCKS_PER_M2, None)?;
            let count = (area_m2 * blocks_per_m2).ceil() as u64;
            let block_price =
                resolver.price(codes::HOLLOW_BLOCK_PER_UNIT, input.block_price_per_unit)?;
            lines.push(CostLine::new("hollow_blocks", count as f64 * block_price));
            hollow_block_count = Some(count);
        }
        Some(SlabType::Styrofoam) => {
            let styrofoam_price =
                resolver.price(codes::STYROFOAM_PER_M2, input.styrofoam_price_per_m2)?;
            lines.push(CostLine::new("styrofoam", area_m2 * styrofoam_price));
            styrofoam_area_m2 = Some(area_m2);
        }
        Some(SlabType::Solid) | None => {}
    }

    let formwork_area_m2 = match input.concrete_type {
        ConcreteType::Foundation | ConcreteType::Slab => area_m2,
        ConcreteType::Column | ConcreteType::Beam => input.length_m * input.thickness_m * 2.0,
    };
    lines.push(CostLine::new("formwork", formwork_area_m2 * formwork_price));
    lines.push(CostLine::new("labor", adjusted_volume_m3 * labor_price));

    let breakdown = aggregate(lines, volume_m3, input.currency);
    let cost_per_m2 = if area_m2 > 0.0 {
        Some(breakdown.total_cost / area_m2)
    } else {
        None
    };

    Ok(ConcreteResult {
        concrete_type: input.concrete_type,
        slab_type,
        volume_m3,
        area_m2,
        adjusted_volume_m3,
        steel_ratio_kg_per_m3: steel_ratio,
        steel_weight_kg,
        steel_weight_ton,
        hollow_block_count,
        styrofoam_area_m2,
        formwork_area_m2,
        cost_per_m2,
        breakdown,
        input_summary: serde_json::to_value(input).unwrap_or(serde_json::Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn solid_slab() -> ConcreteInput {
        let mut input = ConcreteInput::new(ConcreteType::Slab, 5.0, 4.0, 0.2);
        input.slab_type = Some(SlabType::Solid);
        input
    }

    #[test]
    fn test_reference_geometry() {
        let result = calculate(&solid_slab(), default_catalog()).unwrap();

        assert!((result.volume_m3 - 4.0).abs() < 1e-9);
        assert!((result.area_m2 - 20.0).abs() < 1e-9);
        assert!((result.adjusted_volume_m3 - 4.2).abs() < 1e-9);
        // Solid slabs have no infill quantities
        assert_eq!(result.hollow_block_count, None);
        assert_eq!(result.styrofoam_area_m2, None);
    }

    #[test]
    fn test_steel_from_type_ratio() {
        let result = calculate(&solid_slab(), default_catalog()).unwrap();

        // Seeded slab ratio is 120 kg/m³ on the adjusted volume
        assert_eq!(result.steel_ratio_kg_per_m3, 120.0);
        assert!((result.steel_weight_kg - 4.2 * 120.0).abs() < 1e-9);
        assert!((result.steel_weight_ton - 0.504).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_steel_ratio_wins() {
        let mut input = solid_slab();
        input.steel_ratio_kg_per_m3 = Some(100.0);
        let result = calculate(&input, default_catalog()).unwrap();
        assert_eq!(result.steel_ratio_kg_per_m3, 100.0);
    }

    #[test]
    fn test_hollow_slab_block_count() {
        let mut input = solid_slab();
        input.slab_type = Some(SlabType::Hollow);
        let result = calculate(&input, default_catalog()).unwrap();

        // 20 m² at 8 blocks/m²
        assert_eq!(result.hollow_block_count, Some(160));
        assert!((result.breakdown.line("hollow_blocks").unwrap() - 160.0 * 1_500.0).abs() < 1e-6);
    }

    #[test]
    fn test_styrofoam_slab_coverage() {
        let mut input = solid_slab();
        input.slab_type = Some(SlabType::Styrofoam);
        let result = calculate(&input, default_catalog()).unwrap();

        assert_eq!(result.styrofoam_area_m2, Some(20.0));
        assert_eq!(result.hollow_block_count, None);
    }

    #[test]
    fn test_slab_type_ignored_for_columns() {
        let mut input = ConcreteInput::new(ConcreteType::Column, 3.0, 0.4, 0.4);
        input.slab_type = Some(SlabType::Hollow);
        let result = calculate(&input, default_catalog()).unwrap();

        assert_eq!(result.slab_type, None);
        assert_eq!(result.hollow_block_count, None);
        // Column formwork is the two long faces
        assert!((result.formwork_area_m2 - 3.0 * 0.4 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_slab_formwork_is_plan_area() {
        let result = calculate(&solid_slab(), default_catalog()).unwrap();
        assert!((result.formwork_area_m2 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_dimension() {
        let input = ConcreteInput::new(ConcreteType::Foundation, 5.0, 0.0, 0.5);
        let err = calculate(&input, default_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_both_unit_rates_reported() {
        let result = calculate(&solid_slab(), default_catalog()).unwrap();

        let per_m3 = result.cost_per_m3().unwrap();
        let per_m2 = result.cost_per_m2.unwrap();
        assert!((per_m3 - result.breakdown.total_cost / 4.0).abs() < 1e-9);
        assert!((per_m2 - result.breakdown.total_cost / 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_waste_increases_volume_costs() {
        let base = calculate(&solid_slab(), default_catalog()).unwrap();

        let mut more_waste = solid_slab();
        more_waste.waste_pct = 0.10;
        let inflated = calculate(&more_waste, default_catalog()).unwrap();

        assert!(inflated.breakdown.line("concrete").unwrap() > base.breakdown.line("concrete").unwrap());
        assert!(inflated.breakdown.line("steel").unwrap() > base.breakdown.line("steel").unwrap());
        // Formwork is area-based and unaffected
        assert_eq!(
            inflated.breakdown.line("formwork"),
            base.breakdown.line("formwork")
        );
    }

    #[test]
    fn test_serialization() {
        let input = solid_slab();
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"slab\""));
        let roundtrip: ConcreteInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
