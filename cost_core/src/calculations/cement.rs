//! # Cement/Mortar Cost Calculation
//!
//! Sizes a mortar mix for plastering, flooring, bricklaying, or concrete
//! work and prices the cement, sand, and labor.
//!
//! Plastering and flooring are area-based (area × thickness gives the
//! mortar volume); bricklaying and concrete usage take a volume directly.
//! The mix ratio splits the volume into cement and sand parts; waste is
//! applied to the cement fraction only (sand loss on site is negligible,
//! a deliberate modeling choice).

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CostBreakdown};
use crate::catalog::{codes, constants, PriceCatalog, Region};
use crate::errors::{EstimateError, EstimateResult};
use crate::money::{CostLine, Currency};
use crate::pricing::PricingResolver;

use super::validate_price;

/// Weight of one cement bag in kg
pub const BAG_WEIGHT_KG: f64 = 50.0;

/// What the mortar is mixed for.
///
/// Determines which dimension is required: plastering and flooring need an
/// area and a layer thickness, bricklaying and concrete need a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Plastering,
    Flooring,
    Bricklaying,
    Concrete,
}

impl UsageType {
    /// All usage types for UI selection
    pub const ALL: [UsageType; 4] = [
        UsageType::Plastering,
        UsageType::Flooring,
        UsageType::Bricklaying,
        UsageType::Concrete,
    ];

    /// Code string used in serialized requests
    pub fn code(&self) -> &'static str {
        match self {
            UsageType::Plastering => "plastering",
            UsageType::Flooring => "flooring",
            UsageType::Bricklaying => "bricklaying",
            UsageType::Concrete => "concrete",
        }
    }

    /// Human-readable description
    pub fn display_name(&self) -> &'static str {
        match self {
            UsageType::Plastering => "Wall plastering",
            UsageType::Flooring => "Floor screed",
            UsageType::Bricklaying => "Bricklaying mortar",
            UsageType::Concrete => "Concrete mix",
        }
    }

    /// Whether the quantity takeoff starts from an area (vs. a volume)
    pub fn is_area_based(&self) -> bool {
        matches!(self, UsageType::Plastering | UsageType::Flooring)
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "plastering" | "plaster" => Ok(UsageType::Plastering),
            "flooring" | "floor" | "screed" => Ok(UsageType::Flooring),
            "bricklaying" | "brick" => Ok(UsageType::Bricklaying),
            "concrete" => Ok(UsageType::Concrete),
            _ => Err(EstimateError::unknown_usage_type(s)),
        }
    }
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_waste() -> f64 {
    0.05
}

fn default_mix_ratio() -> u32 {
    4
}

/// Input parameters for a cement/mortar estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Interior plaster",
///   "usage_type": "plastering",
///   "area_m2": 50.0,
///   "thickness_cm": 2.0,
///   "mix_ratio": 4,
///   "waste_pct": 0.05
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CementInput {
    /// User label for this estimate
    #[serde(default)]
    pub label: String,

    /// What the mortar is for
    pub usage_type: UsageType,

    /// Covered area in m² (required for plastering/flooring)
    #[serde(default)]
    pub area_m2: Option<f64>,

    /// Layer thickness in cm (required for plastering/flooring)
    #[serde(default)]
    pub thickness_cm: Option<f64>,

    /// Mortar volume in m³ (required for bricklaying/concrete)
    #[serde(default)]
    pub volume_m3: Option<f64>,

    /// Sand parts per one part cement (1:N mix)
    #[serde(default = "default_mix_ratio")]
    pub mix_ratio: u32,

    /// Fractional waste allowance on the cement fraction
    #[serde(default = "default_waste")]
    pub waste_pct: f64,

    /// Explicit cement price per ton
    #[serde(default)]
    pub cement_price_per_ton: Option<f64>,

    /// Explicit sand price per m³
    #[serde(default)]
    pub sand_price_per_m3: Option<f64>,

    /// Explicit labor price (per m² for area-based usage, per m³ otherwise)
    #[serde(default)]
    pub labor_price: Option<f64>,

    /// Estimate currency
    #[serde(default)]
    pub currency: Currency,

    /// Pricing zone
    #[serde(default)]
    pub region: Region,
}

impl CementInput {
    /// Create an input with default mix, waste, region, and currency.
    pub fn new(usage_type: UsageType) -> Self {
        CementInput {
            label: String::new(),
            usage_type,
            area_m2: None,
            thickness_cm: None,
            volume_m3: None,
            mix_ratio: default_mix_ratio(),
            waste_pct: default_waste(),
            cement_price_per_ton: None,
            sand_price_per_m3: None,
            labor_price: None,
            currency: Currency::default(),
            region: Region::default(),
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.mix_ratio < 1 {
            return Err(EstimateError::invalid_input(
                "mix_ratio",
                self.mix_ratio.to_string(),
                "Mix ratio must be at least 1 part sand",
            ));
        }
        if self.waste_pct < 0.0 {
            return Err(EstimateError::invalid_input(
                "waste_pct",
                self.waste_pct.to_string(),
                "Waste percentage cannot be negative",
            ));
        }

        if self.usage_type.is_area_based() {
            match self.area_m2 {
                Some(a) if a > 0.0 => {}
                _ => {
                    return Err(EstimateError::missing_dimension(
                        "area_m2",
                        self.usage_type.code(),
                    ))
                }
            }
            match self.thickness_cm {
                Some(t) if t > 0.0 => {}
                _ => {
                    return Err(EstimateError::missing_dimension(
                        "thickness_cm",
                        self.usage_type.code(),
                    ))
                }
            }
        } else {
            match self.volume_m3 {
                Some(v) if v > 0.0 => {}
                _ => {
                    return Err(EstimateError::missing_dimension(
                        "volume_m3",
                        self.usage_type.code(),
                    ))
                }
            }
        }

        validate_price("cement_price_per_ton", self.cement_price_per_ton)?;
        validate_price("sand_price_per_m3", self.sand_price_per_m3)?;
        validate_price("labor_price", self.labor_price)?;
        Ok(())
    }
}

/// Results from a cement/mortar estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CementResult {
    /// Resolved usage type
    pub usage_type: UsageType,

    /// Wet mortar volume in m³
    pub mortar_volume_m3: f64,

    /// Cement fraction of the mix in m³, before waste
    pub cement_volume_m3: f64,

    /// Sand fraction of the mix in m³
    pub sand_volume_m3: f64,

    /// Cement weight in tons, waste included
    pub cement_ton: f64,

    /// Purchase quantity of 50 kg bags
    pub cement_bags: u64,

    /// Sand parts per one part cement
    pub mix_ratio: u32,

    /// Itemized costs and totals
    pub breakdown: CostBreakdown,

    /// Echo of the request for traceability
    pub input_summary: serde_json::Value,
}

/// Estimate the cost of a mortar mix.
pub fn calculate(input: &CementInput, catalog: &dyn PriceCatalog) -> EstimateResult<CementResult> {
    input.validate()?;

    let resolver = PricingResolver::new(catalog, input.region.clone(), input.currency);

    // validate() guarantees the dimension for this usage type is present
    let mortar_volume_m3 = if input.usage_type.is_area_based() {
        let area = input.area_m2.unwrap_or_default();
        let thickness_cm = input.thickness_cm.unwrap_or_default();
        area * (thickness_cm / 100.0)
    } else {
        input.volume_m3.unwrap_or_default()
    };

    let ratio = input.mix_ratio as f64;
    let cement_volume_m3 = mortar_volume_m3 / (1.0 + ratio);
    let sand_volume_m3 = mortar_volume_m3 * ratio / (1.0 + ratio);

    // Waste hits the cement fraction only
    let cement_with_waste_m3 = cement_volume_m3 * (1.0 + input.waste_pct);
    let density = resolver.constant(constants::CEMENT_BULK_DENSITY_T_PER_M3, None)?;
    let cement_ton = cement_with_waste_m3 * density;
    let cement_bags = (cement_ton * 1000.0 / BAG_WEIGHT_KG).ceil() as u64;

    let cement_price = resolver.price(codes::CEMENT_PER_TON, input.cement_price_per_ton)?;
    let sand_price = resolver.price(codes::SAND_PER_M3, input.sand_price_per_m3)?;

    let (labor_amount, net_quantity) = if input.usage_type.is_area_based() {
        let area = input.area_m2.unwrap_or_default();
        let labor_code = match input.usage_type {
            UsageType::Flooring => codes::LABOR_FLOORING_PER_M2,
            _ => codes::LABOR_PLASTERING_PER_M2,
        };
        let labor_price = resolver.price(labor_code, input.labor_price)?;
        (area * labor_price, area)
    } else {
        let labor_price = resolver.price(codes::LABOR_MORTAR_PER_M3, input.labor_price)?;
        (mortar_volume_m3 * labor_price, mortar_volume_m3)
    };

    let lines = vec![
        CostLine::new("cement", cement_ton * cement_price),
        CostLine::new("sand", sand_volume_m3 * sand_price),
        CostLine::new("labor", labor_amount),
    ];
    let breakdown = aggregate(lines, net_quantity, input.currency);

    Ok(CementResult {
        usage_type: input.usage_type,
        mortar_volume_m3,
        cement_volume_m3,
        sand_volume_m3,
        cement_ton,
        cement_bags,
        mix_ratio: input.mix_ratio,
        breakdown,
        input_summary: serde_json::to_value(input).unwrap_or(serde_json::Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn plastering_input() -> CementInput {
        let mut input = CementInput::new(UsageType::Plastering);
        input.area_m2 = Some(50.0);
        input.thickness_cm = Some(2.0);
        input
    }

    #[test]
    fn test_reference_mortar_volume() {
        // 50 m² at 2 cm, 1:4 mix
        let result = calculate(&plastering_input(), default_catalog()).unwrap();

        assert!((result.mortar_volume_m3 - 1.0).abs() < 1e-9);
        assert!((result.cement_volume_m3 - 0.2).abs() < 1e-9);
        assert!((result.sand_volume_m3 - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_bag_count_rounds_up() {
        let result = calculate(&plastering_input(), default_catalog()).unwrap();

        // 0.2 m³ * 1.05 waste * 1.44 t/m³ = 0.3024 t -> 6.048 bags -> 7
        assert!((result.cement_ton - 0.3024).abs() < 1e-9);
        assert_eq!(result.cement_bags, 7);
    }

    #[test]
    fn test_volume_based_usage() {
        let mut input = CementInput::new(UsageType::Bricklaying);
        input.volume_m3 = Some(2.0);
        let result = calculate(&input, default_catalog()).unwrap();

        assert!((result.mortar_volume_m3 - 2.0).abs() < 1e-9);
        // Labor billed per m³ of mortar for volume-based usage
        assert!((result.breakdown.line("labor").unwrap() - 2.0 * 15_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_dimensions() {
        let mut input = CementInput::new(UsageType::Plastering);
        input.area_m2 = Some(50.0);
        // thickness absent
        let err = calculate(&input, default_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_DIMENSION");

        let input = CementInput::new(UsageType::Concrete);
        // volume absent
        let err = calculate(&input, default_catalog()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::missing_dimension("volume_m3", "concrete")
        );
    }

    #[test]
    fn test_mix_ratio_must_be_at_least_one() {
        let mut input = plastering_input();
        input.mix_ratio = 0;
        let err = calculate(&input, default_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_waste_hits_cement_only() {
        let base = calculate(&plastering_input(), default_catalog()).unwrap();

        let mut more_waste = plastering_input();
        more_waste.waste_pct = 0.15;
        let inflated = calculate(&more_waste, default_catalog()).unwrap();

        assert!(inflated.cement_ton > base.cement_ton);
        // Sand volume and labor are untouched by waste
        assert_eq!(inflated.sand_volume_m3, base.sand_volume_m3);
        assert_eq!(
            inflated.breakdown.line("labor"),
            base.breakdown.line("labor")
        );
    }

    #[test]
    fn test_unknown_usage_type_parsing() {
        let err = UsageType::from_str_flexible("painting").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_USAGE_TYPE");
        assert_eq!(
            UsageType::from_str_flexible("Plaster").unwrap(),
            UsageType::Plastering
        );
    }

    #[test]
    fn test_serialization() {
        let input = plastering_input();
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"plastering\""));
        let roundtrip: CementInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
