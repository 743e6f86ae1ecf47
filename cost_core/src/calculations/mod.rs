//! # Cost Calculations
//!
//! This module contains the four estimate types. Each calculation follows
//! the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable, `validate()` at entry)
//! - `*Result` - Derived quantities plus a [`crate::aggregate::CostBreakdown`]
//! - `calculate(&input, &catalog) -> Result<*Result, EstimateError>` - Pure
//!   function of the input and a read-only catalog snapshot
//!
//! ## Available Calculations
//!
//! - [`brick`] - Brick wall (bricks, mortar, laying labor, crew days)
//! - [`cement`] - Cement/mortar mix (plastering, flooring, bricklaying, concrete)
//! - [`concrete`] - Concrete pour (steel, formwork, slab infill)
//! - [`tile`] - Tile installation (boxes, adhesive, joint cement, baseboard)

pub mod brick;
pub mod cement;
pub mod concrete;
pub mod tile;

use serde::{Deserialize, Serialize};

use crate::aggregate::CostBreakdown;
use crate::catalog::PriceCatalog;
use crate::errors::{EstimateError, EstimateResult};
use crate::money::Currency;

// Re-export commonly used types
pub use brick::{BrickInput, BrickResult, BrickType};
pub use cement::{CementInput, CementResult, UsageType};
pub use concrete::{ConcreteInput, ConcreteResult, ConcreteType, SlabType};
pub use tile::{InstallLocation, TileInput, TileResult, TileType};

/// Reject negative optional prices/overrides once, at the boundary.
pub(crate) fn validate_price(field: &str, value: Option<f64>) -> EstimateResult<()> {
    if let Some(v) = value {
        if v < 0.0 {
            return Err(EstimateError::invalid_input(
                field,
                v.to_string(),
                "Value cannot be negative",
            ));
        }
    }
    Ok(())
}

/// Enum wrapper for all estimate request types.
///
/// Allows heterogeneous requests to travel through one channel while
/// keeping per-type payloads strongly typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimateRequest {
    /// Brick wall estimate
    Brick(BrickInput),
    /// Cement/mortar estimate
    Cement(CementInput),
    /// Concrete pour estimate
    Concrete(ConcreteInput),
    /// Tile installation estimate
    Tile(TileInput),
}

impl EstimateRequest {
    /// Get the user-provided label for this request
    pub fn label(&self) -> &str {
        match self {
            EstimateRequest::Brick(i) => &i.label,
            EstimateRequest::Cement(i) => &i.label,
            EstimateRequest::Concrete(i) => &i.label,
            EstimateRequest::Tile(i) => &i.label,
        }
    }

    /// Get the calculation type as a stable code string
    pub fn calc_type(&self) -> &'static str {
        match self {
            EstimateRequest::Brick(_) => "brick",
            EstimateRequest::Cement(_) => "cement",
            EstimateRequest::Concrete(_) => "concrete",
            EstimateRequest::Tile(_) => "tile",
        }
    }

    /// Run the matching calculator against a catalog.
    pub fn calculate(&self, catalog: &dyn PriceCatalog) -> EstimateResult<EstimateResponse> {
        match self {
            EstimateRequest::Brick(input) => {
                brick::calculate(input, catalog).map(EstimateResponse::Brick)
            }
            EstimateRequest::Cement(input) => {
                cement::calculate(input, catalog).map(EstimateResponse::Cement)
            }
            EstimateRequest::Concrete(input) => {
                concrete::calculate(input, catalog).map(EstimateResponse::Concrete)
            }
            EstimateRequest::Tile(input) => {
                tile::calculate(input, catalog).map(EstimateResponse::Tile)
            }
        }
    }
}

/// Enum wrapper for all estimate response types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimateResponse {
    Brick(BrickResult),
    Cement(CementResult),
    Concrete(ConcreteResult),
    Tile(TileResult),
}

impl EstimateResponse {
    /// Get the calculation type as a stable code string
    pub fn calc_type(&self) -> &'static str {
        match self {
            EstimateResponse::Brick(_) => "brick",
            EstimateResponse::Cement(_) => "cement",
            EstimateResponse::Concrete(_) => "concrete",
            EstimateResponse::Tile(_) => "tile",
        }
    }

    /// Itemized costs and totals
    pub fn breakdown(&self) -> &CostBreakdown {
        match self {
            EstimateResponse::Brick(r) => &r.breakdown,
            EstimateResponse::Cement(r) => &r.breakdown,
            EstimateResponse::Concrete(r) => &r.breakdown,
            EstimateResponse::Tile(r) => &r.breakdown,
        }
    }

    /// Rounded total cost
    pub fn total_cost(&self) -> f64 {
        self.breakdown().total_cost
    }

    /// Estimate currency
    pub fn currency(&self) -> Currency {
        self.breakdown().currency
    }

    /// Echo of the originating request
    pub fn input_summary(&self) -> &serde_json::Value {
        match self {
            EstimateResponse::Brick(r) => &r.input_summary,
            EstimateResponse::Cement(r) => &r.input_summary,
            EstimateResponse::Concrete(r) => &r.input_summary,
            EstimateResponse::Tile(r) => &r.input_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn test_request_dispatch() {
        let request = EstimateRequest::Brick(BrickInput::new(100.0, 10.0));
        assert_eq!(request.calc_type(), "brick");

        let response = request.calculate(default_catalog()).unwrap();
        assert_eq!(response.calc_type(), "brick");
        assert!(response.total_cost() > 0.0);
        assert_eq!(response.currency(), Currency::Iqd);
    }

    #[test]
    fn test_request_tagged_serialization() {
        let request = EstimateRequest::Tile(TileInput::new(30.0));
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"tile\""));

        let roundtrip: EstimateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, roundtrip);
    }

    #[test]
    fn test_errors_propagate_through_dispatch() {
        let mut input = BrickInput::new(100.0, 10.0);
        input.openings_area_m2 = 150.0;
        let request = EstimateRequest::Brick(input);

        let err = request.calculate(default_catalog()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");
    }
}
