//! # Error Types
//!
//! Structured error types for cost_core. Every error carries enough context
//! (field name, offending value, region) for the caller to correct the
//! request without guessing.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_area(area_m2: f64) -> EstimateResult<()> {
//!     if area_m2 <= 0.0 {
//!         return Err(EstimateError::InvalidGeometry {
//!             field: "area_m2".to_string(),
//!             value: area_m2.to_string(),
//!             reason: "Area must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cost_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimation operations.
///
/// All variants describe caller-input or configuration-data problems;
/// none are transient and none are retried by the engine.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// A dimension is non-positive or contradictory (e.g. openings larger
    /// than the wall they sit in)
    #[error("Invalid geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// A field required by the selected usage/type is absent or zero
    #[error("Missing dimension '{field}' required for {usage}")]
    MissingDimension { field: String, usage: String },

    /// Unrecognized cement usage type
    #[error("Unknown usage type: {value}")]
    UnknownUsageType { value: String },

    /// Unrecognized material classifier (brick type, tile type, ...)
    #[error("Unknown {kind}: {value}")]
    UnknownMaterialType { kind: String, value: String },

    /// Catalog has no price for this material in the requested region
    /// (nor in the default region)
    #[error("No price for material '{material}' in region '{region}'")]
    UnresolvedPrice { material: String, region: String },

    /// Catalog has no value for a required domain constant
    #[error("No catalog value for constant '{key}'")]
    UnresolvedConstant { key: String },

    /// An input value is out of range (negative price, waste < 0, mix ratio < 1)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
}

impl EstimateError {
    /// Create an InvalidGeometry error
    pub fn invalid_geometry(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidGeometry {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingDimension error
    pub fn missing_dimension(field: impl Into<String>, usage: impl Into<String>) -> Self {
        EstimateError::MissingDimension {
            field: field.into(),
            usage: usage.into(),
        }
    }

    /// Create an UnknownUsageType error
    pub fn unknown_usage_type(value: impl Into<String>) -> Self {
        EstimateError::UnknownUsageType {
            value: value.into(),
        }
    }

    /// Create an UnknownMaterialType error
    pub fn unknown_material_type(kind: impl Into<String>, value: impl Into<String>) -> Self {
        EstimateError::UnknownMaterialType {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create an UnresolvedPrice error
    pub fn unresolved_price(material: impl Into<String>, region: impl Into<String>) -> Self {
        EstimateError::UnresolvedPrice {
            material: material.into(),
            region: region.into(),
        }
    }

    /// Create an UnresolvedConstant error
    pub fn unresolved_constant(key: impl Into<String>) -> Self {
        EstimateError::UnresolvedConstant { key: key.into() }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            EstimateError::MissingDimension { .. } => "MISSING_DIMENSION",
            EstimateError::UnknownUsageType { .. } => "UNKNOWN_USAGE_TYPE",
            EstimateError::UnknownMaterialType { .. } => "UNKNOWN_MATERIAL_TYPE",
            EstimateError::UnresolvedPrice { .. } => "UNRESOLVED_PRICE",
            EstimateError::UnresolvedConstant { .. } => "UNRESOLVED_CONSTANT",
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_geometry("wall_area_m2", "-5.0", "Area must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::missing_dimension("thickness_cm", "plastering").error_code(),
            "MISSING_DIMENSION"
        );
        assert_eq!(
            EstimateError::unresolved_price("cement", "basra").error_code(),
            "UNRESOLVED_PRICE"
        );
    }

    #[test]
    fn test_error_display() {
        let error = EstimateError::unresolved_price("brick.normal", "mosul");
        assert_eq!(
            error.to_string(),
            "No price for material 'brick.normal' in region 'mosul'"
        );
    }
}
