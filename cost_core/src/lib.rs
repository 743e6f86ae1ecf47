//! # cost_core - Construction Cost Estimation Engine
//!
//! `cost_core` estimates the material, labor, and total monetary cost of
//! four construction tasks - brick walls, cement/mortar work, concrete
//! pours, and tile installation - for building projects in Iraq.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Each estimate is a pure function of its input plus a
//!   read-only price-catalog snapshot
//! - **JSON-First**: All inputs, outputs, and errors implement
//!   Serialize/Deserialize
//! - **Injected data**: Regional prices and takeoff constants live in the
//!   [`catalog::PriceCatalog`] collaborator, never in engine code
//! - **Decoupled audit**: The calculation log is fire-and-forget and can
//!   never fail or delay an estimate
//!
//! ## Quick Start
//!
//! ```rust
//! use cost_core::calculations::brick::{calculate, BrickInput};
//! use cost_core::catalog::default_catalog;
//!
//! let input = BrickInput::new(100.0, 10.0);
//! let result = calculate(&input, default_catalog()).unwrap();
//! println!("{} bricks, {} IQD", result.total_bricks, result.breakdown.total_cost);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The four estimate types (brick, cement, concrete, tile)
//! - [`catalog`] - Material price catalog trait, regions, seeded defaults
//! - [`pricing`] - Per-request price/constant resolution with region fallback
//! - [`aggregate`] - The shared cost-line aggregation rule
//! - [`audit`] - Fire-and-forget calculation log
//! - [`engine`] - `Estimator` facade wiring catalog + logger
//! - [`money`] - Currencies, rounding, cost lines
//! - [`errors`] - Structured error types

pub mod aggregate;
pub mod audit;
pub mod calculations;
pub mod catalog;
pub mod engine;
pub mod errors;
pub mod money;
pub mod pricing;

// Re-export commonly used types at crate root for convenience
pub use aggregate::CostBreakdown;
pub use calculations::{EstimateRequest, EstimateResponse};
pub use catalog::{default_catalog, PriceCatalog, Region};
pub use engine::Estimator;
pub use errors::{EstimateError, EstimateResult};
pub use money::Currency;
