//! # Cost Aggregator
//!
//! The single aggregation rule shared by all four calculators: sum the raw
//! line amounts, round the total once at the currency's precision, and
//! guard cost-per-unit against a zero quantity. Rounding only the total
//! keeps per-line rounding error from compounding and makes
//! `total_cost == round(Σ lines)` hold exactly.

use serde::{Deserialize, Serialize};

use crate::money::{CostLine, Currency};

/// Monetized result of one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Itemized components, full precision
    pub lines: Vec<CostLine>,

    /// Sum of all lines, rounded once at currency precision
    pub total_cost: f64,

    /// `total_cost / net_quantity`; `None` when the net quantity is zero
    pub cost_per_unit: Option<f64>,

    /// Currency all amounts are denominated in
    pub currency: Currency,
}

impl CostBreakdown {
    /// Look up one line's amount by label.
    pub fn line(&self, label: &str) -> Option<f64> {
        self.lines.iter().find(|l| l.label == label).map(|l| l.amount)
    }
}

/// Combine named cost lines into a breakdown.
///
/// `net_quantity` is the billed quantity (m² or m³) used for the per-unit
/// figure - pass the net value, not the waste-inflated one.
pub fn aggregate(lines: Vec<CostLine>, net_quantity: f64, currency: Currency) -> CostBreakdown {
    let raw_total: f64 = lines.iter().map(|l| l.amount).sum();
    let total_cost = currency.round(raw_total);

    let cost_per_unit = if net_quantity > 0.0 {
        Some(total_cost / net_quantity)
    } else {
        None
    };

    CostBreakdown {
        lines,
        total_cost,
        cost_per_unit,
        currency,
    }
}
