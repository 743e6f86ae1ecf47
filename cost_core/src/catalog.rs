//! # Material Price Catalog
//!
//! Read-only catalog of regional unit prices and domain constants. The
//! engine never owns or mutates this data - calculators receive a
//! [`PriceCatalog`] reference and stay pure, so tests can inject fakes and
//! the surrounding service can back the catalog with whatever store it
//! likes.
//!
//! Prices are keyed by `(material code, region)`. Constants (bricks per m²,
//! steel ratios, coverage figures) are keyed by a flat string key and are
//! region-independent.
//!
//! A seeded Baghdad catalog with baseline IQD figures ships behind
//! [`default_catalog`] for demos and tests. The numbers are labeled
//! defaults, not market data - production deployments inject their own
//! catalog.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// The region used when a requested region has no catalog entry.
pub const DEFAULT_REGION: &str = "baghdad";

/// A geographic pricing zone (e.g. "baghdad", "basra", "erbil").
///
/// Stored lowercase so lookups are case-insensitive. Deserialization goes
/// through [`Region::new`], so `"Basra"` in a request matches the
/// catalog's `basra` entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Region(name.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fallback pricing zone
    pub fn fallback() -> Self {
        Region(DEFAULT_REGION.to_string())
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::fallback()
    }
}

impl From<String> for Region {
    fn from(name: String) -> Self {
        Region::new(name)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One priced material in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Material code (e.g. "brick.normal.per_1000")
    pub material_code: String,

    /// Coarse grouping (e.g. "brick", "cement", "labor")
    pub category: String,

    /// Pricing zone this entry applies to
    pub region: Region,

    /// Price per the unit implied by the material code
    pub unit_price: f64,

    /// Currency the price is denominated in
    pub currency: Currency,

    /// Inactive entries are invisible to lookups
    pub active: bool,
}

/// Read-only price and constant lookup.
///
/// `unit_price` returns the active entry for `(code, region, currency)`,
/// or `None` on a miss - fallback to the default region is the
/// [`crate::pricing::PricingResolver`]'s job, not the catalog's.
pub trait PriceCatalog: Send + Sync {
    fn unit_price(&self, code: &str, region: &Region, currency: Currency) -> Option<f64>;

    fn constant(&self, key: &str) -> Option<f64>;
}

/// In-memory catalog implementation.
///
/// Suitable as the seeded default and as a test fake. Entries are keyed by
/// `(code, region)`; the currency check happens at lookup time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<(String, String), PriceEntry>,
    constants: HashMap<String, f64>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Insert or replace a price entry.
    pub fn insert_entry(&mut self, entry: PriceEntry) {
        self.entries.insert(
            (entry.material_code.clone(), entry.region.as_str().to_string()),
            entry,
        );
    }

    /// Shorthand for an active IQD entry.
    pub fn with_price(
        mut self,
        code: &str,
        category: &str,
        region: &Region,
        unit_price: f64,
    ) -> Self {
        self.insert_entry(PriceEntry {
            material_code: code.to_string(),
            category: category.to_string(),
            region: region.clone(),
            unit_price,
            currency: Currency::Iqd,
            active: true,
        });
        self
    }

    pub fn with_constant(mut self, key: &str, value: f64) -> Self {
        self.constants.insert(key.to_string(), value);
        self
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl PriceCatalog for InMemoryCatalog {
    fn unit_price(&self, code: &str, region: &Region, currency: Currency) -> Option<f64> {
        self.entries
            .get(&(code.to_string(), region.as_str().to_string()))
            .filter(|e| e.active && e.currency == currency)
            .map(|e| e.unit_price)
    }

    fn constant(&self, key: &str) -> Option<f64> {
        self.constants.get(key).copied()
    }
}

/// Material code strings used by the calculators.
pub mod codes {
    // Brick work
    pub const BRICK_NORMAL_PER_1000: &str = "brick.normal.per_1000";
    pub const BRICK_JAMHOURI_PER_1000: &str = "brick.jamhouri.per_1000";
    pub const BRICK_THERMOSTONE_PER_1000: &str = "brick.thermostone.per_1000";
    pub const LABOR_BRICKLAYING_PER_1000: &str = "labor.bricklaying.per_1000";
    pub const MORTAR_PER_M2: &str = "mortar.per_m2";

    // Cement / mortar
    pub const CEMENT_PER_TON: &str = "cement.per_ton";
    pub const SAND_PER_M3: &str = "sand.per_m3";
    pub const LABOR_PLASTERING_PER_M2: &str = "labor.plastering.per_m2";
    pub const LABOR_FLOORING_PER_M2: &str = "labor.flooring.per_m2";
    pub const LABOR_MORTAR_PER_M3: &str = "labor.mortar.per_m3";

    // Concrete
    pub const CONCRETE_PER_M3: &str = "concrete.ready_mix.per_m3";
    pub const STEEL_PER_TON: &str = "steel.rebar.per_ton";
    pub const FORMWORK_PER_M2: &str = "formwork.per_m2";
    pub const LABOR_CONCRETE_PER_M3: &str = "labor.concrete.per_m3";
    pub const HOLLOW_BLOCK_PER_UNIT: &str = "block.hollow.per_unit";
    pub const STYROFOAM_PER_M2: &str = "styrofoam.per_m2";

    // Tiling
    pub const TILE_CERAMIC_PER_BOX: &str = "tile.ceramic.per_box";
    pub const TILE_PORCELAIN_PER_BOX: &str = "tile.porcelain.per_box";
    pub const TILE_MARBLE_PER_BOX: &str = "tile.marble.per_box";
    pub const ADHESIVE_PER_BAG: &str = "adhesive.per_bag";
    pub const WHITE_CEMENT_PER_BAG: &str = "white_cement.per_bag";
    pub const BASEBOARD_PER_M: &str = "baseboard.per_m";
    pub const LABOR_TILING_PER_M2: &str = "labor.tiling.per_m2";
}

/// Constant keys used by the calculators.
pub mod constants {
    pub const BRICKS_PER_M2_NORMAL: &str = "brick.per_m2.normal";
    pub const BRICKS_PER_M2_JAMHOURI: &str = "brick.per_m2.jamhouri";
    pub const BRICKS_PER_M2_THERMOSTONE: &str = "brick.per_m2.thermostone";
    pub const BRICK_DAILY_PRODUCTIVITY: &str = "brick.daily_productivity";
    pub const BRICK_CREW_WORKERS: &str = "brick.crew_workers";

    pub const CEMENT_BULK_DENSITY_T_PER_M3: &str = "cement.bulk_density_t_per_m3";

    pub const STEEL_RATIO_FOUNDATION: &str = "steel.ratio.foundation";
    pub const STEEL_RATIO_SLAB: &str = "steel.ratio.slab";
    pub const STEEL_RATIO_COLUMN: &str = "steel.ratio.column";
    pub const STEEL_RATIO_BEAM: &str = "steel.ratio.beam";

    pub const HOLLOW_BLOCKS_PER_M2: &str = "slab.hollow_blocks_per_m2";

    pub const TILE_BOX_COVERAGE_CERAMIC: &str = "tile.box_coverage.ceramic";
    pub const TILE_BOX_COVERAGE_PORCELAIN: &str = "tile.box_coverage.porcelain";
    pub const TILE_BOX_COVERAGE_MARBLE: &str = "tile.box_coverage.marble";
    pub const TILE_ADHESIVE_COVERAGE_PER_BAG: &str = "tile.adhesive_coverage_m2_per_bag";
    pub const TILE_JOINT_COVERAGE_PER_BAG: &str = "tile.joint_coverage_m2_per_bag";
}

/// Seeded Baghdad catalog with baseline IQD figures.
///
/// These are labeled defaults for demos and tests, not live market data.
static DEFAULT_CATALOG: Lazy<InMemoryCatalog> = Lazy::new(|| {
    let baghdad = Region::fallback();
    InMemoryCatalog::new()
        // Brick work
        .with_price(codes::BRICK_NORMAL_PER_1000, "brick", &baghdad, 150_000.0)
        .with_price(codes::BRICK_JAMHOURI_PER_1000, "brick", &baghdad, 250_000.0)
        .with_price(codes::BRICK_THERMOSTONE_PER_1000, "brick", &baghdad, 450_000.0)
        .with_price(codes::LABOR_BRICKLAYING_PER_1000, "labor", &baghdad, 80_000.0)
        .with_price(codes::MORTAR_PER_M2, "mortar", &baghdad, 3_000.0)
        // Cement / mortar
        .with_price(codes::CEMENT_PER_TON, "cement", &baghdad, 180_000.0)
        .with_price(codes::SAND_PER_M3, "sand", &baghdad, 25_000.0)
        .with_price(codes::LABOR_PLASTERING_PER_M2, "labor", &baghdad, 5_000.0)
        .with_price(codes::LABOR_FLOORING_PER_M2, "labor", &baghdad, 6_000.0)
        .with_price(codes::LABOR_MORTAR_PER_M3, "labor", &baghdad, 15_000.0)
        // Concrete
        .with_price(codes::CONCRETE_PER_M3, "concrete", &baghdad, 120_000.0)
        .with_price(codes::STEEL_PER_TON, "steel", &baghdad, 950_000.0)
        .with_price(codes::FORMWORK_PER_M2, "formwork", &baghdad, 10_000.0)
        .with_price(codes::LABOR_CONCRETE_PER_M3, "labor", &baghdad, 25_000.0)
        .with_price(codes::HOLLOW_BLOCK_PER_UNIT, "block", &baghdad, 1_500.0)
        .with_price(codes::STYROFOAM_PER_M2, "styrofoam", &baghdad, 6_000.0)
        // Tiling
        .with_price(codes::TILE_CERAMIC_PER_BOX, "tile", &baghdad, 12_000.0)
        .with_price(codes::TILE_PORCELAIN_PER_BOX, "tile", &baghdad, 20_000.0)
        .with_price(codes::TILE_MARBLE_PER_BOX, "tile", &baghdad, 35_000.0)
        .with_price(codes::ADHESIVE_PER_BAG, "adhesive", &baghdad, 8_000.0)
        .with_price(codes::WHITE_CEMENT_PER_BAG, "cement", &baghdad, 15_000.0)
        .with_price(codes::BASEBOARD_PER_M, "tile", &baghdad, 3_000.0)
        .with_price(codes::LABOR_TILING_PER_M2, "labor", &baghdad, 7_000.0)
        // Quantity constants
        .with_constant(constants::BRICKS_PER_M2_NORMAL, 55.0)
        .with_constant(constants::BRICKS_PER_M2_JAMHOURI, 62.0)
        .with_constant(constants::BRICKS_PER_M2_THERMOSTONE, 8.3)
        .with_constant(constants::BRICK_DAILY_PRODUCTIVITY, 600.0)
        .with_constant(constants::BRICK_CREW_WORKERS, 3.0)
        .with_constant(constants::CEMENT_BULK_DENSITY_T_PER_M3, 1.44)
        .with_constant(constants::STEEL_RATIO_FOUNDATION, 90.0)
        .with_constant(constants::STEEL_RATIO_SLAB, 120.0)
        .with_constant(constants::STEEL_RATIO_COLUMN, 160.0)
        .with_constant(constants::STEEL_RATIO_BEAM, 140.0)
        .with_constant(constants::HOLLOW_BLOCKS_PER_M2, 8.0)
        .with_constant(constants::TILE_BOX_COVERAGE_CERAMIC, 1.44)
        .with_constant(constants::TILE_BOX_COVERAGE_PORCELAIN, 1.2)
        .with_constant(constants::TILE_BOX_COVERAGE_MARBLE, 1.0)
        .with_constant(constants::TILE_ADHESIVE_COVERAGE_PER_BAG, 5.0)
        .with_constant(constants::TILE_JOINT_COVERAGE_PER_BAG, 20.0)
});

/// Get the seeded default catalog.
pub fn default_catalog() -> &'static InMemoryCatalog {
    &DEFAULT_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_normalization() {
        let region = Region::new(" Baghdad ");
        assert_eq!(region.as_str(), "baghdad");
        assert_eq!(region, Region::fallback());
    }

    #[test]
    fn test_region_deserializes_through_normalization() {
        let region: Region = serde_json::from_str("\"Basra\"").unwrap();
        assert_eq!(region.as_str(), "basra");
        assert_eq!(region, Region::new("basra"));

        // Serialization stays a plain lowercase string
        assert_eq!(serde_json::to_string(&region).unwrap(), "\"basra\"");
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let baghdad = Region::fallback();
        let catalog = InMemoryCatalog::new().with_price("sand.per_m3", "sand", &baghdad, 25_000.0);

        assert_eq!(
            catalog.unit_price("sand.per_m3", &baghdad, Currency::Iqd),
            Some(25_000.0)
        );
        assert_eq!(
            catalog.unit_price("sand.per_m3", &Region::new("basra"), Currency::Iqd),
            None
        );
        // Wrong currency is a miss, not a silent conversion
        assert_eq!(
            catalog.unit_price("sand.per_m3", &baghdad, Currency::Usd),
            None
        );
    }

    #[test]
    fn test_inactive_entries_are_invisible() {
        let baghdad = Region::fallback();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_entry(PriceEntry {
            material_code: "cement.per_ton".to_string(),
            category: "cement".to_string(),
            region: baghdad.clone(),
            unit_price: 180_000.0,
            currency: Currency::Iqd,
            active: false,
        });

        assert_eq!(
            catalog.unit_price("cement.per_ton", &baghdad, Currency::Iqd),
            None
        );
    }

    #[test]
    fn test_default_catalog_seeded() {
        let catalog = default_catalog();
        let baghdad = Region::fallback();

        assert!(catalog
            .unit_price(codes::CEMENT_PER_TON, &baghdad, Currency::Iqd)
            .is_some());
        assert_eq!(catalog.constant(constants::BRICKS_PER_M2_NORMAL), Some(55.0));
        assert_eq!(catalog.constant("no.such.key"), None);
    }
}
