//! # Pricing Resolver
//!
//! Resolves the unit price a calculator should use for one material in one
//! request. Resolution order:
//!
//! 1. an explicit positive caller-supplied price (request overrides catalog,
//!    so users can model their own market),
//! 2. the active catalog entry for `(code, region)`,
//! 3. the entry for the default region,
//! 4. [`EstimateError::UnresolvedPrice`].
//!
//! Constants (bricks per m², steel ratios, coverage figures) resolve the
//! same way minus the region fallback, since constants are
//! region-independent.
//!
//! The resolver holds no state beyond one request; catalog entries may
//! change between requests and must never be cached here.

use crate::catalog::{PriceCatalog, Region};
use crate::errors::{EstimateError, EstimateResult};
use crate::money::Currency;

/// Per-request price resolution over a borrowed catalog.
pub struct PricingResolver<'a> {
    catalog: &'a dyn PriceCatalog,
    region: Region,
    currency: Currency,
}

impl<'a> PricingResolver<'a> {
    pub fn new(catalog: &'a dyn PriceCatalog, region: Region, currency: Currency) -> Self {
        PricingResolver {
            catalog,
            region,
            currency,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Resolve a unit price, preferring an explicit caller-supplied value.
    ///
    /// Explicit zero falls through to the catalog: "price is zero" and
    /// "price not given" are both non-answers from the caller.
    pub fn price(&self, code: &str, explicit: Option<f64>) -> EstimateResult<f64> {
        if let Some(p) = explicit {
            if p > 0.0 {
                return Ok(p);
            }
        }

        if let Some(p) = self.catalog.unit_price(code, &self.region, self.currency) {
            return Ok(p);
        }

        let fallback = Region::fallback();
        if self.region != fallback {
            if let Some(p) = self.catalog.unit_price(code, &fallback, self.currency) {
                return Ok(p);
            }
        }

        Err(EstimateError::unresolved_price(code, self.region.as_str()))
    }

    /// Resolve a domain constant, preferring an explicit positive value.
    pub fn constant(&self, key: &str, explicit: Option<f64>) -> EstimateResult<f64> {
        if let Some(v) = explicit {
            if v > 0.0 {
                return Ok(v);
            }
        }

        self.catalog
            .constant(key)
            .ok_or_else(|| EstimateError::unresolved_constant(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn catalog() -> InMemoryCatalog {
        let baghdad = Region::fallback();
        let basra = Region::new("basra");
        InMemoryCatalog::new()
            .with_price("sand.per_m3", "sand", &baghdad, 25_000.0)
            .with_price("sand.per_m3", "sand", &basra, 22_000.0)
            .with_price("cement.per_ton", "cement", &baghdad, 180_000.0)
            .with_constant("brick.per_m2.normal", 55.0)
    }

    #[test]
    fn test_explicit_price_wins() {
        let catalog = catalog();
        let resolver = PricingResolver::new(&catalog, Region::fallback(), Currency::Iqd);
        assert_eq!(resolver.price("sand.per_m3", Some(30_000.0)).unwrap(), 30_000.0);
    }

    #[test]
    fn test_explicit_zero_falls_through_to_catalog() {
        let catalog = catalog();
        let resolver = PricingResolver::new(&catalog, Region::fallback(), Currency::Iqd);
        assert_eq!(resolver.price("sand.per_m3", Some(0.0)).unwrap(), 25_000.0);
    }

    #[test]
    fn test_region_lookup_then_fallback() {
        let catalog = catalog();
        let resolver = PricingResolver::new(&catalog, Region::new("basra"), Currency::Iqd);

        // Basra has its own sand price
        assert_eq!(resolver.price("sand.per_m3", None).unwrap(), 22_000.0);
        // No Basra cement entry, falls back to Baghdad
        assert_eq!(resolver.price("cement.per_ton", None).unwrap(), 180_000.0);
    }

    #[test]
    fn test_unresolved_price() {
        let catalog = catalog();
        let resolver = PricingResolver::new(&catalog, Region::new("mosul"), Currency::Iqd);

        let err = resolver.price("steel.rebar.per_ton", None).unwrap_err();
        assert_eq!(err.error_code(), "UNRESOLVED_PRICE");
        assert_eq!(
            err,
            EstimateError::unresolved_price("steel.rebar.per_ton", "mosul")
        );
    }

    #[test]
    fn test_constant_resolution() {
        let catalog = catalog();
        let resolver = PricingResolver::new(&catalog, Region::fallback(), Currency::Iqd);

        assert_eq!(resolver.constant("brick.per_m2.normal", None).unwrap(), 55.0);
        assert_eq!(resolver.constant("brick.per_m2.normal", Some(60.0)).unwrap(), 60.0);

        let err = resolver.constant("tile.box_coverage.granite", None).unwrap_err();
        assert_eq!(err.error_code(), "UNRESOLVED_CONSTANT");
    }
}
