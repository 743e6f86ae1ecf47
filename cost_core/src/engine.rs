//! # Estimator Facade
//!
//! Wires a [`PriceCatalog`] and an optional [`CalculationLogger`] into the
//! single entry point a surrounding service embeds: one `estimate` call per
//! request, synchronous result, asynchronous audit record.
//!
//! Each call is a pure function of the request and the catalog snapshot -
//! no shared mutable state, safe under unlimited parallelism.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cost_core::calculations::{BrickInput, EstimateRequest};
//! use cost_core::catalog::default_catalog;
//! use cost_core::engine::Estimator;
//!
//! let estimator = Estimator::new(Arc::new(default_catalog().clone()));
//! let request = EstimateRequest::Brick(BrickInput::new(100.0, 10.0));
//! let response = estimator.estimate(&request, None).unwrap();
//! assert!(response.total_cost() > 0.0);
//! ```

use std::sync::Arc;

use crate::audit::{CalculationLogger, CalculationRecord};
use crate::calculations::{EstimateRequest, EstimateResponse};
use crate::catalog::PriceCatalog;
use crate::errors::EstimateResult;

/// The estimation engine entry point.
pub struct Estimator {
    catalog: Arc<dyn PriceCatalog>,
    logger: Option<CalculationLogger>,
}

impl Estimator {
    /// Create an estimator without audit logging.
    pub fn new(catalog: Arc<dyn PriceCatalog>) -> Self {
        Estimator {
            catalog,
            logger: None,
        }
    }

    /// Attach a fire-and-forget audit logger.
    pub fn with_logger(mut self, logger: CalculationLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run one estimate.
    ///
    /// Successful estimates are queued to the audit logger (when attached)
    /// before returning; failed ones are never recorded.
    pub fn estimate(
        &self,
        request: &EstimateRequest,
        user_id: Option<&str>,
    ) -> EstimateResult<EstimateResponse> {
        let response = request.calculate(self.catalog.as_ref())?;

        if let Some(logger) = &self.logger {
            logger.record(CalculationRecord::new(
                response.calc_type(),
                response.input_summary().clone(),
                response.total_cost(),
                response.currency(),
                user_id.map(str::to_string),
            ));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryAuditSink;
    use crate::calculations::{BrickInput, TileInput};
    use crate::catalog::default_catalog;
    use std::time::Duration;

    fn estimator() -> Estimator {
        Estimator::new(Arc::new(default_catalog().clone()))
    }

    #[test]
    fn test_estimate_without_logger() {
        let request = EstimateRequest::Brick(BrickInput::new(100.0, 10.0));
        let response = estimator().estimate(&request, None).unwrap();
        assert_eq!(response.total_cost(), 1_488_310.0);
    }

    #[tokio::test]
    async fn test_successful_estimates_are_recorded() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let estimator = estimator().with_logger(CalculationLogger::spawn(sink.clone()));

        let request = EstimateRequest::Tile(TileInput::new(30.0));
        let response = estimator.estimate(&request, Some("user-7")).unwrap();

        let mut records = sink.records().await;
        for _ in 0..50 {
            if !records.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            records = sink.records().await;
        }

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].calculation_type, "tile");
        assert_eq!(records[0].total_cost, response.total_cost());
        assert_eq!(records[0].user_id.as_deref(), Some("user-7"));
    }

    #[tokio::test]
    async fn test_failed_estimates_are_not_recorded() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let estimator = estimator().with_logger(CalculationLogger::spawn(sink.clone()));

        let mut input = BrickInput::new(100.0, 10.0);
        input.openings_area_m2 = 200.0;
        let request = EstimateRequest::Brick(input);

        assert!(estimator.estimate(&request, None).is_err());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sink.records().await.is_empty());
    }
}
