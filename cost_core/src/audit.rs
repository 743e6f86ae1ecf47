//! # Calculation Audit Log
//!
//! Best-effort, fire-and-forget record of completed estimates. The logger
//! hands records to a worker task over an unbounded channel, so a slow or
//! failing audit sink can never delay or fail an estimate response. Sink
//! errors are reported through `tracing` and swallowed.
//!
//! Only successful estimates are recorded; invalid requests never reach
//! the audit trail. Retention and cleanup belong to the sink's owner, not
//! the engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::money::Currency;

/// Error type sinks may surface; the logger only logs it.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// One completed estimate, as persisted by the audit collaborator.
///
/// Records are append-only: the engine never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Unique record id
    pub id: Uuid,

    /// Calculation type code ("brick", "cement", "concrete", "tile")
    pub calculation_type: String,

    /// Serialized request the estimate was computed from
    pub input_summary: serde_json::Value,

    /// Rounded total cost of the estimate
    pub total_cost: f64,

    /// Currency of the total
    pub currency: Currency,

    /// Requesting user; `None` for anonymous estimates
    pub user_id: Option<String>,

    /// When the record was created
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    pub fn new(
        calculation_type: impl Into<String>,
        input_summary: serde_json::Value,
        total_cost: f64,
        currency: Currency,
        user_id: Option<String>,
    ) -> Self {
        CalculationRecord {
            id: Uuid::new_v4(),
            calculation_type: calculation_type.into(),
            input_summary,
            total_cost,
            currency,
            user_id,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for calculation records (database table, log stream, ...).
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: &CalculationRecord) -> Result<(), SinkError>;
}

/// In-memory sink for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: tokio::sync::Mutex<Vec<CalculationRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        InMemoryAuditSink::default()
    }

    pub async fn records(&self) -> Vec<CalculationRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, record: &CalculationRecord) -> Result<(), SinkError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Fire-and-forget handle in front of an [`AuditSink`].
///
/// `record` never blocks and never fails from the caller's perspective.
/// Must be spawned inside a tokio runtime.
#[derive(Clone)]
pub struct CalculationLogger {
    tx: mpsc::UnboundedSender<CalculationRecord>,
}

impl CalculationLogger {
    /// Start the worker task consuming records into `sink`.
    pub fn spawn(sink: Arc<dyn AuditSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<CalculationRecord>();

        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                if let Err(error) = sink.append(&record).await {
                    tracing::warn!(
                        record_id = %record.id,
                        calculation_type = %record.calculation_type,
                        %error,
                        "audit sink rejected calculation record"
                    );
                }
            }
        });

        CalculationLogger { tx }
    }

    /// Queue a record for the worker. Send failures are swallowed.
    pub fn record(&self, record: CalculationRecord) {
        if self.tx.send(record).is_err() {
            tracing::warn!("audit worker gone, dropping calculation record");
        }
    }
}
