//! Audit event types and emission functions.

use crate::core::{PostureReport, ProtectionCategory};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the timestamp of the event.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Audit event for a completed posture collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionAuditEvent {
    /// Event type.
    pub event_type: String,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Unique collection ID.
    pub collection_id: String,

    /// Whether every category enumerated cleanly.
    pub complete: bool,

    /// Number of product rows gathered.
    pub record_count: usize,

    /// Number of products reporting a disabled state.
    pub disabled_count: usize,

    /// Number of products reporting stale signatures.
    pub stale_count: usize,

    /// Collection duration in milliseconds.
    pub duration_ms: u64,

    /// The aborting error, if the collection did not complete.
    pub error: Option<String>,
}

impl AuditEvent for CollectionAuditEvent {
    fn event_type(&self) -> &'static str {
        "collection_report"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl From<&PostureReport> for CollectionAuditEvent {
    fn from(report: &PostureReport) -> Self {
        Self {
            event_type: "collection_report".to_string(),
            timestamp: report.collected_at,
            collection_id: report.id.clone(),
            complete: report.is_complete(),
            record_count: report.record_count(),
            disabled_count: report.disabled_products().count(),
            stale_count: report.stale_signatures().count(),
            duration_ms: report.duration.as_millis() as u64,
            error: report.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Emits an audit event for a collection starting.
pub fn emit_collection_started(collection_id: &str, broker: &str) {
    tracing::info!(
        target: "wscbridge::audit",
        event_type = "collection_started",
        collection_id = %collection_id,
        broker = %broker,
        "Collection started"
    );
}

/// Emits an audit event for one category enumerating cleanly.
pub fn emit_category_collected(
    collection_id: &str,
    category: ProtectionCategory,
    product_count: usize,
) {
    tracing::info!(
        target: "wscbridge::audit",
        event_type = "category_collected",
        collection_id = %collection_id,
        category = %category,
        product_count = product_count,
        "Category collected"
    );
}

/// Emits an audit event for a finished collection report.
pub fn emit_collection_report(report: &PostureReport) {
    let event = CollectionAuditEvent::from(report);

    tracing::info!(
        target: "wscbridge::audit",
        event_type = "collection_report",
        collection_id = %event.collection_id,
        complete = event.complete,
        record_count = event.record_count,
        disabled_count = event.disabled_count,
        stale_count = event.stale_count,
        duration_ms = event.duration_ms,
        error = ?event.error,
        "Collection report generated"
    );
}
