//! Structured audit logging for compliance environments.
//!
//! This module provides functions for emitting structured audit events
//! using the `tracing` crate. Events can be captured by any tracing
//! subscriber (JSON file, OpenTelemetry, etc.) for tamper-resistant logging.

mod events;

pub use events::{
    emit_category_collected, emit_collection_report, emit_collection_started, AuditEvent,
    CollectionAuditEvent,
};
