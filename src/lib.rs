//! # Wscbridge
//!
//! A typed bridge to the Windows Security Center: it enumerates the
//! antivirus, anti-spyware, and firewall products registered with the
//! platform's security-status broker and normalizes each one into a fixed
//! posture vocabulary, with compliance-ready audit logging.
//!
//! ## Overview
//!
//! Wscbridge provides an abstraction layer over the security-status
//! broker, allowing you to:
//!
//! - Collect the host's endpoint-protection posture through a consistent API
//! - Normalize raw broker values into closed state and freshness vocabularies
//! - Render collections as the fixed four-column table fleet consoles expect
//! - Fail fast on broker errors without leaking sessions or handles
//! - Test every path against a configurable mock broker
//! - Generate structured audit logs for compliance
//!
//! ## Quick Start
//!
//! ```rust
//! use wscbridge::broker::mock::{MockProduct, MockSecurityCenter};
//! use wscbridge::{PostureCollector, ProtectionCategory};
//!
//! // On Windows hosts, use wscbridge::broker::WscSecurityCenter instead,
//! // after calling wscbridge::broker::initialize() once.
//! let broker = MockSecurityCenter::new()
//!     .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"))
//!     .with_product(
//!         ProtectionCategory::Firewall,
//!         MockProduct::new("Win Firewall").snoozed(),
//!     );
//!
//! let report = PostureCollector::new(&broker).collect();
//!
//! assert!(report.is_complete());
//! for record in &report.records {
//!     println!("{}: {} is {}", record.category, record.name, record.state);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: Fundamental types, the broker trait seam, and error handling
//! - **Broker**: The platform backend and the mock backend
//! - **Collector**: Fail-fast orchestration of the three-category enumeration
//! - **Table**: The fixed tabular presentation of a collection
//! - **Audit**: Structured logging for compliance

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod broker;
pub mod collector;
pub mod core;
pub mod table;

// Re-export commonly used types at the crate root
pub use crate::core::{
    PostureError, PostureReport, PostureResult, ProductHandle, ProductRecord, ProductState,
    ProtectionCategory, ProviderSession, QueryOp, SecurityCenter, SignatureStatus,
};

pub use crate::collector::PostureCollector;
pub use crate::table::{PostureTable, TableRow, TABLE_NAME};

/// Prelude module for convenient imports.
///
/// ```rust
/// use wscbridge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        PostureError, PostureReport, PostureResult, ProductHandle, ProductRecord, ProductState,
        ProtectionCategory, ProviderSession, QueryOp, SecurityCenter, SignatureStatus,
    };

    pub use crate::collector::PostureCollector;
    pub use crate::table::{PostureTable, TableRow, TABLE_NAME};
}
