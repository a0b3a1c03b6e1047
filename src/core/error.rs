//! Error types for the wscbridge library.
//!
//! This module provides structured, typed errors for every broker failure.
//! The library never panics on broker data; all failures are returned as
//! `Result` values, and none of them are retried internally.

use crate::core::types::ProtectionCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Generic failure status used when the broker gives no more specific code.
///
/// Matches the platform's `E_FAIL` HRESULT bit pattern.
pub const STATUS_FAILED: u32 = 0x8000_4005;

/// The accessor that failed during a session query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOp {
    /// Reading the number of registered products.
    Count,
    /// Retrieving a product handle by index.
    Item,
    /// Reading a product's display name.
    ProductName,
    /// Reading a product's enablement state.
    ProductState,
    /// Reading a product's signature freshness.
    SignatureStatus,
}

impl fmt::Display for QueryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Count => "count",
            Self::Item => "item",
            Self::ProductName => "product_name",
            Self::ProductState => "product_state",
            Self::SignatureStatus => "signature_status",
        };
        f.write_str(name)
    }
}

/// The error type for posture collection.
///
/// Both variants carry the failing category and the broker status code for
/// diagnostic logging. Neither changes collection behavior beyond the
/// fail-fast abort: a single failed call ends the remaining enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostureError {
    /// The security-status session could not be opened for a category:
    /// service not running, access denied, or the category is unsupported
    /// on this platform version. No partial session state is retained.
    #[error("security center session for {category} could not be opened (status {code:#010x})")]
    BrokerUnavailable {
        /// Category whose session open was refused.
        category: ProtectionCategory,
        /// Broker status code, for diagnostics.
        code: u32,
    },

    /// A call against an open session returned a failure status.
    #[error("{operation} query failed for {category} (status {code:#010x})")]
    QueryFailed {
        /// Category whose session was being queried.
        category: ProtectionCategory,
        /// The accessor that failed.
        operation: QueryOp,
        /// Broker status code, for diagnostics.
        code: u32,
    },
}

impl PostureError {
    /// Creates a `BrokerUnavailable` error.
    pub fn broker_unavailable(category: ProtectionCategory, code: u32) -> Self {
        Self::BrokerUnavailable { category, code }
    }

    /// Creates a `QueryFailed` error.
    pub fn query_failed(category: ProtectionCategory, operation: QueryOp, code: u32) -> Self {
        Self::QueryFailed {
            category,
            operation,
            code,
        }
    }

    /// Returns the category the failure occurred in.
    pub fn category(&self) -> ProtectionCategory {
        match self {
            Self::BrokerUnavailable { category, .. } | Self::QueryFailed { category, .. } => {
                *category
            }
        }
    }

    /// Returns the broker status code.
    pub fn code(&self) -> u32 {
        match self {
            Self::BrokerUnavailable { code, .. } | Self::QueryFailed { code, .. } => *code,
        }
    }

    /// Returns `true` if the session itself could not be opened.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::BrokerUnavailable { .. })
    }
}

/// A specialized `Result` type for posture operations.
pub type PostureResult<T> = Result<T, PostureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err = PostureError::broker_unavailable(ProtectionCategory::AntiSpyware, STATUS_FAILED);
        assert!(err.is_unavailable());
        assert_eq!(err.category(), ProtectionCategory::AntiSpyware);
        assert_eq!(err.code(), STATUS_FAILED);

        let err = PostureError::query_failed(
            ProtectionCategory::Firewall,
            QueryOp::ProductName,
            STATUS_FAILED,
        );
        assert!(!err.is_unavailable());
        assert_eq!(err.category(), ProtectionCategory::Firewall);
    }

    #[test]
    fn test_error_display_carries_diagnostics() {
        let err = PostureError::query_failed(
            ProtectionCategory::AntiVirus,
            QueryOp::Count,
            STATUS_FAILED,
        );
        let message = err.to_string();
        assert!(message.contains("count"));
        assert!(message.contains("Anti-Virus"));
        assert!(message.contains("0x80004005"));
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let err = PostureError::broker_unavailable(ProtectionCategory::Firewall, STATUS_FAILED);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "broker_unavailable");
        assert_eq!(json["category"], "firewall");
    }
}
