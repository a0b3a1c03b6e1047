//! Collection report structures.
//!
//! This module defines [`PostureReport`], the public result of one posture
//! collection: the normalized rows gathered so far plus the error that
//! aborted the run, if any. Callers that only want best-effort data may use
//! the records and ignore the error; callers needing completeness must
//! check [`PostureReport::is_complete`].

use crate::core::error::PostureError;
use crate::core::types::{ProductRecord, ProtectionCategory};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The result of one posture collection.
///
/// A report is immutable once built. On a fail-fast abort it holds exactly
/// the rows produced by the categories that ran to completion before the
/// failure, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureReport {
    /// Unique identifier for this collection, for log correlation.
    pub id: String,

    /// Normalized product records, in category order then broker index
    /// order within each category.
    pub records: Vec<ProductRecord>,

    /// The failure that aborted the collection, if any. `None` means every
    /// category ran to completion.
    pub error: Option<PostureError>,

    /// When the collection finished.
    pub collected_at: DateTime<Utc>,

    /// How long the collection took.
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl PostureReport {
    /// Creates a new report.
    pub fn new(
        id: impl Into<String>,
        records: Vec<ProductRecord>,
        error: Option<PostureError>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            records,
            error,
            collected_at: Utc::now(),
            duration,
        }
    }

    /// Returns `true` if every category was enumerated without failure.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the number of records in the report.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the records belonging to one category.
    pub fn records_for(
        &self,
        category: ProtectionCategory,
    ) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    /// Returns the records whose product is not actively protecting the
    /// host. This is the fleet-console view of "protection disabled".
    pub fn disabled_products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter().filter(|r| !r.state.is_enabled())
    }

    /// Returns the records whose threat definitions are stale. Firewall
    /// records never appear here; their freshness is not applicable.
    pub fn stale_signatures(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records
            .iter()
            .filter(|r| r.signature == crate::core::types::SignatureStatus::OutOfDate)
    }
}

/// Serde helper for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::STATUS_FAILED;
    use crate::core::types::{ProductState, SignatureStatus};

    fn record(
        category: ProtectionCategory,
        name: &str,
        state: ProductState,
        signature: SignatureStatus,
    ) -> ProductRecord {
        ProductRecord::new(category, name, state, signature)
    }

    #[test]
    fn test_complete_report() {
        let report = PostureReport::new(
            "c-1",
            vec![record(
                ProtectionCategory::AntiVirus,
                "Defender",
                ProductState::On,
                SignatureStatus::UpToDate,
            )],
            None,
            Duration::from_millis(3),
        );

        assert!(report.is_complete());
        assert_eq!(report.record_count(), 1);
        assert_eq!(
            report.records_for(ProtectionCategory::AntiVirus).count(),
            1
        );
        assert_eq!(report.records_for(ProtectionCategory::Firewall).count(), 0);
    }

    #[test]
    fn test_incomplete_report_keeps_error() {
        let report = PostureReport::new(
            "c-2",
            Vec::new(),
            Some(PostureError::broker_unavailable(
                ProtectionCategory::AntiVirus,
                STATUS_FAILED,
            )),
            Duration::from_millis(1),
        );

        assert!(!report.is_complete());
        assert_eq!(
            report.error.as_ref().unwrap().category(),
            ProtectionCategory::AntiVirus
        );
    }

    #[test]
    fn test_fleet_views() {
        let report = PostureReport::new(
            "c-3",
            vec![
                record(
                    ProtectionCategory::AntiVirus,
                    "Defender",
                    ProductState::On,
                    SignatureStatus::UpToDate,
                ),
                record(
                    ProtectionCategory::AntiVirus,
                    "Acme AV",
                    ProductState::Off,
                    SignatureStatus::OutOfDate,
                ),
                record(
                    ProtectionCategory::Firewall,
                    "Win Firewall",
                    ProductState::Snoozed,
                    SignatureStatus::NotApplicable,
                ),
            ],
            None,
            Duration::from_millis(2),
        );

        let disabled: Vec<&str> = report
            .disabled_products()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(disabled, ["Acme AV", "Win Firewall"]);

        let stale: Vec<&str> = report.stale_signatures().map(|r| r.name.as_str()).collect();
        assert_eq!(stale, ["Acme AV"]);
    }

    #[test]
    fn test_report_serializes_duration_as_millis() {
        let report = PostureReport::new("c-4", Vec::new(), None, Duration::from_millis(250));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["duration"], 250);
        assert!(json["error"].is_null());
    }
}
