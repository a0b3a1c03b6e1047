//! The posture collector.
//!
//! Drives the full three-category enumeration against a broker backend,
//! normalizes every product into a [`ProductRecord`], and returns a
//! [`PostureReport`]. Collection is synchronous and single-threaded: the
//! broker session is category-scoped and its handles are not assumed safe
//! for concurrent access, so categories and products are visited strictly
//! sequentially.

use crate::audit;
use crate::core::{
    products, PostureReport, PostureResult, ProductRecord, ProductState, ProtectionCategory,
    SecurityCenter, SignatureStatus,
};

use std::time::Instant;

/// Collects the host's endpoint-protection posture from a broker backend.
///
/// Categories are visited in the fixed order antivirus, anti-spyware,
/// firewall; within a category, rows follow the broker's own index order.
/// The first failure at any step aborts the entire remaining collection
/// (fail-fast: a broker malfunction is treated as broader unavailability,
/// not a per-product blip), but rows from categories that already ran to
/// completion are preserved in the report.
///
/// A collector holds no state between runs; build one per collection, or
/// reuse it freely, the broker session lives only inside [`Self::collect`].
///
/// # Examples
///
/// ```rust
/// use wscbridge::broker::mock::{MockProduct, MockSecurityCenter};
/// use wscbridge::{PostureCollector, ProtectionCategory};
///
/// let broker = MockSecurityCenter::new()
///     .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"));
///
/// let report = PostureCollector::new(&broker).collect();
/// assert!(report.is_complete());
/// assert_eq!(report.record_count(), 1);
/// ```
#[derive(Debug)]
pub struct PostureCollector<B> {
    broker: B,
}

impl<B: SecurityCenter> PostureCollector<B> {
    /// Creates a collector over a broker backend.
    pub fn new(broker: B) -> Self {
        Self { broker }
    }

    /// Returns a reference to the underlying broker.
    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Runs one full collection.
    ///
    /// Never fails as a call: broker errors abort the remaining
    /// enumeration and travel inside the report, alongside whatever rows
    /// were gathered before the failure. This is a background collection
    /// path; nothing here is allowed to take the host process down.
    pub fn collect(&self) -> PostureReport {
        let started = Instant::now();
        let collection_id = uuid::Uuid::new_v4().to_string();

        audit::emit_collection_started(&collection_id, self.broker.name());

        let mut records = Vec::new();
        let mut error = None;

        for category in ProtectionCategory::ALL {
            match self.collect_category(category) {
                Ok(batch) => {
                    tracing::debug!(
                        collection_id = %collection_id,
                        category = %category,
                        products = batch.len(),
                        "category enumerated"
                    );
                    audit::emit_category_collected(&collection_id, category, batch.len());
                    records.extend(batch);
                }
                Err(e) => {
                    tracing::warn!(
                        collection_id = %collection_id,
                        category = %category,
                        error = %e,
                        "collection aborted"
                    );
                    error = Some(e);
                    break;
                }
            }
        }

        let report = PostureReport::new(collection_id, records, error, started.elapsed());
        audit::emit_collection_report(&report);
        report
    }

    /// Enumerates one category into a batch of normalized records.
    ///
    /// The batch is returned only if the whole category enumerates cleanly;
    /// a failure partway through discards the category's rows along with
    /// the error. The session and every product handle are dropped before
    /// this returns, on the error paths included.
    fn collect_category(
        &self,
        category: ProtectionCategory,
    ) -> PostureResult<Vec<ProductRecord>> {
        let session = self.broker.open(category)?;

        let iter = products(session.as_ref())?;
        let mut batch = Vec::with_capacity(iter.len());

        for handle in iter {
            let handle = handle?;
            let name = handle.name()?;
            let state = ProductState::from_raw(handle.state()?);
            let signature = if category.reports_signatures() {
                SignatureStatus::from_raw(handle.signature_status()?)
            } else {
                // Firewalls carry no threat definitions; the signature
                // accessor is never called for them.
                SignatureStatus::NotApplicable
            };

            batch.push(ProductRecord::new(category, name, state, signature));
            // handle drops here, before the next index
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::mock::{MockProduct, MockSecurityCenter};
    use crate::core::types::raw;
    use crate::core::QueryOp;

    /// The fixture from the concrete acceptance scenario: two antivirus
    /// products, no anti-spyware, one snoozed firewall.
    fn scenario_broker() -> MockSecurityCenter {
        MockSecurityCenter::new()
            .with_products(
                ProtectionCategory::AntiVirus,
                vec![
                    MockProduct::new("Defender"),
                    MockProduct::new("Acme AV").off().out_of_date(),
                ],
            )
            .with_product(
                ProtectionCategory::Firewall,
                MockProduct::new("Win Firewall").snoozed(),
            )
    }

    fn row(record: &ProductRecord) -> (String, String, String, String) {
        (
            record.category.label().to_string(),
            record.name.clone(),
            record.state.label().to_string(),
            record.signature.label().to_string(),
        )
    }

    #[test]
    fn test_concrete_scenario_rows_and_order() {
        let broker = scenario_broker();
        let report = PostureCollector::new(&broker).collect();

        assert!(report.is_complete());
        let rows: Vec<_> = report.records.iter().map(row).collect();
        assert_eq!(
            rows,
            [
                (
                    "Anti-Virus".into(),
                    "Defender".into(),
                    "On".into(),
                    "Up-to-date".into()
                ),
                (
                    "Anti-Virus".into(),
                    "Acme AV".into(),
                    "Off".into(),
                    "Out-of-date".into()
                ),
                (
                    "Firewall".into(),
                    "Win Firewall".into(),
                    "Snoozed".into(),
                    "Not Applicable".into()
                ),
            ]
        );
    }

    #[test]
    fn test_row_count_matches_broker_count() {
        let broker = MockSecurityCenter::new().with_products(
            ProtectionCategory::AntiSpyware,
            (0..5)
                .map(|i| MockProduct::new(format!("Product {i}")))
                .collect(),
        );

        let report = PostureCollector::new(&broker).collect();
        assert!(report.is_complete());
        assert_eq!(
            report.records_for(ProtectionCategory::AntiSpyware).count(),
            5
        );
    }

    #[test]
    fn test_empty_broker_yields_empty_complete_report() {
        let broker = MockSecurityCenter::new();
        let report = PostureCollector::new(&broker).collect();

        assert!(report.is_complete());
        assert_eq!(report.record_count(), 0);
        // All three categories were still visited.
        assert_eq!(broker.sessions_opened(), 3);
    }

    #[test]
    fn test_unavailable_category_aborts_and_preserves_prior_rows() {
        let broker = MockSecurityCenter::new()
            .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"))
            .with_unavailable(ProtectionCategory::AntiSpyware)
            .with_product(ProtectionCategory::Firewall, MockProduct::new("Fw"));

        let report = PostureCollector::new(&broker).collect();

        assert_eq!(report.record_count(), 1);
        assert_eq!(report.records[0].name, "Defender");

        let error = report.error.unwrap();
        assert!(error.is_unavailable());
        assert_eq!(error.category(), ProtectionCategory::AntiSpyware);

        // Fail-fast: the firewall session was never opened.
        assert_eq!(broker.sessions_opened(), 1);
    }

    #[test]
    fn test_failure_mid_category_drops_that_categorys_rows() {
        let broker = MockSecurityCenter::new()
            .with_products(
                ProtectionCategory::AntiVirus,
                vec![MockProduct::new("AV 1"), MockProduct::new("AV 2")],
            )
            .with_products(
                ProtectionCategory::AntiSpyware,
                vec![
                    MockProduct::new("Spy 1"),
                    MockProduct::new("Spy 2").with_failing_name(),
                ],
            );

        let report = PostureCollector::new(&broker).collect();

        // Exactly the rows from categories that ran to completion.
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["AV 1", "AV 2"]);

        match report.error.unwrap() {
            crate::core::PostureError::QueryFailed {
                category,
                operation,
                ..
            } => {
                assert_eq!(category, ProtectionCategory::AntiSpyware);
                assert_eq!(operation, QueryOp::ProductName);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_count_failure_aborts() {
        let broker = MockSecurityCenter::new()
            .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"))
            .with_failing_count(ProtectionCategory::Firewall);

        let report = PostureCollector::new(&broker).collect();

        assert_eq!(report.record_count(), 1);
        let error = report.error.unwrap();
        assert_eq!(error.category(), ProtectionCategory::Firewall);
        assert!(!error.is_unavailable());
    }

    #[test]
    fn test_state_failure_aborts() {
        let broker = MockSecurityCenter::new().with_product(
            ProtectionCategory::AntiVirus,
            MockProduct::new("Flaky").with_failing_state(),
        );

        let report = PostureCollector::new(&broker).collect();
        assert_eq!(report.record_count(), 0);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_firewall_signature_accessor_is_never_called() {
        // A firewall product whose signature accessor would fail must not
        // abort anything, and its row is fixed to Not Applicable.
        let broker = MockSecurityCenter::new().with_product(
            ProtectionCategory::Firewall,
            MockProduct::new("Win Firewall")
                .with_signature(raw::SIGNATURES_UP_TO_DATE)
                .with_failing_signature(),
        );

        let report = PostureCollector::new(&broker).collect();

        assert!(report.is_complete());
        assert_eq!(report.records[0].signature, SignatureStatus::NotApplicable);
    }

    #[test]
    fn test_unknown_raw_state_normalizes_to_expired() {
        let broker = MockSecurityCenter::new().with_product(
            ProtectionCategory::AntiVirus,
            MockProduct::new("Future AV").with_state(99),
        );

        let report = PostureCollector::new(&broker).collect();
        assert_eq!(report.records[0].state, ProductState::Expired);
    }

    #[test]
    fn test_sessions_released_on_every_path() {
        let happy = scenario_broker();
        PostureCollector::new(&happy).collect();
        assert_eq!(happy.open_session_count(), 0);

        let refused = MockSecurityCenter::new().with_unavailable(ProtectionCategory::AntiVirus);
        PostureCollector::new(&refused).collect();
        assert_eq!(refused.open_session_count(), 0);

        let broken_mid = MockSecurityCenter::new()
            .with_products(
                ProtectionCategory::AntiVirus,
                vec![
                    MockProduct::new("Ok"),
                    MockProduct::new("Broken").with_failing_name(),
                ],
            )
            .with_failing_count(ProtectionCategory::Firewall);
        PostureCollector::new(&broken_mid).collect();
        assert_eq!(broken_mid.open_session_count(), 0);
    }

    #[test]
    fn test_fresh_collection_succeeds_after_abort() {
        // An aborted run must not leave a dangling session that blocks the
        // broker for the next one.
        let broker = scenario_broker();

        let flaky = MockSecurityCenter::new().with_failing_count(ProtectionCategory::AntiVirus);
        PostureCollector::new(&flaky).collect();
        assert_eq!(flaky.open_session_count(), 0);

        let report = PostureCollector::new(&broker).collect();
        assert!(report.is_complete());
        assert_eq!(report.record_count(), 3);
    }

    #[test]
    fn test_reports_get_distinct_ids() {
        let broker = MockSecurityCenter::new();
        let collector = PostureCollector::new(&broker);

        let first = collector.collect();
        let second = collector.collect();
        assert_ne!(first.id, second.id);
    }
}
