//! Mock security center for testing.
//!
//! This module provides a configurable fixture broker that can simulate
//! product inventories and failures at every enumeration step without the
//! platform service. It also tracks how many sessions are currently open,
//! which the resource-release tests assert drops back to zero after every
//! collection, success or failure.

use crate::core::{
    BoxedHandle, BoxedSession, PostureError, PostureResult, ProtectionCategory, ProviderSession,
    ProductHandle, QueryOp, SecurityCenter, STATUS_FAILED,
};

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// A fixture product registered with the mock broker.
///
/// Defaults to an enabled product with current signatures; builder methods
/// adjust the raw values or inject accessor failures.
///
/// # Examples
///
/// ```rust
/// use wscbridge::broker::mock::MockProduct;
///
/// let product = MockProduct::new("Acme AV").off().out_of_date();
/// let broken = MockProduct::new("Flaky").with_failing_name();
/// ```
#[derive(Debug, Clone)]
pub struct MockProduct {
    name: String,
    state: u32,
    signature: u32,
    fail_name: bool,
    fail_state: bool,
    fail_signature: bool,
}

impl MockProduct {
    /// Creates an enabled product with up-to-date signatures.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: crate::core::types::raw::STATE_ON,
            signature: crate::core::types::raw::SIGNATURES_UP_TO_DATE,
            fail_name: false,
            fail_state: false,
            fail_signature: false,
        }
    }

    /// Sets an arbitrary raw state value.
    pub fn with_state(mut self, state: u32) -> Self {
        self.state = state;
        self
    }

    /// Sets an arbitrary raw signature-status value.
    pub fn with_signature(mut self, signature: u32) -> Self {
        self.signature = signature;
        self
    }

    /// Marks the product disabled.
    pub fn off(self) -> Self {
        self.with_state(crate::core::types::raw::STATE_OFF)
    }

    /// Marks the product snoozed.
    pub fn snoozed(self) -> Self {
        self.with_state(crate::core::types::raw::STATE_SNOOZED)
    }

    /// Marks the product's signatures stale.
    pub fn out_of_date(self) -> Self {
        self.with_signature(crate::core::types::raw::SIGNATURES_OUT_OF_DATE)
    }

    /// Makes the name accessor fail.
    pub fn with_failing_name(mut self) -> Self {
        self.fail_name = true;
        self
    }

    /// Makes the state accessor fail.
    pub fn with_failing_state(mut self) -> Self {
        self.fail_state = true;
        self
    }

    /// Makes the signature accessor fail.
    pub fn with_failing_signature(mut self) -> Self {
        self.fail_signature = true;
        self
    }
}

/// A mock security-status broker for testing.
///
/// Fixtures are installed per category through builder methods; failures
/// can be injected at session open, at the count query, and at any product
/// index. Sessions decrement the open-session gauge when dropped, so tests
/// can assert that aborted collections leak nothing.
///
/// # Examples
///
/// ```rust
/// use wscbridge::broker::mock::{MockProduct, MockSecurityCenter};
/// use wscbridge::{ProtectionCategory, SecurityCenter};
///
/// let broker = MockSecurityCenter::new()
///     .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"))
///     .with_unavailable(ProtectionCategory::AntiSpyware);
///
/// assert!(broker.open(ProtectionCategory::AntiVirus).is_ok());
/// assert!(broker.open(ProtectionCategory::AntiSpyware).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockSecurityCenter {
    products: HashMap<ProtectionCategory, Vec<MockProduct>>,
    fail_open: HashSet<ProtectionCategory>,
    fail_count: HashSet<ProtectionCategory>,
    fail_item: HashMap<ProtectionCategory, usize>,
    open_sessions: Arc<AtomicUsize>,
    sessions_opened: AtomicU64,
}

impl MockSecurityCenter {
    /// Creates an empty mock broker: every category opens and reports zero
    /// products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one product in a category, after any already registered.
    pub fn with_product(mut self, category: ProtectionCategory, product: MockProduct) -> Self {
        self.products.entry(category).or_default().push(product);
        self
    }

    /// Registers a list of products in a category, replacing any fixtures
    /// already installed for it.
    pub fn with_products(
        mut self,
        category: ProtectionCategory,
        products: Vec<MockProduct>,
    ) -> Self {
        self.products.insert(category, products);
        self
    }

    /// Makes session open fail for a category.
    pub fn with_unavailable(mut self, category: ProtectionCategory) -> Self {
        self.fail_open.insert(category);
        self
    }

    /// Makes the count query fail for a category.
    pub fn with_failing_count(mut self, category: ProtectionCategory) -> Self {
        self.fail_count.insert(category);
        self
    }

    /// Makes product retrieval fail at one index of a category.
    pub fn with_failing_item(mut self, category: ProtectionCategory, index: usize) -> Self {
        self.fail_item.insert(category, index);
        self
    }

    /// Returns the number of sessions currently open. Zero whenever no
    /// enumeration is in flight; anything else after a collection returns
    /// is a leak.
    pub fn open_session_count(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Returns how many sessions have been opened over the broker's
    /// lifetime, successful or not at later steps.
    pub fn sessions_opened(&self) -> u64 {
        self.sessions_opened.load(Ordering::SeqCst)
    }
}

impl SecurityCenter for MockSecurityCenter {
    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, category: ProtectionCategory) -> PostureResult<BoxedSession<'_>> {
        if self.fail_open.contains(&category) {
            // Refused opens retain no partial state: the gauge is untouched.
            return Err(PostureError::broker_unavailable(category, STATUS_FAILED));
        }

        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.open_sessions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            category,
            broker: self,
            gauge: Arc::clone(&self.open_sessions),
        }))
    }
}

/// An open mock session. Dropping it releases the broker's session slot,
/// which is what makes session close idempotent and safe after a partial
/// enumeration.
#[derive(Debug)]
struct MockSession<'a> {
    category: ProtectionCategory,
    broker: &'a MockSecurityCenter,
    gauge: Arc<AtomicUsize>,
}

impl MockSession<'_> {
    fn fixtures(&self) -> &[MockProduct] {
        self.broker
            .products
            .get(&self.category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl ProviderSession for MockSession<'_> {
    fn category(&self) -> ProtectionCategory {
        self.category
    }

    fn product_count(&self) -> PostureResult<usize> {
        if self.broker.fail_count.contains(&self.category) {
            return Err(PostureError::query_failed(
                self.category,
                QueryOp::Count,
                STATUS_FAILED,
            ));
        }
        Ok(self.fixtures().len())
    }

    fn product_at(&self, index: usize) -> PostureResult<BoxedHandle<'_>> {
        if self.broker.fail_item.get(&self.category) == Some(&index) {
            return Err(PostureError::query_failed(
                self.category,
                QueryOp::Item,
                STATUS_FAILED,
            ));
        }

        // Out-of-range indexes are a caller bug; surface them as a query
        // failure to keep the trait total.
        let product = self.fixtures().get(index).ok_or_else(|| {
            PostureError::query_failed(self.category, QueryOp::Item, STATUS_FAILED)
        })?;

        Ok(Box::new(MockHandle {
            category: self.category,
            product,
        }))
    }
}

impl Drop for MockSession<'_> {
    fn drop(&mut self) {
        self.gauge.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A handle to one fixture product.
#[derive(Debug)]
struct MockHandle<'a> {
    category: ProtectionCategory,
    product: &'a MockProduct,
}

impl ProductHandle for MockHandle<'_> {
    fn name(&self) -> PostureResult<String> {
        if self.product.fail_name {
            return Err(PostureError::query_failed(
                self.category,
                QueryOp::ProductName,
                STATUS_FAILED,
            ));
        }
        Ok(self.product.name.clone())
    }

    fn state(&self) -> PostureResult<u32> {
        if self.product.fail_state {
            return Err(PostureError::query_failed(
                self.category,
                QueryOp::ProductState,
                STATUS_FAILED,
            ));
        }
        Ok(self.product.state)
    }

    fn signature_status(&self) -> PostureResult<u32> {
        if self.product.fail_signature {
            return Err(PostureError::query_failed(
                self.category,
                QueryOp::SignatureStatus,
                STATUS_FAILED,
            ));
        }
        Ok(self.product.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_broker_opens_every_category() {
        let broker = MockSecurityCenter::new();

        for category in ProtectionCategory::ALL {
            let session = broker.open(category).unwrap();
            assert_eq!(session.category(), category);
            assert_eq!(session.product_count().unwrap(), 0);
        }
    }

    #[test]
    fn test_session_gauge_tracks_open_and_drop() {
        let broker = MockSecurityCenter::new();
        assert_eq!(broker.open_session_count(), 0);

        let session = broker.open(ProtectionCategory::AntiVirus).unwrap();
        assert_eq!(broker.open_session_count(), 1);

        drop(session);
        assert_eq!(broker.open_session_count(), 0);
        assert_eq!(broker.sessions_opened(), 1);
    }

    #[test]
    fn test_unavailable_category_retains_no_state() {
        let broker =
            MockSecurityCenter::new().with_unavailable(ProtectionCategory::AntiSpyware);

        let err = broker.open(ProtectionCategory::AntiSpyware).unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.category(), ProtectionCategory::AntiSpyware);
        assert_eq!(broker.open_session_count(), 0);
        assert_eq!(broker.sessions_opened(), 0);
    }

    #[test]
    fn test_product_accessors() {
        let broker = MockSecurityCenter::new().with_product(
            ProtectionCategory::AntiVirus,
            MockProduct::new("Acme AV").off().out_of_date(),
        );

        let session = broker.open(ProtectionCategory::AntiVirus).unwrap();
        let handle = session.product_at(0).unwrap();

        assert_eq!(handle.name().unwrap(), "Acme AV");
        assert_eq!(handle.state().unwrap(), crate::core::types::raw::STATE_OFF);
        assert_eq!(
            handle.signature_status().unwrap(),
            crate::core::types::raw::SIGNATURES_OUT_OF_DATE
        );
    }

    #[test]
    fn test_injected_accessor_failures() {
        let broker = MockSecurityCenter::new().with_product(
            ProtectionCategory::AntiSpyware,
            MockProduct::new("Flaky")
                .with_failing_name()
                .with_failing_state()
                .with_failing_signature(),
        );

        let session = broker.open(ProtectionCategory::AntiSpyware).unwrap();
        let handle = session.product_at(0).unwrap();

        assert!(handle.name().is_err());
        assert!(handle.state().is_err());
        assert!(handle.signature_status().is_err());
    }

    #[test]
    fn test_out_of_range_index_is_query_failure() {
        let broker = MockSecurityCenter::new();
        let session = broker.open(ProtectionCategory::Firewall).unwrap();

        let err = session.product_at(0).unwrap_err();
        assert!(!err.is_unavailable());
    }
}
