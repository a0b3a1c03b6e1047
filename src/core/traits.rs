//! Core traits for the wscbridge library.
//!
//! This module defines the seam between the posture collector and the
//! platform's security-status broker: a category-scoped session, indexable
//! product handles, and a one-shot lazy sequence over a session.
//!
//! All operations are synchronous. The broker API blocks the calling thread
//! until it responds, and nothing at this layer suspends or times out; a
//! deployment needing a deadline wraps the whole collection call externally.

use crate::core::error::PostureResult;
use crate::core::types::ProtectionCategory;

use std::fmt::Debug;

/// A boxed, category-scoped broker session.
pub type BoxedSession<'a> = Box<dyn ProviderSession + 'a>;

/// A boxed per-product broker handle.
pub type BoxedHandle<'a> = Box<dyn ProductHandle + 'a>;

/// The security-status broker a collection runs against.
///
/// The real backend wraps the Windows Security Center; tests use the
/// configurable mock in [`crate::broker::mock`].
///
/// # Implementation notes
///
/// - `open` acquires broker resources scoped to one category. Failure must
///   leave no partial state behind.
/// - Session close is `Drop`: implementations release every broker resource
///   owned by the session when it is dropped, on success and abort paths
///   alike, and dropping must be safe after a partial enumeration.
/// - Implementations should never panic on broker data; all failures are
///   returned as [`crate::core::PostureError`].
pub trait SecurityCenter: Debug {
    /// Returns a stable, human-readable backend identifier such as
    /// `"wsc"` or `"mock"`. Used in logs and audit events.
    fn name(&self) -> &str;

    /// Opens a session scoped to one protection category.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::BrokerUnavailable`] if the
    /// broker cannot be instantiated or refuses initialization for the
    /// category.
    fn open(&self, category: ProtectionCategory) -> PostureResult<BoxedSession<'_>>;
}

/// An open broker session for one protection category.
///
/// A session owns broker-side resources for the lifetime of one category's
/// enumeration and releases them when dropped.
pub trait ProviderSession: Debug {
    /// Returns the category this session is scoped to.
    fn category(&self) -> ProtectionCategory;

    /// Returns the number of products registered in this category.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::QueryFailed`] if the broker
    /// rejects the count query.
    fn product_count(&self) -> PostureResult<usize>;

    /// Retrieves the product handle at `index`.
    ///
    /// `index` is constrained to `[0, product_count)`. The collector is the
    /// only caller and always respects the count; an out-of-range index is
    /// a programming error, which implementations surface as a query
    /// failure rather than a panic.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::QueryFailed`] if the broker
    /// cannot produce the handle.
    fn product_at(&self, index: usize) -> PostureResult<BoxedHandle<'_>>;
}

/// A handle to one registered security product within an open session.
///
/// Handles are released by `Drop`, before the enumeration advances to the
/// next index.
pub trait ProductHandle: Debug {
    /// Returns the product display name as a fresh, independently owned
    /// copy. Any broker-owned buffer backing the name is released before
    /// this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::QueryFailed`]; an unreadable
    /// name is a hard failure for the product.
    fn name(&self) -> PostureResult<String>;

    /// Returns the raw enablement state value, prior to normalization.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::QueryFailed`].
    fn state(&self) -> PostureResult<u32>;

    /// Returns the raw signature-freshness value, prior to normalization.
    ///
    /// Only meaningful outside the firewall category; the collector never
    /// calls it for firewall sessions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PostureError::QueryFailed`].
    fn signature_status(&self) -> PostureResult<u32>;
}

impl<T: SecurityCenter + ?Sized> SecurityCenter for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn open(&self, category: ProtectionCategory) -> PostureResult<BoxedSession<'_>> {
        (**self).open(category)
    }
}

/// Builds the one-shot product sequence for an open session.
///
/// The count is read up front; the returned iterator then yields one handle
/// per index in broker order. The sequence is finite, non-restartable, and
/// fuses after the first failed retrieval, preserving the abort-remainder
/// semantics the collector relies on.
///
/// # Errors
///
/// Returns [`crate::core::PostureError::QueryFailed`] if the count query
/// itself fails.
pub fn products(session: &dyn ProviderSession) -> PostureResult<Products<'_>> {
    let count = session.product_count()?;
    Ok(Products {
        session,
        index: 0,
        count,
        fused: false,
    })
}

/// One-shot iterator over the products of an open session.
///
/// Created by [`products`]. Yields `Ok` handles in broker index order and
/// stops permanently after yielding the first `Err`.
pub struct Products<'s> {
    session: &'s dyn ProviderSession,
    index: usize,
    count: usize,
    fused: bool,
}

impl<'s> Iterator for Products<'s> {
    type Item = PostureResult<BoxedHandle<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.index >= self.count {
            return None;
        }
        let item = self.session.product_at(self.index);
        self.index += 1;
        if item.is_err() {
            self.fused = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.fused {
            0
        } else {
            self.count - self.index
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Products<'_> {}
