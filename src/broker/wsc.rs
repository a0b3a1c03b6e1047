//! Windows Security Center backend.
//!
//! This backend enumerates registered security products through the WSC
//! COM API (`IWSCProductList` / `IWscProduct`). Each session wraps one
//! initialized product list; dropping the session releases the COM
//! interface, and each product handle releases its interface the same way.
//! Broker-owned `BSTR` name buffers are copied into owned strings before
//! the accessor returns, so nothing in a [`crate::ProductRecord`] points
//! back at broker memory.
//!
//! [`crate::broker::initialize`] must have run in the calling process
//! before a session is opened; the COM apartment is process-global state
//! the broker requires.

#![allow(unsafe_code)]

use crate::core::{
    BoxedHandle, BoxedSession, PostureError, PostureResult, ProtectionCategory, ProviderSession,
    ProductHandle, QueryOp, SecurityCenter,
};

use windows::core::BSTR;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::System::SecurityCenter::{
    IWSCProductList, IWscProduct, WSCProductList, WSC_SECURITY_PROVIDER_ANTISPYWARE,
    WSC_SECURITY_PROVIDER_ANTIVIRUS, WSC_SECURITY_PROVIDER_FIREWALL,
};

/// The platform security-status broker.
///
/// Stateless itself; every [`SecurityCenter::open`] call acquires a fresh
/// category-scoped product list from the service.
#[derive(Debug, Default)]
pub struct WscSecurityCenter;

impl WscSecurityCenter {
    /// Creates a new backend handle.
    pub fn new() -> Self {
        Self
    }
}

/// Maps a protection category to the WSC provider identifier.
fn provider_id(category: ProtectionCategory) -> u32 {
    let provider = match category {
        ProtectionCategory::AntiVirus => WSC_SECURITY_PROVIDER_ANTIVIRUS,
        ProtectionCategory::AntiSpyware => WSC_SECURITY_PROVIDER_ANTISPYWARE,
        ProtectionCategory::Firewall => WSC_SECURITY_PROVIDER_FIREWALL,
    };
    provider.0 as u32
}

/// Extracts the HRESULT bit pattern for diagnostics.
fn status_code(error: &windows::core::Error) -> u32 {
    error.code().0 as u32
}

impl SecurityCenter for WscSecurityCenter {
    fn name(&self) -> &str {
        "wsc"
    }

    fn open(&self, category: ProtectionCategory) -> PostureResult<BoxedSession<'_>> {
        let list: IWSCProductList =
            unsafe { CoCreateInstance(&WSCProductList, None, CLSCTX_INPROC_SERVER) }
                .map_err(|e| PostureError::broker_unavailable(category, status_code(&e)))?;

        unsafe { list.Initialize(provider_id(category)) }
            .map_err(|e| PostureError::broker_unavailable(category, status_code(&e)))?;

        Ok(Box::new(WscSession { category, list }))
    }
}

/// An initialized product list for one category.
///
/// The owned `IWSCProductList` is released when the session drops, on both
/// the success and abort paths; that release is the session close.
#[derive(Debug)]
struct WscSession {
    category: ProtectionCategory,
    list: IWSCProductList,
}

impl ProviderSession for WscSession {
    fn category(&self) -> ProtectionCategory {
        self.category
    }

    fn product_count(&self) -> PostureResult<usize> {
        let count = unsafe { self.list.Count() }
            .map_err(|e| PostureError::query_failed(self.category, QueryOp::Count, status_code(&e)))?;
        // The broker reports a LONG; clamp rather than wrap if it ever
        // hands back a negative count.
        Ok(count.max(0) as usize)
    }

    fn product_at(&self, index: usize) -> PostureResult<BoxedHandle<'_>> {
        let product: IWscProduct = unsafe { self.list.get_Item(index as u32) }
            .map_err(|e| PostureError::query_failed(self.category, QueryOp::Item, status_code(&e)))?;

        Ok(Box::new(WscHandle {
            category: self.category,
            product,
        }))
    }
}

/// A handle to one registered product. Dropping it releases the COM
/// interface before the enumeration moves on.
#[derive(Debug)]
struct WscHandle {
    category: ProtectionCategory,
    product: IWscProduct,
}

impl ProductHandle for WscHandle {
    fn name(&self) -> PostureResult<String> {
        let name: BSTR = unsafe { self.product.ProductName() }.map_err(|e| {
            PostureError::query_failed(self.category, QueryOp::ProductName, status_code(&e))
        })?;
        // The BSTR frees its broker-owned buffer when it drops at the end
        // of this call; only the owned copy escapes.
        Ok(name.to_string())
    }

    fn state(&self) -> PostureResult<u32> {
        let state = unsafe { self.product.ProductState() }.map_err(|e| {
            PostureError::query_failed(self.category, QueryOp::ProductState, status_code(&e))
        })?;
        Ok(state.0 as u32)
    }

    fn signature_status(&self) -> PostureResult<u32> {
        let status = unsafe { self.product.SignatureStatus() }.map_err(|e| {
            PostureError::query_failed(self.category, QueryOp::SignatureStatus, status_code(&e))
        })?;
        Ok(status.0 as u32)
    }
}
