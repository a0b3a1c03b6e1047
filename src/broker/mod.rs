//! Security-status broker backends.
//!
//! This module contains implementations of the [`crate::SecurityCenter`]
//! trait:
//!
//! - [`mock`] - A configurable fixture broker for testing
//! - [`wsc`] - The Windows Security Center (Windows targets only)
//!
//! ## Implementing a custom backend
//!
//! A backend implements three traits: [`crate::SecurityCenter`] opens
//! category-scoped sessions, [`crate::ProviderSession`] exposes the
//! count-then-index product enumeration, and [`crate::ProductHandle`]
//! reads one product's fields. Sessions and handles release their broker
//! resources on `Drop`, including after a partial enumeration.
//!
//! ```rust,ignore
//! use wscbridge::{PostureResult, ProtectionCategory, SecurityCenter};
//! use wscbridge::core::BoxedSession;
//!
//! #[derive(Debug)]
//! pub struct MyBroker { /* connection state */ }
//!
//! impl SecurityCenter for MyBroker {
//!     fn name(&self) -> &str {
//!         "my-broker"
//!     }
//!
//!     fn open(&self, category: ProtectionCategory) -> PostureResult<BoxedSession<'_>> {
//!         // Acquire a category-scoped session
//!         todo!()
//!     }
//! }
//! ```

pub mod mock;

#[cfg(windows)]
pub mod wsc;

// Re-exports
pub use mock::{MockProduct, MockSecurityCenter};

#[cfg(windows)]
pub use wsc::WscSecurityCenter;

/// Performs one-time process environment setup for the platform broker.
///
/// The Windows Security Center requires a COM apartment on the calling
/// thread. This sets one up once per process; further calls are no-ops, so
/// hosts can call it unconditionally before collecting. On non-Windows
/// targets it does nothing.
#[cfg(windows)]
#[allow(unsafe_code)]
pub fn initialize() {
    use std::sync::Once;
    use windows::Win32::System::Com::{CoInitializeEx, COINIT_APARTMENTTHREADED};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // A failure here (for example the host already initialized a
        // different apartment model) is surfaced later as a session-open
        // error; there is nothing useful to do with it at setup time.
        let _ = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
    });
}

/// Performs one-time process environment setup for the platform broker.
///
/// No-op on non-Windows targets; present so hosts can call it
/// unconditionally.
#[cfg(not(windows))]
pub fn initialize() {}
