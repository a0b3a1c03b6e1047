//! Core types and traits for the wscbridge library.
//!
//! This module provides the fundamental building blocks used throughout
//! the library:
//!
//! - [`types`] - Protection categories, normalized states, product records
//! - [`traits`] - The broker session seam and product sequence
//! - [`error`] - Structured error types
//! - [`report`] - The collection report returned to callers

pub mod error;
pub mod report;
pub mod traits;
pub mod types;

// Re-export commonly used types at the core level
pub use error::{PostureError, PostureResult, QueryOp, STATUS_FAILED};
pub use report::PostureReport;
pub use traits::{products, BoxedHandle, BoxedSession, ProductHandle, Products, ProviderSession, SecurityCenter};
pub use types::{
    ProductRecord, ProductState, ProtectionCategory, SignatureStatus, MAX_PRODUCT_NAME_CHARS,
};
