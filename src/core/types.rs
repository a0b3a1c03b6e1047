//! Core types used throughout the wscbridge library.
//!
//! This module defines the fundamental data structures for representing
//! protection categories, normalized product states, signature freshness,
//! and the immutable per-product record the collector emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw values reported by the Windows Security Center broker.
///
/// These mirror the platform's product-state and signature-status
/// enumerations so normalization can be exercised without the broker
/// itself. Anything outside this set is normalized by the catch-all
/// rules in [`ProductState::from_raw`] and [`SignatureStatus::from_raw`].
pub mod raw {
    /// The product reports itself as enabled.
    pub const STATE_ON: u32 = 0;
    /// The product reports itself as disabled.
    pub const STATE_OFF: u32 = 1;
    /// The product is temporarily snoozed by the user.
    pub const STATE_SNOOZED: u32 = 2;
    /// The product's license or subscription has lapsed.
    pub const STATE_EXPIRED: u32 = 3;

    /// Threat signatures are stale.
    pub const SIGNATURES_OUT_OF_DATE: u32 = 0;
    /// Threat signatures are current.
    pub const SIGNATURES_UP_TO_DATE: u32 = 1;
}

/// Maximum number of characters retained from a broker-reported product name.
///
/// Longer names are truncated on a character boundary rather than rejected;
/// the broker's buffer is untrusted and display names from third-party
/// products can be arbitrarily long.
pub const MAX_PRODUCT_NAME_CHARS: usize = 255;

/// A protection category tracked by the security-status broker.
///
/// The set is fixed: the broker partitions registered security products
/// into exactly these three categories, and the collector visits them in
/// [`ProtectionCategory::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionCategory {
    /// Antivirus products.
    AntiVirus,
    /// Anti-spyware products.
    AntiSpyware,
    /// Firewall products.
    Firewall,
}

impl ProtectionCategory {
    /// All categories, in the fixed enumeration order the collector uses.
    pub const ALL: [ProtectionCategory; 3] =
        [Self::AntiVirus, Self::AntiSpyware, Self::Firewall];

    /// Returns the display label used in output rows.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AntiVirus => "Anti-Virus",
            Self::AntiSpyware => "Anti-Spyware",
            Self::Firewall => "Firewall",
        }
    }

    /// Returns `true` if the broker reports signature freshness for this
    /// category. Firewalls carry no threat-definition data.
    pub fn reports_signatures(&self) -> bool {
        !matches!(self, Self::Firewall)
    }
}

impl fmt::Display for ProtectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized enablement state of a registered security product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductState {
    /// The product is enabled.
    On,
    /// The product is disabled.
    Off,
    /// The product is temporarily snoozed.
    Snoozed,
    /// The product is expired, or reported a state this vocabulary does
    /// not recognize.
    Expired,
}

impl ProductState {
    /// Normalizes a raw broker state value.
    ///
    /// On/Off/Snoozed map directly; every other value, including states
    /// introduced by future platform versions, falls through to
    /// [`ProductState::Expired`]. The catch-all is a forward-compatibility
    /// decision, not an error.
    pub fn from_raw(value: u32) -> Self {
        match value {
            raw::STATE_ON => Self::On,
            raw::STATE_OFF => Self::Off,
            raw::STATE_SNOOZED => Self::Snoozed,
            _ => Self::Expired,
        }
    }

    /// Returns the display label used in output rows.
    pub fn label(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::Snoozed => "Snoozed",
            Self::Expired => "Expired",
        }
    }

    /// Returns `true` if the product is actively protecting the host.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for ProductState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized signature freshness of a registered security product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    /// Threat definitions are current.
    UpToDate,
    /// Threat definitions are stale, or the broker reported a freshness
    /// value other than the up-to-date sentinel.
    OutOfDate,
    /// Signature freshness does not apply to this product's category.
    /// Fixed for every firewall row; never produced by [`Self::from_raw`].
    NotApplicable,
}

impl SignatureStatus {
    /// Normalizes a raw broker signature-status value.
    ///
    /// Only the up-to-date sentinel maps to [`SignatureStatus::UpToDate`];
    /// everything else is treated as stale.
    pub fn from_raw(value: u32) -> Self {
        if value == raw::SIGNATURES_UP_TO_DATE {
            Self::UpToDate
        } else {
            Self::OutOfDate
        }
    }

    /// Returns the display label used in output rows.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToDate => "Up-to-date",
            Self::OutOfDate => "Out-of-date",
            Self::NotApplicable => "Not Applicable",
        }
    }

    /// Returns `true` if the product's threat definitions are current.
    pub fn is_current(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized row of posture output.
///
/// A `ProductRecord` is a value, not a live view into broker state: the
/// name is an owned copy and no broker resource backs the record after the
/// enumeration step that produced it. Records are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// The category whose session produced this record.
    pub category: ProtectionCategory,

    /// Product display name, truncated to [`MAX_PRODUCT_NAME_CHARS`].
    pub name: String,

    /// Normalized enablement state.
    pub state: ProductState,

    /// Normalized signature freshness. Always
    /// [`SignatureStatus::NotApplicable`] for firewall records.
    pub signature: SignatureStatus,
}

impl ProductRecord {
    /// Creates a new record, bounding the product name.
    pub fn new(
        category: ProtectionCategory,
        name: impl Into<String>,
        state: ProductState,
        signature: SignatureStatus,
    ) -> Self {
        Self {
            category,
            name: truncate_name(name.into()),
            state,
            signature,
        }
    }
}

/// Truncates a product name to [`MAX_PRODUCT_NAME_CHARS`] characters.
///
/// Truncation happens on a character boundary, so multi-byte names can
/// never be split mid-character.
fn truncate_name(mut name: String) -> String {
    if let Some((idx, _)) = name.char_indices().nth(MAX_PRODUCT_NAME_CHARS) {
        name.truncate(idx);
    }
    name
}
