//! Tabular presentation of posture reports.
//!
//! This module renders a [`PostureReport`] into the fixed four-column
//! layout fleet consoles consume: one row per registered product, every
//! cell a display string from the normalized vocabularies. The layout is
//! part of the crate's compatibility surface; downstream queries match on
//! the exact column names and cell spellings.

use crate::core::{PostureReport, ProductRecord, SecurityCenter};
use crate::PostureCollector;

use serde::{Deserialize, Serialize};

/// The table name downstream consumers query.
pub const TABLE_NAME: &str = "win_epp_table";

/// A column in the posture table. All columns are text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Column name as queried.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// The table schema, in column order.
pub const SCHEMA: [ColumnDef; 4] = [
    ColumnDef {
        name: "product_type",
        description: "Protection category of the product",
    },
    ColumnDef {
        name: "product_name",
        description: "Display name reported by the product",
    },
    ColumnDef {
        name: "product_state",
        description: "Normalized enablement state",
    },
    ColumnDef {
        name: "product_signatures",
        description: "Normalized signature freshness",
    },
];

/// One row of the posture table.
///
/// Cells hold the display vocabularies, not the raw broker values:
/// `product_type` is one of `Anti-Virus`, `Anti-Spyware`, `Firewall`;
/// `product_state` is one of `On`, `Off`, `Snoozed`, `Expired`;
/// `product_signatures` is one of `Up-to-date`, `Out-of-date`,
/// `Not Applicable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Protection category label.
    pub product_type: String,
    /// Product display name, truncated to the broker name cap.
    pub product_name: String,
    /// Enablement state label.
    pub product_state: String,
    /// Signature freshness label.
    pub product_signatures: String,
}

impl From<&ProductRecord> for TableRow {
    fn from(record: &ProductRecord) -> Self {
        Self {
            product_type: record.category.label().to_string(),
            product_name: record.name.clone(),
            product_state: record.state.label().to_string(),
            product_signatures: record.signature.label().to_string(),
        }
    }
}

/// Renders a report's records into table rows, preserving record order.
pub fn rows_from_report(report: &PostureReport) -> Vec<TableRow> {
    report.records.iter().map(TableRow::from).collect()
}

/// The posture table over a broker backend.
///
/// Wraps a [`PostureCollector`] and renders each collection as rows. An
/// aborted collection still yields the rows from the categories that
/// completed; callers needing to distinguish a short table from a short
/// inventory should collect a [`PostureReport`] directly and check
/// [`PostureReport::is_complete`].
///
/// # Examples
///
/// ```rust
/// use wscbridge::broker::mock::{MockProduct, MockSecurityCenter};
/// use wscbridge::table::PostureTable;
/// use wscbridge::ProtectionCategory;
///
/// let broker = MockSecurityCenter::new()
///     .with_product(ProtectionCategory::Firewall, MockProduct::new("Win Firewall"));
///
/// let rows = PostureTable::new(&broker).generate();
/// assert_eq!(rows[0].product_type, "Firewall");
/// assert_eq!(rows[0].product_signatures, "Not Applicable");
/// ```
#[derive(Debug)]
pub struct PostureTable<B> {
    collector: PostureCollector<B>,
}

impl<B: SecurityCenter> PostureTable<B> {
    /// Creates a table over a broker backend.
    pub fn new(broker: B) -> Self {
        Self {
            collector: PostureCollector::new(broker),
        }
    }

    /// Runs one collection and renders the gathered rows.
    pub fn generate(&self) -> Vec<TableRow> {
        rows_from_report(&self.collector.collect())
    }
}
