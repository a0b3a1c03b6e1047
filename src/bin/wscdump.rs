//! Dumps the host's endpoint-protection posture as a table.
//!
//! On Windows this queries the platform security-status broker. Elsewhere
//! it runs against a small mock inventory so the output format can be
//! inspected on any development machine.
//!
//! Logging is controlled through `RUST_LOG`; audit events are emitted
//! under the `wscbridge::audit` target.

use tracing_subscriber::EnvFilter;

use wscbridge::table::{rows_from_report, SCHEMA, TABLE_NAME};
use wscbridge::{PostureCollector, PostureReport};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    wscbridge::broker::initialize();

    let report = collect();
    print_table(&report);

    if !report.is_complete() {
        // The table above holds only the categories that completed.
        eprintln!("collection incomplete: {}", report.error.as_ref().map(|e| e.to_string()).unwrap_or_default());
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn collect() -> PostureReport {
    let broker = wscbridge::broker::WscSecurityCenter::new();
    PostureCollector::new(broker).collect()
}

#[cfg(not(windows))]
fn collect() -> PostureReport {
    use wscbridge::broker::{MockProduct, MockSecurityCenter};
    use wscbridge::ProtectionCategory;

    let broker = MockSecurityCenter::new()
        .with_product(ProtectionCategory::AntiVirus, MockProduct::new("Defender"))
        .with_product(
            ProtectionCategory::AntiVirus,
            MockProduct::new("Acme AV").off().out_of_date(),
        )
        .with_product(
            ProtectionCategory::Firewall,
            MockProduct::new("Win Firewall").snoozed(),
        );

    PostureCollector::new(broker).collect()
}

fn print_table(report: &PostureReport) {
    let rows = rows_from_report(report);

    println!("{TABLE_NAME} ({} rows)", rows.len());
    println!(
        "{:<14} {:<40} {:<10} {}",
        SCHEMA[0].name, SCHEMA[1].name, SCHEMA[2].name, SCHEMA[3].name
    );

    for row in &rows {
        println!(
            "{:<14} {:<40} {:<10} {}",
            row.product_type, row.product_name, row.product_state, row.product_signatures
        );
    }
}
