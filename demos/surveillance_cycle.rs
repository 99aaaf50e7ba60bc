//! Surveillance cycle example
//!
//! Runs one scoring and pattern-detection cycle over a small hand-written
//! batch of outbound transfers and prints the resulting report.
//!
//! Run with: RUST_LOG=rust_aml_surveillance=debug cargo run --example surveillance_cycle

use chrono::{Duration, Utc};
use rust_aml_surveillance::{
    pseudonymize, Alert, AlertSeverity, AlertStatus, AlertType, SurveillanceEngine, Transaction,
    TransactionType,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rust_aml_surveillance=info")),
        )
        .init();

    println!("=== AML Transaction Surveillance ===\n");

    let engine = SurveillanceEngine::new();
    let now = Utc::now();

    let outbound = |i: usize, kind, amount, to_country: &str, minutes_ago: i64| {
        let account = format!("ACC_{:06}", i % 4);
        Transaction::new(
            &format!("txn_{:06}", i),
            kind,
            amount,
            "BND",
            now - Duration::minutes(minutes_ago),
        )
        .from_party(&account, "BN")
        .to_party(&format!("ACC_BEN{:03}", i), to_country)
        .with_pseudo_id(&pseudonymize(&account, "demo-cycle"))
    };

    let batch = vec![
        outbound(0, TransactionType::WireTransfer, 9_450.0, "SG", 5),
        outbound(1, TransactionType::WireTransfer, 9_820.0, "MY", 40),
        outbound(2, TransactionType::Remittance, 9_120.0, "ID", 95),
        outbound(3, TransactionType::CashDeposit, 9_990.0, "TH", 130),
        outbound(4, TransactionType::CryptoExchange, 6_200_000.0, "KY", 200).front_business(true),
        outbound(5, TransactionType::TradeFinance, 1_750_000.0, "CH", 320),
        outbound(6, TransactionType::CashDeposit, 85_000.0, "PA", 610),
        outbound(7, TransactionType::Remittance, 2_300.0, "JP", 900),
        outbound(8, TransactionType::WireTransfer, 430_000.0, "VG", 2_000),
        outbound(9, TransactionType::WireTransfer, -25.0, "HK", 10),
    ];

    let alerts = vec![
        Alert::new(
            "txn_000004",
            AlertType::Aml,
            AlertSeverity::Critical,
            "Rapid fund movement through layered offshore accounts",
            now - Duration::hours(2),
        ),
        Alert::new(
            "txn_000000",
            AlertType::Structuring,
            AlertSeverity::High,
            "Multiple outbound transactions below the reporting threshold",
            now - Duration::hours(1),
        )
        .with_status(AlertStatus::Investigating)
        .assigned_to("analyst_03"),
    ];

    let report = engine.run_cycle(batch, &alerts, now);

    println!("Monitored transactions: {}", report.stats.total_transactions);
    println!("Suspicious (score > 70): {}", report.stats.suspicious_transactions);
    println!("Active alerts:           {}", report.stats.active_alerts);
    println!("Cross-border flows:      {}", report.stats.overseas_transactions);
    println!("Front businesses:        {}", report.stats.front_business_transactions);
    println!("Average risk:            {:.1}", report.stats.average_risk_score);
    println!();

    println!("Highest risk:");
    for t in report.top_risk(5) {
        println!(
            "  {} {:>14.2} {} {} -> {}  {:>5.1} {:<8} {:?}",
            t.pseudo_id,
            t.amount,
            t.currency,
            t.from_country,
            t.to_country,
            t.risk_score,
            t.risk_level,
            t.flags
        );
    }
    println!();

    println!("Patterns:");
    if report.has_patterns() {
        for pattern in &report.patterns {
            println!("  - {}", pattern);
        }
    } else {
        println!("  none");
    }
    println!();

    println!("Corridors:");
    for corridor in &report.corridors {
        println!(
            "  {}  count {}  avg risk {:.1}  high risk {:.0}%",
            corridor.route,
            corridor.count,
            corridor.average_risk,
            corridor.high_risk_share() * 100.0
        );
    }
    println!();

    println!("Jurisdictions:");
    for exposure in &report.jurisdictions {
        println!(
            "  {} {:<24} count {}  avg risk {:.1}{}",
            exposure.country,
            exposure.country_name.as_deref().unwrap_or("-"),
            exposure.transaction_count,
            exposure.average_risk,
            if exposure.is_high_risk { "  [monitored]" } else { "" }
        );
    }
    println!();

    for rejected in &report.rejected {
        println!("Rejected {}: {}", rejected.transaction.id, rejected.reason);
    }
}
