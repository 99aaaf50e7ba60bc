use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_aml_surveillance::{
    PatternDetector, RiskScorer, SurveillanceEngine, Transaction, TransactionType,
};

const COUNTRIES: [&str; 8] = ["MY", "SG", "KY", "CH", "PA", "VG", "HK", "US"];
const TYPES: [TransactionType; 5] = [
    TransactionType::WireTransfer,
    TransactionType::CashDeposit,
    TransactionType::CryptoExchange,
    TransactionType::TradeFinance,
    TransactionType::Remittance,
];

fn create_batch(n: usize) -> Vec<Transaction> {
    let now = Utc::now();
    (0..n)
        .map(|i| {
            let amount = match i % 4 {
                0 => 9_000.0 + (i % 1_000) as f64,
                1 => 250_000.0 * (i % 30) as f64,
                _ => 1_000.0 * (i % 500) as f64,
            };
            Transaction::new(
                &format!("txn_{:06}", i),
                TYPES[i % TYPES.len()],
                amount,
                "BND",
                now - Duration::minutes(i as i64),
            )
            .from_party(&format!("ACC_{:04}", i % 97), "BN")
            .to_party(&format!("ACC_{:04}", i % 89), COUNTRIES[i % COUNTRIES.len()])
            .front_business(i % 6 == 0)
            .with_home_country("BN")
        })
        .collect()
}

fn bench_score_transaction(c: &mut Criterion) {
    let scorer = RiskScorer::new();
    let txn = create_batch(1).remove(0);

    c.bench_function("score_transaction", |b| {
        b.iter(|| scorer.score(black_box(&txn)))
    });
}

fn bench_score_batch(c: &mut Criterion) {
    let scorer = RiskScorer::new();
    let batch = create_batch(10_000);

    c.bench_function("score_batch_10k", |b| {
        b.iter(|| scorer.score_batch(black_box(batch.clone())))
    });
}

fn bench_detect_patterns(c: &mut Criterion) {
    let detector = PatternDetector::new();
    let batch = create_batch(10_000);
    let now = Utc::now();

    c.bench_function("detect_patterns_10k", |b| {
        b.iter(|| detector.detect(black_box(&batch), now))
    });
}

fn bench_full_cycle(c: &mut Criterion) {
    let engine = SurveillanceEngine::new();
    let batch = create_batch(150);
    let now = Utc::now();

    c.bench_function("run_cycle_150", |b| {
        b.iter(|| engine.run_cycle(black_box(batch.clone()), &[], now))
    });
}

criterion_group!(
    benches,
    bench_score_transaction,
    bench_score_batch,
    bench_detect_patterns,
    bench_full_cycle
);
criterion_main!(benches);
