//! Feedback Store Benchmarks — Submission Hot Path
//!
//! Validation cost and the full load-append-store cycle against logs
//! of different sizes. Every append rewrites the whole document, so
//! write latency grows with the log.
//!
//! Run with: cargo bench --bench store_bench

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use feedback_store::adapters::persistence::JsonFileStore;
use feedback_store::config::CorruptLogPolicy;
use feedback_store::domain::feedback::now;
use feedback_store::domain::{FeedbackRecord, Rating, RuleSet, Submission};
use feedback_store::ports::FeedbackRepository;

fn record(i: usize) -> FeedbackRecord {
    FeedbackRecord {
        name: format!("user-{i}"),
        rating: Rating::new("5"),
        comments: "Sturdy frame, comfortable cushions.".to_string(),
        submitted_at: now(),
    }
}

/// Benchmark rule evaluation for a valid submission.
fn bench_validate(c: &mut Criterion) {
    let rules = RuleSet::new(10);
    let submission = Submission::new("Alice", "5", Some("Great chair, would buy again"));

    c.bench_function("validate_submission", |b| {
        b.iter(|| {
            let _ok = rules.validate(black_box(&submission));
        });
    });
}

/// Benchmark one append against a pre-filled log.
fn bench_append(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("json_store_append");

    for prefill in [0usize, 100, 1_000] {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let seed: Vec<_> = (0..prefill).map(record).collect();
        std::fs::write(&path, serde_json::to_vec_pretty(&seed).unwrap()).unwrap();

        let store = JsonFileStore::new(&path, CorruptLogPolicy::Reject, Duration::from_secs(30));

        group.bench_with_input(BenchmarkId::from_parameter(prefill), &prefill, |b, _| {
            b.to_async(&runtime).iter(|| async {
                store.append(record(0)).await.unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_append);
criterion_main!(benches);
