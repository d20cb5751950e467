//! # Transaction Sender Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | Keyed lock registry | uncontended acquire/release, first use of a new key |
//! | Submit path | submit + resolve against the in-process node double |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::future::join_all;
use std::time::Duration;
use tokio::runtime::Runtime;

use tx_sender::{AccountRef, KeyedLockRegistry, SenderConfig, TransactionSenderApi};
use tx_tests::harness::{remark, Harness};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

// ============================================================================
// Keyed lock registry
// ============================================================================

fn bench_lock_registry(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("key-lock-registry");
    group.measurement_time(Duration::from_secs(5));

    let registry = KeyedLockRegistry::new();
    group.bench_function("acquire_release_existing_key", |b| {
        b.iter(|| {
            rt.block_on(async {
                let guard = registry.acquire(black_box("alice")).await;
                black_box(guard.key().len())
            })
        })
    });

    group.bench_function("acquire_fresh_key", |b| {
        let registry = KeyedLockRegistry::new();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let key = format!("account-{}", n);
            rt.block_on(async { black_box(registry.acquire(&key).await.key().len()) })
        })
    });

    group.finish();
}

// ============================================================================
// Submit path
// ============================================================================

fn bench_submit_and_resolve(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("submit");
    group.measurement_time(Duration::from_secs(10));

    for batch in [1usize, 16, 64] {
        let harness = Harness::new();
        let alice = AccountRef::from(&harness.account("//Alice"));
        let sender = harness.sender(SenderConfig::labelled("bench"));

        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(
            BenchmarkId::new("same_account_batch", batch),
            &batch,
            |b, &batch| {
                b.iter(|| {
                    rt.block_on(async {
                        let submissions =
                            join_all((0..batch).map(|i| sender.submit(&alice, remark(i as u8))))
                                .await;
                        for submission in submissions {
                            let receipt = submission.expect("submit").await.expect("resolve");
                            black_box(receipt.nonce);
                        }
                    })
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_lock_registry, bench_submit_and_resolve);
criterion_main!(benches);
