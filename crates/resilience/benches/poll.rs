//! Benchmarks for the poll loop
//!
//! Measures loop overhead with zero waits, so the numbers reflect
//! bookkeeping, predicate evaluation and hook dispatch rather than sleeping.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rye_resilience::{Backoff, LoggingHook, PollConfig, Poller, TerminalStates, WaitStrategy};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

fn poll_until_terminal(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll/until_terminal");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let terminal = TerminalStates::new("state", ["completed", "failed"]);

    for &attempts in &[1_u32, 5, 20] {
        group.bench_with_input(BenchmarkId::new("json", attempts), &attempts, |b, &attempts| {
            let poller = Poller::new(PollConfig::fixed(attempts, Duration::ZERO)).unwrap();

            b.to_async(&rt).iter(|| {
                let calls = AtomicU32::new(0);
                let poller = &poller;
                let terminal = &terminal;
                async move {
                    let result = poller
                        .run(
                            || {
                                let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
                                let state = if n == attempts { "completed" } else { "pending" };
                                async move { Ok::<_, std::io::Error>(json!({ "state": state })) }
                            },
                            terminal,
                        )
                        .await;
                    black_box(result)
                }
            });
        });
    }

    group.finish();
}

fn poll_with_hooks(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let poller = Poller::new(PollConfig::fixed(10, Duration::ZERO))
        .unwrap()
        .with_hook(Arc::new(LoggingHook::default()));

    c.bench_function("poll/logging_hook", |b| {
        b.to_async(&rt).iter(|| async {
            let result = poller
                .run(|| async { Ok::<_, std::io::Error>(0_u32) }, &|_: &u32| false)
                .await;
            black_box(result)
        });
    });
}

fn backoff_schedule(c: &mut Criterion) {
    let strategy = WaitStrategy::exponential(Duration::from_secs(5), Duration::from_secs(60));

    c.bench_function("backoff/exponential_20", |b| {
        b.iter(|| black_box(Backoff::new(black_box(strategy)).take(20).sum::<Duration>()));
    });
}

criterion_group!(benches, poll_until_terminal, poll_with_hooks, backoff_schedule);
criterion_main!(benches);
