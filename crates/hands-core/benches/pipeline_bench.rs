//! Criterion benchmarks for the per-frame signal pipeline.
//!
//! A tracker front end pushes 30-60 frames per second with up to two hands
//! each, so one [`SignalChain::process`] plus latch step has to stay well
//! inside a millisecond.
//!
//! Run with:
//! ```bash
//! cargo bench --package hands-core --bench pipeline_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hands_core::{
    reduce, FrameScheduler, Hand, HandObservation, LastSentState, Landmark, SignalChain,
    SpreadRange, HAND_LANDMARK_COUNT,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_hand(hand: Hand, offset: f64) -> HandObservation {
    let landmarks = (0..HAND_LANDMARK_COUNT)
        .map(|i| {
            let t = i as f64 / HAND_LANDMARK_COUNT as f64;
            Landmark::new(0.3 + offset + 0.2 * t, 0.7 - 0.4 * t, -0.01 * t)
        })
        .collect();
    HandObservation::new(hand, 0.97, landmarks)
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_reduce(c: &mut Criterion) {
    let obs = make_hand(Hand::Left, 0.0);
    c.bench_function("reduce_one_hand", |b| b.iter(|| reduce(black_box(&obs))));
}

fn bench_process_window_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_chain_process");
    let obs = make_hand(Hand::Right, 0.05);

    for window in [1usize, 10, 50, 200] {
        let chain = SignalChain::new(window, SpreadRange::default());
        group.bench_with_input(BenchmarkId::new("window", window), &window, |b, _| {
            b.iter(|| chain.process(black_box(&obs)))
        });
    }

    group.finish();
}

fn bench_process_and_latch(c: &mut Criterion) {
    let chain = SignalChain::default();
    let latch = LastSentState::new();
    let hands = [make_hand(Hand::Left, 0.0), make_hand(Hand::Right, 0.1)];

    c.bench_function("two_hands_process_and_latch", |b| {
        b.iter(|| {
            for obs in &hands {
                if let Ok(control) = chain.process(black_box(obs)) {
                    let mut guard = latch.lock();
                    for (channel, value) in control.channel_values() {
                        black_box(guard.record(channel, value));
                    }
                }
            }
        })
    });
}

fn bench_scheduler(c: &mut Criterion) {
    let scheduler = FrameScheduler::default();
    c.bench_function("scheduler_should_process", |b| {
        b.iter(|| black_box(scheduler.should_process()))
    });
}

criterion_group!(
    benches,
    bench_reduce,
    bench_process_window_sizes,
    bench_process_and_latch,
    bench_scheduler,
);
criterion_main!(benches);
