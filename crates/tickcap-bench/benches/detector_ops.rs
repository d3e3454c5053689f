//! Criterion micro-benchmarks for event detection.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tickcap_bench::lobby_session;
use tickcap_detect::{detect_events, EventDetector};
use tickcap_test_utils::scripted_match;

/// Benchmark: Steady-state detection on an unchanged full lobby.
fn bench_detect_idle_lobby(c: &mut Criterion) {
    let session = lobby_session();
    let mut detector = EventDetector::new();
    let mut events = Vec::with_capacity(64);
    detector.add_frame_into(&session, &mut events);

    c.bench_function("detect_idle_lobby", |b| {
        b.iter(|| {
            events.clear();
            detector.add_frame_into(black_box(&session), &mut events);
            black_box(&events);
        });
    });
}

/// Benchmark: Stateless diff of two lobby snapshots with a stat change.
fn bench_detect_stat_change(c: &mut Criterion) {
    let prev = lobby_session();
    let mut curr = prev.clone();
    curr.teams[1].players[2].stats.stuns += 1;

    c.bench_function("detect_stat_change", |b| {
        b.iter(|| {
            let events = detect_events(Some(black_box(&prev)), black_box(&curr));
            black_box(events);
        });
    });
}

/// Benchmark: Run the detector across a 1000-tick scripted match.
fn bench_detect_scripted_match(c: &mut Criterion) {
    let sessions = scripted_match(1000);
    let mut events = Vec::with_capacity(64);

    c.bench_function("detect_scripted_match_1000", |b| {
        b.iter(|| {
            let mut detector = EventDetector::new();
            let mut total = 0usize;
            for session in &sessions {
                events.clear();
                detector.add_frame_into(session, &mut events);
                total += events.len();
            }
            black_box(total);
        });
    });
}

criterion_group!(
    benches,
    bench_detect_idle_lobby,
    bench_detect_stat_change,
    bench_detect_scripted_match
);
criterion_main!(benches);
