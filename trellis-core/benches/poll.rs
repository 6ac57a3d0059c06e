//! Benchmarks for the poll loop
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis_core::compile::Node;
use trellis_core::output::ArrayMedium;
use trellis_core::params::{Param, ReactiveState, StateDict};
use trellis_core::reactive::{Cached, Signal};
use trellis_core::{RenderOptions, Renderer};

fn renderer_with_atoms(count: usize) -> (Renderer<ArrayMedium<i64>>, Vec<Signal<i64>>) {
    let signals: Vec<Signal<i64>> = (0..count as i64).map(Signal::new).collect();
    let mut dict = StateDict::new();
    let mut children = Vec::with_capacity(count);
    for (i, signal) in signals.iter().enumerate() {
        let key = format!("v{i}");
        dict = dict.with(key.clone(), signal.clone());
        children.push(Node::atom(Param::dynamic(key)));
    }
    let state = ReactiveState::from_dict(dict);

    let options = RenderOptions::default().with_verify_sizes(false);
    let mut renderer = Renderer::with_options(ArrayMedium::new(-1), options);
    renderer
        .render(&Node::block(children), &state)
        .expect("render");
    (renderer, signals)
}

// =============================================================================
// CACHE BENCHMARKS
// =============================================================================

fn bench_cached_fresh(c: &mut Criterion) {
    let s = Signal::new(1i64);
    let reader = s.clone();
    let cached = Cached::new(move || reader.get() * 2);
    cached.compute();
    c.bench_function("cached_fresh", |b| b.iter(|| black_box(cached.compute())));
}

fn bench_cached_stale(c: &mut Criterion) {
    let s = Signal::new(1i64);
    let reader = s.clone();
    let cached = Cached::new(move || reader.get() * 2);
    c.bench_function("cached_stale", |b| {
        let mut i = 0;
        b.iter(|| {
            i += 1;
            s.set(i);
            black_box(cached.compute())
        })
    });
}

// =============================================================================
// POLL BENCHMARKS
// =============================================================================

fn bench_poll_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_unchanged");
    for count in [10, 100, 1000] {
        let (mut renderer, _signals) = renderer_with_atoms(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(renderer.poll().expect("poll")))
        });
    }
    group.finish();
}

fn bench_poll_one_changed(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_one_changed");
    for count in [10, 100, 1000] {
        let (mut renderer, signals) = renderer_with_atoms(count);
        let target = signals[count / 2].clone();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut i = 0;
            b.iter(|| {
                i += 1;
                target.set(i);
                black_box(renderer.poll().expect("poll"))
            })
        });
    }
    group.finish();
}

fn bench_list_rerender(c: &mut Criterion) {
    let items = Signal::new(Vec::<i64>::new());
    let state = ReactiveState::from_dict(StateDict::new().with("items", items.clone()));
    let options = RenderOptions::default().with_verify_sizes(false);
    let mut renderer = Renderer::with_options(ArrayMedium::new(-1), options);
    renderer
        .render(&Node::list(Param::dynamic("items")), &state)
        .expect("render");

    c.bench_function("list_rerender_100", |b| {
        let mut i = 0;
        b.iter(|| {
            i += 1;
            items.set((i..i + 100).collect());
            black_box(renderer.poll().expect("poll"))
        })
    });
}

criterion_group!(
    benches,
    bench_cached_fresh,
    bench_cached_stale,
    bench_poll_unchanged,
    bench_poll_one_changed,
    bench_list_rerender,
);
criterion_main!(benches);
