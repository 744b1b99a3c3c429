//! Graph Builder Benchmark
//!
//! Measures builder throughput (nodes/sec) on synthetic components:
//! - wide: many provisions sharing a small pool of leaves
//! - deep: one long constructor chain
//! - diamond: layered graph where every node depends on the whole layer below

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dgc::graph::build_component;
use dgc::model::{ClassKind, DeclarationModel, Markers, ModelBuilder, TypeId};

// =============================================================================
// Synthetic Models
// =============================================================================

fn injectable(b: &mut ModelBuilder, ty: TypeId, params: &[(&str, TypeId)]) {
    let ctor = b.add_constructor(ty, params);
    b.mark(ctor, Markers::INJECT);
}

fn component(b: &mut ModelBuilder, provisions: &[TypeId]) {
    let app = b.ty("AppComponent");
    b.add_class(app, ClassKind::Interface);
    for (i, &ty) in provisions.iter().enumerate() {
        b.add_function(app, &format!("get{i}"), &[], ty);
    }
    b.add_component(app, &[], &[]);
}

/// `width` provisions, each a class depending on two of eight leaves.
fn wide_model(width: usize) -> DeclarationModel {
    let mut b = ModelBuilder::new();
    let leaves: Vec<TypeId> = (0..8)
        .map(|i| {
            let ty = b.ty(&format!("Leaf{i}"));
            injectable(&mut b, ty, &[]);
            ty
        })
        .collect();
    let services: Vec<TypeId> = (0..width)
        .map(|i| {
            let ty = b.ty(&format!("Service{i}"));
            let params = [("a", leaves[i % 8]), ("b", leaves[(i + 3) % 8])];
            injectable(&mut b, ty, &params);
            ty
        })
        .collect();
    component(&mut b, &services);
    b.finish()
}

/// One provision at the top of a `depth`-long constructor chain.
fn deep_model(depth: usize) -> DeclarationModel {
    let mut b = ModelBuilder::new();
    let mut below: Option<TypeId> = None;
    for i in 0..depth {
        let ty = b.ty(&format!("Link{i}"));
        match below {
            Some(next) => injectable(&mut b, ty, &[("next", next)]),
            None => injectable(&mut b, ty, &[]),
        }
        below = Some(ty);
    }
    component(&mut b, &below.into_iter().collect::<Vec<_>>());
    b.finish()
}

/// `layers` layers of four classes; each class needs all four of the layer
/// below. Without memoization this is exponential in `layers`.
fn diamond_model(layers: usize) -> DeclarationModel {
    let mut b = ModelBuilder::new();
    let mut below: Vec<TypeId> = Vec::new();
    for layer in 0..layers {
        let current: Vec<TypeId> = (0..4)
            .map(|i| b.ty(&format!("L{layer}N{i}")))
            .collect();
        for &ty in &current {
            let params: Vec<(&str, TypeId)> = below.iter().map(|&dep| ("dep", dep)).collect();
            injectable(&mut b, ty, &params);
        }
        below = current;
    }
    component(&mut b, &below);
    b.finish()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_shapes(c: &mut Criterion) {
    let cases = [
        ("wide", 100, wide_model(100)),
        ("wide", 1_000, wide_model(1_000)),
        ("deep", 100, deep_model(100)),
        ("deep", 400, deep_model(400)),
        ("diamond", 16, diamond_model(16)),
        ("diamond", 64, diamond_model(64)),
    ];

    let mut group = c.benchmark_group("build_component");
    for (shape, size, model) in &cases {
        let component = &model.components()[0];
        let nodes = build_component(model, component).stats.nodes as u64;
        group.throughput(Throughput::Elements(nodes));
        group.bench_with_input(BenchmarkId::new(*shape, size), model, |b, model| {
            b.iter(|| black_box(build_component(black_box(model), component)))
        });
    }
    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let model = wide_model(1_000);
    let component = &model.components()[0];
    let output = build_component(&model, component);
    c.bench_function("graph_summary_wide_1000", |b| {
        b.iter(|| black_box(dgc::graph::GraphSummary::new(black_box(&output), &model)))
    });
}

criterion_group!(benches, bench_shapes, bench_summary);
criterion_main!(benches);
