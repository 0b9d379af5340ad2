#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Formatter benchmarks.
//!
//! Measures end-to-end formatting across input sizes and shapes: short
//! statements that take the single-line fast path, and long expressions
//! that exercise the layout search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crease_fmt::{format_source, FormatStyle};

/// N short declarations that all fit on one line.
fn generate_statements(n: usize) -> String {
    (0..n)
        .map(|i| format!("int value{i} = compute{i}(a{i}, b{i}) + {i};"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// N functions with bodies, exercising block nesting.
fn generate_functions(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "void handler{i}(int request) {{\nint status = check{i}(request);\nif (status) {{\ndispatch{i}(request, status);\n}}\n}}"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// N expressions long enough to force the layout search.
fn generate_long_expressions(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "result{i} = alpha{i} + bravo{i} + charlie{i} + delta{i} + echo{i} + foxtrot{i} + golf{i} + hotel{i};"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_fast_path(c: &mut Criterion) {
    let style = FormatStyle::llvm();
    let mut group = c.benchmark_group("fast_path");
    for n in [10, 100, 1000] {
        let source = generate_statements(n);
        group.bench_with_input(BenchmarkId::new("statements", n), &source, |b, s| {
            b.iter(|| format_source(&style, black_box(s)));
        });
    }
    group.finish();
}

fn bench_blocks(c: &mut Criterion) {
    let style = FormatStyle::llvm();
    let mut group = c.benchmark_group("blocks");
    for n in [10, 100] {
        let source = generate_functions(n);
        group.bench_with_input(BenchmarkId::new("functions", n), &source, |b, s| {
            b.iter(|| format_source(&style, black_box(s)));
        });
    }
    group.finish();
}

fn bench_layout_search(c: &mut Criterion) {
    let style = FormatStyle::llvm();
    let mut group = c.benchmark_group("layout_search");
    for n in [10, 100] {
        let source = generate_long_expressions(n);
        group.bench_with_input(BenchmarkId::new("long_expressions", n), &source, |b, s| {
            b.iter(|| format_source(&style, black_box(s)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fast_path, bench_blocks, bench_layout_search);
criterion_main!(benches);
