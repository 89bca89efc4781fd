// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for carousel navigation operations.
//!
//! Measures the performance of:
//! - Page document parsing (payload -> item list)
//! - Wraparound index arithmetic
//! - Stable-height recomputation in the sizing engine

use criterion::{criterion_group, criterion_main, Criterion};
use iced_gallery::media::NaturalSize;
use iced_gallery::page::GalleryPage;
use iced_gallery::ui::carousel::{sizing, wrap_index};
use std::hint::black_box;

fn sample_page(items: usize) -> String {
    let payload: Vec<String> = (0..items)
        .map(|i| {
            format!(
                r#"{{ "variants": {{ "480": "img/{i}-480.jpg", "full": "img/{i}.jpg" }}, "alt": "slide {i}" }}"#
            )
        })
        .collect();
    format!(
        r#"{{ "carousels": [ {{ "id": "bench", "payload": [ {} ] }} ] }}"#,
        payload.join(", ")
    )
}

/// Benchmark page document parsing.
fn bench_parse_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_navigation");

    let raw = sample_page(32);
    group.bench_function("parse_page_32_items", |b| {
        b.iter(|| {
            let page = GalleryPage::from_json(black_box(&raw)).unwrap();
            black_box(&page);
        });
    });

    group.finish();
}

/// Benchmark the wraparound index arithmetic.
fn bench_wrap_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_navigation");

    group.bench_function("wrap_index", |b| {
        b.iter(|| {
            for i in -100i64..100 {
                black_box(wrap_index(black_box(i), 7));
            }
        });
    });

    group.finish();
}

/// Benchmark stable-height recomputation from cached natural sizes.
fn bench_sizing_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_navigation");

    let mut engine = sizing::Engine::new(32);
    for i in 0..32 {
        engine.record_probe(
            i,
            Some(NaturalSize {
                width: 800 + (i as u32 % 5) * 100,
                height: 400 + (i as u32 % 7) * 60,
            }),
        );
    }

    group.bench_function("recompute_32_items", |b| {
        b.iter(|| {
            engine.recompute(black_box(960.0));
            black_box(engine.stable_height());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_page,
    bench_wrap_index,
    bench_sizing_recompute
);
criterion_main!(benches);
