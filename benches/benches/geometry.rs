// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hive_geometry::{
    CanvasSize, DEFAULT_PADDING, TrackRect, ViewportMetrics, is_offscreen_in, to_local_position,
};

fn bench_cull(c: &mut Criterion) {
    let canvas = CanvasSize::new(0.0, 0.0, 1280.0, 800.0);
    let metrics = ViewportMetrics::new(0.0, 2_500.0, 800.0);
    let rects: Vec<_> = (0..1_024)
        .map(|i| {
            let top = f64::from(i) * 40.0 - 2_500.0;
            TrackRect::from_edges(10.0, top, 400.0, top + 200.0)
        })
        .collect();

    c.bench_function("geometry/position_and_cull_1024", |b| {
        b.iter(|| {
            let mut offscreen = 0_usize;
            for rect in &rects {
                let position = to_local_position(&canvas, black_box(rect));
                if is_offscreen_in(&position, &canvas, &metrics, DEFAULT_PADDING) {
                    offscreen += 1;
                }
            }
            black_box(offscreen)
        });
    });
}

criterion_group!(benches, bench_cull);
criterion_main!(benches);
