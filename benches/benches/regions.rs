// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hive_geometry::{CanvasSize, TrackRect, ViewportMetrics};
use hive_sync::{
    HeadlessSurface, Hive, HiveConfig, HiveError, LayoutHost, Listener, RegionContent,
    RegionOptions, SignalSource, TrackedNode,
};

#[derive(Clone, Debug, PartialEq)]
struct StaticNode {
    rect: TrackRect,
    scroll_y: f64,
}

impl TrackedNode for StaticNode {
    fn bounding_rect(&self) -> Option<TrackRect> {
        Some(self.rect)
    }

    fn viewport(&self) -> ViewportMetrics {
        ViewportMetrics::new(0.0, self.scroll_y, 800.0)
    }
}

/// Accepts every subscription and never notifies.
struct NullHost;

impl LayoutHost for NullHost {
    type Node = StaticNode;
    type Subscription = ();

    fn subscribe(&mut self, _: &StaticNode, _: SignalSource, _: Listener) -> Result<(), HiveError> {
        Ok(())
    }
}

const CANVAS: CanvasSize = CanvasSize::new(0.0, 0.0, 1280.0, 800.0);

/// A long page of stacked regions, scrolled to `scroll_y`.
fn page(regions: usize, scroll_y: f64) -> Hive<NullHost, usize> {
    let mut hive = Hive::new(NullHost, CANVAS, HiveConfig::default());
    for i in 0..regions {
        let doc_top = i as f64 * 300.0;
        let rect = TrackRect::from_edges(40.0, doc_top - scroll_y, 640.0, doc_top + 240.0 - scroll_y);
        let options = RegionOptions {
            render_priority: (i % 4) as i32,
            ..RegionOptions::default()
        };
        hive.register_region(StaticNode { rect, scroll_y }, RegionContent::Subscene(i), options)
            .unwrap();
    }
    hive
}

fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("hive/render_frame");

    // Most regions of a long page are culled; the cost should track the
    // number of regions, not the number drawn.
    for regions in [16usize, 128, 1_024] {
        group.throughput(Throughput::Elements(regions as u64));
        let mut hive = page(regions, 3_000.0);
        let mut surface = HeadlessSurface::new(CANVAS);

        group.bench_function(BenchmarkId::new("scrolled", regions), |b| {
            b.iter(|| {
                surface.reset_records();
                black_box(hive.render_frame(&mut surface));
            });
        });
    }

    group.finish();
}

fn bench_register_unregister(c: &mut Criterion) {
    let mut group = c.benchmark_group("hive/registry");

    for regions in [128usize, 1_024] {
        group.throughput(Throughput::Elements(regions as u64));
        group.bench_function(BenchmarkId::new("churn", regions), |b| {
            b.iter(|| {
                let mut hive = page(regions, 0.0);
                let ids: Vec<_> = hive.regions().ids().collect();
                for id in ids {
                    black_box(hive.unregister_region(id).unwrap());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_frame, bench_register_unregister);
criterion_main!(benches);
