// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::FRAC_PI_2;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::DVec3;
use kurbo::Size;
use sightline_volume::{Camera, Cylinder, Extent, Frustum, OrientedBox};

mod common;
use common::Rng;

/// A skewed, rotated blob of `count` points around `center`.
fn gen_cloud(rng: &mut Rng, count: usize, center: DVec3) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let a = rng.next_in(-4.0, 4.0);
        let b = rng.next_in(-1.5, 1.5);
        let c = rng.next_in(-0.5, 0.5);
        out.push(center + DVec3::new(a + 0.3 * b, b - 0.2 * a, c + 0.1 * a));
    }
    out
}

/// Boxes scattered through a slab in front of and around a camera at the origin.
fn gen_scene_boxes(count: usize) -> Vec<OrientedBox> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let center = DVec3::new(
                rng.next_in(-200.0, 200.0),
                rng.next_in(-50.0, 50.0),
                rng.next_in(-300.0, 50.0),
            );
            OrientedBox::from_points(&gen_cloud(&mut rng, 16, center))
        })
        .collect()
}

fn camera() -> Camera {
    Camera::new(
        DVec3::new(0.0, 5.0, 0.0),
        DVec3::new(0.0, 0.0, -50.0),
        DVec3::Y,
        FRAC_PI_2,
        Size::new(1280.0, 720.0),
        0.5,
        250.0,
    )
    .expect("valid camera")
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    for &n in &[8usize, 64, 512, 4096] {
        let points = gen_cloud(&mut rng, n, DVec3::new(10.0, -3.0, 7.0));
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("box_from_points_n{}", n), |b| {
            b.iter(|| black_box(OrientedBox::from_points(black_box(&points))))
        });
        group.bench_function(format!("cylinder_from_points_n{}", n), |b| {
            b.iter(|| black_box(Cylinder::from_points(black_box(&points))))
        });
    }

    let boxes = gen_scene_boxes(64);
    group.bench_function("union_64_boxes", |b| {
        b.iter_batched(
            || boxes.iter().map(Some).collect::<Vec<_>>(),
            |items| black_box(OrientedBox::union(items)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_culling(c: &mut Criterion) {
    let mut group = c.benchmark_group("culling");
    let cam = camera();
    let frustum: Frustum = *cam.frustum_in_model_coordinates();
    for &n in &[256usize, 4096] {
        let boxes = gen_scene_boxes(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("box_intersects_frustum_n{}", n), |b| {
            b.iter(|| {
                let visible = boxes
                    .iter()
                    .filter(|obb| obb.intersects_frustum(&frustum))
                    .count();
                black_box(visible);
            })
        });
        group.bench_function(format!("sphere_contains_n{}", n), |b| {
            b.iter(|| {
                let inside = boxes
                    .iter()
                    .filter(|obb| frustum.contains(*obb))
                    .count();
                black_box(inside);
            })
        });

        let cylinders: Vec<Cylinder> = boxes
            .iter()
            .filter_map(|obb| Cylinder::new(obb.bottom_center(), obb.top_center(), 1.0).ok())
            .collect();
        group.bench_function(format!("cylinder_intersects_frustum_n{}", n), |b| {
            b.iter(|| {
                let visible = cylinders
                    .iter()
                    .filter(|cyl| cyl.intersects_frustum(&frustum))
                    .count();
                black_box(visible);
            })
        });
    }
    group.finish();
}

fn bench_projected_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("projected_area");
    let cam = camera();
    let boxes = gen_scene_boxes(1024);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("box_silhouette_n1024", |b| {
        b.iter(|| {
            let total: f64 = boxes
                .iter()
                .map(|obb| obb.projected_area(&cam).as_f64())
                .filter(|a| a.is_finite())
                .sum();
            black_box(total);
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_culling,
    bench_projected_area,
);
criterion_main!(benches);
