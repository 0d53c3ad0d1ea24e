// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{DMat3, DMat4, DVec3};
use sightline_math::{JacobiSolver, Strided, covariance, principal_axes, try_inverse};

mod common;
use common::Rng;

fn gen_coords(count: usize, stride: usize) -> Vec<f64> {
    let mut rng = Rng::new(0x9E37_79B9_7F4A_7C15);
    (0..count * stride).map(|_| rng.next_in(-50.0, 50.0)).collect()
}

fn bench_principal_axes(c: &mut Criterion) {
    let mut group = c.benchmark_group("principal_axes");
    for &n in &[64usize, 1024, 16384] {
        let packed = gen_coords(n, 3);
        let points: Vec<DVec3> = packed.chunks_exact(3).map(DVec3::from_slice).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("covariance_n{}", n), |b| {
            b.iter(|| black_box(covariance(black_box(&points))))
        });
        group.bench_function(format!("principal_axes_vec_n{}", n), |b| {
            b.iter(|| black_box(principal_axes(black_box(&points))))
        });

        // Position plus normal, six doubles per vertex.
        let interleaved = gen_coords(n, 6);
        let strided = Strided::new(&interleaved, 6).expect("stride is at least 3");
        group.bench_function(format!("principal_axes_strided_n{}", n), |b| {
            b.iter(|| black_box(principal_axes(black_box(&strided))))
        });
    }
    group.finish();
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");
    let symmetric = DMat3::from_cols(
        DVec3::new(4.0, 1.0, -2.0),
        DVec3::new(1.0, 3.0, 0.5),
        DVec3::new(-2.0, 0.5, 6.0),
    );
    let solver = JacobiSolver::default();
    group.bench_function("jacobi_3x3", |b| {
        b.iter(|| black_box(solver.solve(black_box(&symmetric))))
    });

    let m = DMat4::look_at_rh(DVec3::new(3.0, 4.0, 5.0), DVec3::ZERO, DVec3::Y)
        * DMat4::from_scale(DVec3::new(2.0, 0.5, 1.5));
    group.bench_function("lu_inverse_4x4", |b| {
        b.iter(|| black_box(try_inverse(black_box(&m))))
    });
    group.bench_function("glam_inverse_4x4", |b| {
        b.iter(|| black_box(black_box(&m).inverse()))
    });
    group.finish();
}

criterion_group!(benches, bench_principal_axes, bench_solvers);
criterion_main!(benches);
