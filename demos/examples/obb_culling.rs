// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frustum culling with oriented boxes.
//!
//! Bound a few point clouds, merge two of them, and test each box against a camera's view
//! volume in model coordinates.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p sightline_demos --example obb_culling`

use core::f64::consts::FRAC_PI_3;

use glam::DVec3;
use kurbo::Size;
use sightline_volume::{Camera, Extent, OrientedBox};
use tracing_subscriber::EnvFilter;

/// A thin rod of points from `a` to `b`, jittered on a fixed pattern.
fn rod(a: DVec3, b: DVec3, count: u32) -> Vec<DVec3> {
    (0..count)
        .map(|i| {
            let t = f64::from(i) / f64::from(count - 1);
            let wobble = DVec3::new((t * 17.0).sin(), (t * 23.0).cos(), (t * 31.0).sin()) * 0.2;
            a.lerp(b, t) + wobble
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let camera = Camera::new(
        DVec3::new(0.0, 2.0, 10.0),
        DVec3::ZERO,
        DVec3::Y,
        FRAC_PI_3,
        Size::new(800.0, 600.0),
        0.5,
        100.0,
    )
    .expect("valid camera");
    let frustum = camera.frustum_in_model_coordinates();

    let bound = |a, b| OrientedBox::from_points(&rod(a, b, 32));
    let scene = [
        (
            "ahead",
            bound(DVec3::new(-2.0, 0.0, 0.0), DVec3::new(2.0, 1.0, -1.0)),
        ),
        (
            "behind",
            bound(DVec3::new(0.0, 0.0, 15.0), DVec3::new(1.0, 0.0, 20.0)),
        ),
        (
            "far left",
            bound(DVec3::new(-60.0, 0.0, 0.0), DVec3::new(-55.0, 3.0, 0.0)),
        ),
        ("empty", OrientedBox::from_points(&Vec::<DVec3>::new())),
    ];

    for (name, obb) in &scene {
        if !frustum.intersects(obb) {
            tracing::info!(name, center = %obb.center(), "culled");
        }
        println!(
            "{name:>9}: center {:.2}, lengths ({:.2}, {:.2}, {:.2}), visible {}, fully inside {}",
            obb.center(),
            obb.r_length(),
            obb.s_length(),
            obb.t_length(),
            frustum.intersects(obb),
            frustum.contains(obb),
        );
    }

    // Merge a visible and an invisible box; the union straddles the view volume.
    let merged = OrientedBox::union([Some(&scene[0].1), None, Some(&scene[2].1)])
        .expect("two boxes present");
    println!(
        "   merged: center {:.2}, radius {:.2}, visible {}",
        merged.center(),
        merged.radius(),
        frustum.intersects(&merged)
    );
}
