// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen area for level of detail.
//!
//! Walk a box and a cylinder away from the camera and print how many pixels each covers,
//! along with the faces of the box the eye can see.
//!
//! Run:
//! - `RUST_LOG=info cargo run -p sightline_demos --example projected_area`

use core::f64::consts::FRAC_PI_2;

use glam::DVec3;
use kurbo::Size;
use sightline_volume::{Camera, Cylinder, Extent, OrientedBox, ProjectedArea, View};
use tracing_subscriber::EnvFilter;

fn describe(area: ProjectedArea) -> String {
    match area {
        ProjectedArea::Finite(a) => format!("{a:>10.1} px²"),
        ProjectedArea::Unbounded => format!("{:>13}", "unbounded"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let camera = Camera::new(
        DVec3::ZERO,
        DVec3::NEG_Z,
        DVec3::Y,
        FRAC_PI_2,
        Size::new(1024.0, 768.0),
        0.1,
        1000.0,
    )
    .expect("valid camera");

    // Tilted so that more than one face shows.
    let tilt = DVec3::new(1.0, 0.3, 0.0).normalize();
    let up = tilt.cross(DVec3::Z).normalize();
    let template = OrientedBox::from_extents(
        [tilt, up, tilt.cross(up)],
        [(-1.0, 1.0), (-0.5, 0.5), (-0.5, 0.5)],
    )
    .expect("non-zero axes");
    let rod = Cylinder::new(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0), 0.25)
        .expect("valid cylinder");

    println!("distance        box area   faces                    cylinder area");
    for distance in [0.0, 2.0, 5.0, 10.0, 50.0, 200.0] {
        let offset = DVec3::new(0.5, 0.0, -distance);
        let obb = template.translate(offset);
        let faces = obb.visibility_code(camera.eye_point());
        if faces.is_empty() {
            tracing::info!(distance, "eye is inside the box");
        }
        let cyl = Cylinder::new(
            rod.bottom_center() + offset,
            rod.top_center() + offset,
            rod.cylinder_radius(),
        )
        .expect("valid cylinder");
        println!(
            "{distance:>8.1} {} {:<24} {}",
            describe(obb.projected_area(&camera)),
            format!("{faces:?}"),
            describe(cyl.projected_area(&camera)),
        );
    }
}
