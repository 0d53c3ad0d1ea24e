// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The common surface of bounding volumes, and the culling test they share.

use glam::DVec3;
use sightline_math::{Line, LineHits, Plane};

use crate::frustum::Frustum;
use crate::silhouette::ProjectedArea;
use crate::view::View;

/// A bounded region of space usable for culling and level-of-detail decisions.
///
/// The trait is object safe; [`Frustum::contains`] and [`Frustum::intersects`] take
/// `&dyn Extent`.
pub trait Extent {
    /// Center of the volume.
    fn center(&self) -> DVec3;

    /// Radius of a sphere around [`Extent::center`] enclosing the volume.
    fn radius(&self) -> f64;

    /// Diameter of the enclosing sphere.
    fn diameter(&self) -> f64 {
        2.0 * self.radius()
    }

    /// Half-extent of the volume along the normal of `plane`.
    fn effective_radius(&self, plane: &Plane) -> f64;

    /// Whether the volume intersects `frustum`.
    ///
    /// Conservative: may report an intersection for a volume just outside a frustum corner,
    /// never the reverse.
    fn intersects_frustum(&self, frustum: &Frustum) -> bool;

    /// Whether any part of the volume is on the positive side of `plane`.
    fn intersects_plane(&self, plane: &Plane) -> bool;

    /// Where the ray `line` crosses the volume surface.
    fn intersect_line(&self, line: &Line) -> Option<LineHits>;

    /// Whether the ray `line` meets the volume.
    fn intersects_line(&self, line: &Line) -> bool {
        self.intersect_line(line).is_some()
    }

    /// Estimated on-screen area of the volume for `view`.
    fn projected_area(&self, view: &dyn View) -> ProjectedArea;
}

/// A volume swept along a central segment.
///
/// Boxes sweep their S×T cross-section along R; cylinders sweep a disk along their axis. The
/// frustum test clips the central segment plane by plane, inflating each plane by the
/// cross-section's reach along its normal.
pub trait OrientedVolume {
    /// The central segment, bottom then top.
    fn axis_segment(&self) -> [DVec3; 2];

    /// Reach of the cross-section along the normal of `plane`, not counting the segment.
    fn segment_radius(&self, plane: &Plane) -> f64;
}

/// Separating-plane test of an [`OrientedVolume`] against a frustum.
///
/// Planes are visited near, far, left, right, top, bottom. Each one either rejects the
/// volume outright or trims the central segment to the part that can still be inside.
pub fn intersects_frustum<V: OrientedVolume + ?Sized>(volume: &V, frustum: &Frustum) -> bool {
    let mut segment = volume.axis_segment();
    for plane in frustum.culling_order() {
        let radius = volume.segment_radius(&plane);
        if !clip_segment(&plane, radius, &mut segment) {
            return false;
        }
    }
    true
}

/// Whether a segment inflated by `radius` reaches the positive side of `plane`.
///
/// Only rejects when both endpoints are at least `radius` behind the plane.
pub fn segment_intersects_plane(segment: [DVec3; 2], plane: &Plane, radius: f64) -> bool {
    let [a, b] = segment;
    !(plane.dot(a) <= -radius && plane.dot(b) <= -radius)
}

/// Trim `segment` to the part within `radius` of the positive side of `plane`.
///
/// Returns `false` if the whole segment is outside.
fn clip_segment(plane: &Plane, radius: f64, segment: &mut [DVec3; 2]) -> bool {
    let [p0, p1] = *segment;
    let d0 = plane.dot(p0);
    let d1 = plane.dot(p1);
    let out0 = d0 <= -radius;
    let out1 = d1 <= -radius;

    if out0 && out1 {
        return false;
    }
    if out0 == out1 {
        return true;
    }

    let t = (radius + d0) / plane.normal().dot(p0 - p1);
    let clipped = p0 + (p1 - p0) * t;
    if out0 {
        segment[0] = clipped;
    } else {
        segment[1] = clipped;
    }
    true
}
