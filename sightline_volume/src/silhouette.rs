// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen silhouettes of boxes and projected-area estimates.
//!
//! A box seen from outside shows one, two, or three of its faces. Which ones is fully decided
//! by a 6-bit [`FaceMask`]: one bit per face plane the eye lies beyond. The outline of the
//! visible faces on screen is then a fixed polygon of four or six box corners, looked up in
//! a 64-entry table. This is the approach of Schmalstieg and Tobler's "Real-time Bounding Box
//! Area Computation".
//!
//! Corner indices refer to [`OrientedBox::corners`](crate::OrientedBox::corners):
//! `0..4` are the bottom face and `4..8` the top face, each ordered lower-left, lower-right,
//! upper-right, upper-left in the (S, T) plane.

use core::f64::consts::PI;

use glam::DVec3;
use kurbo::Point;

use crate::view::View;

bitflags::bitflags! {
    /// Faces of a box that the eye lies beyond.
    ///
    /// Opposite faces are mutually exclusive, so only 27 of the 64 codes occur. The empty
    /// mask means the eye is inside the box.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        /// Beyond the +R face.
        const TOP    = 0b00_0001;
        /// Beyond the -R face.
        const BOTTOM = 0b00_0010;
        /// Beyond the +S face.
        const FRONT  = 0b00_0100;
        /// Beyond the -S face.
        const BACK   = 0b00_1000;
        /// Beyond the +T face.
        const RIGHT  = 0b01_0000;
        /// Beyond the -T face.
        const LEFT   = 0b10_0000;
    }
}

/// Silhouette corner indices for every face mask, in screen winding order.
///
/// `None` marks the empty mask and masks with both faces of an opposite pair set.
const SILHOUETTES: [Option<&[usize]>; 64] = [
    None,                       // 0: inside
    Some(&[7, 6, 5, 4]),        // 1: top
    Some(&[0, 1, 2, 3]),        // 2: bottom
    None,                       // 3
    Some(&[3, 2, 6, 7]),        // 4: front
    Some(&[3, 2, 6, 5, 4, 7]),  // 5: front, top
    Some(&[0, 1, 2, 6, 7, 3]),  // 6: front, bottom
    None,                       // 7
    Some(&[1, 0, 4, 5]),        // 8: back
    Some(&[1, 0, 4, 7, 6, 5]),  // 9: back, top
    Some(&[2, 3, 0, 4, 5, 1]),  // 10: back, bottom
    None,                       // 11
    None,                       // 12
    None,                       // 13
    None,                       // 14
    None,                       // 15
    Some(&[2, 1, 5, 6]),        // 16: right
    Some(&[2, 1, 5, 4, 7, 6]),  // 17: right, top
    Some(&[3, 0, 1, 5, 6, 2]),  // 18: right, bottom
    None,                       // 19
    Some(&[3, 2, 1, 5, 6, 7]),  // 20: right, front
    Some(&[3, 2, 1, 5, 4, 7]),  // 21: right, front, top
    Some(&[3, 0, 1, 5, 6, 7]),  // 22: right, front, bottom
    None,                       // 23
    Some(&[2, 1, 0, 4, 5, 6]),  // 24: right, back
    Some(&[2, 1, 0, 4, 7, 6]),  // 25: right, back, top
    Some(&[2, 3, 0, 4, 5, 6]),  // 26: right, back, bottom
    None,                       // 27
    None,                       // 28
    None,                       // 29
    None,                       // 30
    None,                       // 31
    Some(&[0, 3, 7, 4]),        // 32: left
    Some(&[0, 3, 7, 6, 5, 4]),  // 33: left, top
    Some(&[1, 2, 3, 7, 4, 0]),  // 34: left, bottom
    None,                       // 35
    Some(&[0, 3, 2, 6, 7, 4]),  // 36: left, front
    Some(&[0, 3, 2, 6, 5, 4]),  // 37: left, front, top
    Some(&[0, 1, 2, 6, 7, 4]),  // 38: left, front, bottom
    None,                       // 39
    Some(&[1, 0, 3, 7, 4, 5]),  // 40: left, back
    Some(&[1, 0, 3, 7, 6, 5]),  // 41: left, back, top
    Some(&[1, 2, 3, 7, 4, 5]),  // 42: left, back, bottom
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];

/// Corner indices of the on-screen outline for `mask`, or `None` for the empty mask and
/// impossible masks.
pub fn silhouette(mask: FaceMask) -> Option<&'static [usize]> {
    SILHOUETTES[usize::from(mask.bits() & 0b11_1111)]
}

/// Estimated on-screen area of a volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectedArea {
    /// Area in square screen units; never negative.
    Finite(f64),
    /// The volume surrounds the eye or reaches behind it.
    Unbounded,
}

impl ProjectedArea {
    /// The area as a float, with [`Unbounded`](Self::Unbounded) mapped to infinity.
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Finite(area) => area,
            Self::Unbounded => f64::INFINITY,
        }
    }

    /// Whether the area is [`Unbounded`](Self::Unbounded).
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Signed area of a closed polygon by the shoelace formula.
///
/// Counter-clockwise polygons (in a y-up frame) are positive. The closing edge is implied.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    let Some(&first) = vertices.first() else {
        return 0.0;
    };
    let mut twice = 0.0;
    let mut prev = first;
    for &p in &vertices[1..] {
        twice += prev.to_vec2().cross(p.to_vec2());
        prev = p;
    }
    twice += prev.to_vec2().cross(first.to_vec2());
    twice * 0.5
}

/// Screen area of a sphere, approximated as a disk scaled by the sphere's eye-space depth.
///
/// The true projection of a sphere is an ellipse; this is a cheap estimate for coarse level
/// of detail decisions.
pub fn sphere_projected_area(view: &dyn View, center: DVec3, radius: f64) -> ProjectedArea {
    if radius <= 0.0 {
        return ProjectedArea::Finite(0.0);
    }
    let depth = view.modelview().transform_point3(center).z.abs();
    let pixel_size = view.pixel_size_at_distance(depth);
    if pixel_size <= 0.0 {
        return ProjectedArea::Unbounded;
    }
    let radius_in_pixels = radius / pixel_size;
    ProjectedArea::Finite(PI * radius_in_pixels * radius_in_pixels)
}
