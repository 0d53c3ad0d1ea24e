// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Six-plane view volumes.

use glam::{DMat4, DVec3, DVec4};
use sightline_math::matrix::{check_depth_range, check_field_of_view, check_positive};
use sightline_math::{Plane, Result, Side};

use crate::extent::Extent;

/// A convex view volume bounded by six planes whose normals point inward.
///
/// A point is inside when its dot with every plane is strictly positive. Constructors that
/// model a camera place the eye at the origin looking down -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    left: Plane,
    right: Plane,
    bottom: Plane,
    top: Plane,
    near: Plane,
    far: Plane,
}

/// The eight corners of a [`Frustum`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumCorners {
    /// Near, bottom, left.
    pub near_bottom_left: DVec3,
    /// Near, bottom, right.
    pub near_bottom_right: DVec3,
    /// Near, top, left.
    pub near_top_left: DVec3,
    /// Near, top, right.
    pub near_top_right: DVec3,
    /// Far, bottom, left.
    pub far_bottom_left: DVec3,
    /// Far, bottom, right.
    pub far_bottom_right: DVec3,
    /// Far, top, left.
    pub far_top_left: DVec3,
    /// Far, top, right.
    pub far_top_right: DVec3,
}

impl Default for Frustum {
    /// The cube `[-1, 1]³`.
    fn default() -> Self {
        let plane = |normal| Plane::new_unchecked(normal, 1.0);
        Self::new(
            plane(DVec3::X),
            plane(DVec3::NEG_X),
            plane(DVec3::Y),
            plane(DVec3::NEG_Y),
            plane(DVec3::NEG_Z),
            plane(DVec3::Z),
        )
    }
}

impl Frustum {
    /// Create a frustum from its six planes.
    pub const fn new(
        left: Plane,
        right: Plane,
        bottom: Plane,
        top: Plane,
        near: Plane,
        far: Plane,
    ) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Extract the view volume of a projection (or combined view-projection) matrix.
    ///
    /// Uses the Gribb-Hartmann row combinations: left and right are `row4 ± row1`, bottom and
    /// top `row4 ± row2`, near and far `row4 ± row3`. Each plane is normalized.
    pub fn from_projection(m: &DMat4) -> Result<Self> {
        let [r1, r2, r3, r4] = [m.row(0), m.row(1), m.row(2), m.row(3)];
        let plane = |v: DVec4| Plane::from_vec4(v).map(|p| p.normalize());
        Ok(Self::new(
            plane(r4 + r1)?,
            plane(r4 - r1)?,
            plane(r4 + r2)?,
            plane(r4 - r2)?,
            plane(r4 + r3)?,
            plane(r4 - r3)?,
        ))
    }

    /// Perspective view volume from a horizontal field of view (radians) and viewport size.
    pub fn from_perspective(
        fov_x: f64,
        viewport_width: f64,
        viewport_height: f64,
        near: f64,
        far: f64,
    ) -> Result<Self> {
        check_field_of_view(fov_x)?;
        check_positive("viewport width", viewport_width)?;
        check_positive("viewport height", viewport_height)?;
        check_depth_range(near, far)?;

        let focal = 1.0 / (fov_x * 0.5).tan();
        let aspect = viewport_height / viewport_width;
        let lr_len = (focal * focal + 1.0).sqrt();
        let bt_len = (focal * focal + aspect * aspect).sqrt();

        Ok(Self::new(
            Plane::new(DVec3::new(focal / lr_len, 0.0, -1.0 / lr_len), 0.0)?,
            Plane::new(DVec3::new(-focal / lr_len, 0.0, -1.0 / lr_len), 0.0)?,
            Plane::new(DVec3::new(0.0, focal / bt_len, -aspect / bt_len), 0.0)?,
            Plane::new(DVec3::new(0.0, -focal / bt_len, -aspect / bt_len), 0.0)?,
            Plane::new(DVec3::NEG_Z, -near)?,
            Plane::new(DVec3::Z, far)?,
        ))
    }

    /// Orthographic view volume `width` × `height` across, between `near` and `far`.
    ///
    /// Near and far are distances along -Z; negative values are accepted as their magnitude.
    pub fn from_orthographic(width: f64, height: f64, near: f64, far: f64) -> Result<Self> {
        check_positive("width", width)?;
        check_positive("height", height)?;
        check_positive("far - near", far - near)?;

        let (half_w, half_h) = (width * 0.5, height * 0.5);
        Ok(Self::new(
            Plane::new(DVec3::X, half_w)?,
            Plane::new(DVec3::NEG_X, half_w)?,
            Plane::new(DVec3::Y, half_h)?,
            Plane::new(DVec3::NEG_Y, half_h)?,
            Plane::new(DVec3::NEG_Z, -near.abs())?,
            Plane::new(DVec3::Z, far.abs())?,
        ))
    }

    /// Perspective view volume through four corner direction vectors from the eye.
    ///
    /// The side planes pass through the eye; near and far are distances along -Z.
    /// Returns [`ZeroNormal`](sightline_math::Error::ZeroNormal) if two adjacent corner vectors
    /// are parallel.
    pub fn from_corner_vectors(
        top_left: DVec3,
        top_right: DVec3,
        bottom_left: DVec3,
        bottom_right: DVec3,
        near: f64,
        far: f64,
    ) -> Result<Self> {
        check_positive("near", near)?;
        check_positive("far - near", far - near)?;

        let side = |a: DVec3, b: DVec3| Plane::new(a.cross(b), 0.0).map(|p| p.normalize());
        Ok(Self::new(
            side(bottom_left, top_left)?,
            side(top_right, bottom_right)?,
            side(bottom_right, bottom_left)?,
            side(top_left, top_right)?,
            Plane::new(DVec3::NEG_Z, -near)?,
            Plane::new(DVec3::Z, far)?,
        ))
    }

    /// The planes in the order left, right, bottom, top, near, far.
    pub const fn planes(&self) -> [Plane; 6] {
        [
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        ]
    }

    /// The planes in the order bounding volumes test them: near and far first, since they
    /// reject the most geometry in a typical scene.
    pub(crate) const fn culling_order(&self) -> [Plane; 6] {
        [
            self.near,
            self.far,
            self.left,
            self.right,
            self.top,
            self.bottom,
        ]
    }

    /// The left plane.
    pub const fn left(&self) -> &Plane {
        &self.left
    }

    /// The right plane.
    pub const fn right(&self) -> &Plane {
        &self.right
    }

    /// The bottom plane.
    pub const fn bottom(&self) -> &Plane {
        &self.bottom
    }

    /// The top plane.
    pub const fn top(&self) -> &Plane {
        &self.top
    }

    /// The near plane.
    pub const fn near(&self) -> &Plane {
        &self.near
    }

    /// The far plane.
    pub const fn far(&self) -> &Plane {
        &self.far
    }

    /// Whether `p` is strictly inside every plane.
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.planes().iter().all(|plane| plane.dot(p) > 0.0)
    }

    /// Whether the sphere lies entirely inside, more than `radius` from every plane.
    pub fn contains_sphere(&self, center: DVec3, radius: f64) -> bool {
        self.planes().iter().all(|plane| plane.dot(center) > radius)
    }

    /// Whether `extent` lies entirely inside, judged by its enclosing sphere.
    pub fn contains(&self, extent: &dyn Extent) -> bool {
        self.contains_sphere(extent.center(), extent.radius())
    }

    /// Whether `extent` intersects this frustum.
    pub fn intersects(&self, extent: &dyn Extent) -> bool {
        extent.intersects_frustum(self)
    }

    /// Whether the segment `a`–`b` touches the inside of this frustum.
    pub fn intersects_segment(&self, a: DVec3, b: DVec3) -> bool {
        if self.contains_point(a) || self.contains_point(b) {
            return true;
        }
        if a == b {
            return false;
        }
        for plane in self.planes() {
            if plane.side_of(a, b) == Side::Negative {
                return false;
            }
            if plane.clip(a, b).is_some() {
                return true;
            }
        }
        false
    }

    /// Transform every plane vector by `m`.
    ///
    /// To express an eye-space frustum in model space, pass the transpose of the model-view
    /// matrix. Returns [`ZeroNormal`](sightline_math::Error::ZeroNormal) if `m` collapses a plane.
    pub fn transform(&self, m: &DMat4) -> Result<Self> {
        Ok(Self::new(
            self.left.transform(m)?,
            self.right.transform(m)?,
            self.bottom.transform(m)?,
            self.top.transform(m)?,
            self.near.transform(m)?,
            self.far.transform(m)?,
        ))
    }

    /// The eight corners, or `None` if some corner's three planes do not meet in a point.
    pub fn corners(&self) -> Option<FrustumCorners> {
        let corner = |a: &Plane, b: &Plane, c: &Plane| Plane::intersect_three(a, b, c);
        Some(FrustumCorners {
            near_bottom_left: corner(&self.near, &self.bottom, &self.left)?,
            near_bottom_right: corner(&self.near, &self.bottom, &self.right)?,
            near_top_left: corner(&self.near, &self.top, &self.left)?,
            near_top_right: corner(&self.near, &self.top, &self.right)?,
            far_bottom_left: corner(&self.far, &self.bottom, &self.left)?,
            far_bottom_right: corner(&self.far, &self.bottom, &self.right)?,
            far_top_left: corner(&self.far, &self.top, &self.left)?,
            far_top_right: corner(&self.far, &self.top, &self.right)?,
        })
    }
}
