// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented bounding boxes.

use glam::DVec3;
use kurbo::Point;
use sightline_math::{
    Error, Line, LineHits, Plane, PointSet, Result, intersect_polytope, principal_axes,
};

use crate::extent::{self, Extent, OrientedVolume};
use crate::frustum::Frustum;
use crate::silhouette::{FaceMask, ProjectedArea, polygon_area, silhouette};
use crate::view::View;

/// A box whose three axes need not line up with the world axes.
///
/// The axes are named R, S, and T. When built from points they follow the principal axes, so
/// R is the longest. The box is stored redundantly (scaled and unit axes, lengths, face
/// planes, and the centers of the two R faces) so culling never recomputes any of it.
///
/// Face planes point outward, in the order -R, +R, -S, +S, -T, +T.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    bottom_center: DVec3,
    top_center: DVec3,
    center: DVec3,
    r: DVec3,
    s: DVec3,
    t: DVec3,
    ru: DVec3,
    su: DVec3,
    tu: DVec3,
    r_length: f64,
    s_length: f64,
    t_length: f64,
    planes: [Plane; 6],
}

impl OrientedBox {
    /// Create a box from three axes and the `(min, max)` extent of the box along each.
    ///
    /// Extents are positions along the unit axis, so the box spans
    /// `min * unit..max * unit` on that axis. Axes are normalized; they are expected to be
    /// mutually orthogonal.
    ///
    /// Returns [`Error::DegenerateAxis`] if an axis has zero length.
    pub fn from_extents(axes: [DVec3; 3], extents: [(f64, f64); 3]) -> Result<Self> {
        let mut units = [DVec3::ZERO; 3];
        for (i, (unit, axis)) in units.iter_mut().zip(axes).enumerate() {
            let len = axis.length();
            if len == 0.0 {
                return Err(Error::DegenerateAxis { axis: i });
            }
            *unit = axis / len;
        }
        Ok(Self::build(units, extents))
    }

    /// Bound `points` with a box along the given unit axes.
    ///
    /// An axis along which every point projects to the same value is widened to length 1.
    /// Returns `None` if `points` is empty.
    pub fn from_axes_and_points<P: PointSet + ?Sized>(
        axes: [DVec3; 3],
        points: &P,
    ) -> Option<Self> {
        let mut extents = [(f64::MAX, -f64::MAX); 3];
        let mut any = false;
        points.for_each_point(|p| {
            any = true;
            for ((min, max), axis) in extents.iter_mut().zip(axes) {
                let d = p.dot(axis);
                *min = min.min(d);
                *max = max.max(d);
            }
        });
        if !any {
            return None;
        }

        for (axis, (min, max)) in extents.iter_mut().enumerate() {
            if *min == *max {
                tracing::debug!(axis, "points have no extent along axis, padding to 1");
                *max = *min + 1.0;
            }
        }
        Some(Self::build(axes, extents))
    }

    /// Bound `points` with a box along their principal axes.
    ///
    /// With no points, this is a unit cube at the origin.
    pub fn from_points<P: PointSet + ?Sized>(points: &P) -> Self {
        let bounded = principal_axes(points)
            .and_then(|axes| Self::from_axes_and_points(axes.axes, points));
        bounded.unwrap_or_else(|| {
            tracing::debug!("no points to bound, using a unit cube at the origin");
            Self::unit_cube(DVec3::ZERO)
        })
    }

    /// An axis-aligned cube with side 1 centered on `center`.
    pub fn unit_cube(center: DVec3) -> Self {
        Self::build(
            [DVec3::X, DVec3::Y, DVec3::Z],
            [
                (center.x - 0.5, center.x + 0.5),
                (center.y - 0.5, center.y + 0.5),
                (center.z - 0.5, center.z + 0.5),
            ],
        )
    }

    /// Box bounding every present input box.
    ///
    /// No boxes gives `None` and a single box is returned as is. Otherwise the corners of all
    /// boxes are bounded afresh along their own principal axes, which is usually looser than
    /// bounding the original geometry.
    pub fn union<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<&'a Self>>,
    {
        let mut present = boxes
            .into_iter()
            .filter_map(|item| -> Option<&'a Self> { item.into() });
        let first = present.next()?;
        let Some(second) = present.next() else {
            tracing::debug!("union of a single box, returning it unchanged");
            return Some(*first);
        };

        let mut corners = Vec::new();
        for b in [first, second].into_iter().chain(present) {
            corners.extend_from_slice(&b.corners());
        }
        Some(Self::from_points(&corners))
    }

    fn build(units: [DVec3; 3], extents: [(f64, f64); 3]) -> Self {
        let [ru, su, tu] = units;
        let [(r_min, r_max), (s_min, s_max), (t_min, t_max)] = extents;

        let r = ru * (r_max - r_min);
        let s = su * (s_max - s_min);
        let t = tu * (t_max - t_min);

        let face = |n: DVec3, d: f64| Plane::new_unchecked(n, d);
        let planes = [
            face(-ru, r_min),
            face(ru, -r_max),
            face(-su, s_min),
            face(su, -s_max),
            face(-tu, t_min),
            face(tu, -t_max),
        ];

        let center = ru * (0.5 * (r_min + r_max))
            + su * (0.5 * (s_min + s_max))
            + tu * (0.5 * (t_min + t_max));
        let half_r = r * 0.5;

        Self {
            bottom_center: center - half_r,
            top_center: center + half_r,
            center,
            r,
            s,
            t,
            ru,
            su,
            tu,
            r_length: r.length(),
            s_length: s.length(),
            t_length: t.length(),
            planes,
        }
    }

    /// Center of the -R face.
    pub const fn bottom_center(&self) -> DVec3 {
        self.bottom_center
    }

    /// Center of the +R face.
    pub const fn top_center(&self) -> DVec3 {
        self.top_center
    }

    /// The R axis scaled to the box length along it.
    pub const fn r_axis(&self) -> DVec3 {
        self.r
    }

    /// The S axis scaled to the box length along it.
    pub const fn s_axis(&self) -> DVec3 {
        self.s
    }

    /// The T axis scaled to the box length along it.
    pub const fn t_axis(&self) -> DVec3 {
        self.t
    }

    /// Unit R axis.
    pub const fn unit_r_axis(&self) -> DVec3 {
        self.ru
    }

    /// Unit S axis.
    pub const fn unit_s_axis(&self) -> DVec3 {
        self.su
    }

    /// Unit T axis.
    pub const fn unit_t_axis(&self) -> DVec3 {
        self.tu
    }

    /// Length along R.
    pub const fn r_length(&self) -> f64 {
        self.r_length
    }

    /// Length along S.
    pub const fn s_length(&self) -> f64 {
        self.s_length
    }

    /// Length along T.
    pub const fn t_length(&self) -> f64 {
        self.t_length
    }

    /// Outward face planes: -R, +R, -S, +S, -T, +T.
    pub const fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// The eight corners.
    ///
    /// Indices `0..4` lie on the -R face and `4..8` on the +R face. On each face the order
    /// is lower-left, lower-right, upper-right, upper-left, with S pointing right and T up.
    pub fn corners(&self) -> [DVec3; 8] {
        let ll = -(self.s + self.t) * 0.5;
        let lr = (self.t - self.s) * 0.5;
        let ur = (self.s + self.t) * 0.5;
        let ul = (self.s - self.t) * 0.5;

        let (b, t) = (self.bottom_center, self.top_center);
        [
            b + ll,
            b + lr,
            b + ur,
            b + ul,
            t + ll,
            t + lr,
            t + ur,
            t + ul,
        ]
    }

    /// The same box moved by `offset`.
    pub fn translate(&self, offset: DVec3) -> Self {
        Self {
            bottom_center: self.bottom_center + offset,
            top_center: self.top_center + offset,
            center: self.center + offset,
            planes: self.planes.map(|p| {
                Plane::new_unchecked(p.normal(), p.distance() - p.normal().dot(offset))
            }),
            ..*self
        }
    }

    /// Faces of this box that `eye` lies beyond.
    ///
    /// Empty when the eye is inside the box.
    pub fn visibility_code(&self, eye: DVec3) -> FaceMask {
        let p = eye - self.center;
        let dr = p.dot(self.ru);
        let ds = p.dot(self.su);
        let dt = p.dot(self.tu);

        let mut code = FaceMask::empty();
        code.set(FaceMask::TOP, dr > 0.5 * self.r_length);
        code.set(FaceMask::BOTTOM, dr < -0.5 * self.r_length);
        code.set(FaceMask::FRONT, ds > 0.5 * self.s_length);
        code.set(FaceMask::BACK, ds < -0.5 * self.s_length);
        code.set(FaceMask::RIGHT, dt > 0.5 * self.t_length);
        code.set(FaceMask::LEFT, dt < -0.5 * self.t_length);
        code
    }
}

impl OrientedVolume for OrientedBox {
    fn axis_segment(&self) -> [DVec3; 2] {
        [self.bottom_center, self.top_center]
    }

    fn segment_radius(&self, plane: &Plane) -> f64 {
        let n = plane.normal();
        0.5 * (self.s.dot(n).abs() + self.t.dot(n).abs())
    }
}

impl Extent for OrientedBox {
    fn center(&self) -> DVec3 {
        self.center
    }

    /// Half the length of the box diagonal.
    fn radius(&self) -> f64 {
        0.5 * (self.r_length * self.r_length
            + self.s_length * self.s_length
            + self.t_length * self.t_length)
            .sqrt()
    }

    fn effective_radius(&self, plane: &Plane) -> f64 {
        let n = plane.normal();
        0.5 * (self.r.dot(n).abs() + self.s.dot(n).abs() + self.t.dot(n).abs())
    }

    fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        extent::intersects_frustum(self, frustum)
    }

    fn intersects_plane(&self, plane: &Plane) -> bool {
        extent::segment_intersects_plane(self.axis_segment(), plane, self.effective_radius(plane))
    }

    fn intersect_line(&self, line: &Line) -> Option<LineHits> {
        intersect_polytope(line, &self.planes)
    }

    /// Area of the silhouette of the visible faces on screen.
    ///
    /// Unbounded when the eye is inside the box or a silhouette corner is level with or
    /// behind the eye.
    fn projected_area(&self, view: &dyn View) -> ProjectedArea {
        let code = self.visibility_code(view.eye_point());
        if code.is_empty() {
            return ProjectedArea::Unbounded;
        }
        let Some(indices) = silhouette(code) else {
            return ProjectedArea::Finite(0.0);
        };
        if !matches!(indices.len(), 4 | 6) {
            return ProjectedArea::Finite(0.0);
        }

        let corners = self.corners();
        let modelview = view.modelview();
        if indices
            .iter()
            .any(|&i| modelview.transform_point3(corners[i]).z >= 0.0)
        {
            tracing::debug!(?code, "silhouette reaches behind the eye");
            return ProjectedArea::Unbounded;
        }

        let mut outline = [Point::ZERO; 6];
        for (slot, &i) in outline.iter_mut().zip(indices) {
            let Some(p) = view.project(corners[i]) else {
                return ProjectedArea::Unbounded;
            };
            *slot = p;
        }
        ProjectedArea::Finite(polygon_area(&outline[..indices.len()]).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    use kurbo::Size;
    use proptest::prelude::*;
    use sightline_math::Strided;

    use crate::view::Camera;

    fn camera() -> Camera {
        Camera::new(
            DVec3::ZERO,
            DVec3::NEG_Z,
            DVec3::Y,
            FRAC_PI_2,
            Size::new(100.0, 100.0),
            1.0,
            100.0,
        )
        .unwrap()
    }

    fn perspective_frustum() -> Frustum {
        Frustum::from_perspective(FRAC_PI_2, 100.0, 100.0, 1.0, 100.0).unwrap()
    }

    fn assert_contains(b: &OrientedBox, p: DVec3) {
        for plane in b.planes() {
            assert!(plane.dot(p) <= 1e-9, "{p} outside {plane:?}");
        }
    }

    #[test]
    fn explicit_extents() {
        let b = OrientedBox::from_extents(
            [DVec3::X, DVec3::Y, DVec3::Z],
            [(-1.0, 1.0), (-2.0, 2.0), (-0.5, 0.5)],
        )
        .unwrap();
        assert_eq!(
            (b.r_length(), b.s_length(), b.t_length()),
            (2.0, 4.0, 1.0)
        );
        assert_eq!(b.center(), DVec3::ZERO);
        assert_eq!(b.bottom_center(), DVec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.top_center(), DVec3::new(1.0, 0.0, 0.0));
        assert!((b.radius() - 0.5 * 21.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(b.diameter(), 2.0 * b.radius());
    }

    #[test]
    fn zero_axis_is_rejected() {
        let err = OrientedBox::from_extents([DVec3::X, DVec3::ZERO, DVec3::Z], [(0.0, 1.0); 3]);
        assert_eq!(err, Err(Error::DegenerateAxis { axis: 1 }));
    }

    #[test]
    fn unscaled_axes_are_normalized() {
        let b = OrientedBox::from_extents(
            [DVec3::new(3.0, 0.0, 0.0), DVec3::Y, DVec3::Z],
            [(0.0, 2.0), (0.0, 1.0), (0.0, 1.0)],
        )
        .unwrap();
        assert_eq!(b.unit_r_axis(), DVec3::X);
        assert_eq!(b.r_length(), 2.0);
    }

    #[test]
    fn corners_follow_face_order() {
        let b = OrientedBox::from_extents(
            [DVec3::Z, DVec3::X, DVec3::Y],
            [(0.0, 1.0), (0.0, 2.0), (0.0, 3.0)],
        )
        .unwrap();
        let c = b.corners();
        assert_eq!(c[0], DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(c[1], DVec3::new(0.0, 3.0, 0.0));
        assert_eq!(c[2], DVec3::new(2.0, 3.0, 0.0));
        assert_eq!(c[3], DVec3::new(2.0, 0.0, 0.0));
        for i in 0..4 {
            assert_eq!(c[i + 4], c[i] + DVec3::Z);
        }
        for p in c {
            assert_contains(&b, p);
        }
    }

    #[test]
    fn point_cloud_is_enclosed() {
        let points: Vec<DVec3> = (0..50)
            .map(|i| {
                let a = f64::from(i) * 0.37;
                DVec3::new(4.0 * a.cos(), a.sin() + 0.1 * a, 0.5 * (2.0 * a).sin())
            })
            .collect();
        let b = OrientedBox::from_points(&points);
        for &p in &points {
            assert_contains(&b, p);
        }
        assert!(b.r_length() >= b.t_length());
    }

    #[test]
    fn strided_and_sparse_inputs() {
        let coords = [1.0, 2.0, 3.0, 9.0, 4.0, 5.0, 6.0, 9.0, 7.0];
        let strided = Strided::new(&coords, 4).unwrap();
        let b = OrientedBox::from_points(&strided);
        assert_contains(&b, DVec3::new(1.0, 2.0, 3.0));
        assert_contains(&b, DVec3::new(4.0, 5.0, 6.0));

        let sparse = [None, Some(DVec3::ONE), None, Some(DVec3::new(3.0, 1.0, 1.0))];
        let b = OrientedBox::from_points(&sparse[..]);
        assert_contains(&b, DVec3::ONE);
        assert_contains(&b, DVec3::new(3.0, 1.0, 1.0));
        assert!((b.r_length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn flat_axes_are_widened() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let b = OrientedBox::from_points(&[p, p, p]);
        assert_eq!((b.r_length(), b.s_length(), b.t_length()), (1.0, 1.0, 1.0));
        assert_contains(&b, p);
    }

    #[test]
    fn empty_input_is_a_unit_cube_at_origin() {
        let b = OrientedBox::from_points(&Vec::<DVec3>::new());
        assert_eq!(b, OrientedBox::unit_cube(DVec3::ZERO));
        assert_eq!(b.center(), DVec3::ZERO);
        assert_eq!(b.r_length(), 1.0);
        assert_eq!(b.corners()[0], DVec3::splat(-0.5));
    }

    #[test]
    fn unit_cube_is_centered() {
        let center = DVec3::new(10.0, -4.0, 2.0);
        let b = OrientedBox::unit_cube(center);
        assert_eq!(b.center(), center);
        assert_eq!(b.corners()[6], center + DVec3::splat(0.5));
        assert_contains(&b, center);
    }

    #[test]
    fn union_of_nothing_and_of_one() {
        assert!(OrientedBox::union(Vec::<Option<&OrientedBox>>::new()).is_none());
        assert!(OrientedBox::union([None::<&OrientedBox>, None]).is_none());

        let only = OrientedBox::from_extents(
            [DVec3::Y, DVec3::Z, DVec3::X],
            [(0.0, 5.0), (1.0, 2.0), (0.0, 0.5)],
        )
        .unwrap();
        assert_eq!(OrientedBox::union([None, Some(&only), None]), Some(only));
        assert_eq!(OrientedBox::union(&[only]), Some(only));
    }

    #[test]
    fn union_bounds_every_corner() {
        let a = OrientedBox::unit_cube(DVec3::ZERO);
        let b = OrientedBox::unit_cube(DVec3::new(5.0, 1.0, 0.0));
        let c = OrientedBox::unit_cube(DVec3::new(-2.0, 3.0, 1.0));
        let u = OrientedBox::union([Some(&a), None, Some(&b), Some(&c)]).unwrap();
        for p in [a, b, c].iter().flat_map(OrientedBox::corners) {
            for plane in u.planes() {
                assert!(plane.dot(p) <= 1e-9);
            }
        }
    }

    #[test]
    fn translation_moves_planes() {
        let b = OrientedBox::unit_cube(DVec3::ZERO);
        let offset = DVec3::new(3.0, -1.0, 7.0);
        let moved = b.translate(offset);
        assert_eq!(moved.center(), offset);
        assert_eq!(moved.r_axis(), b.r_axis());
        for (p, q) in b.corners().into_iter().zip(moved.corners()) {
            assert_eq!(q, p + offset);
            assert_contains(&moved, q);
        }
        assert!(!moved.planes().iter().all(|pl| pl.dot(DVec3::ZERO) <= 0.0));
    }

    #[test]
    fn frustum_culling() {
        let f = perspective_frustum();
        let ahead = OrientedBox::unit_cube(DVec3::new(0.0, 0.0, -10.0));
        assert!(ahead.intersects_frustum(&f));
        assert!(f.intersects(&ahead));
        assert!(f.contains(&ahead));

        let aside = ahead.translate(DVec3::new(1000.0, 0.0, 0.0));
        assert!(!aside.intersects_frustum(&f));
        let above = ahead.translate(DVec3::new(0.0, 1000.0, 0.0));
        assert!(!above.intersects_frustum(&f));
        let below = ahead.translate(DVec3::new(0.0, -1000.0, 0.0));
        assert!(!below.intersects_frustum(&f));

        let behind = OrientedBox::unit_cube(DVec3::new(0.0, 0.0, 10.0));
        assert!(!behind.intersects_frustum(&f));
        let beyond = OrientedBox::unit_cube(DVec3::new(0.0, 0.0, -200.0));
        assert!(!beyond.intersects_frustum(&f));
    }

    #[test]
    fn straddling_one_plane_intersects() {
        let f = perspective_frustum();
        let straddle = OrientedBox::unit_cube(DVec3::new(-10.2, 0.0, -10.0));
        assert!(straddle.intersects_frustum(&f));
        assert!(!f.contains(&straddle));

        let outside = OrientedBox::unit_cube(DVec3::new(-12.0, 0.0, -10.0));
        assert!(!outside.intersects_frustum(&f));

        // Same against the top plane.
        let straddle = OrientedBox::unit_cube(DVec3::new(0.0, 10.2, -10.0));
        assert!(straddle.intersects_frustum(&f));
        assert!(!f.contains(&straddle));
        let outside = OrientedBox::unit_cube(DVec3::new(0.0, 12.0, -10.0));
        assert!(!outside.intersects_frustum(&f));
    }

    #[test]
    fn single_plane() {
        let b = OrientedBox::unit_cube(DVec3::ZERO);
        let z = Plane::new(DVec3::Z, 0.0).unwrap();
        assert!((b.effective_radius(&z) - 0.5).abs() < 1e-12);
        assert!(b.intersects_plane(&Plane::new(DVec3::Z, -0.4).unwrap()));
        assert!(!b.intersects_plane(&Plane::new(DVec3::Z, -0.6).unwrap()));
    }

    #[test]
    fn line_crossing() {
        let b = OrientedBox::unit_cube(DVec3::ZERO);
        let line = Line::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X).unwrap();
        let Some(LineHits::Pair { entry, exit }) = b.intersect_line(&line) else {
            panic!("expected two crossings");
        };
        assert!((entry.point - DVec3::new(-0.5, 0.0, 0.0)).length() < 1e-12);
        assert!((exit.point - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-12);

        let miss = Line::new(DVec3::new(-5.0, 2.0, 0.0), DVec3::X).unwrap();
        assert!(!b.intersects_line(&miss));
    }

    /// Box 2 units square across, 1 unit deep, facing a camera at the origin.
    fn facing_box(depth: (f64, f64)) -> OrientedBox {
        OrientedBox::from_extents([DVec3::Z, DVec3::X, DVec3::Y], [depth, (-1.0, 1.0), (-1.0, 1.0)])
            .unwrap()
    }

    #[test]
    fn visibility_codes() {
        let b = facing_box((-10.5, -9.5));
        let code = b.visibility_code(DVec3::ZERO);
        assert_eq!(code, FaceMask::TOP);
        assert_eq!(silhouette(code).map(<[usize]>::len), Some(4));

        assert_eq!(
            b.visibility_code(DVec3::new(5.0, 5.0, -20.0)),
            FaceMask::BOTTOM | FaceMask::FRONT | FaceMask::RIGHT
        );
        assert!(b.visibility_code(b.center()).is_empty());
    }

    #[test]
    fn projected_area_of_facing_box() {
        let area = facing_box((-10.5, -9.5)).projected_area(&camera());
        let ProjectedArea::Finite(area) = area else {
            panic!("expected a finite area, got {area:?}");
        };
        let side = 100.0 / 9.5;
        assert!((area - side * side).abs() < 1e-9, "area {area}");
    }

    #[test]
    fn projected_area_behind_or_around_the_eye() {
        let cam = camera();
        assert_eq!(
            facing_box((9.5, 10.5)).projected_area(&cam),
            ProjectedArea::Unbounded
        );
        assert_eq!(
            OrientedBox::unit_cube(DVec3::ZERO).projected_area(&cam),
            ProjectedArea::Unbounded
        );
    }

    proptest! {
        #[test]
        fn every_point_is_enclosed(
            points in prop::collection::vec(
                (-100.0..100.0_f64, -100.0..100.0_f64, -100.0..100.0_f64),
                1..40,
            )
        ) {
            let points: Vec<DVec3> = points.into_iter().map(|(x, y, z)| DVec3::new(x, y, z)).collect();
            let b = OrientedBox::from_points(&points);
            for &p in &points {
                for plane in b.planes() {
                    prop_assert!(plane.dot(p) <= 1e-7, "{} outside {:?}", p, plane);
                }
            }
        }

        #[test]
        fn projected_area_is_never_negative(
            x in -20.0..20.0_f64,
            y in -20.0..20.0_f64,
            z in -60.0..-5.0_f64,
            size in (0.1..8.0_f64, 0.1..8.0_f64, 0.1..8.0_f64),
            flip in any::<bool>(),
        ) {
            let t = if flip { DVec3::NEG_Z } else { DVec3::Z };
            let b = OrientedBox::from_extents(
                [DVec3::X, DVec3::Y, t],
                [(0.0, size.0), (0.0, size.1), (0.0, size.2)],
            )
            .unwrap()
            .translate(DVec3::new(x, y, z));
            match b.projected_area(&camera()) {
                ProjectedArea::Finite(area) => prop_assert!(area >= 0.0),
                ProjectedArea::Unbounded => {}
            }
        }
    }
}
