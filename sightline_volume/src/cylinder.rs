// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding cylinders.

use core::f64::consts::PI;

use glam::DVec3;
use sightline_math::{
    Error, Intersection, Line, LineHits, Plane, PointSet, Result, principal_axes,
};

use crate::extent::{self, Extent, OrientedVolume};
use crate::frustum::Frustum;
use crate::silhouette::{ProjectedArea, sphere_projected_area};
use crate::view::View;

/// A capped circular cylinder between two end-cap centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    bottom_center: DVec3,
    top_center: DVec3,
    axis: DVec3,
    radius: f64,
    height: f64,
}

impl Cylinder {
    /// Create a cylinder from its end-cap centers and radius.
    ///
    /// # Errors
    ///
    /// - [`Error::CoincidentEndpoints`] if `bottom_center == top_center`.
    /// - [`Error::NonPositiveRadius`] if `radius` is not strictly positive.
    pub fn new(bottom_center: DVec3, top_center: DVec3, radius: f64) -> Result<Self> {
        Self::with_axis(
            bottom_center,
            top_center,
            radius,
            (top_center - bottom_center).normalize_or_zero(),
        )
    }

    /// Like [`Cylinder::new`], with a known unit axis from bottom to top.
    ///
    /// Returns [`Error::ZeroDirection`] for a zero axis.
    pub fn with_axis(
        bottom_center: DVec3,
        top_center: DVec3,
        radius: f64,
        axis: DVec3,
    ) -> Result<Self> {
        if bottom_center == top_center {
            return Err(Error::CoincidentEndpoints);
        }
        if radius.is_nan() || radius <= 0.0 {
            return Err(Error::NonPositiveRadius { radius });
        }
        if axis.length_squared() == 0.0 {
            return Err(Error::ZeroDirection);
        }
        Ok(Self {
            bottom_center,
            top_center,
            axis,
            radius,
            height: bottom_center.distance(top_center),
        })
    }

    /// Bound `points` with a cylinder along their principal axis.
    ///
    /// The cross-section is grown one point at a time from the widest pair along the second
    /// principal axis, so it encloses every point but is not minimal. A zero radius becomes
    /// 1, and a zero height is replaced by a unit step along +X.
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points<P: PointSet + ?Sized>(points: &P) -> Option<Self> {
        let axes = principal_axes(points)?;
        let [r, s, _] = axes.axes;

        // Points flattened onto the plane through the origin perpendicular to R.
        let mut flat = Vec::new();
        let (mut min_r, mut max_r) = (f64::MAX, -f64::MAX);
        points.for_each_point(|p| {
            let d = p.dot(r);
            flat.push(p - r * d);
            min_r = min_r.min(d);
            max_r = max_r.max(d);
        });

        let first = *flat.first()?;
        let (mut min_point, mut max_point) = (first, first);
        let (mut min_s, mut max_s) = (f64::MAX, -f64::MAX);
        for &p in &flat {
            let d = p.dot(s);
            if d < min_s {
                min_point = p;
                min_s = d;
            }
            if d > max_s {
                max_point = p;
                max_s = d;
            }
        }

        let mut center = (min_point + max_point) * 0.5;
        let mut radius = center.distance(min_point);
        for &p in &flat {
            let offset = p - center;
            let d = offset.length();
            if d > radius {
                let far_side = center - offset / d * radius;
                center = (far_side + p) * 0.5;
                radius = d;
            }
        }

        if radius == 0.0 {
            radius = 1.0;
        }
        let bottom = center + r * min_r;
        let mut top = center + r * max_r;
        if bottom == top {
            tracing::debug!(?bottom, "points have no extent along the cylinder axis");
            top = bottom + DVec3::X;
        }
        Self::new(bottom, top, radius).ok()
    }

    /// Center of the bottom cap.
    pub const fn bottom_center(&self) -> DVec3 {
        self.bottom_center
    }

    /// Center of the top cap.
    pub const fn top_center(&self) -> DVec3 {
        self.top_center
    }

    /// Unit axis from bottom to top.
    pub const fn axis(&self) -> DVec3 {
        self.axis
    }

    /// Radius of the cylinder itself, as opposed to [`Extent::radius`].
    pub const fn cylinder_radius(&self) -> f64 {
        self.radius
    }

    /// Distance between the cap centers.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height
    }

    /// Line parameters where the ray enters and leaves the infinite cylinder.
    ///
    /// A ray parallel to the axis and inside the cylinder reports `(-∞, ∞)`.
    fn intersect_infinite(&self, line: &Line) -> Option<(f64, f64)> {
        let dir = line.direction();
        let base = line.origin() - self.bottom_center;
        let normal = dir.cross(self.axis);
        let len = normal.length();

        if len == 0.0 {
            let off_axis = base - self.axis * base.dot(self.axis);
            return (off_axis.length() <= self.radius).then_some((f64::NEG_INFINITY, f64::INFINITY));
        }

        let normal = normal / len;
        let d = base.dot(normal).abs();
        if d > self.radius {
            return None;
        }

        let t = -base.cross(self.axis).dot(normal) / len;
        let across = normal.cross(self.axis).normalize();
        let s = ((self.radius * self.radius - d * d).sqrt() / dir.dot(across)).abs();
        Some((t - s, t + s))
    }

    /// Narrow `(entry, exit)` to the slab between the two caps.
    fn clip_to_caps(&self, line: &Line, (mut entry, mut exit): (f64, f64)) -> Option<(f64, f64)> {
        let dc = self.axis.dot(line.direction());
        let origin = self.axis.dot(line.origin());
        let dwb = origin - self.axis.dot(self.bottom_center);
        let dwt = origin - self.axis.dot(self.top_center);

        if dc == 0.0 {
            if dwb <= 0.0 || dwt >= 0.0 {
                return None;
            }
        } else {
            let tb = -dwb / dc;
            let tt = -dwt / dc;
            if dc > 0.0 {
                // Bottom cap is met first.
                if tb > exit || tt < entry {
                    return None;
                }
                if tb > entry && tb < exit {
                    entry = tb;
                }
                if tt > entry && tt < exit {
                    exit = tt;
                }
            } else {
                if tb < entry || tt > exit {
                    return None;
                }
                if tb > entry && tb < exit {
                    exit = tb;
                }
                if tt > entry && tt < exit {
                    entry = tt;
                }
            }
        }
        (entry < exit).then_some((entry, exit))
    }
}

impl OrientedVolume for Cylinder {
    fn axis_segment(&self) -> [DVec3; 2] {
        [self.bottom_center, self.top_center]
    }

    fn segment_radius(&self, plane: &Plane) -> f64 {
        self.effective_radius(plane)
    }
}

impl Extent for Cylinder {
    fn center(&self) -> DVec3 {
        (self.bottom_center + self.top_center) * 0.5
    }

    /// Radius of the sphere through both cap rims.
    fn radius(&self) -> f64 {
        (0.5 * self.height).hypot(self.radius)
    }

    /// Radius of the cap disk projected on the plane normal. The normal is assumed unit
    /// length.
    fn effective_radius(&self, plane: &Plane) -> f64 {
        let dot = plane.normal().dot(self.axis);
        let scale = 1.0 - dot * dot;
        if scale <= 0.0 {
            0.0
        } else {
            self.radius * scale.sqrt()
        }
    }

    fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        extent::intersects_frustum(self, frustum)
    }

    fn intersects_plane(&self, plane: &Plane) -> bool {
        extent::segment_intersects_plane(self.axis_segment(), plane, self.effective_radius(plane))
    }

    fn intersect_line(&self, line: &Line) -> Option<LineHits> {
        let hits = self.intersect_infinite(line)?;
        let (entry, exit) = self.clip_to_caps(line, hits)?;

        let hit = |t| Intersection {
            point: line.point_at(t),
            is_tangent: false,
        };
        let ahead = |t: f64| t.is_finite() && t >= 0.0;
        match (ahead(entry), ahead(exit)) {
            (true, true) => Some(LineHits::Pair {
                entry: hit(entry),
                exit: hit(exit),
            }),
            (true, false) => Some(LineHits::Single(hit(entry))),
            (false, true) => Some(LineHits::Single(hit(exit))),
            (false, false) => None,
        }
    }

    /// Approximated by the enclosing sphere.
    fn projected_area(&self, view: &dyn View) -> ProjectedArea {
        sphere_projected_area(view, self.center(), self.radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    use kurbo::Size;

    use crate::view::Camera;

    fn upright() -> Cylinder {
        Cylinder::new(DVec3::new(0.0, 0.0, -12.0), DVec3::new(0.0, 0.0, -8.0), 1.0).unwrap()
    }

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(
            Cylinder::new(DVec3::ONE, DVec3::ONE, 1.0),
            Err(Error::CoincidentEndpoints)
        );
        assert_eq!(
            Cylinder::new(DVec3::ZERO, DVec3::Z, 0.0),
            Err(Error::NonPositiveRadius { radius: 0.0 })
        );
        assert!(Cylinder::new(DVec3::ZERO, DVec3::Z, -1.0).is_err());
        assert_eq!(
            Cylinder::with_axis(DVec3::ZERO, DVec3::Z, 1.0, DVec3::ZERO),
            Err(Error::ZeroDirection)
        );
    }

    #[test]
    fn measurements() {
        let c = upright();
        assert_eq!(c.axis(), DVec3::Z);
        assert_eq!(c.height(), 4.0);
        assert_eq!(c.center(), DVec3::new(0.0, 0.0, -10.0));
        assert!((c.radius() - 5.0_f64.sqrt()).abs() < 1e-12);
        assert!((c.volume() - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn line_across_the_side() {
        let line = Line::new(DVec3::new(-5.0, 0.0, -10.0), DVec3::X).unwrap();
        let Some(LineHits::Pair { entry, exit }) = upright().intersect_line(&line) else {
            panic!("expected two crossings");
        };
        assert_close(entry.point, DVec3::new(-1.0, 0.0, -10.0));
        assert_close(exit.point, DVec3::new(1.0, 0.0, -10.0));
    }

    #[test]
    fn line_along_the_axis() {
        let line = Line::new(DVec3::new(0.0, 0.0, -20.0), DVec3::Z).unwrap();
        let Some(LineHits::Pair { entry, exit }) = upright().intersect_line(&line) else {
            panic!("expected two crossings");
        };
        assert_close(entry.point, DVec3::new(0.0, 0.0, -12.0));
        assert_close(exit.point, DVec3::new(0.0, 0.0, -8.0));

        let inside = Line::new(DVec3::new(0.0, 0.0, -10.0), DVec3::Z).unwrap();
        let hits = upright().intersect_line(&inside).unwrap();
        assert!(matches!(hits, LineHits::Single(_)));
        assert_close(hits.first().point, DVec3::new(0.0, 0.0, -8.0));
    }

    #[test]
    fn lines_that_miss() {
        let c = upright();
        let beside = Line::new(DVec3::new(-5.0, 3.0, -10.0), DVec3::X).unwrap();
        assert!(!c.intersects_line(&beside));
        let above = Line::new(DVec3::new(-5.0, 0.0, -5.0), DVec3::X).unwrap();
        assert!(!c.intersects_line(&above));
        let away = Line::new(DVec3::new(0.0, 0.0, -20.0), DVec3::NEG_Z).unwrap();
        assert!(!c.intersects_line(&away));
    }

    #[test]
    fn planes() {
        let c = Cylinder::new(DVec3::NEG_Z, DVec3::Z, 1.0).unwrap();
        assert_eq!(c.effective_radius(&Plane::new(DVec3::Z, 0.0).unwrap()), 0.0);
        assert_eq!(c.effective_radius(&Plane::new(DVec3::X, 0.0).unwrap()), 1.0);
        assert!(!c.intersects_plane(&Plane::new(DVec3::Z, -1.5).unwrap()));
        assert!(c.intersects_plane(&Plane::new(DVec3::X, -0.5).unwrap()));
        assert!(!c.intersects_plane(&Plane::new(DVec3::X, -1.5).unwrap()));
    }

    #[test]
    fn frustum_culling() {
        let f = Frustum::from_perspective(FRAC_PI_2, 100.0, 100.0, 1.0, 100.0).unwrap();
        let c = upright();
        assert!(c.intersects_frustum(&f));
        assert!(f.intersects(&c));

        let far_aside = Cylinder::new(
            DVec3::new(1000.0, 0.0, -12.0),
            DVec3::new(1000.0, 0.0, -8.0),
            1.0,
        )
        .unwrap();
        assert!(!far_aside.intersects_frustum(&f));

        // Long enough to poke through the near plane from behind the eye.
        let through_eye = Cylinder::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -5.0), 0.5)
            .unwrap();
        assert!(through_eye.intersects_frustum(&f));
    }

    #[test]
    fn projected_area_uses_enclosing_sphere() {
        let cam = Camera::new(
            DVec3::ZERO,
            DVec3::NEG_Z,
            DVec3::Y,
            FRAC_PI_2,
            Size::new(100.0, 100.0),
            1.0,
            100.0,
        )
        .unwrap();
        // Depth 10 gives 0.2 units per pixel; the sphere radius is √5.
        let ProjectedArea::Finite(area) = upright().projected_area(&cam) else {
            panic!("expected a finite area");
        };
        assert!((area - 125.0 * PI).abs() < 1e-9, "area {area}");
        assert_eq!(
            sphere_projected_area(&cam, DVec3::NEG_Z, 0.0),
            ProjectedArea::Finite(0.0)
        );
    }

    #[test]
    fn bounding_cylinder_encloses_points() {
        let mut points = Vec::new();
        for i in 0..8 {
            let a = f64::from(i) * PI / 4.0;
            for z in [0.0, 10.0] {
                points.push(DVec3::new(2.0 * a.cos() + 1.0, 2.0 * a.sin(), z));
            }
        }
        let c = Cylinder::from_points(&points).unwrap();
        assert!(c.axis().dot(DVec3::Z).abs() > 0.999);
        assert!((c.height() - 10.0).abs() < 1e-9);
        let axis = Line::from_segment(c.bottom_center(), c.top_center()).unwrap();
        for &p in &points {
            assert!(axis.distance_to(p) <= c.cylinder_radius() + 1e-9);
            let along = (p - c.bottom_center()).dot(c.axis());
            assert!((-1e-9..=c.height() + 1e-9).contains(&along));
        }
    }

    #[test]
    fn bounding_cylinder_fallbacks() {
        assert!(Cylinder::from_points(&Vec::<DVec3>::new()).is_none());

        let p = DVec3::new(3.0, 4.0, 5.0);
        let c = Cylinder::from_points(&[p]).unwrap();
        assert_eq!(c.cylinder_radius(), 1.0);
        assert_eq!(c.top_center() - c.bottom_center(), DVec3::X);
    }
}
