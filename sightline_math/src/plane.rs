// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planes in Hessian form and the point, segment, and line queries built on them.

use glam::{DMat4, DVec3, DVec4};

use crate::error::{Error, Result};
use crate::line::Line;
use crate::matrix::try_inverse;

/// A plane `n · p + d = 0`.
///
/// The normal is non-zero but not necessarily unit length; call [`Plane::normalize`] when
/// [`Plane::dot`] must be a true signed distance. Points with a positive dot lie on the side
/// the normal points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: DVec3,
    distance: f64,
}

/// Where a line meets a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineCrossing {
    /// The line crosses the plane at this line parameter.
    At(f64),
    /// The line lies in the plane.
    Coincident,
    /// The line is parallel to the plane and off it.
    Parallel,
}

/// Where a segment meets a plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentCrossing {
    /// The segment crosses or touches the plane at this point.
    Point(DVec3),
    /// The whole segment lies in the plane.
    Contained,
}

/// Which side of a plane a set of points lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Every point has a strictly positive dot.
    Positive,
    /// Every point has a strictly negative dot.
    Negative,
    /// The points straddle or touch the plane.
    Mixed,
}

impl Plane {
    /// Create a plane from a normal and a distance term.
    ///
    /// Returns [`Error::ZeroNormal`] if `normal` has zero length.
    pub fn new(normal: DVec3, distance: f64) -> Result<Self> {
        if normal.length_squared() == 0.0 {
            return Err(Error::ZeroNormal);
        }
        Ok(Self { normal, distance })
    }

    /// Create a plane without checking the normal.
    ///
    /// The normal must be non-zero. Meant for constant planes such as axis-aligned faces.
    pub const fn new_unchecked(normal: DVec3, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Create a plane from the homogeneous vector `(nx, ny, nz, d)`.
    pub fn from_vec4(v: DVec4) -> Result<Self> {
        Self::new(v.truncate(), v.w)
    }

    /// Plane through three points, with the normal `(b - a) × (c - a)`.
    ///
    /// Collinear points yield [`Error::ZeroNormal`].
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Result<Self> {
        let n = (b - a).cross(c - a);
        Self::new(n, -n.dot(a))
    }

    /// The plane normal.
    pub const fn normal(&self) -> DVec3 {
        self.normal
    }

    /// The distance term `d`.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// The homogeneous vector `(nx, ny, nz, d)`.
    pub fn as_vec4(&self) -> DVec4 {
        self.normal.extend(self.distance)
    }

    /// The same plane with a unit normal.
    pub fn normalize(&self) -> Self {
        let len = self.normal.length();
        Self {
            normal: self.normal / len,
            distance: self.distance / len,
        }
    }

    /// `n · p + d` for a point `p`.
    pub fn dot(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.distance
    }

    /// Dot with a homogeneous vector; vectors with `w = 0` ignore the distance term.
    pub fn dot4(&self, v: DVec4) -> f64 {
        self.as_vec4().dot(v)
    }

    /// The line parameter at which `line` crosses this plane.
    pub fn intersect_distance(&self, line: &Line) -> LineCrossing {
        let ldotv = self.normal.dot(line.direction());
        let ldots = self.dot(line.origin());
        if ldotv == 0.0 {
            return if ldots == 0.0 {
                LineCrossing::Coincident
            } else {
                LineCrossing::Parallel
            };
        }
        LineCrossing::At(-ldots / ldotv)
    }

    /// The point where `line` crosses this plane.
    ///
    /// A line lying in the plane reports its origin.
    pub fn intersect_line(&self, line: &Line) -> Option<DVec3> {
        match self.intersect_distance(line) {
            LineCrossing::At(t) => Some(line.point_at(t)),
            LineCrossing::Coincident => Some(line.origin()),
            LineCrossing::Parallel => None,
        }
    }

    /// Where the segment `a`–`b` meets this plane, if it does.
    pub fn intersect_segment(&self, a: DVec3, b: DVec3) -> Option<SegmentCrossing> {
        let Ok(line) = Line::from_segment(a, b) else {
            // Degenerate segment: a point on the plane or nothing.
            return (self.dot(a) == 0.0).then_some(SegmentCrossing::Point(a));
        };
        match self.intersect_distance(&line) {
            LineCrossing::Coincident => Some(SegmentCrossing::Contained),
            LineCrossing::At(t) if (0.0..=1.0).contains(&t) => {
                Some(SegmentCrossing::Point(line.point_at(t)))
            }
            _ => None,
        }
    }

    /// The part of the segment `a`–`b` on the positive side, when the segment crosses this
    /// plane or lies in it.
    ///
    /// Segments entirely on one side, and degenerate segments, yield `None`.
    pub fn clip(&self, a: DVec3, b: DVec3) -> Option<[DVec3; 2]> {
        let line = Line::from_segment(a, b).ok()?;
        let ldotv = self.normal.dot(line.direction());
        if ldotv == 0.0 {
            return (self.dot(a) == 0.0).then_some([a, b]);
        }

        let t = -self.dot(a) / ldotv;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        let p = line.point_at(t);
        Some(if ldotv > 0.0 { [p, b] } else { [a, p] })
    }

    /// Classify two points against this plane.
    pub fn side_of(&self, a: DVec3, b: DVec3) -> Side {
        self.side_of_all(&[a, b])
    }

    /// Classify a set of points against this plane. An empty set is [`Side::Mixed`].
    pub fn side_of_all(&self, points: &[DVec3]) -> Side {
        let mut side = None;
        for &p in points {
            let d = self.dot(p);
            let this = if d > 0.0 {
                Side::Positive
            } else if d < 0.0 {
                Side::Negative
            } else {
                return Side::Mixed;
            };
            match side {
                None => side = Some(this),
                Some(s) if s != this => return Side::Mixed,
                Some(_) => {}
            }
        }
        side.unwrap_or(Side::Mixed)
    }

    /// Transform the plane vector by `m`.
    ///
    /// To move a plane with a point transform `T`, pass the inverse transpose of `T`.
    /// Returns [`Error::ZeroNormal`] if the transform collapses the normal.
    pub fn transform(&self, m: &DMat4) -> Result<Self> {
        Self::from_vec4(*m * self.as_vec4())
    }

    /// The single point shared by three planes, or `None` if two of them are parallel.
    pub fn intersect_three(a: &Self, b: &Self, c: &Self) -> Option<DVec3> {
        let normals = DMat4::from_cols(
            a.normal.extend(0.0),
            b.normal.extend(0.0),
            c.normal.extend(0.0),
            DVec4::W,
        )
        .transpose();
        let inv = try_inverse(&normals)?;
        Some(inv.transform_vector3(DVec3::new(-a.distance, -b.distance, -c.distance)))
    }
}
