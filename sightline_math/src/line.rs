// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parametric lines and their intersection with convex polytopes.

use glam::DVec3;

use crate::error::{Error, Result};
use crate::plane::Plane;

/// An infinite line `origin + t * direction`.
///
/// Polytope and cylinder intersection treat it as a ray and only report points with `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    origin: DVec3,
    direction: DVec3,
}

impl Line {
    /// Create a line. The direction need not be normalized but must be non-zero.
    pub fn new(origin: DVec3, direction: DVec3) -> Result<Self> {
        if direction.length_squared() == 0.0 {
            return Err(Error::ZeroDirection);
        }
        Ok(Self { origin, direction })
    }

    /// Line through `a` and `b`, parameterized so that `t = 0` is `a` and `t = 1` is `b`.
    pub fn from_segment(a: DVec3, b: DVec3) -> Result<Self> {
        Self::new(a, b - a)
    }

    /// The point at `t = 0`.
    pub const fn origin(&self) -> DVec3 {
        self.origin
    }

    /// The (unnormalized) direction.
    pub const fn direction(&self) -> DVec3 {
        self.direction
    }

    /// The point at parameter `t`.
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Perpendicular distance from `p` to the infinite line.
    pub fn distance_to(&self, p: DVec3) -> f64 {
        let v = p - self.origin;
        let along = v.dot(self.direction) / self.direction.length_squared();
        (v - self.direction * along).length()
    }
}

/// A point where a line meets a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Where the line meets the surface.
    pub point: DVec3,
    /// Whether the line only grazes the surface (lies in one of its faces).
    pub is_tangent: bool,
}

/// Where a ray meets a closed volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineHits {
    /// The ray starts outside, enters, and leaves.
    Pair {
        /// First point along the ray.
        entry: Intersection,
        /// Second point along the ray.
        exit: Intersection,
    },
    /// Only one crossing lies ahead of the ray origin.
    Single(Intersection),
}

impl LineHits {
    /// The nearest crossing along the ray.
    pub fn first(&self) -> Intersection {
        match *self {
            Self::Pair { entry, .. } => entry,
            Self::Single(hit) => hit,
        }
    }
}

/// Intersect a ray with the convex polytope bounded by `planes`.
///
/// Each plane's normal must point out of the polytope. Returns `None` when the ray misses or
/// the polytope lies entirely behind the origin. When the origin is inside, only the exit is
/// reported.
pub fn intersect_polytope(line: &Line, planes: &[Plane]) -> Option<LineHits> {
    let u = line.direction();
    let p = line.origin();

    // Largest entering parameter and smallest leaving parameter seen so far.
    let mut f_max = f64::MIN;
    let mut b_min = f64::MAX;
    let mut is_tangent = false;

    for plane in planes {
        let n = plane.normal();
        let d = -plane.distance();

        let s = u.dot(n);
        if s == 0.0 {
            let pdn = p.dot(n);
            if pdn > d {
                // Parallel and in front of this face.
                return None;
            }
            if pdn == d {
                is_tangent = true;
            }
            continue;
        }

        let a = (d - p.dot(n)) / s;
        if s < 0.0 {
            if a > f_max {
                if a > b_min {
                    return None;
                }
                f_max = a;
            }
        } else if a < b_min {
            if a < 0.0 || a < f_max {
                return None;
            }
            b_min = a;
        }
    }

    let exit = Intersection {
        point: line.point_at(b_min),
        is_tangent,
    };
    if f_max >= 0.0 {
        Some(LineHits::Pair {
            entry: Intersection {
                point: line.point_at(f_max),
                is_tangent,
            },
            exit,
        })
    } else {
        Some(LineHits::Single(exit))
    }
}
